//! Differential renderer for fullscreen mode.
//!
//! The DiffRenderer compares the current frame to the previous frame and only
//! outputs cells that have changed.
//!
//! # Algorithm
//!
//! 1. Wrap output in a synchronized update block
//! 2. For each cell in the new frame:
//!    - If previous frame exists and cell is unchanged: skip
//!    - Otherwise: queue the cell through the [`CellWriter`]
//! 3. Flush the writer once
//! 4. Store current frame as previous for next comparison
//!
//! Output goes to any `io::Write`, so tests render into a `Vec<u8>`.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Attribute, Print, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{BeginSynchronizedUpdate, EndSynchronizedUpdate};

use super::buffer::FrameBuffer;
use crate::types::{Attr, Cell, Rgba};

// =============================================================================
// Stateful cell output
// =============================================================================

/// Queues cells while tracking cursor and style, so runs of cells on a row
/// skip cursor moves and repeated colour codes.
#[derive(Debug, Default)]
struct CellWriter {
    cursor: Option<(u16, u16)>,
    fg: Option<Rgba>,
    bg: Option<Rgba>,
    attrs: Option<Attr>,
}

impl CellWriter {
    fn reset(&mut self) {
        *self = Self::default();
    }

    fn write<W: Write>(&mut self, out: &mut W, x: u16, y: u16, cell: &Cell) -> io::Result<()> {
        // Continuation cells are drawn by the wide char before them.
        if cell.ch == '\0' {
            return Ok(());
        }

        if self.cursor != Some((x, y)) {
            queue!(out, MoveTo(x, y))?;
        }

        if self.attrs != Some(cell.attrs) {
            // Reset clears colours too, so both are re-emitted below.
            queue!(out, SetAttribute(Attribute::Reset))?;
            for (flag, attribute) in [
                (Attr::BOLD, Attribute::Bold),
                (Attr::DIM, Attribute::Dim),
                (Attr::ITALIC, Attribute::Italic),
                (Attr::UNDERLINE, Attribute::Underlined),
                (Attr::INVERSE, Attribute::Reverse),
            ] {
                if cell.attrs.contains(flag) {
                    queue!(out, SetAttribute(attribute))?;
                }
            }
            self.attrs = Some(cell.attrs);
            self.fg = None;
            self.bg = None;
        }

        if self.fg != Some(cell.fg) {
            queue!(out, SetForegroundColor(cell.fg.to_crossterm()))?;
            self.fg = Some(cell.fg);
        }
        if self.bg != Some(cell.bg) {
            queue!(out, SetBackgroundColor(cell.bg.to_crossterm()))?;
            self.bg = Some(cell.bg);
        }

        queue!(out, Print(cell.ch))?;
        let advance = crate::layout::char_width(cell.ch).max(1);
        self.cursor = Some((x.saturating_add(advance), y));
        Ok(())
    }
}

// =============================================================================
// DiffRenderer
// =============================================================================

/// Differential renderer for fullscreen mode.
///
/// Keeps track of the previous frame to enable diff-based rendering.
#[derive(Debug, Default)]
pub struct DiffRenderer {
    cells: CellWriter,
    previous: Option<FrameBuffer>,
}

impl DiffRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render a frame, outputting only changed cells.
    ///
    /// Returns true if any cells were changed.
    pub fn render<W: Write>(&mut self, out: &mut W, buffer: &FrameBuffer) -> io::Result<bool> {
        let mut has_changes = false;
        queue!(out, BeginSynchronizedUpdate)?;
        self.cells.reset();

        let width = buffer.width();
        let height = buffer.height();
        let previous = self
            .previous
            .as_ref()
            .filter(|prev| prev.width() == width && prev.height() == height);

        for y in 0..height {
            for x in 0..width {
                let Some(cell) = buffer.get(x, y) else {
                    continue;
                };
                let changed = previous
                    .and_then(|prev| prev.get(x, y))
                    .is_none_or(|prev| !cells_equal(cell, prev));

                if changed {
                    has_changes = true;
                    self.cells.write(out, x, y, cell)?;
                }
            }
        }

        queue!(out, SetAttribute(Attribute::Reset), EndSynchronizedUpdate)?;
        out.flush()?;

        self.previous = Some(buffer.clone());
        Ok(has_changes)
    }

    /// Invalidate the previous frame.
    ///
    /// Next render will be a full redraw. Use after resize or when the
    /// screen was cleared.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }
}

/// Fast cell equality check.
#[inline]
fn cells_equal(a: &Cell, b: &Cell) -> bool {
    a.ch == b.ch && a.attrs == b.attrs && a.fg == b.fg && a.bg == b.bg
}

// =============================================================================
// Tests
// =============================================================================
