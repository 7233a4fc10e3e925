//! FrameBuffer and drawing primitives.
//!
//! The FrameBuffer is a 2D grid of Cells that represents what should be displayed
//! on the terminal. The painter draws into it; the diff renderer outputs it.
//!
//! # Design Decisions
//!
//! - **Flat storage**: `Vec<Cell>` with row-major indexing.
//! - **Clipping**: drawing functions take an optional `ClipRect`, so a child
//!   box never paints outside its parent.
//! - **Wide characters**: the cell after a 2-column character holds `'\0'`.

use crate::layout::char_width;
use crate::types::{Attr, Cell, ClipRect, Rgba};

/// A 2D buffer of terminal cells.
///
/// Uses flat storage with row-major indexing: `index = y * width + x`
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// Create a new buffer filled with default cells.
    pub fn new(width: u16, height: u16) -> Self {
        Self::with_background(width, height, Rgba::TERMINAL_DEFAULT)
    }

    /// Create a new buffer with a specific background color.
    pub fn with_background(width: u16, height: u16, bg: Rgba) -> Self {
        let cell = Cell {
            bg,
            ..Cell::default()
        };
        Self {
            width,
            height,
            cells: vec![cell; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Get the full buffer bounds as a ClipRect.
    #[inline]
    pub fn bounds(&self) -> ClipRect {
        ClipRect::new(0, 0, self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    pub fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// Text of row `y` with continuation cells dropped. Handy in tests.
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y))
            .map(|cell| cell.ch)
            .filter(|ch| *ch != '\0')
            .collect()
    }

    // =========================================================================
    // Drawing Primitives
    // =========================================================================

    /// Set a single cell. Returns true if the cell was inside bounds and clip.
    pub fn set_cell(&mut self, x: u16, y: u16, cell: Cell, clip: Option<&ClipRect>) -> bool {
        if !self.in_bounds(x, y) || clip.is_some_and(|clip| !clip.contains(x, y)) {
            return false;
        }
        let idx = self.index(x, y);
        self.cells[idx] = cell;
        true
    }

    /// Fill a rectangle with blank cells of the given background.
    pub fn fill_rect(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        bg: Rgba,
        clip: Option<&ClipRect>,
    ) {
        let area = ClipRect::new(x, y, width, height);
        let Some(area) = area.intersect(&self.bounds()) else {
            return;
        };
        let Some(area) = (match clip {
            Some(clip) => area.intersect(clip),
            None => Some(area),
        }) else {
            return;
        };

        let blank = Cell {
            bg,
            ..Cell::default()
        };
        for row in area.y..area.y + area.height {
            let start = self.index(area.x, row);
            let end = start + area.width as usize;
            self.cells[start..end].fill(blank);
        }
    }

    /// Draw text at a position, keeping each cell's background.
    ///
    /// Returns the number of columns advanced. Zero-width characters are
    /// skipped.
    pub fn draw_text(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        fg: Rgba,
        attrs: Attr,
        clip: Option<&ClipRect>,
    ) -> u16 {
        let mut col = x;

        for ch in text.chars() {
            if col >= self.width {
                break;
            }
            let w = char_width(ch);
            if w == 0 {
                continue;
            }

            // A wide char needs both columns inside the clip.
            let fits = w == 1 || clip.is_none_or(|c| c.contains(col + 1, y));
            if fits {
                let bg = self.get(col, y).map_or(Rgba::TERMINAL_DEFAULT, |c| c.bg);
                let drawn = self.set_cell(col, y, Cell { ch, fg, bg, attrs }, clip);
                if drawn && w == 2 && col + 1 < self.width {
                    let next = Cell {
                        ch: '\0',
                        fg,
                        bg,
                        attrs,
                    };
                    self.set_cell(col + 1, y, next, clip);
                }
            }

            col = col.saturating_add(w);
        }

        col.saturating_sub(x)
    }
}
