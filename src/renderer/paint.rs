//! Painter - render tree to cells.
//!
//! Lays the render tree out in terminal cells and draws it into a
//! [`FrameBuffer`], recording hit regions as it goes.
//!
//! # Geometry
//!
//! Horizontally, axis position `x` lands in column
//! `floor((x - scroll_x) / units_per_column)`; a node box spans the columns
//! of its `start` and `end`. Vertically, content rows are counted from the
//! top of the root box and shifted up by `scroll_y`:
//!
//! ```text
//! row 0  « Part(lead): {"instrument": 0} »            header (title)
//! row 1    0..15360                                   header (span)
//! row 2  « Sequence(verse) … »   « Sequence(verse) … » child row 0
//! row 3    0..3840                 3840..7680
//! row 4                                               child margin
//! row 5                                               box margin
//! ```
//!
//! Each box is its header plus the height of every child row; a child row is
//! as tall as its tallest box plus one margin row.
//!
//! Header content (`« title »` over the span line) is placed by the
//! [`SlideSolver`] so wide nodes keep their label in view.

use std::collections::HashMap;

use super::buffer::FrameBuffer;
use crate::engine::NodeId;
use crate::inspector::{RenderNode, RowItem, SkipControl};
use crate::layout::{
    CONTENT_MAX_SHARE, SlideLayout, SlideSolver, char_width, slide_fallback, sliding_fill_weight,
    string_width, truncate_text,
};
use crate::state::{Hit, HitGrid, HitPart};
use crate::theme::Palette;
use crate::types::{Attr, ClipRect, Rgba};

/// Rows taken by a node header (title and span line).
pub const HEADER_ROWS: i64 = 2;
/// Blank rows below every box.
pub const BOX_MARGIN: i64 = 1;

const BACK_ARROW: &str = "«";
const FORWARD_ARROW: &str = "»";
/// Columns used by an arrow and the space next to it.
const ARROW_COLUMNS: i64 = 2;

/// Per-frame inputs to the painter.
#[derive(Debug, Clone, Copy)]
pub struct PaintView<'a> {
    pub palette: &'a Palette,
    /// Viewport left edge, axis units.
    pub scroll_x: f64,
    /// First visible content row.
    pub scroll_y: i64,
    /// Viewport width, axis units.
    pub window: f64,
    pub units_per_column: f64,
    pub focused: Option<NodeId>,
}

impl PaintView<'_> {
    /// Column of axis position `x`, relative to the area's left edge.
    fn column(&self, x: f64) -> i64 {
        ((x - self.scroll_x) / self.units_per_column.max(f64::MIN_POSITIVE)).floor() as i64
    }
}

/// What one frame produced besides cells.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PaintOutput {
    /// Nodes whose box reaches into the visible columns, in render order.
    pub focus_order: Vec<NodeId>,
    /// First content row of every painted node.
    pub header_rows: HashMap<NodeId, i64>,
    /// Total content rows, root margin included.
    pub content_height: i64,
}

/// Draws render trees. Owns the reusable header layout solver.
pub struct Painter {
    solver: Option<SlideSolver>,
}

impl Default for Painter {
    fn default() -> Self {
        Self::new()
    }
}

impl Painter {
    pub fn new() -> Self {
        let solver = SlideSolver::new()
            .map_err(|err| tracing::warn!(%err, "header solver unavailable, using fallback"))
            .ok();
        Self { solver }
    }

    /// Paint `root` into `area` of `buf`, filling `hits` for the same area.
    pub fn paint(
        &mut self,
        root: &RenderNode,
        view: &PaintView<'_>,
        area: ClipRect,
        buf: &mut FrameBuffer,
        hits: &mut HitGrid,
    ) -> PaintOutput {
        let mut heights = HashMap::new();
        let root_height = measure(root, &mut heights);

        let mut frame = Frame {
            view,
            area,
            buf,
            hits,
            heights: &heights,
            out: PaintOutput {
                content_height: root_height + BOX_MARGIN,
                ..PaintOutput::default()
            },
        };
        self.paint_node(&mut frame, root, 0);
        frame.out
    }

    fn paint_node(&mut self, frame: &mut Frame<'_, '_>, node: &RenderNode, top: i64) {
        let view = frame.view;
        let area = frame.area;
        let left = area.x as i64 + view.column(node.span.start as f64);
        let right = (area.x as i64 + view.column(node.span.end as f64)).max(left + 1);
        let height = frame.heights.get(&node.id).copied().unwrap_or(HEADER_ROWS);
        let screen_top = area.y as i64 + top - view.scroll_y;

        frame.out.header_rows.insert(node.id, top);
        if right > area.x as i64 && left < area.x as i64 + area.width as i64 {
            frame.out.focus_order.push(node.id);
        }

        if let Some(rect) = signed_rect(left, screen_top, right - left, height, &area) {
            let bg = view.palette.node_background(node.variant);
            frame.buf.fill_rect(rect.x, rect.y, rect.width, rect.height, bg, None);
            self.paint_header(frame, node, left, right - left, screen_top, &rect);
        }

        let mut row_top = top + HEADER_ROWS;
        for row in &node.rows {
            let mut row_height = 0;
            for item in row {
                if let RowItem::Node(child) = item {
                    self.paint_node(frame, child, row_top);
                    let child_height = frame.heights.get(&child.id).copied().unwrap_or(0);
                    row_height = row_height.max(child_height + BOX_MARGIN);
                }
            }
            row_top += row_height;
        }
    }

    fn paint_header(
        &mut self,
        frame: &mut Frame<'_, '_>,
        node: &RenderNode,
        left: i64,
        columns: i64,
        screen_top: i64,
        clip: &ClipRect,
    ) {
        let view = frame.view;
        let palette = view.palette;
        let header = &node.header;

        // Whole header answers clicks; arrows are added on top.
        if let Some(rect) = signed_rect(left, screen_top, columns, HEADER_ROWS, clip) {
            let body = Hit {
                node: node.id,
                part: HitPart::Body,
            };
            frame.hits.fill_rect(rect.x, rect.y, rect.width, rect.height, body);
        }

        let text_width = string_width(&header.title).max(string_width(&header.span_text));
        let content = text_width as f32 + (2 * ARROW_COLUMNS) as f32;
        let max_content = (frame.area.width as f32 * CONTENT_MAX_SHARE).floor();
        let weight = if node.visible {
            sliding_fill_weight(
                node.span.start as f64,
                node.span.end as f64,
                view.window,
                view.scroll_x,
            ) as f32
        } else {
            0.0
        };
        let slide = self.solve(columns as f32, weight, content, max_content);

        let x = left + slide.filler.round() as i64;
        let width = slide.content_width.floor() as i64;
        let title_attrs = if view.focused == Some(node.id) {
            Attr::INVERSE | Attr::BOLD
        } else {
            Attr::BOLD
        };

        if width < 2 * ARROW_COLUMNS + 1 {
            let room = width.max(0) as u16;
            let title = truncate_text(&header.title, room);
            let span = truncate_text(&header.span_text, room);
            draw_signed(frame.buf, x, screen_top, &title, palette.text, title_attrs, clip);
            draw_signed(frame.buf, x, screen_top + 1, &span, palette.tint, Attr::NONE, clip);
            return;
        }

        let room = (width - 2 * ARROW_COLUMNS) as u16;
        let title = truncate_text(&header.title, room);
        let span = truncate_text(&header.span_text, room);
        let text_x = x + ARROW_COLUMNS;
        draw_signed(frame.buf, text_x, screen_top, &title, palette.text, title_attrs, clip);
        draw_signed(frame.buf, text_x, screen_top + 1, &span, palette.tint, Attr::NONE, clip);

        let forward_x = x + width - 1;
        for (control, arrow, at, part) in [
            (header.back, BACK_ARROW, x, HitPart::SkipBackward),
            (header.forward, FORWARD_ARROW, forward_x, HitPart::SkipForward),
        ] {
            if let SkipControl::Button { .. } = control {
                draw_signed(frame.buf, at, screen_top, arrow, palette.text, Attr::NONE, clip);
                if let Some(cell) = signed_rect(at, screen_top, 1, 1, clip) {
                    let hit = Hit {
                        node: node.id,
                        part,
                    };
                    frame.hits.fill_rect(cell.x, cell.y, 1, 1, hit);
                }
            }
        }
    }

    fn solve(&mut self, container: f32, weight: f32, content: f32, max: f32) -> SlideLayout {
        match self.solver.as_mut() {
            Some(solver) => solver.solve(container, weight, content, max),
            None => slide_fallback(container, weight, content, max),
        }
    }
}

/// Mutable state threaded through one paint pass.
struct Frame<'v, 'p> {
    view: &'v PaintView<'p>,
    area: ClipRect,
    buf: &'v mut FrameBuffer,
    hits: &'v mut HitGrid,
    heights: &'v HashMap<NodeId, i64>,
    out: PaintOutput,
}

/// Box height (without margin) of `node`, recording every subtree's height.
pub fn measure(node: &RenderNode, heights: &mut HashMap<NodeId, i64>) -> i64 {
    let mut height = HEADER_ROWS;
    for row in &node.rows {
        let mut row_height = 0;
        for item in row {
            if let RowItem::Node(child) = item {
                row_height = row_height.max(measure(child, heights) + BOX_MARGIN);
            }
        }
        height += row_height;
    }
    heights.insert(node.id, height);
    height
}

fn signed_rect(x: i64, y: i64, width: i64, height: i64, bounds: &ClipRect) -> Option<ClipRect> {
    // Keep the sums inside i32 for from_signed.
    let limit = i32::MAX as i64 / 4;
    let c = |v: i64| v.clamp(-limit, limit) as i32;
    ClipRect::from_signed(c(x), c(y), c(width), c(height), bounds)
}

/// Draw text starting at a possibly negative column; characters left of
/// column 0 are dropped.
fn draw_signed(
    buf: &mut FrameBuffer,
    x: i64,
    y: i64,
    text: &str,
    fg: Rgba,
    attrs: Attr,
    clip: &ClipRect,
) {
    let Ok(y) = u16::try_from(y) else {
        return;
    };

    let mut col = x;
    let mut rest = text;
    for (i, ch) in text.char_indices() {
        if col >= 0 {
            break;
        }
        col += char_width(ch) as i64;
        rest = &text[i + ch.len_utf8()..];
    }

    if let Ok(col) = u16::try_from(col) {
        buf.draw_text(col, y, rest, fg, attrs, Some(clip));
    }
}

// =============================================================================
// Tests
// =============================================================================
