//! Renderer - cells to terminal.
//!
//! ```text
//! RenderNode ──paint──→ FrameBuffer ──diff──→ crossterm commands
//!                 └──→ HitGrid (mouse)
//! ```
//!
//! The painter is the only code that knows about node boxes. The buffer and
//! the diff renderer only know cells.

mod buffer;
mod diff;
mod paint;

pub use buffer::FrameBuffer;
pub use diff::DiffRenderer;
pub use paint::{BOX_MARGIN, HEADER_ROWS, PaintOutput, PaintView, Painter, measure};
