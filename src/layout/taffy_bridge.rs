//! Taffy Bridge - header row layout.
//!
//! Every node header is a flex row inside the node's own width:
//!
//! ```text
//! | filler (flex_grow = weight) | content (width = text, max = 80% window) |
//! ```
//!
//! The filler's resolved width is the content's offset from the node's left
//! edge. Taffy resolves the row, so a fractional weight only claims that
//! fraction of the free space, and content wider than the node shrinks to
//! fit.

use taffy::{
    AvailableSpace, Dimension, FlexDirection, NodeId, Size, Style, TaffyError, TaffyTree,
};

/// Content may take at most this share of the viewport width.
pub const CONTENT_MAX_SHARE: f32 = 0.8;

/// Resolved header row, in columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideLayout {
    /// Width of the leading filler, which is also the content's x offset.
    pub filler: f32,
    /// Width left for the content.
    pub content_width: f32,
}

/// Reusable three-node taffy tree for header rows.
///
/// Nodes are created once; each [`solve`](Self::solve) only swaps styles
/// and recomputes.
pub struct SlideSolver {
    tree: TaffyTree<()>,
    row: NodeId,
    filler: NodeId,
    content: NodeId,
}

impl SlideSolver {
    pub fn new() -> Result<Self, TaffyError> {
        let mut tree = TaffyTree::new();
        let filler = tree.new_leaf(Style::default())?;
        let content = tree.new_leaf(Style::default())?;
        let row = tree.new_with_children(Style::default(), &[filler, content])?;
        Ok(Self {
            tree,
            row,
            filler,
            content,
        })
    }

    /// Lay out one header row.
    ///
    /// Falls back to the closed-form result if taffy reports an error.
    pub fn solve(
        &mut self,
        container_width: f32,
        weight: f32,
        content_width: f32,
        max_content_width: f32,
    ) -> SlideLayout {
        match self.try_solve(container_width, weight, content_width, max_content_width) {
            Ok(layout) => layout,
            Err(err) => {
                tracing::warn!(%err, "taffy header layout failed, using fallback");
                slide_fallback(container_width, weight, content_width, max_content_width)
            }
        }
    }

    fn try_solve(
        &mut self,
        container_width: f32,
        weight: f32,
        content_width: f32,
        max_content_width: f32,
    ) -> Result<SlideLayout, TaffyError> {
        let container_width = container_width.max(0.0);

        self.tree.set_style(
            self.row,
            Style {
                flex_direction: FlexDirection::Row,
                size: Size {
                    width: Dimension::Length(container_width),
                    height: Dimension::Auto,
                },
                ..Default::default()
            },
        )?;

        self.tree.set_style(
            self.filler,
            Style {
                flex_grow: weight.clamp(0.0, 1.0),
                flex_shrink: 0.0,
                flex_basis: Dimension::Length(0.0),
                ..Default::default()
            },
        )?;

        self.tree.set_style(
            self.content,
            Style {
                flex_grow: 0.0,
                flex_shrink: 1.0,
                size: Size {
                    width: Dimension::Length(content_width.max(0.0)),
                    height: Dimension::Auto,
                },
                max_size: Size {
                    width: Dimension::Length(max_content_width.max(0.0)),
                    height: Dimension::Auto,
                },
                ..Default::default()
            },
        )?;

        self.tree.compute_layout(
            self.row,
            Size {
                width: AvailableSpace::Definite(container_width),
                height: AvailableSpace::MaxContent,
            },
        )?;

        Ok(SlideLayout {
            filler: self.tree.layout(self.filler)?.size.width,
            content_width: self.tree.layout(self.content)?.size.width,
        })
    }
}

/// Closed form of the same row: the filler takes `weight` of the space left
/// after the (clamped) content.
pub fn slide_fallback(
    container_width: f32,
    weight: f32,
    content_width: f32,
    max_content_width: f32,
) -> SlideLayout {
    let container_width = container_width.max(0.0);
    let content = content_width.min(max_content_width).clamp(0.0, container_width);
    let free = container_width - content;
    SlideLayout {
        filler: (free * weight.clamp(0.0, 1.0)).round(),
        content_width: content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> SlideSolver {
        SlideSolver::new().unwrap()
    }

    #[test]
    fn test_weight_zero_pins_left() {
        let mut solver = setup();
        let layout = solver.solve(100.0, 0.0, 20.0, 80.0);
        assert_eq!(layout.filler, 0.0);
        assert_eq!(layout.content_width, 20.0);
    }

    #[test]
    fn test_weight_one_pins_right() {
        let mut solver = setup();
        let layout = solver.solve(100.0, 1.0, 20.0, 80.0);
        assert_eq!(layout.filler, 80.0);
        assert_eq!(layout.content_width, 20.0);
    }

    #[test]
    fn test_fractional_weight_takes_share_of_free_space() {
        let mut solver = setup();
        let layout = solver.solve(100.0, 0.5, 20.0, 80.0);
        assert!((layout.filler - 40.0).abs() <= 1.0, "{layout:?}");
    }

    #[test]
    fn test_content_capped_by_max_width() {
        let mut solver = setup();
        let layout = solver.solve(200.0, 0.0, 150.0, 64.0);
        assert_eq!(layout.content_width, 64.0);
    }

    #[test]
    fn test_content_shrinks_to_container() {
        let mut solver = setup();
        let layout = solver.solve(10.0, 1.0, 30.0, 80.0);
        assert_eq!(layout.filler, 0.0);
        assert_eq!(layout.content_width, 10.0);
    }

    #[test]
    fn test_solver_reusable() {
        let mut solver = setup();
        let first = solver.solve(100.0, 1.0, 20.0, 80.0);
        let _ = solver.solve(30.0, 0.0, 5.0, 80.0);
        let again = solver.solve(100.0, 1.0, 20.0, 80.0);
        assert_eq!(first, again);
    }

    #[test]
    fn test_fallback_matches_endpoints() {
        assert_eq!(slide_fallback(100.0, 0.0, 20.0, 80.0).filler, 0.0);
        assert_eq!(slide_fallback(100.0, 1.0, 20.0, 80.0).filler, 80.0);
        assert_eq!(slide_fallback(100.0, 0.5, 20.0, 80.0).filler, 40.0);
        assert_eq!(slide_fallback(10.0, 1.0, 30.0, 80.0).content_width, 10.0);
    }
}
