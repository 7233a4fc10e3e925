//! Sliding edge pin.
//!
//! Header content sits after a leading filler inside the node's row. The
//! filler's flex-grow weight moves the content from the node's left edge
//! (weight 0) to its right edge (weight 1) as the viewport scrolls across
//! the node, so a wide node's label stays pinned at the viewport's left edge
//! instead of scrolling out of view.
//!
//! Wide node (`to - from >= window`): weight rises from 0 to 1 while
//! `scroll_x` goes from `from` to `to - window`.
//!
//! Narrow node (`to - from < window`): weight rises from 0 to 1 while
//! `scroll_x` goes from `to - window` up to `from`, so the label does not
//! jump when the node enters or leaves.

/// Leading filler weight in `[0, 1]`.
///
/// `0` when the node lies entirely outside `[scroll_x, scroll_x + window]`.
pub fn sliding_fill_weight(from: f64, to: f64, window: f64, scroll_x: f64) -> f64 {
    if scroll_x + window < from || scroll_x > to {
        return 0.0;
    }

    let delta = (to - from) - window;
    let scale = if delta == 0.0 {
        0.0
    } else {
        ((scroll_x - from) / delta).clamp(0.0, 1.0)
    };

    if delta >= 0.0 { scale } else { 1.0 - scale }
}
