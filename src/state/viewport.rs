//! Viewport State - shared scroll position and size.
//!
//! One writer, many readers:
//! - [`ScrollController`] owns every write to the scroll and size signals.
//! - [`ViewportHandle`] is a cheap clone handed to every node instance; it
//!   can only read.
//!
//! Horizontal values are in axis units (the same units as node spans), so a
//! node's visibility compares its span directly against `scroll_x`.
//! Vertical values are in terminal rows.
//!
//! Reading through the handle inside a derived creates the dependency, so
//! every visibility derived re-checks on each scroll write.

use spark_signals::{Signal, signal};

use super::animate::ScrollAnimation;
use crate::engine::Span;

/// Read-only view of the shared viewport signals.
#[derive(Clone)]
pub struct ViewportHandle {
    scroll_x: Signal<f64>,
    scroll_y: Signal<f64>,
    width: Signal<f64>,
    height: Signal<f64>,
}

impl ViewportHandle {
    /// Left edge of the viewport on the axis.
    pub fn scroll_x(&self) -> f64 {
        self.scroll_x.get()
    }

    /// First visible content row.
    pub fn scroll_y(&self) -> f64 {
        self.scroll_y.get()
    }

    /// Viewport width in axis units.
    pub fn width(&self) -> f64 {
        self.width.get()
    }

    /// Viewport height in rows.
    pub fn height(&self) -> f64 {
        self.height.get()
    }
}

/// Sole writer of the viewport signals.
pub struct ScrollController {
    handle: ViewportHandle,
    content: Span,
    content_height: f64,
    animation: Option<ScrollAnimation>,
    animation_frames: u32,
}

impl ScrollController {
    pub fn new(width: f64, height: f64, animation_frames: u32) -> Self {
        let handle = ViewportHandle {
            scroll_x: signal(0.0),
            scroll_y: signal(0.0),
            width: signal(width.max(0.0)),
            height: signal(height.max(0.0)),
        };
        Self {
            handle,
            content: Span::default(),
            content_height: 0.0,
            animation: None,
            animation_frames,
        }
    }

    /// A new read-only handle onto the same signals.
    pub fn handle(&self) -> ViewportHandle {
        self.handle.clone()
    }

    pub fn scroll_x(&self) -> f64 {
        self.handle.scroll_x()
    }

    pub fn width(&self) -> f64 {
        self.handle.width()
    }

    // =========================================================================
    // Horizontal
    // =========================================================================

    /// Set the horizontal content range and reset the scroll to its start.
    pub fn set_content(&mut self, content: Span) {
        self.content = content;
        self.animation = None;
        self.handle.scroll_x.set(self.clamp_x(content.start as f64));
    }

    /// Jump to `x`, cancelling any running animation.
    pub fn set_scroll(&mut self, x: f64) {
        self.animation = None;
        self.write_x(x);
    }

    /// Scroll by `dx` axis units, cancelling any running animation.
    pub fn scroll_by(&mut self, dx: f64) {
        let x = self.handle.scroll_x.get() + dx;
        self.set_scroll(x);
    }

    /// Start an animated scroll to `target`. Replaces a running animation.
    pub fn animate_to(&mut self, target: f64) {
        let from = self.handle.scroll_x.get();
        let to = self.clamp_x(target);
        if from == to {
            self.animation = None;
            return;
        }
        tracing::debug!(from, to, "animating scroll");
        self.animation = Some(ScrollAnimation::new(from, to, self.animation_frames));
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Advance the running animation by one frame.
    ///
    /// Returns true while the scroll moved.
    pub fn tick(&mut self) -> bool {
        let Some(animation) = self.animation.as_mut() else {
            return false;
        };

        match animation.step() {
            Some(x) => {
                self.write_x(x);
                true
            }
            None => {
                self.animation = None;
                false
            }
        }
    }

    /// Resize the viewport. Width in axis units, height in rows.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.handle.width.set(width.max(0.0));
        self.handle.height.set(height.max(0.0));
        let x = self.handle.scroll_x.get();
        self.write_x(x);
        let y = self.handle.scroll_y.get();
        self.write_y(y);
    }

    fn write_x(&mut self, x: f64) {
        let x = self.clamp_x(x);
        if self.handle.scroll_x.get() != x {
            self.handle.scroll_x.set(x);
        }
    }

    fn clamp_x(&self, x: f64) -> f64 {
        let min = self.content.start as f64;
        let max = (self.content.end as f64 - self.handle.width.get()).max(min);
        if x.is_nan() { min } else { x.clamp(min, max) }
    }

    // =========================================================================
    // Vertical
    // =========================================================================

    /// Set the total content height in rows, keeping the scroll in range.
    pub fn set_content_height(&mut self, rows: f64) {
        self.content_height = rows.max(0.0);
        let y = self.handle.scroll_y.get();
        self.write_y(y);
    }

    pub fn scroll_y_by(&mut self, dy: f64) {
        let y = self.handle.scroll_y.get() + dy;
        self.write_y(y);
    }

    /// Scroll vertically just enough to bring rows `top..bottom` into view.
    pub fn reveal_rows(&mut self, top: f64, bottom: f64) {
        let y = self.handle.scroll_y.get();
        let height = self.handle.height.get();
        if top < y {
            self.write_y(top);
        } else if bottom > y + height {
            self.write_y(bottom - height);
        }
    }

    fn write_y(&mut self, y: f64) {
        let max = (self.content_height - self.handle.height.get()).max(0.0);
        let y = if y.is_nan() { 0.0 } else { y.clamp(0.0, max) };
        if self.handle.scroll_y.get() != y {
            self.handle.scroll_y.set(y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> ScrollController {
        let mut scroll = ScrollController::new(100.0, 10.0, 4);
        scroll.set_content(Span::new(0, 1000));
        scroll
    }

    #[test]
    fn test_handle_reads_writes() {
        let mut scroll = setup();
        let handle = scroll.handle();

        scroll.set_scroll(250.0);
        assert_eq!(handle.scroll_x(), 250.0);
        assert_eq!(handle.width(), 100.0);
    }

    #[test]
    fn test_scroll_clamped_to_content() {
        let mut scroll = setup();
        scroll.set_scroll(-50.0);
        assert_eq!(scroll.scroll_x(), 0.0);
        scroll.set_scroll(5000.0);
        assert_eq!(scroll.scroll_x(), 900.0);
        scroll.set_scroll(f64::NAN);
        assert_eq!(scroll.scroll_x(), 0.0);
    }

    #[test]
    fn test_content_narrower_than_viewport() {
        let mut scroll = ScrollController::new(2000.0, 10.0, 4);
        scroll.set_content(Span::new(100, 1000));
        scroll.set_scroll(500.0);
        assert_eq!(scroll.scroll_x(), 100.0);
    }

    #[test]
    fn test_animation_reaches_target() {
        let mut scroll = setup();
        scroll.animate_to(400.0);

        let mut frames = 0;
        while scroll.tick() {
            frames += 1;
        }
        assert_eq!(frames, 4);
        assert_eq!(scroll.scroll_x(), 400.0);
        assert!(!scroll.is_animating());
    }

    #[test]
    fn test_animation_target_clamped() {
        let mut scroll = setup();
        scroll.set_scroll(300.0);
        scroll.animate_to(300.0 - 1000.0);
        while scroll.tick() {}
        assert_eq!(scroll.scroll_x(), 0.0);
    }

    #[test]
    fn test_manual_scroll_supersedes_animation() {
        let mut scroll = setup();
        scroll.animate_to(800.0);
        assert!(scroll.tick());

        scroll.scroll_by(10.0);
        let after_manual = scroll.scroll_x();

        assert!(!scroll.is_animating());
        assert!(!scroll.tick());
        assert_eq!(scroll.scroll_x(), after_manual);
    }

    #[test]
    fn test_resize_reclamps() {
        let mut scroll = setup();
        scroll.set_scroll(900.0);
        scroll.resize(200.0, 10.0);
        assert_eq!(scroll.scroll_x(), 800.0);
    }

    #[test]
    fn test_vertical_scroll_and_reveal() {
        let mut scroll = setup();
        let handle = scroll.handle();
        scroll.set_content_height(30.0);

        scroll.scroll_y_by(100.0);
        assert_eq!(handle.scroll_y(), 20.0);

        scroll.reveal_rows(2.0, 4.0);
        assert_eq!(handle.scroll_y(), 2.0);

        scroll.reveal_rows(15.0, 18.0);
        assert_eq!(handle.scroll_y(), 8.0);

        scroll.set_content_height(5.0);
        assert_eq!(handle.scroll_y(), 0.0);
    }
}
