//! Scroll Animation - frame-stepped easing for skip jumps.
//!
//! A skip moves the horizontal scroll to a target over a fixed number of
//! frames instead of jumping. The animation only produces positions; the
//! [`ScrollController`](super::viewport::ScrollController) applies them and
//! drops the animation as soon as anything else writes the scroll.
//!
//! # Pattern
//!
//! ```ignore
//! let mut anim = ScrollAnimation::new(0.0, 480.0, 12);
//! while let Some(x) = anim.step() {
//!     scroll.set(x);
//! }
//! ```

/// Default length of a skip animation in frames (about 200ms at 60fps).
pub const DEFAULT_FRAMES: u32 = 12;

/// Ease-out cubic: fast start, gentle landing.
#[inline]
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// In-flight animation from one scroll position to another.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollAnimation {
    from: f64,
    to: f64,
    frames: u32,
    frame: u32,
}

impl ScrollAnimation {
    /// A zero frame count finishes on the first step.
    pub fn new(from: f64, to: f64, frames: u32) -> Self {
        Self {
            from,
            to,
            frames: frames.max(1),
            frame: 0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.frame >= self.frames
    }

    /// Advance one frame. Returns the new position, or `None` once finished.
    ///
    /// The last step always lands exactly on the target.
    pub fn step(&mut self) -> Option<f64> {
        if self.is_finished() {
            return None;
        }
        self.frame += 1;

        if self.is_finished() {
            return Some(self.to);
        }
        let t = self.frame as f64 / self.frames as f64;
        Some(self.from + (self.to - self.from) * ease_out_cubic(t))
    }
}
