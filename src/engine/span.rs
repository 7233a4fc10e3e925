//! Axis spans.
//!
//! Every composition node occupies a half-open `[start, end)` interval on a
//! single shared axis. Positions are absolute, never relative to the parent.

use crate::document::CompositionNode;

/// A half-open `[start, end)` interval on the composition axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: i64,
    pub end: i64,
}

impl Span {
    /// Create a new span.
    pub const fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Length of the span. Negative when the span is malformed (`start > end`).
    #[inline]
    pub const fn width(&self) -> i64 {
        self.end - self.start
    }

    /// True when `other` lies entirely within this span.
    #[inline]
    pub const fn contains(&self, other: &Span) -> bool {
        other.start >= self.start && other.end <= self.end
    }
}

/// Anything that occupies a span on the composition axis.
pub trait HasSpan {
    fn span(&self) -> Span;
}

impl HasSpan for Span {
    fn span(&self) -> Span {
        *self
    }
}

impl HasSpan for CompositionNode {
    fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }
}

impl<T: HasSpan + ?Sized> HasSpan for &T {
    fn span(&self) -> Span {
        (**self).span()
    }
}
