//! Viewport visibility.
//!
//! A node counts as visible while any part of it could be on screen, with a
//! lead-in of one full viewport width before its start:
//!
//! ```text
//!              start - width        start              end
//! scroll_x ─────────[=====================================]─────────
//!                    visible from here       ...through end
//! ```

use crate::engine::Span;

/// True iff `scroll_x` lies in `[span.start - viewport_width, span.end]`.
#[inline]
pub fn is_visible(scroll_x: f64, span: Span, viewport_width: f64) -> bool {
    let begin = span.start as f64 - viewport_width;
    let end = span.end as f64;
    scroll_x >= begin && scroll_x <= end
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_examples() {
        let span = Span::new(100, 200);
        assert!(!is_visible(0.0, span, 50.0));
        assert!(is_visible(60.0, span, 50.0));
    }

    #[test]
    fn test_bounds_inclusive() {
        let span = Span::new(100, 200);
        assert!(is_visible(50.0, span, 50.0));
        assert!(!is_visible(49.9, span, 50.0));
        assert!(is_visible(200.0, span, 50.0));
        assert!(!is_visible(200.1, span, 50.0));
    }

    #[test]
    fn test_zero_width_viewport() {
        let span = Span::new(100, 200);
        assert!(!is_visible(99.0, span, 0.0));
        assert!(is_visible(100.0, span, 0.0));
    }

    proptest! {
        #[test]
        fn prop_matches_interval(
            start in -10_000i64..10_000,
            len in 0i64..5_000,
            width in 0.0f64..2_000.0,
            scroll in -20_000.0f64..20_000.0,
        ) {
            let span = Span::new(start, start + len);
            let inside = scroll >= start as f64 - width && scroll <= (start + len) as f64;
            prop_assert_eq!(is_visible(scroll, span, width), inside);
        }
    }
}
