//! Text Measurement
//!
//! Display width of header text in terminal cells, via `unicode-width`:
//! - ASCII characters: 1 cell
//! - CJK characters and most emoji: 2 cells
//! - Combining marks and other zero-width characters: 0 cells
//! - Control characters: 0 cells (never drawn)

use unicode_width::UnicodeWidthChar;

/// Width of one character in cells.
#[inline]
pub fn char_width(c: char) -> u16 {
    if c.is_control() {
        0
    } else {
        c.width().unwrap_or(0) as u16
    }
}

/// Measure the display width of a string in terminal cells.
pub fn string_width(s: &str) -> u16 {
    s.chars()
        .fold(0u16, |width, c| width.saturating_add(char_width(c)))
}

/// Truncate `text` to at most `width` cells.
///
/// Text that does not fit loses its tail, and the last cell becomes an
/// ellipsis. A wide character that would straddle the limit is dropped
/// whole.
pub fn truncate_text(text: &str, width: u16) -> String {
    if width == 0 {
        return String::new();
    }

    if string_width(text) <= width {
        return text.to_string();
    }

    let target_width = width - 1;
    let mut result = String::new();
    let mut current_width = 0u16;

    for c in text.chars() {
        let w = char_width(c);
        if current_width + w > target_width {
            break;
        }
        result.push(c);
        current_width += w;
    }

    result.push('…');
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_width_ascii() {
        assert_eq!(string_width("Part(lead)"), 10);
        assert_eq!(string_width(""), 0);
        assert_eq!(string_width("0..1000"), 7);
    }

    #[test]
    fn test_string_width_wide_and_control() {
        assert_eq!(string_width("音楽"), 4);
        assert_eq!(string_width("a\tb"), 2);
        // e + combining acute
        assert_eq!(string_width("e\u{301}"), 1);
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("hello", 10), "hello");
        assert_eq!(truncate_text("hello world", 6), "hello…");
        assert_eq!(truncate_text("", 5), "");
        assert_eq!(truncate_text("hello", 0), "");
    }

    #[test]
    fn test_truncate_text_exact() {
        assert_eq!(truncate_text("hello", 5), "hello");
        assert_eq!(truncate_text("hello", 4), "hel…");
        assert_eq!(truncate_text("hello", 1), "…");
    }

    #[test]
    fn test_truncate_wide_char_not_split() {
        // "音" needs 2 cells; only 1 is left before the ellipsis.
        assert_eq!(truncate_text("a音楽", 3), "a…");
        assert_eq!(string_width(&truncate_text("音楽音楽", 5)), 5);
    }
}
