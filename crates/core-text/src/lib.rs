//! Text buffer helpers for selection offsets.
//!
//! Selection ranges arrive from the host as character offsets (Unicode scalar
//! values), not bytes. Everything that slices widget text goes through the
//! helpers here so out-of-range or inverted offsets are clamped in one place
//! instead of panicking on a char boundary.

pub mod segment;
pub mod width;

pub use segment::{Segment, segments};
pub use width::egc_width;

/// Number of characters (Unicode scalar values) in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte index of the character at `char_idx`, clamped to `text.len()`.
pub fn byte_offset(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(b, _)| b)
        .unwrap_or(text.len())
}

/// Slice `text` by character offsets `[start, end)`.
///
/// Offsets past the end clamp to the end; an inverted range yields `""`.
pub fn slice_chars(text: &str, start: usize, end: usize) -> &str {
    if end <= start {
        return "";
    }
    let b_start = byte_offset(text, start);
    let b_end = byte_offset(text, end);
    &text[b_start..b_end]
}

/// Split `text` around a selection, returning `(before, selected)`.
///
/// `before` is `text[0:start]` and `selected` is `text[start:end]`, both in
/// character offsets.
pub fn split_selection(text: &str, start: usize, end: usize) -> (&str, &str) {
    let b_start = byte_offset(text, start);
    (&text[..b_start], slice_chars(text, start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn slices_ascii() {
        assert_eq!(slice_chars("Hello world", 0, 5), "Hello");
        assert_eq!(slice_chars("Hello world", 6, 11), "world");
    }

    #[test]
    fn slices_multibyte_by_chars() {
        let s = "héllo wörld";
        assert_eq!(slice_chars(s, 1, 4), "éll");
        assert_eq!(split_selection(s, 6, 11), ("héllo ", "wörld"));
    }

    #[test]
    fn clamps_out_of_range_and_inverted() {
        assert_eq!(slice_chars("abc", 1, 99), "bc");
        assert_eq!(slice_chars("abc", 2, 1), "");
        assert_eq!(split_selection("abc", 7, 9), ("abc", ""));
    }

    proptest! {
        #[test]
        fn split_concatenates_to_prefix(s in "\\PC{0,40}", a in 0usize..50, len in 0usize..20) {
            let (before, selected) = split_selection(&s, a, a + len);
            let n = char_len(&s);
            let expect: String = s.chars().take((a + len).min(n)).collect();
            prop_assert_eq!(format!("{before}{selected}"), expect);
            prop_assert_eq!(char_len(selected), (a + len).min(n).saturating_sub(a.min(n)));
        }
    }
}
