//! Grapheme cluster advance classification.
//!
//! `egc_width` returns how many monospace cells a grapheme cluster occupies.
//! Proportional hosts ignore it; the headless monospace layout multiplies it
//! by the font's cell advance.
//!
//! Invariants:
//! - All cell-width decisions flow through `egc_width`.
//! - Classifier favors over-estimation for emoji composites. Under-estimation
//!   drifts every caret after the cluster; over-estimation only pads.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EgcKind {
    Narrow,
    Wide,
    Emoji,
    /// Base + combining mark(s); bool indicates a wide or emoji base.
    Combining(bool),
    Zero,
}

const ZWJ: char = '\u{200D}';

fn is_regional_indicator(c: char) -> bool {
    ('\u{1F1E6}'..='\u{1F1FF}').contains(&c)
}

// Rough Extended Pictographic heuristic (main emoji blocks + misc symbols/dingbats).
fn is_extended_pictographic(c: char) -> bool {
    ('\u{1F300}'..='\u{1FAFF}').contains(&c) || ('\u{2600}'..='\u{27BF}').contains(&c)
}

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
        || ('\u{1AB0}'..='\u{1AFF}').contains(&c)
        || ('\u{1DC0}'..='\u{1DFF}').contains(&c)
        || ('\u{20D0}'..='\u{20FF}').contains(&c)
        || ('\u{FE20}'..='\u{FE2F}').contains(&c)
}

fn char_cells(c: char) -> usize {
    unicode_width::UnicodeWidthChar::width(c).unwrap_or(0)
}

fn classify(egc: &str) -> EgcKind {
    let mut chars = egc.chars();
    let Some(first) = chars.next() else {
        return EgcKind::Zero;
    };
    if chars.as_str().is_empty() {
        if first == '\n' || first == '\r' || first == '\t' {
            return EgcKind::Narrow;
        }
        if is_extended_pictographic(first) {
            return EgcKind::Emoji;
        }
        return match char_cells(first) {
            0 => EgcKind::Zero,
            2 => EgcKind::Wide,
            _ => EgcKind::Narrow,
        };
    }

    let mut pictographic = 0usize;
    let mut regional = 0usize;
    let mut has_zwj = false;
    let mut has_combining = false;
    let mut any_wide = false;
    for c in egc.chars() {
        if is_extended_pictographic(c) {
            pictographic += 1;
        }
        if is_regional_indicator(c) {
            regional += 1;
        }
        has_zwj |= c == ZWJ;
        has_combining |= is_combining_mark(c);
        any_wide |= char_cells(c) == 2;
    }

    if regional == 2 || pictographic >= 1 || (has_zwj && pictographic >= 2) {
        return EgcKind::Emoji;
    }
    if has_combining {
        return EgcKind::Combining(is_extended_pictographic(first) || char_cells(first) == 2);
    }
    if any_wide {
        return EgcKind::Wide;
    }
    EgcKind::Narrow
}

/// Monospace cell count for a single grapheme cluster.
///
/// Precondition: `egc` is one grapheme cluster; callers segment first.
/// Control characters other than tab/newline count as zero.
#[inline]
pub fn egc_width(egc: &str) -> u16 {
    match classify(egc) {
        EgcKind::Zero => 0,
        EgcKind::Narrow | EgcKind::Combining(false) => 1,
        EgcKind::Wide | EgcKind::Emoji | EgcKind::Combining(true) => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_and_cjk() {
        assert_eq!(egc_width("a"), 1);
        assert_eq!(egc_width(" "), 1);
        assert_eq!(egc_width("漢"), 2);
    }

    #[test]
    fn emoji_composites_are_wide() {
        assert_eq!(egc_width("😀"), 2);
        assert_eq!(egc_width("👍🏽"), 2);
        assert_eq!(egc_width("🇺🇸"), 2);
        assert_eq!(egc_width("👨\u{200D}👩\u{200D}👧"), 2);
    }

    #[test]
    fn combining_follows_base() {
        assert_eq!(egc_width("e\u{0301}"), 1);
        assert_eq!(egc_width(""), 0);
    }
}
