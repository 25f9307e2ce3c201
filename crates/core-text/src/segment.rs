//! Grapheme segmentation adapter.
//!
//! Contract:
//! - Output segments are in order, non-overlapping, and concatenate back to
//!   the input exactly. No normalization is applied: host selection offsets
//!   index the widget's text as-is, and NFC would shift them.
//! - Each segment carries its byte range and its character range so layout
//!   code can map host character offsets onto clusters.
//! - Does not log content.

use unicode_segmentation::UnicodeSegmentation;

use crate::egc_width;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub cluster: &'a str,
    pub byte_start: usize,
    /// Character offset of the cluster's first scalar value.
    pub char_start: usize,
    pub chars: usize,
    /// Monospace cell width.
    pub width: u16,
}

impl Segment<'_> {
    pub fn char_end(&self) -> usize {
        self.char_start + self.chars
    }

    pub fn is_newline(&self) -> bool {
        self.cluster == "\n" || self.cluster == "\r\n"
    }

    pub fn is_whitespace(&self) -> bool {
        self.cluster.chars().all(char::is_whitespace)
    }
}

/// Segment `input` into extended grapheme clusters.
pub fn segments(input: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut char_start = 0usize;
    for (byte_start, g) in input.grapheme_indices(true) {
        let chars = g.chars().count();
        out.push(Segment {
            cluster: g,
            byte_start,
            char_start,
            chars,
            width: egc_width(g),
        });
        char_start += chars;
    }
    out
}
