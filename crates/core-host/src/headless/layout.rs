//! Monospace line layout for headless mirrors.
//!
//! Deterministic stand-in for a platform text engine. Every grapheme cluster
//! advances `egc_width * font_size * CELL_ADVANCE_EM`, plus letter spacing per
//! cluster and word spacing per U+0020. Lines are `resolved_line_height()`
//! tall. Wrapping is greedy at word boundaries when `white_space` wraps;
//! whitespace hangs past the edge instead of wrapping (pre-wrap behavior).
//! Overlong words are split per cluster when `overflow_wrap` or `word_break`
//! allow it.
//!
//! Coordinates in `MirrorLayout` are relative to the mirror's border-box
//! top-left corner.

use core_geometry::{OverflowWrap, Rect, TextTransform, WordBreak};
use core_text::{Segment, segments};
use smallvec::SmallVec;

use crate::MirrorStyle;

/// Cell advance as a fraction of font size (half-em monospace).
pub const CELL_ADVANCE_EM: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct MirrorLayout {
    /// Border box of the mirror container (height grows with content).
    pub border_box: Rect,
    /// Union of the marker's fragment boxes.
    pub marker: Rect,
    pub lines: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Newline,
    Space,
    Word,
}

struct Token {
    kind: TokenKind,
    segs: std::ops::Range<usize>,
}

fn transform(text: &str, tt: TextTransform) -> String {
    match tt {
        TextTransform::None => text.to_string(),
        TextTransform::Uppercase => text.to_uppercase(),
        TextTransform::Lowercase => text.to_lowercase(),
    }
}

fn tokenize(segs: &[Segment<'_>], word_break: WordBreak) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::new();
    for (i, seg) in segs.iter().enumerate() {
        let kind = if seg.is_newline() {
            TokenKind::Newline
        } else if seg.is_whitespace() {
            TokenKind::Space
        } else {
            TokenKind::Word
        };
        let extend = match (out.last(), kind) {
            (Some(last), TokenKind::Space) => last.kind == TokenKind::Space,
            (Some(last), TokenKind::Word) => {
                last.kind == TokenKind::Word && word_break != WordBreak::BreakAll
            }
            _ => false,
        };
        if extend {
            if let Some(last) = out.last_mut() {
                last.segs.end = i + 1;
                continue;
            }
        }
        out.push(Token {
            kind,
            segs: i..i + 1,
        });
    }
    out
}

struct Placer {
    content_left: f64,
    content_top: f64,
    content_width: f64,
    line_height: f64,
    wraps: bool,
    x: f64,
    line: usize,
    line_has_content: bool,
    marker_byte: usize,
    marker_boxes: SmallVec<[Rect; 4]>,
}

impl Placer {
    fn break_line(&mut self) {
        self.x = 0.0;
        self.line += 1;
        self.line_has_content = false;
    }

    fn place(&mut self, seg: &Segment<'_>, advance: f64) {
        // A cluster split by the marker boundary belongs to the marker.
        if seg.byte_start + seg.cluster.len() > self.marker_byte {
            self.marker_boxes.push(Rect::new(
                self.content_left + self.x,
                self.content_top + self.line as f64 * self.line_height,
                advance,
                self.line_height,
            ));
        }
        self.x += advance;
        self.line_has_content = true;
    }

    fn overflows(&self, advance: f64) -> bool {
        self.wraps && self.line_has_content && self.x + advance > self.content_width
    }

    fn caret_box(&self) -> Rect {
        Rect::new(
            self.content_left + self.x,
            self.content_top + self.line as f64 * self.line_height,
            0.0,
            self.line_height,
        )
    }
}

/// Lay out `before` followed by a marker wrapping `marker` under `style`.
pub fn layout_mirror(style: &MirrorStyle, before: &str, marker: &str) -> MirrorLayout {
    let text = &style.text;
    let content_width = match text.box_sizing {
        core_geometry::BoxSizing::BorderBox => text.content_width(style.width),
        core_geometry::BoxSizing::ContentBox => style.width.max(0.0),
    };
    let cell = text.font_size * CELL_ADVANCE_EM;
    let line_height = text.resolved_line_height();

    let before = transform(before, text.text_transform);
    let marker = transform(marker, text.text_transform);
    let marker_byte = before.len();
    let full = format!("{before}{marker}");
    let segs = segments(&full);

    let advance = |seg: &Segment<'_>| -> f64 {
        if seg.is_newline() {
            return 0.0;
        }
        let mut adv = f64::from(seg.width) * cell + text.letter_spacing;
        if seg.cluster == " " {
            adv += text.word_spacing;
        }
        adv
    };
    let splittable = text.overflow_wrap != OverflowWrap::Normal || text.word_break == WordBreak::BreakAll;

    let mut placer = Placer {
        content_left: text.border.left + text.padding.left,
        content_top: text.border.top + text.padding.top,
        content_width,
        line_height,
        wraps: text.white_space.wraps(),
        x: text.text_indent,
        line: 0,
        line_has_content: false,
        marker_byte,
        marker_boxes: SmallVec::new(),
    };

    for token in tokenize(&segs, text.word_break) {
        let token_segs = &segs[token.segs.clone()];
        match token.kind {
            TokenKind::Newline => {
                for seg in token_segs {
                    placer.place(seg, 0.0);
                }
                placer.break_line();
            }
            TokenKind::Space => {
                for seg in token_segs {
                    placer.place(seg, advance(seg));
                }
            }
            TokenKind::Word => {
                let width: f64 = token_segs.iter().map(&advance).sum();
                if placer.overflows(width) {
                    placer.break_line();
                }
                let split = splittable && placer.wraps && placer.x + width > content_width;
                for seg in token_segs {
                    let adv = advance(seg);
                    if split && placer.overflows(adv) {
                        placer.break_line();
                    }
                    placer.place(seg, adv);
                }
            }
        }
    }

    let marker_rect = placer
        .marker_boxes
        .iter()
        .copied()
        .reduce(|acc, r| acc.union(&r))
        .unwrap_or_else(|| placer.caret_box());
    let lines = placer.line + 1;
    let border_box = Rect::new(
        0.0,
        0.0,
        content_width + text.padding.horizontal() + text.border.horizontal(),
        lines as f64 * line_height + text.padding.vertical() + text.border.vertical(),
    );
    MirrorLayout {
        border_box,
        marker: marker_rect,
        lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_geometry::{BoxSizing, Edges, TextStyle, WhiteSpace};

    fn mirror(width: f64) -> MirrorStyle {
        MirrorStyle {
            text: TextStyle {
                font_size: 16.0,
                line_height: Some(20.0),
                white_space: WhiteSpace::PreWrap,
                ..TextStyle::default()
            },
            width,
            hidden: true,
            interactive: false,
        }
    }

    #[test]
    fn single_line_marker_box() {
        let l = layout_mirror(&mirror(200.0), "", "Hello");
        assert_eq!(l.marker, Rect::new(0.0, 0.0, 40.0, 20.0));
        assert_eq!(l.lines, 1);
    }

    #[test]
    fn marker_after_prefix() {
        let l = layout_mirror(&mirror(200.0), "Hello ", "world");
        assert_eq!(l.marker, Rect::new(48.0, 0.0, 40.0, 20.0));
    }

    #[test]
    fn marker_starting_inside_cluster_covers_it() {
        let l = layout_mirror(&mirror(200.0), "e", "\u{301}");
        assert_eq!(l.marker, Rect::new(0.0, 0.0, 8.0, 20.0));
        let l = layout_mirror(&mirror(200.0), "e", "\u{301}xyz");
        assert_eq!(l.marker, Rect::new(0.0, 0.0, 32.0, 20.0));
    }

    #[test]
    fn wraps_whole_words() {
        // 10 cells per line at 8px.
        let l = layout_mirror(&mirror(80.0), "alpha beta ", "gamma");
        // "alpha " fills 6 cells, "beta" would end at 10 -> fits; "gamma" wraps.
        assert_eq!(l.lines, 2);
        assert_eq!(l.marker, Rect::new(0.0, 20.0, 40.0, 20.0));
    }

    #[test]
    fn explicit_newlines_start_new_lines() {
        let l = layout_mirror(&mirror(400.0), "one\ntwo\n", "three");
        assert_eq!(l.lines, 3);
        assert_eq!(l.marker.top, 40.0);
        assert_eq!(l.marker.left, 0.0);
    }

    #[test]
    fn multi_line_marker_is_union() {
        let l = layout_mirror(&mirror(400.0), "ab", "cd\nef");
        assert_eq!(l.marker.left, 0.0);
        assert_eq!(l.marker.top, 0.0);
        assert_eq!(l.marker.bottom(), 40.0);
        assert_eq!(l.marker.right(), 32.0);
    }

    #[test]
    fn padding_border_and_box_sizing() {
        let mut style = mirror(100.0);
        style.text.padding = Edges::uniform(4.0);
        style.text.border = Edges::uniform(1.0);
        style.text.box_sizing = BoxSizing::BorderBox;
        let l = layout_mirror(&style, "ab", "c");
        assert_eq!(l.border_box.width, 100.0);
        assert_eq!(l.marker, Rect::new(5.0 + 16.0, 5.0, 8.0, 20.0));
    }

    #[test]
    fn nowrap_never_breaks() {
        let mut style = mirror(16.0);
        style.text.white_space = WhiteSpace::Nowrap;
        let l = layout_mirror(&style, "aaaa bbbb ", "cc");
        assert_eq!(l.lines, 1);
        assert_eq!(l.marker.left, 80.0);
    }

    #[test]
    fn long_word_splits_when_allowed() {
        let l = layout_mirror(&mirror(32.0), "", "abcdefgh");
        assert_eq!(l.lines, 2);
        assert_eq!(l.marker, Rect::new(0.0, 0.0, 32.0, 40.0));
    }

    #[test]
    fn empty_marker_yields_caret() {
        let l = layout_mirror(&mirror(200.0), "abc", "");
        assert_eq!(l.marker, Rect::new(24.0, 0.0, 0.0, 20.0));
    }

    #[test]
    fn spacing_and_transform_apply() {
        let mut style = mirror(400.0);
        style.text.letter_spacing = 1.0;
        style.text.word_spacing = 3.0;
        style.text.text_indent = 10.0;
        style.text.text_transform = TextTransform::Uppercase;
        let l = layout_mirror(&style, "a b", "c");
        // indent 10 + 'A' 9 + ' ' 12 + 'B' 9
        assert_eq!(l.marker, Rect::new(40.0, 0.0, 9.0, 20.0));
    }
}
