//! Computed text style snapshot.
//!
//! Only properties that influence glyph placement live here. A host returns
//! one of these per widget; the measurement mirror copies it field for field.
//! Any property the mirror does not copy is a source of caret drift, so new
//! layout-affecting properties must be added here rather than carried on the
//! side.

use serde::{Deserialize, Serialize};

use crate::Edges;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontVariant {
    #[default]
    Normal,
    SmallCaps,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextTransform {
    #[default]
    None,
    Uppercase,
    Lowercase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WhiteSpace {
    #[default]
    Normal,
    Pre,
    PreWrap,
    Nowrap,
}

impl WhiteSpace {
    /// Whether text may wrap at the container's content width.
    pub fn wraps(self) -> bool {
        matches!(self, WhiteSpace::Normal | WhiteSpace::PreWrap)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WordBreak {
    #[default]
    Normal,
    BreakAll,
    KeepAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverflowWrap {
    #[default]
    Normal,
    BreakWord,
    Anywhere,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoxSizing {
    #[default]
    ContentBox,
    BorderBox,
}

/// Layout-affecting subset of a widget's computed style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f64,
    pub font_weight: u16,
    pub font_variant: FontVariant,
    pub letter_spacing: f64,
    pub word_spacing: f64,
    /// Absolute line height in pixels; `None` means the font's normal line height.
    pub line_height: Option<f64>,
    pub text_transform: TextTransform,
    pub text_indent: f64,
    pub white_space: WhiteSpace,
    pub word_break: WordBreak,
    pub overflow_wrap: OverflowWrap,
    pub padding: Edges,
    pub border: Edges,
    pub box_sizing: BoxSizing,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "monospace".to_string(),
            font_size: 16.0,
            font_weight: 400,
            font_variant: FontVariant::Normal,
            letter_spacing: 0.0,
            word_spacing: 0.0,
            line_height: None,
            text_transform: TextTransform::None,
            text_indent: 0.0,
            white_space: WhiteSpace::PreWrap,
            word_break: WordBreak::Normal,
            overflow_wrap: OverflowWrap::BreakWord,
            padding: Edges::ZERO,
            border: Edges::ZERO,
            box_sizing: BoxSizing::ContentBox,
        }
    }
}

impl TextStyle {
    /// Normal line height when none is specified.
    pub const NORMAL_LINE_HEIGHT: f64 = 1.2;

    pub fn resolved_line_height(&self) -> f64 {
        self.line_height
            .unwrap_or(self.font_size * Self::NORMAL_LINE_HEIGHT)
    }

    /// Width of the content box for a given border-box width.
    pub fn content_width(&self, border_box_width: f64) -> f64 {
        (border_box_width - self.padding.horizontal() - self.border.horizontal()).max(0.0)
    }

    /// The CSS `width` value that yields a border box of `border_box_width`
    /// under this style's box sizing.
    pub fn css_width_for_border_box(&self, border_box_width: f64) -> f64 {
        match self.box_sizing {
            BoxSizing::BorderBox => border_box_width,
            BoxSizing::ContentBox => self.content_width(border_box_width),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_height_falls_back_to_normal() {
        let style = TextStyle {
            font_size: 10.0,
            ..TextStyle::default()
        };
        assert!((style.resolved_line_height() - 12.0).abs() < f64::EPSILON);
        let fixed = TextStyle {
            line_height: Some(20.0),
            ..style
        };
        assert_eq!(fixed.resolved_line_height(), 20.0);
    }

    #[test]
    fn css_width_respects_box_sizing() {
        let content = TextStyle {
            padding: Edges::uniform(4.0),
            border: Edges::uniform(1.0),
            ..TextStyle::default()
        };
        assert_eq!(content.css_width_for_border_box(100.0), 90.0);
        let border = TextStyle {
            box_sizing: BoxSizing::BorderBox,
            ..content
        };
        assert_eq!(border.css_width_for_border_box(100.0), 100.0);
    }

    #[test]
    fn deserializes_kebab_case_fields() {
        let style: TextStyle = toml::from_str(
            "font_size = 14.0\nwhite_space = \"nowrap\"\nbox_sizing = \"border-box\"\n[padding]\nleft = 3.0\n",
        )
        .unwrap();
        assert_eq!(style.font_size, 14.0);
        assert_eq!(style.white_space, WhiteSpace::Nowrap);
        assert_eq!(style.box_sizing, BoxSizing::BorderBox);
        assert_eq!(style.padding.left, 3.0);
        assert_eq!(style.padding.top, 0.0);
    }
}
