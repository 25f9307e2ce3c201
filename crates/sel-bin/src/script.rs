//! Replay script format.
//!
//! ```toml
//! [widget]
//! text = "Hello world"
//! rect = { left = 100.0, top = 50.0, width = 200.0, height = 100.0 }
//! multiline = true
//! scoped = false          # pointer-downs on the widget keep the selection
//! style = { font_size = 16.0, line_height = 20.0 }
//!
//! [[step]]
//! action = "select"
//! start = 0
//! end = 5
//!
//! [[step]]
//! action = "wait_ms"
//! ms = 120
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use core_geometry::{Rect, TextStyle};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Script {
    pub widget: WidgetScript,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WidgetScript {
    #[serde(default)]
    pub text: String,
    #[serde(default = "WidgetScript::default_rect")]
    pub rect: Rect,
    #[serde(default)]
    pub style: Option<TextStyle>,
    #[serde(default = "WidgetScript::default_multiline")]
    pub multiline: bool,
    #[serde(default)]
    pub scoped: bool,
}

impl WidgetScript {
    const fn default_rect() -> Rect {
        Rect::new(0.0, 0.0, 320.0, 120.0)
    }
    const fn default_multiline() -> bool {
        true
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Select {
        start: usize,
        end: usize,
    },
    PointerDown {
        #[serde(default)]
        on_widget: bool,
    },
    Scroll {
        #[serde(default)]
        dx: f64,
        #[serde(default)]
        dy: f64,
        /// Scroll the page instead of the widget.
        #[serde(default)]
        page: bool,
    },
    Resize {
        width: f64,
        height: f64,
    },
    FocusLost,
    /// Replace the widget's value without a selection signal.
    Edit {
        text: String,
    },
    WaitMs {
        ms: u64,
    },
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Select { .. } => "select",
            Step::PointerDown { .. } => "pointer_down",
            Step::Scroll { .. } => "scroll",
            Step::Resize { .. } => "resize",
            Step::FocusLost => "focus_lost",
            Step::Edit { .. } => "edit",
            Step::WaitMs { .. } => "wait_ms",
        }
    }
}

impl Script {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("parsing script {}", path.display()))
    }
}
