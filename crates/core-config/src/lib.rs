//! Configuration loading and parsing.
//!
//! Parses `seltrack.toml` (or an override path supplied by the binary):
//!
//! ```toml
//! [overlay]
//! offset_left = 4.0      # subtracted from the selection midpoint
//! offset_top = 8.0       # subtracted from the selection's line top
//! clip_policy = "hide"   # or "clamp"
//! clamp_inset = 10.0     # distance kept from the widget edge when clamping
//!
//! [timing]
//! debounce_ms = 100      # scroll/resize quiescence before recompute
//! ```
//!
//! Every field is optional. Unknown fields are ignored (TOML deserialization
//! tolerance) and a file that fails to parse falls back to defaults, so a
//! broken config never prevents the engine from starting. Values that cannot
//! be used as-is (non-finite offsets, negative inset) are replaced by
//! `Config::sanitize`, which logs each replacement on the `config` target.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf, time::Duration};
use tracing::{info, warn};

pub const FILE_NAME: &str = "seltrack.toml";

/// Behavior when the selection anchor falls outside the widget's visible box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipMode {
    /// Report no anchor (overlay hidden).
    #[default]
    Hide,
    /// Pull the anchor back inside the box.
    Clamp,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct OverlayConfig {
    #[serde(default = "OverlayConfig::default_offset_left")]
    pub offset_left: f64,
    #[serde(default = "OverlayConfig::default_offset_top")]
    pub offset_top: f64,
    #[serde(default)]
    pub clip_policy: ClipMode,
    #[serde(default = "OverlayConfig::default_clamp_inset")]
    pub clamp_inset: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            offset_left: Self::default_offset_left(),
            offset_top: Self::default_offset_top(),
            clip_policy: ClipMode::default(),
            clamp_inset: Self::default_clamp_inset(),
        }
    }
}

impl OverlayConfig {
    const fn default_offset_left() -> f64 {
        4.0
    }
    const fn default_offset_top() -> f64 {
        8.0
    }
    const fn default_clamp_inset() -> f64 {
        10.0
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct TimingConfig {
    #[serde(default = "TimingConfig::default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            debounce_ms: Self::default_debounce_ms(),
        }
    }
}

impl TimingConfig {
    const fn default_debounce_ms() -> u64 {
        100
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct ConfigFile {
    #[serde(default)]
    pub overlay: OverlayConfig,
    #[serde(default)]
    pub timing: TimingConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
}

/// Best-effort config path: `./seltrack.toml`, then the platform config dir
/// (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("seltrack").join(FILE_NAME);
    }
    PathBuf::from(FILE_NAME)
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            let mut cfg = Config {
                raw: Some(content),
                file,
            };
            cfg.sanitize();
            Ok(cfg)
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

/// `value` when finite, otherwise `fallback`. The replacement is logged.
pub fn finite_or(field: &'static str, value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        return value;
    }
    info!(target: "config", field, replacement = fallback, "overlay_value_not_finite");
    fallback
}

/// Clamp inset usable by the clip policy: finite and not negative.
pub fn usable_inset(value: f64) -> f64 {
    let value = finite_or("clamp_inset", value, OverlayConfig::default_clamp_inset());
    if value < 0.0 {
        info!(target: "config", raw = value, clamped = 0.0, "clamp_inset_clamped");
        return 0.0;
    }
    value
}

impl Config {
    /// Replace unusable values with defaults. Returns how many fields changed.
    pub fn sanitize(&mut self) -> usize {
        let overlay = &mut self.file.overlay;
        let before = [overlay.offset_left, overlay.offset_top, overlay.clamp_inset];
        overlay.offset_left = finite_or("offset_left", overlay.offset_left, OverlayConfig::default_offset_left());
        overlay.offset_top = finite_or("offset_top", overlay.offset_top, OverlayConfig::default_offset_top());
        overlay.clamp_inset = usable_inset(overlay.clamp_inset);
        let after = [overlay.offset_left, overlay.offset_top, overlay.clamp_inset];
        before
            .iter()
            .zip(after)
            .filter(|(old, new)| old.to_bits() != new.to_bits())
            .count()
    }

    pub fn overlay(&self) -> &OverlayConfig {
        &self.file.overlay
    }

    pub fn debounce(&self) -> Duration {
        self.file.timing.debounce()
    }
}
