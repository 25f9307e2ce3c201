//! Engine configuration.

use std::fmt;
use std::time::Duration;

use core_config::{ClipMode, Config, finite_or, usable_inset};
use core_events::{DEFAULT_DEBOUNCE, WidgetId};

use crate::TextSelection;

/// Invoked after every selection read, clear and delayed recompute.
pub type SelectionCallback = Box<dyn FnMut(&TextSelection)>;

/// What to do when the anchor falls outside the widget's visible box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ClipPolicy {
    /// Report no position.
    #[default]
    Hide,
    /// Clamp the anchor `inset` pixels inside the violated edge.
    ClampToEdge { inset: f64 },
}

/// Space reported positions are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinateSpace {
    /// Viewport coordinates plus page scroll.
    #[default]
    Document,
    /// Relative to the border-box origin of the given container.
    Container(WidgetId),
}

/// Geometry inputs of a single resolve call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolveOptions {
    pub offset_left: f64,
    pub offset_top: f64,
    pub clip: ClipPolicy,
    pub space: CoordinateSpace,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            offset_left: 4.0,
            offset_top: 8.0,
            clip: ClipPolicy::Hide,
            space: CoordinateSpace::Document,
        }
    }
}

pub struct EngineConfig {
    pub on_selection_change: Option<SelectionCallback>,
    pub offset_left: f64,
    pub offset_top: f64,
    /// Pointer-downs inside this container keep the selection.
    pub scope_container: Option<WidgetId>,
    pub clip_policy: ClipPolicy,
    pub coordinate_space: CoordinateSpace,
    pub debounce: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let resolve = ResolveOptions::default();
        Self {
            on_selection_change: None,
            offset_left: resolve.offset_left,
            offset_top: resolve.offset_top,
            scope_container: None,
            clip_policy: resolve.clip,
            coordinate_space: resolve.space,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineConfig")
            .field("on_selection_change", &self.on_selection_change.is_some())
            .field("offset_left", &self.offset_left)
            .field("offset_top", &self.offset_top)
            .field("scope_container", &self.scope_container)
            .field("clip_policy", &self.clip_policy)
            .field("coordinate_space", &self.coordinate_space)
            .field("debounce", &self.debounce)
            .finish()
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_selection_change(mut self, callback: impl FnMut(&TextSelection) + 'static) -> Self {
        self.on_selection_change = Some(Box::new(callback));
        self
    }

    /// Non-finite offsets fall back to the defaults.
    pub fn offsets(mut self, left: f64, top: f64) -> Self {
        let defaults = ResolveOptions::default();
        self.offset_left = finite_or("offset_left", left, defaults.offset_left);
        self.offset_top = finite_or("offset_top", top, defaults.offset_top);
        self
    }

    pub fn scope_container(mut self, container: WidgetId) -> Self {
        self.scope_container = Some(container);
        self
    }

    /// A clamp inset that is negative or not finite is made usable first.
    pub fn clip_policy(mut self, policy: ClipPolicy) -> Self {
        self.clip_policy = match policy {
            ClipPolicy::Hide => ClipPolicy::Hide,
            ClipPolicy::ClampToEdge { inset } => ClipPolicy::ClampToEdge {
                inset: usable_inset(inset),
            },
        };
        self
    }

    pub fn coordinate_space(mut self, space: CoordinateSpace) -> Self {
        self.coordinate_space = space;
        self
    }

    pub fn debounce(mut self, window: Duration) -> Self {
        self.debounce = window;
        self
    }

    /// Take overlay offsets, clip policy and debounce window from a loaded
    /// config file. Callback, scope and coordinate space are left untouched.
    pub fn apply_file(mut self, config: &Config) -> Self {
        let overlay = config.overlay();
        self.offset_left = overlay.offset_left;
        self.offset_top = overlay.offset_top;
        self.clip_policy = match overlay.clip_policy {
            ClipMode::Hide => ClipPolicy::Hide,
            ClipMode::Clamp => ClipPolicy::ClampToEdge {
                inset: overlay.clamp_inset,
            },
        };
        self.debounce = config.debounce();
        self
    }

    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            offset_left: self.offset_left,
            offset_top: self.offset_top,
            clip: self.clip_policy,
            space: self.coordinate_space,
        }
    }
}

impl From<&Config> for EngineConfig {
    fn from(config: &Config) -> Self {
        EngineConfig::default().apply_file(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_overlay_conventions() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.offset_left, 4.0);
        assert_eq!(cfg.offset_top, 8.0);
        assert_eq!(cfg.clip_policy, ClipPolicy::Hide);
        assert_eq!(cfg.coordinate_space, CoordinateSpace::Document);
        assert_eq!(cfg.debounce, Duration::from_millis(100));
        assert!(cfg.on_selection_change.is_none());
    }

    #[test]
    fn file_clamp_mode_carries_inset() {
        let mut file = Config::default();
        file.file.overlay.clip_policy = ClipMode::Clamp;
        file.file.overlay.clamp_inset = 6.0;
        file.file.timing.debounce_ms = 40;
        let cfg = EngineConfig::from(&file);
        assert_eq!(cfg.clip_policy, ClipPolicy::ClampToEdge { inset: 6.0 });
        assert_eq!(cfg.debounce, Duration::from_millis(40));
    }

    #[test]
    fn builder_rejects_unusable_overlay_values() {
        let cfg = EngineConfig::new()
            .offsets(f64::NAN, 3.0)
            .clip_policy(ClipPolicy::ClampToEdge { inset: -5.0 });
        assert_eq!(cfg.offset_left, 4.0);
        assert_eq!(cfg.offset_top, 3.0);
        assert_eq!(cfg.clip_policy, ClipPolicy::ClampToEdge { inset: 0.0 });

        let cfg = EngineConfig::new().clip_policy(ClipPolicy::ClampToEdge { inset: f64::INFINITY });
        assert_eq!(cfg.clip_policy, ClipPolicy::ClampToEdge { inset: 10.0 });
    }

    #[test]
    fn apply_file_keeps_callback_and_scope() {
        let cfg = EngineConfig::new()
            .on_selection_change(|_| {})
            .scope_container(WidgetId(3))
            .apply_file(&Config::default());
        assert!(cfg.on_selection_change.is_some());
        assert_eq!(cfg.scope_container, Some(WidgetId(3)));
        assert!(format!("{cfg:?}").contains("on_selection_change: true"));
    }
}
