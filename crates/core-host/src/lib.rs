//! Host platform abstraction consumed by the selection engine, plus a
//! headless reference implementation.
//!
//! The engine never talks to a renderer directly. Everything it needs from
//! the platform is split across three seams:
//!
//! * `TextHost`: focus, selection ranges, widget text and boxes.
//! * `MirrorHost`: computed styles and the off-screen measurement node.
//! * `SignalHost`: listener registration for platform signals.
//!
//! `HostPlatform` is the union of the three and is what `Engine` is generic
//! over. `HeadlessHost` implements all of them in-process with a monospace
//! layout so the engine is testable without a live renderer.

use core_events::{ListenOptions, ListenerId, SignalKind, SignalSink, WidgetId};
use core_geometry::{Point, Rect, TextStyle};

pub mod capabilities;
pub mod headless;

pub use capabilities::HostCapabilities;
pub use headless::{HeadlessHost, HeadlessMirror, WidgetSpec};

/// Character offsets `[start, end)` into a widget's text buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionRange {
    pub start: usize,
    pub end: usize,
}

impl SelectionRange {
    /// Build a range, ordering the endpoints so `start <= end` always holds
    /// (backward selections report their anchor after their focus).
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.is_collapsed()
    }
}

/// Focus, selection and box queries.
pub trait TextHost {
    /// The focused widget if it is a selectable text control. Any other focus
    /// target (buttons, plain containers, nothing) yields `None`.
    fn active_selectable_widget(&self) -> Option<WidgetId>;
    fn selection_range(&self, widget: WidgetId) -> Option<SelectionRange>;
    /// Current value of the widget. Unknown widgets read as empty.
    fn text(&self, widget: WidgetId) -> String;
    /// Border box in viewport coordinates; `None` when not attached to a
    /// renderable tree.
    fn bounding_rect(&self, widget: WidgetId) -> Option<Rect>;
    /// The widget's own content scroll offset (scrollLeft, scrollTop).
    fn scroll_offset(&self, widget: WidgetId) -> Point;
    /// Page-level scroll offset, added to viewport coordinates to reach
    /// document space.
    fn page_scroll(&self) -> Point;
    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: WidgetId, node: WidgetId) -> bool;
}

/// Styling applied to an off-screen measurement node. Built by the engine
/// from a widget's computed style; the host applies it verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct MirrorStyle {
    /// Layout-affecting properties copied from the widget.
    pub text: TextStyle,
    /// CSS `width`, interpreted under `text.box_sizing`.
    pub width: f64,
    /// Never painted.
    pub hidden: bool,
    /// Never a hit-test target.
    pub interactive: bool,
}

/// Off-screen node used to lay out a shadow copy of a widget's text.
pub trait MirrorNode {
    fn apply_style(&mut self, style: &MirrorStyle);
    /// Replace the node's children with the literal `before` text followed by
    /// a marker child wrapping `marker`.
    fn set_content(&mut self, before: &str, marker: &str);
}

/// Style introspection and measurement node lifecycle.
pub trait MirrorHost {
    type Mirror: MirrorNode;

    /// What this host can provide. Defaults to everything.
    fn capabilities(&self) -> HostCapabilities {
        HostCapabilities::full()
    }
    /// Computed style of `widget`; `None` when style computation is
    /// unavailable (detached widget or no introspection support).
    fn computed_style(&self, widget: WidgetId) -> Option<TextStyle>;
    fn create_offscreen_mirror(&mut self) -> Option<Self::Mirror>;
    /// Insert the mirror into the render tree next to `anchor`. Returns
    /// `false` if it could not be attached.
    fn attach(&mut self, mirror: &mut Self::Mirror, anchor: WidgetId) -> bool;
    fn detach(&mut self, mirror: &mut Self::Mirror);
    /// Bounding rect of the mirror container. Only valid while attached.
    fn container_rect(&self, mirror: &Self::Mirror) -> Option<Rect>;
    /// Bounding rect of the marker child. Only valid while attached.
    fn marker_rect(&self, mirror: &Self::Mirror) -> Option<Rect>;
}

/// Listener registration.
pub trait SignalHost {
    fn listen(&mut self, kind: SignalKind, options: ListenOptions, sink: SignalSink) -> ListenerId;
    /// Remove a listener. Returns `false` for unknown (or already removed) ids.
    fn unlisten(&mut self, id: ListenerId) -> bool;
}

/// Everything the engine needs from the platform.
pub trait HostPlatform: TextHost + MirrorHost + SignalHost {}

impl<T: TextHost + MirrorHost + SignalHost> HostPlatform for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_orders_endpoints() {
        let r = SelectionRange::new(9, 3);
        assert_eq!((r.start, r.end), (3, 9));
        assert_eq!(r.len(), 6);
        assert!(!r.is_collapsed());
        assert!(SelectionRange::new(4, 4).is_collapsed());
    }
}
