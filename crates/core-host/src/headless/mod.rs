//! In-process host platform.
//!
//! `HeadlessHost` keeps a flat widget table (text controls and plain
//! containers), a focus slot, page scroll, and a listener list. Mutating
//! helpers (`select`, `scroll_widget`, `pointer_down`, ...) update state and
//! then dispatch the same signals a browser-like platform would, so engine
//! tests read like user interaction scripts.
//!
//! Widget rects are stored in document space; `bounding_rect` reports them
//! in viewport space by subtracting the page scroll, mirroring what native
//! platforms return.

use std::collections::BTreeMap;

use core_events::{ListenOptions, ListenerId, Signal, SignalKind, SignalMask, SignalSink, WidgetId};
use core_geometry::{Point, Rect, TextStyle};
use tracing::{debug, trace};

use crate::{HostCapabilities, MirrorHost, MirrorNode, MirrorStyle, SelectionRange, SignalHost, TextHost};

pub mod layout;

pub use layout::{CELL_ADVANCE_EM, MirrorLayout, layout_mirror};

/// Where attached mirrors are laid out (viewport space, far off-screen).
pub const MIRROR_ORIGIN: Point = Point::new(-10_000.0, -10_000.0);

/// Declarative description of a widget to add to a `HeadlessHost`.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetSpec {
    pub text: String,
    /// Border box in document coordinates.
    pub rect: Rect,
    /// `None` models a platform that cannot compute this widget's style.
    pub style: Option<TextStyle>,
    pub selectable: bool,
    pub multiline: bool,
    pub parent: Option<WidgetId>,
}

impl WidgetSpec {
    /// Single-line text input.
    pub fn text_input(text: impl Into<String>, rect: Rect) -> Self {
        Self {
            text: text.into(),
            rect,
            style: Some(TextStyle {
                white_space: core_geometry::WhiteSpace::Pre,
                ..TextStyle::default()
            }),
            selectable: true,
            multiline: false,
            parent: None,
        }
    }

    /// Multi-line text area.
    pub fn text_area(text: impl Into<String>, rect: Rect) -> Self {
        Self {
            multiline: true,
            style: Some(TextStyle::default()),
            ..Self::text_input(text, rect)
        }
    }

    /// Non-selectable container node.
    pub fn container(rect: Rect) -> Self {
        Self {
            text: String::new(),
            rect,
            style: None,
            selectable: false,
            multiline: false,
            parent: None,
        }
    }

    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn without_style(mut self) -> Self {
        self.style = None;
        self
    }

    pub fn with_parent(mut self, parent: WidgetId) -> Self {
        self.parent = Some(parent);
        self
    }
}

#[derive(Debug)]
struct HeadlessWidget {
    spec: WidgetSpec,
    scroll: Point,
    selection: Option<SelectionRange>,
    attached: bool,
}

#[derive(Debug)]
struct Listener {
    id: ListenerId,
    kind: SignalKind,
    options: ListenOptions,
    sink: SignalSink,
}

/// Off-screen measurement node handed out by `HeadlessHost`.
#[derive(Debug, Default)]
pub struct HeadlessMirror {
    style: Option<MirrorStyle>,
    before: String,
    marker: String,
    attached_to: Option<WidgetId>,
}

impl HeadlessMirror {
    pub fn is_attached(&self) -> bool {
        self.attached_to.is_some()
    }

    pub fn style(&self) -> Option<&MirrorStyle> {
        self.style.as_ref()
    }

    fn layout(&self) -> Option<MirrorLayout> {
        if !self.is_attached() {
            return None;
        }
        let style = self.style.as_ref()?;
        Some(layout_mirror(style, &self.before, &self.marker))
    }
}

impl MirrorNode for HeadlessMirror {
    fn apply_style(&mut self, style: &MirrorStyle) {
        self.style = Some(style.clone());
    }

    fn set_content(&mut self, before: &str, marker: &str) {
        self.before.clear();
        self.before.push_str(before);
        self.marker.clear();
        self.marker.push_str(marker);
    }
}

/// Deterministic host used by tests, benches, and the replay binary.
#[derive(Debug)]
pub struct HeadlessHost {
    widgets: BTreeMap<WidgetId, HeadlessWidget>,
    next_widget: u64,
    focused: Option<WidgetId>,
    page_scroll: Point,
    viewport: (f64, f64),
    listeners: Vec<Listener>,
    next_listener: u64,
    capabilities: HostCapabilities,
    attached_mirrors: usize,
    mirrors_created: u64,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::with_capabilities(HostCapabilities::full())
    }

    pub fn with_capabilities(capabilities: HostCapabilities) -> Self {
        Self {
            widgets: BTreeMap::new(),
            next_widget: 1,
            focused: None,
            page_scroll: Point::ORIGIN,
            viewport: (1024.0, 768.0),
            listeners: Vec::new(),
            next_listener: 1,
            capabilities,
            attached_mirrors: 0,
            mirrors_created: 0,
        }
    }

    pub fn add_widget(&mut self, spec: WidgetSpec) -> WidgetId {
        let id = WidgetId(self.next_widget);
        self.next_widget += 1;
        self.widgets.insert(
            id,
            HeadlessWidget {
                spec,
                scroll: Point::ORIGIN,
                selection: None,
                attached: true,
            },
        );
        id
    }

    pub fn widget_rect(&self, id: WidgetId) -> Option<Rect> {
        self.widgets.get(&id).map(|w| w.spec.rect)
    }

    pub fn focused(&self) -> Option<WidgetId> {
        self.focused
    }

    pub fn viewport(&self) -> (f64, f64) {
        self.viewport
    }

    /// Move focus to `id` (no selection change). Emits `SelectionChanged`
    /// since focus moves the document selection.
    pub fn focus(&mut self, id: WidgetId) {
        self.focused = Some(id);
        self.dispatch(Signal::SelectionChanged);
    }

    /// Drop focus. Emits `FocusLost` followed by `SelectionChanged`.
    pub fn blur(&mut self) {
        if self.focused.take().is_some() {
            self.dispatch(Signal::FocusLost);
            self.dispatch(Signal::SelectionChanged);
        }
    }

    /// Focus `id` and set its selection to `[a, b)` (endpoints in either order).
    pub fn select(&mut self, id: WidgetId, a: usize, b: usize) {
        let Some(widget) = self.widgets.get_mut(&id) else {
            return;
        };
        let len = core_text::char_len(&widget.spec.text);
        widget.selection = Some(SelectionRange::new(a.min(len), b.min(len)));
        self.focused = Some(id);
        self.dispatch(Signal::SelectionChanged);
    }

    /// Replace a widget's value without notifying anyone (programmatic edit).
    /// The selection is clamped to the new length.
    pub fn set_text(&mut self, id: WidgetId, text: impl Into<String>) {
        if let Some(widget) = self.widgets.get_mut(&id) {
            widget.spec.text = text.into();
            let len = core_text::char_len(&widget.spec.text);
            if let Some(sel) = widget.selection {
                widget.selection = Some(SelectionRange::new(sel.start.min(len), sel.end.min(len)));
            }
        }
    }

    /// Scroll a widget's content by `(dx, dy)`; offsets never go negative.
    /// Delivered only to capture-phase scroll listeners, like element scroll
    /// events that do not bubble.
    pub fn scroll_widget(&mut self, id: WidgetId, dx: f64, dy: f64) {
        if let Some(widget) = self.widgets.get_mut(&id) {
            widget.scroll.x = (widget.scroll.x + dx).max(0.0);
            widget.scroll.y = (widget.scroll.y + dy).max(0.0);
            self.dispatch(Signal::Scroll { target: Some(id) });
        }
    }

    /// Scroll the page; delivered to every scroll listener.
    pub fn scroll_page(&mut self, dx: f64, dy: f64) {
        self.page_scroll.x = (self.page_scroll.x + dx).max(0.0);
        self.page_scroll.y = (self.page_scroll.y + dy).max(0.0);
        self.dispatch(Signal::Scroll { target: None });
    }

    /// Resize the viewport, optionally changing one widget's box with it.
    pub fn resize(&mut self, width: f64, height: f64, relayout: Option<(WidgetId, Rect)>) {
        self.viewport = (width, height);
        if let Some((id, rect)) = relayout {
            if let Some(widget) = self.widgets.get_mut(&id) {
                widget.spec.rect = rect;
            }
        }
        self.dispatch(Signal::Resize { width, height });
    }

    pub fn pointer_down(&mut self, target: Option<WidgetId>) {
        self.dispatch(Signal::PointerDown { target });
    }

    /// Remove a widget from the render tree: no box, no computed style.
    pub fn detach_widget(&mut self, id: WidgetId) {
        if let Some(widget) = self.widgets.get_mut(&id) {
            widget.attached = false;
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Kinds with at least one live listener.
    pub fn live_mask(&self) -> SignalMask {
        self.listeners
            .iter()
            .fold(SignalMask::empty(), |acc, l| acc | l.kind.mask())
    }

    /// Mirrors currently inserted in the tree. Should be zero between measurements.
    pub fn attached_mirror_count(&self) -> usize {
        self.attached_mirrors
    }

    pub fn mirrors_created(&self) -> u64 {
        self.mirrors_created
    }

    fn dispatch(&self, signal: Signal) {
        let kind = signal.kind();
        let element_scroll = matches!(signal, Signal::Scroll { target: Some(_) });
        let mut delivered = 0usize;
        for listener in self.listeners.iter().filter(|l| l.kind == kind) {
            if element_scroll && !listener.options.capture {
                continue;
            }
            if listener.sink.emit(signal) {
                delivered += 1;
            }
        }
        trace!(target: "host.headless", kind = kind.as_str(), delivered, "dispatch");
    }

    fn widget(&self, id: WidgetId) -> Option<&HeadlessWidget> {
        self.widgets.get(&id)
    }
}

impl TextHost for HeadlessHost {
    fn active_selectable_widget(&self) -> Option<WidgetId> {
        let id = self.focused?;
        let widget = self.widget(id)?;
        (widget.spec.selectable && widget.attached).then_some(id)
    }

    fn selection_range(&self, widget: WidgetId) -> Option<SelectionRange> {
        self.widget(widget)?.selection
    }

    fn text(&self, widget: WidgetId) -> String {
        self.widget(widget)
            .map(|w| w.spec.text.clone())
            .unwrap_or_default()
    }

    fn bounding_rect(&self, widget: WidgetId) -> Option<Rect> {
        let w = self.widget(widget)?;
        w.attached
            .then(|| w.spec.rect.translate(-self.page_scroll.x, -self.page_scroll.y))
    }

    fn scroll_offset(&self, widget: WidgetId) -> Point {
        self.widget(widget).map(|w| w.scroll).unwrap_or_default()
    }

    fn page_scroll(&self) -> Point {
        self.page_scroll
    }

    fn contains(&self, ancestor: WidgetId, node: WidgetId) -> bool {
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.widget(id).and_then(|w| w.spec.parent);
        }
        false
    }
}

impl MirrorHost for HeadlessHost {
    type Mirror = HeadlessMirror;

    fn capabilities(&self) -> HostCapabilities {
        self.capabilities
    }

    fn computed_style(&self, widget: WidgetId) -> Option<TextStyle> {
        if !self.capabilities.style_introspection {
            return None;
        }
        let w = self.widget(widget)?;
        if !w.attached {
            return None;
        }
        w.spec.style.clone()
    }

    fn create_offscreen_mirror(&mut self) -> Option<HeadlessMirror> {
        if !self.capabilities.offscreen_mirror {
            return None;
        }
        self.mirrors_created += 1;
        Some(HeadlessMirror::default())
    }

    fn attach(&mut self, mirror: &mut HeadlessMirror, anchor: WidgetId) -> bool {
        if mirror.is_attached() {
            return true;
        }
        let anchor_live = self.widget(anchor).is_some_and(|w| w.attached);
        if !anchor_live {
            debug!(target: "host.headless", widget = %anchor, "mirror_attach_refused");
            return false;
        }
        mirror.attached_to = Some(anchor);
        self.attached_mirrors += 1;
        true
    }

    fn detach(&mut self, mirror: &mut HeadlessMirror) {
        if mirror.attached_to.take().is_some() {
            self.attached_mirrors = self.attached_mirrors.saturating_sub(1);
        }
    }

    fn container_rect(&self, mirror: &HeadlessMirror) -> Option<Rect> {
        let layout = mirror.layout()?;
        Some(layout.border_box.translate(MIRROR_ORIGIN.x, MIRROR_ORIGIN.y))
    }

    fn marker_rect(&self, mirror: &HeadlessMirror) -> Option<Rect> {
        let layout = mirror.layout()?;
        Some(layout.marker.translate(MIRROR_ORIGIN.x, MIRROR_ORIGIN.y))
    }
}

impl SignalHost for HeadlessHost {
    fn listen(&mut self, kind: SignalKind, options: ListenOptions, sink: SignalSink) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        debug!(target: "host.headless", kind = kind.as_str(), capture = options.capture, listener = id.0, "listen");
        self.listeners.push(Listener {
            id,
            kind,
            options,
            sink,
        });
        id
    }

    fn unlisten(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        let removed = self.listeners.len() != before;
        debug!(target: "host.headless", listener = id.0, removed, "unlisten");
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::signal_channel;
    use pretty_assertions::assert_eq;

    #[test]
    fn element_scroll_reaches_capture_listeners_only() {
        let mut host = HeadlessHost::new();
        let id = host.add_widget(WidgetSpec::text_area("abc", Rect::new(0.0, 0.0, 100.0, 40.0)));
        let (bubble_sink, bubble_q) = signal_channel();
        let (capture_sink, capture_q) = signal_channel();
        host.listen(SignalKind::Scroll, ListenOptions::default(), bubble_sink);
        host.listen(SignalKind::Scroll, ListenOptions::CAPTURE, capture_sink);
        host.scroll_widget(id, 0.0, 10.0);
        assert!(bubble_q.is_empty());
        assert_eq!(capture_q.try_next(), Some(Signal::Scroll { target: Some(id) }));
        host.scroll_page(0.0, 5.0);
        assert_eq!(bubble_q.len(), 1);
        assert_eq!(capture_q.len(), 1);
    }

    #[test]
    fn bounding_rect_tracks_page_scroll() {
        let mut host = HeadlessHost::new();
        let id = host.add_widget(WidgetSpec::text_input("x", Rect::new(10.0, 300.0, 100.0, 20.0)));
        host.scroll_page(0.0, 120.0);
        assert_eq!(host.bounding_rect(id), Some(Rect::new(10.0, 180.0, 100.0, 20.0)));
        host.detach_widget(id);
        assert_eq!(host.bounding_rect(id), None);
        assert_eq!(host.computed_style(id), None);
    }

    #[test]
    fn contains_walks_parent_chain() {
        let mut host = HeadlessHost::new();
        let root = host.add_widget(WidgetSpec::container(Rect::new(0.0, 0.0, 500.0, 500.0)));
        let panel = host.add_widget(WidgetSpec::container(Rect::new(0.0, 0.0, 200.0, 200.0)).with_parent(root));
        let input = host.add_widget(WidgetSpec::text_input("x", Rect::new(0.0, 0.0, 100.0, 20.0)).with_parent(panel));
        let other = host.add_widget(WidgetSpec::container(Rect::new(300.0, 0.0, 50.0, 50.0)));
        assert!(host.contains(root, input));
        assert!(host.contains(panel, panel));
        assert!(!host.contains(panel, other));
    }

    #[test]
    fn only_selectable_focus_is_active() {
        let mut host = HeadlessHost::new();
        let div = host.add_widget(WidgetSpec::container(Rect::new(0.0, 0.0, 10.0, 10.0)));
        let input = host.add_widget(WidgetSpec::text_input("hello", Rect::new(0.0, 0.0, 100.0, 20.0)));
        host.focus(div);
        assert_eq!(host.active_selectable_widget(), None);
        host.select(input, 4, 1);
        assert_eq!(host.active_selectable_widget(), Some(input));
        assert_eq!(host.selection_range(input), Some(SelectionRange::new(1, 4)));
    }

    #[test]
    fn mirror_rects_require_attachment() {
        let mut host = HeadlessHost::new();
        let id = host.add_widget(WidgetSpec::text_input("hello", Rect::new(0.0, 0.0, 100.0, 20.0)));
        let mut mirror = host.create_offscreen_mirror().unwrap();
        mirror.apply_style(&MirrorStyle {
            text: host.computed_style(id).unwrap(),
            width: 100.0,
            hidden: true,
            interactive: false,
        });
        mirror.set_content("he", "ll");
        assert_eq!(host.marker_rect(&mirror), None);
        assert!(host.attach(&mut mirror, id));
        assert_eq!(host.attached_mirror_count(), 1);
        let marker = host.marker_rect(&mirror).unwrap();
        let container = host.container_rect(&mirror).unwrap();
        assert_eq!(marker.left - container.left, 16.0);
        host.detach(&mut mirror);
        host.detach(&mut mirror);
        assert_eq!(host.attached_mirror_count(), 0);
    }

    #[test]
    fn unlisten_is_exactly_once() {
        let mut host = HeadlessHost::new();
        let (sink, _q) = signal_channel();
        let id = host.listen(SignalKind::Resize, ListenOptions::default(), sink);
        assert_eq!(host.live_mask(), SignalMask::RESIZE);
        assert!(host.unlisten(id));
        assert!(!host.unlisten(id));
        assert_eq!(host.listener_count(), 0);
    }
}
