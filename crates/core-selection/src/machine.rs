//! Selection state machine.
//!
//! ```text
//!            selection read (non-empty)
//!   Idle ─────────────────────────────────▶ Selected
//!    ▲  ◀──── collapse / blur / outside pointer-down ──┘ │
//!    │                                                   │ scroll / resize
//!    │                                                   ▼
//!    └──── recompute finds nothing ───────── PendingReposition
//!                                                │
//!                      debounce fires, same text └──▶ Selected
//! ```
//!
//! Every transition publishes a new `TextSelection`. The callback runs on
//! selection reads, clears and delayed recomputes; hiding the anchor for a
//! reposition only updates the snapshot. Observers see every change.

use core_events::WidgetId;
use core_geometry::Position;
use core_host::{HostPlatform, SelectionRange, TextHost};
use tracing::debug;

use crate::config::{ResolveOptions, SelectionCallback};
use crate::observers::{ObserverId, ObserverMode, ObserverSet};
use crate::resolver::resolve_with;
use crate::snapshot::{SelectionMemento, TextSelection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Idle,
    Selected,
    /// Selected, anchor hidden until the debounce window elapses.
    PendingReposition,
}

impl SelectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionState::Idle => "idle",
            SelectionState::Selected => "selected",
            SelectionState::PendingReposition => "pending_reposition",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Notify {
    Callback,
    Silent,
}

pub struct SelectionMachine {
    state: SelectionState,
    current: TextSelection,
    memento: Option<SelectionMemento>,
    callback: Option<SelectionCallback>,
    observers: ObserverSet,
    resolve: ResolveOptions,
    scope_container: Option<WidgetId>,
    publications: u64,
}

impl SelectionMachine {
    pub fn new(
        resolve: ResolveOptions,
        scope_container: Option<WidgetId>,
        callback: Option<SelectionCallback>,
    ) -> Self {
        Self {
            state: SelectionState::Idle,
            current: TextSelection::empty(),
            memento: None,
            callback,
            observers: ObserverSet::default(),
            resolve,
            scope_container,
            publications: 0,
        }
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn current(&self) -> &TextSelection {
        &self.current
    }

    /// Snapshots published so far (including unchanged republishes).
    pub fn publications(&self) -> u64 {
        self.publications
    }

    pub fn subscribe(&mut self, mode: ObserverMode, observer: impl FnMut(&TextSelection) + 'static) -> ObserverId {
        self.observers.add(mode, observer)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.remove(id)
    }

    /// Read the host's current selection and publish it.
    pub fn read_selection<H: HostPlatform + ?Sized>(&mut self, host: &mut H) {
        let Some(widget) = host.active_selectable_widget() else {
            self.clear("no_selectable_focus");
            return;
        };
        let Some(range) = host.selection_range(widget) else {
            self.clear("no_range");
            return;
        };
        if range.is_collapsed() {
            self.clear("collapsed");
            return;
        }
        let text = host.text(widget);
        let selected = core_text::slice_chars(&text, range.start, range.end).to_string();
        if selected.is_empty() {
            self.clear("range_past_end");
            return;
        }
        let position = self.locate(host, widget, range);
        self.memento = Some(SelectionMemento {
            range,
            text: selected.clone(),
            element: widget,
        });
        self.state = SelectionState::Selected;
        self.publish(
            TextSelection::selected(selected, range, widget, position),
            Notify::Callback,
        );
    }

    /// Drop the selection and publish the empty snapshot.
    pub fn clear(&mut self, reason: &'static str) {
        debug!(target: "selection.machine", from = self.state.as_str(), reason, "clear");
        self.state = SelectionState::Idle;
        self.memento = None;
        self.publish(TextSelection::empty(), Notify::Callback);
    }

    /// Clear unless `target` lies inside the scope container.
    pub fn pointer_down<H: TextHost + ?Sized>(&mut self, host: &H, target: Option<WidgetId>) {
        let inside = match (self.scope_container, target) {
            (Some(scope), Some(target)) => host.contains(scope, target),
            _ => false,
        };
        if inside {
            debug!(target: "selection.machine", node = ?target, "pointer_down_in_scope");
            return;
        }
        self.clear("pointer_down_outside");
    }

    /// Hide the anchor while the layout is moving. Returns whether a delayed
    /// recompute should be scheduled.
    pub fn hide_for_reposition(&mut self) -> bool {
        if self.state == SelectionState::Idle {
            return false;
        }
        self.state = SelectionState::PendingReposition;
        let hidden = self.current.without_position();
        self.publish(hidden, Notify::Silent);
        true
    }

    /// Delayed recompute after scroll/resize settled. Reuses the memento if the
    /// host still shows the same selection, otherwise reads it afresh.
    /// Returns `false` when there was nothing pending.
    pub fn reposition<H: HostPlatform + ?Sized>(&mut self, host: &mut H) -> bool {
        if self.state != SelectionState::PendingReposition {
            return false;
        }
        let Some(memento) = self.memento.clone() else {
            self.read_selection(host);
            return true;
        };
        if !memento.still_matches(&*host) {
            debug!(target: "selection.machine", widget = %memento.element, "memento_stale");
            self.read_selection(host);
            return true;
        }
        let position = self.locate(host, memento.element, memento.range);
        self.state = SelectionState::Selected;
        let restored = self.current.with_position(position);
        self.publish(restored, Notify::Callback);
        true
    }

    /// Drop callback, observers and memento. The last snapshot stays readable.
    pub fn teardown(&mut self) {
        self.callback = None;
        self.observers.clear();
        self.memento = None;
        self.state = SelectionState::Idle;
    }

    fn locate<H: HostPlatform + ?Sized>(
        &self,
        host: &mut H,
        widget: WidgetId,
        range: SelectionRange,
    ) -> Option<Position> {
        if !host.capabilities().can_measure() {
            return None;
        }
        resolve_with(host, widget, range, &self.resolve)
    }

    fn publish(&mut self, snapshot: TextSelection, notify: Notify) {
        let changed = snapshot != self.current;
        self.current = snapshot;
        self.publications += 1;
        debug!(
            target: "selection.machine",
            state = self.state.as_str(),
            selected = self.current.is_selected(),
            start = ?self.current.selection_start(),
            end = ?self.current.selection_end(),
            has_position = self.current.position().is_some(),
            changed,
            "publish"
        );
        if notify == Notify::Callback {
            if let Some(callback) = self.callback.as_mut() {
                callback(&self.current);
            }
        }
        if changed {
            self.observers.notify(&self.current);
        }
    }
}

impl std::fmt::Debug for SelectionMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionMachine")
            .field("state", &self.state)
            .field("current", &self.current)
            .field("observers", &self.observers)
            .field("publications", &self.publications)
            .finish()
    }
}
