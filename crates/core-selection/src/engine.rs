//! Public entry point tying the host, the lifecycle and the state machine.

use std::time::Instant;

use core_events::Signal;
use core_host::HostPlatform;
use tracing::{debug, info, trace};

use crate::config::EngineConfig;
use crate::lifecycle::Lifecycle;
use crate::machine::{SelectionMachine, SelectionState};
use crate::observers::{ObserverId, ObserverMode};
use crate::snapshot::TextSelection;

/// Work done by one `tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    pub signals: usize,
    pub selection_reads: usize,
    pub repositions: usize,
}

/// Selection tracker bound to one host.
///
/// Single-threaded and cooperative: the host queues signals while the caller
/// mutates it, and `tick(now)` processes everything queued since the last
/// tick. Selection reads requested by signals run after the queue is drained,
/// once per tick, and the reposition timer fires when `now` reaches its
/// deadline.
pub struct Engine<H: HostPlatform> {
    host: H,
    machine: SelectionMachine,
    lifecycle: Lifecycle,
}

impl<H: HostPlatform> Engine<H> {
    /// Register listeners on `host` and start in `Idle`. No selection is read
    /// until the first selection-change signal.
    pub fn start(mut host: H, config: EngineConfig) -> Self {
        let resolve = config.resolve_options();
        let lifecycle = Lifecycle::start(&mut host, config.debounce);
        let machine = SelectionMachine::new(resolve, config.scope_container, config.on_selection_change);
        if !host.capabilities().can_measure() {
            info!(target: "selection.lifecycle", "caret_geometry_unavailable");
        }
        Self {
            host,
            machine,
            lifecycle,
        }
    }

    pub fn tick(&mut self, now: Instant) -> TickReport {
        let mut report = TickReport::default();
        if !self.lifecycle.is_running() {
            return report;
        }

        while let Some(signal) = self.lifecycle.next_signal() {
            report.signals += 1;
            trace!(target: "selection.lifecycle", kind = signal.kind().as_str(), "signal");
            match signal {
                Signal::SelectionChanged | Signal::FocusLost => {
                    self.lifecycle.cancel_reposition();
                    self.lifecycle.request_frame();
                }
                Signal::PointerDown { target } => {
                    self.machine.pointer_down(&self.host, target);
                }
                Signal::Scroll { .. } | Signal::Resize { .. } => {
                    if self.machine.hide_for_reposition() {
                        self.lifecycle.arm_reposition(now, signal.kind());
                    }
                }
            }
        }

        if self.lifecycle.take_frame() {
            // A fresh read supersedes any scroll/resize queued behind it.
            self.lifecycle.cancel_reposition();
            report.selection_reads += 1;
            self.machine.read_selection(&mut self.host);
        }

        if let Some(kind) = self.lifecycle.reposition_due(now) {
            if self.machine.reposition(&mut self.host) {
                debug!(target: "selection.lifecycle", trigger = kind.as_str(), "reposition");
                report.repositions += 1;
            }
        }
        report
    }

    pub fn current_selection(&self) -> &TextSelection {
        self.machine.current()
    }

    pub fn state(&self) -> SelectionState {
        self.machine.state()
    }

    pub fn subscribe(&mut self, mode: ObserverMode, observer: impl FnMut(&TextSelection) + 'static) -> ObserverId {
        self.machine.subscribe(mode, observer)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.machine.unsubscribe(id)
    }

    /// Remove every listener and cancel pending work. Safe to call more than
    /// once; returns whether this call did the teardown.
    pub fn stop(&mut self) -> bool {
        if !self.lifecycle.teardown(&mut self.host) {
            return false;
        }
        self.machine.teardown();
        true
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle.is_running()
    }

    /// When the pending reposition will fire, if one is armed.
    pub fn reposition_deadline(&self) -> Option<Instant> {
        self.lifecycle.reposition_deadline()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

impl<H: HostPlatform> Drop for Engine<H> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<H: HostPlatform + std::fmt::Debug> std::fmt::Debug for Engine<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("host", &self.host)
            .field("machine", &self.machine)
            .field("lifecycle", &self.lifecycle)
            .finish()
    }
}
