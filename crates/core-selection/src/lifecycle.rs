//! Listener registration, the deferred-read flag and the reposition timer.
//!
//! All five listeners are registered together on start and removed together
//! on teardown. Signals land in a channel owned here and are drained by the
//! engine's tick; nothing runs inside the host's dispatch.

use std::time::{Duration, Instant};

use core_events::{Debouncer, ListenOptions, ListenerId, Signal, SignalKind, SignalQueue, signal_channel};
use core_host::SignalHost;
use tracing::{debug, info};

/// Listener set installed on start. Scroll listens in capture phase so
/// element scrolls (which do not bubble) are seen too.
pub const SUBSCRIPTIONS: [(SignalKind, ListenOptions); 5] = [
    (SignalKind::SelectionChange, ListenOptions { capture: false }),
    (SignalKind::PointerDown, ListenOptions { capture: false }),
    (SignalKind::Scroll, ListenOptions::CAPTURE),
    (SignalKind::Resize, ListenOptions { capture: false }),
    (SignalKind::FocusLost, ListenOptions { capture: false }),
];

#[derive(Debug)]
pub struct Lifecycle {
    queue: SignalQueue,
    listeners: Vec<ListenerId>,
    debounce: Debouncer,
    frame_pending: bool,
    torn_down: bool,
}

impl Lifecycle {
    /// Register every listener on `host`.
    pub fn start<H: SignalHost + ?Sized>(host: &mut H, window: Duration) -> Self {
        let (sink, queue) = signal_channel();
        let listeners: Vec<ListenerId> = SUBSCRIPTIONS
            .iter()
            .map(|(kind, options)| host.listen(*kind, *options, sink.clone()))
            .collect();
        info!(target: "selection.lifecycle", listeners = listeners.len(), debounce_ms = window.as_millis() as u64, "started");
        Self {
            queue,
            listeners,
            debounce: Debouncer::new(window),
            frame_pending: false,
            torn_down: false,
        }
    }

    pub fn is_running(&self) -> bool {
        !self.torn_down
    }

    pub fn next_signal(&self) -> Option<Signal> {
        if self.torn_down {
            return None;
        }
        self.queue.try_next()
    }

    /// Ask for a selection read at the end of the current tick.
    pub fn request_frame(&mut self) {
        self.frame_pending = true;
    }

    pub fn take_frame(&mut self) -> bool {
        std::mem::take(&mut self.frame_pending)
    }

    pub fn arm_reposition(&mut self, now: Instant, kind: SignalKind) {
        self.debounce.arm(now, kind);
    }

    pub fn cancel_reposition(&mut self) -> bool {
        let cancelled = self.debounce.cancel();
        if cancelled {
            debug!(target: "selection.lifecycle", "reposition_cancelled");
        }
        cancelled
    }

    pub fn reposition_due(&mut self, now: Instant) -> Option<SignalKind> {
        self.debounce.fire_if_due(now)
    }

    pub fn reposition_deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    /// Remove every listener, cancel the timer and drop pending work.
    /// Returns `false` if already torn down.
    pub fn teardown<H: SignalHost + ?Sized>(&mut self, host: &mut H) -> bool {
        if self.torn_down {
            return false;
        }
        self.torn_down = true;
        let mut removed = 0usize;
        for id in self.listeners.drain(..) {
            if host.unlisten(id) {
                removed += 1;
            }
        }
        self.debounce.cancel();
        self.frame_pending = false;
        let dropped = self.queue.clear();
        info!(target: "selection.lifecycle", removed, dropped, "stopped");
        true
    }
}
