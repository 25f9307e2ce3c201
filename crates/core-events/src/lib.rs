//! Platform signal vocabulary and queue helpers for the selection engine.
//!
//! Hosts push `Signal`s into a `SignalSink` from inside their native event
//! callbacks; the engine drains the paired `SignalQueue` on its own tick.
//! Nothing here runs on another thread: the channel only decouples "host is
//! dispatching a native event" from "engine is allowed to mutate state".

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use serde::{Deserialize, Serialize};

mod debounce;

pub use debounce::Debouncer;

// -------------------------------------------------------------------------------------------------
// Telemetry
// -------------------------------------------------------------------------------------------------
// Relaxed atomic counters, read through `signal_counters` and logged by the binary at shutdown.
// -------------------------------------------------------------------------------------------------
pub static SIGNALS_EMITTED: AtomicU64 = AtomicU64::new(0);
pub static SIGNAL_SEND_FAILURES: AtomicU64 = AtomicU64::new(0); // receiver already dropped

/// Process-wide signal totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SignalCounters {
    pub emitted: u64,
    pub send_failures: u64,
}

pub fn signal_counters() -> SignalCounters {
    SignalCounters {
        emitted: SIGNALS_EMITTED.load(Ordering::Relaxed),
        send_failures: SIGNAL_SEND_FAILURES.load(Ordering::Relaxed),
    }
}

/// Opaque handle to a host widget (text control, container, or any other node).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(pub u64);

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier returned by a host when a listener is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Signal classes the engine subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    SelectionChange,
    PointerDown,
    Scroll,
    Resize,
    FocusLost,
}

impl SignalKind {
    pub const ALL: [SignalKind; 5] = [
        SignalKind::SelectionChange,
        SignalKind::PointerDown,
        SignalKind::Scroll,
        SignalKind::Resize,
        SignalKind::FocusLost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::SelectionChange => "selection_change",
            SignalKind::PointerDown => "pointer_down",
            SignalKind::Scroll => "scroll",
            SignalKind::Resize => "resize",
            SignalKind::FocusLost => "focus_lost",
        }
    }

    pub fn mask(self) -> SignalMask {
        match self {
            SignalKind::SelectionChange => SignalMask::SELECTION_CHANGE,
            SignalKind::PointerDown => SignalMask::POINTER_DOWN,
            SignalKind::Scroll => SignalMask::SCROLL,
            SignalKind::Resize => SignalMask::RESIZE,
            SignalKind::FocusLost => SignalMask::FOCUS_LOST,
        }
    }
}

bitflags::bitflags! {
    /// Set of signal kinds, used by hosts to record which listeners are live.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct SignalMask: u8 {
        const SELECTION_CHANGE = 1;
        const POINTER_DOWN = 2;
        const SCROLL = 4;
        const RESIZE = 8;
        const FOCUS_LOST = 16;
    }
}

/// A single platform notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    /// The document's selection changed somewhere. Payload-free on purpose: the
    /// platform selection is only final on the next frame and must be read then.
    SelectionChanged,
    /// Primary pointer pressed. `target` is the deepest node under the pointer.
    PointerDown { target: Option<WidgetId> },
    /// Some scrollable node (or the page when `target` is `None`) scrolled.
    Scroll { target: Option<WidgetId> },
    /// Viewport resized to `width` x `height`.
    Resize { width: f64, height: f64 },
    /// Keyboard focus left the active widget.
    FocusLost,
}

impl Signal {
    pub fn kind(&self) -> SignalKind {
        match self {
            Signal::SelectionChanged => SignalKind::SelectionChange,
            Signal::PointerDown { .. } => SignalKind::PointerDown,
            Signal::Scroll { .. } => SignalKind::Scroll,
            Signal::Resize { .. } => SignalKind::Resize,
            Signal::FocusLost => SignalKind::FocusLost,
        }
    }
}

/// Listener registration options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListenOptions {
    /// Receive the signal during the capture phase, so scrolls of any
    /// ancestor are observed and not only the page's own.
    pub capture: bool,
}

impl ListenOptions {
    pub const CAPTURE: ListenOptions = ListenOptions { capture: true };
}

/// Producer half handed to host listeners.
#[derive(Debug, Clone)]
pub struct SignalSink {
    tx: Sender<Signal>,
}

impl SignalSink {
    /// Queue a signal. Returns `false` when the engine side is gone.
    pub fn emit(&self, signal: Signal) -> bool {
        match self.tx.send(signal) {
            Ok(()) => {
                SIGNALS_EMITTED.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(_) => {
                SIGNAL_SEND_FAILURES.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(target: "selection.lifecycle", kind = signal.kind().as_str(), "signal_dropped_no_receiver");
                false
            }
        }
    }
}

/// Consumer half owned by the engine.
#[derive(Debug)]
pub struct SignalQueue {
    rx: Receiver<Signal>,
}

impl SignalQueue {
    /// Pop the next queued signal without blocking.
    pub fn try_next(&self) -> Option<Signal> {
        match self.rx.try_recv() {
            Ok(signal) => Some(signal),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Discard everything queued so far, returning how many signals were dropped.
    pub fn clear(&self) -> usize {
        self.rx.try_iter().count()
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

/// Create a connected sink/queue pair. Unbounded: signals are tiny and the
/// engine drains every tick.
pub fn signal_channel() -> (SignalSink, SignalQueue) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (SignalSink { tx }, SignalQueue { rx })
}

/// Default quiescence window for scroll/resize recomputation.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// Convenience for tests and scripted hosts: `base + ms`.
pub fn at_ms(base: Instant, ms: u64) -> Instant {
    base + Duration::from_millis(ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_queues_in_order() {
        let (sink, queue) = signal_channel();
        assert!(sink.emit(Signal::SelectionChanged));
        assert!(sink.emit(Signal::Scroll { target: None }));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.try_next(), Some(Signal::SelectionChanged));
        assert_eq!(queue.try_next(), Some(Signal::Scroll { target: None }));
        assert_eq!(queue.try_next(), None);
    }

    #[test]
    fn emit_after_queue_drop_reports_failure() {
        let (sink, queue) = signal_channel();
        drop(queue);
        let before = signal_counters();
        assert!(!sink.emit(Signal::FocusLost));
        assert!(signal_counters().send_failures > before.send_failures);
    }

    #[test]
    fn counters_track_emitted_signals() {
        let (sink, _queue) = signal_channel();
        let before = signal_counters();
        sink.emit(Signal::SelectionChanged);
        sink.emit(Signal::FocusLost);
        assert!(signal_counters().emitted >= before.emitted + 2);
    }

    #[test]
    fn clones_share_one_queue() {
        let (sink, queue) = signal_channel();
        let other = sink.clone();
        sink.emit(Signal::Resize {
            width: 10.0,
            height: 5.0,
        });
        other.emit(Signal::PointerDown {
            target: Some(WidgetId(3)),
        });
        assert_eq!(queue.clear(), 2);
        assert!(queue.is_empty());
    }

    #[test]
    fn kinds_map_to_distinct_mask_bits() {
        let mut all = SignalMask::empty();
        for kind in SignalKind::ALL {
            assert!(!all.contains(kind.mask()), "duplicate bit for {}", kind.as_str());
            all |= kind.mask();
        }
        assert_eq!(all, SignalMask::all());
    }
}
