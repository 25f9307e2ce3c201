//! Single-slot trailing-edge debounce timer.
//!
//! One deadline shared by every signal kind that arms it: a new occurrence of
//! any kind pushes the deadline out to `now + window`. The most recent kind is
//! kept only for diagnostics. Time is supplied by the caller, so the timer
//! never reads a clock itself.

use std::time::{Duration, Instant};

use crate::SignalKind;

#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
    trigger: Option<SignalKind>,
    /// Arms since the timer last fired or was cancelled.
    coalesced: u32,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
            trigger: None,
            coalesced: 0,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// (Re)start the timer. Any previous deadline is discarded.
    pub fn arm(&mut self, now: Instant, kind: SignalKind) {
        self.deadline = Some(now + self.window);
        self.trigger = Some(kind);
        self.coalesced = self.coalesced.saturating_add(1);
        tracing::trace!(
            target: "selection.lifecycle",
            kind = kind.as_str(),
            coalesced = self.coalesced,
            "debounce_armed"
        );
    }

    /// Drop the pending deadline. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        let was_pending = self.deadline.take().is_some();
        self.trigger = None;
        self.coalesced = 0;
        was_pending
    }

    /// Fire if the deadline has passed, returning the last trigger kind. A
    /// fired timer is disarmed; it fires at most once per arm sequence.
    pub fn fire_if_due(&mut self, now: Instant) -> Option<SignalKind> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        let kind = self.trigger.take();
        tracing::trace!(
            target: "selection.lifecycle",
            coalesced = self.coalesced,
            late_us = now.duration_since(deadline).as_micros() as u64,
            "debounce_fired"
        );
        self.deadline = None;
        self.coalesced = 0;
        kind
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(crate::DEFAULT_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::at_ms;

    #[test]
    fn burst_fires_once_after_last_arm() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(100));
        for ms in [0, 10, 20, 30, 40] {
            d.arm(at_ms(t0, ms), SignalKind::Scroll);
            assert_eq!(d.fire_if_due(at_ms(t0, ms)), None);
        }
        assert_eq!(d.deadline(), Some(at_ms(t0, 140)));
        assert_eq!(d.fire_if_due(at_ms(t0, 139)), None);
        assert_eq!(d.fire_if_due(at_ms(t0, 140)), Some(SignalKind::Scroll));
        assert_eq!(d.fire_if_due(at_ms(t0, 500)), None);
    }

    #[test]
    fn scroll_and_resize_share_the_slot() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(100));
        d.arm(t0, SignalKind::Scroll);
        d.arm(at_ms(t0, 60), SignalKind::Resize);
        assert_eq!(d.fire_if_due(at_ms(t0, 100)), None);
        assert_eq!(d.fire_if_due(at_ms(t0, 160)), Some(SignalKind::Resize));
    }

    #[test]
    fn cancel_disarms() {
        let t0 = Instant::now();
        let mut d = Debouncer::default();
        d.arm(t0, SignalKind::Resize);
        assert!(d.cancel());
        assert!(!d.cancel());
        assert_eq!(d.fire_if_due(at_ms(t0, 1_000)), None);
    }
}
