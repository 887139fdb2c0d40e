//! Single-shot deadline timers driven by an injected clock.
//!
//! The gesture core never reads the wall clock. Every operation receives
//! `now` as a [`Duration`] since an arbitrary origin chosen by the caller,
//! and timers fire from `poll(now)`. A disarmed timer has no deadline, so it
//! cannot fire.

use std::time::Duration;

/// A single-shot timer slot.
///
/// Arming an armed timer replaces the deadline; there is never more than one
/// pending deadline per slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timer {
    deadline: Option<Duration>,
}

impl Timer {
    /// A disarmed timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer to fire `delay` after `now`.
    pub fn arm(&mut self, now: Duration, delay: Duration) {
        self.deadline = Some(now.saturating_add(delay));
    }

    /// Cancel the pending deadline, if any.
    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    /// Whether a deadline is pending.
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Pending deadline.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Fire the timer if its deadline has passed.
    ///
    /// Returns `true` exactly once per arm; the timer is disarmed when it fires.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn new_timer_is_disarmed_and_never_fires() {
        let mut timer = Timer::new();
        assert!(!timer.is_armed());
        assert!(!timer.poll(ms(1_000_000)));
    }

    #[test]
    fn fires_once_at_deadline() {
        let mut timer = Timer::new();
        timer.arm(ms(100), ms(500));

        assert!(!timer.poll(ms(599)), "must not fire early");
        assert!(timer.poll(ms(600)), "fires at the deadline");
        assert!(!timer.poll(ms(700)), "fires only once per arm");
        assert!(!timer.is_armed());
    }

    #[test]
    fn disarmed_timer_cannot_fire() {
        let mut timer = Timer::new();
        timer.arm(ms(0), ms(500));
        timer.disarm();
        assert!(!timer.poll(ms(10_000)));
    }

    #[test]
    fn rearm_replaces_deadline() {
        let mut timer = Timer::new();
        timer.arm(ms(0), ms(500));
        timer.arm(ms(300), ms(500));

        assert!(!timer.poll(ms(500)), "old deadline is gone");
        assert_eq!(timer.deadline(), Some(ms(800)));
        assert!(timer.poll(ms(800)));
    }
}
