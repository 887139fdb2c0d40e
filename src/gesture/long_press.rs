//! Press-and-hold recognition.
//!
//! A long press fires when the pointer stays within a small jitter square
//! for the configured delay. `triggered` stays readable after release so a
//! tap handler evaluated at release time can tell that the press was already
//! consumed.

use super::timer::Timer;
use crate::model::Point;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Default hold duration before a long press fires.
pub const DEFAULT_LONG_PRESS_DELAY: Duration = Duration::from_millis(500);

/// Default movement (px, per axis) tolerated before the hold is abandoned.
pub const DEFAULT_LONG_PRESS_JITTER: f32 = 5.0;

/// Long-press configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LongPressConfig {
    /// Hold duration.
    pub delay: Duration,
    /// Movement tolerated before firing, per axis.
    pub jitter_tolerance: f32,
}

impl Default for LongPressConfig {
    fn default() -> Self {
        Self {
            delay: DEFAULT_LONG_PRESS_DELAY,
            jitter_tolerance: DEFAULT_LONG_PRESS_JITTER,
        }
    }
}

/// Observable long-press state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LongPressState {
    /// The hold fired and the pointer is still down.
    pub is_long_pressing: bool,
    /// The hold fired during the current (or just released) session.
    pub triggered: bool,
}

/// Detects press-and-hold for one row.
#[derive(Debug, Clone, Default)]
pub struct LongPressRecognizer {
    config: LongPressConfig,
    timer: Timer,
    origin: Option<Point>,
    state: LongPressState,
}

impl LongPressRecognizer {
    /// Create a recognizer.
    pub fn new(config: LongPressConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Current observable state.
    pub fn state(&self) -> LongPressState {
        self.state
    }

    /// Whether the hold fired in the current or last session.
    pub fn triggered(&self) -> bool {
        self.state.triggered
    }

    /// Whether the hold timer is pending.
    pub fn is_armed(&self) -> bool {
        self.timer.is_armed()
    }

    /// Start a session and arm the hold timer.
    ///
    /// Clears `triggered` from the previous session. Re-arming replaces any
    /// pending deadline.
    pub fn press(&mut self, position: Point, at: Duration) {
        self.timer.arm(at, self.config.delay);
        self.origin = Some(position);
        self.state = LongPressState::default();
    }

    /// Feed a move. Movement beyond the jitter tolerance before the timer
    /// fires disarms it.
    pub fn on_move(&mut self, position: Point) {
        let Some(origin) = self.origin else {
            return;
        };
        if !self.timer.is_armed() {
            return;
        }
        let tolerance = self.config.jitter_tolerance;
        if (position.x - origin.x).abs() > tolerance || (position.y - origin.y).abs() > tolerance
        {
            debug!("long press abandoned: pointer moved");
            self.timer.disarm();
        }
    }

    /// Advance the clock. Returns `true` exactly once when the hold fires.
    pub fn tick(&mut self, now: Duration) -> bool {
        if !self.timer.poll(now) {
            return false;
        }
        self.state = LongPressState {
            is_long_pressing: true,
            triggered: true,
        };
        debug!("long press fired");
        true
    }

    /// End the session. `triggered` is kept until the next press.
    pub fn release(&mut self) {
        self.timer.disarm();
        self.origin = None;
        self.state.is_long_pressing = false;
    }

    /// Abort the session; same effect as [`release`](Self::release).
    pub fn cancel(&mut self) {
        self.release();
    }
}
