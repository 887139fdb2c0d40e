//! Horizontal swipe recognition.
//!
//! A swipe is a horizontally locked drag. While it is in progress the
//! recognizer exposes direction and distance for visual feedback; on release
//! it reports the direction once if the distance reached the threshold, then
//! resets to neutral whether or not it fired.

use super::pointer::{AxisLock, PointerButton, PointerSource, PointerTracker};
use crate::model::Point;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Distance (px) a swipe must cover to commit.
pub const DEFAULT_SWIPE_THRESHOLD: f32 = 80.0;

/// Largest visual offset (px) a swiping row is translated by.
pub const MAX_SWIPE_OFFSET: f32 = 120.0;

/// Direction of a horizontal swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    /// Towards negative x.
    Left,
    /// Towards positive x.
    Right,
}

/// Swipe recognizer configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeConfig {
    /// Commit distance in px.
    pub threshold: f32,
    /// Axis-lock slop in px.
    pub axis_lock_slop: f32,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SWIPE_THRESHOLD,
            axis_lock_slop: super::pointer::DEFAULT_AXIS_LOCK_SLOP,
        }
    }
}

/// Observable swipe state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SwipeState {
    /// Current direction, `None` when neutral.
    pub direction: Option<SwipeDirection>,
    /// Absolute horizontal displacement in px.
    pub distance: f32,
    /// Whether a horizontally locked drag is in progress.
    pub is_swiping: bool,
}

impl SwipeState {
    /// The neutral state every session ends in.
    pub fn neutral() -> Self {
        Self::default()
    }

    /// Signed translation for the swiping row, clamped to `max`.
    pub fn offset(&self, max: f32) -> f32 {
        if !self.is_swiping {
            return 0.0;
        }
        match self.direction {
            Some(SwipeDirection::Right) => self.distance.min(max),
            Some(SwipeDirection::Left) => -self.distance.min(max),
            None => 0.0,
        }
    }

    /// Progress towards the threshold in `0.0..=1.0`.
    pub fn progress(&self, threshold: f32) -> f32 {
        if threshold <= 0.0 {
            return 1.0;
        }
        (self.distance / threshold).min(1.0)
    }
}

/// Recognizes left/right swipes for one row.
#[derive(Debug, Clone)]
pub struct SwipeRecognizer {
    config: SwipeConfig,
    tracker: PointerTracker,
    state: SwipeState,
}

impl Default for SwipeRecognizer {
    fn default() -> Self {
        Self::new(SwipeConfig::default())
    }
}

impl SwipeRecognizer {
    /// Create a recognizer.
    pub fn new(config: SwipeConfig) -> Self {
        Self {
            config,
            tracker: PointerTracker::new(config.axis_lock_slop),
            state: SwipeState::neutral(),
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> SwipeConfig {
        self.config
    }

    /// Current observable state.
    pub fn state(&self) -> SwipeState {
        self.state
    }

    /// Whether a press is being tracked.
    pub fn is_active(&self) -> bool {
        self.tracker.is_tracking()
    }

    /// Axis lock of the tracked press.
    pub fn lock(&self) -> AxisLock {
        self.tracker.lock()
    }

    /// Start a session.
    ///
    /// Mouse presses other than the primary button are ignored and return
    /// `false`.
    pub fn press(
        &mut self,
        position: Point,
        source: PointerSource,
        button: PointerButton,
        at: Duration,
    ) -> bool {
        if source == PointerSource::Mouse && button != PointerButton::Primary {
            return false;
        }
        self.tracker.begin(position, at);
        self.state = SwipeState::neutral();
        true
    }

    /// Feed a move. Returns `true` when the caller must suppress the
    /// platform default (the session is horizontally locked).
    pub fn on_move(&mut self, position: Point) -> bool {
        let Some(sample) = self.tracker.sample(position) else {
            return false;
        };
        if sample.lock != AxisLock::Horizontal {
            return false;
        }

        self.state = SwipeState {
            direction: Some(if sample.dx > 0.0 {
                SwipeDirection::Right
            } else {
                SwipeDirection::Left
            }),
            distance: sample.dx.abs(),
            is_swiping: true,
        };
        sample.suppress_default
    }

    /// End the session. Returns the committed direction, if any.
    ///
    /// The state is reset to neutral in every case.
    pub fn release(&mut self) -> Option<SwipeDirection> {
        if self.tracker.end().is_none() {
            return None;
        }

        let state = self.state;
        self.state = SwipeState::neutral();

        if state.is_swiping && state.distance >= self.config.threshold {
            debug!(direction = ?state.direction, distance = state.distance, "swipe committed");
            state.direction
        } else {
            None
        }
    }

    /// Abort the session without reporting anything.
    ///
    /// Used for touch cancel and for a mouse leaving the element mid-press.
    pub fn cancel(&mut self) {
        self.tracker.end();
        self.state = SwipeState::neutral();
    }
}

#[cfg(test)]
#[path = "swipe_tests.rs"]
mod tests;
