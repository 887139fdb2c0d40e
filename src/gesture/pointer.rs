//! Raw pointer input and axis-lock classification.
//!
//! Touch and mouse input are normalised into [`PointerInput`] before they
//! reach any recognizer. [`PointerTracker`] follows one press-to-release
//! sequence and decides, once, whether the gesture is horizontal or vertical.

use crate::model::Point;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::trace;

/// Distance (px) a pointer must travel on either axis before the axis locks.
pub const DEFAULT_AXIS_LOCK_SLOP: f32 = 5.0;

/// Physical device that produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerSource {
    /// Finger on a touch screen.
    #[default]
    Touch,
    /// Mouse or trackpad.
    Mouse,
}

/// Mouse button of a press. Touch presses are always `Primary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerButton {
    /// Left button or a finger.
    #[default]
    Primary,
    /// Right button.
    Secondary,
    /// Middle button.
    Auxiliary,
}

/// A normalised pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerInput {
    /// Press start (touchstart / mousedown).
    Down {
        /// Press position.
        position: Point,
        /// Device that pressed.
        #[serde(default)]
        source: PointerSource,
        /// Button that pressed.
        #[serde(default)]
        button: PointerButton,
    },
    /// Pointer moved while pressed.
    Move {
        /// New position.
        position: Point,
    },
    /// Press released (touchend / mouseup).
    Up,
    /// Session interrupted by the platform (touchcancel).
    Cancel,
    /// Mouse pointer left the element while pressed.
    Leave,
}

impl PointerInput {
    /// Convenience constructor for a primary touch press.
    pub fn down(x: f32, y: f32) -> Self {
        PointerInput::Down {
            position: Point::new(x, y),
            source: PointerSource::Touch,
            button: PointerButton::Primary,
        }
    }

    /// Convenience constructor for a move.
    pub fn move_to(x: f32, y: f32) -> Self {
        PointerInput::Move {
            position: Point::new(x, y),
        }
    }

    /// Position carried by the event, if any.
    pub fn position(&self) -> Option<Point> {
        match self {
            PointerInput::Down { position, .. } | PointerInput::Move { position } => {
                Some(*position)
            }
            PointerInput::Up | PointerInput::Cancel | PointerInput::Leave => None,
        }
    }
}

/// A pointer event stamped with the injected clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Time since the caller's clock origin.
    pub at: Duration,
    /// What happened.
    pub input: PointerInput,
}

impl PointerEvent {
    /// Create an event.
    pub fn new(at: Duration, input: PointerInput) -> Self {
        Self { at, input }
    }
}

/// Axis-lock decision for one pointer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisLock {
    /// The pointer has not left the slop square yet.
    #[default]
    Undecided,
    /// Horizontal gesture; scrolling is suppressed.
    Horizontal,
    /// Vertical gesture; left to the page scroll.
    Vertical,
}

/// Result of feeding one sample into the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackSample {
    /// Horizontal displacement from the press point.
    pub dx: f32,
    /// Vertical displacement from the press point.
    pub dy: f32,
    /// Axis lock after this sample.
    pub lock: AxisLock,
    /// The caller must suppress the platform's default action (scroll,
    /// back navigation) for this event.
    pub suppress_default: bool,
}

#[derive(Debug, Clone, Copy)]
struct Track {
    start: Point,
    current: Point,
    started_at: Duration,
    lock: AxisLock,
}

/// Follows a single pointer from press to release.
///
/// The axis lock is decided the first time the pointer leaves the slop
/// square and never re-evaluated for the rest of the session.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    slop: f32,
    track: Option<Track>,
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new(DEFAULT_AXIS_LOCK_SLOP)
    }
}

impl PointerTracker {
    /// Create a tracker with the given axis-lock slop.
    pub fn new(slop: f32) -> Self {
        Self { slop, track: None }
    }

    /// Start tracking a press. Replaces any session still being tracked.
    pub fn begin(&mut self, position: Point, at: Duration) {
        self.track = Some(Track {
            start: position,
            current: position,
            started_at: at,
            lock: AxisLock::Undecided,
        });
    }

    /// Feed a move sample. Returns `None` when no press is being tracked.
    pub fn sample(&mut self, position: Point) -> Option<TrackSample> {
        let slop = self.slop;
        let track = self.track.as_mut()?;
        track.current = position;

        let dx = position.x - track.start.x;
        let dy = position.y - track.start.y;

        if track.lock == AxisLock::Undecided && (dx.abs() > slop || dy.abs() > slop) {
            track.lock = if dx.abs() > dy.abs() {
                AxisLock::Horizontal
            } else {
                AxisLock::Vertical
            };
            trace!(lock = ?track.lock, dx, dy, "axis locked");
        }

        Some(TrackSample {
            dx,
            dy,
            lock: track.lock,
            suppress_default: track.lock == AxisLock::Horizontal,
        })
    }

    /// Stop tracking. Returns the final displacement, or `None` if idle.
    pub fn end(&mut self) -> Option<TrackSample> {
        let track = self.track.take()?;
        Some(TrackSample {
            dx: track.current.x - track.start.x,
            dy: track.current.y - track.start.y,
            lock: track.lock,
            suppress_default: false,
        })
    }

    /// Whether a press is being tracked.
    pub fn is_tracking(&self) -> bool {
        self.track.is_some()
    }

    /// Current axis lock (`Undecided` when idle).
    pub fn lock(&self) -> AxisLock {
        self.track.map(|t| t.lock).unwrap_or_default()
    }

    /// Press position.
    pub fn start(&self) -> Option<Point> {
        self.track.map(|t| t.start)
    }

    /// Latest sampled position.
    pub fn current(&self) -> Option<Point> {
        self.track.map(|t| t.current)
    }

    /// Time since the press.
    pub fn elapsed(&self, now: Duration) -> Option<Duration> {
        self.track.map(|t| now.saturating_sub(t.started_at))
    }
}
