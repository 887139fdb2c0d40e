//! Per-row arbitration between tap, swipe, long-press edit and drag.
//!
//! Each row owns one router. A press picks exactly one owner for the whole
//! session: the row body (swipe + long press + tap) or the drag handle (the
//! list's shared [`DragReorderController`]). Outcomes are returned as
//! [`RowEffect`] values instead of being pushed through callbacks.

use super::config::GestureConfig;
use super::drag::{DragPhase, DragReorderController, ReorderHost};
use super::long_press::{LongPressRecognizer, LongPressState};
use super::pointer::{AxisLock, PointerButton, PointerEvent, PointerInput, PointerSource};
use super::swipe::{SwipeDirection, SwipeRecognizer, SwipeState, MAX_SWIPE_OFFSET};
use super::timer::Timer;
use crate::model::{Point, RowId};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

/// Part of a row a press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// Row content: tap, swipe and long press.
    Body,
    /// Reorder handle: drag.
    Handle,
}

/// What the current session has turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    /// Pressed, nothing recognized yet.
    #[default]
    Idle,
    /// Horizontally locked swipe.
    Swiping,
    /// The long press fired.
    LongPressing,
    /// The handle drag is live.
    Dragging,
}

/// One press-to-release lifecycle on a row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSession {
    /// Region that owns the session.
    pub region: Region,
    /// Press position.
    pub start: Point,
    /// Latest position.
    pub current: Point,
    /// Press time.
    pub started_at: Duration,
    /// Axis lock so far.
    pub lock: AxisLock,
    /// Recognized activity.
    pub activity: Activity,
}

impl PointerSession {
    fn new(region: Region, start: Point, at: Duration) -> Self {
        Self {
            region,
            start,
            current: start,
            started_at: at,
            lock: AxisLock::Undecided,
            activity: Activity::Idle,
        }
    }

    /// Time since the press.
    pub fn elapsed(&self, now: Duration) -> Duration {
        now.saturating_sub(self.started_at)
    }
}

/// How a row leaves the list after a committed swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExitKind {
    /// Swiped right.
    Complete,
    /// Swiped left.
    Delete,
}

impl From<SwipeDirection> for ExitKind {
    fn from(direction: SwipeDirection) -> Self {
        match direction {
            SwipeDirection::Right => ExitKind::Complete,
            SwipeDirection::Left => ExitKind::Delete,
        }
    }
}

/// Something the front end must act on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum RowEffect {
    /// Tap: expand or collapse the row details.
    ToggleExpanded {
        /// Tapped row.
        row: RowId,
    },
    /// Long press on the body: open the editor.
    Edit {
        /// Pressed row.
        row: RowId,
    },
    /// A swipe committed; the row starts its exit animation.
    ExitStarted {
        /// Exiting row.
        row: RowId,
        /// Effect that follows once the animation is over.
        kind: ExitKind,
    },
    /// Exit animation over after a right swipe.
    Complete {
        /// Completed row.
        row: RowId,
    },
    /// Exit animation over after a left swipe.
    Delete {
        /// Deleted row.
        row: RowId,
    },
    /// The handle hold activated a drag.
    DragStarted {
        /// Dragged row.
        row: RowId,
    },
    /// A drag was dropped on a new index.
    Reorder {
        /// Moved row.
        row: RowId,
        /// Source index.
        from: usize,
        /// Target index.
        to: usize,
    },
    /// Every expanded row was collapsed.
    CollapseOpen,
    /// Haptic pulse request.
    Haptic {
        /// Pulse length in milliseconds.
        duration_ms: u64,
    },
}

/// Effects of one routed event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteOutcome {
    /// Effects in emission order.
    pub effects: Vec<RowEffect>,
    /// The platform default (page scroll) must be suppressed.
    pub suppress_default: bool,
}

impl RouteOutcome {
    fn ignored() -> Self {
        Self::default()
    }

    fn with(effect: RowEffect) -> Self {
        Self {
            effects: vec![effect],
            suppress_default: false,
        }
    }
}

/// Interaction state of one row.
#[derive(Debug, Clone)]
pub struct InteractionRouter {
    id: RowId,
    exit_duration: Duration,
    swipe: SwipeRecognizer,
    long_press: LongPressRecognizer,
    session: Option<PointerSession>,
    exit: Option<ExitKind>,
    exit_timer: Timer,
    expanded: bool,
    unmounted: bool,
}

impl InteractionRouter {
    /// Create a router for `id`.
    pub fn new(id: RowId, config: &GestureConfig) -> Self {
        Self {
            id,
            exit_duration: config.exit_duration,
            swipe: SwipeRecognizer::new(config.swipe),
            long_press: LongPressRecognizer::new(config.long_press),
            session: None,
            exit: None,
            exit_timer: Timer::new(),
            expanded: false,
            unmounted: false,
        }
    }

    /// Row identifier.
    pub fn id(&self) -> &RowId {
        &self.id
    }

    /// Live session, if the row is pressed.
    pub fn session(&self) -> Option<&PointerSession> {
        self.session.as_ref()
    }

    /// Swipe feedback state.
    pub fn swipe_state(&self) -> SwipeState {
        self.swipe.state()
    }

    /// Signed translation of the row content.
    pub fn swipe_offset(&self) -> f32 {
        self.swipe.state().offset(MAX_SWIPE_OFFSET)
    }

    /// Progress of the current swipe towards the threshold.
    pub fn swipe_progress(&self) -> f32 {
        self.swipe.state().progress(self.swipe.config().threshold)
    }

    /// Long-press state.
    pub fn long_press_state(&self) -> LongPressState {
        self.long_press.state()
    }

    /// Whether the row details are shown.
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Hide the row details.
    pub fn collapse(&mut self) {
        self.expanded = false;
    }

    /// Exit in progress, if any.
    pub fn exiting(&self) -> Option<ExitKind> {
        self.exit
    }

    /// Whether [`unmount`](Self::unmount) was called.
    pub fn is_unmounted(&self) -> bool {
        self.unmounted
    }

    /// Route one pointer event. `region` is only read for presses.
    pub fn handle(
        &mut self,
        event: PointerEvent,
        region: Region,
        drag: &mut DragReorderController,
        host: &mut dyn ReorderHost,
    ) -> RouteOutcome {
        if self.unmounted || self.exit.is_some() {
            return RouteOutcome::ignored();
        }
        match event.input {
            PointerInput::Down {
                position,
                source,
                button,
            } => self.press(region, position, source, button, event.at, drag, &*host),
            PointerInput::Move { position } => self.on_move(position, drag, &*host),
            PointerInput::Up => self.release(event.at, drag, host),
            PointerInput::Cancel => {
                self.abort(drag);
                RouteOutcome::ignored()
            }
            PointerInput::Leave => {
                if matches!(self.session, Some(s) if s.region == Region::Body) {
                    self.abort(drag);
                }
                RouteOutcome::ignored()
            }
        }
    }

    /// Advance the clock: exit transition, long press and drag activation.
    pub fn tick(
        &mut self,
        now: Duration,
        drag: &mut DragReorderController,
        host: &mut dyn ReorderHost,
    ) -> Vec<RowEffect> {
        let mut effects = Vec::new();
        if self.unmounted {
            return effects;
        }

        if self.exit_timer.poll(now) {
            if let Some(kind) = self.exit.take() {
                info!(row = %self.id, ?kind, "exit transition finished");
                effects.push(match kind {
                    ExitKind::Complete => RowEffect::Complete {
                        row: self.id.clone(),
                    },
                    ExitKind::Delete => RowEffect::Delete {
                        row: self.id.clone(),
                    },
                });
            }
        }

        let Some(session) = self.session.as_mut() else {
            return effects;
        };
        match session.region {
            Region::Body => {
                if self.long_press.tick(now) {
                    session.activity = Activity::LongPressing;
                    self.swipe.cancel();
                    info!(row = %self.id, "long press: edit");
                    effects.push(RowEffect::Edit {
                        row: self.id.clone(),
                    });
                }
            }
            Region::Handle => {
                if drag.owner() == Some(&self.id) {
                    if let Some(row) = drag.tick(now, host) {
                        session.activity = Activity::Dragging;
                        effects.push(RowEffect::DragStarted { row });
                    }
                }
            }
        }
        effects
    }

    /// Cancel every pending timer and any drag this row owns. The router
    /// ignores all input afterwards.
    pub fn unmount(&mut self, drag: &mut DragReorderController) {
        self.abort(drag);
        self.exit_timer.disarm();
        self.exit = None;
        self.unmounted = true;
        debug!(row = %self.id, "row unmounted");
    }

    #[allow(clippy::too_many_arguments)]
    fn press(
        &mut self,
        region: Region,
        position: Point,
        source: PointerSource,
        button: PointerButton,
        at: Duration,
        drag: &mut DragReorderController,
        host: &dyn ReorderHost,
    ) -> RouteOutcome {
        if self.session.is_some() {
            debug!(row = %self.id, "press ignored: session already live");
            return RouteOutcome::ignored();
        }
        match region {
            Region::Body => {
                if !self.swipe.press(position, source, button, at) {
                    return RouteOutcome::ignored();
                }
                self.long_press.press(position, at);
            }
            Region::Handle => {
                if source == PointerSource::Mouse && button != PointerButton::Primary {
                    return RouteOutcome::ignored();
                }
                if !drag.press_handle(&self.id, position.y, at, host) {
                    return RouteOutcome::ignored();
                }
            }
        }
        self.session = Some(PointerSession::new(region, position, at));
        RouteOutcome::ignored()
    }

    fn on_move(
        &mut self,
        position: Point,
        drag: &mut DragReorderController,
        host: &dyn ReorderHost,
    ) -> RouteOutcome {
        let Some(session) = self.session.as_mut() else {
            return RouteOutcome::ignored();
        };
        session.current = position;

        let suppress_default = match session.region {
            Region::Body => {
                self.long_press.on_move(position);
                let suppress = self.swipe.on_move(position);
                if self.swipe.is_active() {
                    session.lock = self.swipe.lock();
                }
                if self.swipe.state().is_swiping {
                    session.activity = Activity::Swiping;
                }
                suppress
            }
            Region::Handle => {
                if drag.owner() != Some(&self.id) {
                    return RouteOutcome::ignored();
                }
                let suppress = drag.on_move(position.y, host);
                if drag.phase() == DragPhase::Dragging {
                    session.activity = Activity::Dragging;
                }
                suppress
            }
        };
        RouteOutcome {
            effects: Vec::new(),
            suppress_default,
        }
    }

    fn release(
        &mut self,
        at: Duration,
        drag: &mut DragReorderController,
        host: &mut dyn ReorderHost,
    ) -> RouteOutcome {
        let Some(session) = self.session.take() else {
            return RouteOutcome::ignored();
        };

        match session.region {
            Region::Handle => {
                if drag.owner() != Some(&self.id) {
                    return RouteOutcome::ignored();
                }
                match drag.release(host) {
                    Some(commit) => RouteOutcome::with(RowEffect::Reorder {
                        row: commit.row,
                        from: commit.from,
                        to: commit.to,
                    }),
                    None => RouteOutcome::ignored(),
                }
            }
            Region::Body => {
                let was_swiping = self.swipe.state().is_swiping;
                let committed = self.swipe.release();
                self.long_press.release();
                let triggered = self.long_press.triggered();

                if let Some(direction) = committed {
                    let kind = ExitKind::from(direction);
                    self.exit = Some(kind);
                    self.exit_timer.arm(at, self.exit_duration);
                    info!(row = %self.id, ?kind, "exit transition started");
                    return RouteOutcome::with(RowEffect::ExitStarted {
                        row: self.id.clone(),
                        kind,
                    });
                }

                if triggered || was_swiping || session.lock == AxisLock::Vertical {
                    return RouteOutcome::ignored();
                }
                self.expanded = !self.expanded;
                debug!(row = %self.id, expanded = self.expanded, "tap");
                RouteOutcome::with(RowEffect::ToggleExpanded {
                    row: self.id.clone(),
                })
            }
        }
    }

    fn abort(&mut self, drag: &mut DragReorderController) {
        let Some(session) = self.session.take() else {
            return;
        };
        match session.region {
            Region::Body => {
                self.swipe.cancel();
                self.long_press.cancel();
            }
            Region::Handle => {
                if drag.owner() == Some(&self.id) {
                    drag.cancel();
                }
            }
        }
        debug!(row = %self.id, "session cancelled");
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
