//! Long-press-activated drag reordering.
//!
//! State machine: `Idle → Armed → Dragging → Idle`.
//!
//! - A press on a row's handle arms a timer (`Armed`).
//! - Moving more than the cancel slop vertically before it fires means the
//!   user is scrolling: back to `Idle`.
//! - When the timer fires the drag starts: the host collapses any open row,
//!   gets a haptic pulse, and a floating proxy is placed over the row.
//! - Every move re-targets the drop index to the row whose vertical center
//!   is nearest to the pointer.
//! - Release commits `reorder(source, target)` if the two differ.
//!
//! There is one controller per list, so at most one row can be armed or
//! dragging at a time. The controller is the only writer of [`DragState`].

use super::timer::Timer;
use crate::model::{RowId, RowRect, Viewport};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

/// Hold duration on the handle before a drag starts.
pub const DEFAULT_DRAG_ACTIVATION_DELAY: Duration = Duration::from_millis(500);

/// Vertical movement (px) before activation that abandons the drag.
pub const DEFAULT_DRAG_CANCEL_SLOP: f32 = 10.0;

/// Haptic pulse emitted when a drag starts.
pub const DEFAULT_HAPTIC_PULSE: Duration = Duration::from_millis(30);

/// Height (px) of the viewport bands that trigger autoscroll.
pub const DEFAULT_AUTOSCROLL_EDGE: f32 = 48.0;

/// Largest autoscroll step (px per tick).
pub const DEFAULT_AUTOSCROLL_MAX_STEP: f32 = 12.0;

/// Drag-reorder configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragConfig {
    /// Hold duration on the handle.
    pub activation_delay: Duration,
    /// Vertical slop before activation.
    pub cancel_slop: f32,
    /// Haptic pulse length.
    pub haptic_pulse: Duration,
    /// Autoscroll band height.
    pub autoscroll_edge: f32,
    /// Autoscroll step cap.
    pub autoscroll_max_step: f32,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            activation_delay: DEFAULT_DRAG_ACTIVATION_DELAY,
            cancel_slop: DEFAULT_DRAG_CANCEL_SLOP,
            haptic_pulse: DEFAULT_HAPTIC_PULSE,
            autoscroll_edge: DEFAULT_AUTOSCROLL_EDGE,
            autoscroll_max_step: DEFAULT_AUTOSCROLL_MAX_STEP,
        }
    }
}

/// A row as last measured by the front end.
#[derive(Debug, Clone, PartialEq, Serialize, serde::Deserialize)]
pub struct RowSlot {
    /// Row identifier.
    pub id: RowId,
    /// Bounding rect, `None` while the row is not laid out.
    #[serde(default)]
    pub rect: Option<RowRect>,
    /// Drag handle rect inside the row, if the row is reorderable.
    #[serde(default)]
    pub handle: Option<RowRect>,
}

impl RowSlot {
    /// A measured row without a handle.
    pub fn new(id: RowId, rect: RowRect) -> Self {
        Self {
            id,
            rect: Some(rect),
            handle: None,
        }
    }

    /// Attach a handle rect.
    pub fn with_handle(mut self, handle: RowRect) -> Self {
        self.handle = Some(handle);
        self
    }
}

/// Collaborator capabilities the drag controller needs.
///
/// Geometry is read live on every call so the controller always works
/// against the latest layout the host measured. Rows that are still
/// animating report their last measured rect.
pub trait ReorderHost {
    /// Rows in their current committed order.
    fn rows(&self) -> &[RowSlot];

    /// Commit a move of the row at `from` to `to`. The host persists the
    /// new order and reports it back through [`rows`](Self::rows).
    fn reorder(&mut self, from: usize, to: usize);

    /// Close any expanded row before a drag starts.
    fn collapse_open(&mut self);

    /// Fire-and-forget haptic pulse. Hosts without haptics ignore it.
    fn vibrate(&mut self, _duration: Duration) {}
}

/// Public view of the controller's phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DragPhase {
    /// No handle is pressed.
    Idle,
    /// Handle pressed, activation timer running.
    Armed,
    /// Drag in progress.
    Dragging,
}

/// Observable drag state. Empty unless a drag is in progress.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DragState {
    /// Row being dragged.
    pub dragging_id: Option<RowId>,
    /// Index the row would land on if released now.
    pub drag_over_index: Option<usize>,
    /// Fixed-position rect of the floating proxy.
    pub floating: Option<RowRect>,
}

impl DragState {
    /// Whether no drag is in progress.
    pub fn is_empty(&self) -> bool {
        self.dragging_id.is_none()
    }
}

/// A committed reorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReorderCommit {
    /// Row that moved.
    pub row: RowId,
    /// Index it was dragged from.
    pub from: usize,
    /// Index it was dropped on.
    pub to: usize,
}

#[derive(Debug, Clone)]
struct ArmedDrag {
    row: RowId,
    start_y: f32,
    rect: RowRect,
    offset_y: f32,
    timer: Timer,
}

#[derive(Debug, Clone)]
struct ActiveDrag {
    row: RowId,
    source_index: usize,
    over_index: usize,
    floating: RowRect,
    offset_y: f32,
    pointer_y: f32,
}

#[derive(Debug, Clone, Default)]
enum Phase {
    #[default]
    Idle,
    Armed(ArmedDrag),
    Dragging(ActiveDrag),
}

/// Drives drag reordering for one list.
#[derive(Debug, Clone, Default)]
pub struct DragReorderController {
    config: DragConfig,
    phase: Phase,
}

impl DragReorderController {
    /// Create a controller.
    pub fn new(config: DragConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> DragConfig {
        self.config
    }

    /// Current phase.
    pub fn phase(&self) -> DragPhase {
        match self.phase {
            Phase::Idle => DragPhase::Idle,
            Phase::Armed(_) => DragPhase::Armed,
            Phase::Dragging(_) => DragPhase::Dragging,
        }
    }

    /// Whether no handle is pressed.
    pub fn is_idle(&self) -> bool {
        matches!(self.phase, Phase::Idle)
    }

    /// Row that currently owns the controller (armed or dragging).
    pub fn owner(&self) -> Option<&RowId> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Armed(armed) => Some(&armed.row),
            Phase::Dragging(active) => Some(&active.row),
        }
    }

    /// Observable state.
    pub fn state(&self) -> DragState {
        match &self.phase {
            Phase::Dragging(active) => DragState {
                dragging_id: Some(active.row.clone()),
                drag_over_index: Some(active.over_index),
                floating: Some(active.floating),
            },
            Phase::Idle | Phase::Armed(_) => DragState::default(),
        }
    }

    /// Handle pressed on `row` at vertical position `pointer_y`.
    ///
    /// Returns `false` when the press is rejected: another row is armed or
    /// dragging, or the row has no measured geometry.
    pub fn press_handle(
        &mut self,
        row: &RowId,
        pointer_y: f32,
        at: Duration,
        host: &dyn ReorderHost,
    ) -> bool {
        if !self.is_idle() {
            debug!(%row, "handle press rejected: another drag owns the list");
            return false;
        }
        let Some(rect) = host
            .rows()
            .iter()
            .find(|slot| &slot.id == row)
            .and_then(|slot| slot.rect)
        else {
            debug!(%row, "handle press ignored: row not measured");
            return false;
        };

        let mut timer = Timer::new();
        timer.arm(at, self.config.activation_delay);
        self.phase = Phase::Armed(ArmedDrag {
            row: row.clone(),
            start_y: pointer_y,
            rect,
            offset_y: pointer_y - rect.top,
            timer,
        });
        debug!(%row, "drag armed");
        true
    }

    /// Advance the clock. Returns the row whose drag just started.
    pub fn tick(&mut self, now: Duration, host: &mut dyn ReorderHost) -> Option<RowId> {
        let Phase::Armed(armed) = &mut self.phase else {
            return None;
        };
        if !armed.timer.poll(now) {
            return None;
        }

        let armed = armed.clone();
        let Some(source_index) = host.rows().iter().position(|slot| slot.id == armed.row) else {
            debug!(row = %armed.row, "drag aborted: row no longer listed");
            self.phase = Phase::Idle;
            return None;
        };

        host.collapse_open();
        host.vibrate(self.config.haptic_pulse);

        info!(row = %armed.row, source_index, "drag started");
        self.phase = Phase::Dragging(ActiveDrag {
            row: armed.row.clone(),
            source_index,
            over_index: source_index,
            floating: armed.rect,
            offset_y: armed.offset_y,
            pointer_y: armed.start_y,
        });
        Some(armed.row)
    }

    /// Pointer moved to `pointer_y`.
    ///
    /// Returns `true` when the platform default (scrolling) must be
    /// suppressed, which is the case for every move while dragging.
    pub fn on_move(&mut self, pointer_y: f32, host: &dyn ReorderHost) -> bool {
        match &mut self.phase {
            Phase::Idle => false,
            Phase::Armed(armed) => {
                if (pointer_y - armed.start_y).abs() > self.config.cancel_slop {
                    debug!(row = %armed.row, "drag disarmed: pointer moved before activation");
                    self.phase = Phase::Idle;
                }
                false
            }
            Phase::Dragging(active) => {
                active.pointer_y = pointer_y;
                active.floating.top = pointer_y - active.offset_y;
                active.over_index =
                    nearest_center_index(host.rows(), pointer_y, active.source_index);
                true
            }
        }
    }

    /// Rows moved under a stationary pointer (scroll, re-measure).
    ///
    /// Recomputes the drop index against the last pointer position. Returns
    /// `true` when the index changed.
    pub fn retarget(&mut self, host: &dyn ReorderHost) -> bool {
        let Phase::Dragging(active) = &mut self.phase else {
            return false;
        };
        let over = nearest_center_index(host.rows(), active.pointer_y, active.source_index);
        if over == active.over_index {
            return false;
        }
        debug!(row = %active.row, from = active.over_index, to = over, "drop target moved");
        active.over_index = over;
        true
    }

    /// Pointer released. Commits the reorder if the drop index moved.
    pub fn release(&mut self, host: &mut dyn ReorderHost) -> Option<ReorderCommit> {
        let phase = std::mem::take(&mut self.phase);
        let Phase::Dragging(active) = phase else {
            return None;
        };
        if active.over_index == active.source_index {
            debug!(row = %active.row, "drag dropped in place");
            return None;
        }

        info!(
            row = %active.row,
            from = active.source_index,
            to = active.over_index,
            "reorder committed"
        );
        host.reorder(active.source_index, active.over_index);
        Some(ReorderCommit {
            row: active.row,
            from: active.source_index,
            to: active.over_index,
        })
    }

    /// Discard everything without committing. Returns `true` if anything
    /// was armed or dragging.
    pub fn cancel(&mut self) -> bool {
        let was_active = !self.is_idle();
        if was_active {
            debug!("drag cancelled");
        }
        self.phase = Phase::Idle;
        was_active
    }

    /// Order to display while dragging: the dragged row removed from `base`
    /// and reinserted at the drop index. Returns `base` unchanged otherwise.
    ///
    /// This is exactly the order a release would commit.
    pub fn preview_order(&self, base: &[RowId]) -> Vec<RowId> {
        let Phase::Dragging(active) = &self.phase else {
            return base.to_vec();
        };
        let mut order: Vec<RowId> = base.iter().filter(|id| **id != active.row).cloned().collect();
        if order.len() == base.len() {
            return base.to_vec();
        }
        let at = active.over_index.min(order.len());
        order.insert(at, active.row.clone());
        order
    }

    /// Scroll step for edge autoscroll, negative when scrolling up.
    ///
    /// The step grows linearly with how deep the pointer is inside the top or
    /// bottom band of `viewport`, up to the configured maximum. Bands never
    /// extend past the middle of the viewport. Zero unless dragging.
    pub fn autoscroll_step(&self, viewport: Viewport) -> f32 {
        let Phase::Dragging(active) = &self.phase else {
            return 0.0;
        };
        // Bands meet at the middle of a short viewport.
        let edge = self.config.autoscroll_edge.min(viewport.height / 2.0);
        if edge <= 0.0 || viewport.height <= 0.0 {
            return 0.0;
        }
        let y = active.pointer_y;
        let max = self.config.autoscroll_max_step;

        let top_band = viewport.top + edge;
        let bottom_band = viewport.bottom() - edge;
        if y < top_band {
            -(((top_band - y) / edge).min(1.0) * max)
        } else if y > bottom_band {
            ((y - bottom_band) / edge).min(1.0) * max
        } else {
            0.0
        }
    }
}

/// Index of the row whose vertical center is closest to `pointer_y`.
///
/// Rows without geometry are skipped. Ties go to the first row in list
/// order. Returns `fallback` when no row is measured.
pub fn nearest_center_index(rows: &[RowSlot], pointer_y: f32, fallback: usize) -> usize {
    let mut closest = fallback;
    let mut closest_distance = f32::INFINITY;
    for (index, slot) in rows.iter().enumerate() {
        let Some(rect) = slot.rect else {
            continue;
        };
        let distance = (pointer_y - rect.center_y()).abs();
        if distance < closest_distance {
            closest_distance = distance;
            closest = index;
        }
    }
    closest
}

#[cfg(test)]
#[path = "drag_tests.rs"]
mod tests;
