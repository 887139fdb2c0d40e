//! List-level pointer dispatch.
//!
//! [`ListInteraction`] holds the rows in committed order together with their
//! last measured geometry. A press is hit-tested against the rows (and their
//! handles); every later event of that pointer goes to the same row until it
//! is released or cancelled. The list owns the single drag controller, so at
//! most one row can be dragging at a time.

use super::config::GestureConfig;
use super::drag::{DragReorderController, DragState, ReorderHost, RowSlot};
use super::pointer::{PointerEvent, PointerInput};
use super::router::{InteractionRouter, Region, RouteOutcome, RowEffect};
use crate::model::{Point, RowId, Viewport};
use std::time::Duration;
use tracing::{debug, warn};

/// Adapts the list's slots into the drag controller's host capability and
/// collects the requests made through it.
struct SlotHost<'a> {
    slots: &'a [RowSlot],
    reorder: Option<(usize, usize)>,
    collapse: bool,
    pulses: Vec<Duration>,
}

impl<'a> SlotHost<'a> {
    fn new(slots: &'a [RowSlot]) -> Self {
        Self {
            slots,
            reorder: None,
            collapse: false,
            pulses: Vec::new(),
        }
    }

    fn into_requests(self) -> HostRequests {
        HostRequests {
            reorder: self.reorder,
            collapse: self.collapse,
            pulses: self.pulses,
        }
    }
}

impl ReorderHost for SlotHost<'_> {
    fn rows(&self) -> &[RowSlot] {
        self.slots
    }

    fn reorder(&mut self, from: usize, to: usize) {
        self.reorder = Some((from, to));
    }

    fn collapse_open(&mut self) {
        self.collapse = true;
    }

    fn vibrate(&mut self, duration: Duration) {
        self.pulses.push(duration);
    }
}

#[derive(Debug, Default)]
struct HostRequests {
    reorder: Option<(usize, usize)>,
    collapse: bool,
    pulses: Vec<Duration>,
}

/// Gesture state of a whole list.
#[derive(Debug, Clone)]
pub struct ListInteraction {
    config: GestureConfig,
    slots: Vec<RowSlot>,
    routers: Vec<InteractionRouter>,
    drag: DragReorderController,
    active: Option<RowId>,
}

impl Default for ListInteraction {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl ListInteraction {
    /// Empty list.
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            slots: Vec::new(),
            routers: Vec::new(),
            drag: DragReorderController::new(config.drag),
            active: None,
        }
    }

    /// List with initial rows.
    pub fn with_rows(config: GestureConfig, rows: Vec<RowSlot>) -> Self {
        let mut list = Self::new(config);
        list.set_rows(rows);
        list
    }

    /// Configuration in use.
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Rows in committed order with their geometry.
    pub fn rows(&self) -> &[RowSlot] {
        &self.slots
    }

    /// Committed row order.
    pub fn order(&self) -> Vec<RowId> {
        self.slots.iter().map(|slot| slot.id.clone()).collect()
    }

    /// Order to display: the committed order with the dragged row moved to
    /// its current drop index.
    pub fn preview_order(&self) -> Vec<RowId> {
        self.drag.preview_order(&self.order())
    }

    /// Drag state for rendering.
    pub fn drag_state(&self) -> DragState {
        self.drag.state()
    }

    /// Router of `id`.
    pub fn router(&self, id: &RowId) -> Option<&InteractionRouter> {
        self.routers.iter().find(|router| router.id() == id)
    }

    /// Row owning the live pointer.
    pub fn active_row(&self) -> Option<&RowId> {
        self.active.as_ref()
    }

    /// Whether a row is running its exit transition.
    pub fn has_pending_exit(&self) -> bool {
        self.routers.iter().any(|router| router.exiting().is_some())
    }

    /// Autoscroll step for the current drag.
    pub fn autoscroll_step(&self, viewport: Viewport) -> f32 {
        self.drag.autoscroll_step(viewport)
    }

    /// Replace order and geometry with a fresh measurement.
    ///
    /// Routers of rows that are still listed keep their state; rows that
    /// disappeared are unmounted, which cancels their timers and any drag
    /// they own. A live drag re-targets against the new geometry.
    pub fn set_rows(&mut self, rows: Vec<RowSlot>) {
        let mut previous = std::mem::take(&mut self.routers);
        let mut routers = Vec::with_capacity(rows.len());
        for slot in &rows {
            let router = match previous.iter().position(|r| r.id() == &slot.id) {
                Some(index) => previous.swap_remove(index),
                None => InteractionRouter::new(slot.id.clone(), &self.config),
            };
            routers.push(router);
        }
        for mut gone in previous {
            debug!(row = %gone.id(), "row removed from list");
            gone.unmount(&mut self.drag);
            if self.active.as_ref() == Some(gone.id()) {
                self.active = None;
            }
        }
        self.routers = routers;
        self.slots = rows;
        self.drag.retarget(&SlotHost::new(&self.slots));
    }

    /// Advance the clock on every row.
    pub fn tick(&mut self, now: Duration) -> Vec<RowEffect> {
        let mut host = SlotHost::new(&self.slots);
        let mut effects = Vec::new();
        for router in &mut self.routers {
            effects.extend(router.tick(now, &mut self.drag, &mut host));
        }
        let requests = host.into_requests();
        self.apply_requests(requests, &mut effects);
        effects
    }

    /// Route one pointer event.
    ///
    /// Presses outside every measured row, and presses while another row
    /// owns the pointer, are ignored.
    pub fn handle(&mut self, event: PointerEvent) -> RouteOutcome {
        let target = match event.input {
            PointerInput::Down { position, .. } => {
                if self.active.is_some() {
                    debug!("press ignored: another row owns the pointer");
                    return RouteOutcome::default();
                }
                match self.hit_test(position) {
                    Some(hit) => hit,
                    None => return RouteOutcome::default(),
                }
            }
            _ => {
                let Some(active) = &self.active else {
                    return RouteOutcome::default();
                };
                match self.routers.iter().position(|r| r.id() == active) {
                    Some(index) => (index, Region::Body),
                    None => {
                        self.active = None;
                        return RouteOutcome::default();
                    }
                }
            }
        };

        let (index, region) = target;
        let mut host = SlotHost::new(&self.slots);
        let router = &mut self.routers[index];
        let mut outcome = router.handle(event, region, &mut self.drag, &mut host);
        self.active = router.session().map(|_| router.id().clone());

        let requests = host.into_requests();
        self.apply_requests(requests, &mut outcome.effects);
        outcome
    }

    /// Row index and region under `point`.
    fn hit_test(&self, point: Point) -> Option<(usize, Region)> {
        self.slots.iter().enumerate().find_map(|(index, slot)| {
            let rect = slot.rect?;
            if !rect.contains(point) {
                return None;
            }
            let region = match slot.handle {
                Some(handle) if handle.contains(point) => Region::Handle,
                _ => Region::Body,
            };
            Some((index, region))
        })
    }

    fn apply_requests(&mut self, requests: HostRequests, effects: &mut Vec<RowEffect>) {
        if requests.collapse {
            for router in &mut self.routers {
                router.collapse();
            }
            effects.push(RowEffect::CollapseOpen);
        }
        for pulse in requests.pulses {
            effects.push(RowEffect::Haptic {
                duration_ms: u64::try_from(pulse.as_millis()).unwrap_or(u64::MAX),
            });
        }
        if let Some((from, to)) = requests.reorder {
            self.restack(from, to);
        }
    }

    /// Move the row at `from` to `to` in the committed order. Geometry stays
    /// with the positions, so rows take over the rects of the slots they land
    /// in until the next measurement.
    fn restack(&mut self, from: usize, to: usize) {
        let len = self.slots.len();
        if from >= len || to >= len {
            warn!(from, to, len, "reorder outside the list ignored");
            return;
        }
        let geometry: Vec<_> = self.slots.iter().map(|s| (s.rect, s.handle)).collect();
        let slot = self.slots.remove(from);
        self.slots.insert(to, slot);
        let router = self.routers.remove(from);
        self.routers.insert(to, router);
        for (slot, (rect, handle)) in self.slots.iter_mut().zip(geometry) {
            slot.rect = rect;
            slot.handle = handle;
        }
    }
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
