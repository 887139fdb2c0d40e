//! Tests for drag reordering.

use super::*;

const ROW_HEIGHT: f32 = 56.0;

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn row(id: &str) -> RowId {
    RowId::new(id).expect("valid row id")
}

/// Host with stacked rows that records every collaborator call.
#[derive(Debug, Default)]
struct RecordingHost {
    rows: Vec<RowSlot>,
    reorders: Vec<(usize, usize)>,
    collapses: usize,
    pulses: Vec<Duration>,
}

impl RecordingHost {
    fn stacked(ids: &[&str]) -> Self {
        let rows = ids
            .iter()
            .enumerate()
            .map(|(i, id)| RowSlot::new(row(id), RowRect::new(i as f32 * ROW_HEIGHT, 0.0, 320.0, ROW_HEIGHT)))
            .collect();
        Self {
            rows,
            ..Self::default()
        }
    }

    fn center_of(&self, index: usize) -> f32 {
        self.rows[index].rect.map(|r| r.center_y()).unwrap_or_default()
    }
}

impl ReorderHost for RecordingHost {
    fn rows(&self) -> &[RowSlot] {
        &self.rows
    }

    fn reorder(&mut self, from: usize, to: usize) {
        self.reorders.push((from, to));
    }

    fn collapse_open(&mut self) {
        self.collapses += 1;
    }

    fn vibrate(&mut self, duration: Duration) {
        self.pulses.push(duration);
    }
}

fn ids(names: &[&str]) -> Vec<RowId> {
    names.iter().map(|n| row(n)).collect()
}

/// Press the handle of row `b` (index 1) 10px below its top and hold it.
fn dragging_b(host: &mut RecordingHost) -> DragReorderController {
    let mut drag = DragReorderController::default();
    let press_y = ROW_HEIGHT + 10.0;
    assert!(drag.press_handle(&row("b"), press_y, ms(0), host));
    assert_eq!(drag.tick(ms(500), host), Some(row("b")));
    drag
}

// ===== Activation =====

#[test]
fn hold_activates_drag_on_source_index() {
    let mut host = RecordingHost::stacked(&["a", "b", "c", "d", "e"]);
    let drag = dragging_b(&mut host);

    let state = drag.state();
    assert_eq!(state.dragging_id, Some(row("b")));
    assert_eq!(state.drag_over_index, Some(1));
    assert_eq!(
        state.floating,
        Some(RowRect::new(ROW_HEIGHT, 0.0, 320.0, ROW_HEIGHT)),
        "proxy covers the original row rect"
    );
    assert_eq!(host.collapses, 1, "open rows collapse before dragging");
    assert_eq!(host.pulses, vec![DEFAULT_HAPTIC_PULSE]);
}

#[test]
fn armed_state_is_not_observable_as_drag() {
    let mut host = RecordingHost::stacked(&["a", "b"]);
    let mut drag = DragReorderController::default();
    drag.press_handle(&row("a"), 10.0, ms(0), &host);

    assert_eq!(drag.phase(), DragPhase::Armed);
    assert!(drag.state().is_empty());
    assert_eq!(drag.tick(ms(499), &mut host), None);
    assert_eq!(host.collapses, 0);
}

#[test]
fn vertical_move_before_activation_disarms() {
    let mut host = RecordingHost::stacked(&["a", "b", "c"]);
    let mut drag = DragReorderController::default();
    drag.press_handle(&row("a"), 20.0, ms(0), &host);

    // 15px at 300ms, before the 500ms activation
    let suppress = drag.on_move(35.0, &host);
    assert!(!suppress);
    assert_eq!(drag.phase(), DragPhase::Idle);

    assert_eq!(drag.tick(ms(500), &mut host), None);
    assert!(drag.state().is_empty());
    assert_eq!(drag.release(&mut host), None);
    assert!(host.reorders.is_empty());
}

#[test]
fn small_move_before_activation_keeps_armed() {
    let mut host = RecordingHost::stacked(&["a", "b"]);
    let mut drag = DragReorderController::default();
    drag.press_handle(&row("a"), 20.0, ms(0), &host);

    drag.on_move(29.0, &host);
    assert_eq!(drag.phase(), DragPhase::Armed);
    assert!(drag.tick(ms(500), &mut host).is_some());
}

#[test]
fn second_press_is_rejected_while_active() {
    let mut host = RecordingHost::stacked(&["a", "b", "c"]);
    let mut drag = dragging_b(&mut host);

    assert!(!drag.press_handle(&row("c"), 130.0, ms(600), &host));
    assert_eq!(drag.owner(), Some(&row("b")));
}

#[test]
fn press_on_unmeasured_row_is_ignored() {
    let mut host = RecordingHost::stacked(&["a", "b"]);
    host.rows[1].rect = None;
    let mut drag = DragReorderController::default();

    assert!(!drag.press_handle(&row("b"), 60.0, ms(0), &host));
    assert!(drag.is_idle());
}

#[test]
fn row_removed_before_activation_aborts() {
    let mut host = RecordingHost::stacked(&["a", "b"]);
    let mut drag = DragReorderController::default();
    drag.press_handle(&row("b"), 60.0, ms(0), &host);

    host.rows.remove(1);
    assert_eq!(drag.tick(ms(500), &mut host), None);
    assert!(drag.is_idle());
    assert_eq!(host.collapses, 0);
}

// ===== Dragging =====

#[test]
fn moving_to_row_three_targets_index_three_and_commits_once() {
    let mut host = RecordingHost::stacked(&["a", "b", "c", "d", "e"]);
    let mut drag = dragging_b(&mut host);

    let target_y = host.center_of(3);
    assert!(drag.on_move(target_y, &host), "scrolling is suppressed while dragging");
    assert_eq!(drag.state().drag_over_index, Some(3));

    let commit = drag.release(&mut host);
    assert_eq!(
        commit,
        Some(ReorderCommit {
            row: row("b"),
            from: 1,
            to: 3
        })
    );
    assert_eq!(host.reorders, vec![(1, 3)]);
    assert!(drag.state().is_empty());
    assert_eq!(drag.phase(), DragPhase::Idle);
}

#[test]
fn floating_proxy_tracks_pointer_with_press_offset() {
    let mut host = RecordingHost::stacked(&["a", "b", "c"]);
    let mut drag = dragging_b(&mut host);

    drag.on_move(150.0, &host);
    let floating = drag.state().floating.expect("floating proxy");
    assert_eq!(floating.top, 140.0, "pointer stays 10px below the proxy top");
    assert_eq!(floating.height, ROW_HEIGHT);
}

#[test]
fn drop_in_place_commits_nothing() {
    let mut host = RecordingHost::stacked(&["a", "b", "c"]);
    let mut drag = dragging_b(&mut host);

    drag.on_move(host.center_of(2), &host);
    drag.on_move(host.center_of(1), &host);
    assert_eq!(drag.release(&mut host), None);
    assert!(host.reorders.is_empty());
}

#[test]
fn pointer_beyond_list_ends_targets_first_and_last_rows() {
    let mut host = RecordingHost::stacked(&["a", "b", "c"]);
    let mut drag = dragging_b(&mut host);

    drag.on_move(-500.0, &host);
    assert_eq!(drag.state().drag_over_index, Some(0));

    drag.on_move(5_000.0, &host);
    assert_eq!(drag.state().drag_over_index, Some(2));
}

#[test]
fn cancel_discards_without_commit_and_is_idempotent() {
    let mut host = RecordingHost::stacked(&["a", "b", "c", "d"]);
    let mut drag = dragging_b(&mut host);
    drag.on_move(host.center_of(3), &host);

    assert!(drag.cancel());
    assert!(!drag.cancel(), "second cancel finds nothing to discard");
    assert_eq!(drag.release(&mut host), None, "stray end after cancel");
    assert!(host.reorders.is_empty());
    assert!(drag.state().is_empty());
}

#[test]
fn stray_move_while_idle_is_noop() {
    let host = RecordingHost::stacked(&["a"]);
    let mut drag = DragReorderController::default();
    assert!(!drag.on_move(100.0, &host));
    assert!(drag.is_idle());
}

// ===== Preview order =====

#[test]
fn preview_matches_committed_order() {
    let mut host = RecordingHost::stacked(&["a", "b", "c", "d", "e"]);
    let mut drag = dragging_b(&mut host);
    drag.on_move(host.center_of(3), &host);

    let base = ids(&["a", "b", "c", "d", "e"]);
    let preview = drag.preview_order(&base);
    assert_eq!(preview, ids(&["a", "c", "d", "b", "e"]));

    let mut committed = base.clone();
    let moved = committed.remove(1);
    committed.insert(3, moved);
    assert_eq!(preview, committed);
}

#[test]
fn preview_is_base_when_idle() {
    let drag = DragReorderController::default();
    let base = ids(&["a", "b"]);
    assert_eq!(drag.preview_order(&base), base);
}

// ===== Nearest center =====

#[test]
fn nearest_center_breaks_ties_by_list_order() {
    let rows = vec![
        RowSlot::new(row("a"), RowRect::new(0.0, 0.0, 10.0, 20.0)),
        RowSlot::new(row("b"), RowRect::new(20.0, 0.0, 10.0, 20.0)),
    ];
    // Centers at 10 and 30; 20 is equidistant.
    assert_eq!(nearest_center_index(&rows, 20.0, 1), 0);
}

#[test]
fn nearest_center_skips_unmeasured_rows() {
    let mut rows = vec![
        RowSlot::new(row("a"), RowRect::new(0.0, 0.0, 10.0, 20.0)),
        RowSlot::new(row("b"), RowRect::new(20.0, 0.0, 10.0, 20.0)),
    ];
    rows[1].rect = None;
    assert_eq!(nearest_center_index(&rows, 35.0, 1), 0);
    assert_eq!(nearest_center_index(&[], 35.0, 4), 4);
}

// ===== Autoscroll =====

#[test]
fn autoscroll_is_zero_unless_dragging() {
    let drag = DragReorderController::default();
    assert_eq!(drag.autoscroll_step(Viewport::new(0.0, 400.0)), 0.0);
}

#[test]
fn autoscroll_scales_with_edge_penetration() {
    let mut host = RecordingHost::stacked(&["a", "b", "c"]);
    let mut drag = dragging_b(&mut host);
    let viewport = Viewport::new(0.0, 400.0);

    drag.on_move(200.0, &host);
    assert_eq!(drag.autoscroll_step(viewport), 0.0);

    drag.on_move(24.0, &host);
    assert_eq!(drag.autoscroll_step(viewport), -6.0);

    drag.on_move(-100.0, &host);
    assert_eq!(drag.autoscroll_step(viewport), -DEFAULT_AUTOSCROLL_MAX_STEP);

    drag.on_move(400.0, &host);
    assert_eq!(drag.autoscroll_step(viewport), DEFAULT_AUTOSCROLL_MAX_STEP);
}

#[test]
fn short_viewport_splits_bands_at_the_middle() {
    let mut host = RecordingHost::stacked(&["a", "b", "c"]);
    let mut drag = dragging_b(&mut host);
    // Shorter than two default bands: each band is half the height.
    let viewport = Viewport::new(48.0, 48.0);

    drag.on_move(84.0, &host);
    assert_eq!(drag.autoscroll_step(viewport), 6.0);

    drag.on_move(60.0, &host);
    assert_eq!(drag.autoscroll_step(viewport), -6.0);

    drag.on_move(72.0, &host);
    assert_eq!(drag.autoscroll_step(viewport), 0.0);
}

// ===== Retargeting =====

#[test]
fn retarget_follows_rows_moving_under_a_still_pointer() {
    let mut host = RecordingHost::stacked(&["a", "b", "c", "d"]);
    let mut drag = dragging_b(&mut host);
    drag.on_move(host.center_of(2), &host);
    assert_eq!(drag.state().drag_over_index, Some(2));

    // Scroll the list up by one row; the pointer has not moved.
    for slot in &mut host.rows {
        if let Some(rect) = slot.rect.as_mut() {
            rect.top -= ROW_HEIGHT;
        }
    }
    assert!(drag.retarget(&host));
    assert_eq!(drag.state().drag_over_index, Some(3));
    assert!(!drag.retarget(&host));

    let commit = drag.release(&mut host).expect("reorder committed");
    assert_eq!((commit.from, commit.to), (1, 3));
}

#[test]
fn retarget_is_a_no_op_unless_dragging() {
    let host = RecordingHost::stacked(&["a", "b"]);
    let mut drag = DragReorderController::default();
    assert!(!drag.retarget(&host));
    assert!(drag.press_handle(&row("a"), 28.0, ms(0), &host));
    assert!(!drag.retarget(&host));
    assert_eq!(drag.phase(), DragPhase::Armed);
}
