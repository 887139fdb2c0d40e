//! Tests for the TUI shell, driven through ratatui's TestBackend.

use super::*;
use crate::model::{ApiError, CategoryId, NewItem};
use crate::sync::ApiCall;
use ratatui::backend::TestBackend;

fn app(width: u16, height: u16) -> TuiApp<TestBackend> {
    let terminal = Terminal::new(TestBackend::new(width, height)).expect("terminal");
    let api = InMemoryApi::seeded(DemoData::load().expect("demo data"));
    TuiApp::with_terminal(
        terminal,
        GestureConfig::default(),
        api,
        RowStyles::with_color_config(ColorConfig::fixed(false)),
    )
    .expect("app")
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn line(app: &TuiApp<TestBackend>, y: u16) -> String {
    let buffer = app.terminal().backend().buffer();
    (0..buffer.area.width)
        .map(|x| buffer[(x, y)].symbol().to_string())
        .collect()
}

fn open_texts(app: &TuiApp<TestBackend>) -> Vec<String> {
    app.store()
        .active_items()
        .iter()
        .map(|i| i.text.clone())
        .collect()
}

/// Swipe the first row ten columns to the right and release.
fn swipe_first_row_right(app: &mut TuiApp<TestBackend>) {
    let left = MouseButton::Left;
    app.handle_mouse(mouse(MouseEventKind::Down(left), 2, 4), ms(0));
    app.handle_mouse(mouse(MouseEventKind::Drag(left), 8, 4), ms(40));
    app.handle_mouse(mouse(MouseEventKind::Drag(left), 14, 4), ms(80));
    app.handle_mouse(mouse(MouseEventKind::Up(left), 14, 4), ms(100));
}

#[test]
fn tui_error_from_io_error() {
    let io_err = io::Error::other("test error");
    let tui_err: TuiError = io_err.into();
    assert!(matches!(tui_err, TuiError::Io(_)));
}

#[test]
fn starts_on_first_category_with_its_open_items() {
    let mut app = app(40, 20);
    app.draw().expect("draw");

    assert_eq!(
        app.store().active_tab(),
        Some(&CategoryId::new("cat_01").expect("id"))
    );
    assert_eq!(open_texts(&app), vec!["Adderall XR", "Atorvastatin"]);
    assert!(line(&app, 3).starts_with("Adderall XR"), "{:?}", line(&app, 3));
    assert!(line(&app, 6).starts_with("Atorvastatin"), "{:?}", line(&app, 6));
    assert!(line(&app, 19).starts_with("2 open, 1 done"), "{:?}", line(&app, 19));
}

#[test]
fn handle_key_q_and_ctrl_c_quit() {
    let mut app = app(40, 20);
    assert!(app.handle_key(key(KeyCode::Char('q'))));
    assert!(app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    assert!(!app.handle_key(key(KeyCode::Char('x'))));
}

#[test]
fn tab_keys_cycle_categories() {
    let mut app = app(40, 20);

    app.handle_key(key(KeyCode::Tab));
    assert_eq!(app.store().active_tab().map(|c| c.as_str()), Some("cat_02"));
    assert!(app.list().rows().is_empty());

    app.handle_key(key(KeyCode::Left));
    app.handle_key(key(KeyCode::Left));
    assert_eq!(app.store().active_tab().map(|c| c.as_str()), Some("cat_08"));
}

#[test]
fn swipe_right_completes_after_exit_animation() {
    let mut app = app(40, 20);
    swipe_first_row_right(&mut app);

    let views = app.row_views();
    assert_eq!(views[0].visual, RowVisual::Exiting);

    app.tick(ms(399));
    assert_eq!(open_texts(&app), vec!["Adderall XR", "Atorvastatin"]);

    app.tick(ms(400));
    assert_eq!(open_texts(&app), vec!["Atorvastatin"]);
    assert_eq!(app.list().order().len(), 1);
    let medications = app
        .store()
        .category(&CategoryId::new("cat_01").expect("id"))
        .expect("category");
    assert_eq!(medications.item_count, 2);
}

#[test]
fn mid_swipe_row_is_translated() {
    let mut app = app(40, 20);
    let left = MouseButton::Left;
    app.handle_mouse(mouse(MouseEventKind::Down(left), 2, 4), ms(0));
    app.handle_mouse(mouse(MouseEventKind::Drag(left), 7, 4), ms(40));

    let views = app.row_views();
    assert_eq!(views[0].visual, RowVisual::SwipingComplete);
    assert_eq!(views[0].offset_px, 40.0);
    assert_eq!(views[0].progress, 0.5);

    app.draw().expect("draw");
    assert!(line(&app, 3).starts_with("✓    Adderall XR"), "{:?}", line(&app, 3));
}

#[test]
fn rejected_completion_rolls_back_and_reports() {
    let mut app = app(40, 20);
    app.sync_mut()
        .api_mut()
        .fail_next(ApiCall::UpdateItem, ApiError::new(500, "boom"));

    swipe_first_row_right(&mut app);
    app.tick(ms(400));

    assert_eq!(open_texts(&app), vec!["Adderall XR", "Atorvastatin"]);
    assert!(app.store().error().is_some_and(|e| e.contains("boom")));

    app.draw().expect("draw");
    assert!(line(&app, 19).starts_with("! "), "{:?}", line(&app, 19));
}

#[test]
fn handle_drag_reorders_items() {
    let mut app = app(40, 20);
    let left = MouseButton::Left;
    app.handle_mouse(mouse(MouseEventKind::Down(left), 38, 4), ms(0));
    app.tick(ms(500));

    assert_eq!(
        app.list().drag_state().dragging_id.map(|id| id.to_string()),
        Some("item_01".to_string())
    );
    assert_eq!(app.row_views()[0].visual, RowVisual::Dragging);

    app.handle_mouse(mouse(MouseEventKind::Drag(left), 38, 7), ms(550));
    app.handle_mouse(mouse(MouseEventKind::Up(left), 38, 7), ms(600));

    assert_eq!(open_texts(&app), vec!["Atorvastatin", "Adderall XR"]);
    assert!(app.list().drag_state().dragging_id.is_none());
    let order: Vec<String> = app.list().order().iter().map(|id| id.to_string()).collect();
    assert_eq!(order, vec!["item_02", "item_01"]);
}

/// Add open items to the selected category and re-measure the rows.
fn add_open_items(app: &mut TuiApp<TestBackend>, count: usize) {
    let category = app.store.active_tab().cloned().expect("selected tab");
    for i in 0..count {
        let new = NewItem {
            category_id: category.clone(),
            text: format!("Extra {i}"),
            recurrence: None,
            time: None,
            due_at: None,
            metadata: None,
        };
        app.sync.add_item(&mut app.store, &new).expect("item created");
    }
    app.refresh_rows();
}

#[test]
fn held_drag_at_bottom_edge_autoscrolls_and_drops_under_pointer() {
    // Nine list lines: three rows visible, five rows in total.
    let mut app = app(40, 13);
    add_open_items(&mut app, 3);
    assert_eq!(open_texts(&app).len(), 5);

    let left = MouseButton::Left;
    app.handle_mouse(mouse(MouseEventKind::Down(left), 38, 4), ms(0));
    app.tick(ms(500));
    app.handle_mouse(mouse(MouseEventKind::Drag(left), 38, 11), ms(550));
    assert_eq!(app.list().drag_state().drag_over_index, Some(2));

    let mut now = 550;
    while app.scroll() < 2 && now < 2_000 {
        now += 16;
        app.tick(ms(now));
    }
    assert_eq!(app.scroll(), 2, "pointer in the lower band scrolls down");
    assert_eq!(
        app.list().drag_state().drag_over_index,
        Some(4),
        "drop target follows the rows that scrolled under the pointer"
    );

    app.handle_mouse(mouse(MouseEventKind::Up(left), 38, 11), ms(now + 10));
    assert_eq!(
        open_texts(&app),
        vec!["Atorvastatin", "Extra 0", "Extra 1", "Extra 2", "Adderall XR"]
    );
}

#[test]
fn short_list_area_still_scrolls_down_from_the_bottom_line() {
    // Three list lines: one row visible, bands split at its middle.
    let mut app = app(40, 7);
    add_open_items(&mut app, 1);

    let left = MouseButton::Left;
    app.handle_mouse(mouse(MouseEventKind::Down(left), 38, 3), ms(0));
    app.tick(ms(500));
    app.handle_mouse(mouse(MouseEventKind::Drag(left), 38, 5), ms(510));

    let mut now = 510;
    while app.scroll() == 0 && now < 2_000 {
        now += 16;
        app.tick(ms(now));
    }
    assert_eq!(app.scroll(), 1);
    assert!(app.list().drag_state().dragging_id.is_some());
}

#[test]
fn tap_expands_row_details() {
    let mut app = app(40, 20);
    let left = MouseButton::Left;
    app.handle_mouse(mouse(MouseEventKind::Down(left), 2, 4), ms(0));
    app.handle_mouse(mouse(MouseEventKind::Up(left), 2, 4), ms(50));

    assert_eq!(
        app.row_views()[0].detail.as_deref(),
        Some("daily · 10:00 · 20mg")
    );
    assert_eq!(app.row_views()[1].detail, None);
}

#[test]
fn right_click_is_ignored() {
    let mut app = app(40, 20);
    app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Right), 2, 4), ms(0));
    app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Right), 2, 4), ms(50));
    assert!(app.row_views().iter().all(|v| v.detail.is_none()));
}

#[test]
fn wheel_scrolls_within_bounds() {
    // One row fits between the tab bar and the status line.
    let mut app = app(40, 8);
    assert_eq!(app.list().rows()[1].rect, None);

    app.handle_mouse(mouse(MouseEventKind::ScrollDown, 2, 4), ms(0));
    assert_eq!(app.scroll(), 1);
    assert_eq!(app.list().rows()[0].rect, None);
    assert!(app.list().rows()[1].rect.is_some());

    app.handle_mouse(mouse(MouseEventKind::ScrollDown, 2, 4), ms(0));
    assert_eq!(app.scroll(), 1);

    app.handle_mouse(mouse(MouseEventKind::ScrollUp, 2, 4), ms(0));
    assert_eq!(app.scroll(), 0);
}

#[test]
fn pointer_input_maps_buttons_and_hover() {
    assert_eq!(
        pointer_input(mouse(MouseEventKind::Down(MouseButton::Middle), 1, 1)),
        Some(PointerInput::Down {
            position: cell_to_point(1, 1),
            source: PointerSource::Mouse,
            button: PointerButton::Auxiliary,
        })
    );
    assert_eq!(pointer_input(mouse(MouseEventKind::Moved, 1, 1)), None);
    assert_eq!(
        pointer_input(mouse(MouseEventKind::Up(MouseButton::Left), 1, 1)),
        Some(PointerInput::Up)
    );
}

#[test]
fn focus_loss_cancels_a_pending_press() {
    let mut app = app(40, 20);
    app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 38, 4), ms(0));
    app.handle_focus_lost(ms(100));
    app.tick(ms(600));
    assert!(app.list().drag_state().dragging_id.is_none());
    assert!(app.list().active_row().is_none());
}
