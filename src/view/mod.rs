//! TUI rendering and terminal management (impure shell)
//!
//! The terminal stands in for a touch screen: mouse presses, drags and
//! releases are fed to a [`ListInteraction`] as pointer events, and the
//! effects it returns are applied to the [`ListStore`] through [`ListSync`].

pub mod layout;
pub mod rows;
pub mod styles;
pub mod tabs;

pub use layout::{calculate_areas, cell_to_point, row_slots, ScreenAreas};
pub use rows::{render_rows, truncate_to_width, RowView};
pub use styles::{ColorConfig, RowStyles, RowVisual};
pub use tabs::{cycle_tab, render_tab_bar};

use crate::gesture::{
    GestureConfig, ListInteraction, PointerButton, PointerEvent, PointerInput, PointerSource,
    RowEffect,
};
use crate::model::{Item, ItemId, RowId};
use crate::store::ListStore;
use crate::sync::{DemoData, InMemoryApi, ListSync, SyncError};
use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
        MouseEventKind,
    },
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Terminal,
};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Poll interval of the event loop; timers and autoscroll advance once per frame.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),

    /// Initial data could not be loaded.
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: Backend,
{
    terminal: Terminal<B>,
    store: ListStore,
    sync: ListSync<InMemoryApi>,
    list: ListInteraction,
    styles: RowStyles,
    areas: ScreenAreas,
    scroll: usize,
    scroll_carry: f32,
    notice: Option<String>,
}

impl<B: Backend> TuiApp<B> {
    /// Build the app on `terminal`, loading categories and items through `api`.
    pub fn with_terminal(
        terminal: Terminal<B>,
        gesture: GestureConfig,
        api: InMemoryApi,
        styles: RowStyles,
    ) -> Result<Self, TuiError> {
        let size = terminal.size()?;
        let mut app = Self {
            terminal,
            store: ListStore::new(),
            sync: ListSync::new(api),
            list: ListInteraction::new(gesture),
            styles,
            areas: calculate_areas(Rect::new(0, 0, size.width.max(1), size.height)),
            scroll: 0,
            scroll_carry: 0.0,
            notice: None,
        };
        let source = app.sync.load_categories(&mut app.store)?;
        app.sync.load_items(&mut app.store)?;
        info!(?source, categories = app.store.categories().len(), "lists loaded");
        app.refresh_rows();
        Ok(app)
    }

    /// The list store.
    pub fn store(&self) -> &ListStore {
        &self.store
    }

    /// The gesture state of the visible list.
    pub fn list(&self) -> &ListInteraction {
        &self.list
    }

    /// The sync client, for failure injection in tests.
    pub fn sync_mut(&mut self) -> &mut ListSync<InMemoryApi> {
        &mut self.sync
    }

    /// Rows hidden above the list area.
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// The backing terminal.
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Run the main event loop until the user quits (q or Ctrl+C).
    pub fn run(&mut self) -> Result<(), TuiError> {
        let started = Instant::now();
        self.draw()?;

        loop {
            if event::poll(FRAME_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(key) {
                            break;
                        }
                    }
                    Event::Mouse(mouse) => self.handle_mouse(mouse, started.elapsed()),
                    Event::FocusLost => self.handle_focus_lost(started.elapsed()),
                    _ => {}
                }
            }
            self.tick(started.elapsed());
            self.draw()?;
        }

        Ok(())
    }

    /// Handle a key press. Returns `true` when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Tab | KeyCode::Right => self.switch_tab(true),
            KeyCode::BackTab | KeyCode::Left => self.switch_tab(false),
            _ => {}
        }
        false
    }

    /// Feed a mouse event to the gesture core at time `now`.
    ///
    /// The wheel scrolls the list while no row owns the pointer.
    pub fn handle_mouse(&mut self, mouse: MouseEvent, now: Duration) {
        match mouse.kind {
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                if self.list.active_row().is_none() {
                    let down = mouse.kind == MouseEventKind::ScrollDown;
                    self.scroll_by(if down { 1 } else { -1 });
                }
            }
            _ => {
                if let Some(input) = pointer_input(mouse) {
                    let outcome = self.list.handle(PointerEvent::new(now, input));
                    self.apply_effects(outcome.effects);
                }
            }
        }
    }

    /// The terminal lost focus: the platform interrupted the press.
    pub fn handle_focus_lost(&mut self, now: Duration) {
        let outcome = self.list.handle(PointerEvent::new(now, PointerInput::Cancel));
        self.apply_effects(outcome.effects);
    }

    /// Advance timers to `now` and autoscroll an active drag.
    pub fn tick(&mut self, now: Duration) {
        let effects = self.list.tick(now);
        self.apply_effects(effects);

        if self.list.drag_state().dragging_id.is_none() {
            self.scroll_carry = 0.0;
            return;
        }
        self.scroll_carry += self.list.autoscroll_step(layout::list_viewport(self.areas.list));
        let row_px = f32::from(layout::ROW_HEIGHT) * layout::CELL_HEIGHT_PX;
        if self.scroll_carry >= row_px {
            self.scroll_carry -= row_px;
            self.scroll_by(1);
        } else if self.scroll_carry <= -row_px {
            self.scroll_carry += row_px;
            self.scroll_by(-1);
        }
    }

    fn scroll_by(&mut self, delta: isize) {
        let max = self
            .store
            .active_items()
            .len()
            .saturating_sub(layout::visible_rows(self.areas.list));
        let next = self.scroll.saturating_add_signed(delta).min(max);
        if next == self.scroll {
            self.scroll_carry = 0.0;
            return;
        }
        debug!(from = self.scroll, to = next, "list scrolled");
        self.scroll = next;
        self.refresh_rows();
    }

    fn switch_tab(&mut self, forward: bool) {
        let next = cycle_tab(self.store.categories(), self.store.active_tab(), forward);
        if next.as_ref() == self.store.active_tab() {
            return;
        }
        self.store.set_active_tab(next);
        self.store.set_error(None);
        if let Err(err) = self.sync.load_items(&mut self.store) {
            warn!(error = %err, "failed to load items");
            self.store.set_error(Some(err.to_string()));
        }
        self.scroll = 0;
        self.notice = None;
        self.refresh_rows();
    }

    /// Re-measure the rows of the selected category.
    fn refresh_rows(&mut self) {
        let ids: Vec<RowId> = self
            .store
            .active_items()
            .iter()
            .filter_map(|item| RowId::new(item.id.as_str()).ok())
            .collect();
        let max = ids.len().saturating_sub(layout::visible_rows(self.areas.list));
        self.scroll = self.scroll.min(max);
        self.list
            .set_rows(row_slots(&ids, self.areas.list, self.scroll));
    }

    fn item_for(&self, row: &RowId) -> Option<&Item> {
        self.store.items().iter().find(|i| i.id.as_str() == row.as_str())
    }

    /// Apply effects to the store, syncing each mutation.
    fn apply_effects(&mut self, effects: Vec<RowEffect>) {
        let mut changed = false;
        for effect in effects {
            let result = match &effect {
                RowEffect::Complete { row } => {
                    changed = true;
                    match item_id(row) {
                        Some(id) => self.sync.toggle_complete(&mut self.store, &id),
                        None => Ok(()),
                    }
                }
                RowEffect::Delete { row } => {
                    changed = true;
                    match item_id(row) {
                        Some(id) => self.sync.delete_item(&mut self.store, &id),
                        None => Ok(()),
                    }
                }
                RowEffect::Reorder { from, to, .. } => {
                    changed = true;
                    self.sync.reorder_items(&mut self.store, *from, *to)
                }
                RowEffect::Edit { row } => {
                    self.notice = self.item_for(row).map(|i| format!("Edit: {}", i.text));
                    Ok(())
                }
                RowEffect::DragStarted { row } => {
                    self.notice = self.item_for(row).map(|i| format!("Moving: {}", i.text));
                    Ok(())
                }
                RowEffect::ToggleExpanded { .. }
                | RowEffect::ExitStarted { .. }
                | RowEffect::CollapseOpen
                | RowEffect::Haptic { .. } => Ok(()),
            };
            debug!(?effect, "effect applied");
            if let Err(err) = result {
                warn!(?effect, error = %err, "effect failed to sync");
                self.store.set_error(Some(err.to_string()));
            }
        }
        if changed {
            self.notice = None;
            self.refresh_rows();
        }
    }

    /// Rows in display order, with the dragged row at its drop index.
    pub fn row_views(&self) -> Vec<RowView> {
        let dragging = self.list.drag_state().dragging_id;
        self.list
            .preview_order()
            .iter()
            .filter_map(|row| {
                let item = self.item_for(row)?;
                let router = self.list.router(row)?;
                let offset_px = router.swipe_offset();
                let visual = if dragging.as_ref() == Some(row) {
                    RowVisual::Dragging
                } else if router.exiting().is_some() {
                    RowVisual::Exiting
                } else if offset_px > 0.0 {
                    RowVisual::SwipingComplete
                } else if offset_px < 0.0 {
                    RowVisual::SwipingDelete
                } else {
                    RowVisual::Idle
                };
                Some(RowView {
                    text: item.text.clone(),
                    detail: router.is_expanded().then(|| item_detail(item)),
                    visual,
                    offset_px,
                    progress: router.swipe_progress(),
                })
            })
            .collect()
    }

    fn status_line(&self) -> Line<'static> {
        if let Some(error) = self.store.error() {
            return Line::from(Span::styled(format!("! {error}"), self.styles.error()));
        }
        if let Some(notice) = &self.notice {
            return Line::from(notice.clone());
        }
        let done = self.store.completed_items().len();
        Line::from(format!(
            "{} open, {done} done  swipe → complete  ← delete  hold ⋮⋮ to move  q quit",
            self.store.active_items().len()
        ))
    }

    /// Render the current frame
    pub fn draw(&mut self) -> Result<(), TuiError> {
        let size = self.terminal.size()?;
        let areas = calculate_areas(Rect::new(0, 0, size.width.max(1), size.height));
        if areas != self.areas {
            debug!(width = size.width, height = size.height, "relayout");
            self.areas = areas;
            self.refresh_rows();
        }

        let views = self.row_views();
        let status = self.status_line();
        let store = &self.store;
        let styles = &self.styles;
        let scroll = self.scroll;
        self.terminal.draw(|frame| {
            render_tab_bar(frame, areas.tabs, store.categories(), store.active_tab());
            render_rows(frame, areas.list, &views, scroll, styles);
            frame.render_widget(Paragraph::new(status), areas.status);
        })?;
        Ok(())
    }
}

/// Translate a terminal mouse event. Hover without a button is dropped.
pub fn pointer_input(mouse: MouseEvent) -> Option<PointerInput> {
    let position = cell_to_point(mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(button) => Some(PointerInput::Down {
            position,
            source: PointerSource::Mouse,
            button: match button {
                MouseButton::Left => PointerButton::Primary,
                MouseButton::Right => PointerButton::Secondary,
                MouseButton::Middle => PointerButton::Auxiliary,
            },
        }),
        MouseEventKind::Drag(_) => Some(PointerInput::Move { position }),
        MouseEventKind::Up(_) => Some(PointerInput::Up),
        _ => None,
    }
}

/// Rows are keyed by item id.
fn item_id(row: &RowId) -> Option<ItemId> {
    ItemId::new(row.as_str()).ok()
}

fn item_detail(item: &Item) -> String {
    let mut parts = Vec::new();
    if item.recurrence != "none" {
        parts.push(item.recurrence.clone());
    }
    if let Some(time) = &item.time {
        parts.push(time.clone());
    }
    if let Some(dose) = item.metadata.get("dose").and_then(|v| v.as_str()) {
        parts.push(dose.to_string());
    }
    if let Some(notes) = item.notes() {
        parts.push(notes.to_string());
    }
    if parts.is_empty() {
        "no details".to_string()
    } else {
        parts.join(" · ")
    }
}

/// Initialize and run the TUI with the bundled demo lists.
///
/// Logging must be initialized by the caller.
pub fn run(gesture: GestureConfig, colors: ColorConfig) -> Result<(), TuiError> {
    let demo = DemoData::load().map_err(SyncError::from)?;
    let terminal = setup_terminal()?;

    let result = TuiApp::with_terminal(
        terminal,
        gesture,
        InMemoryApi::seeded(demo),
        RowStyles::with_color_config(colors),
    )
    .and_then(|mut app| app.run());

    // Always restore terminal state
    restore_terminal()?;

    result
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableMouseCapture)?;
    stdout.execute(EnableFocusChange)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

/// Restore terminal to normal state
///
/// Disables raw mode, mouse capture, and leaves alternate screen
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(DisableFocusChange)?;
    io::stdout().execute(DisableMouseCapture)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
#[path = "view_tests.rs"]
mod tests;
