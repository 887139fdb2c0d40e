//! Screen layout and cell-to-pixel geometry.
//!
//! The gesture core works in pixels. A terminal cell is mapped to a fixed
//! `CELL_WIDTH_PX` x `CELL_HEIGHT_PX` box so thresholds keep their meaning:
//! the default 80px swipe threshold is ten columns.

use crate::gesture::RowSlot;
use crate::model::{Point, RowId, RowRect, Viewport};
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Pixel width of one terminal column.
pub const CELL_WIDTH_PX: f32 = 8.0;

/// Pixel height of one terminal line.
pub const CELL_HEIGHT_PX: f32 = 16.0;

/// Lines per list row.
pub const ROW_HEIGHT: u16 = 3;

/// Columns at the right end of a row that act as the drag handle.
pub const HANDLE_WIDTH: u16 = 4;

/// Height of the category tab bar, borders included.
pub const TAB_BAR_HEIGHT: u16 = 3;

/// Areas of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenAreas {
    /// Category tab bar.
    pub tabs: Rect,
    /// Item rows.
    pub list: Rect,
    /// One-line status bar.
    pub status: Rect,
}

/// Split the frame into tab bar, list and status line.
pub fn calculate_areas(frame: Rect) -> ScreenAreas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(TAB_BAR_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame);
    ScreenAreas {
        tabs: chunks[0],
        list: chunks[1],
        status: chunks[2],
    }
}

/// Centre of the cell at (`column`, `row`) in pixels.
pub fn cell_to_point(column: u16, row: u16) -> Point {
    Point::new(
        f32::from(column) * CELL_WIDTH_PX + CELL_WIDTH_PX / 2.0,
        f32::from(row) * CELL_HEIGHT_PX + CELL_HEIGHT_PX / 2.0,
    )
}

/// Pixel rectangle covering `area`.
pub fn rect_to_px(area: Rect) -> RowRect {
    RowRect::new(
        f32::from(area.y) * CELL_HEIGHT_PX,
        f32::from(area.x) * CELL_WIDTH_PX,
        f32::from(area.width) * CELL_WIDTH_PX,
        f32::from(area.height) * CELL_HEIGHT_PX,
    )
}

/// Pixel viewport of the list area, for autoscroll.
pub fn list_viewport(list: Rect) -> Viewport {
    let px = rect_to_px(list);
    Viewport::new(px.top, px.height)
}

/// Number of rows that fit in `list` at once.
pub fn visible_rows(list: Rect) -> usize {
    usize::from(list.height / ROW_HEIGHT)
}

/// Cell area of the row at `index`, if it is on screen with `scroll` rows
/// hidden above.
pub fn row_area(list: Rect, index: usize, scroll: usize) -> Option<Rect> {
    let visible = index.checked_sub(scroll)?;
    if visible >= visible_rows(list) {
        return None;
    }
    let offset = u16::try_from(visible).ok()? * ROW_HEIGHT;
    Some(Rect::new(list.x, list.y + offset, list.width, ROW_HEIGHT))
}

/// Handle cells of a row area.
pub fn handle_area(row: Rect) -> Rect {
    let width = HANDLE_WIDTH.min(row.width);
    Rect::new(row.x + row.width - width, row.y, width, row.height)
}

/// Measure `ids` laid out in `list`. Rows scrolled away or below the
/// bottom edge are left unmeasured.
pub fn row_slots(ids: &[RowId], list: Rect, scroll: usize) -> Vec<RowSlot> {
    ids.iter()
        .enumerate()
        .map(|(index, id)| match row_area(list, index, scroll) {
            Some(area) => {
                RowSlot::new(id.clone(), rect_to_px(area)).with_handle(rect_to_px(handle_area(area)))
            }
            None => RowSlot {
                id: id.clone(),
                rect: None,
                handle: None,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<RowId> {
        names
            .iter()
            .map(|n| RowId::new(*n).expect("valid row id"))
            .collect()
    }

    #[test]
    fn areas_stack_tabs_list_status() {
        let areas = calculate_areas(Rect::new(0, 0, 40, 20));
        assert_eq!(areas.tabs, Rect::new(0, 0, 40, 3));
        assert_eq!(areas.list, Rect::new(0, 3, 40, 16));
        assert_eq!(areas.status, Rect::new(0, 19, 40, 1));
    }

    #[test]
    fn cell_centre_in_pixels() {
        assert_eq!(cell_to_point(0, 0), Point::new(4.0, 8.0));
        assert_eq!(cell_to_point(10, 3), Point::new(84.0, 56.0));
    }

    #[test]
    fn rows_below_the_fold_are_unmeasured() {
        let list = Rect::new(0, 3, 40, 7);
        let slots = row_slots(&ids(&["a", "b", "c"]), list, 0);

        assert_eq!(slots[0].rect, Some(RowRect::new(48.0, 0.0, 320.0, 48.0)));
        assert_eq!(slots[0].handle, Some(RowRect::new(48.0, 288.0, 32.0, 48.0)));
        assert_eq!(slots[1].rect, Some(RowRect::new(96.0, 0.0, 320.0, 48.0)));
        assert_eq!(slots[2].rect, None);
        assert_eq!(slots[2].handle, None);
    }

    #[test]
    fn scrolled_rows_shift_up() {
        let list = Rect::new(0, 3, 40, 9);
        let slots = row_slots(&ids(&["a", "b", "c", "d"]), list, 2);

        assert!(slots[0].rect.is_none());
        assert!(slots[1].rect.is_none());
        assert_eq!(slots[2].rect.map(|r| r.top), Some(48.0));
        assert_eq!(slots[3].rect.map(|r| r.top), Some(96.0));
    }

    #[test]
    fn handle_is_clamped_to_narrow_rows() {
        let row = Rect::new(0, 0, 3, ROW_HEIGHT);
        assert_eq!(handle_area(row), Rect::new(0, 0, 3, ROW_HEIGHT));
    }
}
