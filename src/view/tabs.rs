//! Category tab bar widget.
//!
//! Displays one tab per category using ratatui's Tabs widget.

use crate::model::{Category, CategoryId};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Tabs},
    Frame,
};

/// Tab label: icon, name and open item count.
pub fn tab_title(category: &Category) -> String {
    match &category.icon {
        Some(icon) => format!("{icon} {} ({})", category.name, category.item_count),
        None => format!("{} ({})", category.name, category.item_count),
    }
}

/// Render the category tab bar, highlighting `selected` when it is listed.
pub fn render_tab_bar(
    frame: &mut Frame,
    area: Rect,
    categories: &[Category],
    selected: Option<&CategoryId>,
) {
    let titles: Vec<Line> = categories
        .iter()
        .map(|c| Line::from(tab_title(c)))
        .collect();

    let mut tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title("Lists"))
        .style(Style::default().fg(Color::White));

    // Tabs always highlights something once selected; skip select() for none.
    if let Some(index) = selected.and_then(|id| categories.iter().position(|c| &c.id == id)) {
        tabs = tabs
            .highlight_style(Style::default().fg(Color::Yellow))
            .select(index);
    }

    frame.render_widget(tabs, area);
}

/// Id of the category after (or before, when `forward` is false) `current`,
/// wrapping around. Falls back to the first category.
pub fn cycle_tab(
    categories: &[Category],
    current: Option<&CategoryId>,
    forward: bool,
) -> Option<CategoryId> {
    let len = categories.len();
    if len == 0 {
        return None;
    }
    let index = current
        .and_then(|id| categories.iter().position(|c| &c.id == id))
        .map(|i| if forward { (i + 1) % len } else { (i + len - 1) % len })
        .unwrap_or(0);
    Some(categories[index].id.clone())
}
