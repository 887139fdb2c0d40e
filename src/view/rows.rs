//! Item row rendering.

use super::layout::{handle_area, row_area, CELL_WIDTH_PX, HANDLE_WIDTH};
use super::styles::{RowStyles, RowVisual};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthChar;

/// Cells of the swipe progress bar.
const PROGRESS_CELLS: usize = 10;

/// Everything needed to draw one row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    /// Item text.
    pub text: String,
    /// Second line shown while expanded.
    pub detail: Option<String>,
    /// Current look.
    pub visual: RowVisual,
    /// Signed swipe translation in px.
    pub offset_px: f32,
    /// Swipe progress in `0.0..=1.0`.
    pub progress: f32,
}

/// Cut `text` to at most `max` display columns, ending with `…` when cut.
pub fn truncate_to_width(text: &str, max: usize) -> String {
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Drop the first `columns` display columns of `text`.
fn skip_columns(text: &str, columns: usize) -> &str {
    let mut used = 0;
    for (index, c) in text.char_indices() {
        if used >= columns {
            return &text[index..];
        }
        used += c.width().unwrap_or(0);
    }
    ""
}

fn progress_bar(progress: f32) -> String {
    let filled = (progress.clamp(0.0, 1.0) * PROGRESS_CELLS as f32).round() as usize;
    format!(
        "{}{}",
        "▰".repeat(filled),
        "▱".repeat(PROGRESS_CELLS - filled)
    )
}

/// The two text lines of a row, fitted to `width` columns (handle excluded).
pub fn row_lines(view: &RowView, width: usize) -> (String, String) {
    let shift = (view.offset_px.abs() / CELL_WIDTH_PX).round() as usize;
    let first = if view.offset_px > 0.0 {
        let lead = shift.min(width);
        let marker = if lead > 0 { "✓" } else { "" };
        let pad = " ".repeat(lead.saturating_sub(marker.chars().count()));
        format!(
            "{marker}{pad}{}",
            truncate_to_width(&view.text, width - lead)
        )
    } else if view.offset_px < 0.0 {
        let body = truncate_to_width(skip_columns(&view.text, shift), width.saturating_sub(1));
        let used: usize = body.chars().map(|c| c.width().unwrap_or(0)).sum();
        let pad = " ".repeat(width.saturating_sub(used + 1));
        format!("{body}{pad}✗")
    } else {
        truncate_to_width(&view.text, width)
    };

    let second = match (&view.detail, view.visual) {
        (_, RowVisual::SwipingComplete | RowVisual::SwipingDelete) => {
            truncate_to_width(&progress_bar(view.progress), width)
        }
        (Some(detail), _) => truncate_to_width(&format!("  {detail}"), width),
        (None, _) => String::new(),
    };
    (first, second)
}

/// Render `rows` in display order into `list`, `scroll` rows hidden above.
pub fn render_rows(
    frame: &mut Frame,
    list: Rect,
    rows: &[RowView],
    scroll: usize,
    styles: &RowStyles,
) {
    for (index, view) in rows.iter().enumerate() {
        let Some(area) = row_area(list, index, scroll) else {
            continue;
        };
        let handle = handle_area(area);
        let body = Rect::new(area.x, area.y, area.width - handle.width, area.height);
        let style = styles.style_for(view.visual);
        let (first, second) = row_lines(view, usize::from(body.width));

        let separator = "─".repeat(usize::from(area.width));
        let lines = vec![
            Line::from(Span::styled(first, style)),
            Line::from(Span::styled(second, style)),
            Line::from(Span::styled(separator, Style::default())),
        ];
        frame.render_widget(Paragraph::new(lines), body);

        let grip = " ⋮⋮".chars().take(usize::from(HANDLE_WIDTH)).collect::<String>();
        let handle_lines = vec![Line::from(grip.clone()), Line::from(grip)];
        frame.render_widget(
            Paragraph::new(handle_lines).style(style),
            Rect::new(handle.x, handle.y, handle.width, 2.min(handle.height)),
        );
    }
}
