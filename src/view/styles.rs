//! Row styling.
//!
//! Rows are coloured by what the pointer is doing to them: green while a
//! swipe heads for completion, red while it heads for deletion, yellow while
//! dragged.

use ratatui::style::{Color, Modifier, Style};

// ===== ColorConfig =====

/// Configuration for color output.
///
/// Determines whether colors should be enabled or disabled based on:
/// - `--no-color` CLI flag
/// - `NO_COLOR` environment variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Create a ColorConfig from CLI args and environment.
    ///
    /// Priority (first match wins):
    /// 1. `--no-color` flag (disables colors)
    /// 2. `NO_COLOR` env var (any value disables colors)
    /// 3. Default: colors enabled
    pub fn from_env_and_args(no_color_flag: bool) -> Self {
        let enabled = !no_color_flag && std::env::var("NO_COLOR").is_err();
        Self { enabled }
    }

    /// Colors on or off regardless of the environment.
    pub fn fixed(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== RowVisual =====

/// What a row looks like right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowVisual {
    /// At rest.
    Idle,
    /// Swiping right, towards completion.
    SwipingComplete,
    /// Swiping left, towards deletion.
    SwipingDelete,
    /// Exit animation running.
    Exiting,
    /// Lifted by a drag.
    Dragging,
}

/// Styles for every [`RowVisual`].
#[derive(Debug, Clone, Copy)]
pub struct RowStyles {
    colors: bool,
}

impl RowStyles {
    /// Styles honouring `config`.
    pub fn with_color_config(config: ColorConfig) -> Self {
        Self {
            colors: config.colors_enabled(),
        }
    }

    /// Style for a row in `visual` state.
    ///
    /// Without colors, states are told apart by modifiers alone.
    pub fn style_for(&self, visual: RowVisual) -> Style {
        let base = Style::default();
        match (visual, self.colors) {
            (RowVisual::Idle, _) => base,
            (RowVisual::SwipingComplete, true) => base.fg(Color::Green),
            (RowVisual::SwipingDelete, true) => base.fg(Color::Red),
            (RowVisual::SwipingComplete | RowVisual::SwipingDelete, false) => {
                base.add_modifier(Modifier::BOLD)
            }
            (RowVisual::Exiting, _) => base.add_modifier(Modifier::DIM | Modifier::CROSSED_OUT),
            (RowVisual::Dragging, true) => base.fg(Color::Yellow).add_modifier(Modifier::BOLD),
            (RowVisual::Dragging, false) => base.add_modifier(Modifier::REVERSED),
        }
    }

    /// Style of the status line when it reports an error.
    pub fn error(&self) -> Style {
        if self.colors {
            Style::default().fg(Color::Red)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        }
    }
}

impl Default for RowStyles {
    fn default() -> Self {
        Self::with_color_config(ColorConfig::from_env_and_args(false))
    }
}
