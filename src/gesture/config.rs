//! Aggregate configuration for the gesture core.

use super::drag::DragConfig;
use super::long_press::LongPressConfig;
use super::swipe::SwipeConfig;
use std::time::Duration;

/// Delay between a committed swipe and the complete/delete effect, so the
/// row's exit animation can run first.
pub const DEFAULT_EXIT_DURATION: Duration = Duration::from_millis(300);

/// Every tunable of the gesture core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    /// Swipe recognizer settings.
    pub swipe: SwipeConfig,
    /// Long-press recognizer settings.
    pub long_press: LongPressConfig,
    /// Drag-reorder settings.
    pub drag: DragConfig,
    /// Exit transition length.
    pub exit_duration: Duration,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            swipe: SwipeConfig::default(),
            long_press: LongPressConfig::default(),
            drag: DragConfig::default(),
            exit_duration: DEFAULT_EXIT_DURATION,
        }
    }
}
