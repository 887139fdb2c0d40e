//! Configuration file loading with precedence handling.

use crate::gesture::{DragConfig, GestureConfig, LongPressConfig, SwipeConfig};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "LISTMIND_CONFIG";

/// Environment override for the swipe threshold (px).
pub const SWIPE_THRESHOLD_ENV: &str = "LISTMIND_SWIPE_THRESHOLD";

/// Environment override for the long-press delay (ms).
pub const LONG_PRESS_DELAY_ENV: &str = "LISTMIND_LONG_PRESS_DELAY_MS";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// An environment override is not a number.
    #[error("Invalid value for {var}: {value:?}")]
    InvalidEnvValue {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
    },

    /// A resolved value is out of range.
    #[error("Invalid {field}: {reason}")]
    InvalidValue {
        /// Field name as written in the config file.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/listmind/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Swipe commit distance in px.
    #[serde(default)]
    pub swipe_threshold: Option<f32>,

    /// Movement in px before the axis locks.
    #[serde(default)]
    pub axis_lock_slop: Option<f32>,

    /// Long-press hold time in ms.
    #[serde(default)]
    pub long_press_delay_ms: Option<u64>,

    /// Long-press jitter tolerance in px.
    #[serde(default)]
    pub long_press_jitter: Option<f32>,

    /// Handle hold time before a drag starts, in ms.
    #[serde(default)]
    pub drag_activation_delay_ms: Option<u64>,

    /// Vertical movement in px that abandons a pending drag.
    #[serde(default)]
    pub drag_cancel_slop: Option<f32>,

    /// Haptic pulse length in ms.
    #[serde(default)]
    pub haptic_pulse_ms: Option<u64>,

    /// Exit animation length after a committed swipe, in ms.
    #[serde(default)]
    pub exit_duration_ms: Option<u64>,

    /// Autoscroll band height in px.
    #[serde(default)]
    pub autoscroll_edge: Option<f32>,

    /// Largest autoscroll step in px.
    #[serde(default)]
    pub autoscroll_max_step: Option<f32>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Swipe commit distance in px.
    pub swipe_threshold: f32,
    /// Axis-lock slop in px.
    pub axis_lock_slop: f32,
    /// Long-press hold time in ms.
    pub long_press_delay_ms: u64,
    /// Long-press jitter tolerance in px.
    pub long_press_jitter: f32,
    /// Drag activation hold time in ms.
    pub drag_activation_delay_ms: u64,
    /// Pending-drag cancel slop in px.
    pub drag_cancel_slop: f32,
    /// Haptic pulse length in ms.
    pub haptic_pulse_ms: u64,
    /// Exit animation length in ms.
    pub exit_duration_ms: u64,
    /// Autoscroll band height in px.
    pub autoscroll_edge: f32,
    /// Largest autoscroll step in px.
    pub autoscroll_max_step: f32,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        let gesture = GestureConfig::default();
        Self {
            swipe_threshold: gesture.swipe.threshold,
            axis_lock_slop: gesture.swipe.axis_lock_slop,
            long_press_delay_ms: millis(gesture.long_press.delay),
            long_press_jitter: gesture.long_press.jitter_tolerance,
            drag_activation_delay_ms: millis(gesture.drag.activation_delay),
            drag_cancel_slop: gesture.drag.cancel_slop,
            haptic_pulse_ms: millis(gesture.drag.haptic_pulse),
            exit_duration_ms: millis(gesture.exit_duration),
            autoscroll_edge: gesture.drag.autoscroll_edge,
            autoscroll_max_step: gesture.drag.autoscroll_max_step,
            log_file_path: default_log_path(),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl ResolvedConfig {
    /// Build the gesture core configuration.
    pub fn gesture_config(&self) -> GestureConfig {
        GestureConfig {
            swipe: SwipeConfig {
                threshold: self.swipe_threshold,
                axis_lock_slop: self.axis_lock_slop,
            },
            long_press: LongPressConfig {
                delay: Duration::from_millis(self.long_press_delay_ms),
                jitter_tolerance: self.long_press_jitter,
            },
            drag: DragConfig {
                activation_delay: Duration::from_millis(self.drag_activation_delay_ms),
                cancel_slop: self.drag_cancel_slop,
                haptic_pulse: Duration::from_millis(self.haptic_pulse_ms),
                autoscroll_edge: self.autoscroll_edge,
                autoscroll_max_step: self.autoscroll_max_step,
            },
            exit_duration: Duration::from_millis(self.exit_duration_ms),
        }
    }

    /// Reject distances that are negative or not finite.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let distances = [
            ("swipe_threshold", self.swipe_threshold),
            ("axis_lock_slop", self.axis_lock_slop),
            ("long_press_jitter", self.long_press_jitter),
            ("drag_cancel_slop", self.drag_cancel_slop),
            ("autoscroll_edge", self.autoscroll_edge),
            ("autoscroll_max_step", self.autoscroll_max_step),
        ];
        for (field, value) in distances {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("expected a non-negative distance, got {value}"),
                });
            }
        }
        Ok(())
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/listmind/listmind.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("listmind").join("listmind.log")
    } else {
        PathBuf::from("listmind.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/listmind/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("listmind").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `LISTMIND_CONFIG` environment variable
/// 3. Default path `~/.config/listmind/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

fn parse_env<T: std::str::FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnvValue { var, value }),
        Err(_) => Ok(None),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `LISTMIND_SWIPE_THRESHOLD`: swipe threshold in px
/// - `LISTMIND_LONG_PRESS_DELAY_MS`: long-press delay in ms
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvValue` if a set variable is not a number.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
    if let Some(threshold) = parse_env(SWIPE_THRESHOLD_ENV)? {
        config.swipe_threshold = threshold;
    }
    if let Some(delay) = parse_env(LONG_PRESS_DELAY_ENV)? {
        config.long_press_delay_ms = delay;
    }
    Ok(config)
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        swipe_threshold: config.swipe_threshold.unwrap_or(defaults.swipe_threshold),
        axis_lock_slop: config.axis_lock_slop.unwrap_or(defaults.axis_lock_slop),
        long_press_delay_ms: config
            .long_press_delay_ms
            .unwrap_or(defaults.long_press_delay_ms),
        long_press_jitter: config
            .long_press_jitter
            .unwrap_or(defaults.long_press_jitter),
        drag_activation_delay_ms: config
            .drag_activation_delay_ms
            .unwrap_or(defaults.drag_activation_delay_ms),
        drag_cancel_slop: config.drag_cancel_slop.unwrap_or(defaults.drag_cancel_slop),
        haptic_pulse_ms: config.haptic_pulse_ms.unwrap_or(defaults.haptic_pulse_ms),
        exit_duration_ms: config.exit_duration_ms.unwrap_or(defaults.exit_duration_ms),
        autoscroll_edge: config.autoscroll_edge.unwrap_or(defaults.autoscroll_edge),
        autoscroll_max_step: config
            .autoscroll_max_step
            .unwrap_or(defaults.autoscroll_max_step),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    swipe_threshold: Option<f32>,
    long_press_ms: Option<u64>,
) -> ResolvedConfig {
    if let Some(threshold) = swipe_threshold {
        config.swipe_threshold = threshold;
    }
    if let Some(delay) = long_press_ms {
        config.long_press_delay_ms = delay;
    }
    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
