//! Tracing subscriber setup.
//!
//! The TUI owns the terminal, so logs go to a file. Follow them with
//! `tail -f` from another terminal.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Error type for logging initialization failures.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Failed to create log directory
    #[error("Failed to create log directory at {path:?}: {source}")]
    DirectoryCreation {
        /// The directory path that failed to be created
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Log path has no usable file name.
    #[error("Invalid log file path: {0:?}")]
    InvalidPath(PathBuf),

    /// Tracing subscriber already initialized
    #[error("Tracing subscriber already initialized")]
    SubscriberAlreadySet,
}

/// Split `log_path` into the directory to create and the file name to append to.
///
/// A bare file name logs into the current directory.
pub fn split_log_path(log_path: &Path) -> Result<(&Path, &str), LoggingError> {
    let file_name = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| LoggingError::InvalidPath(log_path.to_path_buf()))?;
    let directory = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Ok((directory, file_name))
}

/// `RUST_LOG` if it parses, else [`DEFAULT_FILTER`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber writing plain-text events to `log_path`.
///
/// Creates the log directory if it doesn't exist.
///
/// # Errors
///
/// Fails if the directory cannot be created, the path has no file name, or a
/// subscriber is already installed.
pub fn init(log_path: &Path) -> Result<(), LoggingError> {
    let (directory, file_name) = split_log_path(log_path)?;

    std::fs::create_dir_all(directory).map_err(|source| LoggingError::DirectoryCreation {
        path: directory.to_path_buf(),
        source,
    })?;

    let file_appender = tracing_appender::rolling::never(directory, file_name);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|_| LoggingError::SubscriberAlreadySet)
}
