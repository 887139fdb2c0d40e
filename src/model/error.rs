//! Error types for the listmind application.
//!
//! Errors use `thiserror` and compose via `?` and `From` conversions.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error returned from the binary's entry points
//!   - [`crate::config::ConfigError`] - config file could not be read or parsed
//!   - [`crate::logging::LoggingError`] - tracing subscriber setup failed
//!   - [`TraceError`] - a pointer trace could not be read or parsed
//!   - [`crate::sync::SyncError`] - a remote call failed and could not be reconciled
//!   - [`crate::view::TuiError`] - the terminal UI failed
//!   - `std::io::Error` - output stream failures
//!
//! The gesture core itself has no error paths: every pointer event is
//! well-formed and stray events are no-ops.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error encompassing all failure modes.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Logging could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// A pointer trace could not be replayed.
    #[error("Trace error: {0}")]
    Trace(#[from] TraceError),

    /// Remote synchronisation failed.
    #[error("Sync error: {0}")]
    Sync(#[from] crate::sync::SyncError),

    /// The terminal UI failed.
    #[error("TUI error: {0}")]
    Tui(#[from] crate::view::TuiError),

    /// Output stream failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors encountered while reading a JSONL pointer trace.
///
/// Line numbers are 1-based so they match what an editor shows.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The trace file does not exist.
    #[error("Trace file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
    },

    /// The trace could not be read.
    #[error("Failed to read trace: {0}")]
    Io(#[from] std::io::Error),

    /// A line is not a valid trace record.
    #[error("Invalid trace record at line {line}: {message}")]
    InvalidRecord {
        /// 1-based line number.
        line: usize,
        /// Parser message.
        message: String,
    },

    /// Pointer records appeared before any layout record.
    #[error("Pointer event at line {line} precedes the first layout record")]
    MissingLayout {
        /// 1-based line number of the offending record.
        line: usize,
    },

    /// Timestamps must never go backwards.
    #[error("Timestamp at line {line} goes backwards ({at_ms}ms < {previous_ms}ms)")]
    NonMonotonicTime {
        /// 1-based line number.
        line: usize,
        /// Timestamp of the offending record.
        at_ms: u64,
        /// Latest timestamp seen before it.
        previous_ms: u64,
    },
}

/// Error reported by the remote list API.
///
/// Mirrors the server's error body: an HTTP status plus a message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("API request failed ({status}): {message}")]
pub struct ApiError {
    /// HTTP status code. `0` when the server was unreachable.
    pub status: u16,
    /// Server-provided message, or "Request failed".
    pub message: String,
}

impl ApiError {
    /// Create an API error.
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// The server could not be reached at all.
    pub fn unreachable() -> Self {
        Self::new(0, "API unreachable")
    }

    /// Whether the error means the server was never reached.
    pub fn is_unreachable(&self) -> bool {
        self.status == 0
    }
}
