//! Remote API boundary and optimistic synchronisation.

pub mod api;
pub mod client;
pub mod demo;
pub mod memory;

pub use api::{ChatExchange, RemoteApi};
pub use client::{DataSource, ListSync};
pub use demo::DemoData;
pub use memory::{ApiCall, InMemoryApi};

use crate::model::{ApiError, ItemId};
use thiserror::Error;

/// Errors from a sync operation.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The API rejected the request. The store has already been repaired.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The bundled demo data could not be parsed.
    #[error("Failed to load demo data: {0}")]
    DemoData(#[from] serde_json::Error),

    /// The item is not loaded in the store.
    #[error("Unknown item: {0}")]
    UnknownItem(ItemId),

    /// A reorder index is outside the list.
    #[error("Reorder {from} -> {to} outside a list of {len}")]
    OutOfRange {
        /// Source index.
        from: usize,
        /// Target index.
        to: usize,
        /// List length.
        len: usize,
    },
}
