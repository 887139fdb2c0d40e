//! Client-side list state.

mod list_store;

pub use list_store::{ListStore, StoreChange, SubscriptionId};
