//! listmind
//!
//! Gesture-driven interaction core for list apps: swipe to complete or
//! delete, long-press to edit, hold a handle and drag to reorder. The core
//! is pure and clock-injected; the store, sync client, trace replayer and
//! terminal UI are the shell around it.

pub mod config;
pub mod gesture;
pub mod logging;
pub mod model;
pub mod store;
pub mod sync;
pub mod trace;
pub mod view;
