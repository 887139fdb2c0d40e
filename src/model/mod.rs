//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod entities;
pub mod error;
pub mod geometry;
pub mod identifiers;

// Re-export for convenience
pub use entities::{
    ActionKind, AuthSession, Category, ChatAction, ChatMessage, ChatRole, Item, ItemPatch,
    NewItem, UploadedFile, User,
};
pub use error::{ApiError, AppError, TraceError};
pub use geometry::{Point, RowRect, Viewport};
pub use identifiers::{
    CategoryId, InvalidCategoryId, InvalidItemId, InvalidRowId, ItemId, RowId,
};
