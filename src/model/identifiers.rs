//! Core identifier newtypes with smart constructors.
//!
//! All identifiers validate non-empty strings at construction time.
//! Raw constructors are never exported - use smart constructors only.
//! Serde goes through the same validation (`try_from = "String"`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a list category (e.g. "cat_01").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryId(String);

impl CategoryId {
    /// Smart constructor: validates non-empty category ID
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidCategoryId> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(InvalidCategoryId::Empty);
        }
        Ok(Self(raw))
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CategoryId {
    type Error = InvalidCategoryId;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<CategoryId> for String {
    fn from(id: CategoryId) -> Self {
        id.0
    }
}

/// Identifier of a list item (e.g. "item_01").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(String);

impl ItemId {
    /// Smart constructor: validates non-empty item ID
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidItemId> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(InvalidItemId::Empty);
        }
        Ok(Self(raw))
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ItemId {
    type Error = InvalidItemId;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

/// Identifier of an interactive row as seen by the gesture core.
///
/// Rows are opaque to the core: a row may render a category or an item.
/// Conversions from the domain identifiers are infallible because those are
/// already validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RowId(String);

impl RowId {
    /// Smart constructor: validates non-empty row ID
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidRowId> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(InvalidRowId::Empty);
        }
        Ok(Self(raw))
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RowId {
    type Error = InvalidRowId;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<RowId> for String {
    fn from(id: RowId) -> Self {
        id.0
    }
}

impl From<&ItemId> for RowId {
    fn from(id: &ItemId) -> Self {
        Self(id.0.clone())
    }
}

impl From<&CategoryId> for RowId {
    fn from(id: &CategoryId) -> Self {
        Self(id.0.clone())
    }
}

// ===== Error Types =====

/// Rejected category identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidCategoryId {
    /// The identifier was an empty string.
    #[error("Category ID cannot be empty")]
    Empty,
}

/// Rejected item identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidItemId {
    /// The identifier was an empty string.
    #[error("Item ID cannot be empty")]
    Empty,
}

/// Rejected row identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidRowId {
    /// The identifier was an empty string.
    #[error("Row ID cannot be empty")]
    Empty,
}

// ===== Tests =====
