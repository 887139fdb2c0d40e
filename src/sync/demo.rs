//! Bundled demo data, used when the remote API cannot be reached.

use crate::model::{Category, CategoryId, ChatMessage, Item};
use serde::Deserialize;

const DEMO_JSON: &str = include_str!("demo.json");

/// Demo categories, items and chat history.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DemoData {
    /// Active categories.
    pub categories: Vec<Category>,
    /// Items across all categories.
    pub items: Vec<Item>,
    /// Chat history.
    pub messages: Vec<ChatMessage>,
}

impl DemoData {
    /// Parse the bundled data set.
    pub fn load() -> Result<Self, serde_json::Error> {
        serde_json::from_str(DEMO_JSON)
    }

    /// Items of one category.
    pub fn items_in(&self, category: &CategoryId) -> Vec<Item> {
        self.items
            .iter()
            .filter(|item| &item.category_id == category)
            .cloned()
            .collect()
    }
}
