//! Client-side list state with change notification.
//!
//! `ListStore` is the single source of truth for what the front end shows.
//! Mutations are explicit methods; each one notifies subscribers with the
//! slice of state that changed so views only re-read what they need.

use crate::model::{Category, CategoryId, ChatMessage, Item, ItemId, ItemPatch};
use chrono::{DateTime, Utc};
use std::fmt;
use tracing::{debug, trace};

// ===== Change notification =====

/// Slice of the store touched by a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreChange {
    /// Active categories.
    Categories,
    /// Archived categories.
    ArchivedCategories,
    /// Items of the loaded category.
    Items,
    /// Selected category.
    ActiveTab,
    /// Chat history.
    Messages,
    /// Loading flag or error banner.
    Status,
    /// Signed in or out.
    Auth,
}

/// Handle returned by [`ListStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(StoreChange, &ListStore)>;

// ===== ListStore =====

/// Categories, items, chat messages and UI status of one client.
#[derive(Default)]
pub struct ListStore {
    categories: Vec<Category>,
    archived_categories: Vec<Category>,
    items: Vec<Item>,
    active_tab: Option<CategoryId>,
    messages: Vec<ChatMessage>,
    loading: bool,
    error: Option<String>,
    authenticated: bool,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl fmt::Debug for ListStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListStore")
            .field("categories", &self.categories.len())
            .field("archived_categories", &self.archived_categories.len())
            .field("items", &self.items.len())
            .field("active_tab", &self.active_tab)
            .field("messages", &self.messages.len())
            .field("loading", &self.loading)
            .field("error", &self.error)
            .field("authenticated", &self.authenticated)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ListStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener called after every mutation.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(StoreChange, &ListStore) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, change: StoreChange) {
        trace!(?change, listeners = self.listeners.len(), "store changed");
        let mut listeners = std::mem::take(&mut self.listeners);
        for (_, listener) in &mut listeners {
            listener(change, self);
        }
        self.listeners = listeners;
    }

    // ===== Categories =====

    /// Active categories in display order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Category by id.
    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| &c.id == id)
    }

    /// Replace the active categories.
    pub fn set_categories(&mut self, categories: Vec<Category>) {
        self.categories = categories;
        self.notify(StoreChange::Categories);
    }

    /// Append a category.
    pub fn add_category(&mut self, category: Category) {
        self.categories.push(category);
        self.notify(StoreChange::Categories);
    }

    /// Remove a category. If it was the selected tab, the first remaining
    /// category is selected and the loaded items are dropped.
    pub fn remove_category(&mut self, id: &CategoryId) {
        self.categories.retain(|c| &c.id != id);
        self.notify(StoreChange::Categories);

        if self.active_tab.as_ref() == Some(id) {
            self.active_tab = self.categories.first().map(|c| c.id.clone());
            self.items.clear();
            self.notify(StoreChange::ActiveTab);
            self.notify(StoreChange::Items);
        }
    }

    /// Adjust a category's open-item count, never going below zero.
    pub fn update_category_item_count(&mut self, id: &CategoryId, delta: i64) {
        let Some(category) = self.categories.iter_mut().find(|c| &c.id == id) else {
            return;
        };
        let count = (i64::from(category.item_count) + delta).max(0);
        category.item_count = u32::try_from(count).unwrap_or(u32::MAX);
        self.notify(StoreChange::Categories);
    }

    /// Move the category at `from` to `to` and renumber every `position`
    /// to its index. Returns `false` when either index is out of range.
    pub fn reorder_categories(&mut self, from: usize, to: usize) -> bool {
        let len = self.categories.len();
        if from >= len || to >= len {
            debug!(from, to, len, "category reorder out of range");
            return false;
        }
        let moved = self.categories.remove(from);
        self.categories.insert(to, moved);
        reindex(self.categories.iter_mut().map(|c| &mut c.position));
        self.notify(StoreChange::Categories);
        true
    }

    /// Archived categories.
    pub fn archived_categories(&self) -> &[Category] {
        &self.archived_categories
    }

    /// Replace the archived categories.
    pub fn set_archived_categories(&mut self, categories: Vec<Category>) {
        self.archived_categories = categories;
        self.notify(StoreChange::ArchivedCategories);
    }

    /// Move a category from the archive to the end of the active list.
    pub fn restore_category(&mut self, restored: Category) {
        self.archived_categories.retain(|c| c.id != restored.id);
        self.notify(StoreChange::ArchivedCategories);
        self.categories.push(restored);
        self.notify(StoreChange::Categories);
    }

    // ===== Active tab =====

    /// Selected category.
    pub fn active_tab(&self) -> Option<&CategoryId> {
        self.active_tab.as_ref()
    }

    /// Select a category.
    pub fn set_active_tab(&mut self, id: Option<CategoryId>) {
        self.active_tab = id;
        self.notify(StoreChange::ActiveTab);
    }

    // ===== Items =====

    /// Loaded items, unsorted.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Item by id.
    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|i| &i.id == id)
    }

    /// Open items of the selected category, by `position`.
    pub fn active_items(&self) -> Vec<&Item> {
        let mut open: Vec<&Item> = self
            .tab_items()
            .filter(|item| !item.is_completed)
            .collect();
        open.sort_by_key(|item| item.position);
        open
    }

    /// Completed items of the selected category, most recently updated
    /// first.
    pub fn completed_items(&self) -> Vec<&Item> {
        let mut done: Vec<&Item> = self.tab_items().filter(|item| item.is_completed).collect();
        done.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        done
    }

    fn tab_items(&self) -> impl Iterator<Item = &Item> {
        let tab = self.active_tab.as_ref();
        self.items
            .iter()
            .filter(move |item| Some(&item.category_id) == tab)
    }

    /// Replace the loaded items.
    pub fn set_items(&mut self, items: Vec<Item>) {
        self.items = items;
        self.notify(StoreChange::Items);
    }

    /// Append an item.
    pub fn add_item(&mut self, item: Item) {
        self.items.push(item);
        self.notify(StoreChange::Items);
    }

    /// Apply a patch to the local copy of an item.
    pub fn update_item(&mut self, id: &ItemId, patch: &ItemPatch, now: DateTime<Utc>) {
        let Some(item) = self.items.iter_mut().find(|i| &i.id == id) else {
            return;
        };
        patch.apply_to(item, now);
        self.notify(StoreChange::Items);
    }

    /// Remove an item.
    pub fn remove_item(&mut self, id: &ItemId) {
        self.items.retain(|i| &i.id != id);
        self.notify(StoreChange::Items);
    }

    /// Flip an item's completion flag.
    pub fn complete_item(&mut self, id: &ItemId, now: DateTime<Utc>) {
        let Some(item) = self.items.iter_mut().find(|i| &i.id == id) else {
            return;
        };
        item.is_completed = !item.is_completed;
        item.updated_at = now;
        self.notify(StoreChange::Items);
    }

    /// Move the open item at `from` to `to` (indices into
    /// [`active_items`](Self::active_items)) and renumber the open items'
    /// positions. Returns the ids in their new order, or `None` when an
    /// index is out of range.
    pub fn reorder_items(&mut self, from: usize, to: usize) -> Option<Vec<ItemId>> {
        let mut order: Vec<ItemId> = self.active_items().iter().map(|i| i.id.clone()).collect();
        if from >= order.len() || to >= order.len() {
            debug!(from, to, len = order.len(), "item reorder out of range");
            return None;
        }
        let moved = order.remove(from);
        order.insert(to, moved);

        for (position, id) in order.iter().enumerate() {
            if let Some(item) = self.items.iter_mut().find(|i| &i.id == id) {
                item.position = u32::try_from(position).unwrap_or(u32::MAX);
            }
        }
        self.notify(StoreChange::Items);
        Some(order)
    }

    // ===== Chat =====

    /// Chat history, oldest first.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Replace the chat history.
    pub fn set_messages(&mut self, messages: Vec<ChatMessage>) {
        self.messages = messages;
        self.notify(StoreChange::Messages);
    }

    /// Append a message.
    pub fn add_message(&mut self, message: ChatMessage) {
        self.messages.push(message);
        self.notify(StoreChange::Messages);
    }

    // ===== Auth =====

    /// Whether a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Record the sign-in state.
    pub fn set_authenticated(&mut self, authenticated: bool) {
        self.authenticated = authenticated;
        self.notify(StoreChange::Auth);
    }

    /// Sign out and drop every list, item and message of the old account.
    pub fn sign_out(&mut self) {
        debug!("signed out, clearing lists");
        self.authenticated = false;
        self.categories.clear();
        self.archived_categories.clear();
        self.items.clear();
        self.messages.clear();
        self.active_tab = None;
        self.notify(StoreChange::Auth);
    }

    // ===== Status =====

    /// Whether a load is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Set the loading flag.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        self.notify(StoreChange::Status);
    }

    /// Error banner text.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Set or clear the error banner.
    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
        self.notify(StoreChange::Status);
    }
}

/// Renumber positions to `0..n` in iteration order.
fn reindex<'a>(positions: impl Iterator<Item = &'a mut u32>) {
    for (index, position) in positions.enumerate() {
        *position = u32::try_from(index).unwrap_or(u32::MAX);
    }
}

#[cfg(test)]
#[path = "list_store_tests.rs"]
mod tests;
