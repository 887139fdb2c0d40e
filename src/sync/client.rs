//! Optimistic synchronisation between the [`ListStore`] and a [`RemoteApi`].
//!
//! Every mutation is applied to the store first so the UI reacts at once,
//! then sent to the API. When the API rejects it the store is repaired:
//! completion toggles are rolled back locally, everything else is reloaded
//! from the server.

use super::api::RemoteApi;
use super::demo::DemoData;
use super::SyncError;
use crate::model::{ApiError, AuthSession, CategoryId, ItemId, ItemPatch, NewItem, User};
use crate::store::ListStore;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

/// Where loaded data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// The remote API answered.
    Remote,
    /// The API was unreachable; bundled demo data was loaded instead.
    Demo,
}

/// Drives a [`RemoteApi`] on behalf of a [`ListStore`].
#[derive(Debug)]
pub struct ListSync<A> {
    api: A,
    clock: fn() -> DateTime<Utc>,
}

impl<A: RemoteApi> ListSync<A> {
    /// Sync through `api`, stamping local edits with the system clock.
    pub fn new(api: A) -> Self {
        Self {
            api,
            clock: Utc::now,
        }
    }

    /// Use `clock` for local timestamps.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// The underlying API.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Mutable access to the underlying API.
    pub fn api_mut(&mut self) -> &mut A {
        &mut self.api
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    // ===== Auth =====

    /// Sign in and keep the returned bearer token for later calls.
    pub fn login(
        &mut self,
        store: &mut ListStore,
        email: &str,
        password: &str,
    ) -> Result<User, SyncError> {
        let session = self.api.login(email, password)?;
        Ok(self.start_session(store, session))
    }

    /// Create an account and sign in with it.
    pub fn signup(
        &mut self,
        store: &mut ListStore,
        email: &str,
        password: &str,
    ) -> Result<User, SyncError> {
        let session = self.api.signup(email, password)?;
        Ok(self.start_session(store, session))
    }

    fn start_session(&mut self, store: &mut ListStore, session: AuthSession) -> User {
        info!(user = %session.user.id, "signed in");
        self.api.set_token(Some(session.token));
        store.set_authenticated(true);
        session.user
    }

    /// Drop the token and the signed-in user's data.
    pub fn logout(&mut self, store: &mut ListStore) {
        self.api.set_token(None);
        store.sign_out();
    }

    /// Align the store's sign-in flag with the held token.
    pub fn check_auth(&self, store: &mut ListStore) {
        store.set_authenticated(self.api.has_token());
    }

    // ===== Loading =====

    /// Load active and archived categories and select the first category
    /// if none is selected.
    ///
    /// When the API is unreachable the demo categories are used instead.
    pub fn load_categories(&mut self, store: &mut ListStore) -> Result<DataSource, SyncError> {
        store.set_loading(true);
        let fetched = self
            .api
            .fetch_categories()
            .and_then(|active| Ok((active, self.api.fetch_archived_categories()?)));
        let result = match fetched {
            Ok((active, archived)) => {
                store.set_categories(active);
                store.set_archived_categories(archived);
                Ok(DataSource::Remote)
            }
            Err(err) if err.is_unreachable() => {
                warn!(error = %err, "API unreachable, using demo categories");
                DemoData::load().map_err(SyncError::from).map(|demo| {
                    store.set_categories(demo.categories);
                    store.set_archived_categories(Vec::new());
                    DataSource::Demo
                })
            }
            Err(err) => {
                store.set_error(Some(err.to_string()));
                Err(err.into())
            }
        };
        if result.is_ok() && store.active_tab().is_none() {
            let first = store.categories().first().map(|c| c.id.clone());
            store.set_active_tab(first);
        }
        store.set_loading(false);
        result
    }

    /// Load the items of the selected category. No-op without a selection.
    pub fn load_items(&mut self, store: &mut ListStore) -> Result<DataSource, SyncError> {
        let Some(tab) = store.active_tab().cloned() else {
            return Ok(DataSource::Remote);
        };
        match self.api.fetch_items(&tab) {
            Ok(items) => {
                store.set_items(items);
                Ok(DataSource::Remote)
            }
            Err(err) if err.is_unreachable() => {
                warn!(error = %err, category = %tab, "API unreachable, using demo items");
                let demo = DemoData::load()?;
                store.set_items(demo.items_in(&tab));
                Ok(DataSource::Demo)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Load the chat history, falling back to the demo conversation.
    pub fn load_chat(&mut self, store: &mut ListStore) -> Result<DataSource, SyncError> {
        match self.api.fetch_chat_history() {
            Ok(messages) => {
                store.set_messages(messages);
                Ok(DataSource::Remote)
            }
            Err(err) if err.is_unreachable() => {
                warn!(error = %err, "API unreachable, using demo chat");
                store.set_messages(DemoData::load()?.messages);
                Ok(DataSource::Demo)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Reload items after a failed mutation. A failing reload is only
    /// logged; the original error is what the caller sees.
    fn resync_items(&mut self, store: &mut ListStore) {
        let Some(tab) = store.active_tab().cloned() else {
            return;
        };
        match self.api.fetch_items(&tab) {
            Ok(items) => store.set_items(items),
            Err(err) => warn!(error = %err, category = %tab, "item resync failed"),
        }
    }

    fn resync_categories(&mut self, store: &mut ListStore) {
        match self.api.fetch_categories() {
            Ok(categories) => store.set_categories(categories),
            Err(err) => warn!(error = %err, "category resync failed"),
        }
    }

    // ===== Item mutations =====

    /// Flip an item's completion flag and its category's open count.
    /// Both are rolled back if the API rejects the change.
    pub fn toggle_complete(&mut self, store: &mut ListStore, id: &ItemId) -> Result<(), SyncError> {
        let Some(item) = store.item(id) else {
            return Err(SyncError::UnknownItem(id.clone()));
        };
        let category = item.category_id.clone();
        let completed = !item.is_completed;
        let delta = if completed { -1 } else { 1 };

        store.complete_item(id, self.now());
        store.update_category_item_count(&category, delta);

        let patch = ItemPatch {
            is_completed: Some(completed),
            ..ItemPatch::default()
        };
        if let Err(err) = self.api.update_item(id, &patch) {
            warn!(item = %id, error = %err, "completion rejected, rolling back");
            store.complete_item(id, self.now());
            store.update_category_item_count(&category, -delta);
            return Err(err.into());
        }
        info!(item = %id, completed, "completion synced");
        Ok(())
    }

    /// Remove an item. Reloads the list if the API rejects the delete.
    pub fn delete_item(&mut self, store: &mut ListStore, id: &ItemId) -> Result<(), SyncError> {
        let Some(item) = store.item(id) else {
            return Err(SyncError::UnknownItem(id.clone()));
        };
        let category = item.category_id.clone();
        let was_open = !item.is_completed;

        store.remove_item(id);
        if was_open {
            store.update_category_item_count(&category, -1);
        }

        if let Err(err) = self.api.delete_item(id) {
            warn!(item = %id, error = %err, "delete rejected, reloading items");
            self.resync_items(store);
            return Err(err.into());
        }
        info!(item = %id, "item deleted");
        Ok(())
    }

    /// Apply an edit. Reloads the list if the API rejects it.
    pub fn save_item(
        &mut self,
        store: &mut ListStore,
        id: &ItemId,
        patch: &ItemPatch,
    ) -> Result<(), SyncError> {
        if store.item(id).is_none() {
            return Err(SyncError::UnknownItem(id.clone()));
        }
        store.update_item(id, patch, self.now());
        if let Err(err) = self.api.update_item(id, patch) {
            warn!(item = %id, error = %err, "edit rejected, reloading items");
            self.resync_items(store);
            return Err(err.into());
        }
        debug!(item = %id, "edit synced");
        Ok(())
    }

    /// Create an item on the server and append it locally.
    pub fn add_item(&mut self, store: &mut ListStore, new: &NewItem) -> Result<(), SyncError> {
        let item = self.api.create_item(new)?;
        store.update_category_item_count(&item.category_id, 1);
        store.add_item(item);
        Ok(())
    }

    // ===== Reordering =====

    /// Move a category and persist every position that changed. Resyncs the
    /// categories from the API if any update fails.
    pub fn reorder_categories(
        &mut self,
        store: &mut ListStore,
        from: usize,
        to: usize,
    ) -> Result<(), SyncError> {
        let before: Vec<(CategoryId, u32)> = store
            .categories()
            .iter()
            .map(|c| (c.id.clone(), c.position))
            .collect();
        if !store.reorder_categories(from, to) {
            return Err(SyncError::OutOfRange {
                from,
                to,
                len: before.len(),
            });
        }

        let moved: Vec<(CategoryId, u32)> = store
            .categories()
            .iter()
            .filter(|c| !before.contains(&(c.id.clone(), c.position)))
            .map(|c| (c.id.clone(), c.position))
            .collect();
        let result = moved
            .iter()
            .try_for_each(|(id, position)| {
                self.api.update_category_position(id, *position).map(|_| ())
            });
        if let Err(err) = result {
            warn!(from, to, error = %err, "category reorder rejected, resyncing");
            self.resync_categories(store);
            return Err(err.into());
        }
        info!(from, to, updated = moved.len(), "category order synced");
        Ok(())
    }

    /// Move an open item of the selected category and persist the new
    /// positions. Reloads the items if any update fails.
    pub fn reorder_items(
        &mut self,
        store: &mut ListStore,
        from: usize,
        to: usize,
    ) -> Result<(), SyncError> {
        let len = store.active_items().len();
        let Some(order) = store.reorder_items(from, to) else {
            return Err(SyncError::OutOfRange { from, to, len });
        };

        let (low, high) = (from.min(to), from.max(to));
        let result: Result<(), ApiError> = order
            .iter()
            .enumerate()
            .take(high + 1)
            .skip(low)
            .try_for_each(|(position, id)| {
                let patch = ItemPatch {
                    position: Some(u32::try_from(position).unwrap_or(u32::MAX)),
                    ..ItemPatch::default()
                };
                self.api.update_item(id, &patch).map(|_| ())
            });
        if let Err(err) = result {
            warn!(from, to, error = %err, "item reorder rejected, reloading items");
            self.resync_items(store);
            return Err(err.into());
        }
        info!(from, to, "item order synced");
        Ok(())
    }

    // ===== Archive and chat =====

    /// Restore an archived category.
    pub fn restore_category(
        &mut self,
        store: &mut ListStore,
        id: &CategoryId,
    ) -> Result<(), SyncError> {
        let restored = self.api.restore_category(id)?;
        info!(category = %id, "category restored");
        store.restore_category(restored);
        Ok(())
    }

    /// Send a chat message and append both sides of the exchange.
    pub fn send_chat(
        &mut self,
        store: &mut ListStore,
        text: &str,
        image_url: Option<&str>,
    ) -> Result<(), SyncError> {
        let exchange = self.api.send_message(text, image_url)?;
        store.add_message(exchange.user_message);
        store.add_message(exchange.message);
        Ok(())
    }

    /// Upload a chat attachment and return its URL.
    pub fn upload_file(&mut self, name: &str, bytes: &[u8]) -> Result<String, SyncError> {
        let uploaded = self.api.upload_file(name, bytes)?;
        debug!(url = %uploaded.url, size = bytes.len(), "file uploaded");
        Ok(uploaded.url)
    }

    /// Clear the chat history on the server and locally.
    pub fn clear_chat(&mut self, store: &mut ListStore) -> Result<(), SyncError> {
        self.api.clear_chat_history()?;
        store.set_messages(Vec::new());
        Ok(())
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
