//! In-process [`RemoteApi`] with failure injection.
//!
//! Backs the demo front end and the sync tests. Recent calls are recorded,
//! and calls can be made to fail once (a specific status) or always
//! (offline). Accounts and bearer tokens are kept in memory; list calls
//! only check the token once [`InMemoryApi::require_auth`] is switched on.

use super::api::{ChatExchange, RemoteApi};
use super::demo::DemoData;
use crate::model::{
    ApiError, AuthSession, Category, CategoryId, ChatMessage, ChatRole, Item, ItemId, ItemPatch,
    NewItem, UploadedFile, User,
};
use chrono::Utc;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::trace;

/// Name of an API operation, for failure injection and call recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiCall {
    /// [`RemoteApi::login`]
    Login,
    /// [`RemoteApi::signup`]
    Signup,
    /// [`RemoteApi::fetch_categories`]
    FetchCategories,
    /// [`RemoteApi::fetch_archived_categories`]
    FetchArchivedCategories,
    /// [`RemoteApi::restore_category`]
    RestoreCategory,
    /// [`RemoteApi::update_category_position`]
    UpdateCategoryPosition,
    /// [`RemoteApi::fetch_items`]
    FetchItems,
    /// [`RemoteApi::create_item`]
    CreateItem,
    /// [`RemoteApi::update_item`]
    UpdateItem,
    /// [`RemoteApi::delete_item`]
    DeleteItem,
    /// [`RemoteApi::send_message`]
    SendMessage,
    /// [`RemoteApi::fetch_chat_history`]
    FetchChatHistory,
    /// [`RemoteApi::clear_chat_history`]
    ClearChatHistory,
    /// [`RemoteApi::upload_file`]
    UploadFile,
}

/// Number of recent calls kept by [`InMemoryApi::calls`].
pub const CALL_LOG_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
struct Account {
    user: User,
    password: String,
}

/// Server state held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryApi {
    categories: Vec<Category>,
    archived: Vec<Category>,
    items: Vec<Item>,
    messages: Vec<ChatMessage>,
    next_id: u32,
    offline: bool,
    failures: HashMap<ApiCall, ApiError>,
    calls: VecDeque<ApiCall>,
    accounts: Vec<Account>,
    issued_tokens: HashSet<String>,
    token: Option<String>,
    require_auth: bool,
    uploads: Vec<(String, usize)>,
}

impl InMemoryApi {
    /// Empty server.
    pub fn new() -> Self {
        Self::default()
    }

    /// Server seeded with the demo data set.
    pub fn seeded(demo: DemoData) -> Self {
        Self {
            next_id: 100,
            categories: demo.categories,
            items: demo.items,
            messages: demo.messages,
            ..Self::default()
        }
    }

    /// Add an archived category.
    pub fn archive(&mut self, mut category: Category) {
        category.is_archived = Some(true);
        self.archived.push(category);
    }

    /// Make every call fail as unreachable until set back.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    /// Make the next call of `call` fail with `error`.
    pub fn fail_next(&mut self, call: ApiCall, error: ApiError) {
        self.failures.insert(call, error);
    }

    /// Reject list and chat calls that carry no valid bearer token.
    pub fn require_auth(&mut self, required: bool) {
        self.require_auth = required;
    }

    /// Most recent calls, oldest first, at most [`CALL_LOG_CAPACITY`].
    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.iter().copied().collect()
    }

    /// Stored uploads as `(url, size in bytes)`.
    pub fn uploads(&self) -> &[(String, usize)] {
        &self.uploads
    }

    /// Server-side copy of an item.
    pub fn stored_item(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|i| &i.id == id)
    }

    /// Server-side categories.
    pub fn stored_categories(&self) -> &[Category] {
        &self.categories
    }

    fn enter(&mut self, call: ApiCall) -> Result<(), ApiError> {
        trace!(?call, "in-memory api call");
        if self.calls.len() == CALL_LOG_CAPACITY {
            self.calls.pop_front();
        }
        self.calls.push_back(call);
        if self.offline {
            return Err(ApiError::unreachable());
        }
        if let Some(error) = self.failures.remove(&call) {
            return Err(error);
        }
        let public = matches!(call, ApiCall::Login | ApiCall::Signup);
        let authorized = self
            .token
            .as_ref()
            .is_some_and(|token| self.issued_tokens.contains(token));
        if self.require_auth && !public && !authorized {
            return Err(ApiError::new(401, "Unauthorized"));
        }
        Ok(())
    }

    fn issue_token(&mut self, user: User) -> AuthSession {
        let token = format!("token-{}-{}", user.id, self.issued_tokens.len() + 1);
        self.issued_tokens.insert(token.clone());
        AuthSession { token, user }
    }

    fn fresh_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}_{:02}", self.next_id)
    }

    fn not_found(what: &str) -> ApiError {
        ApiError::new(404, format!("{what} not found"))
    }

    fn message(&mut self, role: ChatRole, text: String, image_url: Option<&str>) -> ChatMessage {
        ChatMessage {
            id: self.fresh_id("msg"),
            role,
            text,
            image_url: image_url.map(str::to_string),
            actions: Vec::new(),
            timestamp: Utc::now(),
        }
    }
}

impl RemoteApi for InMemoryApi {
    fn login(&mut self, email: &str, password: &str) -> Result<AuthSession, ApiError> {
        self.enter(ApiCall::Login)?;
        let user = self
            .accounts
            .iter()
            .find(|a| a.user.email.eq_ignore_ascii_case(email) && a.password == password)
            .map(|a| a.user.clone())
            .ok_or_else(|| ApiError::new(401, "Invalid email or password"))?;
        Ok(self.issue_token(user))
    }

    fn signup(&mut self, email: &str, password: &str) -> Result<AuthSession, ApiError> {
        self.enter(ApiCall::Signup)?;
        if !email.contains('@') || password.is_empty() {
            return Err(ApiError::new(400, "Email and password are required"));
        }
        if self
            .accounts
            .iter()
            .any(|a| a.user.email.eq_ignore_ascii_case(email))
        {
            return Err(ApiError::new(409, "Email already registered"));
        }
        let user = User {
            id: self.fresh_id("user"),
            email: email.to_string(),
        };
        self.accounts.push(Account {
            user: user.clone(),
            password: password.to_string(),
        });
        Ok(self.issue_token(user))
    }

    fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn fetch_categories(&mut self) -> Result<Vec<Category>, ApiError> {
        self.enter(ApiCall::FetchCategories)?;
        let mut categories = self.categories.clone();
        categories.sort_by_key(|c| c.position);
        Ok(categories)
    }

    fn fetch_archived_categories(&mut self) -> Result<Vec<Category>, ApiError> {
        self.enter(ApiCall::FetchArchivedCategories)?;
        Ok(self.archived.clone())
    }

    fn restore_category(&mut self, id: &CategoryId) -> Result<Category, ApiError> {
        self.enter(ApiCall::RestoreCategory)?;
        let index = self
            .archived
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| Self::not_found("Category"))?;
        let mut category = self.archived.remove(index);
        category.is_archived = Some(false);
        category.position = u32::try_from(self.categories.len()).unwrap_or(u32::MAX);
        self.categories.push(category.clone());
        Ok(category)
    }

    fn update_category_position(
        &mut self,
        id: &CategoryId,
        position: u32,
    ) -> Result<Category, ApiError> {
        self.enter(ApiCall::UpdateCategoryPosition)?;
        let category = self
            .categories
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| Self::not_found("Category"))?;
        category.position = position;
        Ok(category.clone())
    }

    fn fetch_items(&mut self, category: &CategoryId) -> Result<Vec<Item>, ApiError> {
        self.enter(ApiCall::FetchItems)?;
        Ok(self
            .items
            .iter()
            .filter(|item| &item.category_id == category)
            .cloned()
            .collect())
    }

    fn create_item(&mut self, new: &NewItem) -> Result<Item, ApiError> {
        self.enter(ApiCall::CreateItem)?;
        if !self.categories.iter().any(|c| c.id == new.category_id) {
            return Err(Self::not_found("Category"));
        }
        let id = ItemId::new(self.fresh_id("item"))
            .map_err(|err| ApiError::new(500, err.to_string()))?;
        let position = self
            .items
            .iter()
            .filter(|item| item.category_id == new.category_id && !item.is_completed)
            .count();
        let now = Utc::now();
        let item = Item {
            id,
            category_id: new.category_id.clone(),
            text: new.text.clone(),
            is_completed: false,
            position: u32::try_from(position).unwrap_or(u32::MAX),
            recurrence: new.recurrence.clone().unwrap_or_else(|| "none".to_string()),
            time: new.time.clone(),
            due_at: new.due_at,
            metadata: new.metadata.clone().unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        self.items.push(item.clone());
        Ok(item)
    }

    fn update_item(&mut self, id: &ItemId, patch: &ItemPatch) -> Result<Item, ApiError> {
        self.enter(ApiCall::UpdateItem)?;
        let item = self
            .items
            .iter_mut()
            .find(|i| &i.id == id)
            .ok_or_else(|| Self::not_found("Item"))?;
        patch.apply_to(item, Utc::now());
        Ok(item.clone())
    }

    fn delete_item(&mut self, id: &ItemId) -> Result<(), ApiError> {
        self.enter(ApiCall::DeleteItem)?;
        let before = self.items.len();
        self.items.retain(|i| &i.id != id);
        if self.items.len() == before {
            return Err(Self::not_found("Item"));
        }
        Ok(())
    }

    fn send_message(
        &mut self,
        text: &str,
        image_url: Option<&str>,
    ) -> Result<ChatExchange, ApiError> {
        self.enter(ApiCall::SendMessage)?;
        let user_message = self.message(ChatRole::User, text.to_string(), image_url);
        let message = self.message(ChatRole::Assistant, format!("Noted: {text}"), None);
        self.messages.push(user_message.clone());
        self.messages.push(message.clone());
        Ok(ChatExchange {
            user_message,
            message,
        })
    }

    fn fetch_chat_history(&mut self) -> Result<Vec<ChatMessage>, ApiError> {
        self.enter(ApiCall::FetchChatHistory)?;
        Ok(self.messages.clone())
    }

    fn clear_chat_history(&mut self) -> Result<(), ApiError> {
        self.enter(ApiCall::ClearChatHistory)?;
        self.messages.clear();
        Ok(())
    }

    fn upload_file(&mut self, name: &str, bytes: &[u8]) -> Result<UploadedFile, ApiError> {
        self.enter(ApiCall::UploadFile)?;
        if bytes.is_empty() {
            return Err(ApiError::new(400, "No file uploaded"));
        }
        let url = format!("/uploads/{}-{name}", self.fresh_id("file"));
        self.uploads.push((url.clone(), bytes.len()));
        Ok(UploadedFile { url })
    }
}
