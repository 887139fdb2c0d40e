//! Remote list API boundary.
//!
//! The transport (HTTP, JSON envelopes) lives outside this crate.
//! Implementations hold the bearer token set through [`RemoteApi::set_token`]
//! and attach it to every request. Every failure maps to an [`ApiError`].

use crate::model::{
    ApiError, AuthSession, Category, CategoryId, ChatMessage, Item, ItemId, ItemPatch, NewItem,
    UploadedFile,
};
use serde::{Deserialize, Serialize};

/// Both sides of one chat exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatExchange {
    /// The stored user message.
    pub user_message: ChatMessage,
    /// The assistant's reply.
    pub message: ChatMessage,
}

/// Operations of the remote list API.
pub trait RemoteApi {
    /// `POST /auth/login`
    fn login(&mut self, email: &str, password: &str) -> Result<AuthSession, ApiError>;

    /// `POST /auth/signup`
    fn signup(&mut self, email: &str, password: &str) -> Result<AuthSession, ApiError>;

    /// Bearer token for later requests; `None` signs out.
    fn set_token(&mut self, token: Option<String>);

    /// Whether a bearer token is held.
    fn has_token(&self) -> bool;

    /// `GET /categories`
    fn fetch_categories(&mut self) -> Result<Vec<Category>, ApiError>;

    /// `GET /categories/archived`
    fn fetch_archived_categories(&mut self) -> Result<Vec<Category>, ApiError>;

    /// `PATCH /categories/{id}/restore`
    fn restore_category(&mut self, id: &CategoryId) -> Result<Category, ApiError>;

    /// `PATCH /categories/{id}` with a new position.
    fn update_category_position(
        &mut self,
        id: &CategoryId,
        position: u32,
    ) -> Result<Category, ApiError>;

    /// `GET /categories/{id}/items`
    fn fetch_items(&mut self, category: &CategoryId) -> Result<Vec<Item>, ApiError>;

    /// `POST /items`
    fn create_item(&mut self, item: &NewItem) -> Result<Item, ApiError>;

    /// `PATCH /items/{id}`
    fn update_item(&mut self, id: &ItemId, patch: &ItemPatch) -> Result<Item, ApiError>;

    /// `DELETE /items/{id}`
    fn delete_item(&mut self, id: &ItemId) -> Result<(), ApiError>;

    /// `POST /chat/message`
    fn send_message(
        &mut self,
        text: &str,
        image_url: Option<&str>,
    ) -> Result<ChatExchange, ApiError>;

    /// `GET /chat/history`
    fn fetch_chat_history(&mut self) -> Result<Vec<ChatMessage>, ApiError>;

    /// `DELETE /chat/history`
    fn clear_chat_history(&mut self) -> Result<(), ApiError>;

    /// `POST /chat/upload` (multipart field `image`)
    fn upload_file(&mut self, name: &str, bytes: &[u8]) -> Result<UploadedFile, ApiError>;
}
