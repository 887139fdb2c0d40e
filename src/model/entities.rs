//! Business entities exchanged with the remote list API.
//!
//! Field names follow the API's camelCase JSON contract. The gesture core
//! never looks inside these; rows only carry their identifiers.

use super::identifiers::{CategoryId, ItemId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A user-defined list ("Groceries", "Medications", ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Category identifier.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// URL-safe name.
    pub slug: String,
    /// Sort key among the user's categories (0-based, dense after a reorder).
    pub position: u32,
    /// Optional emoji icon.
    #[serde(default)]
    pub icon: Option<String>,
    /// Optional accent colour (`#RRGGBB`).
    #[serde(default)]
    pub color: Option<String>,
    /// Number of open (not completed) items.
    pub item_count: u32,
    /// Whether the category is archived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// One entry of a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Item identifier.
    pub id: ItemId,
    /// Owning category.
    pub category_id: CategoryId,
    /// Item text.
    pub text: String,
    /// Completion flag.
    pub is_completed: bool,
    /// Sort key among the category's open items.
    pub position: u32,
    /// Recurrence rule ("none", "daily", "weekly", ...).
    pub recurrence: String,
    /// Time of day, `HH:mm` 24h.
    #[serde(default)]
    pub time: Option<String>,
    /// Due date.
    #[serde(default)]
    pub due_at: Option<DateTime<Utc>>,
    /// Free-form attributes (notes, dose, quantity, ...).
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// The `notes` metadata entry, if it is a non-empty string.
    pub fn notes(&self) -> Option<&str> {
        self.metadata
            .get("notes")
            .and_then(Value::as_str)
            .filter(|notes| !notes.is_empty())
    }
}

/// Partial update of an item, sent as a PATCH body.
///
/// Absent fields are left untouched by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    /// New text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// New completion flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
    /// New position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    /// New recurrence rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<String>,
    /// New time of day. `Some(None)` clears it (sent as `null`).
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_or_null"
    )]
    pub time: Option<Option<String>>,
    /// New due date. `Some(None)` clears it (sent as `null`).
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_or_null"
    )]
    pub due_at: Option<Option<DateTime<Utc>>>,
    /// Replacement metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

/// A field that is present maps to `Some`, so an explicit `null` becomes
/// `Some(None)`. Absent fields fall back to `None` through `#[serde(default)]`.
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl ItemPatch {
    /// Apply the patch to a local copy, stamping `updated_at`.
    pub fn apply_to(&self, item: &mut Item, now: DateTime<Utc>) {
        if let Some(text) = &self.text {
            item.text = text.clone();
        }
        if let Some(done) = self.is_completed {
            item.is_completed = done;
        }
        if let Some(position) = self.position {
            item.position = position;
        }
        if let Some(recurrence) = &self.recurrence {
            item.recurrence = recurrence.clone();
        }
        if let Some(time) = &self.time {
            item.time = time.clone();
        }
        if let Some(due_at) = self.due_at {
            item.due_at = due_at;
        }
        if let Some(metadata) = &self.metadata {
            item.metadata = metadata.clone();
        }
        item.updated_at = now;
    }
}

/// Account returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Account identifier.
    pub id: String,
    /// Login email.
    pub email: String,
}

/// Response of `login` and `signup`: a bearer token and its account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    /// Bearer token for later requests.
    pub token: String,
    /// Signed-in account.
    pub user: User,
}

/// Response of a file upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// Where the stored file can be fetched.
    pub url: String,
}

/// Fields required to create an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    /// Target category.
    pub category_id: CategoryId,
    /// Item text.
    pub text: String,
    /// Recurrence rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<String>,
    /// Time of day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Due date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_at: Option<DateTime<Utc>>,
    /// Free-form attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Message typed by the user.
    User,
    /// Reply from the assistant.
    Assistant,
}

/// Kind of side effect the assistant performed while answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// An item was created.
    ItemCreated,
    /// An item was edited.
    ItemUpdated,
    /// An item was completed.
    ItemCompleted,
    /// An item was deleted.
    ItemDeleted,
    /// An item moved to another category.
    ItemMoved,
    /// A category was created.
    CategoryCreated,
    /// A category was deleted.
    CategoryDeleted,
    /// A category was renamed.
    CategoryRenamed,
    /// A category was archived.
    CategoryArchived,
    /// An archived category was restored.
    CategoryRestored,
    /// A reminder was scheduled.
    ReminderSet,
}

/// One assistant side effect attached to a chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatAction {
    /// What happened.
    #[serde(rename = "type")]
    pub kind: ActionKind,
    /// Affected item, when the server includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<Item>,
    /// Affected category, when the server includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Human-readable summary.
    pub summary: String,
}

/// A chat message. Rendering is left to front ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Message identifier.
    pub id: String,
    /// Author.
    pub role: ChatRole,
    /// Message text.
    pub text: String,
    /// Attached image, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Side effects performed by the assistant.
    #[serde(default)]
    pub actions: Vec<ChatAction>,
    /// Send time.
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ITEM_JSON: &str = r#"{
        "id": "item_01",
        "categoryId": "cat_01",
        "text": "Adderall XR",
        "isCompleted": false,
        "position": 0,
        "recurrence": "daily",
        "time": "10:00",
        "dueAt": null,
        "metadata": { "dose": "20mg" },
        "createdAt": "2026-02-20T10:00:00Z",
        "updatedAt": "2026-02-20T10:00:00Z"
    }"#;

    #[test]
    fn item_parses_api_payload() {
        let item: Item = serde_json::from_str(ITEM_JSON).expect("valid item json");
        assert_eq!(item.id.as_str(), "item_01");
        assert_eq!(item.category_id.as_str(), "cat_01");
        assert_eq!(item.time.as_deref(), Some("10:00"));
        assert_eq!(item.due_at, None);
        assert_eq!(item.metadata.get("dose"), Some(&Value::from("20mg")));
    }

    #[test]
    fn item_notes_ignores_non_string_values() {
        let mut item: Item = serde_json::from_str(ITEM_JSON).expect("valid item json");
        assert_eq!(item.notes(), None);
        item.metadata.insert("notes".into(), Value::from("take with food"));
        assert_eq!(item.notes(), Some("take with food"));
        item.metadata.insert("notes".into(), Value::from(3));
        assert_eq!(item.notes(), None);
    }

    #[test]
    fn patch_serializes_only_present_fields() {
        let patch = ItemPatch {
            is_completed: Some(true),
            ..ItemPatch::default()
        };
        let json = serde_json::to_string(&patch).expect("serializes");
        assert_eq!(json, r#"{"isCompleted":true}"#);
    }

    #[test]
    fn patch_null_clears_while_absent_leaves_untouched() {
        let clear: ItemPatch =
            serde_json::from_str(r#"{"time":null,"dueAt":null}"#).expect("valid patch");
        assert_eq!(clear.time, Some(None));
        assert_eq!(clear.due_at, Some(None));
        assert_eq!(
            serde_json::to_string(&clear).expect("serializes"),
            r#"{"time":null,"dueAt":null}"#
        );

        let untouched: ItemPatch = serde_json::from_str(r#"{"text":"Eggs"}"#).expect("valid patch");
        assert_eq!(untouched.time, None);
        assert_eq!(untouched.due_at, None);

        let set: ItemPatch = serde_json::from_str(r#"{"time":"08:30"}"#).expect("valid patch");
        assert_eq!(set.time, Some(Some("08:30".to_string())));

        let mut item: Item = serde_json::from_str(ITEM_JSON).expect("valid item json");
        let now = item.updated_at;
        clear.apply_to(&mut item, now);
        assert_eq!(item.time, None);
    }

    #[test]
    fn patch_apply_stamps_updated_at() {
        let mut item: Item = serde_json::from_str(ITEM_JSON).expect("valid item json");
        let later = item.updated_at + chrono::Duration::hours(1);
        let patch = ItemPatch {
            text: Some("Adderall".into()),
            time: Some(None),
            ..ItemPatch::default()
        };

        patch.apply_to(&mut item, later);

        assert_eq!(item.text, "Adderall");
        assert_eq!(item.time, None);
        assert_eq!(item.updated_at, later);
    }

    #[test]
    fn auth_session_parses_login_response() {
        let json = r#"{"token":"jwt.abc","user":{"id":"u_1","email":"sam@example.com"}}"#;
        let session: AuthSession = serde_json::from_str(json).expect("valid session");
        assert_eq!(session.token, "jwt.abc");
        assert_eq!(session.user.email, "sam@example.com");
    }

    #[test]
    fn chat_action_uses_type_key() {
        let json = r#"{"type":"reminder_set","summary":"Daily reminder at 10:00 AM"}"#;
        let action: ChatAction = serde_json::from_str(json).expect("valid action");
        assert_eq!(action.kind, ActionKind::ReminderSet);
        assert!(action.item.is_none());
    }
}
