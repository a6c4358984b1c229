//! Wire-level data model for the mail service.
//!
//! Field names and shapes follow the service's JSON surface exactly;
//! the engine crate layers its own state types on top of these.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a message entry within a user's mailbox.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MessageId(pub i64);

impl MessageId {
    /// Create a new message ID.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a stored draft.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DraftId(pub i64);

impl DraftId {
    /// Create a new draft ID.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for DraftId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a user account, as issued by the directory service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Create a new user ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A server-defined partition of a user's messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Folder {
    /// Received messages.
    #[default]
    Inbox,
    /// Messages the user sent.
    Sent,
    /// Soft-deleted messages awaiting permanent removal.
    Trash,
}

impl Folder {
    /// Path segment used by the listing and bulk endpoints.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inbox => "inbox",
            Self::Sent => "sent",
            Self::Trash => "trash",
        }
    }
}

impl std::fmt::Display for Folder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a folder listing.
///
/// Ordering within a page is most-recent-first, established by the
/// service and preserved as-is by clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageSummary {
    /// Unique within a folder snapshot.
    pub id: MessageId,
    /// Subject line.
    pub subject: String,
    /// Sender account id.
    pub sender_id: UserId,
    /// Sender display name.
    pub sender_name: String,
    /// Sender role label.
    pub sender_role: String,
    /// Server-side send time.
    pub timestamp: DateTime<Utc>,
    /// Whether the recipient has opened the message.
    pub is_read: bool,
    /// Whether the recipient starred the message.
    #[serde(default)]
    pub is_starred: bool,
    /// Priority label (`normal` or `urgent`).
    pub priority: String,
}

/// Full message content, fetched lazily when a message is opened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageDetail {
    /// Listing fields of the same entry.
    #[serde(flatten)]
    pub summary: MessageSummary,
    /// Plain-text body.
    pub body: String,
}

/// Denormalized per-folder counters.
///
/// Refreshed independently of the listings, so it can briefly disagree
/// with the loaded list length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderStats {
    /// Unread messages in the inbox.
    pub inbox_unread: u32,
    /// Total messages in the inbox.
    pub inbox_total: u32,
    /// Total messages the user sent.
    pub sent_total: u32,
    /// Total messages in the trash.
    pub trash_total: u32,
}

/// How a message or draft addresses its recipients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    /// Explicit recipient list.
    #[default]
    Individual,
    /// Every member of a training batch.
    Batch,
    /// Every member of a company.
    Company,
    /// Every holder of a role.
    Role,
}

/// A stored draft, listed separately from folder messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    /// Draft id.
    pub id: DraftId,
    /// Subject line.
    pub subject: String,
    /// Body text.
    pub body: String,
    /// Addressing mode.
    pub target_type: TargetType,
    /// Addressing argument (user id, batch, company, or role label).
    pub target_value: String,
    /// Last save time.
    pub updated_at: DateTime<Utc>,
    /// Explicit recipient ids; travels JSON-encoded inside a string field.
    #[serde(rename = "recipient_ids_json", with = "recipient_ids_json", default)]
    pub recipient_ids: Vec<UserId>,
}

/// Body of the send endpoint.
///
/// Exactly one targeting field should be set; the service fans the
/// message out and answers with the recipient count.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendRequest {
    /// Subject line.
    pub subject: String,
    /// Body text.
    pub body: String,
    /// Priority label (`normal` or `urgent`).
    pub priority: String,
    /// Explicit recipients (individual targeting).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_ids: Option<Vec<UserId>>,
    /// Batch label targeting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_batch: Option<String>,
    /// Company label targeting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_company: Option<String>,
    /// Role label targeting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_role: Option<String>,
}

/// Body of the draft save endpoint.
///
/// With an `id` the service updates the existing draft in place;
/// without one it creates a new draft.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveDraftRequest {
    /// Draft to update, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<DraftId>,
    /// Subject line.
    pub subject: String,
    /// Body text.
    pub body: String,
    /// Addressing mode.
    pub target_type: TargetType,
    /// Addressing argument.
    pub target_value: String,
    /// Explicit recipient ids; travels JSON-encoded inside a string field.
    #[serde(rename = "recipient_ids_json", with = "recipient_ids_json", default)]
    pub recipient_ids: Vec<UserId>,
}

/// Response of the draft save endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SavedDraft {
    /// Id of the created or updated draft.
    pub id: DraftId,
    /// Human-readable acknowledgment.
    #[serde(default)]
    pub message: String,
}

/// Response of the star toggle endpoint.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StarState {
    /// Authoritative flag value after the toggle.
    pub is_starred: bool,
}

/// Body of the bulk delete endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkDeleteRequest {
    /// Entries to delete.
    pub ids: Vec<MessageId>,
    /// Folder the ids belong to; deleting from `trash` is permanent.
    pub folder: Folder,
}

/// Server-initiated event on the push channel.
///
/// Unknown `type` values decode to [`PushEvent::Unknown`] and are
/// dropped by the socket without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PushEvent {
    /// New mail landed in the inbox.
    NewMail,
    /// Unread counters changed without new mail arriving.
    UnreadUpdate,
    /// Any other event type.
    #[serde(other)]
    Unknown,
}

/// Codec for the `recipient_ids_json` field: a JSON id array encoded
/// inside a JSON string.
mod recipient_ids_json {
    use serde::{Deserialize, Deserializer, Serializer, de};

    use super::UserId;

    pub fn serialize<S>(ids: &[UserId], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let encoded = serde_json::to_string(ids).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&encoded)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<UserId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref() {
            None | Some("") => Ok(Vec::new()),
            Some(encoded) => serde_json::from_str(encoded).map_err(de::Error::custom),
        }
    }
}
