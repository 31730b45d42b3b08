use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who produced a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

impl Sender {
    /// Returns the wire representation stored in the `sender` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Ai => "ai",
        }
    }
}

/// One user conversation, tracking activity state and message count.
///
/// At most one session per user is active at a time. This is an application
/// convention maintained by deactivating the user's other sessions before
/// creating a new one; the store does not enforce it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Owning user. Partition key in the `UserSessions` table.
    pub user_id: String,
    pub id: Uuid,
    pub name: String,
    pub is_active: bool,
    /// Number of messages appended to this session.
    pub message_count: u64,
    /// Epoch milliseconds of the last appended message (or of creation).
    pub last_activity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Creates a new active session with zero messages.
    ///
    /// Ids are UUID v7, so sessions created later sort after sessions
    /// created earlier under lexicographic key ordering.
    pub fn new(user_id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.into(),
            id: Uuid::now_v7(),
            name: name.into(),
            is_active: true,
            message_count: 0,
            last_activity: now.timestamp_millis(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets a specific ID for this session (useful for testing and seeding).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }
}

/// One turn (user or AI) within a session's chat history.
///
/// Messages are immutable once appended and are never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Owning user. Partition key in the `ChatHistory` table.
    pub user_id: String,
    /// The session this message belongs to.
    pub session_id: Uuid,
    pub id: Uuid,
    pub content: String,
    pub sender: Sender,
    /// Epoch milliseconds when the message was appended.
    pub timestamp: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Message {
    /// Creates a new message stamped with the current time.
    pub fn new(
        user_id: impl Into<String>,
        session_id: Uuid,
        content: impl Into<String>,
        sender: Sender,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.into(),
            session_id,
            id: Uuid::now_v7(),
            content: content.into(),
            sender,
            timestamp: now.timestamp_millis(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets a specific ID for this message (useful for testing and seeding).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }
}
