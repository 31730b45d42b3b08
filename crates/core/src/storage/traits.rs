use async_trait::async_trait;
use uuid::Uuid;

use crate::chat::{Message, Sender, Session};

use super::Result;

/// Repository for user session operations.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Lists all sessions for a user, most recently created first.
    ///
    /// Returns an empty vector for a user with no sessions.
    async fn list_sessions(&self, user_id: &str) -> Result<Vec<Session>>;

    /// Creates a new active session and returns its generated id.
    ///
    /// All of the user's existing sessions are deactivated first. The
    /// deactivation is best-effort: failures are logged and the creation
    /// proceeds, which can briefly leave more than one session active.
    async fn create_session(&self, user_id: &str, name: &str) -> Result<Uuid>;

    /// Marks every active session of the user as inactive.
    ///
    /// Per-session update failures are logged, not propagated.
    async fn deactivate_sessions(&self, user_id: &str) -> Result<()>;

    /// Returns the user's active session, if any.
    ///
    /// "At most one active" is an application convention, so when several
    /// sessions are marked active the first match is returned.
    async fn get_active_session(&self, user_id: &str) -> Result<Option<Session>>;
}

/// Repository for chat message operations.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Returns a session's messages in insertion order.
    ///
    /// Returns an empty vector for a session with no messages.
    async fn get_history(&self, user_id: &str, session_id: Uuid) -> Result<Vec<Message>>;

    /// Appends a message and updates the session's message count and
    /// last-activity timestamp as one unit. Returns the generated message id.
    async fn append_message(
        &self,
        user_id: &str,
        session_id: Uuid,
        content: &str,
        sender: Sender,
    ) -> Result<Uuid>;
}
