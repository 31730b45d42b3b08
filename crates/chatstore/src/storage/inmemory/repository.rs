//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use chatstore_core::chat::{Message, Sender, Session};
use chatstore_core::storage::{
    MessageRepository, RepositoryError, Result, SessionRepository,
};

/// In-memory storage backend for testing.
///
/// Sessions are kept per user in creation order, messages per session in
/// insertion order, matching the key ordering the DynamoDB backend relies
/// on. Data is not persisted and is lost when the repository is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    sessions: Arc<RwLock<HashMap<String, Vec<Session>>>>,
    messages: Arc<RwLock<HashMap<(String, Uuid), Vec<Message>>>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemoryRepository {
    async fn list_sessions(&self, user_id: &str) -> Result<Vec<Session>> {
        let sessions = self.sessions.read().await;
        let mut result: Vec<Session> = sessions.get(user_id).cloned().unwrap_or_default();
        result.reverse(); // most recently created first
        Ok(result)
    }

    async fn create_session(&self, user_id: &str, name: &str) -> Result<Uuid> {
        self.deactivate_sessions(user_id).await?;

        let session = Session::new(user_id, name);
        let id = session.id;

        let mut sessions = self.sessions.write().await;
        sessions.entry(user_id.to_string()).or_default().push(session);
        Ok(id)
    }

    async fn deactivate_sessions(&self, user_id: &str) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        if let Some(user_sessions) = sessions.get_mut(user_id) {
            let now = Utc::now();
            for session in user_sessions.iter_mut().filter(|s| s.is_active) {
                session.is_active = false;
                session.updated_at = now;
            }
        }
        Ok(())
    }

    async fn get_active_session(&self, user_id: &str) -> Result<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(user_id)
            .and_then(|user_sessions| user_sessions.iter().find(|s| s.is_active).cloned()))
    }
}

#[async_trait]
impl MessageRepository for InMemoryRepository {
    async fn get_history(&self, user_id: &str, session_id: Uuid) -> Result<Vec<Message>> {
        let messages = self.messages.read().await;
        Ok(messages
            .get(&(user_id.to_string(), session_id))
            .cloned()
            .unwrap_or_default())
    }

    async fn append_message(
        &self,
        user_id: &str,
        session_id: Uuid,
        content: &str,
        sender: Sender,
    ) -> Result<Uuid> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(user_id)
            .and_then(|user_sessions| user_sessions.iter_mut().find(|s| s.id == session_id))
            .ok_or_else(|| RepositoryError::NotFound {
                entity_type: "Session",
                id: session_id.to_string(),
            })?;

        let message = Message::new(user_id, session_id, content, sender);
        let id = message.id;

        session.message_count += 1;
        session.last_activity = message.timestamp;
        session.updated_at = message.created_at;

        let mut messages = self.messages.write().await;
        messages
            .entry((user_id.to_string(), session_id))
            .or_default()
            .push(message);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER: &str = "u1";

    #[tokio::test]
    async fn test_list_sessions_empty_for_unknown_user() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.list_sessions(USER).await.unwrap(), vec![]);
    }

    #[tokio::test]
    async fn test_create_session_leaves_exactly_one_active() {
        let repo = InMemoryRepository::new();
        repo.create_session(USER, "First").await.unwrap();
        repo.create_session(USER, "Second").await.unwrap();
        let id = repo.create_session(USER, "Third").await.unwrap();

        let sessions = repo.list_sessions(USER).await.unwrap();
        let active: Vec<_> = sessions.iter().filter(|s| s.is_active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, id);
        assert_eq!(active[0].message_count, 0);
    }

    #[tokio::test]
    async fn test_list_sessions_most_recently_created_first() {
        let repo = InMemoryRepository::new();
        let a = repo.create_session(USER, "A").await.unwrap();
        let b = repo.create_session(USER, "B").await.unwrap();

        let sessions = repo.list_sessions(USER).await.unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].id, b);
        assert_eq!(sessions[1].id, a);
    }

    #[tokio::test]
    async fn test_get_active_session_matches_created_session() {
        let repo = InMemoryRepository::new();
        assert!(repo.get_active_session(USER).await.unwrap().is_none());

        let id = repo.create_session(USER, "Demo").await.unwrap();
        let active = repo.get_active_session(USER).await.unwrap().unwrap();
        assert_eq!(active.id, id);
    }

    #[tokio::test]
    async fn test_get_history_empty_for_new_session() {
        let repo = InMemoryRepository::new();
        let id = repo.create_session(USER, "Demo").await.unwrap();
        assert_eq!(repo.get_history(USER, id).await.unwrap(), vec![]);
    }

    #[tokio::test]
    async fn test_append_message_updates_session_counters() {
        let repo = InMemoryRepository::new();
        let id = repo.create_session(USER, "Demo").await.unwrap();
        let before = repo.get_active_session(USER).await.unwrap().unwrap();

        repo.append_message(USER, id, "hello", Sender::User)
            .await
            .unwrap();

        let after = repo.get_active_session(USER).await.unwrap().unwrap();
        assert_eq!(after.message_count, before.message_count + 1);
        assert!(after.last_activity >= before.last_activity);
    }

    #[tokio::test]
    async fn test_append_message_to_missing_session_is_not_found() {
        let repo = InMemoryRepository::new();
        let err = repo
            .append_message(USER, Uuid::now_v7(), "hello", Sender::User)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_demo_scenario() {
        let repo = InMemoryRepository::new();

        let created = repo.create_session(USER, "Demo").await.unwrap();
        let active = repo.get_active_session(USER).await.unwrap().unwrap();
        assert_eq!(active.id, created);

        repo.append_message(USER, created, "hello", Sender::User)
            .await
            .unwrap();
        repo.append_message(USER, created, "hi", Sender::Ai)
            .await
            .unwrap();

        let history = repo.get_history(USER, created).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "hello");
        assert_eq!(history[0].sender, Sender::User);
        assert_eq!(history[1].content, "hi");
        assert_eq!(history[1].sender, Sender::Ai);

        let sessions = repo.list_sessions(USER).await.unwrap();
        let session = sessions.iter().find(|s| s.id == created).unwrap();
        assert_eq!(session.message_count, 2);
    }

    #[tokio::test]
    async fn test_second_session_deactivates_first() {
        let repo = InMemoryRepository::new();
        let a = repo.create_session(USER, "A").await.unwrap();
        let b = repo.create_session(USER, "B").await.unwrap();

        let sessions = repo.list_sessions(USER).await.unwrap();
        let session_a = sessions.iter().find(|s| s.id == a).unwrap();
        let session_b = sessions.iter().find(|s| s.id == b).unwrap();
        assert!(!session_a.is_active);
        assert!(session_b.is_active);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated_per_user() {
        let repo = InMemoryRepository::new();
        let a = repo.create_session("u1", "Mine").await.unwrap();
        let b = repo.create_session("u2", "Theirs").await.unwrap();

        let active_u1 = repo.get_active_session("u1").await.unwrap().unwrap();
        let active_u2 = repo.get_active_session("u2").await.unwrap().unwrap();
        assert_eq!(active_u1.id, a);
        assert_eq!(active_u2.id, b);
        assert!(active_u1.is_active && active_u2.is_active);
    }
}
