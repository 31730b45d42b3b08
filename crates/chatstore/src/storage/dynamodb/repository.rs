//! DynamoDB repository implementation.
//!
//! Implements the repository traits from `chatstore_core::storage` using the
//! two-table layout declared by `crate::schema`.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, Put, TransactWriteItem, Update};
use aws_sdk_dynamodb::Client;
use uuid::Uuid;

use chatstore_core::chat::{Message, Sender, Session};
use chatstore_core::storage::{
    MessageRepository, RepositoryError, Result, SessionRepository,
};

use crate::schema::TableNames;

use super::conversions::{item_to_message, item_to_session, message_to_item, session_to_item};
use super::error::{map_put_item_error, map_query_error, map_transact_error, map_update_item_error};
use super::keys;

/// DynamoDB-based repository implementation.
///
/// Holds no state besides the client and table names; every operation is
/// an independent request (or transaction) against the store.
pub struct DynamoDbRepository {
    client: Client,
    tables: TableNames,
}

impl DynamoDbRepository {
    /// Creates a new repository with the given DynamoDB client and tables.
    pub fn new(client: Client, tables: TableNames) -> Self {
        Self { client, tables }
    }

    /// The table names this repository operates on.
    pub fn tables(&self) -> &TableNames {
        &self.tables
    }
}

#[async_trait]
impl SessionRepository for DynamoDbRepository {
    async fn list_sessions(&self, user_id: &str) -> Result<Vec<Session>> {
        let result = self
            .client
            .query()
            .table_name(&self.tables.user_sessions)
            .key_condition_expression("userId = :userId")
            .expression_attribute_values(":userId", AttributeValue::S(user_id.to_string()))
            .scan_index_forward(false)
            .send()
            .await
            .map_err(map_query_error)?;

        let items = result.items.unwrap_or_default();
        items.iter().map(item_to_session).collect()
    }

    async fn create_session(&self, user_id: &str, name: &str) -> Result<Uuid> {
        // Best-effort: creation proceeds even when deactivation fails, so a
        // failure here can briefly leave more than one session active.
        if let Err(err) = self.deactivate_sessions(user_id).await {
            tracing::warn!(user_id, error = %err, "failed to deactivate existing sessions");
        }

        let session = Session::new(user_id, name);
        let item = session_to_item(&session);

        self.client
            .put_item()
            .table_name(&self.tables.user_sessions)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(userId)")
            .send()
            .await
            .map_err(|e| map_put_item_error(e, "Session", session.id.to_string()))?;

        Ok(session.id)
    }

    async fn deactivate_sessions(&self, user_id: &str) -> Result<()> {
        let sessions = self.list_sessions(user_id).await?;

        for session in sessions.iter().filter(|s| s.is_active) {
            let result = self
                .client
                .update_item()
                .table_name(&self.tables.user_sessions)
                .key("userId", AttributeValue::S(user_id.to_string()))
                .key("sessionId", AttributeValue::S(session.id.to_string()))
                .update_expression("SET isActive = :isActive, updatedAt = :updatedAt")
                .expression_attribute_values(":isActive", AttributeValue::Bool(false))
                .expression_attribute_values(
                    ":updatedAt",
                    AttributeValue::S(chrono::Utc::now().to_rfc3339()),
                )
                .send()
                .await;

            if let Err(err) = result {
                let err = map_update_item_error(err, "Session", session.id.to_string());
                tracing::warn!(user_id, session_id = %session.id, error = %err, "failed to deactivate session");
            }
        }

        Ok(())
    }

    async fn get_active_session(&self, user_id: &str) -> Result<Option<Session>> {
        // No Limit here: DynamoDB applies Limit before the filter expression,
        // which would miss active sessions that sort after inactive ones.
        let result = self
            .client
            .query()
            .table_name(&self.tables.user_sessions)
            .key_condition_expression("userId = :userId")
            .filter_expression("isActive = :isActive")
            .expression_attribute_values(":userId", AttributeValue::S(user_id.to_string()))
            .expression_attribute_values(":isActive", AttributeValue::Bool(true))
            .send()
            .await
            .map_err(map_query_error)?;

        let items = result.items.unwrap_or_default();
        match items.first() {
            Some(item) => Ok(Some(item_to_session(item)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl MessageRepository for DynamoDbRepository {
    async fn get_history(&self, user_id: &str, session_id: Uuid) -> Result<Vec<Message>> {
        let result = self
            .client
            .query()
            .table_name(&self.tables.chat_history)
            .key_condition_expression("userId = :userId AND begins_with(sessionId, :prefix)")
            .expression_attribute_values(":userId", AttributeValue::S(user_id.to_string()))
            .expression_attribute_values(
                ":prefix",
                AttributeValue::S(keys::message_sort_key_prefix(session_id)),
            )
            .send()
            .await
            .map_err(map_query_error)?;

        let items = result.items.unwrap_or_default();
        items.iter().map(item_to_message).collect()
    }

    async fn append_message(
        &self,
        user_id: &str,
        session_id: Uuid,
        content: &str,
        sender: Sender,
    ) -> Result<Uuid> {
        let message = Message::new(user_id, session_id, content, sender);
        let item = message_to_item(&message);

        // One transaction covers both writes, so the message insert and the
        // session counter update cannot partially apply.
        let put = Put::builder()
            .table_name(&self.tables.chat_history)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(userId)")
            .build()
            .map_err(|e| RepositoryError::InvalidData(e.to_string()))?;

        let update = Update::builder()
            .table_name(&self.tables.user_sessions)
            .key("userId", AttributeValue::S(user_id.to_string()))
            .key("sessionId", AttributeValue::S(session_id.to_string()))
            .update_expression(
                "ADD messageCount :inc SET lastActivity = :lastActivity, updatedAt = :updatedAt",
            )
            .condition_expression("attribute_exists(userId)")
            .expression_attribute_values(":inc", AttributeValue::N("1".to_string()))
            .expression_attribute_values(
                ":lastActivity",
                AttributeValue::N(message.timestamp.to_string()),
            )
            .expression_attribute_values(
                ":updatedAt",
                AttributeValue::S(message.created_at.to_rfc3339()),
            )
            .build()
            .map_err(|e| RepositoryError::InvalidData(e.to_string()))?;

        self.client
            .transact_write_items()
            .transact_items(TransactWriteItem::builder().put(put).build())
            .transact_items(TransactWriteItem::builder().update(update).build())
            .send()
            .await
            .map_err(|e| map_transact_error(e, "Session", session_id.to_string()))?;

        Ok(message.id)
    }
}
