//! Fixed sample data for local development.

use aws_sdk_dynamodb::types::{PutRequest, WriteRequest};
use aws_sdk_dynamodb::Client;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use chatstore_core::chat::{Message, Sender, Session};

use crate::storage::dynamodb::conversions::{message_to_item, session_to_item};

use super::client::get_table_state;
use super::config::TableNames;
use super::error::{Result, SchemaError};

/// User every sample row belongs to.
pub const SAMPLE_USER_ID: &str = "user001";

// Fixed ids so reseeding overwrites rather than duplicates. Chosen in
// ascending order to match the creation order of the rows they identify.
const SESSION_A: &str = "01900000-0000-7000-8000-0000000000aa";
const SESSION_B: &str = "01900000-0001-7000-8000-0000000000bb";
const MESSAGE_1: &str = "01900000-0000-7000-8000-000000000001";
const MESSAGE_2: &str = "01900000-0000-7000-8000-000000000002";
const MESSAGE_3: &str = "01900000-0000-7000-8000-000000000003";
const MESSAGE_4: &str = "01900000-0001-7000-8000-000000000004";

fn id(s: &str) -> Uuid {
    Uuid::parse_str(s).unwrap_or_else(|_| Uuid::nil())
}

fn session(
    id_str: &str,
    name: &str,
    is_active: bool,
    message_count: u64,
    created: DateTime<Utc>,
    last_active: DateTime<Utc>,
) -> Session {
    Session {
        user_id: SAMPLE_USER_ID.to_string(),
        id: id(id_str),
        name: name.to_string(),
        is_active,
        message_count,
        last_activity: last_active.timestamp_millis(),
        created_at: created,
        updated_at: last_active,
    }
}

fn message(
    id_str: &str,
    session_id_str: &str,
    content: &str,
    sender: Sender,
    at: DateTime<Utc>,
) -> Message {
    Message {
        user_id: SAMPLE_USER_ID.to_string(),
        session_id: id(session_id_str),
        id: id(id_str),
        content: content.to_string(),
        sender,
        timestamp: at.timestamp_millis(),
        created_at: at,
        updated_at: at,
    }
}

/// Sample sessions: one finished conversation and one active one.
pub fn sample_sessions(now: DateTime<Utc>) -> Vec<Session> {
    vec![
        session(
            SESSION_A,
            "TypeScript study",
            false,
            3,
            now - Duration::hours(1),
            now - Duration::seconds(3500),
        ),
        session(
            SESSION_B,
            "React hooks questions",
            true,
            1,
            now - Duration::minutes(30),
            now - Duration::minutes(30),
        ),
    ]
}

/// Sample messages matching the counts recorded in [`sample_sessions`].
pub fn sample_messages(now: DateTime<Utc>) -> Vec<Message> {
    vec![
        message(
            MESSAGE_1,
            SESSION_A,
            "Hello! You're the AI chat bot, right?",
            Sender::User,
            now - Duration::seconds(3600),
        ),
        message(
            MESSAGE_2,
            SESSION_A,
            "Yes! Is there anything I can help you with?",
            Sender::Ai,
            now - Duration::seconds(3580),
        ),
        message(
            MESSAGE_3,
            SESSION_A,
            "Can you tell me about TypeScript?",
            Sender::User,
            now - Duration::seconds(3500),
        ),
        message(
            MESSAGE_4,
            SESSION_B,
            "New session. I have a question about React hooks.",
            Sender::User,
            now - Duration::minutes(30),
        ),
    ]
}

/// Inserts the fixed sample rows into both tables.
///
/// Fails with [`SchemaError::TableNotFound`] when either table is missing.
/// Returns the number of items written.
pub async fn insert_sample_data(client: &Client, tables: &TableNames) -> Result<u32> {
    for table_name in [&tables.chat_history, &tables.user_sessions] {
        if get_table_state(client, table_name).await?.is_none() {
            return Err(SchemaError::TableNotFound {
                table_name: table_name.clone(),
            });
        }
    }

    let now = Utc::now();
    let message_items: Vec<_> = sample_messages(now).iter().map(message_to_item).collect();
    let session_items: Vec<_> = sample_sessions(now).iter().map(session_to_item).collect();

    let mut inserted = 0;
    inserted += batch_put(client, &tables.chat_history, message_items).await?;
    inserted += batch_put(client, &tables.user_sessions, session_items).await?;
    Ok(inserted)
}

async fn batch_put(
    client: &Client,
    table_name: &str,
    items: Vec<std::collections::HashMap<String, aws_sdk_dynamodb::types::AttributeValue>>,
) -> Result<u32> {
    let mut inserted = 0;

    // BatchWriteItem accepts at most 25 items per request.
    for chunk in items.chunks(25) {
        let write_requests = chunk
            .iter()
            .map(|item| {
                Ok(WriteRequest::builder()
                    .put_request(
                        PutRequest::builder()
                            .set_item(Some(item.clone()))
                            .build()
                            .map_err(|e| SchemaError::AwsSdk(e.to_string()))?,
                    )
                    .build())
            })
            .collect::<Result<Vec<_>>>()?;

        client
            .batch_write_item()
            .request_items(table_name, write_requests)
            .send()
            .await
            .map_err(|e| SchemaError::AwsSdk(e.to_string()))?;

        inserted += chunk.len() as u32;
    }

    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_counts_match_message_rows() {
        let now = Utc::now();
        let sessions = sample_sessions(now);
        let messages = sample_messages(now);

        for session in &sessions {
            let actual = messages
                .iter()
                .filter(|m| m.session_id == session.id)
                .count() as u64;
            assert_eq!(session.message_count, actual, "session {}", session.name);
        }
    }

    #[test]
    fn test_exactly_one_sample_session_is_active() {
        let sessions = sample_sessions(Utc::now());
        assert_eq!(sessions.iter().filter(|s| s.is_active).count(), 1);
    }

    #[test]
    fn test_all_sample_rows_belong_to_sample_user() {
        let now = Utc::now();
        assert!(sample_sessions(now)
            .iter()
            .all(|s| s.user_id == SAMPLE_USER_ID));
        assert!(sample_messages(now)
            .iter()
            .all(|m| m.user_id == SAMPLE_USER_ID));
    }

    #[test]
    fn test_sample_message_ids_sort_in_insertion_order() {
        let now = Utc::now();
        let messages = sample_messages(now);
        for session in sample_sessions(now) {
            let ids: Vec<_> = messages
                .iter()
                .filter(|m| m.session_id == session.id)
                .map(|m| m.id)
                .collect();
            let mut sorted = ids.clone();
            sorted.sort();
            assert_eq!(ids, sorted);
        }
    }

    #[test]
    fn test_sample_last_activity_matches_latest_message() {
        let now = Utc::now();
        let messages = sample_messages(now);
        for session in sample_sessions(now) {
            let latest = messages
                .iter()
                .filter(|m| m.session_id == session.id)
                .map(|m| m.timestamp)
                .max()
                .unwrap();
            assert_eq!(session.last_activity, latest);
        }
    }
}
