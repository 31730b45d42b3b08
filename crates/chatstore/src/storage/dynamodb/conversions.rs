//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB AttributeValue maps and
//! domain types. These are testable in isolation without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use chatstore_core::chat::{Message, Sender, Session};
use chatstore_core::storage::RepositoryError;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::keys;

// ============================================================================
// Session conversions
// ============================================================================

/// Convert a Session to a `UserSessions` item.
pub fn session_to_item(session: &Session) -> HashMap<String, AttributeValue> {
    let mut item = HashMap::new();

    // Keys
    item.insert(
        "userId".to_string(),
        AttributeValue::S(session.user_id.clone()),
    );
    item.insert(
        "sessionId".to_string(),
        AttributeValue::S(session.id.to_string()),
    );

    // Data
    item.insert(
        "sessionName".to_string(),
        AttributeValue::S(session.name.clone()),
    );
    item.insert(
        "isActive".to_string(),
        AttributeValue::Bool(session.is_active),
    );
    item.insert(
        "messageCount".to_string(),
        AttributeValue::N(session.message_count.to_string()),
    );
    item.insert(
        "lastActivity".to_string(),
        AttributeValue::N(session.last_activity.to_string()),
    );
    item.insert(
        "createdAt".to_string(),
        AttributeValue::S(session.created_at.to_rfc3339()),
    );
    item.insert(
        "updatedAt".to_string(),
        AttributeValue::S(session.updated_at.to_rfc3339()),
    );

    item
}

/// Convert a `UserSessions` item to a Session.
pub fn item_to_session(item: &HashMap<String, AttributeValue>) -> Result<Session, RepositoryError> {
    Ok(Session {
        user_id: get_string(item, "userId")?,
        id: get_uuid(item, "sessionId")?,
        name: get_string(item, "sessionName")?,
        is_active: get_bool(item, "isActive")?,
        message_count: get_number(item, "messageCount")?,
        last_activity: get_number(item, "lastActivity")?,
        created_at: get_datetime(item, "createdAt")?,
        updated_at: get_datetime(item, "updatedAt")?,
    })
}

// ============================================================================
// Message conversions
// ============================================================================

/// Convert a Message to a `ChatHistory` item.
///
/// The `sessionId` attribute is the table's sort key and holds the
/// composite `<session_id>#<message_id>`; the plain ids are stored
/// alongside it as data attributes.
pub fn message_to_item(message: &Message) -> HashMap<String, AttributeValue> {
    let mut item = HashMap::new();

    // Keys
    item.insert(
        "userId".to_string(),
        AttributeValue::S(message.user_id.clone()),
    );
    item.insert(
        "sessionId".to_string(),
        AttributeValue::S(keys::message_sort_key(message.session_id, message.id)),
    );

    // Data
    item.insert(
        "messageId".to_string(),
        AttributeValue::S(message.id.to_string()),
    );
    item.insert(
        "content".to_string(),
        AttributeValue::S(message.content.clone()),
    );
    item.insert(
        "sender".to_string(),
        AttributeValue::S(message.sender.as_str().to_string()),
    );
    item.insert(
        "timestamp".to_string(),
        AttributeValue::N(message.timestamp.to_string()),
    );
    item.insert(
        "createdAt".to_string(),
        AttributeValue::S(message.created_at.to_rfc3339()),
    );
    item.insert(
        "updatedAt".to_string(),
        AttributeValue::S(message.updated_at.to_rfc3339()),
    );

    item
}

/// Convert a `ChatHistory` item to a Message.
pub fn item_to_message(item: &HashMap<String, AttributeValue>) -> Result<Message, RepositoryError> {
    let sort_key = get_string(item, "sessionId")?;
    let (session_id, _) = keys::parse_message_sort_key(&sort_key).ok_or_else(|| {
        RepositoryError::InvalidData(format!("Invalid message sort key: {}", sort_key))
    })?;

    Ok(Message {
        user_id: get_string(item, "userId")?,
        session_id,
        id: get_uuid(item, "messageId")?,
        content: get_string(item, "content")?,
        sender: parse_sender(&get_string(item, "sender")?)?,
        timestamp: get_number(item, "timestamp")?,
        created_at: get_datetime(item, "createdAt")?,
        updated_at: get_datetime(item, "updatedAt")?,
    })
}

// ============================================================================
// Sender conversions
// ============================================================================

/// Parse a Sender from its wire representation.
pub fn parse_sender(s: &str) -> Result<Sender, RepositoryError> {
    match s {
        "user" => Ok(Sender::User),
        "ai" => Ok(Sender::Ai),
        _ => Err(RepositoryError::InvalidData(format!(
            "Unknown sender: {}",
            s
        ))),
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Get a required string attribute.
fn get_string(
    item: &HashMap<String, AttributeValue>,
    key: &str,
) -> Result<String, RepositoryError> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| RepositoryError::InvalidData(format!("Missing or invalid field: {}", key)))
}

/// Get a required boolean attribute.
fn get_bool(item: &HashMap<String, AttributeValue>, key: &str) -> Result<bool, RepositoryError> {
    item.get(key)
        .and_then(|v| v.as_bool().ok())
        .copied()
        .ok_or_else(|| RepositoryError::InvalidData(format!("Missing or invalid field: {}", key)))
}

/// Get a required numeric attribute.
fn get_number<T: std::str::FromStr>(
    item: &HashMap<String, AttributeValue>,
    key: &str,
) -> Result<T, RepositoryError> {
    item.get(key)
        .and_then(|v| v.as_n().ok())
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| RepositoryError::InvalidData(format!("Missing or invalid field: {}", key)))
}

/// Get a required UUID attribute.
fn get_uuid(item: &HashMap<String, AttributeValue>, key: &str) -> Result<Uuid, RepositoryError> {
    let s = get_string(item, key)?;
    Uuid::parse_str(&s)
        .map_err(|e| RepositoryError::InvalidData(format!("Invalid UUID {}: {}", key, e)))
}

/// Get a required datetime attribute (RFC 3339 format).
fn get_datetime(
    item: &HashMap<String, AttributeValue>,
    key: &str,
) -> Result<DateTime<Utc>, RepositoryError> {
    let s = get_string(item, key)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::InvalidData(format!("Invalid datetime {}: {}", key, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session() -> Session {
        Session {
            user_id: "user001".to_string(),
            id: Uuid::parse_str("0190a1b2-c3d4-7000-8000-000000000001").unwrap(),
            name: "TypeScript study".to_string(),
            is_active: true,
            message_count: 3,
            last_activity: 1_704_067_200_000,
            created_at: DateTime::parse_from_rfc3339("2024-01-01T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            updated_at: DateTime::parse_from_rfc3339("2024-01-01T11:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    fn sample_message() -> Message {
        Message {
            user_id: "user001".to_string(),
            session_id: Uuid::parse_str("0190a1b2-c3d4-7000-8000-000000000001").unwrap(),
            id: Uuid::parse_str("0190a1b2-c3d4-7000-8000-000000000002").unwrap(),
            content: "Hello!".to_string(),
            sender: Sender::User,
            timestamp: 1_704_067_200_000,
            created_at: DateTime::parse_from_rfc3339("2024-01-01T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            updated_at: DateTime::parse_from_rfc3339("2024-01-01T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    #[test]
    fn test_session_round_trip() {
        let session = sample_session();
        let item = session_to_item(&session);
        let parsed = item_to_session(&item).unwrap();

        assert_eq!(session, parsed);
    }

    #[test]
    fn test_session_item_has_table_keys() {
        let session = sample_session();
        let item = session_to_item(&session);

        assert_eq!(item.get("userId").unwrap().as_s().unwrap(), "user001");
        assert_eq!(
            item.get("sessionId").unwrap().as_s().unwrap(),
            "0190a1b2-c3d4-7000-8000-000000000001"
        );
        assert_eq!(
            item.get("messageCount").unwrap().as_n().unwrap(),
            "3"
        );
        assert!(*item.get("isActive").unwrap().as_bool().unwrap());
    }

    #[test]
    fn test_message_round_trip() {
        let message = sample_message();
        let item = message_to_item(&message);
        let parsed = item_to_message(&item).unwrap();

        assert_eq!(message, parsed);
    }

    #[test]
    fn test_message_item_sort_key_is_composite() {
        let message = sample_message();
        let item = message_to_item(&message);

        assert_eq!(
            item.get("sessionId").unwrap().as_s().unwrap(),
            "0190a1b2-c3d4-7000-8000-000000000001#0190a1b2-c3d4-7000-8000-000000000002"
        );
        assert_eq!(
            item.get("messageId").unwrap().as_s().unwrap(),
            "0190a1b2-c3d4-7000-8000-000000000002"
        );
        assert_eq!(item.get("sender").unwrap().as_s().unwrap(), "user");
        assert_eq!(
            item.get("timestamp").unwrap().as_n().unwrap(),
            "1704067200000"
        );
    }

    #[test]
    fn test_item_to_message_rejects_plain_sort_key() {
        let message = sample_message();
        let mut item = message_to_item(&message);
        item.insert(
            "sessionId".to_string(),
            AttributeValue::S(message.session_id.to_string()),
        );

        assert!(item_to_message(&item).is_err());
    }

    #[test]
    fn test_parse_sender() {
        assert_eq!(parse_sender("user").unwrap(), Sender::User);
        assert_eq!(parse_sender("ai").unwrap(), Sender::Ai);
        assert!(parse_sender("bot").is_err());
    }

    #[test]
    fn test_get_string_missing_field() {
        let item = HashMap::new();
        assert!(get_string(&item, "missing").is_err());
    }

    #[test]
    fn test_get_number_rejects_non_numeric() {
        let mut item = HashMap::new();
        item.insert(
            "messageCount".to_string(),
            AttributeValue::S("3".to_string()),
        );
        assert!(get_number::<u64>(&item, "messageCount").is_err());
    }
}
