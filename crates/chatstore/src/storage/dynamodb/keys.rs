//! Sort-key composition for the `ChatHistory` table.
//!
//! The table's sort attribute is named `sessionId` but holds the composite
//! `<session_id>#<message_id>`, so all messages of a session share a key
//! prefix and sort by message id within it. Message ids are UUID v7, which
//! makes ascending key order match insertion order.

use uuid::Uuid;

/// Separator between the session id and the message id in the sort key.
pub const KEY_SEPARATOR: char = '#';

/// Sort key for a message.
///
/// Pattern: `<session_id>#<message_id>`
pub fn message_sort_key(session_id: Uuid, message_id: Uuid) -> String {
    format!("{session_id}{KEY_SEPARATOR}{message_id}")
}

/// Prefix matching every message of a session.
///
/// Pattern: `<session_id>#`
pub fn message_sort_key_prefix(session_id: Uuid) -> String {
    format!("{session_id}{KEY_SEPARATOR}")
}

/// Splits a stored sort key back into session and message ids.
pub fn parse_message_sort_key(key: &str) -> Option<(Uuid, Uuid)> {
    let (session, message) = key.split_once(KEY_SEPARATOR)?;
    let session_id = Uuid::parse_str(session).ok()?;
    let message_id = Uuid::parse_str(message).ok()?;
    Some((session_id, message_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SESSION: &str = "0190a1b2-c3d4-7000-8000-000000000001";
    const MESSAGE: &str = "0190a1b2-c3d4-7000-8000-000000000002";

    #[test]
    fn test_message_sort_key() {
        let session_id = Uuid::parse_str(SESSION).unwrap();
        let message_id = Uuid::parse_str(MESSAGE).unwrap();
        assert_eq!(
            message_sort_key(session_id, message_id),
            format!("{SESSION}#{MESSAGE}")
        );
    }

    #[test]
    fn test_message_sort_key_prefix_matches_key() {
        let session_id = Uuid::parse_str(SESSION).unwrap();
        let message_id = Uuid::parse_str(MESSAGE).unwrap();
        let key = message_sort_key(session_id, message_id);
        assert!(key.starts_with(&message_sort_key_prefix(session_id)));
    }

    #[test]
    fn test_parse_message_sort_key_round_trip() {
        let session_id = Uuid::parse_str(SESSION).unwrap();
        let message_id = Uuid::parse_str(MESSAGE).unwrap();
        let key = message_sort_key(session_id, message_id);
        assert_eq!(parse_message_sort_key(&key), Some((session_id, message_id)));
    }

    #[test]
    fn test_parse_message_sort_key_rejects_garbage() {
        assert_eq!(parse_message_sort_key("no-separator"), None);
        assert_eq!(parse_message_sort_key("not-a-uuid#also-not"), None);
    }
}
