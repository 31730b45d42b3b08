//! DynamoDB-backed session and chat-history store.
//!
//! The `storage` module implements the repository traits from
//! `chatstore_core::storage` against the `ChatHistory` and `UserSessions`
//! tables. The `schema` module declares those tables and manages their
//! lifecycle (create, delete, list, seed).

pub mod output;
pub mod schema;
pub mod storage;
