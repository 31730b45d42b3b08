//! DynamoDB storage backend implementation.
//!
//! Implements the repository traits from `chatstore_core::storage` using
//! `aws-sdk-dynamodb` against the `ChatHistory` and `UserSessions` tables.

pub(crate) mod conversions;
mod error;
mod keys;
mod repository;

pub use repository::DynamoDbRepository;
