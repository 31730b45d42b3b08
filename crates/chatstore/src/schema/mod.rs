//! Table schema management for the chatstore DynamoDB tables.
//!
//! Declares the `ChatHistory` and `UserSessions` table shapes and provides
//! the lifecycle operations the setup binary is built from: create, delete,
//! list, readiness polling, and sample-data seeding.

mod client;
mod config;
mod deploy;
mod error;
mod seed;

pub use client::{create_client, get_table_state, StoreConfig, TableState, TableStatus};
pub use config::{
    chat_history_table, user_sessions_table, AttributeType, GsiConfig, KeyAttribute, TableConfig,
    TableNames,
};
pub use deploy::{
    create_table, delete_table, list_tables, wait_for_table_active, wait_for_table_deleted,
};
pub use error::{Result, SchemaError};
pub use seed::{insert_sample_data, sample_messages, sample_sessions, SAMPLE_USER_ID};
