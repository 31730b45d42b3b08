//! Error types for schema management operations.

use thiserror::Error;

/// Result type alias for the schema module.
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Errors that can occur during schema management operations.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("AWS SDK error: {0}")]
    AwsSdk(String),

    #[error("Table '{table_name}' not found")]
    TableNotFound { table_name: String },

    #[error("Timeout waiting for table '{table_name}' to become active")]
    TableActivationTimeout { table_name: String },

    #[error("Timeout waiting for table '{table_name}' to be deleted")]
    TableDeletionTimeout { table_name: String },
}
