//! # Store Error Types
//!
//! Error types for the indexed store and the repositories built on it.
//!
//! Storage failures are surfaced to callers unchanged and never retried
//! here; retry policy, if any, belongs to callers.

use thiserror::Error;

/// Storage operation failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying store rejected or failed an operation.
    #[error("storage backend error: {0}")]
    Backend(#[from] redb::Error),

    /// An entity record could not be encoded or decoded.
    #[error("record codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// An index entry references a key that cannot be interpreted or an
    /// entity record that is gone.
    #[error("corrupted index entry: {0}")]
    CorruptIndex(String),
}

// redb reports each transaction phase with its own error type; they all
// funnel into the backend kind.

impl From<redb::DatabaseError> for StoreError {
    fn from(err: redb::DatabaseError) -> Self {
        StoreError::Backend(err.into())
    }
}

impl From<redb::TransactionError> for StoreError {
    fn from(err: redb::TransactionError) -> Self {
        StoreError::Backend(err.into())
    }
}

impl From<redb::TableError> for StoreError {
    fn from(err: redb::TableError) -> Self {
        StoreError::Backend(err.into())
    }
}

impl From<redb::StorageError> for StoreError {
    fn from(err: redb::StorageError) -> Self {
        StoreError::Backend(err.into())
    }
}

impl From<redb::CommitError> for StoreError {
    fn from(err: redb::CommitError) -> Self {
        StoreError::Backend(err.into())
    }
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;
