//! Error types for the local store.
//!
//! Every store operation returns [`StoreError`] so callers can match on the
//! failure kind instead of parsing messages.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Lookup by id or by credentials found nothing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique field already taken (email on register).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Operation rejected by the current state of the record.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// No `currentUser` record in the namespace.
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<lmdb::Error> for StoreError {
    fn from(err: lmdb::Error) -> Self {
        StoreError::Storage(format!("LMDB error: {err}"))
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Storage(format!("IO error: {err}"))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
