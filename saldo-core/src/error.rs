//! Error types for the public API.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SaldoError {
    /// A field failed validation. Raised before any mutation takes place.
    #[error("validation failed: {0}")]
    Invalid(&'static str),

    /// No debt with the given id. Only `update` raises this; the
    /// state-toggle and delete commands treat a missing id as a no-op.
    #[error("no debt with id {0}")]
    NotFound(i64),

    /// Ledger index out of range on an explicit edit.
    #[error("no entry at index {0}")]
    BadIndex(usize),

    /// The durable store failed. The in-memory mutation has already been
    /// applied when this is returned; the session state stays
    /// authoritative and the caller should surface this as a warning.
    #[error("storage: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SaldoError>;
