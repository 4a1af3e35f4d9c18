//! Error types for the storage layer.

use thiserror::Error;

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in storage operations.
///
/// `NotFound` is an answer, every other variant is a failure of the store
/// itself. Callers must not treat one as the other.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// No account with this ID.
    #[error("account not found: {0}")]
    NotFound(String),

    /// An account with this ID already exists.
    #[error("account already exists: {0}")]
    AlreadyExists(String),

    /// The backend could not run the operation (worker task died, lock poisoned).
    #[error("store backend error: {0}")]
    Backend(String),

    /// A stored value could not be decoded.
    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl StoreError {
    /// Returns true for the "no such account" answer.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
