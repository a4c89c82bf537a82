//! Error types for the storage layer.

use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database connection or statement error.
    #[error("database error: {0}")]
    Connection(#[from] sqlx::Error),

    /// Book not found.
    #[error("book not found: {0}")]
    BookNotFound(i64),

    /// The version-checked counter update kept losing to concurrent
    /// writers and the retry budget ran out.
    #[error("isbn counter contention: conditional update failed after {attempts} attempts")]
    CounterContention { attempts: u32 },

    /// An idempotency key was inserted by a concurrent writer between
    /// this writer's lookup and insert. Resolved internally by the
    /// creation path; callers only see it if they insert ledger
    /// entries directly.
    #[error("idempotency key already recorded: {0}")]
    KeyAlreadyExists(String),

    /// The ledger and the book store have diverged. Always surfaced,
    /// never silently recovered.
    #[error("idempotency ledger corrupted for key {key}: {reason}")]
    LedgerCorrupted { key: String, reason: String },

    /// ISBN construction or validation failure, including an exhausted
    /// sequence range.
    #[error(transparent)]
    Isbn(#[from] catalog_core::IsbnError),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Build the corruption error for a ledger entry whose book is gone.
    pub(crate) fn corrupted_missing_book(key: &str, book_id: i64) -> Self {
        Self::LedgerCorrupted {
            key: key.to_string(),
            reason: format!("entry references missing book {book_id}"),
        }
    }
}
