//! Database models for the storage layer.
//!
//! These types map directly to database rows and are used for sqlx
//! queries. They are separate from the domain types in catalog-core so
//! the storage layout can evolve independently; `Repository` owns the
//! conversions.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row for the `books` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct BookRow {
    pub id: i64,
    pub title: String,
    pub author: String,
    /// 13-character ISBN as stored; validated on conversion to the
    /// domain type.
    pub isbn: String,
    pub created: DateTime<Utc>,
}

/// Database row for the `idempotency_keys` table.
///
/// Written once per key, never mutated, never deleted.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct IdempotencyKeyRow {
    pub key: String,
    pub book_id: i64,
    pub created: DateTime<Utc>,
}

/// Database row for the `isbn_counter` singleton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct IsbnCounterRow {
    pub id: i64,
    pub current_value: i64,
    pub version: i64,
}

/// Input for creating a new book.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
}

impl NewBook {
    pub fn new(title: impl Into<String>, author: impl Into<String>, isbn: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
        }
    }
}
