//! Book records and validated creation drafts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::isbn::Isbn;

/// Maximum length of a book title, in characters.
pub const TITLE_MAX_LEN: usize = 100;

/// Maximum length of an author name, in characters.
pub const AUTHOR_MAX_LEN: usize = 50;

/// Unique identifier for a book record.
///
/// Wraps the storage-assigned integer id, providing type safety to
/// distinguish book ids from other integers in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(pub i64);

impl BookId {
    /// Creates a BookId from a raw storage id.
    #[must_use]
    pub const fn from_i64(id: i64) -> Self {
        Self(id)
    }

    /// Returns the inner integer id.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BookId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// A catalogued book.
///
/// The ISBN is assigned exactly once at creation and is immutable
/// thereafter; title and author may change through update operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Storage-assigned identifier.
    pub id: BookId,
    /// Book title.
    pub title: String,
    /// Author name.
    pub author: String,
    /// Generated ISBN-13, globally unique.
    pub isbn: Isbn,
    /// When the record was created.
    pub created: DateTime<Utc>,
}

/// Validation failures for a creation or update payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is empty or whitespace-only.
    #[error("{field} must not be blank")]
    Blank { field: &'static str },

    /// A field exceeds its maximum length.
    #[error("{field} must be at most {max} characters, got {len}")]
    TooLong {
        field: &'static str,
        max: usize,
        len: usize,
    },
}

/// A validated request to create or update a book.
///
/// Construction enforces the field constraints (non-blank title up to
/// [`TITLE_MAX_LEN`] characters, non-blank author up to
/// [`AUTHOR_MAX_LEN`]), so downstream code can rely on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    title: String,
    author: String,
}

impl BookDraft {
    /// Validate a title/author pair into a draft.
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Result<Self, ValidationError> {
        let title = title.into();
        let author = author.into();

        validate_field("title", &title, TITLE_MAX_LEN)?;
        validate_field("author", &author, AUTHOR_MAX_LEN)?;

        Ok(Self { title, author })
    }

    /// The validated title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The validated author name.
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }
}

fn validate_field(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank { field });
    }
    let len = value.chars().count();
    if len > max {
        return Err(ValidationError::TooLong { field, max, len });
    }
    Ok(())
}
