//! catalog-core: Domain types for the book catalog service.
//!
//! This crate provides:
//! - The `Isbn` value type and the ISBN-13 check digit rules
//! - Book records and validated creation drafts
//!
//! Everything here is pure computation. Allocation of ISBN sequence
//! values and persistence live in `catalog-store`.

pub mod isbn;
pub mod types;

pub use isbn::{Isbn, IsbnError, ISBN_PREFIX, MAX_SEQUENCE};
pub use types::{Book, BookDraft, BookId, ValidationError, AUTHOR_MAX_LEN, TITLE_MAX_LEN};
