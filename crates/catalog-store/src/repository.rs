//! Repository layer providing domain-typed interfaces to the storage
//! layer.
//!
//! Wraps the raw `Store` operations with catalog-core types: validated
//! drafts in, `Book` values out. Stored ISBNs are re-validated on the
//! way out, so a corrupted column value surfaces instead of leaking.

use catalog_core::{Book, BookDraft, BookId, Isbn};

use crate::Store;
use crate::error::StoreResult;
use crate::models::BookRow;

/// Repository providing domain-typed access to the store.
#[derive(Debug, Clone)]
pub struct Repository {
    store: Store,
}

impl Repository {
    /// Create a new repository wrapping the given store.
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Get reference to the underlying store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Create a book exactly once for the given idempotency key.
    ///
    /// See [`Store::create_book`] for the concurrency contract.
    pub async fn create_book(&self, draft: &BookDraft, key: &str) -> StoreResult<Book> {
        let row = self
            .store
            .create_book(draft.title(), draft.author(), key)
            .await?;
        row_to_book(row)
    }

    /// Get a book by its ID.
    pub async fn get_book(&self, id: BookId) -> StoreResult<Book> {
        let row = self.store.get_book(id.as_i64()).await?;
        row_to_book(row)
    }

    /// List all books, oldest first.
    pub async fn list_books(&self) -> StoreResult<Vec<Book>> {
        let rows = self.store.list_books().await?;
        rows.into_iter().map(row_to_book).collect()
    }

    /// Update a book's title and author. The ISBN never changes.
    pub async fn update_book(&self, id: BookId, draft: &BookDraft) -> StoreResult<Book> {
        let row = self
            .store
            .update_book(id.as_i64(), draft.title(), draft.author())
            .await?;
        row_to_book(row)
    }

    /// Delete a book.
    pub async fn delete_book(&self, id: BookId) -> StoreResult<()> {
        self.store.delete_book(id.as_i64()).await
    }
}

/// Convert a database row to a domain Book, re-validating the ISBN.
fn row_to_book(row: BookRow) -> StoreResult<Book> {
    let isbn = Isbn::parse(row.isbn.trim())?;
    Ok(Book {
        id: BookId::from_i64(row.id),
        title: row.title,
        author: row.author,
        isbn,
        created: row.created,
    })
}
