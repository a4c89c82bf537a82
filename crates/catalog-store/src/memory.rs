//! In-memory backend with the same semantics as the PostgreSQL store.
//!
//! `MemStore` keeps the counter, the ledger, and the book table as
//! separate shared structures, so concurrent callers interleave at the
//! same points as against the database: the counter read and its
//! conditional write are separate critical sections (losers genuinely
//! retry), and the ledger map's entry occupancy plays the role of the
//! primary-key constraint. Used by tests and embeddable where a
//! database is overkill.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};

use catalog_core::Isbn;
use chrono::Utc;
use parking_lot::Mutex;

use crate::error::{StoreError, StoreResult};
use crate::models::{BookRow, IdempotencyKeyRow, IsbnCounterRow};
use crate::store::{COUNTER_ID, MAX_ALLOCATE_ATTEMPTS};

/// Version-tagged counter cell, the in-memory equivalent of the
/// `isbn_counter` row.
#[derive(Debug, Clone, Copy)]
struct CounterCell {
    current_value: i64,
    version: i64,
}

/// In-memory catalog store.
#[derive(Debug)]
pub struct MemStore {
    counter: Mutex<Option<CounterCell>>,
    books: Mutex<BTreeMap<i64, BookRow>>,
    keys: Mutex<HashMap<String, IdempotencyKeyRow>>,
    next_book_id: AtomicI64,
}

impl MemStore {
    /// Create an empty store with the counter bootstrapped at 0.
    pub fn new() -> Self {
        let store = Self {
            counter: Mutex::new(None),
            books: Mutex::new(BTreeMap::new()),
            keys: Mutex::new(HashMap::new()),
            next_book_id: AtomicI64::new(1),
        };
        store.init_counter();
        store
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemStore {

    // ==================== Counter Operations ====================

    /// Create the counter at value 0 if absent. Idempotent; never
    /// resets an existing counter.
    pub fn init_counter(&self) {
        let mut counter = self.counter.lock();
        if counter.is_none() {
            *counter = Some(CounterCell {
                current_value: 0,
                version: 0,
            });
        }
    }

    /// Read the current counter state.
    pub fn read_counter(&self) -> StoreResult<IsbnCounterRow> {
        let guard = self.counter.lock();
        let cell = (*guard).ok_or_else(|| {
            StoreError::Config("counter cell missing; was init_counter skipped?".to_string())
        })?;
        Ok(IsbnCounterRow {
            id: COUNTER_ID,
            current_value: cell.current_value,
            version: cell.version,
        })
    }

    /// Conditional write: succeeds only if the version still matches.
    fn try_advance_counter(&self, next_value: i64, version: i64) -> StoreResult<bool> {
        let mut counter = self.counter.lock();
        let cell = counter.as_mut().ok_or_else(|| {
            StoreError::Config("counter cell missing; was init_counter skipped?".to_string())
        })?;
        if cell.version != version {
            return Ok(false);
        }
        cell.current_value = next_value;
        cell.version += 1;
        Ok(true)
    }

    /// Allocate the next sequence value.
    ///
    /// Same read-compute-conditional-write cycle as the database
    /// store; the lock is released between the read and the write, so
    /// concurrent allocators race on the version and retry.
    pub fn allocate_next(&self) -> StoreResult<u64> {
        for attempt in 1..=MAX_ALLOCATE_ATTEMPTS {
            let counter = self.read_counter()?;
            let next_value = counter.current_value + 1;

            if self.try_advance_counter(next_value, counter.version)? {
                return Ok(next_value as u64);
            }

            tracing::trace!(attempt, "in-memory counter conflict, retrying");
        }

        Err(StoreError::CounterContention {
            attempts: MAX_ALLOCATE_ATTEMPTS,
        })
    }

    // ==================== Ledger Operations ====================

    /// Look up an idempotency key. No side effects.
    pub fn lookup_idempotency_key(&self, key: &str) -> Option<IdempotencyKeyRow> {
        self.keys.lock().get(key).cloned()
    }

    /// Record a ledger entry. Entries are write-once: a key recorded
    /// by a concurrent writer fails distinguishably instead of being
    /// overwritten.
    pub fn insert_idempotency_key(&self, key: &str, book_id: i64) -> StoreResult<()> {
        let mut keys = self.keys.lock();
        match keys.entry(key.to_string()) {
            Entry::Occupied(_) => Err(StoreError::KeyAlreadyExists(key.to_string())),
            Entry::Vacant(vacant) => {
                vacant.insert(IdempotencyKeyRow {
                    key: key.to_string(),
                    book_id,
                    created: Utc::now(),
                });
                Ok(())
            }
        }
    }

    // ==================== Book Operations ====================

    /// Get a book by ID.
    pub fn get_book(&self, id: i64) -> StoreResult<BookRow> {
        self.books
            .lock()
            .get(&id)
            .cloned()
            .ok_or(StoreError::BookNotFound(id))
    }

    /// List all books, oldest first.
    pub fn list_books(&self) -> Vec<BookRow> {
        self.books.lock().values().cloned().collect()
    }

    /// Update a book's title and author. The ISBN is immutable.
    pub fn update_book(&self, id: i64, title: &str, author: &str) -> StoreResult<BookRow> {
        let mut books = self.books.lock();
        let row = books.get_mut(&id).ok_or(StoreError::BookNotFound(id))?;
        row.title = title.to_string();
        row.author = author.to_string();
        Ok(row.clone())
    }

    /// Delete a book. Ledger entries referencing it are left behind.
    pub fn delete_book(&self, id: i64) -> StoreResult<()> {
        if self.books.lock().remove(&id).is_none() {
            return Err(StoreError::BookNotFound(id));
        }
        Ok(())
    }

    // ==================== Idempotent Creation ====================

    /// Create a book exactly once for the given idempotency key.
    ///
    /// Mirrors [`crate::Store::create_book`]: lookup, allocate, insert
    /// the book, publish the ledger entry. Where the database rolls
    /// back its transaction on a raced key, this backend withdraws the
    /// just-inserted book before returning the winner's record, so no
    /// caller ever observes two books for one key.
    pub fn create_book(&self, title: &str, author: &str, key: &str) -> StoreResult<BookRow> {
        if let Some(entry) = self.lookup_idempotency_key(key) {
            return self.dereference_entry(entry);
        }

        let sequence = self.allocate_next()?;
        let isbn = Isbn::from_sequence(sequence)?;

        let id = self.next_book_id.fetch_add(1, Ordering::Relaxed);
        let row = BookRow {
            id,
            title: title.to_string(),
            author: author.to_string(),
            isbn: isbn.as_str().to_string(),
            created: Utc::now(),
        };
        self.books.lock().insert(id, row.clone());

        match self.insert_idempotency_key(key, id) {
            Ok(()) => Ok(row),
            Err(StoreError::KeyAlreadyExists(_)) => {
                // Lost the ledger race: withdraw our book, return theirs.
                self.books.lock().remove(&id);
                tracing::trace!(key, "idempotent create raced, returning winner's book");

                // Entries are never deleted, so the winner's entry is
                // still there.
                let entry =
                    self.lookup_idempotency_key(key)
                        .ok_or_else(|| StoreError::LedgerCorrupted {
                            key: key.to_string(),
                            reason: "entry vanished after duplicate-insert conflict".to_string(),
                        })?;
                self.dereference_entry(entry)
            }
            Err(e) => Err(e),
        }
    }

    fn dereference_entry(&self, entry: IdempotencyKeyRow) -> StoreResult<BookRow> {
        match self.get_book(entry.book_id) {
            Ok(row) => Ok(row),
            Err(StoreError::BookNotFound(id)) => {
                Err(StoreError::corrupted_missing_book(&entry.key, id))
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_starts_at_zero_and_allocates_sequentially() {
        let store = MemStore::new();
        assert_eq!(store.read_counter().unwrap().current_value, 0);
        assert_eq!(store.allocate_next().unwrap(), 1);
        assert_eq!(store.allocate_next().unwrap(), 2);
    }

    #[test]
    fn init_counter_is_idempotent() {
        let store = MemStore::new();
        store.allocate_next().unwrap();
        store.init_counter();
        // Re-initialization must not reset the value.
        assert_eq!(store.allocate_next().unwrap(), 2);
    }

    #[test]
    fn conditional_write_rejects_stale_version() {
        let store = MemStore::new();
        let before = store.read_counter().unwrap();

        // Another allocation bumps the version.
        store.allocate_next().unwrap();

        assert!(!store
            .try_advance_counter(before.current_value + 1, before.version)
            .unwrap());
        // The stale write left no trace.
        assert_eq!(store.read_counter().unwrap().current_value, 1);
    }

    #[test]
    fn ledger_entries_are_write_once() {
        let store = MemStore::new();
        store.insert_idempotency_key("k1", 7).unwrap();

        let err = store.insert_idempotency_key("k1", 8).unwrap_err();
        assert!(matches!(err, StoreError::KeyAlreadyExists(_)));
        // The original entry is untouched.
        assert_eq!(store.lookup_idempotency_key("k1").unwrap().book_id, 7);
    }

    #[test]
    fn create_assigns_isbn_from_sequence() {
        let store = MemStore::new();
        let book = store.create_book("Effective Java", "Joshua Bloch", "k1").unwrap();
        assert_eq!(book.isbn, "9780000000019");

        let second = store.create_book("Domain Modeling", "Scott Wlaschin", "k2").unwrap();
        assert_eq!(second.isbn, "9780000000026");
    }

    #[test]
    fn replay_returns_stored_book_without_new_allocation() {
        let store = MemStore::new();
        let first = store.create_book("Effective Java", "Joshua Bloch", "k1").unwrap();

        // Same key, different payload: the original record wins.
        let replay = store.create_book("Other Title", "Other Author", "k1").unwrap();
        assert_eq!(replay, first);
        assert_eq!(store.list_books().len(), 1);
        assert_eq!(store.read_counter().unwrap().current_value, 1);
    }

    #[test]
    fn corruption_is_surfaced_not_recovered() {
        let store = MemStore::new();
        let book = store.create_book("Effective Java", "Joshua Bloch", "k1").unwrap();

        // External delete path removes the book; the ledger entry stays.
        store.delete_book(book.id).unwrap();

        let err = store.create_book("Effective Java", "Joshua Bloch", "k1").unwrap_err();
        assert!(matches!(err, StoreError::LedgerCorrupted { .. }));
    }

    #[test]
    fn crud_round_trip() {
        let store = MemStore::new();
        let book = store.create_book("Effective Java", "Joshua Bloch", "k1").unwrap();

        let updated = store.update_book(book.id, "Effective Java, 3rd", "Joshua Bloch").unwrap();
        assert_eq!(updated.title, "Effective Java, 3rd");
        assert_eq!(updated.isbn, book.isbn);

        store.delete_book(book.id).unwrap();
        assert!(matches!(store.get_book(book.id), Err(StoreError::BookNotFound(_))));
        assert!(matches!(store.delete_book(book.id), Err(StoreError::BookNotFound(_))));
    }
}
