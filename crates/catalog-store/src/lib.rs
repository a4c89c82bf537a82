//! catalog-store: Storage layer for the book catalog service.
//!
//! This crate provides:
//! - PostgreSQL storage for books, the idempotency ledger, and the
//!   ISBN sequence counter
//! - The idempotent creation path: exactly one book per idempotency
//!   key, no matter how often or how concurrently a key is submitted
//! - Migration management
//! - An in-memory backend with the same semantics for tests and
//!   embedded use
//!
//! # Concurrency
//!
//! The ISBN counter is a singleton row advanced with a version-checked
//! conditional update; losers of the race retry with a bounded budget.
//! The ledger's only serialization mechanism is the primary key on the
//! idempotency key: a racing duplicate insert is detected, rolled
//! back, and resolved to the winner's record.
//!
//! # Usage
//!
//! ```rust,ignore
//! use catalog_store::{Repository, Store, StoreConfig};
//!
//! let config = StoreConfig::from_env()?;
//! let store = Store::connect(config).await?;
//! let repository = Repository::new(store);
//!
//! let book = repository.create_book(&draft, "client-key-1").await?;
//! ```

pub mod error;
pub mod memory;
pub mod models;
pub mod repository;
pub mod schema;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemStore;
pub use models::{BookRow, IdempotencyKeyRow, IsbnCounterRow, NewBook};
pub use repository::Repository;
pub use store::{Store, StoreConfig, COUNTER_ID, MAX_ALLOCATE_ATTEMPTS};

// Re-export catalog-core for downstream crates
pub use catalog_core;
