//! catalog-server: HTTP API server for the book catalog service.
//!
//! This crate provides:
//! - REST endpoints for book management under `/api/books`
//! - Idempotent creation keyed by the `Idempotency-Key` header
//! - JSON error responses with stable error codes
//!
//! # Architecture
//!
//! The server is built on Axum with a middleware stack for request
//! tracing and CORS. All creation-correctness logic lives in
//! catalog-store; this layer validates payloads, extracts the
//! idempotency key, and maps errors to HTTP status codes.
//!
//! # Usage
//!
//! ```rust,ignore
//! use catalog_server::{config::ServerConfig, routes, state::AppState};
//!
//! let config = ServerConfig::from_env()?;
//! let app = routes::build_router(state);
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

// Re-exports for convenience
pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use extract::IdempotencyKey;
pub use state::AppState;

// Re-export dependent crates
pub use catalog_core;
pub use catalog_store;
