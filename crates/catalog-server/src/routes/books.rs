//! Book management routes.
//!
//! This module implements the book HTTP endpoints:
//! - POST /api/books - Idempotent creation (requires `Idempotency-Key`)
//! - GET /api/books - List all books
//! - GET /api/books/{id} - Fetch a single book
//! - PUT /api/books/{id} - Update title/author
//! - DELETE /api/books/{id} - Delete a book

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use catalog_core::{Book, BookDraft, BookId};

use crate::error::ApiResult;
use crate::extract::IdempotencyKey;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for POST and PUT.
#[derive(Debug, Deserialize)]
pub struct BookPayload {
    /// Book title (non-blank, at most 100 characters).
    pub title: String,
    /// Author name (non-blank, at most 50 characters).
    pub author: String,
}

impl BookPayload {
    fn into_draft(self) -> Result<BookDraft, catalog_core::ValidationError> {
        BookDraft::new(self.title, self.author)
    }
}

/// A book in API responses.
#[derive(Debug, Serialize)]
pub struct BookResponse {
    /// Book ID.
    pub id: i64,
    /// Book title.
    pub title: String,
    /// Author name.
    pub author: String,
    /// Assigned ISBN-13.
    pub isbn: String,
    /// Creation timestamp.
    pub created: DateTime<Utc>,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id.as_i64(),
            title: book.title,
            author: book.author,
            isbn: book.isbn.as_str().to_string(),
            created: book.created,
        }
    }
}

/// Response for GET /api/books.
#[derive(Debug, Serialize)]
pub struct ListBooksResponse {
    pub books: Vec<BookResponse>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /api/books - Create a book idempotently.
///
/// The `Idempotency-Key` header is required; a replayed key returns
/// the originally created book with the same 201 response, regardless
/// of the replayed payload.
///
/// # Response
///
/// - 201 Created: the book (fresh or replayed)
/// - 400 Bad Request: missing/blank header or invalid payload
/// - 500 Internal Server Error: storage failure or ledger corruption
async fn create_book(
    State(state): State<AppState>,
    key: IdempotencyKey,
    Json(payload): Json<BookPayload>,
) -> ApiResult<(StatusCode, Json<BookResponse>)> {
    let draft = payload.into_draft()?;

    let book = state.repository().create_book(&draft, key.as_str()).await?;

    tracing::info!(book_id = book.id.as_i64(), isbn = %book.isbn, "create handled");
    Ok((StatusCode::CREATED, Json(book.into())))
}

/// GET /api/books - List all books.
async fn list_books(State(state): State<AppState>) -> ApiResult<Json<ListBooksResponse>> {
    let books = state.repository().list_books().await?;

    Ok(Json(ListBooksResponse {
        books: books.into_iter().map(Into::into).collect(),
    }))
}

/// GET /api/books/{id} - Fetch a single book.
///
/// # Response
///
/// - 200 OK: the book
/// - 404 Not Found: no such book
async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<BookResponse>> {
    let book = state.repository().get_book(BookId::from_i64(id)).await?;
    Ok(Json(book.into()))
}

/// PUT /api/books/{id} - Update a book's title and author.
///
/// The ISBN is immutable and absent from the payload.
///
/// # Response
///
/// - 200 OK: the updated book
/// - 400 Bad Request: invalid payload
/// - 404 Not Found: no such book
async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<BookPayload>,
) -> ApiResult<Json<BookResponse>> {
    let draft = payload.into_draft()?;

    let book = state
        .repository()
        .update_book(BookId::from_i64(id), &draft)
        .await?;

    tracing::info!(book_id = id, "book updated");
    Ok(Json(book.into()))
}

/// DELETE /api/books/{id} - Delete a book.
///
/// # Response
///
/// - 204 No Content: deleted
/// - 404 Not Found: no such book
async fn delete_book(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    state.repository().delete_book(BookId::from_i64(id)).await?;

    tracing::info!(book_id = id, "book deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Build book routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/books", get(list_books).post(create_book))
        .route(
            "/api/books/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::Isbn;

    #[test]
    fn test_payload_deserialize() {
        let json = r#"{"title": "Effective Java", "author": "Joshua Bloch"}"#;
        let payload: BookPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.title, "Effective Java");
        assert_eq!(payload.author, "Joshua Bloch");
    }

    #[test]
    fn test_payload_validation() {
        let payload: BookPayload =
            serde_json::from_str(r#"{"title": "", "author": "Joshua Bloch"}"#).unwrap();
        assert!(payload.into_draft().is_err());
    }

    #[test]
    fn test_book_response_from_domain() {
        let book = Book {
            id: BookId::from_i64(1),
            title: "Effective Java".to_string(),
            author: "Joshua Bloch".to_string(),
            isbn: Isbn::from_sequence(1).unwrap(),
            created: Utc::now(),
        };
        let response = BookResponse::from(book);
        assert_eq!(response.id, 1);
        assert_eq!(response.isbn, "9780000000019");

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"isbn\":\"9780000000019\""));
        assert!(json.contains("Effective Java"));
    }

    #[test]
    fn test_list_response_serialize() {
        let response = ListBooksResponse { books: Vec::new() };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"books":[]}"#);
    }
}
