//! Idempotency key extraction from the `Idempotency-Key` header.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;

/// Header carrying the client-supplied idempotency key.
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// Extracts the idempotency key for creation requests.
///
/// The key is opaque to the server; the only requirements are that the
/// header is present, valid ASCII, and not blank. A missing or blank
/// header is a client error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdempotencyKey(pub String);

impl IdempotencyKey {
    /// The key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for IdempotencyKey
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(IDEMPOTENCY_KEY_HEADER) else {
            return Err(ApiError::BadRequest(format!(
                "Missing {IDEMPOTENCY_KEY_HEADER} header"
            )));
        };

        let key = value.to_str().map_err(|_| {
            ApiError::BadRequest(format!(
                "{IDEMPOTENCY_KEY_HEADER} header contains invalid characters"
            ))
        })?;

        let key = key.trim();
        if key.is_empty() {
            return Err(ApiError::BadRequest(format!(
                "{IDEMPOTENCY_KEY_HEADER} header must not be blank"
            )));
        }

        Ok(Self(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<IdempotencyKey, ApiError> {
        let (mut parts, ()) = request.into_parts();
        IdempotencyKey::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_present_key() {
        let request = Request::builder()
            .header(IDEMPOTENCY_KEY_HEADER, "client-key-1")
            .body(())
            .unwrap();
        let key = extract(request).await.unwrap();
        assert_eq!(key.as_str(), "client-key-1");
    }

    #[tokio::test]
    async fn test_missing_key_is_bad_request() {
        let request = Request::builder().body(()).unwrap();
        let err = extract(request).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_blank_key_is_bad_request() {
        let request = Request::builder()
            .header(IDEMPOTENCY_KEY_HEADER, "   ")
            .body(())
            .unwrap();
        let err = extract(request).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_key_is_trimmed() {
        let request = Request::builder()
            .header(IDEMPOTENCY_KEY_HEADER, "  spaced-key  ")
            .body(())
            .unwrap();
        let key = extract(request).await.unwrap();
        assert_eq!(key.as_str(), "spaced-key");
    }
}
