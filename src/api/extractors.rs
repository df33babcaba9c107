//! Custom extractors for API parameters.

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use crate::api::middleware::error::ApiError;

/// Extracts the `{id}` path segment as an integer.
///
/// Anything that does not parse as an integer is rejected with 400.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub i64);

#[axum::async_trait]
impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;

        parse_user_id(&raw).map(Self)
    }
}

/// Parses a user id, rejecting non-integer input.
///
/// # Errors
///
/// Returns [`ApiError::BadRequest`] when `raw` is not an integer.
pub fn parse_user_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::BadRequest("invalid id format, must be an integer".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_id() {
        assert_eq!(parse_user_id("42").unwrap(), 42);
        assert_eq!(parse_user_id("-3").unwrap(), -3);
        assert!(matches!(parse_user_id("abc"), Err(ApiError::BadRequest(_))));
        assert!(matches!(parse_user_id("1.5"), Err(ApiError::BadRequest(_))));
        assert!(matches!(parse_user_id(""), Err(ApiError::BadRequest(_))));
    }
}
