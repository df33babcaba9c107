//! Unified API error handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::api::models::ErrorResponse;
use crate::error::ServiceError;

/// API-specific error type.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Invalid request parameters or body.
    BadRequest(String),
    /// Upstream call failed; the message is shown to the client as-is.
    BadGateway(String),
    /// Internal server error.
    InternalError(String),
    /// Database operation failed.
    DatabaseError(String),
}

impl ApiError {
    /// HTTP status this error maps to.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::BadGateway(_) => StatusCode::BAD_GATEWAY,
            Self::InternalError(_) | Self::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error_type, message) = match self {
            Self::NotFound(msg) => ("not_found", msg),
            Self::BadRequest(msg) => ("bad_request", msg),
            Self::BadGateway(msg) => ("bad_gateway", msg),
            Self::DatabaseError(msg) => {
                error!(error = %msg, "Database error in API handler");
                ("database_error", "Database operation failed".to_string())
            }
            Self::InternalError(msg) => {
                error!(error = %msg, "Internal error in API handler");
                ("internal_error", "Internal server error".to_string())
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::DatabaseError { .. } => Self::DatabaseError(err.to_string()),
            ServiceError::UpstreamError { message, .. } => Self::BadGateway(message),
            _ => Self::InternalError(err.to_string()),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        Self::DatabaseError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_bad_request_keeps_message() {
        let (status, body) = body_json(ApiError::BadRequest("name is required".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad_request");
        assert_eq!(body["message"], "name is required");
    }

    #[tokio::test]
    async fn test_database_error_is_redacted() {
        let (status, body) =
            body_json(ApiError::DatabaseError("password authentication failed".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Database operation failed");
    }

    #[tokio::test]
    async fn test_bad_gateway_surfaces_upstream_text() {
        let (status, body) = body_json(ApiError::BadGateway("connection reset".into())).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["message"], "connection reset");
    }

    #[test]
    fn test_from_service_error() {
        let err: ApiError = ServiceError::database("boom", None).into();
        assert!(matches!(err, ApiError::DatabaseError(_)));

        let err: ApiError = ServiceError::upstream("timed out", None).into();
        assert!(matches!(err, ApiError::BadGateway(ref m) if m == "timed out"));

        let err: ApiError = ServiceError::config("missing", None).into();
        assert!(matches!(err, ApiError::InternalError(_)));
    }
}
