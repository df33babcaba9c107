//! Error types for the users/quote API service.
//!
//! This module provides a unified error type [`ServiceError`] covering the
//! failures that can happen outside of a single request: loading
//! configuration, opening the store, talking to the upstream quote API and
//! running the HTTP server.
//!
//! # Design
//!
//! The error hierarchy is organized by layer:
//! - [`ServiceError::ConfigError`]: Configuration and environment issues
//! - [`ServiceError::DatabaseError`]: Store connection, schema and query errors
//! - [`ServiceError::UpstreamError`]: Quote API network and decoding errors
//! - [`ServiceError::ServerError`]: Listener and serving errors
//!
//! Per-request failures are mapped onto HTTP statuses by
//! [`ApiError`](crate::api::middleware::error::ApiError).
//!
//! # Example
//!
//! ```
//! use coin_users_api::error::{ServiceError, ServiceResult};
//!
//! fn require_port(port: u16) -> ServiceResult<u16> {
//!     if port == 0 {
//!         return Err(ServiceError::config("PORT cannot be zero", None));
//!     }
//!     Ok(port)
//! }
//! ```

use std::fmt;

/// Boxed source error carried by [`ServiceError`] variants.
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Result type alias using [`ServiceError`].
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Unified error type for the service.
#[derive(Debug)]
pub enum ServiceError {
    /// Configuration or environment variable errors.
    ///
    /// Variants include:
    /// - Missing `DATABASE_URL`
    /// - Non-numeric `PORT`
    ConfigError {
        /// Human-readable error message
        message: String,
        /// Optional underlying error
        source: Option<BoxedSource>,
    },

    /// Store errors.
    ///
    /// Variants include:
    /// - Unparsable or unsupported connection string
    /// - Readiness poll exhausted
    /// - Table creation or query failures
    DatabaseError {
        /// Human-readable error message
        message: String,
        /// Optional underlying error
        source: Option<BoxedSource>,
    },

    /// Upstream quote API errors.
    UpstreamError {
        /// Human-readable error message
        message: String,
        /// Optional underlying error
        source: Option<BoxedSource>,
    },

    /// HTTP server errors (bind, accept, serve).
    ServerError {
        /// Human-readable error message
        message: String,
        /// Optional underlying error
        source: Option<BoxedSource>,
    },
}

impl ServiceError {
    /// Create a new configuration error.
    ///
    /// # Example
    ///
    /// ```
    /// use coin_users_api::error::ServiceError;
    ///
    /// let err = ServiceError::config("DATABASE_URL not set", None);
    /// assert!(matches!(err, ServiceError::ConfigError { .. }));
    /// ```
    #[must_use]
    pub fn config(message: impl Into<String>, source: Option<BoxedSource>) -> Self {
        Self::ConfigError {
            message: message.into(),
            source,
        }
    }

    /// Create a new database error.
    ///
    /// # Example
    ///
    /// ```
    /// use coin_users_api::error::ServiceError;
    ///
    /// let err = ServiceError::database("Connection refused", None);
    /// assert!(matches!(err, ServiceError::DatabaseError { .. }));
    /// ```
    #[must_use]
    pub fn database(message: impl Into<String>, source: Option<BoxedSource>) -> Self {
        Self::DatabaseError {
            message: message.into(),
            source,
        }
    }

    /// Create a new upstream error.
    #[must_use]
    pub fn upstream(message: impl Into<String>, source: Option<BoxedSource>) -> Self {
        Self::UpstreamError {
            message: message.into(),
            source,
        }
    }

    /// Create a new server error.
    #[must_use]
    pub fn server(message: impl Into<String>, source: Option<BoxedSource>) -> Self {
        Self::ServerError {
            message: message.into(),
            source,
        }
    }

    /// The bare message without the layer prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::ConfigError { message, .. }
            | Self::DatabaseError { message, .. }
            | Self::UpstreamError { message, .. }
            | Self::ServerError { message, .. } => message,
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigError { message, .. } => write!(f, "Configuration error: {message}"),
            Self::DatabaseError { message, .. } => write!(f, "Database error: {message}"),
            Self::UpstreamError { message, .. } => write!(f, "Upstream error: {message}"),
            Self::ServerError { message, .. } => write!(f, "Server error: {message}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConfigError { source, .. }
            | Self::DatabaseError { source, .. }
            | Self::UpstreamError { source, .. }
            | Self::ServerError { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &dyn std::error::Error),
        }
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        Self::DatabaseError {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_config_error() {
        let err = ServiceError::config("test error", None);
        assert!(matches!(err, ServiceError::ConfigError { .. }));
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_database_error() {
        let err = ServiceError::database("connection refused", None);
        assert!(matches!(err, ServiceError::DatabaseError { .. }));
        assert_eq!(err.to_string(), "Database error: connection refused");
        assert_eq!(err.message(), "connection refused");
    }

    #[test]
    fn test_upstream_error() {
        let err = ServiceError::upstream("timed out", None);
        assert_eq!(err.to_string(), "Upstream error: timed out");
    }

    #[test]
    fn test_error_with_source() {
        let source = std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken");
        let err = ServiceError::server("failed to bind", Some(Box::new(source)));

        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "Server error: failed to bind");
    }

    #[test]
    fn test_from_sqlx_error() {
        let err: ServiceError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ServiceError::DatabaseError { .. }));
        assert!(err.source().is_some());
    }
}
