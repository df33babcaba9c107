//! Shared application state for API handlers.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::config::QuoteSettings;
use crate::db::UserStore;
use crate::error::ServiceError;

/// Timeout applied to every upstream quote request.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared application state for API handlers.
#[derive(Clone)]
pub struct AppState {
    /// Store holding the `users` table.
    pub store: Arc<dyn UserStore>,
    /// HTTP client for the upstream quote API.
    pub http: reqwest::Client,
    /// Upstream quote API settings read at startup.
    pub quote: Arc<QuoteSettings>,
    /// Application start time for uptime tracking.
    pub start_time: SystemTime,
}

impl AppState {
    /// Create a new `AppState` with a client using [`UPSTREAM_TIMEOUT`].
    ///
    /// # Errors
    ///
    /// Returns an upstream error if the HTTP client cannot be built
    /// (e.g. the TLS backend fails to initialize).
    pub fn new(store: Arc<dyn UserStore>, quote: QuoteSettings) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()
            .map_err(|e| {
                ServiceError::upstream("Failed to build HTTP client", Some(Box::new(e)))
            })?;

        Ok(Self {
            store,
            http,
            quote: Arc::new(quote),
            start_time: SystemTime::now(),
        })
    }
}
