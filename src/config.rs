//! Configuration management for the users/quote API.
//!
//! This module loads and validates configuration from environment variables
//! using the `dotenvy` crate. Everything is read once at startup into a
//! [`Config`]; request handlers never touch the process environment.
//!
//! ## Environment Variables
//!
//! Required:
//! - `DATABASE_URL`: Store connection string (`postgres://...` or `sqlite:...`)
//!
//! Optional (with defaults):
//! - `PORT`: Listen port (default: 8000)
//! - `API_PREFIX`: Path prefix for all routes (default: "/api/go")
//!
//! Optional at startup, required by the quote endpoint:
//! - `X-CMC_PRO_API_KEY`: Upstream API key (`CMC_PRO_API_KEY` is accepted too)
//! - `CMC_BASE_URL`: Upstream base URL
//! - `CMC_LATEST_QUOTES_PATH`: Upstream "latest quotes" path
//!
//! ## Example
//!
//! ```no_run
//! use coin_users_api::config::Config;
//! use coin_users_api::error::ServiceResult;
//!
//! # fn main() -> ServiceResult<()> {
//! let config = Config::from_env()?;
//! println!("Listening on port {}", config.port());
//! # Ok(())
//! # }
//! ```

use crate::error::{ServiceError, ServiceResult};
use std::env;
use std::fmt;

/// Environment variable holding the upstream API key.
pub const QUOTE_API_KEY_VAR: &str = "X-CMC_PRO_API_KEY";
/// Fallback name for the API key; `.env` files cannot contain `-` in keys.
pub const QUOTE_API_KEY_FALLBACK_VAR: &str = "CMC_PRO_API_KEY";
/// Environment variable holding the upstream base URL.
pub const QUOTE_BASE_URL_VAR: &str = "CMC_BASE_URL";
/// Environment variable holding the upstream "latest quotes" path.
pub const QUOTE_PATH_VAR: &str = "CMC_LATEST_QUOTES_PATH";

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_API_PREFIX: &str = "/api/go";

/// Main configuration struct for the service.
#[derive(Debug, Clone)]
pub struct Config {
    /// Store connection string
    database_url: String,

    /// Listen port
    port: u16,

    /// Path prefix the route groups are nested under
    api_prefix: String,

    /// Upstream quote API settings
    quote: QuoteSettings,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Loads `.env` (if present) before reading the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `DATABASE_URL` is missing or empty
    /// - `PORT` is not a valid port number
    /// - `API_PREFIX` does not start with `/`
    pub fn from_env() -> ServiceResult<Self> {
        // Load .env file if present (ignore error if file doesn't exist)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated the same as unset ones.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> ServiceResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let database_url = get("DATABASE_URL").ok_or_else(|| {
            ServiceError::config("DATABASE_URL environment variable is required", None)
        })?;

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| {
                ServiceError::config(
                    format!("PORT must be a valid port number, got: {raw}"),
                    Some(Box::new(e)),
                )
            })?,
            None => DEFAULT_PORT,
        };

        let api_prefix = get("API_PREFIX").unwrap_or_else(|| DEFAULT_API_PREFIX.to_string());
        if !api_prefix.starts_with('/') {
            return Err(ServiceError::config(
                format!("API_PREFIX must start with '/', got: {api_prefix}"),
                None,
            ));
        }
        let api_prefix = api_prefix.trim_end_matches('/').to_string();

        let quote = QuoteSettings {
            api_key: get(QUOTE_API_KEY_VAR).or_else(|| get(QUOTE_API_KEY_FALLBACK_VAR)),
            base_url: get(QUOTE_BASE_URL_VAR),
            latest_quotes_path: get(QUOTE_PATH_VAR),
        };

        Ok(Self {
            database_url,
            port,
            api_prefix,
            quote,
        })
    }

    /// Get the store connection string.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Get the listen port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Override the listen port (e.g. from the command line).
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Get the route prefix, without a trailing slash.
    #[must_use]
    pub fn api_prefix(&self) -> &str {
        &self.api_prefix
    }

    /// Get the upstream quote API settings.
    #[must_use]
    pub const fn quote(&self) -> &QuoteSettings {
        &self.quote
    }
}

/// Upstream quote API settings as read at startup.
///
/// Any of the values may be missing; the quote endpoint reports the gap per
/// request through [`QuoteSettings::resolve`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct QuoteSettings {
    /// API key sent in the `X-CMC_PRO_API_KEY` header
    pub api_key: Option<String>,
    /// Base URL, e.g. `https://pro-api.coinmarketcap.com`
    pub base_url: Option<String>,
    /// Path appended to the base URL, e.g. `/v2/cryptocurrency/quotes/latest`
    pub latest_quotes_path: Option<String>,
}

impl fmt::Debug for QuoteSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuoteSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("latest_quotes_path", &self.latest_quotes_path)
            .finish()
    }
}

impl QuoteSettings {
    /// Resolve into a complete endpoint, or name the first missing variable.
    ///
    /// Variables are checked in the order key, base URL, path.
    ///
    /// # Errors
    ///
    /// Returns [`MissingQuoteSetting`] naming the first unset variable.
    pub fn resolve(&self) -> Result<QuoteEndpoint, MissingQuoteSetting> {
        let api_key = self
            .api_key
            .clone()
            .ok_or(MissingQuoteSetting(QUOTE_API_KEY_VAR))?;
        let base_url = self
            .base_url
            .clone()
            .ok_or(MissingQuoteSetting(QUOTE_BASE_URL_VAR))?;
        let path = self
            .latest_quotes_path
            .clone()
            .ok_or(MissingQuoteSetting(QUOTE_PATH_VAR))?;

        Ok(QuoteEndpoint {
            api_key,
            url: format!("{base_url}{path}"),
        })
    }
}

/// A fully configured upstream quote endpoint.
#[derive(Clone)]
pub struct QuoteEndpoint {
    /// API key sent with every request
    pub api_key: String,
    /// `{base_url}{path}`, without query string
    pub url: String,
}

/// A quote setting that was not provided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingQuoteSetting(pub &'static str);

impl fmt::Display for MissingQuoteSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Server Not Configured. Missing {}", self.0)
    }
}

impl std::error::Error for MissingQuoteSetting {}
