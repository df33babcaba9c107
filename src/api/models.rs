//! API request and response models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::db::models::UserRow;

/// A user as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Store-assigned identifier
    pub id: i32,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Creation time (RFC 3339, UTC)
    #[serde(rename = "createTimestamp")]
    pub create_timestamp: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            create_timestamp: row.created_at.and_utc(),
        }
    }
}

/// Body of `POST /users`.
///
/// Fields are kept as raw JSON so a missing field, an explicit `null` and a
/// value of the wrong type can each be reported distinctly.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    /// Display name; must be a non-empty string
    #[serde(default)]
    #[schema(value_type = String)]
    pub name: Value,
    /// Email address; must be a non-empty string
    #[serde(default)]
    #[schema(value_type = String)]
    pub email: Value,
}

/// Query parameters for the quote proxy.
#[derive(Debug, Deserialize, IntoParams)]
pub struct CoinQuery {
    /// Ticker symbol, e.g. `BTC`
    pub symbol: Option<String>,
}

impl CoinQuery {
    /// Builds the query from raw pairs; a repeated `symbol` keeps its first value.
    #[must_use]
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let symbol = pairs
            .into_iter()
            .find_map(|(key, value)| (key == "symbol").then_some(value));
        Self { symbol }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Overall health status
    pub status: HealthStatus,
    /// Application version
    pub version: String,
    /// Uptime in seconds
    pub uptime_seconds: u64,
    /// Database status
    pub database_status: HealthStatus,
}

/// Health status states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// All services healthy
    Healthy,
    /// Store unreachable
    Unhealthy,
}

/// Error response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type
    pub error: String,
    /// Human-readable message
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_coin_query_takes_first_symbol() {
        let query = CoinQuery::from_pairs(pairs(&[
            ("convert", "EUR"),
            ("symbol", "BTC"),
            ("symbol", "ETH"),
        ]));
        assert_eq!(query.symbol.as_deref(), Some("BTC"));
    }

    #[test]
    fn test_coin_query_without_symbol() {
        assert!(CoinQuery::from_pairs(pairs(&[("convert", "EUR")]))
            .symbol
            .is_none());
        assert_eq!(
            CoinQuery::from_pairs(pairs(&[("symbol", ""), ("symbol", "BTC")]))
                .symbol
                .as_deref(),
            Some("")
        );
    }

    #[test]
    fn test_user_serializes_create_timestamp_in_camel_case() {
        let created_at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|d| d.and_hms_opt(12, 30, 0))
            .unwrap();
        let user = User::from(UserRow {
            id: 7,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            created_at,
        });

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["name"], "Ada");
        assert_eq!(json["createTimestamp"], "2024-05-01T12:30:00Z");
    }

    #[test]
    fn test_create_user_request_missing_fields_are_null() {
        let request: CreateUserRequest = serde_json::from_str("{}").unwrap();
        assert!(request.name.is_null());
        assert!(request.email.is_null());
    }

    #[test]
    fn test_create_user_request_rejects_unknown_fields() {
        let result =
            serde_json::from_str::<CreateUserRequest>(r#"{"name":"a","email":"b","age":3}"#);
        assert!(result.is_err());
    }
}
