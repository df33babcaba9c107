//! Quote proxy endpoint.
//!
//! Forwards `symbol` to the upstream "latest quotes" API with the server's
//! API key attached and relays the JSON object it returns. Nothing is cached
//! or retried, and the upstream payload is not reshaped.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use reqwest::header::ACCEPT;
use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

use crate::api::middleware::error::ApiError;
use crate::api::models::CoinQuery;
use crate::app_state::AppState;
use crate::config::{QuoteEndpoint, QUOTE_API_KEY_VAR};
use crate::error::ServiceError;

/// Routes mounted under `{prefix}/coin`.
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(get_coin))
}

#[utoipa::path(
    get,
    path = "/coin",
    params(CoinQuery),
    responses(
        (status = 200, description = "Upstream quote payload, unchanged", body = Object),
        (status = 400, description = "Missing symbol or server not configured", body = crate::api::models::ErrorResponse),
        (status = 502, description = "Upstream unreachable or returned invalid JSON", body = crate::api::models::ErrorResponse)
    ),
    tag = "Coin"
)]
/// Returns the upstream latest quote for `symbol`.
#[instrument(skip(state))]
pub async fn get_coin(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(pairs) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let symbol = CoinQuery::from_pairs(pairs)
        .symbol
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing Query Param: symbol".to_string()))?;

    // Missing server configuration is reported as 400.
    let endpoint = state
        .quote
        .resolve()
        .map_err(|missing| ApiError::BadRequest(missing.to_string()))?;

    let quote = fetch_latest_quote(&state.http, &endpoint, &symbol)
        .await
        .map_err(|e| {
            warn!(error = %e, "Upstream quote request failed");
            ApiError::BadGateway(e.message().to_string())
        })?;

    info!(%symbol, "Quote relayed");
    Ok(Json(Value::Object(quote)))
}

/// Calls `{base}{path}?symbol=...` and decodes the body as a JSON object.
///
/// # Errors
///
/// Returns an upstream error carrying the transport or decode error text.
pub async fn fetch_latest_quote(
    client: &reqwest::Client,
    endpoint: &QuoteEndpoint,
    symbol: &str,
) -> Result<Map<String, Value>, ServiceError> {
    let response = client
        .get(&endpoint.url)
        .query(&[("symbol", symbol)])
        .header(QUOTE_API_KEY_VAR, &endpoint.api_key)
        .header(ACCEPT, "application/json")
        .send()
        .await
        .map_err(|e| ServiceError::upstream(e.to_string(), Some(Box::new(e))))?;

    let body = response
        .bytes()
        .await
        .map_err(|e| ServiceError::upstream(e.to_string(), Some(Box::new(e))))?;

    serde_json::from_slice::<Map<String, Value>>(&body)
        .map_err(|e| ServiceError::upstream(e.to_string(), Some(Box::new(e))))
}
