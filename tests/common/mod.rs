//! Shared helpers for the HTTP integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, Response},
    Router,
};
use coin_users_api::{
    api::server::build_router,
    app_state::AppState,
    config::QuoteSettings,
    db::{self, models::UserRow, ReadinessPolicy, UserStore},
    error::ServiceError,
};
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;

pub const PREFIX: &str = "/api/go";

/// Store that fails every operation, standing in for an unreachable database.
pub struct UnavailableStore;

#[async_trait]
impl UserStore for UnavailableStore {
    async fn list_users(&self) -> Result<Vec<UserRow>, ServiceError> {
        Err(ServiceError::database("connection refused", None))
    }

    async fn get_user(&self, _id: i64) -> Result<Option<UserRow>, ServiceError> {
        Err(ServiceError::database("connection refused", None))
    }

    async fn insert_user(&self, _name: &str, _email: &str) -> Result<UserRow, ServiceError> {
        Err(ServiceError::database(
            "connection refused: secret-host:5432",
            None,
        ))
    }

    async fn ensure_schema(&self) -> Result<(), ServiceError> {
        Err(ServiceError::database("connection refused", None))
    }

    async fn ping(&self) -> Result<(), ServiceError> {
        Err(ServiceError::database("connection refused", None))
    }
}

pub async fn sqlite_store() -> Arc<dyn UserStore> {
    db::connect(
        "sqlite::memory:",
        ReadinessPolicy {
            attempts: 1,
            interval: Duration::from_millis(1),
        },
    )
    .await
    .expect("Failed to open in-memory store")
}

pub fn app_with(store: Arc<dyn UserStore>, quote: QuoteSettings) -> Router {
    let state = AppState::new(store, quote).expect("Failed to build state");
    build_router(state, PREFIX)
}

pub async fn test_app() -> Router {
    app_with(sqlite_store().await, QuoteSettings::default())
}

pub async fn send(app: &Router, request: Request<Body>) -> (Response<Body>, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Router is infallible");
    let (parts, body) = response.into_parts();
    let bytes = to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read body")
        .to_vec();
    (Response::from_parts(parts, Body::empty()), bytes)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

pub fn json(bytes: &[u8]) -> serde_json::Value {
    serde_json::from_slice(bytes).expect("Body should be JSON")
}
