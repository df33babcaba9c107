//! Axum server setup and routing.

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue},
    middleware,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::info;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::middleware::error::ApiError;
use crate::api::{docs::api_doc, handlers, middleware as api_middleware};
use crate::app_state::AppState;
use crate::error::{ServiceError, ServiceResult};

/// Builds the full application router.
///
/// The `coin` and `users` route groups (plus health) are nested under
/// `prefix` and always answer with `Content-Type: application/json`.
/// Every response, including preflight and unmatched routes, passes through
/// the CORS and request logging middleware.
pub fn build_router(state: AppState, prefix: &str) -> Router {
    let api_routes = Router::new()
        .nest("/coin", handlers::coin::routes())
        .nest("/users", handlers::users::routes())
        .route("/health", get(handlers::health::health_check))
        .layer(SetResponseHeaderLayer::overriding(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ));

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api_doc(prefix)));

    let app = if prefix.is_empty() || prefix == "/" {
        app.merge(api_routes)
    } else {
        app.nest(prefix, api_routes)
    };

    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(api_middleware::cors::cors))
        .layer(middleware::from_fn(api_middleware::logging::log_requests));

    app.fallback(route_not_found)
        .layer(middleware_stack)
        .with_state(state)
}

async fn route_not_found() -> ApiError {
    ApiError::NotFound("route not found".to_string())
}

/// Run the Axum API server until Ctrl-C.
///
/// # Errors
///
/// Returns a server error if the port cannot be bound or serving fails.
pub async fn run_server(state: AppState, port: u16, prefix: &str) -> ServiceResult<()> {
    let app = build_router(state, prefix);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        ServiceError::server(format!("Failed to bind {addr}"), Some(Box::new(e)))
    })?;

    info!(addr = %addr, prefix, "Starting API server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServiceError::server("Server error", Some(Box::new(e))))?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
