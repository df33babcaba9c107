//! OpenAPI documentation for the REST API.

use utoipa::OpenApi;

use crate::api::handlers;

/// OpenAPI documentation for the REST API.
///
/// Paths are relative to the route prefix; use [`api_doc`] for the served
/// document.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health_check,
        handlers::users::list_users,
        handlers::users::get_user,
        handlers::users::create_user,
        handlers::coin::get_coin,
    ),
    components(schemas(
        crate::api::models::User,
        crate::api::models::CreateUserRequest,
        crate::api::models::HealthResponse,
        crate::api::models::HealthStatus,
        crate::api::models::ErrorResponse,
    )),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Users", description = "Users table access"),
        (name = "Coin", description = "Cryptocurrency quote proxy"),
    ),
    info(
        title = "Coin & Users API",
        version = "1.0.0",
        description = "Users CRUD and a pass-through cryptocurrency quote proxy",
    )
)]
pub struct ApiDoc;

/// Builds the OpenAPI document with every path placed under `prefix`.
#[must_use]
pub fn api_doc(prefix: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    let prefix = prefix.trim_end_matches('/');

    if !prefix.is_empty() {
        doc.paths.paths = std::mem::take(&mut doc.paths.paths)
            .into_iter()
            .map(|(path, item)| (format!("{prefix}{path}"), item))
            .collect();
    }

    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_doc_paths_follow_prefix() {
        let doc = api_doc("/api/v2");
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        assert!(paths.contains(&"/api/v2/users"));
        assert!(paths.contains(&"/api/v2/users/{id}"));
        assert!(paths.contains(&"/api/v2/coin"));
        assert!(paths.contains(&"/api/v2/health"));
        assert!(paths.iter().all(|p| p.starts_with("/api/v2/")));
    }

    #[test]
    fn test_api_doc_without_prefix() {
        let doc = api_doc("");
        assert!(doc.paths.paths.contains_key("/users"));
        assert!(doc.paths.paths.contains_key("/coin"));
    }
}
