//! Users endpoints: list, fetch by id, create.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tracing::{error, info, instrument};

use crate::api::extractors::UserId;
use crate::api::middleware::error::ApiError;
use crate::api::models::{CreateUserRequest, User};
use crate::app_state::AppState;

/// Routes mounted under `{prefix}/users`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user))
}

#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "All users", body = Vec<User>),
        (status = 404, description = "Users could not be loaded", body = crate::api::models::ErrorResponse)
    ),
    tag = "Users"
)]
/// Returns every user as a JSON array.
#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let rows = state.store.list_users().await.map_err(|e| {
        error!(error = %e, "Failed to list users");
        ApiError::NotFound("Users could not be loaded".to_string())
    })?;

    Ok(Json(rows.into_iter().map(User::from).collect()))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    params(
        ("id" = i64, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "The user", body = User),
        (status = 400, description = "Id is not an integer", body = crate::api::models::ErrorResponse),
        (status = 404, description = "No user with this id", body = crate::api::models::ErrorResponse)
    ),
    tag = "Users"
)]
/// Returns a single user.
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> Result<Json<User>, ApiError> {
    let not_found = || ApiError::NotFound(format!("User with Id of {id} not found in our records!"));

    match state.store.get_user(id).await {
        Ok(Some(row)) => Ok(Json(row.into())),
        Ok(None) => Err(not_found()),
        Err(e) => {
            error!(error = %e, "Failed to query user");
            Err(not_found())
        }
    }
}

#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid body", body = crate::api::models::ErrorResponse),
        (status = 500, description = "Insert failed", body = crate::api::models::ErrorResponse)
    ),
    tag = "Users"
)]
/// Creates a user from `{"name": ..., "email": ...}`.
///
/// The body is read raw so no particular `Content-Type` is required.
#[instrument(skip(state, body))]
pub async fn create_user(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let request: CreateUserRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("invalid JSON: {e}")))?;

    let new_user = NewUser::try_from(request)?;

    let row = state
        .store
        .insert_user(&new_user.name, &new_user.email)
        .await?;

    info!(id = row.id, "User created");

    Ok((StatusCode::CREATED, Json(row.into())))
}

/// A validated create request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Non-empty name
    pub name: String,
    /// Non-empty email
    pub email: String,
}

impl TryFrom<CreateUserRequest> for NewUser {
    type Error = ApiError;

    fn try_from(request: CreateUserRequest) -> Result<Self, Self::Error> {
        let name = required_string("name", request.name)?;
        let email = required_string("email", request.email)?;

        if name.is_empty() || email.is_empty() {
            return Err(ApiError::BadRequest(
                "name and email are required".to_string(),
            ));
        }

        Ok(Self { name, email })
    }
}

fn required_string(field: &str, value: Value) -> Result<String, ApiError> {
    match value {
        Value::String(s) => Ok(s),
        Value::Null => Err(ApiError::BadRequest(format!("{field} is required"))),
        Value::Number(_) => Err(ApiError::BadRequest(format!("{field} must be a string"))),
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => {
            Err(ApiError::BadRequest(format!("{field} must be a string")))
        }
    }
}
