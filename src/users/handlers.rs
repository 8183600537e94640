use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    error::{AppError, AppResult},
    extract::{ApiJson, ApiPath},
    state::AppState,
    users::{
        dto::CreateUserRequest,
        repo_types::{NewUser, User},
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user", get(list_users).post(create_user))
        .route("/user/delete-filter", get(list_active_users))
        .route("/user/:id", delete(soft_delete_user))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    let name = payload.name.as_deref().map(str::trim).unwrap_or_default();
    let email = payload.email.as_deref().map(str::trim).unwrap_or_default();
    if name.is_empty() || email.is_empty() {
        return Err(AppError::validation("Name and email are required"));
    }

    if state.users.find_by_email(email).await?.is_some() {
        warn!(%email, "email already in use");
        return Err(AppError::Conflict("Email already exists".into()));
    }

    let user = state
        .users
        .create(NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash: None,
        })
        .await?;

    info!(user_id = user.id, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    Ok(Json(state.users.list_all().await?))
}

#[instrument(skip(state))]
pub async fn list_active_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    Ok(Json(state.users.list_active().await?))
}

/// Repeating the call on a deleted user is a no-op and still answers 204.
#[instrument(skip(state))]
pub async fn soft_delete_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<StatusCode> {
    match state.users.soft_delete(id).await? {
        Some(user) => {
            info!(user_id = user.id, deleted_at = ?user.deleted_at, "user soft-deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(AppError::not_found("User not found")),
    }
}
