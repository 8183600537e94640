use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use super::services::verify_token;
use crate::{
    error::{AppError, AppResult},
    state::AppState,
    users::repo_types::User,
};

/// Token from `Authorization: Bearer <token>`; `None` when the header is absent.
pub(crate) fn bearer_token(headers: &HeaderMap) -> AppResult<Option<String>> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let invalid = || AppError::Auth("Invalid Authorization header".into());
    let raw = value.to_str().map_err(|_| invalid())?;
    let token = raw
        .strip_prefix("Bearer ")
        .or_else(|| raw.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(invalid)?;
    Ok(Some(token.to_string()))
}

/// Rejects the request with 401 unless it carries a token for an active user,
/// whom it then stores in the request extensions for [`CurrentUser`].
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let token = bearer_token(request.headers())?
        .ok_or_else(|| AppError::Auth("Missing Authorization header".into()))?;
    let user = verify_token(&state, &token).await?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// The user resolved by [`require_auth`].
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| AppError::Auth("Authentication required".into()))
    }
}

/// Anonymous when no Authorization header is sent; a header that is present
/// must hold a valid token.
pub struct MaybeUser(pub Option<User>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match bearer_token(&parts.headers)? {
            Some(token) => Ok(MaybeUser(Some(verify_token(state, &token).await?))),
            None => Ok(MaybeUser(None)),
        }
    }
}
