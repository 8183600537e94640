use axum::extract::FromRef;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::{
    auth::{
        jwt::JwtKeys,
        password::{hash_password, verify_password},
    },
    error::{AppError, AppResult},
    notify::new_device_alert,
    state::AppState,
    users::repo_types::{NewUser, User},
};

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const INVALID_TOKEN: &str = "Invalid or expired token";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Create a user with credentials. The email must not belong to any user,
/// soft-deleted ones included.
pub async fn register(state: &AppState, name: &str, email: &str, password: &str) -> AppResult<User> {
    let name = name.trim();
    let email = email.trim();
    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AppError::validation("Name, email and password are required"));
    }
    if !is_valid_email(email) {
        return Err(AppError::validation("Invalid email"));
    }

    if state.users.find_by_email(email).await?.is_some() {
        warn!(%email, "email already registered");
        return Err(AppError::Conflict("Email already exists".into()));
    }

    let password_hash = hash_password(password)?;
    let user = state
        .users
        .create(NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash: Some(password_hash),
        })
        .await?;

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok(user)
}

/// Check credentials and issue a session token.
///
/// A login from an address other than the one stored on the user triggers a
/// new-device alert. Delivery is awaited but its failure does not fail the
/// login.
pub async fn login(state: &AppState, email: &str, password: &str, ip: &str) -> AppResult<String> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(AppError::validation("Email and password are required"));
    }

    let Some(user) = state.users.find_active_by_email(email).await? else {
        warn!(%email, "login unknown email");
        return Err(AppError::Auth(INVALID_CREDENTIALS.into()));
    };

    let Some(hash) = user.password_hash.as_deref() else {
        warn!(user_id = user.id, "login for user without password");
        return Err(AppError::Auth(INVALID_CREDENTIALS.into()));
    };

    if !verify_password(password, hash)? {
        warn!(user_id = user.id, "login invalid password");
        return Err(AppError::Auth(INVALID_CREDENTIALS.into()));
    }

    let token = JwtKeys::from_ref(state).sign(user.id)?;

    state.users.update_last_ip(user.id, ip).await?;

    if user.last_ip_address.as_deref() != Some(ip) {
        info!(user_id = user.id, %ip, previous = ?user.last_ip_address, "login from new address");
        if let Err(e) = state.notifier.send(&user.email, &new_device_alert(ip)).await {
            warn!(error = %e, user_id = user.id, "new device alert not delivered");
        }
    }

    info!(user_id = user.id, "user logged in");
    Ok(token)
}

/// Resolve a bearer token to the active user it was issued for.
pub async fn verify_token(state: &AppState, token: &str) -> AppResult<User> {
    let claims = JwtKeys::from_ref(state).verify(token).map_err(|e| {
        warn!(error = %e, "token rejected");
        AppError::Auth(INVALID_TOKEN.into())
    })?;

    match state.users.find_by_id(claims.sub).await? {
        Some(user) if user.is_active() => Ok(user),
        _ => {
            warn!(user_id = claims.sub, "token for missing or deleted user");
            Err(AppError::Auth(INVALID_TOKEN.into()))
        }
    }
}
