use serde::{Deserialize, Serialize};

use crate::users::repo_types::User;

/// Request body for user registration. Older clients send `username`
/// instead of `name`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl RegisterRequest {
    /// `name` when it is non-blank, otherwise `username`.
    pub fn display_name(&self) -> &str {
        [self.name.as_deref(), self.username.as_deref()]
            .into_iter()
            .flatten()
            .find(|n| !n.trim().is_empty())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(body: serde_json::Value) -> RegisterRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn name_wins_over_username() {
        assert_eq!(parse(json!({"name": "Ann", "username": "ann99"})).display_name(), "Ann");
        assert_eq!(parse(json!({"name": " ", "username": "ann99"})).display_name(), "ann99");
        assert_eq!(parse(json!({"username": "ann99"})).display_name(), "ann99");
        assert_eq!(parse(json!({})).display_name(), "");
    }
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Response returned after registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user: User,
}

/// Response returned after login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: String,
}
