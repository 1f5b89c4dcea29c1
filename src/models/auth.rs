//! Authentication-related models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Register request. Fields are optional so that a missing field is a 400, not a 422.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Login request
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Register response (201). Registration does not log the user in.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub username: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub username: String,
    pub token: String,
}

/// Identity asserted by a verified session token
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub username: String,
    #[serde(rename = "issuedAt")]
    pub issued_at: i64,
    #[serde(rename = "expiresAt")]
    pub expires_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_deserialize_as_none() {
        let req: RegisterRequest = serde_json::from_str(r#"{"password":"x"}"#).unwrap();
        assert!(req.username.is_none());
        assert_eq!(req.password.as_deref(), Some("x"));
    }
}
