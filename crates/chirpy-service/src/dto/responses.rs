//! Response DTOs
//!
//! Never carry password digests; `UserResponse` is built from
//! `UserCredentials` field by field.

use chrono::{DateTime, Utc};
use serde::Serialize;

use chirpy_core::UserCredentials;

/// Public view of an account
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub is_chirpy_red: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&UserCredentials> for UserResponse {
    fn from(user: &UserCredentials) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            is_chirpy_red: user.is_chirpy_red,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Successful login: a session token and a refresh token, issued together
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Session token lifetime in seconds
    pub expires_in: i64,
    pub user: UserResponse,
}

impl AuthResponse {
    #[must_use]
    pub fn new(
        access_token: String,
        refresh_token: String,
        expires_in: i64,
        user: UserResponse,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in,
            user,
        }
    }
}

/// A freshly minted session token
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl TokenResponse {
    #[must_use]
    pub fn new(access_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }
}
