//! User credential entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::UserId;

/// Login material for a user: the identity, the login email, the current
/// password digest, and the paid-tier flag. A password change replaces
/// `password_hash` wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCredentials {
    pub id: UserId,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Set by the payment provider's upgrade webhook
    #[serde(default)]
    pub is_chirpy_red: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserCredentials {
    /// Create a credential record for a brand-new account
    #[must_use]
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::generate(),
            email: email.into(),
            password_hash: password_hash.into(),
            is_chirpy_red: false,
            created_at: now,
            updated_at: now,
        }
    }
}
