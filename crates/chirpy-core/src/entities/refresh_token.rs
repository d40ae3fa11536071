//! Refresh token entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::UserId;

/// A persisted refresh token, keyed by the token string itself.
///
/// A record is usable only while `now < expires_at`; there is no other
/// deactivation path besides deleting the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    /// Opaque random token (primary key)
    pub token: String,
    /// User this token belongs to
    pub user_id: UserId,
    /// Instant at and after which the token is unusable
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    #[must_use]
    pub fn new(token: String, user_id: UserId, created_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token,
            user_id,
            expires_at,
            created_at,
        }
    }

    /// Check if the token is expired at the given instant
    #[inline]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Check if the token is expired now
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}
