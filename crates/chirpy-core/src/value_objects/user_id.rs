//! User identity - opaque 128-bit identifier
//!
//! Rendered as the canonical hyphenated UUID string (`xxxxxxxx-xxxx-...`),
//! which is also the form carried in the `sub` claim of session tokens.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique, immutable identifier of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a fresh random identity (UUID v4)
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID
    #[inline]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Get the inner UUID value
    #[inline]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }

    /// Check if this is the nil UUID (never assigned to a user)
    #[inline]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

/// Error returned when a string is not a valid user identity
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid user id: {0}")]
pub struct UserIdParseError(String);

impl FromStr for UserId {
    type Err = UserIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = Uuid::parse_str(s).map_err(|_| UserIdParseError(s.to_string()))?;
        if id.is_nil() {
            return Err(UserIdParseError(s.to_string()));
        }
        Ok(Self(id))
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<UserId> for Uuid {
    fn from(id: UserId) -> Self {
        id.0
    }
}
