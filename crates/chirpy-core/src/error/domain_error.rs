//! Domain errors - error types for the domain layer

use thiserror::Error;
use uuid::Uuid;

use crate::value_objects::UserId;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Chirp not found: {0}")]
    ChirpNotFound(Uuid),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Email already in use")]
    EmailAlreadyExists,

    #[error("Refresh token already exists")]
    RefreshTokenExists,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::ChirpNotFound(_) => "UNKNOWN_CHIRP",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::WeakPassword(_) => "WEAK_PASSWORD",
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::RefreshTokenExists => "REFRESH_TOKEN_EXISTS",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound(_) | Self::ChirpNotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_) | Self::WeakPassword(_))
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::EmailAlreadyExists | Self::RefreshTokenExists)
    }

    /// Check if this came from the storage backend
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::DatabaseError(_))
    }
}
