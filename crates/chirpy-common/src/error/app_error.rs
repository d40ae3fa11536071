//! Application error types
//!
//! Unified error handling for the entire application.

use chirpy_core::DomainError;
use serde::Serialize;
use std::fmt;

use super::auth_error::AuthError;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Authentication / authorization errors
    #[error(transparent)]
    Auth(#[from] AuthError),

    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Resource errors
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // Database errors
    #[error("Database error: {0}")]
    Database(String),

    // Internal errors
    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Get HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Auth(e) => e.status_code(),

            // 400 Bad Request
            Self::Validation(_) | Self::InvalidInput(_) => 400,

            // 404 Not Found
            Self::NotFound(_) => 404,

            // 409 Conflict
            Self::Conflict(_) => 409,

            // 500 Internal Server Error
            Self::Database(_) | Self::Internal(_) | Self::Config(_) => 500,

            Self::Domain(e) => {
                if e.is_not_found() {
                    404
                } else if e.is_validation() {
                    400
                } else if e.is_conflict() {
                    409
                } else {
                    500
                }
            }
        }
    }

    /// Get error code for API responses
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Auth(e) => e.kind().error_code(),
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Domain(e) if e.is_storage() => "INTERNAL_ERROR",
            Self::Domain(e) => e.code(),
        }
    }

    /// Message that may be shown to the caller. Auth failures and server
    /// errors never expose their detail.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Auth(e) => e.kind().public_message().to_string(),
            _ if self.is_server_error() => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        let status = self.status_code();
        (400..500).contains(&status)
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        let status = self.status_code();
        (500..600).contains(&status)
    }

    /// Create a not found error for a resource type
    #[must_use]
    pub fn not_found(resource: impl fmt::Display) -> Self {
        Self::NotFound(resource.to_string())
    }

    /// Create a validation error
    #[must_use]
    pub fn validation(msg: impl fmt::Display) -> Self {
        Self::Validation(msg.to_string())
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

/// Error response structure for API responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.error_code().to_string(),
            message: err.public_message(),
            details: None,
        }
    }
}

impl From<AppError> for ErrorResponse {
    fn from(err: AppError) -> Self {
        Self::from(&err)
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::Auth(AuthError::InvalidCredentials).status_code(), 401);
        assert_eq!(AppError::Auth(AuthError::OwnershipViolation).status_code(), 403);
        assert_eq!(AppError::NotFound("chirp".to_string()).status_code(), 404);
        assert_eq!(AppError::Validation("test".to_string()).status_code(), 400);
        assert_eq!(AppError::Database("test".to_string()).status_code(), 500);
        assert_eq!(AppError::Domain(DomainError::EmailAlreadyExists).status_code(), 409);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::Auth(AuthError::Expired).error_code(), "UNAUTHORIZED");
        assert_eq!(AppError::Auth(AuthError::PlatformNotAllowed).error_code(), "FORBIDDEN");
        assert_eq!(AppError::NotFound("user".to_string()).error_code(), "NOT_FOUND");
        assert_eq!(
            AppError::Domain(DomainError::DatabaseError("x".to_string())).error_code(),
            "INTERNAL_ERROR"
        );
    }

    #[test]
    fn test_is_client_error() {
        assert!(AppError::Auth(AuthError::WrongSecret).is_client_error());
        assert!(AppError::NotFound("test".to_string()).is_client_error());
        assert!(!AppError::Database("test".to_string()).is_client_error());
    }

    #[test]
    fn test_auth_detail_never_reaches_response() {
        let expired = ErrorResponse::from(AppError::Auth(AuthError::Expired));
        let forged = ErrorResponse::from(AppError::Auth(AuthError::InvalidSignature));

        assert_eq!(expired.code, forged.code);
        assert_eq!(expired.message, forged.message);
        assert_eq!(expired.message, "Unauthorized");
    }

    #[test]
    fn test_storage_detail_hidden() {
        let err = AppError::Auth(AuthError::StorageFailure("pg: relation missing".to_string()));
        let response = ErrorResponse::from(&err);

        assert_eq!(response.code, "INTERNAL_ERROR");
        assert!(!response.message.contains("pg"));
    }

    #[test]
    fn test_helper_methods() {
        let err = AppError::not_found("chirp 123");
        assert_eq!(err.to_string(), "Resource not found: chirp 123");

        let err = AppError::validation("email is required");
        assert_eq!(err.public_message(), "Validation error: email is required");
    }
}
