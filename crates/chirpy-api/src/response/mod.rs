//! Error responses for the HTTP boundary
//!
//! Every authentication failure renders the same 401 body, and every
//! authorization failure the same 403 body. Server-side detail is logged,
//! never returned.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chirpy_common::{AppError, AuthError};
use chirpy_service::ServiceError;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};
use validator::ValidationErrors;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// API error type for consistent error responses
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    App(#[from] AppError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),
}

impl ApiError {
    /// Get HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        let code = match self {
            Self::Auth(e) => e.status_code(),
            Self::App(e) => e.status_code(),
            Self::Service(e) => e.status_code(),
            Self::Validation(_) => 400,
            Self::Internal(_) => 500,
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get error code for API responses
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Auth(e) => e.kind().error_code(),
            Self::App(e) => e.error_code(),
            Self::Service(e) => e.error_code(),
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// The auth failure behind this error, if any
    #[must_use]
    pub fn auth_error(&self) -> Option<&AuthError> {
        match self {
            Self::Auth(e) | Self::App(AppError::Auth(e)) | Self::Service(ServiceError::Auth(e)) => {
                Some(e)
            }
            _ => None,
        }
    }

    /// Message that may be shown to the caller
    #[must_use]
    pub fn public_message(&self) -> String {
        if let Some(e) = self.auth_error() {
            return e.kind().public_message().to_string();
        }
        if self.status_code().is_server_error() {
            return INTERNAL_MESSAGE.to_string();
        }
        self.to_string()
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Error detail for API responses
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if let Some(e) = self.auth_error() {
            debug!(reason = e.log_code(), status = status.as_u16(), "Auth failure");
        }
        if status.is_server_error() {
            error!(error = ?self, "Server error occurred");
        }

        // Build details for validation errors
        let details = if let Self::Validation(errors) = &self {
            Some(serde_json::to_value(errors).unwrap_or_default())
        } else {
            None
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.public_message(),
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
