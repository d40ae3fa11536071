//! Error types

mod app_error;
mod auth_error;

pub use app_error::{AppError, AppResult, ErrorResponse};
pub use auth_error::{AuthError, AuthFailureKind};
