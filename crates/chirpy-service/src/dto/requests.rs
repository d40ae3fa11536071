//! Request DTOs
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use serde::Deserialize;
use validator::Validate;

/// Account registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(max = 128, message = "Password must be at most 128 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    pub password: String,
}

/// Password change for the authenticated user
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    pub current_password: String,

    #[validate(length(max = 128, message = "Password must be at most 128 characters"))]
    pub new_password: String,
}

/// Replace the authenticated user's email and password together
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateAccountRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub current_password: String,

    #[validate(length(max = 128, message = "Password must be at most 128 characters"))]
    pub new_password: String,
}

/// Event posted by the payment provider
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    #[serde(default)]
    pub data: WebhookData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookData {
    #[serde(default)]
    pub user_id: String,
}
