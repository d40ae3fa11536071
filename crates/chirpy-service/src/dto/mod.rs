//! Data transfer objects for requests and responses

pub mod requests;
pub mod responses;

pub use requests::{
    ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateAccountRequest, WebhookData,
    WebhookEvent,
};
pub use responses::{AuthResponse, TokenResponse, UserResponse};
