//! Axum extractors for request handling

mod auth;
mod credentials;

pub use auth::{ApiKeyAuth, AuthUser, DevelopmentOnly};
pub use credentials::{
    extract_api_key, extract_bearer, extract_credential, API_KEY_SCHEME, BEARER_SCHEME,
};
