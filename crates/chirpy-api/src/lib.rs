//! # chirpy-api
//!
//! HTTP boundary for the authentication core: credential extraction from
//! request headers, Axum extractors that run the authorization guard, and
//! the mapping from errors to collapsed JSON responses.

pub mod extractors;
pub mod response;
pub mod state;

pub use extractors::{
    extract_api_key, extract_bearer, extract_credential, ApiKeyAuth, AuthUser, DevelopmentOnly,
};
pub use response::{ApiError, ApiResult};
pub use state::AppState;
