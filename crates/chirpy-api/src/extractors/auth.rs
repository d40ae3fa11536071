//! Authentication extractors
//!
//! Each extractor reads the `Authorization` header and asks the
//! [`AuthorizationGuard`](chirpy_service::AuthorizationGuard) for a decision.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use chirpy_common::AuthError;
use chirpy_core::UserId;
use chirpy_service::{Credential, Operation};
use tracing::warn;

use super::credentials::{extract_api_key, extract_bearer};
use crate::response::ApiError;
use crate::state::AppState;

/// Authenticated user resolved from a session token
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: UserId,
}

impl AuthUser {
    /// Create a new AuthUser
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let credential = extract_bearer(&parts.headers).map(Credential::Bearer);

        let identity = app_state
            .guard()
            .decide(credential, &Operation::Authenticated)
            .into_result()
            .inspect_err(|e| warn!(reason = e.log_code(), "Rejected session credential"))?;

        identity
            .map(AuthUser::new)
            .ok_or(ApiError::Auth(AuthError::MissingCredential))
    }
}

/// Webhook caller that presented the configured API key
#[derive(Debug, Clone, Copy)]
pub struct ApiKeyAuth;

#[async_trait]
impl<S> FromRequestParts<S> for ApiKeyAuth
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let credential = extract_api_key(&parts.headers).map(Credential::ApiKey);

        app_state
            .guard()
            .decide(credential, &Operation::Webhook)
            .into_result()
            .inspect_err(|e| warn!(reason = e.log_code(), "Rejected webhook credential"))?;

        Ok(ApiKeyAuth)
    }
}

/// Passes only on a development deployment
#[derive(Debug, Clone, Copy)]
pub struct DevelopmentOnly;

#[async_trait]
impl<S> FromRequestParts<S> for DevelopmentOnly
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        app_state.guard().require_development()?;
        Ok(DevelopmentOnly)
    }
}
