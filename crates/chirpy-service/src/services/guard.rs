//! Authorization guard
//!
//! Decides whether a request may proceed. A request starts unauthenticated;
//! a verified credential resolves an identity, which is then checked against
//! the owner of the target resource. Admin resets are gated on the deployment
//! platform alone, and webhooks on a shared API key that never resolves to an
//! identity. The guard holds no mutable state and never fetches resources.

use std::sync::Arc;

use chirpy_common::{AppConfig, AuthError, Environment, TokenService};
use chirpy_core::UserId;
use tracing::debug;

/// What the caller is trying to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Any action that only needs a signed-in user
    Authenticated,
    /// Acting on a resource owned by `owner`
    OwnedResource { owner: UserId },
    /// Destructive admin reset
    PlatformReset,
    /// Payment provider webhook
    Webhook,
}

/// A raw credential as extracted from the `Authorization` header
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    Bearer(String),
    ApiKey(String),
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bearer(_) => f.write_str("Bearer(<redacted>)"),
            Self::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allowed,
    Denied,
}

/// Outcome of one authorization check. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationDecision {
    /// Resolved caller, if authentication got that far
    pub identity: Option<UserId>,
    pub verdict: Verdict,
    /// Why the request was denied
    pub reason: Option<AuthError>,
}

impl AuthorizationDecision {
    fn allow(identity: Option<UserId>) -> Self {
        Self {
            identity,
            verdict: Verdict::Allowed,
            reason: None,
        }
    }

    fn deny(identity: Option<UserId>, reason: AuthError) -> Self {
        debug!(reason = reason.log_code(), "Request denied");
        Self {
            identity,
            verdict: Verdict::Denied,
            reason: Some(reason),
        }
    }

    #[must_use]
    pub fn is_allowed(&self) -> bool {
        self.verdict == Verdict::Allowed
    }

    /// HTTP status the decision maps to
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.reason.as_ref().map_or(200, AuthError::status_code)
    }

    /// Collapse into the resolved identity or the denial reason
    ///
    /// # Errors
    /// Returns the denial reason if the request was not allowed
    pub fn into_result(self) -> Result<Option<UserId>, AuthError> {
        match self.reason {
            None => Ok(self.identity),
            Some(reason) => Err(reason),
        }
    }
}

/// Authorization guard composing token verification, ownership, platform and
/// API key checks
#[derive(Clone)]
pub struct AuthorizationGuard {
    tokens: Arc<TokenService>,
    platform: Environment,
    api_key: String,
}

impl AuthorizationGuard {
    #[must_use]
    pub fn new(tokens: Arc<TokenService>, platform: Environment, api_key: impl Into<String>) -> Self {
        Self {
            tokens,
            platform,
            api_key: api_key.into(),
        }
    }

    /// Build from application configuration
    #[must_use]
    pub fn from_config(tokens: Arc<TokenService>, config: &AppConfig) -> Self {
        Self::new(tokens, config.app.env, config.auth.polka_key.clone())
    }

    #[must_use]
    pub fn platform(&self) -> Environment {
        self.platform
    }

    /// Run the full check for one request
    #[must_use]
    pub fn decide(
        &self,
        credential: Result<Credential, AuthError>,
        operation: &Operation,
    ) -> AuthorizationDecision {
        match operation {
            // Platform gate ignores credentials entirely
            Operation::PlatformReset => match self.require_development() {
                Ok(()) => AuthorizationDecision::allow(None),
                Err(e) => AuthorizationDecision::deny(None, e),
            },
            Operation::Webhook => {
                let result = credential.and_then(|c| match c {
                    Credential::ApiKey(key) => self.verify_api_key(&key),
                    Credential::Bearer(_) => Err(AuthError::MalformedCredential),
                });
                match result {
                    Ok(()) => AuthorizationDecision::allow(None),
                    Err(e) => AuthorizationDecision::deny(None, e),
                }
            }
            Operation::Authenticated | Operation::OwnedResource { .. } => {
                let identity = match credential.and_then(|c| self.resolve_identity(&c)) {
                    Ok(id) => id,
                    Err(e) => return AuthorizationDecision::deny(None, e),
                };
                match operation {
                    Operation::OwnedResource { owner } => {
                        match Self::check_owner(identity, *owner) {
                            Ok(()) => AuthorizationDecision::allow(Some(identity)),
                            Err(e) => AuthorizationDecision::deny(Some(identity), e),
                        }
                    }
                    _ => AuthorizationDecision::allow(Some(identity)),
                }
            }
        }
    }

    fn resolve_identity(&self, credential: &Credential) -> Result<UserId, AuthError> {
        match credential {
            Credential::Bearer(token) => self.authenticate_bearer(token),
            Credential::ApiKey(_) => Err(AuthError::MalformedCredential),
        }
    }

    /// Verify a session token and resolve the caller
    ///
    /// # Errors
    /// Any `TokenService::verify` failure
    pub fn authenticate_bearer(&self, token: &str) -> Result<UserId, AuthError> {
        self.tokens.verify(token)
    }

    /// Compare the caller against the resource owner
    ///
    /// # Errors
    /// Returns `AuthError::OwnershipViolation` if they differ
    pub fn check_owner(caller: UserId, owner: UserId) -> Result<(), AuthError> {
        if caller == owner {
            Ok(())
        } else {
            Err(AuthError::OwnershipViolation)
        }
    }

    /// Allow only on a development deployment
    ///
    /// # Errors
    /// Returns `AuthError::PlatformNotAllowed` on any other platform
    pub fn require_development(&self) -> Result<(), AuthError> {
        if self.platform.is_development() {
            Ok(())
        } else {
            Err(AuthError::PlatformNotAllowed)
        }
    }

    /// Compare a presented API key against the configured one
    ///
    /// # Errors
    /// Returns `AuthError::WrongSecret` on mismatch
    pub fn verify_api_key(&self, presented: &str) -> Result<(), AuthError> {
        if constant_time_eq(presented.as_bytes(), self.api_key.as_bytes()) {
            Ok(())
        } else {
            Err(AuthError::WrongSecret)
        }
    }
}

impl std::fmt::Debug for AuthorizationGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationGuard")
            .field("platform", &self.platform)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

/// Equality whose running time depends only on the input lengths
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
