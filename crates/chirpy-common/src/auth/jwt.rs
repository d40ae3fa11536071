//! Session token utilities
//!
//! Mints and verifies HS256-signed JWTs using the `jsonwebtoken` crate.
//! Tokens are stateless: validity is a pure function of the token, the
//! signing secret, and the current time.

use chirpy_core::UserId;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Issuer tag stamped into every session token
pub const TOKEN_ISSUER: &str = "chirpy";

/// The only signing algorithm accepted
const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer
    pub iss: String,
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Get the subject as a user ID
    ///
    /// # Errors
    /// Returns `AuthError::MalformedSubject` if the subject is not a user ID
    pub fn user_id(&self) -> Result<UserId, AuthError> {
        self.sub.parse().map_err(|_| AuthError::MalformedSubject)
    }

    /// Check if the token is expired at the given Unix timestamp
    #[must_use]
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }
}

/// Session token service
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    session_token_expiry: Duration,
}

impl TokenService {
    /// Create a new token service bound to `secret`
    #[must_use]
    pub fn new(secret: &str, session_token_expiry: Duration) -> Self {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        // Expiry is checked against an explicit clock in `verify_at`
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            session_token_expiry,
        }
    }

    /// Lifetime of tokens minted by [`Self::issue_session`]
    #[must_use]
    pub fn session_token_expiry(&self) -> Duration {
        self.session_token_expiry
    }

    /// Issue a token for the configured session lifetime
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn issue_session(&self, user_id: UserId) -> Result<String, AuthError> {
        self.issue(user_id, self.session_token_expiry)
    }

    /// Issue a token valid for `ttl` from now. No upper bound is applied to
    /// `ttl`; callers bound it.
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn issue(&self, user_id: UserId, ttl: Duration) -> Result<String, AuthError> {
        self.issue_at(user_id, ttl, Utc::now())
    }

    /// Issue a token as if the current time were `now`
    ///
    /// # Errors
    /// Returns `AuthError::Signing` if `now + ttl` is not a representable
    /// instant or token encoding fails
    pub fn issue_at(
        &self,
        user_id: UserId,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthError::Signing(format!("token lifetime {ttl} out of range")))?;

        let claims = Claims {
            iss: TOKEN_ISSUER.to_string(),
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Verify a token and return the user it was issued to
    ///
    /// # Errors
    /// `InvalidSignature`, `Expired`, or `MalformedSubject`
    pub fn verify(&self, token: &str) -> Result<UserId, AuthError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as if the current time were `now`
    ///
    /// # Errors
    /// `InvalidSignature`, `Expired`, or `MalformedSubject`
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<UserId, AuthError> {
        let claims = self.decode_claims(token)?;

        if claims.is_expired_at(now.timestamp()) {
            tracing::debug!(sub = %claims.sub, exp = claims.exp, "Session token expired");
            return Err(AuthError::Expired);
        }

        claims.user_id().inspect_err(|_| {
            tracing::debug!(sub = %claims.sub, "Session token subject is not a user id");
        })
    }

    /// Check the signature, algorithm, and issuer, and return the claims
    /// without looking at the expiry
    ///
    /// # Errors
    /// Returns `AuthError::InvalidSignature` for anything that is not a
    /// well-formed token signed by this service
    pub fn decode_claims(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                match e.kind() {
                    ErrorKind::InvalidAlgorithm => {
                        tracing::warn!("Rejected session token declaring an unexpected algorithm");
                    }
                    kind => tracing::debug!(kind = ?kind, "Rejected session token"),
                }
                AuthError::InvalidSignature
            })
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("session_token_expiry", &self.session_token_expiry)
            .finish_non_exhaustive()
    }
}
