//! Refresh token issuance, redemption and revocation
//!
//! Refresh tokens are opaque: 32 bytes from the OS CSPRNG, hex encoded.
//! The store only decides validity; persistence goes through the
//! [`RefreshTokenRepository`] port. Redeeming a token does not consume it.

use std::sync::Arc;

use chirpy_common::AuthError;
use chirpy_core::traits::RefreshTokenRepository;
use chirpy_core::{RefreshTokenRecord, UserId};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::{debug, error, info, instrument};

/// Number of random bytes in a refresh token (64 hex characters)
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Default lifetime of a refresh token
pub const DEFAULT_REFRESH_TOKEN_DAYS: i64 = 60;

/// Generate a fresh opaque refresh token
#[must_use]
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Refresh token store for long-lived login sessions
#[derive(Clone)]
pub struct RefreshTokenStore {
    repo: Arc<dyn RefreshTokenRepository>,
    ttl: Duration,
}

impl RefreshTokenStore {
    /// Create a store with the default 60 day lifetime
    #[must_use]
    pub fn new(repo: Arc<dyn RefreshTokenRepository>) -> Self {
        Self::with_ttl(repo, Duration::days(DEFAULT_REFRESH_TOKEN_DAYS))
    }

    /// Create with custom TTL
    #[must_use]
    pub fn with_ttl(repo: Arc<dyn RefreshTokenRepository>, ttl: Duration) -> Self {
        Self { repo, ttl }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue and persist a new refresh token for `user_id`
    ///
    /// # Errors
    /// Returns `AuthError::StorageFailure` if the token cannot be saved
    pub async fn issue(&self, user_id: UserId) -> Result<String, AuthError> {
        self.issue_at(user_id, Utc::now()).await
    }

    /// Issue a token as if the current time were `now`
    ///
    /// # Errors
    /// Returns `AuthError::Signing` if `now + ttl` is not a representable
    /// instant, `AuthError::StorageFailure` if the token cannot be saved
    #[instrument(skip(self))]
    pub async fn issue_at(&self, user_id: UserId, now: DateTime<Utc>) -> Result<String, AuthError> {
        let expires_at = now.checked_add_signed(self.ttl).ok_or_else(|| {
            AuthError::Signing(format!("refresh token lifetime {} out of range", self.ttl))
        })?;
        let record = RefreshTokenRecord::new(generate_refresh_token(), user_id, now, expires_at);

        self.repo.save(&record).await.map_err(|e| {
            error!(error = %e, "Failed to persist refresh token");
            AuthError::from(e)
        })?;

        debug!(expires_at = %record.expires_at, "Stored refresh token");
        Ok(record.token)
    }

    /// Resolve a refresh token to its owner
    ///
    /// # Errors
    /// `InvalidCredentials` if the token is unknown, `Expired` if it is past
    /// its expiry, `StorageFailure` if the lookup fails
    pub async fn redeem(&self, token: &str) -> Result<UserId, AuthError> {
        self.redeem_at(token, Utc::now()).await
    }

    /// Resolve a refresh token as if the current time were `now`
    ///
    /// # Errors
    /// See [`RefreshTokenStore::redeem`]
    #[instrument(skip(self, token))]
    pub async fn redeem_at(&self, token: &str, now: DateTime<Utc>) -> Result<UserId, AuthError> {
        let record = self.repo.find(token).await?.ok_or_else(|| {
            debug!("Refresh token not found");
            AuthError::InvalidCredentials
        })?;

        if record.is_expired_at(now) {
            debug!(user_id = %record.user_id, "Refresh token expired");
            return Err(AuthError::Expired);
        }

        Ok(record.user_id)
    }

    /// Revoke (delete) a refresh token; returns whether it existed
    ///
    /// # Errors
    /// Returns `AuthError::StorageFailure` if the delete fails
    #[instrument(skip(self, token))]
    pub async fn revoke(&self, token: &str) -> Result<bool, AuthError> {
        let deleted = self.repo.delete(token).await?;
        if deleted {
            debug!("Revoked refresh token");
        }
        Ok(deleted)
    }

    /// Delete every token past its expiry
    ///
    /// # Errors
    /// Returns `AuthError::StorageFailure` if the delete fails
    pub async fn purge_expired(&self) -> Result<u64, AuthError> {
        self.purge_expired_at(Utc::now()).await
    }

    /// Delete every token expired at `now`
    ///
    /// # Errors
    /// Returns `AuthError::StorageFailure` if the delete fails
    #[instrument(skip(self))]
    pub async fn purge_expired_at(&self, now: DateTime<Utc>) -> Result<u64, AuthError> {
        let purged = self.repo.purge_expired(now).await?;
        if purged > 0 {
            info!(purged, "Purged expired refresh tokens");
        }
        Ok(purged)
    }
}

impl std::fmt::Debug for RefreshTokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshTokenStore")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
