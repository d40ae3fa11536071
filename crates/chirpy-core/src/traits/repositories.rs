//! Repository traits (ports) - define the interface for data access
//!
//! The authentication core only ever issues single-row reads and writes
//! through these traits. Atomicity of each individual call is the
//! implementation's job; nothing here spans multiple calls.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::entities::{RefreshTokenRecord, UserCredentials};
use crate::error::DomainError;
use crate::value_objects::UserId;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find login credentials by email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<UserCredentials>>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: UserId) -> RepoResult<Option<String>>;

    /// Create a new user
    async fn create(&self, user: &UserCredentials) -> RepoResult<()>;

    /// Replace the password hash
    async fn update_password(&self, id: UserId, password_hash: &str) -> RepoResult<()>;

    /// Replace email and password hash together and return the updated user.
    /// Fails with `EmailAlreadyExists` if another user holds `email`.
    async fn update_credentials(
        &self,
        id: UserId,
        email: &str,
        password_hash: &str,
    ) -> RepoResult<UserCredentials>;

    /// Mark a user as Chirpy Red, returning whether the user exists
    async fn upgrade_to_red(&self, id: UserId) -> RepoResult<bool>;

    /// Delete every user (and, by cascade, their refresh tokens and chirps)
    async fn delete_all(&self) -> RepoResult<u64>;
}

// ============================================================================
// Refresh Token Repository
// ============================================================================

#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Persist a new token; fails with `RefreshTokenExists` on a duplicate key
    async fn save(&self, record: &RefreshTokenRecord) -> RepoResult<()>;

    /// Look up a token by its value
    async fn find(&self, token: &str) -> RepoResult<Option<RefreshTokenRecord>>;

    /// Delete a token, returning whether a row existed
    async fn delete(&self, token: &str) -> RepoResult<bool>;

    /// Delete every token that expired at or before `now`
    async fn purge_expired(&self, now: DateTime<Utc>) -> RepoResult<u64>;
}

// ============================================================================
// Chirp Repository
// ============================================================================

#[async_trait]
pub trait ChirpRepository: Send + Sync {
    /// Owner of a chirp, if the chirp exists
    async fn find_owner(&self, chirp_id: Uuid) -> RepoResult<Option<UserId>>;

    /// Delete a chirp, returning whether a row existed
    async fn delete(&self, chirp_id: Uuid) -> RepoResult<bool>;
}
