//! Process-local repository implementation
//!
//! Backs every repository trait with `DashMap`s. Each trait call touches one
//! map entry under that entry's shard lock, so single calls are atomic the
//! same way a single SQL statement is.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use chirpy_core::traits::{ChirpRepository, RefreshTokenRepository, RepoResult, UserRepository};
use chirpy_core::{DomainError, RefreshTokenRecord, UserCredentials, UserId};

/// In-memory store for users, refresh tokens and chirp ownership
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: DashMap<UserId, UserCredentials>,
    /// email -> user id
    emails: DashMap<String, UserId>,
    refresh_tokens: DashMap<String, RefreshTokenRecord>,
    /// chirp id -> owner
    chirps: DashMap<Uuid, UserId>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a chirp owned by `owner` and return its id
    pub fn insert_chirp(&self, owner: UserId) -> Uuid {
        let id = Uuid::new_v4();
        self.chirps.insert(id, owner);
        id
    }

    #[must_use]
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    #[must_use]
    pub fn refresh_token_count(&self) -> usize {
        self.refresh_tokens.len()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<UserCredentials>> {
        let Some(id) = self.emails.get(email).map(|entry| *entry.value()) else {
            return Ok(None);
        };
        Ok(self.users.get(&id).map(|entry| entry.value().clone()))
    }

    async fn get_password_hash(&self, id: UserId) -> RepoResult<Option<String>> {
        Ok(self.users.get(&id).map(|entry| entry.password_hash.clone()))
    }

    async fn create(&self, user: &UserCredentials) -> RepoResult<()> {
        match self.emails.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(DomainError::EmailAlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(user.id);
                self.users.insert(user.id, user.clone());
                Ok(())
            }
        }
    }

    async fn update_password(&self, id: UserId, password_hash: &str) -> RepoResult<()> {
        let mut user = self
            .users
            .get_mut(&id)
            .ok_or(DomainError::UserNotFound(id))?;
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn update_credentials(
        &self,
        id: UserId,
        email: &str,
        password_hash: &str,
    ) -> RepoResult<UserCredentials> {
        let previous = self
            .users
            .get(&id)
            .map(|user| user.email.clone())
            .ok_or(DomainError::UserNotFound(id))?;

        if previous != email {
            // Claim the new address before releasing the old one
            match self.emails.entry(email.to_string()) {
                Entry::Occupied(_) => return Err(DomainError::EmailAlreadyExists),
                Entry::Vacant(slot) => {
                    slot.insert(id);
                }
            }
            self.emails.remove_if(&previous, |_, owner| *owner == id);
        }

        let mut user = self
            .users
            .get_mut(&id)
            .ok_or(DomainError::UserNotFound(id))?;
        user.email = email.to_string();
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(user.value().clone())
    }

    async fn upgrade_to_red(&self, id: UserId) -> RepoResult<bool> {
        let Some(mut user) = self.users.get_mut(&id) else {
            return Ok(false);
        };
        user.is_chirpy_red = true;
        user.updated_at = Utc::now();
        Ok(true)
    }

    async fn delete_all(&self) -> RepoResult<u64> {
        let removed = self.users.len() as u64;
        self.users.clear();
        self.emails.clear();
        // Mirrors ON DELETE CASCADE on the dependent tables
        self.refresh_tokens.clear();
        self.chirps.clear();
        debug!(removed, "Cleared in-memory store");
        Ok(removed)
    }
}

#[async_trait]
impl RefreshTokenRepository for MemoryStore {
    async fn save(&self, record: &RefreshTokenRecord) -> RepoResult<()> {
        match self.refresh_tokens.entry(record.token.clone()) {
            Entry::Occupied(_) => Err(DomainError::RefreshTokenExists),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(())
            }
        }
    }

    async fn find(&self, token: &str) -> RepoResult<Option<RefreshTokenRecord>> {
        Ok(self.refresh_tokens.get(token).map(|entry| entry.value().clone()))
    }

    async fn delete(&self, token: &str) -> RepoResult<bool> {
        Ok(self.refresh_tokens.remove(token).is_some())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> RepoResult<u64> {
        let mut purged = 0u64;
        self.refresh_tokens.retain(|_, record| {
            let keep = !record.is_expired_at(now);
            if !keep {
                purged += 1;
            }
            keep
        });
        Ok(purged)
    }
}

#[async_trait]
impl ChirpRepository for MemoryStore {
    async fn find_owner(&self, chirp_id: Uuid) -> RepoResult<Option<UserId>> {
        Ok(self.chirps.get(&chirp_id).map(|entry| *entry.value()))
    }

    async fn delete(&self, chirp_id: Uuid) -> RepoResult<bool> {
        Ok(self.chirps.remove(&chirp_id).is_some())
    }
}
