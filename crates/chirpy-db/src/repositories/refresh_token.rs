//! PostgreSQL implementation of RefreshTokenRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use chirpy_core::traits::{RefreshTokenRepository, RepoResult};
use chirpy_core::{DomainError, RefreshTokenRecord};

use crate::models::RefreshTokenModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of RefreshTokenRepository
///
/// `token` is the primary key of `refresh_tokens`, which is what keeps a
/// token value to at most one row.
#[derive(Clone)]
pub struct PgRefreshTokenRepository {
    pool: PgPool,
}

impl PgRefreshTokenRepository {
    /// Create a new PgRefreshTokenRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RefreshTokenRepository for PgRefreshTokenRepository {
    #[instrument(skip(self, record), fields(user_id = %record.user_id))]
    async fn save(&self, record: &RefreshTokenRecord) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO refresh_tokens (token, user_id, expires_at, created_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(&record.token)
        .bind(record.user_id.into_inner())
        .bind(record.expires_at)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::RefreshTokenExists))?;

        Ok(())
    }

    #[instrument(skip(self, token))]
    async fn find(&self, token: &str) -> RepoResult<Option<RefreshTokenRecord>> {
        let result = sqlx::query_as::<_, RefreshTokenModel>(
            r"
            SELECT token, user_id, expires_at, created_at
            FROM refresh_tokens
            WHERE token = $1
            ",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(RefreshTokenRecord::from))
    }

    #[instrument(skip(self, token))]
    async fn delete(&self, token: &str) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn purge_expired(&self, now: DateTime<Utc>) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
