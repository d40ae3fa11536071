//! PostgreSQL implementation of ChirpRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use chirpy_core::traits::{ChirpRepository, RepoResult};
use chirpy_core::UserId;

use super::error::map_db_error;

/// PostgreSQL implementation of ChirpRepository
#[derive(Clone)]
pub struct PgChirpRepository {
    pool: PgPool,
}

impl PgChirpRepository {
    /// Create a new PgChirpRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChirpRepository for PgChirpRepository {
    #[instrument(skip(self))]
    async fn find_owner(&self, chirp_id: Uuid) -> RepoResult<Option<UserId>> {
        let owner = sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM chirps WHERE id = $1")
            .bind(chirp_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(owner.map(UserId::from_uuid))
    }

    #[instrument(skip(self))]
    async fn delete(&self, chirp_id: Uuid) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM chirps WHERE id = $1")
            .bind(chirp_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
