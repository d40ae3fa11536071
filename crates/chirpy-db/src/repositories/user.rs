//! PostgreSQL implementation of UserRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use chirpy_core::traits::{RepoResult, UserRepository};
use chirpy_core::{DomainError, UserCredentials, UserId};

use crate::models::UserModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new PgUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<UserCredentials>> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, email, hashed_password, is_chirpy_red, created_at, updated_at
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(UserCredentials::from))
    }

    #[instrument(skip(self))]
    async fn get_password_hash(&self, id: UserId) -> RepoResult<Option<String>> {
        sqlx::query_scalar::<_, String>(
            r"
            SELECT hashed_password FROM users WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn create(&self, user: &UserCredentials) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO users (id, email, hashed_password, is_chirpy_red, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(user.id.into_inner())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_chirpy_red)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::EmailAlreadyExists))?;

        Ok(())
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password(&self, id: UserId, password_hash: &str) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE users SET hashed_password = $2, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::UserNotFound(id));
        }

        Ok(())
    }

    #[instrument(skip(self, password_hash))]
    async fn update_credentials(
        &self,
        id: UserId,
        email: &str,
        password_hash: &str,
    ) -> RepoResult<UserCredentials> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            UPDATE users SET email = $2, hashed_password = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, hashed_password, is_chirpy_red, created_at, updated_at
            ",
        )
        .bind(id.into_inner())
        .bind(email)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::EmailAlreadyExists))?;

        result
            .map(UserCredentials::from)
            .ok_or(DomainError::UserNotFound(id))
    }

    #[instrument(skip(self))]
    async fn upgrade_to_red(&self, id: UserId) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE users SET is_chirpy_red = TRUE, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete_all(&self) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM users")
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
