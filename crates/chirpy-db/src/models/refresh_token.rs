//! Refresh token database model

use chirpy_core::{RefreshTokenRecord, UserId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for refresh_tokens table
#[derive(Debug, Clone, FromRow)]
pub struct RefreshTokenModel {
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<RefreshTokenModel> for RefreshTokenRecord {
    fn from(model: RefreshTokenModel) -> Self {
        RefreshTokenRecord::new(
            model.token,
            UserId::from_uuid(model.user_id),
            model.created_at,
            model.expires_at,
        )
    }
}
