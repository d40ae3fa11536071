//! User database model

use chirpy_core::{UserCredentials, UserId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for users table
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: Uuid,
    pub email: String,
    pub hashed_password: String,
    pub is_chirpy_red: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserModel> for UserCredentials {
    fn from(model: UserModel) -> Self {
        UserCredentials {
            id: UserId::from_uuid(model.id),
            email: model.email,
            password_hash: model.hashed_password,
            is_chirpy_red: model.is_chirpy_red,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
