//! Database models (rows as stored)

mod refresh_token;
mod user;

pub use refresh_token::RefreshTokenModel;
pub use user::UserModel;
