//! PostgreSQL repository implementations

mod chirp;
mod error;
mod refresh_token;
mod user;

pub use chirp::PgChirpRepository;
pub use refresh_token::PgRefreshTokenRepository;
pub use user::PgUserRepository;
