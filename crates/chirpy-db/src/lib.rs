//! # chirpy-db
//!
//! Storage layer implementing the repository traits from `chirpy-core`.
//!
//! ## Overview
//!
//! - PostgreSQL repositories over a shared SQLx pool
//! - Database models with SQLx `FromRow` derives
//! - [`MemoryStore`], a process-local implementation of every repository
//!   used by tests and local development
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chirpy_db::{create_pool, DatabaseConfig, PgRefreshTokenRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::from_env()).await?;
//!     let refresh_tokens = PgRefreshTokenRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::MemoryStore;
pub use pool::{create_pool, create_pool_from_env, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{PgChirpRepository, PgRefreshTokenRepository, PgUserRepository};
