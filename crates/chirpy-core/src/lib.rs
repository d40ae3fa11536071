//! # chirpy-core
//!
//! Domain layer containing identities, credential records, and the storage
//! ports the authentication core talks to. This crate has no dependencies on
//! infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{RefreshTokenRecord, UserCredentials};
pub use error::DomainError;
pub use traits::{ChirpRepository, RefreshTokenRepository, RepoResult, UserRepository};
pub use value_objects::{UserId, UserIdParseError};
