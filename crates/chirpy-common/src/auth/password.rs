//! Password hashing and verification utilities
//!
//! Uses Argon2id for secure password hashing (OWASP recommended). Digests are
//! PHC strings (`$argon2id$v=19$m=...`), so salt and work factor travel with
//! the hash.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chirpy_core::DomainError;

use crate::error::AuthError;

/// Minimum accepted password length, in characters
const MIN_PASSWORD_LENGTH: usize = 8;

/// Well-formed Argon2id digest, with the default cost parameters, that no
/// password is known to match. Verified against when there is no real
/// digest so that a miss costs the same as a wrong password.
const UNKNOWN_USER_DIGEST: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$cv/KPufCybyUIGM38LpnQA$ZPmaDW/YgowrBwCMNQhfX5Ie2E5KTUkGSkOR4oROUEA";

/// Hash a password using Argon2id
///
/// # Errors
/// Returns `AuthError::Hashing` if hashing fails
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Verify a password against a hash
///
/// A mismatch is `Ok(false)`. A digest that is not a parseable PHC string is
/// `Err(AuthError::InvalidDigestFormat)`; callers must treat both the same.
///
/// # Errors
/// Returns `AuthError::InvalidDigestFormat` if the stored hash is malformed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| {
        tracing::warn!(error = %e, "Stored password hash has invalid format");
        AuthError::InvalidDigestFormat
    })?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Password service for dependency injection
#[derive(Debug, Clone, Default)]
pub struct PasswordService;

impl PasswordService {
    /// Create a new password service
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Hash a password
    ///
    /// # Errors
    /// Returns an error if hashing fails
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        hash_password(password)
    }

    /// Verify a password against a hash
    ///
    /// # Errors
    /// Returns an error if the hash is malformed
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        verify_password(password, hash)
    }

    /// Verify a password and return an error if invalid
    ///
    /// A malformed digest is folded into `InvalidCredentials` as well.
    ///
    /// # Errors
    /// Returns `AuthError::InvalidCredentials` if the password doesn't match
    pub fn verify_or_error(&self, password: &str, hash: &str) -> Result<(), AuthError> {
        match self.verify(password, hash) {
            Ok(true) => Ok(()),
            Ok(false) | Err(AuthError::InvalidDigestFormat) => Err(AuthError::InvalidCredentials),
            Err(e) => Err(e),
        }
    }

    /// Spend one full verification on a login with no matching account
    ///
    /// Always yields `AuthError::InvalidCredentials`, after the same Argon2
    /// work a wrong password costs.
    #[must_use]
    pub fn reject_unknown_user(&self, password: &str) -> AuthError {
        match self.verify_or_error(password, UNKNOWN_USER_DIGEST) {
            Ok(()) | Err(AuthError::InvalidCredentials) => AuthError::InvalidCredentials,
            Err(e) => e,
        }
    }
}

/// Validate password strength
///
/// Requires at least 8 characters, not all of them whitespace.
///
/// # Errors
/// Returns `DomainError::WeakPassword` if the password doesn't meet requirements
pub fn validate_password_strength(password: &str) -> Result<(), DomainError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(DomainError::WeakPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }

    if password.trim().is_empty() {
        return Err(DomainError::WeakPassword(
            "Password must not be blank".to_string(),
        ));
    }

    Ok(())
}
