//! Authentication and authorization error taxonomy
//!
//! Every failure the auth core can produce is one of these variants. The
//! `Display` text is for server-side logs only; what a caller sees is decided
//! by [`AuthError::kind`], which folds all authentication failures into one
//! indistinguishable "unauthorized" outcome.

use chirpy_core::DomainError;

/// How an [`AuthError`] surfaces to the end user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailureKind {
    /// 401 - credential missing, malformed, forged, expired, or wrong
    Unauthorized,
    /// 403 - caller is known but not allowed to do this
    Forbidden,
    /// 500 - the core itself failed
    Internal,
}

impl AuthFailureKind {
    #[must_use]
    pub fn status_code(self) -> u16 {
        match self {
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::Internal => 500,
        }
    }

    #[must_use]
    pub fn error_code(self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal => "INTERNAL_ERROR",
        }
    }

    /// Message safe to show to the caller
    #[must_use]
    pub fn public_message(self) -> &'static str {
        match self {
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::Internal => "Internal server error",
        }
    }
}

/// Closed set of authentication/authorization failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    // Authentication stage
    #[error("No credential presented")]
    MissingCredential,

    #[error("Malformed credential")]
    MalformedCredential,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Credential expired")]
    Expired,

    #[error("Token subject is not a valid user id")]
    MalformedSubject,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Stored password digest is malformed")]
    InvalidDigestFormat,

    #[error("API key mismatch")]
    WrongSecret,

    // Authorization stage
    #[error("Resource is owned by another user")]
    OwnershipViolation,

    #[error("Operation not allowed on this platform")]
    PlatformNotAllowed,

    // Internal
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error("Storage failure: {0}")]
    StorageFailure(String),
}

impl AuthError {
    /// Classify for the user-visible response
    #[must_use]
    pub fn kind(&self) -> AuthFailureKind {
        match self {
            Self::MissingCredential
            | Self::MalformedCredential
            | Self::InvalidSignature
            | Self::Expired
            | Self::MalformedSubject
            | Self::InvalidCredentials
            | Self::InvalidDigestFormat
            | Self::WrongSecret => AuthFailureKind::Unauthorized,

            Self::OwnershipViolation | Self::PlatformNotAllowed => AuthFailureKind::Forbidden,

            Self::Hashing(_) | Self::Signing(_) | Self::StorageFailure(_) => AuthFailureKind::Internal,
        }
    }

    /// Stable identifier for log fields
    #[must_use]
    pub fn log_code(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::MalformedCredential => "malformed_credential",
            Self::InvalidSignature => "invalid_signature",
            Self::Expired => "expired",
            Self::MalformedSubject => "malformed_subject",
            Self::InvalidCredentials => "invalid_credentials",
            Self::InvalidDigestFormat => "invalid_digest_format",
            Self::WrongSecret => "wrong_secret",
            Self::OwnershipViolation => "ownership_violation",
            Self::PlatformNotAllowed => "platform_not_allowed",
            Self::Hashing(_) => "hashing",
            Self::Signing(_) => "signing",
            Self::StorageFailure(_) => "storage_failure",
        }
    }

    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }
}

impl From<DomainError> for AuthError {
    fn from(err: DomainError) -> Self {
        Self::StorageFailure(err.to_string())
    }
}
