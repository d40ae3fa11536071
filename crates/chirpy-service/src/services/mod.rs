//! Business logic services
//!
//! Services borrow a [`ServiceContext`] for the duration of one call and
//! hold no state of their own.

pub mod admin;
pub mod auth;
pub mod chirp;
pub mod context;
pub mod error;
pub mod guard;
pub mod refresh_token;
pub mod webhook;

pub use admin::AdminService;
pub use auth::AuthService;
pub use chirp::ChirpService;
pub use context::ServiceContext;
pub use error::{ServiceError, ServiceResult};
pub use guard::{AuthorizationDecision, AuthorizationGuard, Credential, Operation, Verdict};
pub use refresh_token::RefreshTokenStore;
pub use webhook::{WebhookOutcome, WebhookService};
