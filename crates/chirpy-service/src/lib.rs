//! # chirpy-service
//!
//! Application layer: the refresh token store, the authorization guard, and
//! the services (accounts, chirps, admin, webhooks) that compose them with the
//! storage ports.

pub mod dto;
pub mod services;

pub use services::{
    AdminService, AuthService, AuthorizationDecision, AuthorizationGuard, ChirpService,
    Credential, Operation, RefreshTokenStore, ServiceContext, ServiceError, ServiceResult,
    Verdict, WebhookOutcome, WebhookService,
};
