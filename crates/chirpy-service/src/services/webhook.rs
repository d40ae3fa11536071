//! Payment provider webhooks
//!
//! Callers are authenticated by the API key gate before anything here runs.

use chirpy_core::UserId;
use tracing::{debug, info, instrument, warn};

use crate::dto::WebhookEvent;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// The only event the provider sends that we act on
pub const USER_UPGRADED_EVENT: &str = "user.upgraded";

/// What a delivered event did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// The user is now Chirpy Red
    Upgraded,
    /// Not an event we handle; acknowledged without effect
    Ignored,
}

/// Webhook service
pub struct WebhookService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> WebhookService<'a> {
    /// Create a new WebhookService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Apply a provider event
    ///
    /// # Errors
    /// `Validation` if the user id is not a UUID, `NotFound` if no such user
    /// exists
    #[instrument(skip(self, event), fields(event = %event.event))]
    pub async fn handle(&self, event: WebhookEvent) -> ServiceResult<WebhookOutcome> {
        if event.event != USER_UPGRADED_EVENT {
            debug!("Ignoring webhook event");
            return Ok(WebhookOutcome::Ignored);
        }

        let user_id: UserId = event
            .data
            .user_id
            .parse()
            .map_err(|_| ServiceError::validation("Invalid user id format"))?;

        if !self.ctx.user_repo().upgrade_to_red(user_id).await? {
            warn!(user_id = %user_id, "Upgrade requested for unknown user");
            return Err(ServiceError::not_found("User", user_id.to_string()));
        }

        info!(user_id = %user_id, "User upgraded to Chirpy Red");
        Ok(WebhookOutcome::Upgraded)
    }
}
