//! Chirp service
//!
//! Only the ownership-gated operations live here.

use chirpy_core::UserId;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::guard::AuthorizationGuard;

/// Chirp service
pub struct ChirpService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ChirpService<'a> {
    /// Create a new ChirpService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Delete a chirp on behalf of `caller`, who must own it
    #[instrument(skip(self))]
    pub async fn delete(&self, caller: UserId, chirp_id: Uuid) -> ServiceResult<()> {
        let owner = self
            .ctx
            .chirp_repo()
            .find_owner(chirp_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Chirp", chirp_id.to_string()))?;

        AuthorizationGuard::check_owner(caller, owner).inspect_err(|_| {
            warn!(owner = %owner, "Refused to delete chirp owned by another user");
        })?;

        if !self.ctx.chirp_repo().delete(chirp_id).await? {
            // Deleted concurrently between lookup and delete
            return Err(ServiceError::not_found("Chirp", chirp_id.to_string()));
        }

        info!("Chirp deleted");
        Ok(())
    }
}
