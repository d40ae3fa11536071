//! Admin service
//!
//! Destructive maintenance, allowed only on development deployments.

use tracing::{info, instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Admin service
pub struct AdminService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AdminService<'a> {
    /// Create a new AdminService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Delete every user (and with them their refresh tokens and chirps)
    ///
    /// Returns the number of users removed.
    #[instrument(skip(self))]
    pub async fn reset(&self) -> ServiceResult<u64> {
        self.ctx.guard().require_development().inspect_err(|_| {
            warn!(platform = ?self.ctx.guard().platform(), "Reset refused on this platform");
        })?;

        let removed = self.ctx.user_repo().delete_all().await?;
        info!(removed, "Reset all users");
        Ok(removed)
    }

    /// Drop refresh tokens that are past their expiry
    #[instrument(skip(self))]
    pub async fn purge_expired_refresh_tokens(&self) -> ServiceResult<u64> {
        Ok(self.ctx.refresh_token_store().purge_expired().await?)
    }
}
