//! Service context - dependency container for services
//!
//! Holds the storage ports plus the auth components configured from
//! [`AppConfig`]. Cloning is cheap; everything is behind `Arc`.

use std::sync::Arc;

use chirpy_common::{AppConfig, PasswordService, TokenService};
use chirpy_core::traits::{ChirpRepository, RefreshTokenRepository, UserRepository};

use super::guard::AuthorizationGuard;
use super::refresh_token::RefreshTokenStore;

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    user_repo: Arc<dyn UserRepository>,
    chirp_repo: Arc<dyn ChirpRepository>,

    // Auth components
    refresh_token_store: RefreshTokenStore,
    token_service: Arc<TokenService>,
    password_service: PasswordService,
    guard: AuthorizationGuard,
}

impl ServiceContext {
    /// Wire the auth components from `config` over the given repositories
    #[must_use]
    pub fn new(
        config: &AppConfig,
        user_repo: Arc<dyn UserRepository>,
        refresh_token_repo: Arc<dyn RefreshTokenRepository>,
        chirp_repo: Arc<dyn ChirpRepository>,
    ) -> Self {
        let token_service = Arc::new(TokenService::new(
            &config.auth.jwt_secret,
            config.auth.session_token_ttl(),
        ));
        let refresh_token_store =
            RefreshTokenStore::with_ttl(refresh_token_repo, config.auth.refresh_token_ttl());
        let guard = AuthorizationGuard::from_config(token_service.clone(), config);

        Self {
            user_repo,
            chirp_repo,
            refresh_token_store,
            token_service,
            password_service: PasswordService::new(),
            guard,
        }
    }

    // === Repositories ===

    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    /// Get the chirp repository
    pub fn chirp_repo(&self) -> &dyn ChirpRepository {
        self.chirp_repo.as_ref()
    }

    // === Auth ===

    /// Get the refresh token store
    pub fn refresh_token_store(&self) -> &RefreshTokenStore {
        &self.refresh_token_store
    }

    /// Get the session token service
    pub fn token_service(&self) -> &TokenService {
        self.token_service.as_ref()
    }

    pub fn password_service(&self) -> &PasswordService {
        &self.password_service
    }

    /// Get the authorization guard
    pub fn guard(&self) -> &AuthorizationGuard {
        &self.guard
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("refresh_token_store", &self.refresh_token_store)
            .field("guard", &self.guard)
            .finish_non_exhaustive()
    }
}
