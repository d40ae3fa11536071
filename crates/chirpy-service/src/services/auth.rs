//! Authentication service
//!
//! Handles registration, login, password and account changes, and refresh
//! token redemption and revocation. Password hashing is CPU-bound and runs on the
//! blocking pool.

use chirpy_common::{validate_password_strength, AuthError};
use chirpy_core::{UserCredentials, UserId};
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use crate::dto::{
    AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, TokenResponse,
    UpdateAccountRequest, UserResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Run a hashing closure on the blocking pool
async fn run_blocking<T, F>(f: F) -> Result<T, AuthError>
where
    F: FnOnce() -> Result<T, AuthError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
}

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new account
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<UserResponse> {
        request.validate()?;
        validate_password_strength(&request.password)?;

        let passwords = self.ctx.password_service().clone();
        let password = request.password;
        let password_hash = run_blocking(move || passwords.hash(&password)).await?;

        let user = UserCredentials::new(request.email, password_hash);
        self.ctx.user_repo().create(&user).await?;

        info!(user_id = %user.id, "User registered successfully");
        Ok(UserResponse::from(&user))
    }

    /// Login with email and password
    ///
    /// The session token and the refresh token are issued as a unit: if the
    /// refresh token cannot be stored, the login fails.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        request.validate()?;

        let passwords = self.ctx.password_service().clone();
        let password = request.password;

        let Some(user) = self
            .ctx
            .user_repo()
            .find_by_email(&request.email)
            .await
            .map_err(AuthError::from)?
        else {
            // Same Argon2 cost as a wrong password
            let err = run_blocking(move || Ok(passwords.reject_unknown_user(&password))).await?;
            warn!("Login failed: user not found");
            return Err(err.into());
        };

        let hash = user.password_hash.clone();
        run_blocking(move || passwords.verify_or_error(&password, &hash))
            .await
            .inspect_err(|_| warn!(user_id = %user.id, "Login failed: invalid password"))?;

        let access_token = self.ctx.token_service().issue_session(user.id)?;
        let refresh_token = self.ctx.refresh_token_store().issue(user.id).await?;

        info!(user_id = %user.id, "User logged in successfully");

        Ok(AuthResponse::new(
            access_token,
            refresh_token,
            self.ctx.token_service().session_token_expiry().num_seconds(),
            UserResponse::from(&user),
        ))
    }

    /// Replace the caller's password after re-checking the current one
    #[instrument(skip(self, request))]
    pub async fn change_password(
        &self,
        user_id: UserId,
        request: ChangePasswordRequest,
    ) -> ServiceResult<()> {
        request.validate()?;
        validate_password_strength(&request.new_password)?;

        let new_hash = self
            .verify_and_rehash(user_id, request.current_password, request.new_password)
            .await?;
        self.ctx.user_repo().update_password(user_id, &new_hash).await?;

        info!(user_id = %user_id, "Password changed");
        Ok(())
    }

    /// Replace the caller's email and password together
    ///
    /// The current password is re-checked first. An email held by another
    /// user is a conflict and leaves the account unchanged.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn update_account(
        &self,
        user_id: UserId,
        request: UpdateAccountRequest,
    ) -> ServiceResult<UserResponse> {
        request.validate()?;
        validate_password_strength(&request.new_password)?;

        let new_hash = self
            .verify_and_rehash(user_id, request.current_password, request.new_password)
            .await?;
        let user = self
            .ctx
            .user_repo()
            .update_credentials(user_id, &request.email, &new_hash)
            .await
            .inspect_err(|e| warn!(user_id = %user_id, error = %e, "Account update failed"))?;

        info!(user_id = %user_id, "Account updated");
        Ok(UserResponse::from(&user))
    }

    /// Check `current_password` against the stored digest and hash `new_password`
    async fn verify_and_rehash(
        &self,
        user_id: UserId,
        current_password: String,
        new_password: String,
    ) -> ServiceResult<String> {
        let current_hash = self
            .ctx
            .user_repo()
            .get_password_hash(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id.to_string()))?;

        let passwords = self.ctx.password_service().clone();
        let new_hash = run_blocking(move || {
            passwords.verify_or_error(&current_password, &current_hash)?;
            passwords.hash(&new_password)
        })
        .await?;

        Ok(new_hash)
    }

    /// Exchange a refresh token for a new session token
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh(&self, refresh_token: &str) -> ServiceResult<TokenResponse> {
        let user_id = self.ctx.refresh_token_store().redeem(refresh_token).await?;
        let access_token = self.ctx.token_service().issue_session(user_id)?;

        debug!(user_id = %user_id, "Issued session token from refresh token");
        Ok(TokenResponse::new(
            access_token,
            self.ctx.token_service().session_token_expiry().num_seconds(),
        ))
    }

    /// Revoke a refresh token. Unknown tokens are not an error.
    #[instrument(skip(self, refresh_token))]
    pub async fn revoke(&self, refresh_token: &str) -> ServiceResult<()> {
        let existed = self.ctx.refresh_token_store().revoke(refresh_token).await?;
        debug!(existed, "Refresh token revoke requested");
        Ok(())
    }
}
