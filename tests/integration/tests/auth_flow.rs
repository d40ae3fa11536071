//! End-to-end authentication flows over the in-memory store
//!
//! Run with: cargo test -p integration-tests --test auth_flow

use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chirpy_api::{ApiError, ApiKeyAuth, AuthUser, DevelopmentOnly};
use chirpy_common::{AuthError, TokenService};
use chirpy_core::traits::UserRepository;
use chirpy_core::UserId;
use chirpy_service::dto::{ChangePasswordRequest, UpdateAccountRequest, WebhookData, WebhookEvent};
use chirpy_service::{
    AdminService, AuthService, ChirpService, ServiceError, WebhookOutcome, WebhookService,
};
use integration_tests::{
    bearer, login_for, request_parts, unique_registration, TestApp, TEST_POLKA_KEY,
};

async fn error_body(err: ApiError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// ============================================================================
// Login / Session Tests
// ============================================================================

#[tokio::test]
async fn test_login_token_authenticates_requests() {
    let app = TestApp::new().unwrap();
    let registration = unique_registration();
    let auth = AuthService::new(app.ctx());

    let user = auth.register(registration.clone()).await.unwrap();
    let session = auth.login(login_for(&registration)).await.unwrap();

    let mut parts = request_parts(Some(&bearer(&session.access_token))).unwrap();
    let caller = AuthUser::from_request_parts(&mut parts, &app.state).await.unwrap();

    assert_eq!(caller.user_id.to_string(), user.id);
}

#[tokio::test]
async fn test_refresh_then_revoke() {
    let app = TestApp::new().unwrap();
    let registration = unique_registration();
    let auth = AuthService::new(app.ctx());
    auth.register(registration.clone()).await.unwrap();
    let session = auth.login(login_for(&registration)).await.unwrap();

    let refreshed = auth.refresh(&session.refresh_token).await.unwrap();
    let mut parts = request_parts(Some(&bearer(&refreshed.access_token))).unwrap();
    assert!(AuthUser::from_request_parts(&mut parts, &app.state).await.is_ok());

    auth.revoke(&session.refresh_token).await.unwrap();
    let err = auth.refresh(&session.refresh_token).await.unwrap_err();
    assert_eq!(err.status_code(), 401);

    // Session tokens stay valid until they expire on their own
    let mut parts = request_parts(Some(&bearer(&refreshed.access_token))).unwrap();
    assert!(AuthUser::from_request_parts(&mut parts, &app.state).await.is_ok());
}

#[tokio::test]
async fn test_each_login_gets_its_own_refresh_token() {
    let app = TestApp::new().unwrap();
    let registration = unique_registration();
    let auth = AuthService::new(app.ctx());
    auth.register(registration.clone()).await.unwrap();

    let first = auth.login(login_for(&registration)).await.unwrap();
    let second = auth.login(login_for(&registration)).await.unwrap();

    assert_ne!(first.refresh_token, second.refresh_token);
    assert_eq!(app.store.refresh_token_count(), 2);

    auth.revoke(&first.refresh_token).await.unwrap();
    assert!(auth.refresh(&second.refresh_token).await.is_ok());
}

#[tokio::test]
async fn test_concurrent_logins() {
    let app = TestApp::new().unwrap();
    let registration = unique_registration();
    AuthService::new(app.ctx())
        .register(registration.clone())
        .await
        .unwrap();

    let ctx = app.ctx().clone();
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let ctx = ctx.clone();
            let login = login_for(&registration);
            tokio::spawn(async move { AuthService::new(&ctx).login(login).await })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }
    assert_eq!(app.store.refresh_token_count(), 8);
}

#[tokio::test]
async fn test_password_change_invalidates_old_password() {
    let app = TestApp::new().unwrap();
    let registration = unique_registration();
    let auth = AuthService::new(app.ctx());
    auth.register(registration.clone()).await.unwrap();
    let session = auth.login(login_for(&registration)).await.unwrap();

    let mut parts = request_parts(Some(&bearer(&session.access_token))).unwrap();
    let caller = AuthUser::from_request_parts(&mut parts, &app.state).await.unwrap();

    auth.change_password(
        caller.user_id,
        ChangePasswordRequest {
            current_password: registration.password.clone(),
            new_password: "brand-new-passphrase".to_string(),
        },
    )
    .await
    .unwrap();

    let err = auth.login(login_for(&registration)).await.unwrap_err();
    assert!(matches!(err, ServiceError::Auth(AuthError::InvalidCredentials)));
}

#[tokio::test]
async fn test_account_update_moves_login() {
    let app = TestApp::new().unwrap();
    let registration = unique_registration();
    let taken = unique_registration();
    let auth = AuthService::new(app.ctx());
    auth.register(registration.clone()).await.unwrap();
    auth.register(taken.clone()).await.unwrap();
    let session = auth.login(login_for(&registration)).await.unwrap();

    let mut parts = request_parts(Some(&bearer(&session.access_token))).unwrap();
    let caller = AuthUser::from_request_parts(&mut parts, &app.state).await.unwrap();

    let conflict = auth
        .update_account(
            caller.user_id,
            UpdateAccountRequest {
                email: taken.email.clone(),
                current_password: registration.password.clone(),
                new_password: "brand-new-passphrase".to_string(),
            },
        )
        .await
        .unwrap_err();
    let (status, _) = error_body(ApiError::from(conflict)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let moved = unique_registration();
    let updated = auth
        .update_account(
            caller.user_id,
            UpdateAccountRequest {
                email: moved.email.clone(),
                current_password: registration.password.clone(),
                new_password: moved.password.clone(),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.id, caller.user_id.to_string());

    assert!(auth.login(login_for(&registration)).await.is_err());
    let session = auth.login(login_for(&moved)).await.unwrap();
    assert_eq!(session.user.email, moved.email);

    // The existing session token still identifies the same user
    let mut parts = request_parts(Some(&bearer(&session.access_token))).unwrap();
    let again = AuthUser::from_request_parts(&mut parts, &app.state).await.unwrap();
    assert_eq!(again.user_id, caller.user_id);
}

// ============================================================================
// Rejection Tests
// ============================================================================

#[tokio::test]
async fn test_foreign_and_forged_tokens_rejected_identically() {
    let app = TestApp::new().unwrap();
    let outsider = TokenService::new("someone-elses-secret", chrono::Duration::hours(1));
    let forged = outsider.issue_session(UserId::generate()).unwrap();

    let mut expected = None;
    for header in [
        None,
        Some("Bearer".to_string()),
        Some(bearer("garbage")),
        Some(bearer(&forged)),
    ] {
        let mut parts = request_parts(header.as_deref()).unwrap();
        let err = AuthUser::from_request_parts(&mut parts, &app.state)
            .await
            .unwrap_err();
        let rendered = error_body(err).await;

        assert_eq!(rendered.0, StatusCode::UNAUTHORIZED);
        match &expected {
            None => expected = Some(rendered),
            Some(first) => assert_eq!(&rendered, first),
        }
    }
}

#[tokio::test]
async fn test_wrong_password_matches_unknown_email() {
    let app = TestApp::new().unwrap();
    let registration = unique_registration();
    let auth = AuthService::new(app.ctx());
    auth.register(registration.clone()).await.unwrap();

    let mut wrong = login_for(&registration);
    wrong.password = "nope-nope-nope".to_string();
    let unknown = login_for(&unique_registration());

    let a = error_body(auth.login(wrong).await.unwrap_err().into()).await;
    let b = error_body(auth.login(unknown).await.unwrap_err().into()).await;
    assert_eq!(a, b);
    assert_eq!(a.0, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Authorization Tests
// ============================================================================

#[tokio::test]
async fn test_only_owner_deletes_chirp() {
    let app = TestApp::new().unwrap();
    let auth = AuthService::new(app.ctx());

    let owner_reg = unique_registration();
    let other_reg = unique_registration();
    let owner = auth.register(owner_reg.clone()).await.unwrap();
    auth.register(other_reg.clone()).await.unwrap();

    let owner_id: UserId = owner.id.parse().unwrap();
    let chirp_id = app.store.insert_chirp(owner_id);

    let other_session = auth.login(login_for(&other_reg)).await.unwrap();
    let mut parts = request_parts(Some(&bearer(&other_session.access_token))).unwrap();
    let other = AuthUser::from_request_parts(&mut parts, &app.state).await.unwrap();

    let err = ChirpService::new(app.ctx())
        .delete(other.user_id, chirp_id)
        .await
        .unwrap_err();
    let (status, body) = error_body(err.into()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    let owner_session = auth.login(login_for(&owner_reg)).await.unwrap();
    let mut parts = request_parts(Some(&bearer(&owner_session.access_token))).unwrap();
    let caller = AuthUser::from_request_parts(&mut parts, &app.state).await.unwrap();

    ChirpService::new(app.ctx())
        .delete(caller.user_id, chirp_id)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_reset_only_in_development() {
    let prod = TestApp::new().unwrap();
    let registration = unique_registration();
    AuthService::new(prod.ctx())
        .register(registration.clone())
        .await
        .unwrap();
    let session = AuthService::new(prod.ctx())
        .login(login_for(&registration))
        .await
        .unwrap();

    // A valid session does not get past the platform gate
    let mut parts = request_parts(Some(&bearer(&session.access_token))).unwrap();
    let err = DevelopmentOnly::from_request_parts(&mut parts, &prod.state)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    assert!(AdminService::new(prod.ctx()).reset().await.is_err());
    assert_eq!(prod.store.user_count(), 1);

    let dev = TestApp::on_platform("dev").unwrap();
    dev.store
        .create(&chirpy_core::UserCredentials::new("a@example.com", "digest"))
        .await
        .unwrap();
    let mut parts = request_parts(None).unwrap();
    assert!(DevelopmentOnly::from_request_parts(&mut parts, &dev.state)
        .await
        .is_ok());
    assert_eq!(AdminService::new(dev.ctx()).reset().await.unwrap(), 1);
    assert_eq!(dev.store.user_count(), 0);
}

#[tokio::test]
async fn test_webhook_key() {
    let app = TestApp::new().unwrap();

    for (header, ok) in [
        (format!("ApiKey {TEST_POLKA_KEY}"), true),
        (format!("apikey {TEST_POLKA_KEY}"), true),
        ("ApiKey wrong".to_string(), false),
        (format!("Bearer {TEST_POLKA_KEY}"), false),
    ] {
        let mut parts = request_parts(Some(&header)).unwrap();
        let result = ApiKeyAuth::from_request_parts(&mut parts, &app.state).await;
        assert_eq!(result.is_ok(), ok, "{header}");
        if let Err(err) = result {
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        }
    }
}

#[tokio::test]
async fn test_webhook_upgrade_behind_key() {
    let app = TestApp::new().unwrap();
    let registration = unique_registration();
    let auth = AuthService::new(app.ctx());
    let user = auth.register(registration.clone()).await.unwrap();
    assert!(!user.is_chirpy_red);

    let mut parts = request_parts(Some(&format!("ApiKey {TEST_POLKA_KEY}"))).unwrap();
    ApiKeyAuth::from_request_parts(&mut parts, &app.state).await.unwrap();

    let webhooks = WebhookService::new(app.ctx());
    let upgrade = |user_id: &str| WebhookEvent {
        event: "user.upgraded".to_string(),
        data: WebhookData {
            user_id: user_id.to_string(),
        },
    };

    assert_eq!(webhooks.handle(upgrade(&user.id)).await.unwrap(), WebhookOutcome::Upgraded);
    let session = auth.login(login_for(&registration)).await.unwrap();
    assert!(session.user.is_chirpy_red);

    let missing = webhooks
        .handle(upgrade(&UserId::generate().to_string()))
        .await
        .unwrap_err();
    let (status, _) = error_body(ApiError::from(missing)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
