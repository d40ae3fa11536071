//! Test helpers for integration tests

use std::sync::Arc;

use anyhow::Result;
use axum::http::{header::AUTHORIZATION, request::Parts, Request};
use chirpy_api::AppState;
use chirpy_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use chirpy_db::MemoryStore;
use chirpy_service::ServiceContext;

use crate::fixtures::TEST_POLKA_KEY;

/// Install a test subscriber once; later calls are no-ops
pub fn init_test_tracing() {
    let _ = try_init_tracing_with_config(TracingConfig::development());
}

/// Build configuration for a test app on the given platform
///
/// # Errors
/// Returns an error if the configuration does not validate
pub fn test_config(platform: &str) -> Result<AppConfig> {
    let platform = platform.to_string();
    Ok(AppConfig::from_lookup(move |key| match key {
        "DB_URL" => Some("postgres://unused/chirpy_test".to_string()),
        "JWT_SECRET" => Some("integration-test-secret".to_string()),
        "POLKA_KEY" => Some(TEST_POLKA_KEY.to_string()),
        "PLATFORM" => Some(platform.clone()),
        _ => None,
    })?)
}

/// Fully wired application over an in-memory store
pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub state: AppState,
}

impl TestApp {
    /// A production deployment
    ///
    /// # Errors
    /// Returns an error if the configuration does not validate
    pub fn new() -> Result<Self> {
        Self::on_platform("production")
    }

    /// A deployment on `platform`
    ///
    /// # Errors
    /// Returns an error if the configuration does not validate
    pub fn on_platform(platform: &str) -> Result<Self> {
        init_test_tracing();

        let config = test_config(platform)?;
        let store = Arc::new(MemoryStore::new());
        let ctx = ServiceContext::new(&config, store.clone(), store.clone(), store.clone());

        Ok(Self {
            store,
            state: AppState::new(ctx, config),
        })
    }

    pub fn ctx(&self) -> &ServiceContext {
        self.state.service_context()
    }
}

/// Request parts carrying an optional `Authorization` header
///
/// # Errors
/// Returns an error if the header value is not a valid HTTP header
pub fn request_parts(authorization: Option<&str>) -> Result<Parts> {
    let mut builder = Request::builder().uri("/api/chirps");
    if let Some(value) = authorization {
        builder = builder.header(AUTHORIZATION, value);
    }
    Ok(builder.body(())?.into_parts().0)
}

/// `Authorization` value for a session token
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
