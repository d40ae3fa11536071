//! Test fixtures and data generators

use std::sync::atomic::{AtomicU64, Ordering};

use chirpy_service::dto::{LoginRequest, RegisterRequest};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Password every fixture account is registered with
pub const TEST_PASSWORD: &str = "TestPass123!";

/// Webhook key configured for every test app
pub const TEST_POLKA_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Registration for a fresh, unique account
pub fn unique_registration() -> RegisterRequest {
    RegisterRequest {
        email: format!("test{}@example.com", unique_suffix()),
        password: TEST_PASSWORD.to_string(),
    }
}

/// Login matching a registration
pub fn login_for(registration: &RegisterRequest) -> LoginRequest {
    LoginRequest {
        email: registration.email.clone(),
        password: registration.password.clone(),
    }
}
