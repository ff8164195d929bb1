//! Deterministic fixtures and a ready-made service harness.

use crate::memory_store::InMemoryAccountStore;
use crate::otp_capture::CapturingOtpDelivery;
use account_service::config::{Config, MIN_BCRYPT_COST};
use account_service::models::RegisterRequest;
use account_service::services::AccountService;
use secrecy::SecretString;
use std::sync::Arc;

/// Deterministic 32-byte master key. Fixed bytes keep ciphertext and
/// challenge hashes reproducible across runs.
pub fn test_master_key() -> Vec<u8> {
    vec![7u8; 32]
}

/// Config wired for tests: deterministic keys and the lowest valid bcrypt
/// cost so hashing does not dominate test time.
pub fn test_config() -> Config {
    Config {
        database_url: "postgresql://localhost/unused-in-memory-tests".to_string(),
        master_key: test_master_key(),
        jwt_secret: SecretString::from("test-signing-secret"),
        bcrypt_cost: MIN_BCRYPT_COST,
        token_ttl_seconds: 3600,
    }
}

/// A registration request with fixed names, matching the canonical
/// walkthrough scenario ("Jo"/"Do").
pub fn register_request(email: &str, password: &str) -> RegisterRequest {
    RegisterRequest {
        email: email.to_string(),
        password: SecretString::from(password.to_string()),
        first_name: "Jo".to_string(),
        last_name: "Do".to_string(),
    }
}

/// Service plus handles on its injected collaborators, so tests can reach
/// behind the public API: the store for state assertions, the delivery for
/// the plaintext code.
pub struct TestHarness {
    pub service: AccountService,
    pub store: Arc<InMemoryAccountStore>,
    pub delivery: Arc<CapturingOtpDelivery>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        let store = Arc::new(InMemoryAccountStore::new());
        let delivery = Arc::new(CapturingOtpDelivery::new());
        let service = AccountService::new(store.clone(), delivery.clone(), &config);
        Self {
            service,
            store,
            delivery,
        }
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
