//! Race tests for the two store-level atomicity guarantees.
//!
//! The service is shared across real OS threads via a multi-thread runtime;
//! the in-memory store arbitrates with the same one-guard-per-operation
//! semantics the Postgres statements provide.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use account_service::errors::AccountError;
use account_service::repositories::AccountStore;
use account_service::services::AccountService;
use account_test_utils::{register_request, TestHarness};
use std::sync::Arc;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registration_creates_exactly_one_account() {
    let harness = TestHarness::new();
    let service = Arc::new(harness.service);

    let mut handles = Vec::new();
    for _ in 0..2 {
        let service: Arc<AccountService> = service.clone();
        handles.push(tokio::spawn(async move {
            service
                .register(register_request("race@x.com", "Pw123456!"))
                .await
        }));
    }

    let mut successes = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.expect("task must not panic") {
            Ok(_) => successes += 1,
            Err(AccountError::DuplicateEmail) => conflicts += 1,
            Err(other) => panic!("unexpected failure: {:?}", other),
        }
    }

    assert_eq!(successes, 1, "exactly one registration wins");
    assert_eq!(conflicts, 1, "the other fails with the conflict");
    assert_eq!(harness.store.account_count(), 1, "no duplicate record");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_verification_consumes_challenge_once() {
    let harness = TestHarness::new();
    harness
        .service
        .register(register_request("race@x.com", "Pw123456!"))
        .await
        .unwrap();
    let code = harness.delivery.last_code_for("race@x.com").unwrap();

    let service = Arc::new(harness.service);
    let mut handles = Vec::new();
    for _ in 0..2 {
        let service = service.clone();
        let code = code.clone();
        handles.push(tokio::spawn(async move {
            service.verify_email("race@x.com", &code).await
        }));
    }

    let mut successes = 0;
    let mut rejections = 0;
    for handle in handles {
        match handle.await.expect("task must not panic") {
            Ok(_) => successes += 1,
            // The loser observes either the consumed challenge or the
            // already-verified account, depending on where it was overtaken.
            Err(AccountError::NoChallengeOutstanding) | Err(AccountError::AlreadyVerified) => {
                rejections += 1
            }
            Err(other) => panic!("unexpected failure: {:?}", other),
        }
    }

    assert_eq!(successes, 1, "exactly one verification consumes the code");
    assert_eq!(rejections, 1);

    let account = harness
        .store
        .find_by_email("race@x.com")
        .await
        .unwrap()
        .unwrap();
    assert!(account.is_email_verified);
    assert!(account.otp_hash.is_none());
    assert!(account.otp_expires_at.is_none());
}
