//! End-to-end lifecycle tests over the public service API.
//!
//! The store is the in-memory implementation from account-test-utils; the
//! delivery collaborator captures each issued code so the tests can walk the
//! verification flow the way a real user would.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use account_service::errors::AccountError;
use account_service::models::ProfileChanges;
use account_test_utils::{register_request, TestHarness};

#[tokio::test]
async fn test_register_verify_login_walkthrough() {
    let harness = TestHarness::new();

    // Register: new id, pending verification.
    let registered = harness
        .service
        .register(register_request("a@x.com", "Pw123456!"))
        .await
        .expect("registration should succeed");
    assert_eq!(
        registered.message,
        "Registration successful. Please verify your email."
    );

    let profile = harness
        .service
        .get_profile(registered.account_id)
        .await
        .unwrap();
    assert!(!profile.is_email_verified);

    // Login before verification is refused with the distinct message.
    let err = harness
        .service
        .login("a@x.com", "Pw123456!")
        .await
        .expect_err("unverified login must fail");
    assert!(matches!(err, AccountError::EmailNotVerified));

    // Verify with the code the delivery collaborator received.
    let code = harness
        .delivery
        .last_code_for("a@x.com")
        .expect("a code was issued at registration");
    assert_eq!(code.len(), 6);

    harness
        .service
        .verify_email("a@x.com", &code)
        .await
        .expect("verification should succeed");

    // Login now succeeds and returns the decrypted names.
    let login = harness.service.login("a@x.com", "Pw123456!").await.unwrap();
    assert!(!login.access_token.is_empty());
    assert_eq!(login.token_type, "Bearer");
    assert_eq!(login.account.id, registered.account_id);
    assert_eq!(login.account.first_name, "Jo");
    assert_eq!(login.account.last_name, "Do");

    // The token resolves back to the account id, as the transport layer
    // would do for "current caller".
    let resolved = harness.service.verify_token(&login.access_token).unwrap();
    assert_eq!(resolved, registered.account_id);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let harness = TestHarness::new();
    harness
        .service
        .register(register_request("a@x.com", "Pw123456!"))
        .await
        .unwrap();
    let code = harness.delivery.last_code_for("a@x.com").unwrap();
    harness.service.verify_email("a@x.com", &code).await.unwrap();

    let wrong_password = harness
        .service
        .login("a@x.com", "not-the-password")
        .await
        .expect_err("wrong password must fail");
    let unknown_email = harness
        .service
        .login("ghost@x.com", "Pw123456!")
        .await
        .expect_err("unknown email must fail");

    // Same kind, same code, same message: no account enumeration.
    assert!(matches!(wrong_password, AccountError::InvalidCredentials));
    assert!(matches!(unknown_email, AccountError::InvalidCredentials));
    assert_eq!(wrong_password.code(), unknown_email.code());
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
}

#[tokio::test]
async fn test_verification_replay_is_rejected() {
    let harness = TestHarness::new();
    harness
        .service
        .register(register_request("a@x.com", "Pw123456!"))
        .await
        .unwrap();
    let code = harness.delivery.last_code_for("a@x.com").unwrap();

    harness.service.verify_email("a@x.com", &code).await.unwrap();

    // A verified account reports the conflict before looking at the code.
    let replay = harness
        .service
        .verify_email("a@x.com", &code)
        .await
        .expect_err("replay must fail");
    assert!(matches!(replay, AccountError::AlreadyVerified));
}

#[tokio::test]
async fn test_wrong_code_leaves_account_unverified() {
    let harness = TestHarness::new();
    harness
        .service
        .register(register_request("a@x.com", "Pw123456!"))
        .await
        .unwrap();
    let code = harness.delivery.last_code_for("a@x.com").unwrap();

    // Any six-digit value other than the issued one.
    let wrong = if code == "000000" { "000001" } else { "000000" };
    let err = harness
        .service
        .verify_email("a@x.com", wrong)
        .await
        .expect_err("wrong code must fail");
    assert!(matches!(err, AccountError::ChallengeInvalid));

    // Still pending: login stays refused, and the original code still works.
    let err = harness
        .service
        .login("a@x.com", "Pw123456!")
        .await
        .expect_err("still unverified");
    assert!(matches!(err, AccountError::EmailNotVerified));

    harness.service.verify_email("a@x.com", &code).await.unwrap();
}

#[tokio::test]
async fn test_expired_challenge_rejected_even_with_correct_code() {
    let harness = TestHarness::new();
    harness
        .service
        .register(register_request("a@x.com", "Pw123456!"))
        .await
        .unwrap();
    let code = harness.delivery.last_code_for("a@x.com").unwrap();

    assert!(harness.store.force_expire_otp("a@x.com"));

    let err = harness
        .service
        .verify_email("a@x.com", &code)
        .await
        .expect_err("expired challenge must fail");
    assert!(matches!(err, AccountError::ChallengeExpired));
}

#[tokio::test]
async fn test_verify_email_unknown_account() {
    let harness = TestHarness::new();

    let err = harness
        .service
        .verify_email("ghost@x.com", "123456")
        .await
        .expect_err("unknown account must fail");
    assert!(matches!(err, AccountError::NotFound));
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let harness = TestHarness::new();
    harness
        .service
        .register(register_request("a@x.com", "Pw123456!"))
        .await
        .unwrap();

    let err = harness
        .service
        .register(register_request("a@x.com", "Different1!"))
        .await
        .expect_err("duplicate email must conflict");
    assert!(matches!(err, AccountError::DuplicateEmail));
    assert_eq!(harness.store.account_count(), 1);
}

#[tokio::test]
async fn test_email_is_normalized_for_uniqueness_and_login() {
    let harness = TestHarness::new();
    harness
        .service
        .register(register_request("  User@X.com ", "Pw123456!"))
        .await
        .unwrap();

    // Same address in different case is the same account.
    let err = harness
        .service
        .register(register_request("user@x.com", "Pw123456!"))
        .await
        .expect_err("case variant must conflict");
    assert!(matches!(err, AccountError::DuplicateEmail));

    // The challenge was issued for the normalized address.
    let code = harness.delivery.last_code_for("user@x.com").unwrap();
    harness
        .service
        .verify_email("USER@x.com", &code)
        .await
        .unwrap();

    assert!(harness.service.login("User@X.com", "Pw123456!").await.is_ok());
}

#[tokio::test]
async fn test_registration_validation() {
    let harness = TestHarness::new();

    for email in ["", "not-an-email", "a@b", "a@.com"] {
        let err = harness
            .service
            .register(register_request(email, "Pw123456!"))
            .await
            .expect_err("bad email must fail");
        assert!(matches!(err, AccountError::Validation(_)), "email={}", email);
    }

    let err = harness
        .service
        .register(register_request("a@x.com", "short1!"))
        .await
        .expect_err("short password must fail");
    assert!(matches!(err, AccountError::Validation(_)));

    let mut request = register_request("a@x.com", "Pw123456!");
    request.first_name = "   ".to_string();
    let err = harness
        .service
        .register(request)
        .await
        .expect_err("blank name must fail");
    assert!(matches!(err, AccountError::Validation(_)));

    assert_eq!(harness.store.account_count(), 0);
}

#[tokio::test]
async fn test_update_profile_partial_merge() {
    let harness = TestHarness::new();
    let registered = harness
        .service
        .register(register_request("a@x.com", "Pw123456!"))
        .await
        .unwrap();

    let updated = harness
        .service
        .update_profile(
            registered.account_id,
            ProfileChanges {
                first_name: Some("Joanna".to_string()),
                last_name: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.first_name, "Joanna");
    assert_eq!(updated.last_name, "Do", "absent field keeps stored value");

    // The stored ciphertext changed, not just the view.
    let profile = harness
        .service
        .get_profile(registered.account_id)
        .await
        .unwrap();
    assert_eq!(profile.first_name, "Joanna");
}

#[tokio::test]
async fn test_update_profile_unknown_account() {
    let harness = TestHarness::new();

    let err = harness
        .service
        .update_profile(uuid::Uuid::new_v4(), ProfileChanges::default())
        .await
        .expect_err("unknown account must fail");
    assert!(matches!(err, AccountError::NotFound));
}

#[tokio::test]
async fn test_change_password_wrong_current_leaves_hash_untouched() {
    let harness = TestHarness::new();
    let registered = harness
        .service
        .register(register_request("a@x.com", "Pw123456!"))
        .await
        .unwrap();
    let code = harness.delivery.last_code_for("a@x.com").unwrap();
    harness.service.verify_email("a@x.com", &code).await.unwrap();

    let err = harness
        .service
        .change_password(registered.account_id, "wrong-current", "NewPw123456!")
        .await
        .expect_err("wrong current password must fail");
    assert!(matches!(err, AccountError::CurrentPasswordMismatch));

    // The old password still logs in: nothing was replaced.
    assert!(harness.service.login("a@x.com", "Pw123456!").await.is_ok());
}

#[tokio::test]
async fn test_change_password_rotates_credential() {
    let harness = TestHarness::new();
    let registered = harness
        .service
        .register(register_request("a@x.com", "Pw123456!"))
        .await
        .unwrap();
    let code = harness.delivery.last_code_for("a@x.com").unwrap();
    harness.service.verify_email("a@x.com", &code).await.unwrap();

    // A token issued before the change stays valid until its own expiry.
    let old_login = harness.service.login("a@x.com", "Pw123456!").await.unwrap();

    harness
        .service
        .change_password(registered.account_id, "Pw123456!", "NewPw123456!")
        .await
        .unwrap();

    let err = harness
        .service
        .login("a@x.com", "Pw123456!")
        .await
        .expect_err("old password must stop working");
    assert!(matches!(err, AccountError::InvalidCredentials));

    assert!(harness.service.login("a@x.com", "NewPw123456!").await.is_ok());
    assert!(harness.service.verify_token(&old_login.access_token).is_ok());
}

#[tokio::test]
async fn test_delete_account_then_profile_not_found() {
    let harness = TestHarness::new();
    let registered = harness
        .service
        .register(register_request("a@x.com", "Pw123456!"))
        .await
        .unwrap();

    harness
        .service
        .delete_account(registered.account_id)
        .await
        .unwrap();

    let err = harness
        .service
        .get_profile(registered.account_id)
        .await
        .expect_err("deleted account must be gone");
    assert!(matches!(err, AccountError::NotFound));

    let err = harness
        .service
        .delete_account(registered.account_id)
        .await
        .expect_err("second delete has nothing to remove");
    assert!(matches!(err, AccountError::NotFound));
}

#[tokio::test]
async fn test_failed_delivery_does_not_roll_back_registration() {
    use account_service::repositories::AccountStore;
    use account_service::services::AccountService;
    use account_test_utils::{test_config, FailingOtpDelivery, InMemoryAccountStore};
    use std::sync::Arc;

    let store = Arc::new(InMemoryAccountStore::new());
    let service = AccountService::new(
        store.clone(),
        Arc::new(FailingOtpDelivery),
        &test_config(),
    );

    let registered = service
        .register(register_request("a@x.com", "Pw123456!"))
        .await
        .expect("registration survives a delivery failure");

    // The record exists with its challenge outstanding.
    let account = store.find_by_email("a@x.com").await.unwrap().unwrap();
    assert_eq!(account.account_id, registered.account_id);
    assert!(account.otp_hash.is_some());
}

#[tokio::test]
async fn test_tampered_token_is_rejected() {
    let harness = TestHarness::new();
    harness
        .service
        .register(register_request("a@x.com", "Pw123456!"))
        .await
        .unwrap();
    let code = harness.delivery.last_code_for("a@x.com").unwrap();
    harness.service.verify_email("a@x.com", &code).await.unwrap();

    let login = harness.service.login("a@x.com", "Pw123456!").await.unwrap();
    let tampered = format!("{}x", login.access_token);

    let err = harness
        .service
        .verify_token(&tampered)
        .expect_err("tampered token must fail");
    assert!(matches!(err, AccountError::InvalidToken(_)));
}
