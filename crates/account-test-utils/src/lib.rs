//! # Account Test Utilities
//!
//! Shared test utilities for the account service.
//!
//! This crate provides:
//! - An in-memory [`AccountStore`](account_service::repositories::AccountStore)
//!   with the same atomicity guarantees as the Postgres store
//! - A capturing [`OtpDelivery`](account_service::services::OtpDelivery) so
//!   tests can read the plaintext verification code the service issued
//! - Deterministic configuration and request fixtures
//!
//! ## Usage
//!
//! ```rust,ignore
//! use account_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() {
//!     let harness = TestHarness::new();
//!
//!     let response = harness
//!         .service
//!         .register(register_request("a@x.com", "Pw123456!"))
//!         .await?;
//!
//!     let code = harness.delivery.last_code_for("a@x.com").unwrap();
//!     harness.service.verify_email("a@x.com", &code).await?;
//! }
//! ```

pub mod fixtures;
pub mod memory_store;
pub mod otp_capture;

pub use fixtures::*;
pub use memory_store::*;
pub use otp_capture::*;
