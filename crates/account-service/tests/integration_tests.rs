//! Integration tests for the account service
//!
//! This is the top-level integration test harness that Cargo discovers.
//! Test modules are organized in the integration/ subdirectory.

#[path = "integration/lifecycle_tests.rs"]
mod lifecycle_tests;

#[path = "integration/concurrency_tests.rs"]
mod concurrency_tests;
