//! Metrics definitions for the account service.
//!
//! All metrics follow Prometheus naming conventions:
//! - `account_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded to prevent cardinality explosion:
//! - registration `status`: success, conflict, validation_error
//! - login `status`: success, invalid_credentials, unverified
//! - otp verification `status`: success, expired, mismatch, no_challenge,
//!   already_verified
//! - password change `status`: success, mismatch
//! - bcrypt `operation`: hash, verify
//!
//! The facade has no exporter wired here; the embedding process installs
//! whichever recorder it scrapes.

use metrics::{counter, histogram};
use std::time::Duration;

/// Record a registration outcome
///
/// Metric: `account_registrations_total`
/// Labels: `status`
pub fn record_registration(status: &str) {
    counter!("account_registrations_total", "status" => status.to_string()).increment(1);
}

/// Record a login outcome
///
/// Metric: `account_logins_total`
/// Labels: `status`
pub fn record_login(status: &str) {
    counter!("account_logins_total", "status" => status.to_string()).increment(1);
}

/// Record an email-verification outcome
///
/// Metric: `account_otp_verifications_total`
/// Labels: `status`
pub fn record_otp_verification(status: &str) {
    counter!("account_otp_verifications_total", "status" => status.to_string()).increment(1);
}

/// Record a failed out-of-band delivery of a verification code
///
/// Metric: `account_otp_delivery_failures_total`
pub fn record_otp_delivery_failure() {
    counter!("account_otp_delivery_failures_total").increment(1);
}

/// Record a password-change outcome
///
/// Metric: `account_password_changes_total`
/// Labels: `status`
pub fn record_password_change(status: &str) {
    counter!("account_password_changes_total", "status" => status.to_string()).increment(1);
}

/// Record an account deletion
///
/// Metric: `account_deletions_total`
pub fn record_account_deletion() {
    counter!("account_deletions_total").increment(1);
}

/// Record bcrypt work duration
///
/// Metric: `account_bcrypt_duration_seconds`
/// Labels: `operation` (hash, verify)
///
/// Bcrypt cost is deliberate CPU spend; this histogram is how a cost-factor
/// change shows up in latency dashboards.
pub fn record_bcrypt_duration(operation: &str, duration: Duration) {
    histogram!("account_bcrypt_duration_seconds", "operation" => operation.to_string())
        .record(duration.as_secs_f64());
}
