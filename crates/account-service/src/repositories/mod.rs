//! Account store interface and database access layer.
//!
//! The service depends only on the [`AccountStore`] trait; the Postgres
//! implementation lives in [`accounts`]. Test suites inject an in-memory
//! implementation with the same atomicity guarantees.

pub mod accounts;

pub use accounts::PgAccountStore;

use crate::errors::AccountError;
use crate::models::{Account, AccountChanges, NewAccount};
use async_trait::async_trait;
use uuid::Uuid;

/// Durable key-value persistence of account records, keyed by account id and
/// by email.
///
/// Absence is data, not an error: lookups return `Option`/`bool` and reserve
/// `Err` for infrastructure failures. Two operations must be atomic at the
/// store, not merely ordered by the caller:
///
/// - [`create_if_email_absent`](AccountStore::create_if_email_absent) - a
///   single conditional insert, so two concurrent registrations with the
///   same email cannot both pass an existence check.
/// - [`clear_otp_if_matches`](AccountStore::clear_otp_if_matches) - a single
///   conditional update, so a verification code is consumed exactly once
///   even under concurrent attempts.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Look up an account by (already normalized) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountError>;

    /// Look up an account by id.
    async fn find_by_id(&self, account_id: Uuid) -> Result<Option<Account>, AccountError>;

    /// Atomic conditional insert. `None` when the email is already taken.
    async fn create_if_email_absent(
        &self,
        new_account: NewAccount,
    ) -> Result<Option<Account>, AccountError>;

    /// Partial update with merge semantics: `None` fields keep their stored
    /// value. Returns the updated record, or `None` for an unknown id.
    async fn update_fields(
        &self,
        account_id: Uuid,
        changes: AccountChanges,
    ) -> Result<Option<Account>, AccountError>;

    /// Atomic consume of an outstanding challenge: marks the account
    /// verified and clears both OTP fields in one step, only if `otp_hash`
    /// still matches the stored value. Returns whether a challenge was
    /// consumed.
    async fn clear_otp_if_matches(
        &self,
        account_id: Uuid,
        otp_hash: &str,
    ) -> Result<bool, AccountError>;

    /// Permanently remove the record. Returns whether a record existed.
    async fn delete(&self, account_id: Uuid) -> Result<bool, AccountError>;
}
