//! In-memory account store for service-level tests.

use account_service::errors::AccountError;
use account_service::models::{Account, AccountChanges, NewAccount};
use account_service::repositories::AccountStore;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// In-memory [`AccountStore`] backed by a single mutex-guarded map.
///
/// Holding the lock across check+insert and read+clear makes the conditional
/// insert and the challenge consume atomic, matching the single-statement
/// guarantees of the Postgres store. No await happens while the lock is held.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: Mutex<HashMap<Uuid, Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts. Used by concurrency tests to assert that
    /// a race produced exactly one record.
    pub fn account_count(&self) -> usize {
        self.guard().map(|g| g.len()).unwrap_or(0)
    }

    /// Rewind an outstanding challenge's expiry into the past, so tests can
    /// exercise the expired path without sleeping through the window.
    pub fn force_expire_otp(&self, email: &str) -> bool {
        let Ok(mut accounts) = self.guard() else {
            return false;
        };
        for account in accounts.values_mut() {
            if account.email == email && account.otp_expires_at.is_some() {
                account.otp_expires_at = Some(Utc::now() - Duration::seconds(1));
                return true;
            }
        }
        false
    }

    fn guard(&self) -> Result<MutexGuard<'_, HashMap<Uuid, Account>>, AccountError> {
        self.accounts
            .lock()
            .map_err(|_| AccountError::Database("store mutex poisoned".to_string()))
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountError> {
        let accounts = self.guard()?;
        Ok(accounts.values().find(|a| a.email == email).cloned())
    }

    async fn find_by_id(&self, account_id: Uuid) -> Result<Option<Account>, AccountError> {
        let accounts = self.guard()?;
        Ok(accounts.get(&account_id).cloned())
    }

    async fn create_if_email_absent(
        &self,
        new_account: NewAccount,
    ) -> Result<Option<Account>, AccountError> {
        let mut accounts = self.guard()?;

        if accounts.values().any(|a| a.email == new_account.email) {
            return Ok(None);
        }

        let now = Utc::now();
        let account = Account {
            account_id: Uuid::new_v4(),
            email: new_account.email,
            password_hash: new_account.password_hash,
            first_name_enc: new_account.first_name_enc,
            last_name_enc: new_account.last_name_enc,
            is_email_verified: false,
            otp_hash: Some(new_account.otp_hash),
            otp_expires_at: Some(new_account.otp_expires_at),
            created_at: now,
            updated_at: now,
        };

        accounts.insert(account.account_id, account.clone());
        Ok(Some(account))
    }

    async fn update_fields(
        &self,
        account_id: Uuid,
        changes: AccountChanges,
    ) -> Result<Option<Account>, AccountError> {
        let mut accounts = self.guard()?;

        let Some(account) = accounts.get_mut(&account_id) else {
            return Ok(None);
        };

        if let Some(password_hash) = changes.password_hash {
            account.password_hash = password_hash;
        }
        if let Some(first_name_enc) = changes.first_name_enc {
            account.first_name_enc = first_name_enc;
        }
        if let Some(last_name_enc) = changes.last_name_enc {
            account.last_name_enc = last_name_enc;
        }
        account.updated_at = Utc::now();

        Ok(Some(account.clone()))
    }

    async fn clear_otp_if_matches(
        &self,
        account_id: Uuid,
        otp_hash: &str,
    ) -> Result<bool, AccountError> {
        let mut accounts = self.guard()?;

        let Some(account) = accounts.get_mut(&account_id) else {
            return Ok(false);
        };

        if account.otp_hash.as_deref() != Some(otp_hash) {
            return Ok(false);
        }

        account.is_email_verified = true;
        account.otp_hash = None;
        account.otp_expires_at = None;
        account.updated_at = Utc::now();
        Ok(true)
    }

    async fn delete(&self, account_id: Uuid) -> Result<bool, AccountError> {
        let mut accounts = self.guard()?;
        Ok(accounts.remove(&account_id).is_some())
    }
}
