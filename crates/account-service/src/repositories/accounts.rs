//! Postgres implementation of the account store.
//!
//! Every conditional operation is a single SQL statement so the database,
//! not the caller, arbitrates races: `ON CONFLICT DO NOTHING` for the
//! uniqueness-guarded insert, a guarded `UPDATE` for the challenge consume.

use crate::errors::AccountError;
use crate::models::{Account, AccountChanges, NewAccount};
use crate::repositories::AccountStore;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// Shared store handle over a sqlx connection pool. The pool is opened by
/// the embedding process at startup and injected here.
#[derive(Debug, Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT
                account_id, email, password_hash, first_name_enc, last_name_enc,
                is_email_verified, otp_hash, otp_expires_at, created_at, updated_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccountError::Database(format!("Failed to fetch account by email: {}", e)))?;

        Ok(account)
    }

    async fn find_by_id(&self, account_id: Uuid) -> Result<Option<Account>, AccountError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT
                account_id, email, password_hash, first_name_enc, last_name_enc,
                is_email_verified, otp_hash, otp_expires_at, created_at, updated_at
            FROM accounts
            WHERE account_id = $1
            "#,
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccountError::Database(format!("Failed to fetch account by id: {}", e)))?;

        Ok(account)
    }

    async fn create_if_email_absent(
        &self,
        new_account: NewAccount,
    ) -> Result<Option<Account>, AccountError> {
        // ON CONFLICT DO NOTHING + RETURNING yields no row when the email is
        // taken, which is exactly the "already exists" signal.
        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (email, password_hash, first_name_enc, last_name_enc, otp_hash, otp_expires_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (email) DO NOTHING
            RETURNING
                account_id, email, password_hash, first_name_enc, last_name_enc,
                is_email_verified, otp_hash, otp_expires_at, created_at, updated_at
            "#,
        )
        .bind(&new_account.email)
        .bind(&new_account.password_hash)
        .bind(&new_account.first_name_enc)
        .bind(&new_account.last_name_enc)
        .bind(&new_account.otp_hash)
        .bind(new_account.otp_expires_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccountError::Database(format!("Failed to create account: {}", e)))?;

        Ok(account)
    }

    async fn update_fields(
        &self,
        account_id: Uuid,
        changes: AccountChanges,
    ) -> Result<Option<Account>, AccountError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
            SET
                password_hash = COALESCE($2, password_hash),
                first_name_enc = COALESCE($3, first_name_enc),
                last_name_enc = COALESCE($4, last_name_enc),
                updated_at = NOW()
            WHERE account_id = $1
            RETURNING
                account_id, email, password_hash, first_name_enc, last_name_enc,
                is_email_verified, otp_hash, otp_expires_at, created_at, updated_at
            "#,
        )
        .bind(account_id)
        .bind(&changes.password_hash)
        .bind(&changes.first_name_enc)
        .bind(&changes.last_name_enc)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccountError::Database(format!("Failed to update account: {}", e)))?;

        Ok(account)
    }

    async fn clear_otp_if_matches(
        &self,
        account_id: Uuid,
        otp_hash: &str,
    ) -> Result<bool, AccountError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET is_email_verified = TRUE, otp_hash = NULL, otp_expires_at = NULL, updated_at = NOW()
            WHERE account_id = $1 AND otp_hash = $2
            "#,
        )
        .bind(account_id)
        .bind(otp_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| AccountError::Database(format!("Failed to consume challenge: {}", e)))?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, account_id: Uuid) -> Result<bool, AccountError> {
        let result = sqlx::query(
            r#"
            DELETE FROM accounts
            WHERE account_id = $1
            "#,
        )
        .bind(account_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AccountError::Database(format!("Failed to delete account: {}", e)))?;

        Ok(result.rows_affected() == 1)
    }
}
