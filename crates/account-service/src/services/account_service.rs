//! Account service module for the credential lifecycle.
//!
//! Orchestrates password hashing, field encryption, the email-verification
//! challenge, and token issuance over the injected [`AccountStore`]. An
//! account moves through three states: unregistered, pending verification,
//! verified. Registration creates the pending record, email verification
//! promotes it, and there is no transition back - login is only reachable
//! from the verified state.

use crate::config::{Config, OTP_TTL_MINUTES};
use crate::crypto::{self, OtpOutcome};
use crate::errors::AccountError;
use crate::models::{
    Account, AccountChanges, AccountSummary, LoginResponse, MessageResponse, NewAccount,
    ProfileChanges, ProfileResponse, RegisterRequest, RegistrationResponse,
};
use crate::observability::metrics::{
    record_account_deletion, record_bcrypt_duration, record_login, record_otp_delivery_failure,
    record_otp_verification, record_password_change, record_registration,
};
use crate::repositories::AccountStore;
use crate::services::otp_delivery::OtpDelivery;
use chrono::{Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;
use uuid::Uuid;

/// Minimum password length, re-checked defensively at registration. The
/// caller-facing contract owns password policy; this only rejects inputs no
/// valid caller can produce.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Bcrypt hash verified when no account matches a login email, so the
/// missing-account and wrong-password paths cost the same time and the
/// caller cannot enumerate registered addresses by timing.
const DUMMY_PASSWORD_HASH: &str = "$2b$12$LQv3c1yqBWVHxkd0LHAkCOYz6TtxMQJqhN8/LewY5GyYqExt7YD3a";

/// Stateless request-scoped orchestration over the injected collaborators.
///
/// Holds no mutable state of its own; the store is the only shared mutable
/// resource, and the secrets are read-only after construction. Safe to share
/// behind an `Arc` across any number of concurrent requests.
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    otp_delivery: Arc<dyn OtpDelivery>,
    master_key: Vec<u8>,
    jwt_secret: SecretString,
    bcrypt_cost: u32,
    token_ttl_seconds: i64,
}

impl AccountService {
    /// Build a service around an injected store, delivery collaborator, and
    /// configuration. No environment access happens past this point.
    pub fn new(
        store: Arc<dyn AccountStore>,
        otp_delivery: Arc<dyn OtpDelivery>,
        config: &Config,
    ) -> Self {
        Self {
            store,
            otp_delivery,
            master_key: config.master_key.clone(),
            jwt_secret: config.jwt_secret.clone(),
            bcrypt_cost: config.bcrypt_cost,
            token_ttl_seconds: config.token_ttl_seconds,
        }
    }

    /// Register a new account.
    ///
    /// Hashes the password, encrypts both name fields, generates a
    /// verification challenge with a 15 minute window, and persists the
    /// record through the store's atomic conditional insert - there is no
    /// separate existence check to race against. The plaintext code goes to
    /// the delivery collaborator; it never appears in the response.
    #[instrument(skip_all)]
    pub async fn register(
        &self,
        request: RegisterRequest,
    ) -> Result<RegistrationResponse, AccountError> {
        let email = normalize_email(&request.email);
        if !is_valid_email(&email) {
            record_registration("validation_error");
            return Err(AccountError::Validation("Invalid email format".to_string()));
        }

        let password = request.password.expose_secret();
        if password.len() < MIN_PASSWORD_LENGTH {
            record_registration("validation_error");
            return Err(AccountError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        let first_name = request.first_name.trim();
        let last_name = request.last_name.trim();
        if first_name.is_empty() || last_name.is_empty() {
            record_registration("validation_error");
            return Err(AccountError::Validation(
                "Name fields cannot be empty".to_string(),
            ));
        }

        let start = Instant::now();
        let password_hash = crypto::hash_password(password, self.bcrypt_cost)?;
        record_bcrypt_duration("hash", start.elapsed());

        let otp = crypto::generate_otp()?;
        let otp_hash = crypto::otp_hash(&otp, &email, &self.master_key)?;
        let otp_expires_at = Utc::now() + Duration::minutes(OTP_TTL_MINUTES);

        let new_account = NewAccount {
            email,
            password_hash,
            first_name_enc: crypto::encrypt_field(first_name, &self.master_key)?,
            last_name_enc: crypto::encrypt_field(last_name, &self.master_key)?,
            otp_hash,
            otp_expires_at,
        };

        let Some(account) = self.store.create_if_email_absent(new_account).await? else {
            record_registration("conflict");
            return Err(AccountError::DuplicateEmail);
        };

        // The record is durable at this point. A failed delivery is logged
        // and counted, not rolled back - the challenge stays consumable once
        // the code does reach the owner.
        if let Err(e) = self.otp_delivery.deliver(&account.email, &otp).await {
            tracing::warn!(
                target: "account_service",
                error = %e,
                "verification code delivery failed"
            );
            record_otp_delivery_failure();
        }

        record_registration("success");
        Ok(RegistrationResponse {
            message: "Registration successful. Please verify your email.".to_string(),
            account_id: account.account_id,
        })
    }

    /// Authenticate and issue a bearer token.
    ///
    /// Unknown email and wrong password collapse into one failure; a bcrypt
    /// verify runs on a dummy hash when the account is missing so both paths
    /// cost the same time. An unverified account fails with its own message
    /// after the password check.
    #[instrument(skip_all)]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AccountError> {
        let email = normalize_email(email);
        let account = self.store.find_by_email(&email).await?;

        let hash_to_verify = account
            .as_ref()
            .map_or(DUMMY_PASSWORD_HASH, |a| a.password_hash.as_str());

        let start = Instant::now();
        let password_matches = crypto::verify_password(password, hash_to_verify)?;
        record_bcrypt_duration("verify", start.elapsed());

        let account = match account {
            Some(account) if password_matches => account,
            _ => {
                record_login("invalid_credentials");
                return Err(AccountError::InvalidCredentials);
            }
        };

        if !account.is_email_verified {
            record_login("unverified");
            return Err(AccountError::EmailNotVerified);
        }

        let access_token = crypto::issue_token(
            account.account_id,
            &account.email,
            &self.jwt_secret,
            self.token_ttl_seconds,
        )?;

        record_login("success");
        Ok(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.token_ttl_seconds.unsigned_abs(),
            account: AccountSummary {
                id: account.account_id,
                email: account.email.clone(),
                first_name: crypto::decrypt_field(&account.first_name_enc, &self.master_key)?,
                last_name: crypto::decrypt_field(&account.last_name_enc, &self.master_key)?,
            },
        })
    }

    /// Consume an outstanding verification challenge.
    ///
    /// On a valid code the store's conditional update marks the account
    /// verified and clears the challenge in one step; if a concurrent
    /// attempt consumed it first, this one reports no challenge outstanding.
    #[instrument(skip_all)]
    pub async fn verify_email(&self, email: &str, code: &str) -> Result<MessageResponse, AccountError> {
        let email = normalize_email(email);
        let account = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or(AccountError::NotFound)?;

        if account.is_email_verified {
            record_otp_verification("already_verified");
            return Err(AccountError::AlreadyVerified);
        }

        let (Some(stored_hash), Some(expires_at)) =
            (account.otp_hash.as_deref(), account.otp_expires_at)
        else {
            record_otp_verification("no_challenge");
            return Err(AccountError::NoChallengeOutstanding);
        };

        match crypto::verify_otp(
            code,
            &email,
            &self.master_key,
            stored_hash,
            expires_at,
            Utc::now(),
        )? {
            OtpOutcome::Expired => {
                record_otp_verification("expired");
                return Err(AccountError::ChallengeExpired);
            }
            OtpOutcome::Mismatch => {
                record_otp_verification("mismatch");
                return Err(AccountError::ChallengeInvalid);
            }
            OtpOutcome::Valid => {}
        }

        let consumed = self
            .store
            .clear_otp_if_matches(account.account_id, stored_hash)
            .await?;
        if !consumed {
            record_otp_verification("no_challenge");
            return Err(AccountError::NoChallengeOutstanding);
        }

        record_otp_verification("success");
        Ok(MessageResponse {
            message: "Email verified successfully".to_string(),
        })
    }

    /// Serve the owner's profile with decrypted name fields.
    #[instrument(skip_all)]
    pub async fn get_profile(&self, account_id: Uuid) -> Result<ProfileResponse, AccountError> {
        let account = self
            .store
            .find_by_id(account_id)
            .await?
            .ok_or(AccountError::NotFound)?;

        self.profile_view(&account)
    }

    /// Apply partial profile changes. Absent fields keep their stored value;
    /// present fields are re-encrypted and replace the stored ciphertext.
    #[instrument(skip_all)]
    pub async fn update_profile(
        &self,
        account_id: Uuid,
        changes: ProfileChanges,
    ) -> Result<ProfileResponse, AccountError> {
        let account_changes = AccountChanges {
            first_name_enc: changes
                .first_name
                .as_deref()
                .map(|v| crypto::encrypt_field(v, &self.master_key))
                .transpose()?,
            last_name_enc: changes
                .last_name
                .as_deref()
                .map(|v| crypto::encrypt_field(v, &self.master_key))
                .transpose()?,
            ..AccountChanges::default()
        };

        let account = self
            .store
            .update_fields(account_id, account_changes)
            .await?
            .ok_or(AccountError::NotFound)?;

        self.profile_view(&account)
    }

    /// Replace the stored password hash after verifying the current one.
    ///
    /// Tokens already issued stay valid until their own expiry; this design
    /// has no forced session revocation. Password policy (length, strength)
    /// belongs to the caller-facing contract, not here.
    #[instrument(skip_all)]
    pub async fn change_password(
        &self,
        account_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<MessageResponse, AccountError> {
        let account = self
            .store
            .find_by_id(account_id)
            .await?
            .ok_or(AccountError::NotFound)?;

        if !crypto::verify_password(current_password, &account.password_hash)? {
            record_password_change("mismatch");
            return Err(AccountError::CurrentPasswordMismatch);
        }

        let start = Instant::now();
        let password_hash = crypto::hash_password(new_password, self.bcrypt_cost)?;
        record_bcrypt_duration("hash", start.elapsed());

        self.store
            .update_fields(
                account_id,
                AccountChanges {
                    password_hash: Some(password_hash),
                    ..AccountChanges::default()
                },
            )
            .await?
            .ok_or(AccountError::NotFound)?;

        record_password_change("success");
        Ok(MessageResponse {
            message: "Password changed successfully".to_string(),
        })
    }

    /// Permanently remove the account record. No soft delete.
    #[instrument(skip_all)]
    pub async fn delete_account(&self, account_id: Uuid) -> Result<MessageResponse, AccountError> {
        if !self.store.delete(account_id).await? {
            return Err(AccountError::NotFound);
        }

        record_account_deletion();
        Ok(MessageResponse {
            message: "Account deleted successfully".to_string(),
        })
    }

    /// Resolve the account id carried by a bearer token.
    ///
    /// Signature and expiry only - no store lookup. The transport layer
    /// calls this to establish "current caller" before invoking an
    /// id-scoped operation; whether the id still resolves is answered by
    /// that operation's own `NotFound`.
    pub fn verify_token(&self, token: &str) -> Result<Uuid, AccountError> {
        let claims = crypto::verify_token(token, &self.jwt_secret)?;
        Uuid::parse_str(&claims.sub).map_err(|_| {
            AccountError::InvalidToken("The access token is invalid or expired".to_string())
        })
    }

    fn profile_view(&self, account: &Account) -> Result<ProfileResponse, AccountError> {
        Ok(ProfileResponse {
            id: account.account_id,
            email: account.email.clone(),
            first_name: crypto::decrypt_field(&account.first_name_enc, &self.master_key)?,
            last_name: crypto::decrypt_field(&account.last_name_enc, &self.master_key)?,
            is_email_verified: account.is_email_verified,
            created_at: account.created_at,
            updated_at: account.updated_at,
        })
    }
}

/// Canonical form used for storage and lookups: trimmed, lowercased. The
/// uniqueness constraint applies to this form, so `User@X.com` and
/// `user@x.com` are the same account.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic shape check: something@something.something. Full RFC validation is
/// the transport layer's job; this rejects inputs no valid caller produces.
fn is_valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return false,
    };

    if local.is_empty() {
        return false;
    }

    let domain_parts: Vec<&str> = domain.split('.').collect();
    if domain_parts.len() < 2 {
        return false;
    }

    domain_parts.iter().all(|p| !p.is_empty())
}
