use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Account model (maps to accounts table).
///
/// `first_name_enc`/`last_name_enc` hold ciphertext; plaintext only exists
/// transiently inside the service while building a response. `otp_hash` and
/// `otp_expires_at` are both present while a verification challenge is
/// outstanding and both absent otherwise.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub account_id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name_enc: String,
    pub last_name_enc: String,
    pub is_email_verified: bool,
    pub otp_hash: Option<String>,
    pub otp_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for a new account record. The store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
    pub first_name_enc: String,
    pub last_name_enc: String,
    pub otp_hash: String,
    pub otp_expires_at: DateTime<Utc>,
}

/// Partial update with merge semantics: `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub password_hash: Option<String>,
    pub first_name_enc: Option<String>,
    pub last_name_enc: Option<String>,
}

/// Registration request data. The password is a `SecretString` so a derived
/// Debug cannot leak it into logs.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: SecretString,
    pub first_name: String,
    pub last_name: String,
}

/// Requested profile changes; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Registration response: the new id plus a status message. Never carries
/// the password hash or the verification code.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationResponse {
    pub message: String,
    pub account_id: Uuid,
}

/// Identity slice returned with a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct AccountSummary {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Login response (bearer token plus the decrypted identity slice).
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub account: AccountSummary,
}

/// Profile view served to the owner. Decrypted names, no secret material.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Bare confirmation for operations with no payload.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_debug_redacts_password() {
        let req = RegisterRequest {
            email: "test@example.com".to_string(),
            password: SecretString::from("hunter2-and-more"),
            first_name: "Jo".to_string(),
            last_name: "Do".to_string(),
        };

        let debug = format!("{:?}", req);
        assert!(debug.contains("test@example.com"));
        assert!(!debug.contains("hunter2-and-more"));
    }

    #[test]
    fn test_register_request_deserializes() {
        use secrecy::ExposeSecret;

        let json = r#"{
            "email": "a@x.com",
            "password": "Pw123456!",
            "first_name": "Jo",
            "last_name": "Do"
        }"#;

        let req: RegisterRequest = serde_json::from_str(json).expect("deserialize");
        assert_eq!(req.email, "a@x.com");
        assert_eq!(req.password.expose_secret(), "Pw123456!");
    }

    #[test]
    fn test_profile_changes_default_is_all_absent() {
        let changes = ProfileChanges::default();
        assert!(changes.first_name.is_none());
        assert!(changes.last_name.is_none());
    }

    #[test]
    fn test_profile_response_serializes_without_secret_fields() {
        let profile = ProfileResponse {
            id: Uuid::new_v4(),
            email: "a@x.com".to_string(),
            first_name: "Jo".to_string(),
            last_name: "Do".to_string(),
            is_email_verified: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("\"email\""));
        assert!(!json.contains("password"));
        assert!(!json.contains("otp"));
    }
}
