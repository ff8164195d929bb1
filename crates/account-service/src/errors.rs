use thiserror::Error;

/// Typed failures returned by every account operation.
///
/// Each variant carries a stable machine code (`code()`) and a stable
/// user-visible message so the transport layer can render errors without
/// inspecting internals. Messages never include hash material, challenge
/// codes, or backtrace detail.
///
/// Unknown-email and wrong-password logins both map to `InvalidCredentials`
/// so a caller cannot enumerate registered addresses.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("{0}")]
    Validation(String),

    #[error("An account with this email already exists")]
    DuplicateEmail,

    #[error("Email already verified")]
    AlreadyVerified,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Please verify your email first")]
    EmailNotVerified,

    #[error("Current password is incorrect")]
    CurrentPasswordMismatch,

    #[error("Account not found")]
    NotFound,

    #[error("Verification code has expired")]
    ChallengeExpired,

    #[error("Invalid verification code")]
    ChallengeInvalid,

    #[error("No verification challenge outstanding")]
    NoChallengeOutstanding,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptographic error: {0}")]
    Crypto(String),
}

impl AccountError {
    /// Stable machine-readable code for the transport layer.
    pub fn code(&self) -> &'static str {
        match self {
            AccountError::Validation(_) => "VALIDATION_ERROR",
            AccountError::DuplicateEmail => "DUPLICATE_EMAIL",
            AccountError::AlreadyVerified => "ALREADY_VERIFIED",
            AccountError::InvalidCredentials => "INVALID_CREDENTIALS",
            AccountError::EmailNotVerified => "EMAIL_NOT_VERIFIED",
            AccountError::CurrentPasswordMismatch => "CURRENT_PASSWORD_MISMATCH",
            AccountError::NotFound => "ACCOUNT_NOT_FOUND",
            AccountError::ChallengeExpired => "CHALLENGE_EXPIRED",
            AccountError::ChallengeInvalid => "CHALLENGE_INVALID",
            AccountError::NoChallengeOutstanding => "NO_CHALLENGE_OUTSTANDING",
            AccountError::InvalidToken(_) => "INVALID_TOKEN",
            AccountError::Database(_) => "DATABASE_ERROR",
            AccountError::Crypto(_) => "CRYPTO_ERROR",
        }
    }

    /// Message safe to show to a caller. Internal variants collapse to a
    /// generic message; their detail belongs in the server log only.
    pub fn public_message(&self) -> String {
        match self {
            AccountError::Database(_) => "An internal database error occurred".to_string(),
            AccountError::Crypto(_) => "An internal cryptographic error occurred".to_string(),
            other => other.to_string(),
        }
    }
}
