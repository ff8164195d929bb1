//! Out-of-band delivery of verification codes.
//!
//! Delivery itself (mail, SMS) is an external collaborator; the service only
//! guarantees the plaintext code exists and is handed over at creation time.

use crate::errors::AccountError;
use async_trait::async_trait;

/// Carries a plaintext verification code to the account's email address.
#[async_trait]
pub trait OtpDelivery: Send + Sync {
    async fn deliver(&self, email: &str, code: &str) -> Result<(), AccountError>;
}

/// Development delivery: writes the code to the log instead of sending mail.
/// Useful for local runs and nothing else - a production embedder supplies a
/// real mail-backed implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOtpDelivery;

#[async_trait]
impl OtpDelivery for LogOtpDelivery {
    async fn deliver(&self, email: &str, code: &str) -> Result<(), AccountError> {
        tracing::info!(
            target: "account_service::otp",
            email = %email,
            code = %code,
            "verification code issued"
        );
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_delivery_always_succeeds() {
        let delivery = LogOtpDelivery;
        assert!(delivery.deliver("a@x.com", "042199").await.is_ok());
    }
}
