//! Capturing delivery collaborator.
//!
//! The service never returns the plaintext verification code, so tests grab
//! it at the only seam it crosses: the delivery collaborator.

use account_service::errors::AccountError;
use account_service::services::OtpDelivery;
use async_trait::async_trait;
use std::sync::Mutex;

/// One captured delivery.
#[derive(Debug, Clone)]
pub struct SentOtp {
    pub email: String,
    pub code: String,
}

/// [`OtpDelivery`] that records every code instead of sending it.
#[derive(Debug, Default)]
pub struct CapturingOtpDelivery {
    sent: Mutex<Vec<SentOtp>>,
}

impl CapturingOtpDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent code issued for an email, if any.
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        let sent = self.sent.lock().ok()?;
        sent.iter()
            .rev()
            .find(|s| s.email == email)
            .map(|s| s.code.clone())
    }

    /// Every delivery seen so far, oldest first.
    pub fn all_sent(&self) -> Vec<SentOtp> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl OtpDelivery for CapturingOtpDelivery {
    async fn deliver(&self, email: &str, code: &str) -> Result<(), AccountError> {
        let mut sent = self
            .sent
            .lock()
            .map_err(|_| AccountError::Database("capture mutex poisoned".to_string()))?;
        sent.push(SentOtp {
            email: email.to_string(),
            code: code.to_string(),
        });
        Ok(())
    }
}

/// [`OtpDelivery`] that always fails, for exercising the
/// delivery-is-not-registration failure policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingOtpDelivery;

#[async_trait]
impl OtpDelivery for FailingOtpDelivery {
    async fn deliver(&self, _email: &str, _code: &str) -> Result<(), AccountError> {
        Err(AccountError::Database("mail relay unreachable".to_string()))
    }
}
