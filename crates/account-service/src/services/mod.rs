//! Business logic layer.

pub mod account_service;
pub mod otp_delivery;

pub use account_service::AccountService;
pub use otp_delivery::{LogOtpDelivery, OtpDelivery};
