use base64::{engine::general_purpose, Engine as _};
use secrecy::SecretString;
use std::collections::HashMap;
use std::env;
use std::fmt;
use thiserror::Error;

/// Default bcrypt cost factor (2^12 iterations, tens of milliseconds on
/// commodity hardware).
pub const DEFAULT_BCRYPT_COST: u32 = 12;
/// Lowest acceptable bcrypt cost. Below this the hash is too cheap to brute
/// force resist.
pub const MIN_BCRYPT_COST: u32 = 10;
/// Highest acceptable bcrypt cost. Above this a single login stalls for
/// hundreds of milliseconds.
pub const MAX_BCRYPT_COST: u32 = 14;

/// Default bearer token lifetime: 24 hours.
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 86_400;

/// Validity window of an email-verification challenge.
pub const OTP_TTL_MINUTES: i64 = 15;

/// Process-wide configuration, loaded once at startup and passed explicitly
/// into the service. Business logic never reads the environment itself.
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    /// 32-byte key for field encryption and challenge hashing.
    pub master_key: Vec<u8>,
    /// Signing secret for bearer tokens.
    pub jwt_secret: SecretString,
    pub bcrypt_cost: u32,
    pub token_ttl_seconds: i64,
}

/// Manual Debug: the master key must never reach a log line. The JWT secret
/// redacts itself.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("master_key", &"[REDACTED]")
            .field("jwt_secret", &self.jwt_secret)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid master key format: {0}")]
    InvalidMasterKey(String),

    #[error("Base64 decode error: {0}")]
    Base64Error(#[from] base64::DecodeError),

    #[error("Invalid bcrypt cost: {0} (must be {MIN_BCRYPT_COST}-{MAX_BCRYPT_COST})")]
    InvalidBcryptCost(u32),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_url = vars
            .get("DATABASE_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?
            .clone();

        let master_key_base64 = vars
            .get("ACCOUNT_MASTER_KEY")
            .ok_or_else(|| ConfigError::MissingEnvVar("ACCOUNT_MASTER_KEY".to_string()))?;

        let master_key = general_purpose::STANDARD
            .decode(master_key_base64)
            .map_err(ConfigError::Base64Error)?;

        if master_key.len() != 32 {
            return Err(ConfigError::InvalidMasterKey(format!(
                "Expected 32 bytes, got {}",
                master_key.len()
            )));
        }

        let jwt_secret = vars
            .get("JWT_SECRET")
            .ok_or_else(|| ConfigError::MissingEnvVar("JWT_SECRET".to_string()))?;

        if jwt_secret.is_empty() {
            return Err(ConfigError::InvalidValue(
                "JWT_SECRET".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let bcrypt_cost = match vars.get("BCRYPT_COST") {
            Some(raw) => raw.parse::<u32>().map_err(|e| {
                ConfigError::InvalidValue("BCRYPT_COST".to_string(), e.to_string())
            })?,
            None => DEFAULT_BCRYPT_COST,
        };

        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&bcrypt_cost) {
            return Err(ConfigError::InvalidBcryptCost(bcrypt_cost));
        }

        let token_ttl_seconds = match vars.get("TOKEN_TTL_SECONDS") {
            Some(raw) => raw.parse::<i64>().map_err(|e| {
                ConfigError::InvalidValue("TOKEN_TTL_SECONDS".to_string(), e.to_string())
            })?,
            None => DEFAULT_TOKEN_TTL_SECONDS,
        };

        if token_ttl_seconds <= 0 {
            return Err(ConfigError::InvalidValue(
                "TOKEN_TTL_SECONDS".to_string(),
                format!("must be positive, got {}", token_ttl_seconds),
            ));
        }

        Ok(Config {
            database_url,
            master_key,
            jwt_secret: SecretString::from(jwt_secret.clone()),
            bcrypt_cost,
            token_ttl_seconds,
        })
    }
}
