#[cfg(test)]
use crate::config::DEFAULT_BCRYPT_COST;
use crate::config::{MAX_BCRYPT_COST, MIN_BCRYPT_COST};
use crate::errors::AccountError;
use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use ring::{
    aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM},
    rand::{SecureRandom, SystemRandom},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;
use tracing::instrument;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Maximum allowed JWT size in bytes (4KB).
///
/// Tokens larger than this are rejected before any base64 decode or
/// signature work, so an oversized token costs the server almost nothing.
/// Our tokens are ~300 bytes; 4KB leaves room for claim growth.
const MAX_JWT_SIZE_BYTES: usize = 4096;

/// AES-256-GCM nonce length (96 bits).
const NONCE_LEN: usize = 12;
/// AES-256-GCM authentication tag length (128 bits).
const TAG_LEN: usize = 16;

/// Six-digit code space: 000000-999999.
const OTP_MODULUS: u32 = 1_000_000;

// ============================================================================
// Password hashing
// ============================================================================

/// Hash a login password with bcrypt using a configurable cost factor.
///
/// # Errors
///
/// Returns `AccountError::Crypto` if:
/// - Cost is outside the valid range (10-14) - config should have validated
///   already, this re-checks in case the function is called directly
/// - Bcrypt hashing fails
#[instrument(skip_all)]
pub fn hash_password(password: &str, cost: u32) -> Result<String, AccountError> {
    if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
        return Err(AccountError::Crypto(format!(
            "Invalid bcrypt cost: {} (must be {}-{})",
            cost, MIN_BCRYPT_COST, MAX_BCRYPT_COST
        )));
    }

    bcrypt::hash(password, cost)
        .map_err(|e| AccountError::Crypto(format!("Password hashing failed: {}", e)))
}

/// Verify a password against a stored bcrypt hash.
///
/// A wrong password is `Ok(false)`, never an error; only a malformed hash
/// errors. Bcrypt's own comparison is constant time with respect to where
/// the mismatch occurs.
#[instrument(skip_all)]
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AccountError> {
    bcrypt::verify(password, hash)
        .map_err(|e| AccountError::Crypto(format!("Password verification failed: {}", e)))
}

// ============================================================================
// Field encryption (personal data at rest)
// ============================================================================

/// Encrypt a personal-data field with AES-256-GCM under the process-wide
/// master key.
///
/// Output layout: base64(nonce || ciphertext || tag), one value per field,
/// suitable for a TEXT column. A fresh 96-bit nonce is drawn per call, so
/// encrypting the same plaintext twice yields different ciphertext.
#[instrument(skip_all)]
pub fn encrypt_field(plaintext: &str, master_key: &[u8]) -> Result<String, AccountError> {
    if master_key.len() != 32 {
        return Err(AccountError::Crypto(format!(
            "Invalid master key length: {} (expected 32)",
            master_key.len()
        )));
    }

    let rng = SystemRandom::new();
    let mut nonce_bytes = [0u8; NONCE_LEN];
    rng.fill(&mut nonce_bytes)
        .map_err(|e| AccountError::Crypto(format!("Nonce generation failed: {}", e)))?;
    let nonce = Nonce::assume_unique_for_key(nonce_bytes);

    let unbound_key = UnboundKey::new(&AES_256_GCM, master_key)
        .map_err(|e| AccountError::Crypto(format!("Cipher key creation failed: {}", e)))?;
    let sealing_key = LessSafeKey::new(unbound_key);

    // Encrypt in place; the 16-byte tag is appended to the buffer.
    let mut in_out = plaintext.as_bytes().to_vec();
    sealing_key
        .seal_in_place_append_tag(nonce, Aad::empty(), &mut in_out)
        .map_err(|e| AccountError::Crypto(format!("Encryption operation failed: {}", e)))?;

    let mut packed = Vec::with_capacity(NONCE_LEN + in_out.len());
    packed.extend_from_slice(&nonce_bytes);
    packed.extend_from_slice(&in_out);

    Ok(general_purpose::STANDARD.encode(packed))
}

/// Decrypt a field produced by [`encrypt_field`].
///
/// Fails on a wrong key, truncated input, or any bit of tampering - the GCM
/// tag authenticates the ciphertext, there is no silent-garbage path.
#[instrument(skip_all)]
pub fn decrypt_field(packed: &str, master_key: &[u8]) -> Result<String, AccountError> {
    if master_key.len() != 32 {
        return Err(AccountError::Crypto(format!(
            "Invalid master key length: {} (expected 32)",
            master_key.len()
        )));
    }

    let bytes = general_purpose::STANDARD
        .decode(packed)
        .map_err(|e| AccountError::Crypto(format!("Invalid ciphertext encoding: {}", e)))?;

    if bytes.len() < NONCE_LEN + TAG_LEN {
        return Err(AccountError::Crypto(format!(
            "Ciphertext too short: {} bytes",
            bytes.len()
        )));
    }

    let (nonce_slice, sealed) = bytes.split_at(NONCE_LEN);
    let nonce_bytes: [u8; NONCE_LEN] = nonce_slice
        .try_into()
        .map_err(|_| AccountError::Crypto("Invalid nonce format".to_string()))?;
    let nonce = Nonce::assume_unique_for_key(nonce_bytes);

    let unbound_key = UnboundKey::new(&AES_256_GCM, master_key)
        .map_err(|e| AccountError::Crypto(format!("Cipher key creation failed: {}", e)))?;
    let opening_key = LessSafeKey::new(unbound_key);

    let mut in_out = sealed.to_vec();
    let plaintext = opening_key
        .open_in_place(nonce, Aad::empty(), &mut in_out)
        .map_err(|e| AccountError::Crypto(format!("Decryption operation failed: {}", e)))?;

    String::from_utf8(plaintext.to_vec())
        .map_err(|e| AccountError::Crypto(format!("Decrypted field is not valid UTF-8: {}", e)))
}

// ============================================================================
// Email-verification challenge (OTP)
// ============================================================================

/// Generate a six-digit one-time code from a CSPRNG.
///
/// Four random bytes reduced modulo 1e6, left-padded with zeros, so every
/// code is exactly six digits including those below 100000.
#[instrument(skip_all)]
pub fn generate_otp() -> Result<String, AccountError> {
    let rng = SystemRandom::new();
    let mut bytes = [0u8; 4];
    rng.fill(&mut bytes)
        .map_err(|e| AccountError::Crypto(format!("Random bytes generation failed: {}", e)))?;

    let value = u32::from_be_bytes(bytes) % OTP_MODULUS;
    Ok(format!("{:06}", value))
}

/// HMAC-SHA256 over `code ++ email` keyed by the master key, hex encoded.
///
/// The code is never persisted in clear form. Mixing the email into the MAC
/// binds the challenge to one address: a leaked hash cannot be replayed
/// against a different account.
#[instrument(skip_all)]
pub fn otp_hash(code: &str, email: &str, master_key: &[u8]) -> Result<String, AccountError> {
    let mut mac = HmacSha256::new_from_slice(master_key)
        .map_err(|e| AccountError::Crypto(format!("HMAC key setup failed: {}", e)))?;
    mac.update(code.as_bytes());
    mac.update(email.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Outcome of checking a candidate code against a stored challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpOutcome {
    Valid,
    Expired,
    Mismatch,
}

/// Check a candidate code against a stored challenge hash.
///
/// `Expired` when `now >= expires_at`, regardless of the code value.
/// Otherwise the MAC is recomputed and compared in constant time; `==` on
/// the hex strings would leak the position of the first differing byte.
#[instrument(skip_all)]
pub fn verify_otp(
    candidate: &str,
    email: &str,
    master_key: &[u8],
    stored_hash: &str,
    expires_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<OtpOutcome, AccountError> {
    if now >= expires_at {
        return Ok(OtpOutcome::Expired);
    }

    let stored = hex::decode(stored_hash)
        .map_err(|e| AccountError::Crypto(format!("Invalid stored challenge hash: {}", e)))?;

    let mut mac = HmacSha256::new_from_slice(master_key)
        .map_err(|e| AccountError::Crypto(format!("HMAC key setup failed: {}", e)))?;
    mac.update(candidate.as_bytes());
    mac.update(email.as_bytes());
    let computed = mac.finalize().into_bytes();

    match ring::constant_time::verify_slices_are_equal(computed.as_slice(), &stored) {
        Ok(()) => Ok(OtpOutcome::Valid),
        Err(_) => Ok(OtpOutcome::Mismatch),
    }
}

// ============================================================================
// Bearer tokens
// ============================================================================

/// Bearer-token claims.
///
/// `sub` carries the account id and `email` the login address; both are
/// account identifiers and a custom Debug keeps them out of logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,   // Account id
    pub email: String, // Login email
    pub iat: i64,      // Issued at timestamp
    pub exp: i64,      // Expiration timestamp
}

impl fmt::Debug for TokenClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenClaims")
            .field("sub", &"[REDACTED]")
            .field("email", &"[REDACTED]")
            .field("iat", &self.iat)
            .field("exp", &self.exp)
            .finish()
    }
}

/// Sign a bearer token (HS256) for an account.
///
/// The signing secret is server-held configuration; clients can present
/// tokens but never mint them.
#[instrument(skip_all)]
pub fn issue_token(
    account_id: Uuid,
    email: &str,
    jwt_secret: &SecretString,
    ttl_seconds: i64,
) -> Result<String, AccountError> {
    let now = Utc::now().timestamp();
    let claims = TokenClaims {
        sub: account_id.to_string(),
        email: email.to_string(),
        iat: now,
        exp: now + ttl_seconds,
    };

    let encoding_key = EncodingKey::from_secret(jwt_secret.expose_secret().as_bytes());
    let header = Header::new(Algorithm::HS256);

    encode(&header, &claims, &encoding_key)
        .map_err(|e| AccountError::Crypto(format!("Token signing operation failed: {}", e)))
}

/// Verify a bearer token and extract its claims.
///
/// Validates size, signature, and expiry. Does not touch the store; whether
/// the account still exists is the caller's question to answer.
#[instrument(skip_all)]
pub fn verify_token(token: &str, jwt_secret: &SecretString) -> Result<TokenClaims, AccountError> {
    // Size check before any parsing or signature work.
    if token.len() > MAX_JWT_SIZE_BYTES {
        tracing::debug!(
            target: "crypto",
            token_size = token.len(),
            max_size = MAX_JWT_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(AccountError::InvalidToken(
            "The access token is invalid or expired".to_string(),
        ));
    }

    let decoding_key = DecodingKey::from_secret(jwt_secret.expose_secret().as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let token_data = decode::<TokenClaims>(token, &decoding_key, &validation).map_err(|e| {
        tracing::debug!(target: "crypto", error = %e, "Token verification failed");
        AccountError::InvalidToken("The access token is invalid or expired".to_string())
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn test_key() -> Vec<u8> {
        vec![0u8; 32]
    }

    // ------------------------------------------------------------------
    // Password hashing
    // ------------------------------------------------------------------

    #[test]
    fn test_password_hash_and_verify() {
        let hash = hash_password("my-secure-password", MIN_BCRYPT_COST).unwrap();

        assert!(verify_password("my-secure-password", &hash).unwrap());
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_password_hash_is_salted() {
        let a = hash_password("same-password", MIN_BCRYPT_COST).unwrap();
        let b = hash_password("same-password", MIN_BCRYPT_COST).unwrap();
        assert_ne!(a, b, "Two hashes of the same password should differ");
    }

    #[test]
    fn test_password_hash_rejects_out_of_range_cost() {
        for cost in [0, 9, 15, 31] {
            let result = hash_password("password", cost);
            let err = result.expect_err("Out-of-range cost should be rejected");
            assert!(matches!(err, AccountError::Crypto(msg) if msg.contains("Invalid bcrypt cost")));
        }
    }

    #[test]
    fn test_verify_password_with_invalid_hash() {
        let result = verify_password("password", "not-a-valid-hash");
        let err = result.expect_err("Expected Crypto error");
        assert!(
            matches!(err, AccountError::Crypto(msg) if msg.starts_with("Password verification failed:"))
        );
    }

    /// The default cost factor is baked into the stored hash; a silent drop
    /// below 10 would weaken every new credential.
    #[test]
    fn test_default_cost_factor_appears_in_hash() {
        let hash = hash_password("cost-check", DEFAULT_BCRYPT_COST).unwrap();

        // Bcrypt hash format: $2b$<cost>$<salt+hash>
        let cost = hash.split('$').nth(2).unwrap();
        assert_eq!(cost, "12");
    }

    // ------------------------------------------------------------------
    // Field encryption
    // ------------------------------------------------------------------

    #[test]
    fn test_field_round_trip() {
        let key = test_key();
        for plaintext in ["Jo", "", "Renée", "名前", "a string with spaces and \u{1F512}"] {
            let packed = encrypt_field(plaintext, &key).unwrap();
            let decrypted = decrypt_field(&packed, &key).unwrap();
            assert_eq!(decrypted, plaintext);
        }
    }

    #[test]
    fn test_field_ciphertext_is_randomized() {
        let key = test_key();
        let a = encrypt_field("Jo", &key).unwrap();
        let b = encrypt_field("Jo", &key).unwrap();
        assert_ne!(a, b, "Fresh nonce per call should randomize ciphertext");
    }

    #[test]
    fn test_decrypt_with_wrong_key_fails() {
        let packed = encrypt_field("Jo", &test_key()).unwrap();
        let wrong_key = vec![1u8; 32];

        let result = decrypt_field(&packed, &wrong_key);
        let err = result.expect_err("Wrong key should fail authentication");
        assert!(
            matches!(err, AccountError::Crypto(msg) if msg.starts_with("Decryption operation failed:"))
        );
    }

    #[test]
    fn test_decrypt_tampered_ciphertext_fails() {
        let key = test_key();
        let packed = encrypt_field("Jo", &key).unwrap();

        // Flip one bit in the packed payload.
        let mut bytes = general_purpose::STANDARD.decode(&packed).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        let tampered = general_purpose::STANDARD.encode(&bytes);

        let result = decrypt_field(&tampered, &key);
        assert!(result.is_err(), "Tampered ciphertext must not decrypt");
    }

    #[test]
    fn test_encrypt_with_invalid_key_length() {
        let result = encrypt_field("Jo", &[0u8; 16]);
        let err = result.expect_err("Expected Crypto error");
        assert!(
            matches!(err, AccountError::Crypto(msg) if msg.starts_with("Invalid master key length:"))
        );
    }

    #[test]
    fn test_decrypt_rejects_garbage_input() {
        let key = test_key();

        // Not base64 at all
        assert!(decrypt_field("!!!not-base64!!!", &key).is_err());

        // Valid base64 but shorter than nonce + tag
        let short = general_purpose::STANDARD.encode([0u8; 8]);
        let err = decrypt_field(&short, &key).expect_err("Short input should be rejected");
        assert!(matches!(err, AccountError::Crypto(msg) if msg.starts_with("Ciphertext too short")));
    }

    // ------------------------------------------------------------------
    // OTP challenge
    // ------------------------------------------------------------------

    #[test]
    fn test_otp_is_always_six_digits() {
        for _ in 0..1000 {
            let code = generate_otp().unwrap();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()), "code={}", code);
        }
    }

    /// Loose distribution check: over enough samples the codes should spread
    /// across the full range, and zero-padded codes (below 100000) should
    /// show up at roughly their 10% share.
    #[test]
    fn test_otp_distribution_covers_range() {
        let mut below_100k = 0usize;
        let mut buckets = [0usize; 10];
        let samples = 5000;

        for _ in 0..samples {
            let code = generate_otp().unwrap();
            let value: u32 = code.parse().unwrap();
            assert!(value < 1_000_000);

            if value < 100_000 {
                below_100k += 1;
            }
            buckets[(value / 100_000) as usize] += 1;
        }

        // Expect ~500 zero-padded codes; allow a generous band.
        assert!(
            (250..=750).contains(&below_100k),
            "zero-padded share off: {}/{}",
            below_100k,
            samples
        );

        // Every decile of the range should be hit.
        for (i, count) in buckets.iter().enumerate() {
            assert!(*count > 0, "bucket {} never hit", i);
        }
    }

    #[test]
    fn test_otp_hash_binds_email() {
        let key = test_key();
        let a = otp_hash("123456", "a@x.com", &key).unwrap();
        let b = otp_hash("123456", "b@x.com", &key).unwrap();
        assert_ne!(a, b, "Same code for different emails must hash differently");
    }

    #[test]
    fn test_otp_hash_is_deterministic() {
        let key = test_key();
        let a = otp_hash("123456", "a@x.com", &key).unwrap();
        let b = otp_hash("123456", "a@x.com", &key).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_verify_otp_valid() {
        let key = test_key();
        let now = Utc::now();
        let stored = otp_hash("042199", "a@x.com", &key).unwrap();

        let outcome =
            verify_otp("042199", "a@x.com", &key, &stored, now + Duration::minutes(15), now)
                .unwrap();
        assert_eq!(outcome, OtpOutcome::Valid);
    }

    #[test]
    fn test_verify_otp_mismatch() {
        let key = test_key();
        let now = Utc::now();
        let stored = otp_hash("042199", "a@x.com", &key).unwrap();

        let outcome =
            verify_otp("042198", "a@x.com", &key, &stored, now + Duration::minutes(15), now)
                .unwrap();
        assert_eq!(outcome, OtpOutcome::Mismatch);

        // Right code, wrong email: the binding must reject it.
        let outcome =
            verify_otp("042199", "b@x.com", &key, &stored, now + Duration::minutes(15), now)
                .unwrap();
        assert_eq!(outcome, OtpOutcome::Mismatch);
    }

    #[test]
    fn test_verify_otp_expired_even_with_correct_code() {
        let key = test_key();
        let now = Utc::now();
        let stored = otp_hash("042199", "a@x.com", &key).unwrap();

        let outcome =
            verify_otp("042199", "a@x.com", &key, &stored, now - Duration::seconds(1), now)
                .unwrap();
        assert_eq!(outcome, OtpOutcome::Expired);
    }

    #[test]
    fn test_verify_otp_expiry_boundary_is_inclusive() {
        let key = test_key();
        let now = Utc::now();
        let stored = otp_hash("042199", "a@x.com", &key).unwrap();

        // now == expires_at counts as expired.
        let outcome = verify_otp("042199", "a@x.com", &key, &stored, now, now).unwrap();
        assert_eq!(outcome, OtpOutcome::Expired);
    }

    #[test]
    fn test_verify_otp_rejects_corrupt_stored_hash() {
        let key = test_key();
        let now = Utc::now();

        let result = verify_otp(
            "042199",
            "a@x.com",
            &key,
            "zz-not-hex",
            now + Duration::minutes(15),
            now,
        );
        let err = result.expect_err("Corrupt stored hash should be an error, not a mismatch");
        assert!(matches!(err, AccountError::Crypto(_)));
    }

    // ------------------------------------------------------------------
    // Bearer tokens
    // ------------------------------------------------------------------

    fn test_secret() -> SecretString {
        SecretString::from("test-signing-secret")
    }

    #[test]
    fn test_token_issue_and_verify() {
        let account_id = Uuid::new_v4();
        let token = issue_token(account_id, "a@x.com", &test_secret(), 3600).unwrap();

        let claims = verify_token(&token, &test_secret()).unwrap();
        assert_eq!(claims.sub, account_id.to_string());
        assert_eq!(claims.email, "a@x.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_expired_rejected() {
        let account_id = Uuid::new_v4();
        // Negative TTL puts exp in the past, beyond the default leeway.
        let token = issue_token(account_id, "a@x.com", &test_secret(), -3600).unwrap();

        let result = verify_token(&token, &test_secret());
        let err = result.expect_err("Expired token should be rejected");
        assert!(matches!(err, AccountError::InvalidToken(_)));
    }

    #[test]
    fn test_token_wrong_secret_rejected() {
        let token = issue_token(Uuid::new_v4(), "a@x.com", &test_secret(), 3600).unwrap();

        let result = verify_token(&token, &SecretString::from("some-other-secret"));
        let err = result.expect_err("Wrong secret should be rejected");
        assert!(matches!(err, AccountError::InvalidToken(_)));
    }

    #[test]
    fn test_token_tampered_rejected() {
        let token = issue_token(Uuid::new_v4(), "a@x.com", &test_secret(), 3600).unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3, "JWT should have 3 parts");
        let tampered = format!("{}.{}X.{}", parts[0], parts[1], parts[2]);

        let result = verify_token(&tampered, &test_secret());
        let err = result.expect_err("Tampered token should be rejected");
        assert!(matches!(err, AccountError::InvalidToken(_)));
    }

    #[test]
    fn test_token_size_limit_enforced() {
        let oversized = "a".repeat(MAX_JWT_SIZE_BYTES + 1);

        let result = verify_token(&oversized, &test_secret());
        let err = result.expect_err("Oversized token should be rejected before parsing");
        assert!(matches!(err, AccountError::InvalidToken(_)));
    }

    #[test]
    fn test_token_size_limit_allows_normal_tokens() {
        let token = issue_token(Uuid::new_v4(), "a@x.com", &test_secret(), 3600).unwrap();
        assert!(
            token.len() <= MAX_JWT_SIZE_BYTES,
            "Normal token should be well under the size limit, got {} bytes",
            token.len()
        );
        assert!(verify_token(&token, &test_secret()).is_ok());
    }

    #[test]
    fn test_token_header_is_hs256_jwt() {
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;

        let token = issue_token(Uuid::new_v4(), "a@x.com", &test_secret(), 3600).unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        let header_bytes = URL_SAFE_NO_PAD.decode(parts[0]).expect("decode header");
        let header: serde_json::Value =
            serde_json::from_slice(&header_bytes).expect("parse header JSON");

        assert_eq!(header["alg"].as_str().unwrap(), "HS256");
        assert_eq!(header["typ"].as_str().unwrap(), "JWT");
    }

    #[test]
    fn test_claims_debug_redacts_identifiers() {
        let claims = TokenClaims {
            sub: "7c9e6679-7425-40de-944b-e07fc1f90ae7".to_string(),
            email: "a@x.com".to_string(),
            iat: 1234567800,
            exp: 1234567890,
        };

        let debug_str = format!("{:?}", claims);
        assert!(!debug_str.contains("7c9e6679"));
        assert!(!debug_str.contains("a@x.com"));
        assert!(debug_str.contains("[REDACTED]"));
        assert!(debug_str.contains("1234567890"));
    }

    #[test]
    fn test_claims_serialization_round_trip() {
        let claims = TokenClaims {
            sub: "account-1".to_string(),
            email: "a@x.com".to_string(),
            iat: 1234567800,
            exp: 1234567890,
        };

        let json = serde_json::to_string(&claims).unwrap();
        let deserialized: TokenClaims = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.sub, claims.sub);
        assert_eq!(deserialized.email, claims.email);
        assert_eq!(deserialized.iat, claims.iat);
        assert_eq!(deserialized.exp, claims.exp);
    }
}
