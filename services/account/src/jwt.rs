//! JWT service for token issuance and verification
//!
//! Tokens are HS256-signed and carry the user id, the username and an
//! expiration timestamp. They are never stored server-side, so a validly
//! signed token stays usable until it expires.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// Default token lifetime: one hour
pub const DEFAULT_TOKEN_EXPIRY_SECS: u64 = 3600;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT configuration
#[derive(Clone, Deserialize)]
pub struct JwtConfig {
    /// HMAC signing secret
    pub secret: String,
    /// Token lifetime in seconds (default: 1 hour)
    #[serde(default = "default_token_expiry_secs")]
    pub token_expiry_secs: u64,
}

fn default_token_expiry_secs() -> u64 {
    DEFAULT_TOKEN_EXPIRY_SECS
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            token_expiry_secs: DEFAULT_TOKEN_EXPIRY_SECS,
        }
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("token_expiry_secs", &self.token_expiry_secs)
            .finish()
    }
}

/// Token errors
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("error sign token")]
    Signing,

    #[error("error validate token: {0}")]
    Invalid(String),

    #[error("invalid jwt configuration: {0}")]
    Config(String),
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: String,
    pub username: String,
    /// Expiration time, seconds since the epoch
    pub exp: i64,
}

/// Identity recovered from a verified token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub user_id: String,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

impl VerifiedToken {
    /// Expiry is not enforced by [`JwtService::verify`]; callers decide with this.
    pub fn is_expired_at(&self, instant: DateTime<Utc>) -> bool {
        self.expires_at <= instant
    }
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_expiry: Duration,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: &JwtConfig) -> Result<Self, TokenError> {
        if config.secret.is_empty() {
            return Err(TokenError::Config("secret must not be empty".to_string()));
        }

        let token_expiry = i64::try_from(config.token_expiry_secs)
            .ok()
            .filter(|secs| *secs > 0)
            .and_then(Duration::try_seconds)
            .ok_or_else(|| {
                TokenError::Config(format!(
                    "token expiry must be a positive number of seconds, got {}",
                    config.token_expiry_secs
                ))
            })?;

        let mut validation = Validation::new(ALGORITHM);
        // expiry is checked by the caller against its own clock
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            token_expiry,
        })
    }

    /// Issue a token for a user
    pub fn issue(&self, user_id: &str, username: &str) -> Result<String, TokenError> {
        let expires_at = Utc::now() + self.token_expiry;

        let claims = Claims {
            user_id: user_id.to_string(),
            username: username.to_string(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(ALGORITHM), &claims, &self.encoding_key).map_err(|e| {
            error!("Failed to sign token: {}", e);
            TokenError::Signing
        })
    }

    /// Verify signature, algorithm and required claims of a token
    pub fn verify(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| TokenError::Invalid(e.to_string()))?;

        let expires_at = DateTime::from_timestamp(data.claims.exp, 0)
            .ok_or_else(|| TokenError::Invalid("exp out of range".to_string()))?;

        Ok(VerifiedToken {
            user_id: data.claims.user_id,
            username: data.claims.username,
            expires_at,
        })
    }

    /// Token lifetime
    pub fn token_expiry(&self) -> Duration {
        self.token_expiry
    }
}
