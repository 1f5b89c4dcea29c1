//! Session token generation and validation (HS256 JWT)

use crate::{config::SecurityConfig, error::AppError, models::messages};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum HS256 secret length accepted at startup
pub const MIN_SECRET_LEN: usize = 32;

/// Session token claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User ID
    #[serde(rename = "userId")]
    pub user_id: String,

    /// Username
    pub username: String,

    /// Issued at (unix seconds)
    pub iat: i64,

    /// Expiration (unix seconds)
    pub exp: i64,
}

/// JWT service
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtService {
    /// Create JWT service from config. Refuses to start without a usable secret.
    pub fn from_config(config: &SecurityConfig) -> Result<Self, AppError> {
        Self::new(config.jwt_secret.expose_secret(), config.token_ttl_secs)
    }

    pub fn new(secret: &str, ttl_secs: u64) -> Result<Self, AppError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(AppError::Config(format!(
                "JWT secret too short (min {} chars)",
                MIN_SECRET_LEN
            )));
        }

        let ttl = i64::try_from(ttl_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(|| AppError::Config("token_ttl_secs out of range".to_string()))?;

        // exp is checked by hand below so that `now >= exp` is already expired
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        })
    }

    /// Issue a session token with the configured TTL
    pub fn issue(&self, user_id: &Uuid, username: &str) -> Result<String, AppError> {
        self.issue_with_ttl(user_id, username, self.ttl)
    }

    /// Issue a session token with an explicit TTL
    pub fn issue_with_ttl(
        &self,
        user_id: &Uuid,
        username: &str,
        ttl: Duration,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AppError::Internal("Token expiry out of range".to_string()))?;

        let claims = Claims {
            user_id: user_id.to_string(),
            username: username.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode session token: {:?}", e);
            AppError::Internal(format!("Failed to encode session token: {}", e))
        })
    }

    /// Validate and decode token.
    ///
    /// Malformed input, a bad signature and expiry all produce the same error.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!("Token validation failed: {:?}", e);
                AppError::unauthorized(messages::TOKEN_INVALID)
            })?
            .claims;

        if Utc::now().timestamp() >= claims.exp {
            tracing::debug!(exp = claims.exp, "Token expired");
            return Err(AppError::unauthorized(messages::TOKEN_INVALID));
        }

        Ok(claims)
    }
}
