//! JWT service for bearer token issuance and verification
//!
//! Tokens are HS256-signed and self-contained: the subject claim carries
//! the user's email and `exp` carries an absolute expiry. The signing
//! secret is required startup configuration.

use anyhow::Result;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared secret for signing and verifying tokens
    pub secret: String,
    /// Token lifetime in seconds (default: 30 minutes)
    pub token_expiry: u64,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: signing secret; there is no default and startup
    ///   fails when it is unset
    /// - `JWT_TOKEN_EXPIRY`: token lifetime in seconds (default: 1800)
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable not set"))?;

        let token_expiry = std::env::var("JWT_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "1800".to_string()) // 30 minutes
            .parse()
            .unwrap_or(1800);

        Ok(JwtConfig {
            secret,
            token_expiry,
        })
    }
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's email
    pub sub: String,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// Why a presented token was rejected
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token is malformed")]
    Malformed,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_expiry: u64,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        JwtService {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            token_expiry: config.token_expiry,
        }
    }

    /// Issue a token for a subject with the configured lifetime
    pub fn issue(&self, email: &str) -> Result<String> {
        self.issue_with_ttl(email, self.token_expiry as i64)
    }

    /// Issue a token whose expiry lies `ttl_seconds` from now. A
    /// negative value produces an already-expired token.
    pub fn issue_with_ttl(&self, email: &str, ttl_seconds: i64) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| anyhow::anyhow!("Failed to get current time: {}", e))?
            .as_secs();

        let claims = Claims {
            sub: email.to_string(),
            iat: now,
            exp: now.saturating_add_signed(ttl_seconds),
        };

        let token = encode(
            &Header::new(jsonwebtoken::Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?;
        Ok(token)
    }

    /// Verify a token and return its claims. The caller still has to
    /// resolve the subject to a live user record.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            })
    }

    /// Get the configured token lifetime in seconds
    pub fn token_expiry(&self) -> u64 {
        self.token_expiry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn service(secret: &str) -> JwtService {
        JwtService::new(&JwtConfig {
            secret: secret.to_string(),
            token_expiry: 1800,
        })
    }

    #[test]
    fn issue_and_verify_round_trip() {
        let jwt = service("test-secret");
        let token = jwt.issue("nguyen.van.a@gmail.com").unwrap();

        let claims = jwt.verify(&token).unwrap();
        assert_eq!(claims.sub, "nguyen.van.a@gmail.com");
        assert_eq!(claims.exp, claims.iat + 1800);
    }

    #[test]
    fn expired_token_is_rejected() {
        let jwt = service("test-secret");
        let token = jwt.issue_with_ttl("user@example.com", -120).unwrap();

        assert_eq!(jwt.verify(&token).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let token = service("secret-one").issue("user@example.com").unwrap();

        assert_eq!(
            service("secret-two").verify(&token).unwrap_err(),
            TokenError::InvalidSignature
        );
    }

    #[test]
    fn garbage_token_is_malformed() {
        let jwt = service("test-secret");
        assert_eq!(
            jwt.verify("definitely-not-a-jwt").unwrap_err(),
            TokenError::Malformed
        );
    }

    #[test]
    #[serial]
    fn config_requires_a_secret() {
        unsafe {
            std::env::remove_var("JWT_SECRET");
            std::env::remove_var("JWT_TOKEN_EXPIRY");
        }
        assert!(JwtConfig::from_env().is_err());

        unsafe {
            std::env::set_var("JWT_SECRET", "configured-secret");
        }
        let config = JwtConfig::from_env().unwrap();
        assert_eq!(config.secret, "configured-secret");
        assert_eq!(config.token_expiry, 1800);

        unsafe {
            std::env::remove_var("JWT_SECRET");
        }
    }
}
