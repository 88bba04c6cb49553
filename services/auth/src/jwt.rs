//! JWT service for bearer token issuance and validation
//!
//! Tokens are stateless: they carry the username as subject and an absolute
//! expiry, signed with HS256 and a process-wide secret. Any process holding
//! the secret can validate any token issued with it.

use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AuthError, AuthResult};

/// Default access token lifetime in seconds (30 minutes)
const DEFAULT_ACCESS_TOKEN_EXPIRY: u64 = 1800;

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Symmetric secret used to sign and verify tokens
    pub secret: String,
    /// Access token expiration time in seconds (default: 30 minutes)
    pub access_token_expiry: u64,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: Signing secret (required, must not be empty)
    /// - `JWT_ACCESS_TOKEN_EXPIRY`: Access token expiry in seconds (default: 1800)
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable not set"))?;

        if secret.trim().is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }

        let access_token_expiry = std::env::var("JWT_ACCESS_TOKEN_EXPIRY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_ACCESS_TOKEN_EXPIRY);

        Ok(JwtConfig {
            secret,
            access_token_expiry,
        })
    }
}

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username of the token holder
    pub sub: String,
    /// Issued at time
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        // A token is only valid while now < exp.
        validation.reject_tokens_expiring_in_less_than = 1;

        JwtService {
            encoding_key,
            decoding_key,
            validation,
            config,
        }
    }

    /// Issue a token for `username` that expires `ttl` from now
    pub fn issue(&self, username: &str, ttl: Duration) -> AuthResult<String> {
        let now = Utc::now().timestamp();
        let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);

        let claims = Claims {
            sub: username.to_string(),
            iat: now,
            exp: now.saturating_add(ttl),
        };

        self.sign(&claims)
    }

    /// Issue a token with the configured access token lifetime
    pub fn issue_access_token(&self, username: &str) -> AuthResult<String> {
        self.issue(username, Duration::from_secs(self.config.access_token_expiry))
    }

    /// Validate a token and return the username it was issued for
    ///
    /// Fails on a bad signature, a malformed token, or an expired one. Whether
    /// the user still exists is left to the caller.
    pub fn verify(&self, token: &str) -> AuthResult<String> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(AuthError::InvalidToken)?;
        Ok(token_data.claims.sub)
    }

    /// Get the access token expiry time in seconds
    pub fn access_token_expiry(&self) -> u64 {
        self.config.access_token_expiry
    }

    fn sign(&self, claims: &Claims) -> AuthResult<String> {
        let token = encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(AuthError::TokenSigning)?;
        debug!(sub = %claims.sub, exp = claims.exp, "token issued");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::errors::ErrorKind;
    use serial_test::serial;

    fn service(secret: &str) -> JwtService {
        JwtService::new(JwtConfig {
            secret: secret.to_string(),
            access_token_expiry: 60,
        })
    }

    fn error_kind(result: AuthResult<String>) -> ErrorKind {
        match result {
            Err(AuthError::InvalidToken(e)) => e.into_kind(),
            other => panic!("expected an invalid token error, got {other:?}"),
        }
    }

    #[test]
    fn test_issued_token_verifies_to_its_subject() {
        let jwt = service("test-secret");
        let token = jwt.issue_access_token("Batman").unwrap();
        assert_eq!(jwt.verify(&token).unwrap(), "Batman");
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let token = service("one-secret").issue_access_token("Batman").unwrap();
        let kind = error_kind(service("another-secret").verify(&token));
        assert!(matches!(kind, ErrorKind::InvalidSignature));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let jwt = service("test-secret");
        let now = Utc::now().timestamp();
        let token = jwt
            .sign(&Claims {
                sub: "Batman".to_string(),
                iat: now - 120,
                exp: now - 10,
            })
            .unwrap();

        let kind = error_kind(jwt.verify(&token));
        assert!(matches!(kind, ErrorKind::ExpiredSignature));
    }

    #[test]
    fn test_token_expiring_this_second_is_rejected() {
        let jwt = service("test-secret");
        let now = Utc::now().timestamp();
        let token = jwt
            .sign(&Claims {
                sub: "Batman".to_string(),
                iat: now,
                exp: now,
            })
            .unwrap();

        let kind = error_kind(jwt.verify(&token));
        assert!(matches!(kind, ErrorKind::ExpiredSignature));

        let zero_ttl = jwt.issue("Batman", Duration::ZERO).unwrap();
        assert!(jwt.verify(&zero_ttl).is_err());
    }

    #[test]
    fn test_malformed_token_is_rejected() {
        let jwt = service("test-secret");
        assert!(matches!(
            jwt.verify("not-a-token"),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let jwt = service("test-secret");
        let token = jwt.issue_access_token("Batman").unwrap();
        let forged = jwt.issue_access_token("Robin").unwrap();

        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_payload = forged.split('.').nth(1).unwrap();
        parts[1] = forged_payload;

        assert!(jwt.verify(&parts.join(".")).is_err());
    }

    #[test]
    fn test_ttl_sets_expiry_claim() {
        let jwt = service("test-secret");
        let token = jwt.issue("Batman", Duration::from_secs(300)).unwrap();
        let data = decode::<Claims>(&token, &jwt.decoding_key, &jwt.validation).unwrap();
        assert_eq!(data.claims.exp - data.claims.iat, 300);
    }

    #[test]
    #[serial]
    fn test_jwt_config_from_env() {
        unsafe {
            std::env::set_var("JWT_SECRET", "from-env");
            std::env::remove_var("JWT_ACCESS_TOKEN_EXPIRY");
        }

        let config = JwtConfig::from_env().unwrap();
        assert_eq!(config.secret, "from-env");
        assert_eq!(config.access_token_expiry, DEFAULT_ACCESS_TOKEN_EXPIRY);

        unsafe {
            std::env::set_var("JWT_ACCESS_TOKEN_EXPIRY", "60");
        }
        assert_eq!(JwtConfig::from_env().unwrap().access_token_expiry, 60);

        unsafe {
            std::env::remove_var("JWT_SECRET");
            std::env::remove_var("JWT_ACCESS_TOKEN_EXPIRY");
        }
    }

    #[test]
    #[serial]
    fn test_jwt_config_requires_secret() {
        unsafe {
            std::env::remove_var("JWT_SECRET");
        }
        assert!(JwtConfig::from_env().is_err());

        unsafe {
            std::env::set_var("JWT_SECRET", "   ");
        }
        assert!(JwtConfig::from_env().is_err());

        unsafe {
            std::env::remove_var("JWT_SECRET");
        }
    }
}
