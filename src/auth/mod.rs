use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config;

/// Claims carried by an identity token. The subject id is the only
/// identity claim; `iat`/`exp` bound its lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "_id")]
    pub id: String,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Invalid JWT secret")]
    InvalidSecret,
}

/// Signs and verifies identity tokens with a shared HMAC secret.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: String,
    expiry_hours: u64,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("expiry_hours", &self.expiry_hours)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(secret: impl Into<String>, expiry_hours: u64) -> Self {
        Self {
            secret: secret.into(),
            expiry_hours,
        }
    }

    /// Issuer backed by the process-wide security configuration
    pub fn from_config() -> Self {
        let security = &config::config().security;
        Self::new(security.jwt_secret.clone(), security.jwt_expiry_hours)
    }

    pub fn create_token(&self, subject_id: &str) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            id: subject_id.to_string(),
            exp: (now + Duration::hours(self.expiry_hours as i64)).timestamp(),
            iat: now.timestamp(),
        };
        self.sign(&claims)
    }

    /// Returns the decoded claims, or `None` for a bad signature, an
    /// expired token, or anything that does not parse as a token.
    pub fn verify_token(&self, token: &str) -> Option<Claims> {
        if self.secret.is_empty() {
            return None;
        }

        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let mut validation = Validation::default();
        validation.leeway = 0;

        match decode::<Claims>(token, &decoding_key, &validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                tracing::debug!("Rejected token: {}", e);
                None
            }
        }
    }

    fn sign(&self, claims: &Claims) -> Result<String, JwtError> {
        if self.secret.is_empty() {
            return Err(JwtError::InvalidSecret);
        }

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::default(), claims, &encoding_key)
            .map_err(|e| JwtError::TokenGeneration(e.to_string()))
    }
}

/// Issue a token for `subject_id` using the configured secret.
pub fn create_token(subject_id: &str) -> Result<String, JwtError> {
    TokenIssuer::from_config().create_token(subject_id)
}

/// Verify a token using the configured secret.
pub fn verify_token(token: &str) -> Option<Claims> {
    TokenIssuer::from_config().verify_token(token)
}
