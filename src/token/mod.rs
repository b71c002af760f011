//! Session token issuance and verification.
//!
//! Tokens are compact HS256-signed bearer credentials carrying the subject
//! id, the account identifier, and a fixed 24-hour validity window. The
//! verifier collapses every failure mode (structure, signature, expiry)
//! into a single `None` so callers cannot distinguish the cause.

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed session lifetime.
pub const SESSION_TTL_HOURS: i64 = 24;

/// Claims carried by a session token. Not persisted; fully determined by
/// the signed token bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(rename = "sub")]
    pub subject_id: Uuid,
    #[serde(rename = "acct")]
    pub account_identifier: String,
    #[serde(rename = "iat")]
    pub issued_at: i64,
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

/// Signs and validates session tokens with a server-held symmetric secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            ttl: Duration::hours(SESSION_TTL_HOURS),
        }
    }

    #[cfg(test)]
    fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Issue a signed token for `subject_id` expiring `SESSION_TTL_HOURS`
    /// from now.
    ///
    /// # Errors
    ///
    /// Returns an error if claim serialization or signing fails.
    pub fn issue(&self, subject_id: Uuid, account_identifier: &str) -> Result<String> {
        let now = Utc::now();
        let claims = SessionClaims {
            subject_id,
            account_identifier: account_identifier.to_string(),
            issued_at: now.timestamp(),
            expires_at: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .context("failed to sign session token")
    }

    /// Verify a token: signature first, then expiry. Any failure returns
    /// `None` without distinguishing the cause.
    #[must_use]
    pub fn verify(&self, token: &str) -> Option<SessionClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<SessionClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .ok()
    }
}
