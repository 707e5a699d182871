use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::JwtConfig;

/// JWT service for token issuance and validation.
///
/// HS256 with a single symmetric key built once from the configured
/// secret. Issuance and validation are pure functions of the token
/// bytes and that key; nothing here touches shared mutable state.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_hours: i64,
}

/// Claims carried by a bearer token. The subject is the identity's
/// email; authorities are deliberately not embedded so that role
/// changes take effect on the next request, not the next token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user email)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl TokenClaims {
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

impl JwtService {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            token_expiry_hours: config.token_expiry_hours,
        }
    }

    /// Issue a signed token for a subject with the configured lifetime.
    pub fn issue(&self, subject: &str) -> Result<String, anyhow::Error> {
        self.issue_with_lifetime(subject, Duration::hours(self.token_expiry_hours))
    }

    pub fn issue_with_lifetime(
        &self,
        subject: &str,
        lifetime: Duration,
    ) -> Result<String, anyhow::Error> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        };

        let header = Header::new(Algorithm::HS256);
        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to encode token: {}", e))
    }

    /// Verify structure and signature and return the embedded claims.
    ///
    /// Expiry is NOT checked here so that callers (logout, expiry
    /// predicates) can still read claims from a stale token. Malformed
    /// input, a bad signature, or an algorithm mismatch all yield Err.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, anyhow::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| anyhow::anyhow!("Invalid token: {}", e))?;

        Ok(token_data.claims)
    }

    /// Whether a token's embedded expiry has passed. Undecodable tokens
    /// are reported as expired.
    pub fn is_expired(&self, token: &str) -> bool {
        match self.verify(token) {
            Ok(claims) => claims.is_expired(Utc::now()),
            Err(_) => true,
        }
    }

    /// Pure predicate: the token parses, the signature verifies, and it
    /// has not expired. Every failure mode degrades to `false`.
    pub fn is_valid(&self, token: &str) -> bool {
        self.verify(token)
            .map(|claims| !claims.is_expired(Utc::now()))
            .unwrap_or(false)
    }

    /// The embedded expiry of a verifiable token, used by logout to
    /// bound the revocation entry.
    pub fn expires_at(&self, token: &str) -> Option<DateTime<Utc>> {
        self.verify(token).ok().map(|claims| claims.expires_at())
    }

    pub fn token_expiry_seconds(&self) -> i64 {
        self.token_expiry_hours * 3600
    }
}
