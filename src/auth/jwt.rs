//! Session token minting and validation
//!
//! Tokens are HS256 JWTs. Validation takes the current time as an argument
//! so expiry is checked against the caller's clock, never the system's.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

use super::error::AuthError;
use super::models::{AccountClaims, SessionClaims};

/// Default session lifetime
pub const DEFAULT_SESSION_DAYS: i64 = 30;

/// Longest accepted session lifetime (ten years)
pub const MAX_SESSION_DAYS: i64 = 3650;

pub const SECRET_ENV: &str = "SESSION_SECRET";
pub const MAX_AGE_ENV: &str = "SESSION_MAX_AGE_DAYS";

/// Session token configuration: the signing secret and the token lifetime
#[derive(Clone)]
pub struct SessionConfig {
    secret: String,
    lifetime: Duration,
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &"<redacted>")
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

impl SessionConfig {
    pub fn new(secret: impl Into<String>, lifetime: Duration) -> Result<Self, AuthError> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(AuthError::Configuration(format!(
                "{} is missing or empty",
                SECRET_ENV
            )));
        }
        if lifetime <= Duration::zero() {
            return Err(AuthError::Configuration(
                "session lifetime must be positive".to_string(),
            ));
        }
        if lifetime > Duration::days(MAX_SESSION_DAYS) {
            return Err(AuthError::Configuration(format!(
                "session lifetime must be at most {} days",
                MAX_SESSION_DAYS
            )));
        }
        Ok(Self { secret, lifetime })
    }

    /// Load from `SESSION_SECRET` and `SESSION_MAX_AGE_DAYS`.
    ///
    /// A missing secret is fatal; there is no fallback value.
    pub fn from_env() -> Result<Self, AuthError> {
        Self::from_values(
            std::env::var(SECRET_ENV).ok(),
            std::env::var(MAX_AGE_ENV).ok(),
        )
    }

    /// Build from raw environment values; `None` means the variable is unset.
    fn from_values(secret: Option<String>, max_age_days: Option<String>) -> Result<Self, AuthError> {
        let secret = secret.unwrap_or_default();
        let days = match max_age_days {
            Some(raw) => raw.trim().parse::<i64>().map_err(|_| {
                AuthError::Configuration(format!("{} must be a whole number of days", MAX_AGE_ENV))
            })?,
            None => DEFAULT_SESSION_DAYS,
        };
        let lifetime = Duration::try_days(days).ok_or_else(|| {
            AuthError::Configuration(format!("{} is out of range", MAX_AGE_ENV))
        })?;
        Self::new(secret, lifetime)
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }
}

/// Mints and validates session tokens with a single process-wide secret
#[derive(Clone)]
pub struct TokenManager {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: Duration,
}

impl TokenManager {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            lifetime: config.lifetime,
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Create a signed token for `claims`, issued at `now`.
    ///
    /// Identical claims and `now` produce an identical token.
    pub fn mint(&self, claims: AccountClaims, now: DateTime<Utc>) -> Result<String, AuthError> {
        let iat = now.timestamp();
        let exp = now
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| AuthError::Configuration("session expiry out of range".to_string()))?
            .timestamp();
        let payload = SessionClaims::new(claims, iat, exp);

        encode(&Header::new(Algorithm::HS256), &payload, &self.encoding).map_err(|e| {
            log::error!("Token signing failed: {}", e);
            AuthError::Configuration("token signing failed".to_string())
        })
    }

    /// Verify structure, signature and expiry, in that order.
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, AuthError> {
        check_structure(token)?;

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below against the injected clock.
        validation.validate_exp = false;
        validation.leeway = 0;

        let data = decode::<SessionClaims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::MalformedToken,
            }
        })?;

        if now.timestamp() > data.claims.exp {
            return Err(AuthError::TokenExpired);
        }

        Ok(data.claims)
    }
}

/// Three base64url segments, the first being a JSON object.
fn check_structure(token: &str) -> Result<(), AuthError> {
    let mut parts = token.split('.');
    let (Some(header), Some(payload), Some(signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(AuthError::MalformedToken);
    };

    if header.is_empty() || payload.is_empty() || signature.is_empty() {
        return Err(AuthError::MalformedToken);
    }

    let header = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|_| AuthError::MalformedToken)?;
    URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| AuthError::MalformedToken)?;
    serde_json::from_slice::<serde_json::Map<String, serde_json::Value>>(&header)
        .map_err(|_| AuthError::MalformedToken)?;

    // Any well-shaped but undecodable signature is a signature mismatch.
    URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|_| AuthError::InvalidSignature)?;
    Ok(())
}
