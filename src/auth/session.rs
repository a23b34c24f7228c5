//! Per-request session projection
//!
//! Turns whatever credential a request carries into an optional
//! [`CurrentUser`]. Any token defect yields an anonymous request; the reason
//! is logged but never surfaced from here.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
};
use chrono::{DateTime, Duration, Utc};
use std::convert::Infallible;
use std::sync::{Arc, Mutex};

use super::jwt::TokenManager;
use super::models::CurrentUser;
use super::routes::AuthState;

/// Cookie that carries the session token for browser requests
pub const SESSION_COOKIE: &str = "session_token";

/// Source of "now" for token minting and validation
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        match self.now.lock() {
            Ok(now) => *now,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Token from `Authorization: Bearer ...`, falling back to the session cookie.
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    bearer.or_else(|| {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
            .map(|(_, value)| value)
    })
}

/// Project a raw token onto the current user, or `None` for anonymous.
pub fn project(
    tokens: &TokenManager,
    raw_token: Option<&str>,
    now: DateTime<Utc>,
) -> Option<CurrentUser> {
    let token = raw_token?;
    match tokens.validate(token, now) {
        Ok(claims) => Some(CurrentUser::from(claims.account_claims())),
        Err(e) => {
            log::debug!("Session token ignored: {}", e);
            None
        }
    }
}

pub fn session_cookie(token: &str, max_age: Duration) -> String {
    format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE,
        token,
        max_age.num_seconds()
    )
}

pub fn clear_session_cookie() -> String {
    format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", SESSION_COOKIE)
}

/// Extractor holding the projected session of the current request
#[derive(Debug, Clone)]
pub struct Session(pub Option<CurrentUser>);

impl Session {
    pub fn user(&self) -> Option<&CurrentUser> {
        self.0.as_ref()
    }
}

impl<S> FromRequestParts<S> for Session
where
    Arc<AuthState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = Arc::<AuthState>::from_ref(state);
        let now = auth.clock.now();
        Ok(Session(project(&auth.tokens, extract_token(&parts.headers), now)))
    }
}
