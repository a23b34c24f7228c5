//! Authentication error taxonomy

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::models::Role;
use crate::db::StoreError;

/// Message shown for every token defect; which check failed is never revealed.
pub const SESSION_INVALID: &str = "Session invalid, please sign in again";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Malformed session token")]
    MalformedToken,

    #[error("Session token signature mismatch")]
    InvalidSignature,

    #[error("Session token expired")]
    TokenExpired,

    #[error("Not signed in")]
    Unauthenticated,

    #[error("Role {role} does not satisfy {required}")]
    InsufficientRole { role: Role, required: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),
}

impl AuthError {
    /// True for the token defects that collapse to a single re-authentication prompt.
    pub fn is_session_error(&self) -> bool {
        matches!(
            self,
            AuthError::MalformedToken
                | AuthError::InvalidSignature
                | AuthError::TokenExpired
                | AuthError::Unauthenticated
        )
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            e if e.is_session_error() => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientRole { .. } => StatusCode::FORBIDDEN,
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand to the client
    pub fn public_message(&self) -> String {
        match self {
            AuthError::InvalidCredentials => "Invalid credentials".to_string(),
            e if e.is_session_error() => SESSION_INVALID.to_string(),
            AuthError::InsufficientRole { .. } => "Forbidden".to_string(),
            AuthError::Validation(msg) | AuthError::Conflict(msg) => msg.clone(),
            _ => "Internal server error".to_string(),
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate("email") => {
                AuthError::Conflict("Email already registered".to_string())
            }
            StoreError::Duplicate(what) => AuthError::Conflict(format!("{} already in use", what)),
            e => AuthError::Storage(e.to_string()),
        }
    }
}

#[derive(Serialize)]
pub(crate) struct ErrorResponse {
    pub error: String,
}

pub(crate) fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            log::error!("❌ {}", self);
        }
        error_response(status, &self.public_message())
    }
}
