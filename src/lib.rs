//! # Portfolio Site Library
//!
//! Backend of a personal portfolio site with credential sign-in and
//! role-based access to the administration area.
//!
//! ## Features
//!
//! - **Auth**: Email/password verification, signed session tokens, role gate
//! - **Content**: Projects and contact messages stored in SQLite
//! - **Server**: Axum router serving pages and the JSON API
//!
//! ## Usage
//!
//! ```rust,no_run
//! use portfolio::{
//!     auth::{AuthDatabase, AuthState, SessionConfig},
//!     content::ContentDatabase,
//!     servers::{AppState, WebConfig, WebServer},
//! };
//! ```

// ============================================================================
// PUBLIC API MODULES
// ============================================================================

/// Credential authentication, sessions and the access gate
pub mod auth;

/// Portfolio projects and contact messages
pub mod content;

/// Shared SQLite connection
pub mod db;

/// Logger setup
pub mod logging;

/// HTTP server, pages and API handlers
pub mod servers;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

pub use auth::{AuthError, CurrentUser, Requirement, Role};
pub use db::StoreError;
pub use servers::{AppState, WebConfig, WebServer};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Main error type for the portfolio library
#[derive(Debug, thiserror::Error)]
pub enum PortfolioError {
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Server error: {0}")]
    Server(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, PortfolioError>;

// ============================================================================
// LIBRARY VERSION INFO
// ============================================================================

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Library description
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
