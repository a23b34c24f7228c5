//! Authentication module
//!
//! Provides credential authentication and role-based authorization:
//! - Email/password verification against stored argon2 hashes
//! - Signed, expiring session tokens (HS256)
//! - Request-scoped session projection from header or cookie
//! - A single access gate used by pages and APIs

pub mod credentials;
pub mod database;
pub mod error;
pub mod gate;
pub mod jwt;
pub mod models;
pub mod password;
pub mod routes;
pub mod seed;
pub mod session;

pub use database::{AccountStore, AuthDatabase};
pub use error::AuthError;
pub use gate::{authorize, classify, require, Decision, DenyReason, GateState, Requirement};
pub use jwt::{SessionConfig, TokenManager};
pub use models::*;
pub use routes::{auth_router, AuthState};
pub use seed::{seed_admin, SeedOutcome};
pub use session::{Clock, ManualClock, Session, SystemClock};
