//! Portfolio content: projects and contact-form messages
//!
//! Plain storage. Who may call what is decided by the web layer through
//! the authorization gate.

pub mod database;
pub mod models;

pub use database::ContentDatabase;
pub use models::*;
