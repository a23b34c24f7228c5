// Modules for server components
pub mod api;
pub mod pages;
pub mod web;

// Re-export public APIs
pub use web::{router, ApiError, AppState, WebConfig, WebServer};
