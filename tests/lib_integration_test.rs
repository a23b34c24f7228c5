//! Integration tests for the portfolio library public API

use portfolio::{
    auth::{AuthDatabase, AuthError, AuthState, SessionConfig},
    content::ContentDatabase,
    servers::{router, AppState, WebConfig, WebServer},
    PortfolioError, Result, StoreError, DESCRIPTION, NAME, VERSION,
};
use std::sync::Arc;

#[test]
fn test_library_metadata() {
    assert!(!VERSION.is_empty());
    assert_eq!(NAME, "portfolio");
    assert!(!DESCRIPTION.is_empty());
}

#[test]
fn test_error_types() {
    let auth_error = PortfolioError::from(AuthError::InvalidCredentials);
    assert!(matches!(auth_error, PortfolioError::Auth(_)));

    let storage_error = PortfolioError::from(StoreError::Poisoned);
    assert!(matches!(storage_error, PortfolioError::Storage(_)));

    let server_error = PortfolioError::Server("test server error".to_string());
    assert!(matches!(server_error, PortfolioError::Server(_)));
}

#[test]
fn test_result_type_alias() {
    let success: Result<i32> = Ok(42);
    assert!(success.is_ok());
    assert_eq!(success.unwrap(), 42);

    let failure: Result<i32> = Err(PortfolioError::Server("test".to_string()));
    assert!(failure.is_err());
}

#[test]
fn test_server_configs() {
    let web_config = WebConfig::default();
    assert_eq!(web_config.port, 3000);
    assert_eq!(web_config.host, "0.0.0.0");
}

#[test]
fn test_web_server_creation() {
    let config = SessionConfig::new("integration-secret", chrono::Duration::days(30)).unwrap();
    let state = AppState {
        auth: Arc::new(AuthState::with_system_clock(
            AuthDatabase::in_memory().unwrap(),
            &config,
        )),
        content: ContentDatabase::in_memory().unwrap(),
    };

    let config = WebConfig {
        port: 8080,
        host: "127.0.0.1".to_string(),
        static_dir: "public".to_string(),
    };
    let server = WebServer::new(config, state);
    assert_eq!(server.config().port, 8080);
}

#[test]
fn test_public_projects_endpoint_is_open() {
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    let config = SessionConfig::new("integration-secret", chrono::Duration::days(30)).unwrap();
    let state = AppState {
        auth: Arc::new(AuthState::with_system_clock(
            AuthDatabase::in_memory().unwrap(),
            &config,
        )),
        content: ContentDatabase::in_memory().unwrap(),
    };
    let app = router(state, "public");

    let response = tokio_test::block_on(
        app.oneshot(Request::get("/api/projects").body(Body::empty()).unwrap()),
    )
    .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
