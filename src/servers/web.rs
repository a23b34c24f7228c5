use axum::{
    extract::FromRef,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use super::{api, pages};
use crate::auth::{auth_router, error::error_response, AuthError, AuthState};
use crate::content::ContentDatabase;
use crate::db::StoreError;

// Configuration du serveur web
#[derive(Debug, Clone)]
pub struct WebConfig {
    pub port: u16,
    pub host: String,
    pub static_dir: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
            static_dir: "public".to_string(),
        }
    }
}

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthState>,
    pub content: ContentDatabase,
}

impl FromRef<AppState> for Arc<AuthState> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.auth)
    }
}

/// Errors raised by page and API handlers
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Auth(e) => e.into_response(),
            ApiError::Store(StoreError::Duplicate("slug")) => error_response(
                StatusCode::BAD_REQUEST,
                "Slug already in use by another project",
            ),
            ApiError::Store(StoreError::Duplicate(what)) => {
                error_response(StatusCode::CONFLICT, &format!("{} already in use", what))
            }
            ApiError::Store(e) => {
                log::error!("❌ Database error: {}", e);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            ApiError::NotFound(msg) => error_response(StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Build the full application router
pub fn router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        // Pages
        .route("/", get(pages::home))
        .route("/profile", get(pages::profile))
        .route("/admin", get(pages::admin))
        // Public + admin project API
        .route("/api/projects", get(api::list_projects).post(api::create_project))
        .route(
            "/api/projects/{id}",
            get(api::get_project)
                .put(api::update_project)
                .patch(api::patch_project)
                .delete(api::delete_project),
        )
        // Contact form + admin inbox
        .route("/api/contact", get(api::list_messages).post(api::submit_contact))
        .route("/api/contact/mark-all-read", post(api::mark_all_read))
        .route("/api/contact/{id}", patch(api::mark_message))
        // Profile
        .route("/api/profile", get(api::get_profile).put(api::update_profile))
        .route("/api/admin/stats", get(api::admin_stats))
        .nest("/auth", auth_router(Arc::clone(&state.auth)))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

// Serveur web principal
pub struct WebServer {
    config: WebConfig,
    state: AppState,
}

impl WebServer {
    pub fn new(config: WebConfig, state: AppState) -> Self {
        Self { config, state }
    }

    pub fn config(&self) -> &WebConfig {
        &self.config
    }

    pub async fn start(self) -> Result<(), Box<dyn std::error::Error>> {
        let app = router(self.state, &self.config.static_dir);
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port).parse()?;
        let listener = TcpListener::bind(addr).await?;

        log::info!(
            "🌐 Portfolio server starting on http://localhost:{}",
            self.config.port
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        log::info!("🛑 Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_web_config_default() {
        let config = WebConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn test_api_error_status() {
        let not_found = ApiError::NotFound("Project not found").into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let forbidden = ApiError::from(AuthError::InsufficientRole {
            role: crate::auth::Role::User,
            required: "ADMIN".to_string(),
        })
        .into_response();
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

        let store = ApiError::from(StoreError::Poisoned).into_response();
        assert_eq!(store.status(), StatusCode::INTERNAL_SERVER_ERROR);

        // A slug taken between the pre-check and the insert
        let slug = ApiError::from(StoreError::Duplicate("slug")).into_response();
        assert_eq!(slug.status(), StatusCode::BAD_REQUEST);
    }
}
