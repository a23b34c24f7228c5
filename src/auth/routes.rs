//! Authentication REST API routes

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use super::{
    credentials,
    database::{AccountStore, AuthDatabase},
    error::AuthError,
    gate::{require, Requirement},
    jwt::{SessionConfig, TokenManager},
    models::*,
    password::{hash_password, validate_password},
    session::{clear_session_cookie, session_cookie, Clock, Session, SystemClock},
};

/// Shared authentication state
pub struct AuthState {
    pub db: AuthDatabase,
    pub tokens: TokenManager,
    pub clock: Arc<dyn Clock>,
}

impl AuthState {
    pub fn new(db: AuthDatabase, config: &SessionConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            db,
            tokens: TokenManager::new(config),
            clock,
        }
    }

    /// Production wiring: system clock
    pub fn with_system_clock(db: AuthDatabase, config: &SessionConfig) -> Self {
        Self::new(db, config, Arc::new(SystemClock))
    }

    /// Mint a token for `claims` and build the response carrying it
    /// both in the body and as the session cookie.
    pub fn session_response(
        &self,
        status: StatusCode,
        claims: AccountClaims,
    ) -> Result<Response, AuthError> {
        let token = self.tokens.mint(claims.clone(), self.clock.now())?;
        let cookie = session_cookie(&token, self.tokens.lifetime());
        Ok((
            status,
            [(header::SET_COOKIE, cookie)],
            Json(AuthResponse {
                token,
                user: CurrentUser::from(claims),
            }),
        )
            .into_response())
    }
}

/// Create auth router
pub fn auth_router<S>(state: Arc<AuthState>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/signin", get(signin_page))
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/signout", post(signout))
        .route("/me", get(get_current_user))
        .with_state(state)
}

fn blocking_failed(e: tokio::task::JoinError) -> AuthError {
    AuthError::Storage(format!("blocking task failed: {}", e))
}

/// POST /auth/login - Exchange email/password for a session token
async fn login(
    State(state): State<Arc<AuthState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, AuthError> {
    let db = state.db.clone();
    let LoginRequest { email, password } = req;

    // Lookup + argon2 are blocking; keep them off the async workers.
    let claims = tokio::task::spawn_blocking(move || credentials::verify(&db, &email, &password))
        .await
        .map_err(blocking_failed)??;

    state.session_response(StatusCode::OK, claims)
}

/// POST /auth/register - Create a USER account and sign it in
async fn register(
    State(state): State<Arc<AuthState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Response, AuthError> {
    let email = req.email.trim().to_string();
    let name = req.name.trim().to_string();

    if !crate::content::looks_like_email(&email) {
        return Err(AuthError::Validation("Invalid email format".to_string()));
    }
    if name.chars().count() < 2 || name.chars().count() > 50 {
        return Err(AuthError::Validation("Name must be 2-50 characters".to_string()));
    }
    validate_password(&req.password).map_err(|e| AuthError::Validation(e.to_string()))?;

    if state.db.find_by_email(&email)?.is_some() {
        return Err(AuthError::Conflict("Email already registered".to_string()));
    }

    let password = req.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(blocking_failed)?
        .map_err(|e| AuthError::Storage(format!("password hashing failed: {}", e)))?;

    let now = chrono::Utc::now().to_rfc3339();
    let account = Account {
        id: uuid::Uuid::new_v4().to_string(),
        email,
        name: Some(name),
        password_hash: Some(password_hash),
        // Self-service accounts never get more than USER.
        role: Role::User,
        image: None,
        created_at: now.clone(),
        updated_at: now,
    };
    state.db.create_account(&account)?;
    log::info!("👤 Registered account {}", account.id);

    state.session_response(StatusCode::CREATED, account.claims())
}

/// POST /auth/signout - Drop the session cookie
///
/// Tokens are not revocable; the cookie is simply cleared.
async fn signout() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(MessageResponse {
            message: "Signed out".to_string(),
        }),
    )
}

/// GET /auth/me - Current user from the session token
async fn get_current_user(session: Session) -> Result<Json<CurrentUser>, AuthError> {
    let user = require(session.user(), Requirement::Authenticated)?;
    Ok(Json(user.clone()))
}

/// GET /auth/signin - Minimal sign-in form
async fn signin_page() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html><head><title>Sign in</title></head>
<body>
<h1>Sign in</h1>
<form id="signin">
  <input name="email" type="email" placeholder="email" required>
  <input name="password" type="password" placeholder="password" required>
  <button type="submit">Sign in</button>
</form>
<p id="error"></p>
<script>
document.getElementById('signin').addEventListener('submit', async (e) => {
  e.preventDefault();
  const form = new FormData(e.target);
  const res = await fetch('/auth/login', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify({ email: form.get('email'), password: form.get('password') }),
  });
  if (!res.ok) { document.getElementById('error').textContent = 'Invalid credentials'; return; }
  const target = new URLSearchParams(location.search).get('callbackUrl') || '/';
  location.href = target.startsWith('/') && !target.startsWith('//') ? target : '/';
});
</script>
</body></html>"#,
    )
}
