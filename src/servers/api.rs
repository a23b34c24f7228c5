//! JSON API handlers
//!
//! Mutating endpoints call the gate before reading the body into storage.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use super::web::{ApiError, ApiResult, AppState};
use crate::auth::{
    gate::{authorize, require, Decision, Requirement},
    models::{Account, ProfileResponse, ProfileUpdateRequest},
    session::session_cookie,
    AccountStore, Session,
};
use crate::content::{ContactMessage, ContactRequest, DashboardStats, Project, ProjectInput, ProjectPatch, ReadFlag};

/// Messages shown in the admin inbox
const INBOX_LIMIT: usize = 20;

const IMAGE_EXTENSIONS: [&str; 6] = [".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg"];
const IMAGE_PATHS: [&str; 5] = ["/image/", "/photo/", "/avatar/", "/profile/", "/img/"];

// ============================================================================
// PROJECTS
// ============================================================================

/// GET /api/projects - Published projects
pub async fn list_projects(State(state): State<AppState>) -> ApiResult<Json<Vec<Project>>> {
    Ok(Json(state.content.list_projects(true)?))
}

/// GET /api/projects/{id} - Drafts are only visible to admins
pub async fn get_project(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let project = state
        .content
        .find_project(&id)?
        .ok_or(ApiError::NotFound("Project not found"))?;

    if project.published {
        state.content.increment_views(&project.id)?;
    } else if !matches!(authorize(session.user(), Requirement::ADMIN), Decision::Allow(_)) {
        return Err(ApiError::NotFound("Project not found"));
    }

    Ok(Json(json!({ "project": project })))
}

fn ensure_slug_free(state: &AppState, slug: &str, current_id: Option<&str>) -> ApiResult<()> {
    match state.content.find_project_by_slug(slug.trim())? {
        Some(existing) if Some(existing.id.as_str()) != current_id => Err(ApiError::BadRequest(
            "Slug already in use by another project".to_string(),
        )),
        _ => Ok(()),
    }
}

/// POST /api/projects
pub async fn create_project(
    State(state): State<AppState>,
    session: Session,
    Json(input): Json<ProjectInput>,
) -> ApiResult<Response> {
    let admin = require(session.user(), Requirement::ADMIN)?;
    input
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    ensure_slug_free(&state, &input.slug, None)?;

    let project = state.content.create_project(&input, &admin.id)?;
    log::info!("📝 Project {} created by {}", project.slug, admin.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Project created",
            "project": project,
        })),
    )
        .into_response())
}

/// PUT /api/projects/{id}
pub async fn update_project(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Json(input): Json<ProjectInput>,
) -> ApiResult<Json<serde_json::Value>> {
    let admin = require(session.user(), Requirement::ADMIN)?;
    input
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    ensure_slug_free(&state, &input.slug, Some(&id))?;

    let project = state
        .content
        .update_project(&id, &input)?
        .ok_or(ApiError::NotFound("Project not found"))?;
    log::info!("📝 Project {} updated by {}", project.id, admin.id);

    Ok(Json(json!({
        "success": true,
        "message": "Project updated",
        "project": project,
    })))
}

/// PATCH /api/projects/{id}
pub async fn patch_project(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Json(patch): Json<ProjectPatch>,
) -> ApiResult<Json<serde_json::Value>> {
    require(session.user(), Requirement::ADMIN)?;
    if let Some(slug) = &patch.slug {
        let candidate = ProjectInput {
            title: "-".to_string(),
            slug: slug.clone(),
            ..Default::default()
        };
        candidate
            .validate()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        ensure_slug_free(&state, slug, Some(&id))?;
    }

    let project = state
        .content
        .patch_project(&id, &patch)?
        .ok_or(ApiError::NotFound("Project not found"))?;

    Ok(Json(json!({
        "success": true,
        "message": "Project updated",
        "project": project,
    })))
}

/// DELETE /api/projects/{id}
pub async fn delete_project(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let admin = require(session.user(), Requirement::ADMIN)?;
    if !state.content.delete_project(&id)? {
        return Err(ApiError::NotFound("Project not found"));
    }
    log::info!("🗑️ Project {} deleted by {}", id, admin.id);

    Ok(Json(json!({ "success": true, "message": "Project deleted" })))
}

// ============================================================================
// CONTACT
// ============================================================================

/// POST /api/contact - Public contact form
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(req): Json<ContactRequest>,
) -> ApiResult<Response> {
    req.validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let message = state
        .content
        .create_message(&req.name, &req.email, &req.message)?;
    log::info!("📬 Contact message {} stored", message.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Message sent",
            "id": message.id,
        })),
    )
        .into_response())
}

/// GET /api/contact - Admin inbox
pub async fn list_messages(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<Vec<ContactMessage>>> {
    require(session.user(), Requirement::ADMIN)?;
    Ok(Json(state.content.latest_messages(INBOX_LIMIT)?))
}

/// PATCH /api/contact/{id}
pub async fn mark_message(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Json(flag): Json<ReadFlag>,
) -> ApiResult<Json<ContactMessage>> {
    require(session.user(), Requirement::ADMIN)?;
    let read = flag
        .read
        .ok_or_else(|| ApiError::BadRequest("The \"read\" field must be a boolean".to_string()))?;

    let message = state
        .content
        .set_message_read(&id, read)?
        .ok_or(ApiError::NotFound("Message not found"))?;
    Ok(Json(message))
}

/// POST /api/contact/mark-all-read
pub async fn mark_all_read(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<serde_json::Value>> {
    require(session.user(), Requirement::ADMIN)?;
    let updated = state.content.mark_all_read()?;
    Ok(Json(json!({ "success": true, "updated": updated })))
}

/// GET /api/admin/stats
pub async fn admin_stats(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<DashboardStats>> {
    require(session.user(), Requirement::ADMIN)?;
    Ok(Json(state.content.stats()?))
}

// ============================================================================
// PROFILE
// ============================================================================

/// GET /api/profile
pub async fn get_profile(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<Account>> {
    let user = require(session.user(), Requirement::Authenticated)?;
    let account = state
        .auth
        .db
        .find_by_id(&user.id)?
        .ok_or(ApiError::NotFound("User not found"))?;
    Ok(Json(account))
}

/// PUT /api/profile - Update name/avatar and hand back a fresh token
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<ProfileUpdateRequest>,
) -> ApiResult<Response> {
    let user = require(session.user(), Requirement::Authenticated)?;

    let name = req.name.trim();
    if name.chars().count() < 2 {
        return Err(ApiError::BadRequest(
            "Name must be at least 2 characters".to_string(),
        ));
    }
    let image = req
        .image_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty());
    if let Some(url) = image {
        validate_image_url(url).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    }

    if !state.auth.db.update_profile(&user.id, name, image)? {
        return Err(ApiError::NotFound("User not found"));
    }
    let account = state
        .auth
        .db
        .find_by_id(&user.id)?
        .ok_or(ApiError::NotFound("User not found"))?;

    let token = state
        .auth
        .tokens
        .mint(account.claims(), state.auth.clock.now())?;
    let cookie = session_cookie(&token, state.auth.tokens.lifetime());

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(ProfileResponse {
            success: true,
            token,
            user: account,
        }),
    )
        .into_response())
}

/// Avatar URLs must be http(s) and look like an image.
fn validate_image_url(url: &str) -> Result<(), &'static str> {
    if url.chars().any(char::is_whitespace) {
        return Err("Image URL is not valid");
    }
    let lower = url.to_ascii_lowercase();
    let rest = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"))
        .ok_or("Image URL must be HTTP or HTTPS")?;

    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() {
        return Err("Image URL is not valid");
    }

    let has_extension = IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext));
    let has_image_path = IMAGE_PATHS.iter().any(|path| lower.contains(path));
    if !has_extension && !has_image_path {
        return Err("URL does not look like an image");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_url_rules() {
        assert!(validate_image_url("https://cdn.example.com/me.PNG").is_ok());
        assert!(validate_image_url("http://example.com/avatar/123").is_ok());
        assert!(validate_image_url("ftp://example.com/me.png").is_err());
        assert!(validate_image_url("https:///me.png").is_err());
        assert!(validate_image_url("https://example.com/page.html").is_err());
        assert!(validate_image_url("javascript:alert(1)//.png").is_err());
    }
}
