//! Server-rendered pages
//!
//! Protected pages go through [`gate_page`]: anonymous visitors are sent to
//! the sign-in page, signed-in visitors without the role get a 403 page.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

use super::web::{ApiResult, AppState};
use crate::auth::{
    gate::{authorize, classify, Decision, DenyReason, GateState, Requirement},
    AccountStore, CurrentUser, Session,
};
use crate::content::Project;

pub(crate) fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, nav: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html><head><meta charset="utf-8"><title>{title}</title>
<link rel="stylesheet" href="/static/site.css"></head>
<body>
<nav>{nav}</nav>
<main>{body}</main>
</body></html>"#,
        title = escape_html(title),
        nav = nav,
        body = body,
    )
}

fn nav_for(user: Option<&CurrentUser>) -> String {
    let mut links = vec![r#"<a href="/">Home</a>"#.to_string()];
    match user {
        None => links.push(r#"<a href="/auth/signin">Sign in</a>"#.to_string()),
        Some(u) => {
            links.push(format!(
                r#"<a href="/profile">{}</a>"#,
                escape_html(u.display_name())
            ));
            // Role is the only input here; no email-based shortcut.
            if classify(user, Requirement::ADMIN) == GateState::AuthenticatedAuthorized {
                links.push(r#"<a href="/admin">Admin</a>"#.to_string());
            }
        }
    }
    links.join(" | ")
}

/// Run the gate for a page; `Err` is the response to send instead.
fn gate_page<'a>(
    session: &'a Session,
    required: Requirement,
    path: &str,
) -> Result<&'a CurrentUser, Response> {
    match authorize(session.user(), required) {
        Decision::Allow(user) => Ok(user),
        Decision::Deny(DenyReason::Unauthenticated) => {
            Err(Redirect::to(&format!("/auth/signin?callbackUrl={}", path)).into_response())
        }
        Decision::Deny(DenyReason::InsufficientRole { .. }) => Err((
            StatusCode::FORBIDDEN,
            Html(layout(
                "Forbidden",
                &nav_for(session.user()),
                "<h1>403</h1><p>Your account does not have access to this page.</p>",
            )),
        )
            .into_response()),
    }
}

fn project_list(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "<p>No projects yet.</p>".to_string();
    }
    let items: Vec<String> = projects
        .iter()
        .map(|p| {
            format!(
                "<li><strong>{}</strong> {}</li>",
                escape_html(&p.title),
                escape_html(&p.description)
            )
        })
        .collect();
    format!("<ul>{}</ul>", items.join(""))
}

/// GET /
pub async fn home(State(state): State<AppState>, session: Session) -> ApiResult<Html<String>> {
    let featured: Vec<Project> = state
        .content
        .list_projects(true)?
        .into_iter()
        .filter(|p| p.featured)
        .collect();

    let body = format!("<h1>Portfolio</h1><h2>Featured work</h2>{}", project_list(&featured));
    Ok(Html(layout("Portfolio", &nav_for(session.user()), &body)))
}

/// GET /profile
pub async fn profile(State(state): State<AppState>, session: Session) -> ApiResult<Response> {
    let user = match gate_page(&session, Requirement::Authenticated, "/profile") {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let account = state.auth.db.find_by_id(&user.id)?;
    let (name, created) = account
        .map(|a| (a.name.unwrap_or_default(), a.created_at))
        .unwrap_or_default();

    let body = format!(
        "<h1>Profile</h1><dl><dt>Name</dt><dd>{}</dd><dt>Email</dt><dd>{}</dd>\
         <dt>Role</dt><dd>{}</dd><dt>Member since</dt><dd>{}</dd></dl>",
        escape_html(&name),
        escape_html(&user.email),
        user.role,
        escape_html(&created),
    );
    Ok(Html(layout("Profile", &nav_for(Some(user)), &body)).into_response())
}

/// GET /admin
pub async fn admin(State(state): State<AppState>, session: Session) -> ApiResult<Response> {
    let user = match gate_page(&session, Requirement::ADMIN, "/admin") {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let stats = state.content.stats()?;
    let projects = state.content.list_projects(false)?;

    let body = format!(
        "<h1>Administration</h1>\
         <p>Signed in as {}</p>\
         <ul>\
         <li>Projects: {} ({} published, {}%)</li>\
         <li>Messages: {} ({} unread, {}% read)</li>\
         </ul>\
         <h2>All projects</h2>{}",
        escape_html(user.display_name()),
        stats.total_projects,
        stats.published_projects,
        stats.published_percentage(),
        stats.total_messages,
        stats.unread_messages,
        stats.read_percentage(),
        project_list(&projects),
    );
    Ok(Html(layout("Administration", &nav_for(Some(user)), &body)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;

    fn user(role: Role) -> CurrentUser {
        CurrentUser {
            id: "acc_1".to_string(),
            email: "a@x.com".to_string(),
            name: Some("<Ana>".to_string()),
            role,
            image: None,
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>\"x\" & 'y'</b>"), "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;");
    }

    #[test]
    fn test_nav_shows_admin_link_by_role_only() {
        let admin = user(Role::Admin);
        let plain = user(Role::User);

        assert!(nav_for(Some(&admin)).contains("/admin"));
        assert!(!nav_for(Some(&plain)).contains("/admin"));
        assert!(nav_for(None).contains("/auth/signin"));
        assert!(nav_for(Some(&plain)).contains("&lt;Ana&gt;"));
    }

    #[test]
    fn test_gate_page_outcomes() {
        let anonymous = Session(None);
        let response = gate_page(&anonymous, Requirement::ADMIN, "/admin").unwrap_err();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let plain = Session(Some(user(Role::User)));
        let response = gate_page(&plain, Requirement::ADMIN, "/admin").unwrap_err();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let admin = Session(Some(user(Role::Admin)));
        assert!(gate_page(&admin, Requirement::ADMIN, "/admin").is_ok());
    }
}
