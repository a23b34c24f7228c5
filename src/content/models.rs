//! Portfolio content models

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub content: String,
    pub image_url: String,
    pub github_url: String,
    pub live_url: String,
    pub technologies: Vec<String>,
    pub published: bool,
    pub featured: bool,
    pub views: i64,
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Body of project create and full update
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectInput {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub content: String,
    pub image_url: String,
    pub github_url: String,
    pub live_url: String,
    pub technologies: Vec<String>,
    pub published: bool,
    pub featured: bool,
}

impl ProjectInput {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() || self.slug.trim().is_empty() {
            return Err("Title and slug are required");
        }
        if !self
            .slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err("Slug may only contain lowercase letters, digits and '-'");
        }
        Ok(())
    }
}

/// Body of a partial project update; absent fields stay untouched
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProjectPatch {
    pub published: Option<bool>,
    pub featured: Option<bool>,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub read: bool,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

impl ContactRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.message.trim().is_empty()
        {
            return Err("All fields are required");
        }
        if !looks_like_email(self.email.trim()) {
            return Err("Invalid email");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct ReadFlag {
    pub read: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_projects: i64,
    pub published_projects: i64,
    pub total_messages: i64,
    pub unread_messages: i64,
}

impl DashboardStats {
    pub fn published_percentage(&self) -> i64 {
        percentage(self.published_projects, self.total_projects)
    }

    pub fn read_percentage(&self) -> i64 {
        percentage(self.total_messages - self.unread_messages, self.total_messages)
    }
}

fn percentage(part: i64, total: i64) -> i64 {
    if total > 0 {
        ((part as f64 / total as f64) * 100.0).round() as i64
    } else {
        0
    }
}

/// `local@domain.tld` with no whitespace
pub fn looks_like_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shape() {
        assert!(looks_like_email("ana@example.com"));
        assert!(!looks_like_email("ana@example"));
        assert!(!looks_like_email("ana example@x.com"));
        assert!(!looks_like_email("@x.com"));
        assert!(!looks_like_email("a@@x.com"));
    }

    #[test]
    fn test_contact_request_validation() {
        let ok = ContactRequest {
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            message: "Hola".to_string(),
        };
        assert!(ok.validate().is_ok());

        let blank = ContactRequest {
            name: " ".to_string(),
            ..ok
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_project_input_validation() {
        let input = ProjectInput {
            title: "Site".to_string(),
            slug: "my-site-2".to_string(),
            ..Default::default()
        };
        assert!(input.validate().is_ok());

        let bad_slug = ProjectInput {
            slug: "My Site".to_string(),
            ..input.clone()
        };
        assert!(bad_slug.validate().is_err());
        assert!(ProjectInput::default().validate().is_err());
    }

    #[test]
    fn test_dashboard_percentages() {
        let stats = DashboardStats {
            total_projects: 3,
            published_projects: 2,
            total_messages: 0,
            unread_messages: 0,
        };
        assert_eq!(stats.published_percentage(), 67);
        assert_eq!(stats.read_percentage(), 0);
    }
}
