//! SQLite storage for projects and contact messages

use rusqlite::{params, OptionalExtension, Row};
use std::path::Path;

use super::models::{ContactMessage, DashboardStats, Project, ProjectInput, ProjectPatch};
use crate::db::{unique_violation, SharedConnection, StoreResult};

#[derive(Clone)]
pub struct ContentDatabase {
    conn: SharedConnection,
}

const PROJECT_COLUMNS: &str = "id, title, slug, description, content, image_url, github_url, \
     live_url, technologies, published, featured, views, user_id, created_at, updated_at";

const MESSAGE_COLUMNS: &str = "id, name, email, message, read, created_at";

fn project_from_row(row: &Row<'_>) -> rusqlite::Result<(Project, String)> {
    let technologies: String = row.get(8)?;
    Ok((
        Project {
            id: row.get(0)?,
            title: row.get(1)?,
            slug: row.get(2)?,
            description: row.get(3)?,
            content: row.get(4)?,
            image_url: row.get(5)?,
            github_url: row.get(6)?,
            live_url: row.get(7)?,
            technologies: Vec::new(),
            published: row.get::<_, i32>(9)? != 0,
            featured: row.get::<_, i32>(10)? != 0,
            views: row.get(11)?,
            user_id: row.get(12)?,
            created_at: row.get(13)?,
            updated_at: row.get(14)?,
        },
        technologies,
    ))
}

/// Technologies are stored as a JSON array in a TEXT column.
fn with_technologies((mut project, raw): (Project, String)) -> StoreResult<Project> {
    project.technologies = serde_json::from_str(&raw)?;
    Ok(project)
}

fn message_from_row(row: &Row<'_>) -> rusqlite::Result<ContactMessage> {
    Ok(ContactMessage {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        message: row.get(3)?,
        read: row.get::<_, i32>(4)? != 0,
        created_at: row.get(5)?,
    })
}

impl ContentDatabase {
    pub fn new<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Self::with_connection(SharedConnection::open(path)?)
    }

    pub fn in_memory() -> StoreResult<Self> {
        Self::with_connection(SharedConnection::in_memory()?)
    }

    pub fn with_connection(conn: SharedConnection) -> StoreResult<Self> {
        let db = Self { conn };
        db.init_tables()?;
        Ok(db)
    }

    fn init_tables(&self) -> StoreResult<()> {
        let conn = self.conn.lock()?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS projects (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                slug TEXT UNIQUE NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                content TEXT NOT NULL DEFAULT '',
                image_url TEXT NOT NULL DEFAULT '',
                github_url TEXT NOT NULL DEFAULT '',
                live_url TEXT NOT NULL DEFAULT '',
                technologies TEXT NOT NULL DEFAULT '[]',
                published INTEGER NOT NULL DEFAULT 0,
                featured INTEGER NOT NULL DEFAULT 0,
                views INTEGER NOT NULL DEFAULT 0,
                user_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS contact_messages (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                message TEXT NOT NULL,
                read INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_projects_slug ON projects(slug);
            CREATE INDEX IF NOT EXISTS idx_messages_created ON contact_messages(created_at);
            "#,
        )?;

        Ok(())
    }

    // ==================== Projects ====================

    fn query_projects(&self, sql: &str, value: Option<&str>) -> StoreResult<Vec<Project>> {
        let conn = self.conn.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = match value {
            Some(v) => stmt
                .query_map(params![v], project_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?,
            None => stmt
                .query_map([], project_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        rows.into_iter().map(with_technologies).collect()
    }

    pub fn list_projects(&self, published_only: bool) -> StoreResult<Vec<Project>> {
        let filter = if published_only { "WHERE published = 1" } else { "" };
        self.query_projects(
            &format!(
                "SELECT {} FROM projects {} ORDER BY created_at DESC",
                PROJECT_COLUMNS, filter
            ),
            None,
        )
    }

    pub fn find_project(&self, id: &str) -> StoreResult<Option<Project>> {
        let sql = format!("SELECT {} FROM projects WHERE id = ?1", PROJECT_COLUMNS);
        Ok(self.query_projects(&sql, Some(id))?.into_iter().next())
    }

    pub fn find_project_by_slug(&self, slug: &str) -> StoreResult<Option<Project>> {
        let sql = format!("SELECT {} FROM projects WHERE slug = ?1", PROJECT_COLUMNS);
        Ok(self.query_projects(&sql, Some(slug))?.into_iter().next())
    }

    pub fn create_project(&self, input: &ProjectInput, user_id: &str) -> StoreResult<Project> {
        let now = chrono::Utc::now().to_rfc3339();
        let project = Project {
            id: uuid::Uuid::new_v4().to_string(),
            title: input.title.trim().to_string(),
            slug: input.slug.trim().to_string(),
            description: input.description.clone(),
            content: input.content.clone(),
            image_url: input.image_url.clone(),
            github_url: input.github_url.clone(),
            live_url: input.live_url.clone(),
            technologies: input.technologies.clone(),
            published: input.published,
            featured: input.featured,
            views: 0,
            user_id: user_id.to_string(),
            created_at: now.clone(),
            updated_at: now,
        };

        let conn = self.conn.lock()?;
        conn.execute(
            &format!(
                "INSERT INTO projects ({}) VALUES \
                 (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                PROJECT_COLUMNS
            ),
            params![
                project.id,
                project.title,
                project.slug,
                project.description,
                project.content,
                project.image_url,
                project.github_url,
                project.live_url,
                serde_json::to_string(&project.technologies)?,
                project.published as i32,
                project.featured as i32,
                project.views,
                project.user_id,
                project.created_at,
                project.updated_at,
            ],
        )
        .map_err(|e| unique_violation(e, "slug"))?;
        Ok(project)
    }

    /// Replace every editable field. Returns `None` when the project is gone.
    pub fn update_project(&self, id: &str, input: &ProjectInput) -> StoreResult<Option<Project>> {
        let now = chrono::Utc::now().to_rfc3339();
        let changed = {
            let conn = self.conn.lock()?;
            conn.execute(
                "UPDATE projects SET title = ?1, slug = ?2, description = ?3, content = ?4,
                     image_url = ?5, github_url = ?6, live_url = ?7, technologies = ?8,
                     published = ?9, featured = ?10, updated_at = ?11
                 WHERE id = ?12",
                params![
                    input.title.trim(),
                    input.slug.trim(),
                    input.description,
                    input.content,
                    input.image_url,
                    input.github_url,
                    input.live_url,
                    serde_json::to_string(&input.technologies)?,
                    input.published as i32,
                    input.featured as i32,
                    now,
                    id,
                ],
            )
            .map_err(|e| unique_violation(e, "slug"))?
        };
        if changed == 0 {
            return Ok(None);
        }
        self.find_project(id)
    }

    pub fn patch_project(&self, id: &str, patch: &ProjectPatch) -> StoreResult<Option<Project>> {
        let Some(mut project) = self.find_project(id)? else {
            return Ok(None);
        };

        if let Some(published) = patch.published {
            project.published = published;
        }
        if let Some(featured) = patch.featured {
            project.featured = featured;
        }
        if let Some(title) = &patch.title {
            project.title = title.trim().to_string();
        }
        if let Some(slug) = &patch.slug {
            project.slug = slug.trim().to_string();
        }
        if let Some(description) = &patch.description {
            project.description = description.clone();
        }
        project.updated_at = chrono::Utc::now().to_rfc3339();

        let conn = self.conn.lock()?;
        conn.execute(
            "UPDATE projects SET published = ?1, featured = ?2, title = ?3, slug = ?4,
                 description = ?5, updated_at = ?6
             WHERE id = ?7",
            params![
                project.published as i32,
                project.featured as i32,
                project.title,
                project.slug,
                project.description,
                project.updated_at,
                project.id,
            ],
        )
        .map_err(|e| unique_violation(e, "slug"))?;
        Ok(Some(project))
    }

    pub fn delete_project(&self, id: &str) -> StoreResult<bool> {
        let conn = self.conn.lock()?;
        let deleted = conn.execute("DELETE FROM projects WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    pub fn increment_views(&self, id: &str) -> StoreResult<()> {
        let conn = self.conn.lock()?;
        conn.execute(
            "UPDATE projects SET views = views + 1 WHERE id = ?1",
            params![id],
        )?;
        Ok(())
    }

    // ==================== Contact messages ====================

    pub fn create_message(&self, name: &str, email: &str, message: &str) -> StoreResult<ContactMessage> {
        let msg = ContactMessage {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            message: message.trim().to_string(),
            read: false,
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        let conn = self.conn.lock()?;
        conn.execute(
            &format!(
                "INSERT INTO contact_messages ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                MESSAGE_COLUMNS
            ),
            params![msg.id, msg.name, msg.email, msg.message, msg.read as i32, msg.created_at],
        )?;
        Ok(msg)
    }

    pub fn latest_messages(&self, limit: usize) -> StoreResult<Vec<ContactMessage>> {
        let conn = self.conn.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM contact_messages ORDER BY created_at DESC LIMIT ?1",
            MESSAGE_COLUMNS
        ))?;
        let messages = stmt
            .query_map(params![limit as i64], message_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(messages)
    }

    pub fn set_message_read(&self, id: &str, read: bool) -> StoreResult<Option<ContactMessage>> {
        let conn = self.conn.lock()?;
        let changed = conn.execute(
            "UPDATE contact_messages SET read = ?1 WHERE id = ?2",
            params![read as i32, id],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        let message = conn
            .query_row(
                &format!("SELECT {} FROM contact_messages WHERE id = ?1", MESSAGE_COLUMNS),
                params![id],
                message_from_row,
            )
            .optional()?;
        Ok(message)
    }

    pub fn mark_all_read(&self) -> StoreResult<usize> {
        let conn = self.conn.lock()?;
        let changed = conn.execute("UPDATE contact_messages SET read = 1 WHERE read = 0", [])?;
        Ok(changed)
    }

    pub fn stats(&self) -> StoreResult<DashboardStats> {
        let conn = self.conn.lock()?;
        let count = |sql: &str| -> rusqlite::Result<i64> { conn.query_row(sql, [], |row| row.get(0)) };

        Ok(DashboardStats {
            total_projects: count("SELECT COUNT(*) FROM projects")?,
            published_projects: count("SELECT COUNT(*) FROM projects WHERE published = 1")?,
            total_messages: count("SELECT COUNT(*) FROM contact_messages")?,
            unread_messages: count("SELECT COUNT(*) FROM contact_messages WHERE read = 0")?,
        })
    }
}
