//! SQLite account store

use rusqlite::{params, OptionalExtension, Row};
use std::path::Path;

use super::models::{Account, Role};
use crate::db::{unique_violation, SharedConnection, StoreResult};

/// Read access to persisted accounts.
///
/// The verifier and the session projector only ever read through this.
pub trait AccountStore: Send + Sync {
    fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>>;
    fn find_by_id(&self, id: &str) -> StoreResult<Option<Account>>;
}

/// Account table on a shared SQLite connection
#[derive(Clone)]
pub struct AuthDatabase {
    conn: SharedConnection,
}

const ACCOUNT_COLUMNS: &str =
    "id, email, name, password_hash, role, image, created_at, updated_at";

fn account_from_row(row: &Row<'_>) -> rusqlite::Result<Account> {
    let role: String = row.get(4)?;
    Ok(Account {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        password_hash: row.get(3)?,
        role: Role::parse(&role),
        image: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

impl AuthDatabase {
    /// Open (or create) the database file and initialize tables
    pub fn new<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Self::with_connection(SharedConnection::open(path)?)
    }

    /// Create in-memory database (for testing)
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
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT UNIQUE NOT NULL,
                name TEXT,
                password_hash TEXT,
                role TEXT NOT NULL DEFAULT 'USER',
                image TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);
            "#,
        )?;

        Ok(())
    }

    // ==================== Account Operations ====================

    pub fn create_account(&self, account: &Account) -> StoreResult<()> {
        let conn = self.conn.lock()?;
        conn.execute(
            &format!(
                "INSERT INTO users ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                ACCOUNT_COLUMNS
            ),
            params![
                account.id,
                account.email,
                account.name,
                account.password_hash,
                account.role.as_str(),
                account.image,
                account.created_at,
                account.updated_at,
            ],
        )
        .map_err(|e| unique_violation(e, "email"))?;
        Ok(())
    }

    fn find_one(&self, column: &str, value: &str) -> StoreResult<Option<Account>> {
        let conn = self.conn.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM users WHERE {} = ?1",
            ACCOUNT_COLUMNS, column
        ))?;
        let account = stmt
            .query_row(params![value], account_from_row)
            .optional()?;
        Ok(account)
    }

    /// Update display name and avatar. Returns false when no row matched.
    pub fn update_profile(
        &self,
        id: &str,
        name: &str,
        image: Option<&str>,
    ) -> StoreResult<bool> {
        let conn = self.conn.lock()?;
        let now = chrono::Utc::now().to_rfc3339();
        let changed = conn.execute(
            "UPDATE users SET name = ?1, image = ?2, updated_at = ?3 WHERE id = ?4",
            params![name, image, now, id],
        )?;
        Ok(changed > 0)
    }

    /// Change an account's role. Only the seeding tool calls this.
    pub fn set_role(&self, id: &str, role: Role) -> StoreResult<bool> {
        let conn = self.conn.lock()?;
        let now = chrono::Utc::now().to_rfc3339();
        let changed = conn.execute(
            "UPDATE users SET role = ?1, updated_at = ?2 WHERE id = ?3",
            params![role.as_str(), now, id],
        )?;
        Ok(changed > 0)
    }
}

impl AccountStore for AuthDatabase {
    fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        self.find_one("email", email)
    }

    fn find_by_id(&self, id: &str) -> StoreResult<Option<Account>> {
        self.find_one("id", id)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::StoreError;
    use assert_matches::assert_matches;

    pub(crate) fn sample_account(id: &str, email: &str, role: Role) -> Account {
        let now = chrono::Utc::now().to_rfc3339();
        Account {
            id: id.to_string(),
            email: email.to_string(),
            name: Some("Sample".to_string()),
            password_hash: Some("hash123".to_string()),
            role,
            image: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    #[test]
    fn test_create_and_find_account() {
        let db = AuthDatabase::in_memory().unwrap();
        db.create_account(&sample_account("acc_1", "a@x.com", Role::Admin))
            .unwrap();

        let found = db.find_by_email("a@x.com").unwrap().unwrap();
        assert_eq!(found.id, "acc_1");
        assert_eq!(found.role, Role::Admin);

        let by_id = db.find_by_id("acc_1").unwrap().unwrap();
        assert_eq!(by_id.email, "a@x.com");
    }

    #[test]
    fn test_email_lookup_is_exact() {
        let db = AuthDatabase::in_memory().unwrap();
        db.create_account(&sample_account("acc_1", "a@x.com", Role::User))
            .unwrap();

        assert!(db.find_by_email("A@x.com").unwrap().is_none());
        assert!(db.find_by_email("missing@x.com").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let db = AuthDatabase::in_memory().unwrap();
        db.create_account(&sample_account("acc_1", "a@x.com", Role::User))
            .unwrap();

        let result = db.create_account(&sample_account("acc_2", "a@x.com", Role::User));
        assert_matches!(result, Err(StoreError::Duplicate("email")));
    }

    #[test]
    fn test_unknown_stored_role_loads_as_unrecognized() {
        let db = AuthDatabase::in_memory().unwrap();
        db.create_account(&sample_account("acc_1", "a@x.com", Role::User))
            .unwrap();
        db.conn
            .lock()
            .unwrap()
            .execute("UPDATE users SET role = 'ROOT' WHERE id = 'acc_1'", [])
            .unwrap();

        let found = db.find_by_id("acc_1").unwrap().unwrap();
        assert_eq!(found.role, Role::Unrecognized);
    }

    #[test]
    fn test_update_profile_and_role() {
        let db = AuthDatabase::in_memory().unwrap();
        db.create_account(&sample_account("acc_1", "a@x.com", Role::User))
            .unwrap();

        assert!(db
            .update_profile("acc_1", "Ana", Some("https://cdn.x.com/a.png"))
            .unwrap());
        assert!(db.set_role("acc_1", Role::Admin).unwrap());
        assert!(!db.update_profile("nobody", "Ana", None).unwrap());

        let found = db.find_by_id("acc_1").unwrap().unwrap();
        assert_eq!(found.name.as_deref(), Some("Ana"));
        assert_eq!(found.image.as_deref(), Some("https://cdn.x.com/a.png"));
        assert_eq!(found.role, Role::Admin);
    }

    #[test]
    fn test_file_backed_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auth.db");

        {
            let db = AuthDatabase::new(&path).unwrap();
            db.create_account(&sample_account("acc_1", "a@x.com", Role::Editor))
                .unwrap();
        }

        let reopened = AuthDatabase::new(&path).unwrap();
        let found = reopened.find_by_email("a@x.com").unwrap().unwrap();
        assert_eq!(found.role, Role::Editor);
    }
}
