//! Shared SQLite connection handling

use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Stored JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Connection lock poisoned")]
    Poisoned,

    #[error("Duplicate {0}")]
    Duplicate(&'static str),
}

/// Turn a UNIQUE constraint failure into `Duplicate(what)`.
pub(crate) fn unique_violation(e: rusqlite::Error, what: &'static str) -> StoreError {
    match e {
        rusqlite::Error::SqliteFailure(ref err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            StoreError::Duplicate(what)
        }
        e => StoreError::Sqlite(e),
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// One SQLite connection shared behind a mutex
#[derive(Clone)]
pub struct SharedConnection {
    conn: Arc<Mutex<Connection>>,
}

impl SharedConnection {
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Ok(Self::from(Connection::open(path)?))
    }

    pub fn in_memory() -> StoreResult<Self> {
        Ok(Self::from(Connection::open_in_memory()?))
    }

    pub fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl From<Connection> for SharedConnection {
    fn from(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }
}
