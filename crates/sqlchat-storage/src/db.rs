//! Database connection management.
//!
//! Wraps a single rusqlite Connection in a Mutex together with the table
//! scope and rendering limits taken from [`DatabaseConfig`].

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use tracing::info;

use sqlchat_core::config::DatabaseConfig;
use sqlchat_core::error::{Result, SqlChatError};

/// Thread-safe SQLite database wrapper.
pub struct Database {
    conn: Mutex<Connection>,
    table_scope: Option<Vec<String>>,
    sample_rows: usize,
    max_string_length: usize,
}

impl Database {
    /// Open (or create) the database at `path` with the settings in `config`.
    ///
    /// `config.path` is ignored in favour of the already-resolved `path`.
    pub fn open(path: &Path, config: &DatabaseConfig) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)
            .map_err(|e| SqlChatError::Storage(format!("Failed to open database: {}", e)))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;",
        )
        .map_err(|e| SqlChatError::Storage(format!("Failed to set pragmas: {}", e)))?;

        info!(path = %path.display(), "Database opened");

        Ok(Self::from_connection(conn, config))
    }

    /// Open an in-memory database (for tests and fixtures).
    pub fn in_memory(config: &DatabaseConfig) -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| SqlChatError::Storage(format!("Failed to open in-memory db: {}", e)))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| SqlChatError::Storage(format!("Failed to set pragmas: {}", e)))?;
        Ok(Self::from_connection(conn, config))
    }

    fn from_connection(conn: Connection, config: &DatabaseConfig) -> Self {
        Self {
            conn: Mutex::new(conn),
            table_scope: config.table_scope().map(|s| s.to_vec()),
            sample_rows: config.sample_rows_in_table_info,
            max_string_length: config.max_string_length,
        }
    }

    /// Tables described to the model, `None` meaning all of them.
    pub fn table_scope(&self) -> Option<&[String]> {
        self.table_scope.as_deref()
    }

    pub(crate) fn sample_rows(&self) -> usize {
        self.sample_rows
    }

    pub(crate) fn max_string_length(&self) -> usize {
        self.max_string_length
    }

    /// Execute a closure with a reference to the underlying connection.
    ///
    /// The mutex is held for the duration of the closure.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SqlChatError::Storage(format!("Database lock poisoned: {}", e)))?;
        f(&conn)
    }

    /// Liveness check used by the health endpoint.
    pub fn ping(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                .map_err(|e| SqlChatError::Storage(e.to_string()))?;
            Ok(())
        })
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("table_scope", &self.table_scope)
            .finish()
    }
}
