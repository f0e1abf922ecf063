//! Raw statement execution.
//!
//! Statements run exactly as given: no rewriting, no timeout and no row cap.
//! The text must hold exactly one statement; comments and a trailing `;` are
//! fine.

use rusqlite::types::ValueRef;
use rusqlite::Batch;
use tracing::debug;

use sqlchat_core::error::{Result, SqlChatError};
use sqlchat_core::types::QueryResult;

use crate::db::Database;

impl Database {
    /// Execute one SQL statement against the whole database.
    ///
    /// Execution is not limited to the configured table scope.
    pub fn run(&self, sql: &str) -> Result<QueryResult> {
        let max_len = self.max_string_length();
        let result = self.with_conn(|conn| {
            let mut batch = Batch::new(conn, sql);
            let mut stmt = batch
                .next()
                .map_err(|e| SqlChatError::Query(e.to_string()))?
                .ok_or_else(|| SqlChatError::Query("model returned an empty statement".into()))?;
            if batch
                .next()
                .map_err(|e| SqlChatError::Query(e.to_string()))?
                .is_some()
            {
                return Err(SqlChatError::Query(
                    "model returned more than one statement".into(),
                ));
            }
            let columns: Vec<String> = stmt
                .column_names()
                .into_iter()
                .map(String::from)
                .collect();
            let width = columns.len();

            let mut rows = stmt
                .query([])
                .map_err(|e| SqlChatError::Query(e.to_string()))?;
            let mut out = Vec::new();
            while let Some(row) = rows.next().map_err(|e| SqlChatError::Query(e.to_string()))? {
                let mut cells = Vec::with_capacity(width);
                for idx in 0..width {
                    let value = row
                        .get_ref(idx)
                        .map_err(|e| SqlChatError::Query(e.to_string()))?;
                    cells.push(render_value(value, max_len));
                }
                out.push(cells);
            }
            Ok(QueryResult { columns, rows: out })
        })?;

        debug!(rows = result.row_count(), "Statement executed");
        Ok(result)
    }
}

/// Render a single SQLite value as text, truncating long strings.
pub(crate) fn render_value(value: ValueRef<'_>, max_len: usize) -> String {
    match value {
        ValueRef::Null => "NULL".to_string(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(bytes) => truncate(&String::from_utf8_lossy(bytes), max_len),
        ValueRef::Blob(bytes) => format!("<{} bytes>", bytes.len()),
    }
}

fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_len).collect();
    cut.push_str("...");
    cut
}
