//! Live schema introspection.
//!
//! Produces the text the model sees: each table's `CREATE` statement followed
//! by a comment block with a few sample rows. Nothing is cached.

use tracing::debug;

use sqlchat_core::error::{Result, SqlChatError};
use sqlchat_core::types::SchemaDescription;

use crate::db::Database;
use crate::executor::render_value;

impl Database {
    /// Describe the tables in the configured scope.
    pub fn schema_description(&self) -> Result<SchemaDescription> {
        let scope = self.table_scope().map(|s| s.to_vec());
        self.table_info(scope.as_deref())
    }

    /// Describe the tables named in `scope`, or every user table when `None`.
    ///
    /// Naming a table that does not exist is a configuration error.
    pub fn table_info(&self, scope: Option<&[String]>) -> Result<SchemaDescription> {
        let sample_rows = self.sample_rows();
        let max_len = self.max_string_length();

        let text = self.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT name, sql FROM sqlite_master
                     WHERE type IN ('table', 'view') AND name NOT LIKE 'sqlite_%'
                     ORDER BY name",
                )
                .map_err(|e| SqlChatError::Storage(e.to_string()))?;
            let tables: Vec<(String, String)> = stmt
                .query_map([], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    ))
                })
                .map_err(|e| SqlChatError::Storage(e.to_string()))?
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| SqlChatError::Storage(e.to_string()))?;

            let selected: Vec<&(String, String)> = match scope {
                Some(names) => {
                    let missing: Vec<&String> = names
                        .iter()
                        .filter(|n| !tables.iter().any(|(t, _)| t == *n))
                        .collect();
                    if !missing.is_empty() {
                        return Err(SqlChatError::Config(format!(
                            "include_tables {:?} not found in database",
                            missing
                        )));
                    }
                    tables.iter().filter(|(t, _)| names.contains(t)).collect()
                }
                None => tables.iter().collect(),
            };

            let mut blocks = Vec::with_capacity(selected.len());
            for (name, create_sql) in selected {
                let mut block = create_sql.trim().to_string();
                if sample_rows > 0 {
                    block.push_str("\n\n");
                    block.push_str(&sample_block(conn, name, sample_rows, max_len)?);
                }
                blocks.push(block);
            }
            Ok(blocks.join("\n\n"))
        })?;

        debug!(bytes = text.len(), "Schema description built");
        Ok(SchemaDescription(text))
    }
}

fn sample_block(
    conn: &rusqlite::Connection,
    table: &str,
    limit: usize,
    max_len: usize,
) -> Result<String> {
    let sql = format!(
        "SELECT * FROM \"{}\" LIMIT {}",
        table.replace('"', "\"\""),
        limit
    );
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| SqlChatError::Storage(e.to_string()))?;
    let header = stmt.column_names().join("\t");
    let width = stmt.column_count();

    let mut lines = vec![
        "/*".to_string(),
        format!("{} rows from {} table:", limit, table),
        header,
    ];
    let mut rows = stmt
        .query([])
        .map_err(|e| SqlChatError::Storage(e.to_string()))?;
    while let Some(row) = rows.next().map_err(|e| SqlChatError::Storage(e.to_string()))? {
        let mut cells = Vec::with_capacity(width);
        for idx in 0..width {
            let value = row
                .get_ref(idx)
                .map_err(|e| SqlChatError::Storage(e.to_string()))?;
            cells.push(render_value(value, max_len));
        }
        lines.push(cells.join("\t"));
    }
    lines.push("*/".to_string());
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlchat_core::config::DatabaseConfig;

    fn fixture(config: DatabaseConfig) -> Database {
        let db = Database::in_memory(&config).unwrap();
        db.with_conn(|conn| {
            conn.execute_batch(
                "CREATE TABLE AllWorkItems (
                    Id INTEGER PRIMARY KEY,
                    project_name TEXT NOT NULL,
                    TaskStartedAt TEXT
                 );
                 INSERT INTO AllWorkItems (project_name, TaskStartedAt) VALUES
                    ('Apollo', '2024-01-02'),
                    ('Borealis', '2024-01-03'),
                    ('Cygnus', '2024-01-04'),
                    ('Draco', '2024-01-05');
                 CREATE TABLE Secrets (token TEXT);",
            )
            .map_err(|e| SqlChatError::Storage(e.to_string()))
        })
        .unwrap();
        db
    }

    #[test]
    fn test_scoped_description_only_includes_scope() {
        let db = fixture(DatabaseConfig::default());
        let schema = db.schema_description().unwrap();
        assert!(schema.as_str().contains("CREATE TABLE AllWorkItems"));
        assert!(schema.as_str().contains("TaskStartedAt"));
        assert!(!schema.as_str().contains("Secrets"));
    }

    #[test]
    fn test_sample_rows_are_limited() {
        let db = fixture(DatabaseConfig::default());
        let schema = db.schema_description().unwrap();
        let text = schema.as_str();
        assert!(text.contains("3 rows from AllWorkItems table:"));
        assert!(text.contains("Id\tproject_name\tTaskStartedAt"));
        assert!(text.contains("1\tApollo\t2024-01-02"));
        assert!(text.contains("Cygnus"));
        assert!(!text.contains("Draco"));
        assert!(text.trim_end().ends_with("*/"));
    }

    #[test]
    fn test_zero_sample_rows_omits_comment_block() {
        let db = fixture(DatabaseConfig {
            sample_rows_in_table_info: 0,
            ..DatabaseConfig::default()
        });
        let schema = db.schema_description().unwrap();
        assert!(!schema.as_str().contains("/*"));
    }

    #[test]
    fn test_unscoped_description_includes_all_tables() {
        let db = fixture(DatabaseConfig::default());
        let schema = db.table_info(None).unwrap();
        assert!(schema.as_str().contains("AllWorkItems"));
        assert!(schema.as_str().contains("CREATE TABLE Secrets"));
    }

    #[test]
    fn test_missing_scoped_table_is_config_error() {
        let db = fixture(DatabaseConfig::default());
        let scope = vec!["AllWorkItems".to_string(), "Ghost".to_string()];
        let err = db.table_info(Some(&scope)).unwrap_err();
        assert!(matches!(err, SqlChatError::Config(_)));
        assert!(err.to_string().contains("Ghost"));
    }

    #[test]
    fn test_description_reflects_live_changes() {
        let db = fixture(DatabaseConfig::default());
        let before = db.schema_description().unwrap();
        db.with_conn(|conn| {
            conn.execute_batch("ALTER TABLE AllWorkItems ADD COLUMN RemainingWork REAL;")
                .map_err(|e| SqlChatError::Storage(e.to_string()))
        })
        .unwrap();
        let after = db.schema_description().unwrap();
        assert!(!before.as_str().contains("RemainingWork"));
        assert!(after.as_str().contains("RemainingWork"));
    }
}
