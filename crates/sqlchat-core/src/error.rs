use thiserror::Error;

/// Top-level error type for the SQL chat system.
///
/// Subsystem crates define their own error types and implement
/// `From<SqlChatError>` so that `?` works across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqlChatError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for SqlChatError {
    fn from(err: toml::de::Error) -> Self {
        SqlChatError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for SqlChatError {
    fn from(err: toml::ser::Error) -> Self {
        SqlChatError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for SqlChatError {
    fn from(err: serde_json::Error) -> Self {
        SqlChatError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for SQL chat operations.
pub type Result<T> = std::result::Result<T, SqlChatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let cases: Vec<(SqlChatError, &str)> = vec![
            (
                SqlChatError::Config("bad key".to_string()),
                "Configuration error: bad key",
            ),
            (
                SqlChatError::Storage("locked".to_string()),
                "Storage error: locked",
            ),
            (
                SqlChatError::Query("no such column: x".to_string()),
                "Query execution failed: no such column: x",
            ),
            (
                SqlChatError::Serialization("eof".to_string()),
                "Serialization error: eof",
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.to_string(), expected);
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SqlChatError = io_err.into();
        assert!(matches!(err, SqlChatError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("= broken").unwrap_err();
        let err: SqlChatError = toml_err.into();
        assert!(matches!(err, SqlChatError::Config(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: SqlChatError = json_err.into();
        assert!(matches!(err, SqlChatError::Serialization(_)));
    }
}
