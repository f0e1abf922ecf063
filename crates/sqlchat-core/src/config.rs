use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, SqlChatError};

/// Top-level configuration for the SQL chat application.
///
/// Loaded from `~/.sqlchat/config.toml` by default. Secrets (the model API
/// key) never live here; the `llm` section only names the environment
/// variable that holds them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SqlChatConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub entity: EntityConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

impl SqlChatConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SqlChatConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| SqlChatError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// HTTP chat surface settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
        }
    }
}

/// SQL dialect the generation prompt asks the model to write.
///
/// Defaults to the bundled SQLite backend; `tsql` is only for stores that
/// accept `SELECT TOP n`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SqlDialect {
    /// `SELECT TOP n ...` row limiting.
    #[serde(rename = "tsql")]
    TransactSql,
    /// Trailing `LIMIT n` row limiting.
    #[default]
    #[serde(rename = "sqlite")]
    Sqlite,
}

/// Database connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the database file.
    pub path: String,
    /// Tables described to the model. Empty means every table.
    pub include_tables: Vec<String>,
    /// Sample rows appended to each table description.
    pub sample_rows_in_table_info: usize,
    /// Longest string value rendered in sample rows and query results.
    pub max_string_length: usize,
    pub dialect: SqlDialect,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "~/.sqlchat/workitems.db".to_string(),
            include_tables: vec!["AllWorkItems".to_string()],
            sample_rows_in_table_info: 3,
            max_string_length: 300,
            dialect: SqlDialect::default(),
        }
    }
}

impl DatabaseConfig {
    /// The configured table scope, `None` when every table is in scope.
    pub fn table_scope(&self) -> Option<&[String]> {
        if self.include_tables.is_empty() {
            None
        } else {
            Some(&self.include_tables)
        }
    }
}

/// Hosted language model settings (OpenAI-compatible chat completions).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama-3.1-70b-versatile".to_string(),
            temperature: 0.0,
            api_key_env: "GROQ_API_KEY".to_string(),
        }
    }
}

impl LlmConfig {
    /// Full chat-completions endpoint derived from `base_url`.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Person-name rewriting settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityConfig {
    pub enabled: bool,
    /// Domain used when synthesizing `first.last@domain` identifiers.
    pub email_domain: String,
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            email_domain: "email.com".to_string(),
        }
    }
}

/// Chat session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Maximum accepted message length in characters.
    pub max_message_length: usize,
    /// Assistant turn every new session starts with.
    pub welcome_message: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_message_length: 2000,
            welcome_message: "Hello! I'm SQL Chatbot. Ask me anything about the database."
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = SqlChatConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.server.port, 8501);
        assert_eq!(config.database.include_tables, vec!["AllWorkItems"]);
        assert_eq!(config.database.sample_rows_in_table_info, 3);
        assert_eq!(config.database.max_string_length, 300);
        assert_eq!(config.database.dialect, SqlDialect::Sqlite);
        assert_eq!(config.llm.model, "llama-3.1-70b-versatile");
        assert_eq!(config.llm.temperature, 0.0);
        assert_eq!(config.llm.api_key_env, "GROQ_API_KEY");
        assert!(config.entity.enabled);
        assert_eq!(config.entity.email_domain, "email.com");
        assert_eq!(config.chat.max_message_length, 2000);
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
log_level = "debug"

[server]
port = 9000

[database]
path = "/data/work.db"
include_tables = []
dialect = "tsql"

[llm]
base_url = "http://localhost:11434/v1/"
model = "llama3"

[entity]
email_domain = "corp.example"
"#;
        let file = create_temp_config(content);
        let config = SqlChatConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.database.path, "/data/work.db");
        assert!(config.database.table_scope().is_none());
        assert_eq!(config.database.dialect, SqlDialect::TransactSql);
        assert_eq!(
            config.llm.completions_url(),
            "http://localhost:11434/v1/chat/completions"
        );
        assert_eq!(config.entity.email_domain, "corp.example");
        assert!(config.entity.enabled);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let file = create_temp_config("[general]\nlog_level = \"warn\"\n");
        let config = SqlChatConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "warn");
        assert_eq!(config.database.sample_rows_in_table_info, 3);
        assert_eq!(config.database.dialect, SqlDialect::Sqlite);
        assert_eq!(
            config.database.table_scope(),
            Some(&["AllWorkItems".to_string()][..])
        );
    }

    #[test]
    fn test_load_invalid_toml() {
        let file = create_temp_config("this is {{ not valid TOML");
        let result = SqlChatConfig::load(file.path());
        assert!(matches!(result, Err(SqlChatError::Config(_))));
    }

    #[test]
    fn test_unknown_dialect_rejected() {
        let file = create_temp_config("[database]\ndialect = \"oracle\"\n");
        assert!(SqlChatConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = SqlChatConfig::load_or_default(Path::new("/does/not/exist/config.toml"));
        assert_eq!(config.server.port, 8501);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_save_creates_parent_dirs_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");

        let mut config = SqlChatConfig::default();
        config.database.dialect = SqlDialect::TransactSql;
        config.entity.email_domain = "example.org".to_string();
        config.save(&path).unwrap();

        let reloaded = SqlChatConfig::load(&path).unwrap();
        assert_eq!(reloaded.database.dialect, SqlDialect::TransactSql);
        assert_eq!(reloaded.entity.email_domain, "example.org");
    }

    #[test]
    fn test_completions_url_without_trailing_slash() {
        let llm = LlmConfig::default();
        assert_eq!(
            llm.completions_url(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }
}
