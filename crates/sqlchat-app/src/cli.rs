//! CLI argument definitions for the sqlchat binary.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// sqlchat - ask questions about a work-item database in plain English.
#[derive(Parser, Debug)]
#[command(name = "sqlchat", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Chat server port.
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Path to the SQLite database to query.
    #[arg(short = 'd', long = "database")]
    pub database: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > SQLCHAT_CONFIG env var > ~/.sqlchat/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("SQLCHAT_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the chat server port.
    ///
    /// Priority: --port flag > SQLCHAT_PORT env var > config file value > 8501.
    pub fn resolve_port(&self, config_port: u16) -> u16 {
        if let Some(p) = self.port {
            return p;
        }
        if let Ok(val) = std::env::var("SQLCHAT_PORT") {
            if let Ok(p) = val.parse::<u16>() {
                return p;
            }
        }
        if config_port != 0 {
            return config_port;
        }
        8501
    }

    /// Resolve the database path.
    ///
    /// Priority: --database flag > SQLCHAT_DATABASE env var > config file value.
    pub fn resolve_database(&self, config_path: &str) -> String {
        if let Some(ref p) = self.database {
            return p.to_string_lossy().to_string();
        }
        if let Ok(p) = std::env::var("SQLCHAT_DATABASE") {
            return p;
        }
        config_path.to_string()
    }

    /// Resolve the log level: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    match home_dir() {
        Some(home) => home.join(".sqlchat").join("config.toml"),
        None => PathBuf::from("config.toml"),
    }
}

fn home_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    let home = std::env::var("USERPROFILE");
    #[cfg(not(target_os = "windows"))]
    let home = std::env::var("HOME");
    home.ok().map(PathBuf::from)
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        home_dir().unwrap_or_else(|| PathBuf::from(".")).join(rest)
    } else {
        PathBuf::from(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("sqlchat").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_flags_win() {
        let args = parse(&[
            "--config",
            "/etc/sqlchat.toml",
            "--port",
            "9100",
            "--database",
            "/data/work.db",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.resolve_config_path(), PathBuf::from("/etc/sqlchat.toml"));
        assert_eq!(args.resolve_port(8501), 9100);
        assert_eq!(args.resolve_database("~/.sqlchat/workitems.db"), "/data/work.db");
        assert_eq!(args.resolve_log_level("info"), "debug");
    }

    #[test]
    fn test_short_flags() {
        let args = parse(&["-p", "7000", "-l", "warn"]);
        assert_eq!(args.resolve_port(8501), 7000);
        assert_eq!(args.resolve_log_level("info"), "warn");
    }

    #[test]
    fn test_log_level_falls_back_to_config() {
        let args = parse(&[]);
        assert_eq!(args.resolve_log_level("trace"), "trace");
    }

    #[test]
    fn test_invalid_port_rejected() {
        assert!(CliArgs::try_parse_from(["sqlchat", "--port", "99999"]).is_err());
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/abs/path.db"), PathBuf::from("/abs/path.db"));
        assert_eq!(expand_home("relative.db"), PathBuf::from("relative.db"));
        let expanded = expand_home("~/.sqlchat/workitems.db");
        assert!(expanded.ends_with(".sqlchat/workitems.db"));
        assert!(!expanded.to_string_lossy().starts_with('~'));
    }
}
