//! Shared configuration, error and value types for the SQL chat workspace.

pub mod config;
pub mod error;
pub mod types;

pub use config::{SqlChatConfig, SqlDialect};
pub use error::{Result, SqlChatError};
pub use types::*;
