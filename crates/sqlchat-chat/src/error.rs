//! Error types for the chat pipeline.

use sqlchat_core::error::SqlChatError;
use sqlchat_insight::InsightError;

/// Errors from a chat turn. Any of these aborts the current turn.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("LLM error: {0}")]
    Llm(String),
    #[error("prompt error: {0}")]
    Prompt(String),
    #[error("query error: {0}")]
    Query(String),
    #[error("entity error: {0}")]
    Entity(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<SqlChatError> for ChatError {
    fn from(err: SqlChatError) -> Self {
        match err {
            SqlChatError::Query(msg) => ChatError::Query(msg),
            other => ChatError::Storage(other.to_string()),
        }
    }
}

impl From<InsightError> for ChatError {
    fn from(err: InsightError) -> Self {
        ChatError::Entity(err.to_string())
    }
}

impl From<minijinja::Error> for ChatError {
    fn from(err: minijinja::Error) -> Self {
        ChatError::Prompt(err.to_string())
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        ChatError::Llm(err.to_string())
    }
}
