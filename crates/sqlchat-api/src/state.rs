//! Application state shared across route handlers.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;

use sqlchat_chat::ChatSession;
use sqlchat_core::config::SqlChatConfig;
use sqlchat_storage::Database;

/// Shared application state.
///
/// There is one conversation per process. The session sits behind an async
/// mutex so turns are handled one at a time, in arrival order.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SqlChatConfig>,
    pub database: Arc<Database>,
    pub session: Arc<Mutex<ChatSession>>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: SqlChatConfig, database: Arc<Database>, session: ChatSession) -> Self {
        Self {
            config: Arc::new(config),
            database,
            session: Arc::new(Mutex::new(session)),
            start_time: Instant::now(),
        }
    }
}
