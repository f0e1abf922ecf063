//! sqlchat binary - composition root.
//!
//! 1. Load `.env`, CLI flags and the TOML configuration
//! 2. Open the database and check the configured table scope
//! 3. Build the model client, entity recognizer and chat session
//! 4. Serve the chat page and API

mod cli;

use std::sync::Arc;

use clap::Parser;

use sqlchat_api::state::AppState;
use sqlchat_chat::{ChatSession, OpenAiCompatibleClient};
use sqlchat_core::config::SqlChatConfig;
use sqlchat_insight::HeuristicRecognizer;
use sqlchat_storage::Database;

use crate::cli::{expand_home, CliArgs};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = SqlChatConfig::load_or_default(&config_file);
    config.server.port = args.resolve_port(config.server.port);
    config.database.path = args.resolve_database(&config.database.path);
    config.general.log_level = args.resolve_log_level(&config.general.log_level);

    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .init();

    tracing::info!("Starting sqlchat v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration resolved");

    // Storage.
    let db_path = expand_home(&config.database.path);
    let database = Arc::new(Database::open(&db_path, &config.database)?);
    let schema = database.schema_description()?;
    tracing::info!(
        path = %db_path.display(),
        tables = ?config.database.include_tables,
        schema_bytes = schema.as_str().len(),
        "Database ready"
    );

    // Model client.
    let api_key = std::env::var(&config.llm.api_key_env).ok();
    if api_key.is_none() {
        tracing::warn!(
            var = %config.llm.api_key_env,
            "No API key in environment; requests will be sent unauthenticated"
        );
    }
    let llm = Arc::new(OpenAiCompatibleClient::from_config(&config.llm, api_key));
    tracing::info!(model = %config.llm.model, url = %config.llm.completions_url(), "Model client ready");

    // Session.
    let recognizer = Arc::new(HeuristicRecognizer::new());
    let session = ChatSession::new(&config, Arc::clone(&database), llm, recognizer)?;
    let state = AppState::new(config.clone(), database, session);

    sqlchat_api::start_server(&config, state).await?;

    Ok(())
}
