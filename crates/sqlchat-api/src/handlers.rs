//! Route handlers for the chat surface.

use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use sqlchat_chat::Intent;
use sqlchat_core::types::ConversationTurn;

use crate::assets::CHAT_HTML;
use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request / response types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub intent: Intent,
    /// Number of turns in the history after this one.
    pub turns: usize,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub turns: Vec<ConversationTurn>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub model: String,
}

// =============================================================================
// Handler functions
// =============================================================================

/// GET / - serve the chat page.
pub async fn index() -> impl IntoResponse {
    Html(CHAT_HTML)
}

/// GET /health - liveness plus a database round trip.
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    state
        .database
        .ping()
        .map_err(|e| ApiError::ServiceUnavailable(e.to_string()))?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        model: state.config.llm.model.clone(),
    }))
}

/// GET /history - every turn so far, oldest first.
pub async fn history(State(state): State<AppState>) -> Json<HistoryResponse> {
    let session = state.session.lock().await;
    Json(HistoryResponse {
        turns: session.history().turns().to_vec(),
    })
}

/// POST /chat - handle one user turn.
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let mut session = state.session.lock().await;
    let outcome = session.handle_turn(&req.message).await.map_err(|e| {
        warn!(error = %e, "Chat turn failed");
        ApiError::from(e)
    })?;
    info!(intent = ?outcome.intent, "Chat turn answered");

    Ok(Json(ChatResponse {
        reply: outcome.reply,
        intent: outcome.intent,
        turns: session.history().len(),
    }))
}
