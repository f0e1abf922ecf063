//! Chat session: owns the conversation and drives each turn.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use sqlchat_core::config::SqlChatConfig;
use sqlchat_core::types::{ChatHistory, ConversationTurn};
use sqlchat_insight::{EntityNormalizer, EntityRecognizer};
use sqlchat_storage::Database;

use crate::composer::ResponseComposer;
use crate::error::ChatError;
use crate::generator::SqlGenerator;
use crate::intent::{classify, Intent};
use crate::llm::LanguageModel;
use crate::prompts::PromptLibrary;

/// Result of one handled turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnOutcome {
    pub reply: String,
    pub intent: Intent,
}

/// A single user's conversation with the database.
///
/// Greeting, small-talk and farewell phrases are answered from fixed replies;
/// everything else goes through normalize → schema → generate → execute →
/// compose.
pub struct ChatSession {
    history: ChatHistory,
    database: Arc<Database>,
    normalizer: Option<EntityNormalizer>,
    generator: SqlGenerator,
    composer: ResponseComposer,
    max_message_length: usize,
}

impl ChatSession {
    pub fn new(
        config: &SqlChatConfig,
        database: Arc<Database>,
        llm: Arc<dyn LanguageModel>,
        recognizer: Arc<dyn EntityRecognizer>,
    ) -> Result<Self, ChatError> {
        let prompts = Arc::new(PromptLibrary::new()?);
        let normalizer = config
            .entity
            .enabled
            .then(|| EntityNormalizer::new(recognizer, config.entity.email_domain.clone()));

        Ok(Self {
            history: ChatHistory::with_welcome(config.chat.welcome_message.clone()),
            database,
            normalizer,
            generator: SqlGenerator::new(llm.clone(), prompts.clone(), config.database.dialect),
            composer: ResponseComposer::new(llm, prompts),
            max_message_length: config.chat.max_message_length,
        })
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    /// Handle one user message and return the assistant reply.
    ///
    /// Blank or over-long input is rejected before anything is recorded.
    /// Otherwise the human turn is recorded first; if the pipeline fails it
    /// stays in the history without an answer and the error is returned.
    pub async fn handle_turn(&mut self, message: &str) -> Result<TurnOutcome, ChatError> {
        let text = message.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if text.chars().count() > self.max_message_length {
            return Err(ChatError::MessageTooLong(self.max_message_length));
        }

        self.history.push(ConversationTurn::human(text));

        let intent = classify(text);
        let reply = match intent.canned_reply() {
            Some(reply) => {
                debug!(?intent, "Short-circuit reply");
                reply.to_string()
            }
            None => self.answer(text).await?,
        };

        self.history.push(ConversationTurn::assistant(reply.clone()));
        info!(?intent, turns = self.history.len(), "Turn complete");
        Ok(TurnOutcome { reply, intent })
    }

    async fn answer(&self, text: &str) -> Result<String, ChatError> {
        let question = match &self.normalizer {
            Some(normalizer) => normalizer.normalize(text)?,
            None => text.to_string(),
        };

        let schema = self.database.schema_description()?;
        let query = self
            .generator
            .generate(&schema, &self.history, &question)
            .await?;
        let result = self.database.run(query.as_str())?;
        debug!(rows = result.row_count(), "Query executed");

        self.composer
            .compose(&schema, &self.history, &query, &result, &question)
            .await
    }
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("turns", &self.history.len())
            .field("normalizer", &self.normalizer)
            .field("max_message_length", &self.max_message_length)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::{FAREWELL_REPLY, GREETING_REPLY, SMALL_TALK_REPLY};
    use crate::stubs::ScriptedModel;
    use sqlchat_core::error::SqlChatError;
    use sqlchat_core::types::Role;
    use sqlchat_insight::HeuristicRecognizer;

    fn config() -> SqlChatConfig {
        SqlChatConfig::default()
    }

    fn database(config: &SqlChatConfig) -> Arc<Database> {
        let db = Database::in_memory(&config.database).unwrap();
        db.with_conn(|conn| {
            conn.execute_batch(
                "CREATE TABLE AllWorkItems (project_name TEXT, CompletedWork REAL);
                 INSERT INTO AllWorkItems VALUES ('Apollo', 4.5), ('Borealis', 2.0);",
            )
            .map_err(|e| SqlChatError::Storage(e.to_string()))
        })
        .unwrap();
        Arc::new(db)
    }

    fn session(config: &SqlChatConfig, model: Arc<ScriptedModel>) -> ChatSession {
        ChatSession::new(
            config,
            database(config),
            model,
            Arc::new(HeuristicRecognizer::new()),
        )
        .unwrap()
    }

    #[test]
    fn test_new_session_has_welcome_turn() {
        let config = config();
        let s = session(&config, Arc::new(ScriptedModel::default()));
        assert_eq!(s.history().len(), 1);
        assert_eq!(s.history().turns()[0].role, Role::Assistant);
        assert_eq!(
            s.history().turns()[0].content,
            "Hello! I'm SQL Chatbot. Ask me anything about the database."
        );
    }

    #[tokio::test]
    async fn test_canned_replies_skip_model() {
        let config = config();
        let model = Arc::new(ScriptedModel::default());
        let mut s = session(&config, model.clone());

        assert_eq!(s.handle_turn("Hello").await.unwrap().reply, GREETING_REPLY);
        assert_eq!(s.handle_turn("thank you").await.unwrap().reply, SMALL_TALK_REPLY);
        let outcome = s.handle_turn(" ok bye ").await.unwrap();
        assert_eq!(outcome.reply, FAREWELL_REPLY);
        assert_eq!(outcome.intent, Intent::Farewell);

        assert_eq!(model.call_count(), 0);
        assert_eq!(s.history().len(), 7);
        assert_eq!(s.history().count(Role::Human), 3);
    }

    #[tokio::test]
    async fn test_blank_input_rejected_without_recording() {
        let config = config();
        let mut s = session(&config, Arc::new(ScriptedModel::default()));
        let err = s.handle_turn("   ").await.unwrap_err();
        assert!(matches!(err, ChatError::EmptyMessage));
        assert_eq!(s.history().len(), 1);
    }

    #[tokio::test]
    async fn test_over_long_input_rejected() {
        let mut config = config();
        config.chat.max_message_length = 10;
        let mut s = session(&config, Arc::new(ScriptedModel::default()));
        let err = s.handle_turn("this is far too long").await.unwrap_err();
        assert!(matches!(err, ChatError::MessageTooLong(10)));
        assert_eq!(s.history().len(), 1);
    }

    #[tokio::test]
    async fn test_full_pipeline_appends_answer() {
        let config = config();
        let model = Arc::new(ScriptedModel::new([
            "SELECT w.project_name FROM AllWorkItems w ORDER BY w.project_name;",
            "Bot:\n- Apollo\n- Borealis",
        ]));
        let mut s = session(&config, model.clone());

        let outcome = s.handle_turn("Which projects exist?").await.unwrap();
        assert_eq!(outcome.intent, Intent::Question);
        assert_eq!(outcome.reply, "Bot:\n- Apollo\n- Borealis");
        assert_eq!(model.call_count(), 2);
        assert!(model.prompts()[1].contains("SQL Response: project_name\nApollo\nBorealis"));
        assert_eq!(s.history().len(), 3);
        assert_eq!(s.history().last().unwrap().role, Role::Assistant);
    }

    #[tokio::test]
    async fn test_normalization_disabled_keeps_names() {
        let mut config = config();
        config.entity.enabled = false;
        let model = Arc::new(ScriptedModel::new(["SELECT 1 WHERE 0;"]));
        let mut s = session(&config, model.clone());

        let outcome = s.handle_turn("What did John Smith do?").await.unwrap();
        assert_eq!(outcome.reply, "Data not found");
        assert!(model.prompts()[0].contains("Question: What did John Smith do?"));
    }
}
