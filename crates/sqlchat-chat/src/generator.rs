//! SQL generation: one templated model call per question.

use std::sync::Arc;

use tracing::debug;

use sqlchat_core::config::SqlDialect;
use sqlchat_core::types::{ChatHistory, GeneratedQuery, SchemaDescription};

use crate::error::ChatError;
use crate::llm::LanguageModel;
use crate::prompts::PromptLibrary;

/// Turns a question into a single SQL statement.
///
/// The model output is used as-is apart from trimming; it is not validated.
pub struct SqlGenerator {
    llm: Arc<dyn LanguageModel>,
    prompts: Arc<PromptLibrary>,
    dialect: SqlDialect,
}

impl SqlGenerator {
    pub fn new(
        llm: Arc<dyn LanguageModel>,
        prompts: Arc<PromptLibrary>,
        dialect: SqlDialect,
    ) -> Self {
        Self {
            llm,
            prompts,
            dialect,
        }
    }

    pub fn dialect(&self) -> SqlDialect {
        self.dialect
    }

    pub async fn generate(
        &self,
        schema: &SchemaDescription,
        history: &ChatHistory,
        question: &str,
    ) -> Result<GeneratedQuery, ChatError> {
        let prompt = self.prompts.render_sql_query(
            schema.as_str(),
            &history.render(),
            question,
            self.dialect,
        )?;
        let output = self.llm.complete(&prompt).await?;
        let query = GeneratedQuery::from_model_output(&output);
        debug!(sql = %query, "Generated SQL");
        Ok(query)
    }
}
