//! Answer composition: turns an executed query and its rows into prose.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{debug, warn};

use sqlchat_core::types::{ChatHistory, GeneratedQuery, QueryResult, SchemaDescription};

use crate::error::ChatError;
use crate::llm::LanguageModel;
use crate::prompts::PromptLibrary;

/// Reply used whenever a query returns no rows.
pub const DATA_NOT_FOUND: &str = "Data not found";

static SQL_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<SQL>.*?</SQL>").expect("Invalid SQL block regex"));

/// Composes the final natural-language answer for a turn.
pub struct ResponseComposer {
    llm: Arc<dyn LanguageModel>,
    prompts: Arc<PromptLibrary>,
}

impl ResponseComposer {
    pub fn new(llm: Arc<dyn LanguageModel>, prompts: Arc<PromptLibrary>) -> Self {
        Self { llm, prompts }
    }

    /// Compose an answer. An empty result short-circuits to [`DATA_NOT_FOUND`]
    /// without calling the model.
    pub async fn compose(
        &self,
        schema: &SchemaDescription,
        history: &ChatHistory,
        query: &GeneratedQuery,
        result: &QueryResult,
        question: &str,
    ) -> Result<String, ChatError> {
        if result.is_empty() {
            debug!("Query returned no rows");
            return Ok(DATA_NOT_FOUND.to_string());
        }

        let prompt = self.prompts.render_response(
            schema.as_str(),
            &history.render(),
            query.as_str(),
            &result.to_text(),
            question,
            DATA_NOT_FOUND,
        )?;
        let raw = self.llm.complete(&prompt).await?;
        Ok(strip_sql(&raw, query.as_str()))
    }
}

/// Remove `<SQL>` blocks and verbatim copies of the executed statement.
pub fn strip_sql(answer: &str, sql: &str) -> String {
    let mut out = SQL_BLOCK_RE.replace_all(answer, "").into_owned();
    if !sql.is_empty() && out.contains(sql) {
        warn!("Model echoed the executed SQL; removing it");
        out = out.replace(sql, "");
    }
    out.trim().to_string()
}
