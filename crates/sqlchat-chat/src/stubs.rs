//! In-process language models for tests and offline runs.
//!
//! None of these make network calls. Each records the prompts it was given
//! so callers can assert on what reached the model.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::ChatError;
use crate::llm::LanguageModel;

fn lock_err<T>(e: std::sync::PoisonError<T>) -> ChatError {
    ChatError::Llm(format!("stub lock poisoned: {}", e))
}

/// Returns every prompt unchanged.
#[derive(Debug, Default)]
pub struct EchoModel {
    prompts: Mutex<Vec<String>>,
}

impl EchoModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or_default()
    }
}

#[async_trait]
impl LanguageModel for EchoModel {
    async fn complete(&self, prompt: &str) -> Result<String, ChatError> {
        self.prompts.lock().map_err(lock_err)?.push(prompt.to_string());
        Ok(prompt.to_string())
    }
}

/// Replies with a fixed sequence of answers, one per call.
///
/// Running out of answers is reported as a model error.
#[derive(Debug, Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or_default()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, prompt: &str) -> Result<String, ChatError> {
        self.prompts.lock().map_err(lock_err)?.push(prompt.to_string());
        self.replies
            .lock()
            .map_err(lock_err)?
            .pop_front()
            .ok_or_else(|| ChatError::Llm("scripted model has no replies left".to_string()))
    }
}

/// Fails every call.
#[derive(Debug, Default)]
pub struct FailingModel;

#[async_trait]
impl LanguageModel for FailingModel {
    async fn complete(&self, _prompt: &str) -> Result<String, ChatError> {
        Err(ChatError::Llm("model unavailable".to_string()))
    }
}
