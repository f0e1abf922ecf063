//! Language model access: an OpenAI-compatible chat-completions client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use sqlchat_core::config::LlmConfig;

use crate::error::ChatError;

/// A text-in, text-out language model.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send a fully rendered prompt and return the model's text reply.
    async fn complete(&self, prompt: &str) -> Result<String, ChatError>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<RequestMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
}

/// HTTP client for a hosted chat-completions endpoint.
///
/// The prompt is sent as a single user message. No retries and no
/// application-level timeout.
pub struct OpenAiCompatibleClient {
    client: reqwest::Client,
    completions_url: String,
    model: String,
    temperature: f32,
    api_key: Option<String>,
}

impl OpenAiCompatibleClient {
    pub fn new(
        completions_url: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            completions_url: completions_url.into(),
            model: model.into(),
            temperature,
            api_key,
        }
    }

    /// Build a client from configuration and an already resolved API key.
    pub fn from_config(config: &LlmConfig, api_key: Option<String>) -> Self {
        Self::new(
            config.completions_url(),
            config.model.clone(),
            config.temperature,
            api_key,
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LanguageModel for OpenAiCompatibleClient {
    async fn complete(&self, prompt: &str) -> Result<String, ChatError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![RequestMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        };

        let mut req = self.client.post(&self.completions_url).json(&body);
        if let Some(ref key) = self.api_key {
            req = req.bearer_auth(key);
        }

        let res = req.send().await?;
        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(ChatError::Llm(format!("API error {}: {}", status, text)));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&text)
            .map_err(|e| ChatError::Llm(format!("response parse error: {}; body: {}", e, text)))?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ChatError::Llm("response has no choices".to_string()))?;
        let content = choice.message.content.unwrap_or_default();
        debug!(model = %self.model, chars = content.len(), "Model replied");
        Ok(content)
    }
}

impl std::fmt::Debug for OpenAiCompatibleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatibleClient")
            .field("completions_url", &self.completions_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
