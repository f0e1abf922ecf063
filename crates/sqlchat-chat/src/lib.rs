//! Conversational text-to-SQL pipeline.
//!
//! A [`ChatSession`] answers small talk from fixed phrase sets and sends every
//! other question through entity normalization, SQL generation, execution and
//! response composition, keeping an append-only history of the conversation.

pub mod composer;
pub mod error;
pub mod generator;
pub mod intent;
pub mod llm;
pub mod prompts;
pub mod session;
pub mod stubs;

pub use composer::{ResponseComposer, DATA_NOT_FOUND};
pub use error::ChatError;
pub use generator::SqlGenerator;
pub use intent::{classify, Intent};
pub use llm::{LanguageModel, OpenAiCompatibleClient};
pub use prompts::PromptLibrary;
pub use session::{ChatSession, TurnOutcome};
