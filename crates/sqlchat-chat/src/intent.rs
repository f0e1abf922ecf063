//! Small-talk classification.
//!
//! Pure lookup against fixed phrase sets. The whole trimmed utterance must
//! match (case-insensitively); "hi there" is a question, not a greeting.

use serde::Serialize;

const GREETINGS: &[&str] = &[
    "hi",
    "hello",
    "hola",
    "good morning",
    "good afternoon",
    "good evening",
    "good night",
];

const SMALL_TALK: &[&str] = &["ok", "thank you", "see you", "nice", "great"];

const FAREWELLS: &[&str] = &["goodbye", "bye", "ok bye"];

pub const GREETING_REPLY: &str = "Bot: Hello! How can I assist you today?";
pub const SMALL_TALK_REPLY: &str = "Bot: Can I help you with anything else?";
pub const FAREWELL_REPLY: &str = "Bot: Good Bye!";

/// What kind of utterance the user sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    SmallTalk,
    Farewell,
    /// Anything else; answered by the query pipeline.
    Question,
}

impl Intent {
    /// Fixed reply for the short-circuit categories.
    pub fn canned_reply(&self) -> Option<&'static str> {
        match self {
            Intent::Greeting => Some(GREETING_REPLY),
            Intent::SmallTalk => Some(SMALL_TALK_REPLY),
            Intent::Farewell => Some(FAREWELL_REPLY),
            Intent::Question => None,
        }
    }
}

/// Classify an utterance. Greetings win over small talk, which wins over farewells.
pub fn classify(text: &str) -> Intent {
    let normalized = text.trim().to_lowercase();
    let phrase = normalized.as_str();
    if GREETINGS.contains(&phrase) {
        Intent::Greeting
    } else if SMALL_TALK.contains(&phrase) {
        Intent::SmallTalk
    } else if FAREWELLS.contains(&phrase) {
        Intent::Farewell
    } else {
        Intent::Question
    }
}
