//! Entity recognition over user questions.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::InsightError;

/// Category assigned to a recognized span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityLabel {
    Person,
    Other(String),
}

/// A labelled span of the input text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub text: String,
    pub label: EntityLabel,
    /// Byte offset of the span start.
    pub start: usize,
    /// Byte offset one past the span end.
    pub end: usize,
}

impl EntitySpan {
    pub fn is_person(&self) -> bool {
        self.label == EntityLabel::Person
    }
}

/// A named-entity recognizer, loaded once and shared for the process lifetime.
pub trait EntityRecognizer: Send + Sync {
    fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>, InsightError>;
}

// Runs of capitalized words on one line, any script with case:
// "John Smith", "Mary-Kate Olsen", "José García", "Seán O'Brien".
static CAPITALIZED_RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\b",
        r"\p{Lu}(?:\p{Ll}+|['’]\p{Lu}\p{Ll}+)(?:-\p{Lu}\p{Ll}+)*",
        r"(?:[ \t]+\p{Lu}(?:\p{Ll}+|['’]\p{Lu}\p{Ll}+)(?:-\p{Lu}\p{Ll}+)*)*",
        r"\b",
    ))
    .expect("Invalid capitalized-run regex")
});

/// Rule-based person recognizer.
///
/// Treats runs of capitalized words as person names after dropping words that
/// commonly start questions or name tracker concepts ("How", "List", "Task").
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicRecognizer;

impl HeuristicRecognizer {
    pub fn new() -> Self {
        Self
    }
}

impl EntityRecognizer for HeuristicRecognizer {
    fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>, InsightError> {
        let mut spans = Vec::new();

        for run in CAPITALIZED_RUN_RE.find_iter(text) {
            // Split the run into maximal sub-runs of name-like tokens.
            let mut current: Option<(usize, usize)> = None;
            let base = run.start();
            for (offset, token) in token_offsets(run.as_str()) {
                let start = base + offset;
                let end = start + token.len();
                if is_common_word(token) {
                    if let Some((s, e)) = current.take() {
                        spans.push(person_span(text, s, e));
                    }
                } else {
                    current = Some(match current {
                        Some((s, _)) => (s, end),
                        None => (start, end),
                    });
                }
            }
            if let Some((s, e)) = current {
                spans.push(person_span(text, s, e));
            }
        }

        Ok(spans)
    }
}

fn person_span(text: &str, start: usize, end: usize) -> EntitySpan {
    EntitySpan {
        text: text[start..end].to_string(),
        label: EntityLabel::Person,
        start,
        end,
    }
}

/// Whitespace-separated tokens with their byte offsets.
fn token_offsets(s: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;
    for (i, c) in s.char_indices() {
        if c.is_whitespace() {
            if let Some(st) = start.take() {
                out.push((st, &s[st..i]));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(st) = start {
        out.push((st, &s[st..]));
    }
    out
}

/// Returns true for capitalized words that are not person names.
fn is_common_word(s: &str) -> bool {
    matches!(
        s,
        "How"
            | "What"
            | "Which"
            | "Who"
            | "Whom"
            | "Whose"
            | "When"
            | "Where"
            | "Why"
            | "List"
            | "Show"
            | "Give"
            | "Get"
            | "Find"
            | "Tell"
            | "Count"
            | "Compare"
            | "Display"
            | "Fetch"
            | "Provide"
            | "Please"
            | "Can"
            | "Could"
            | "Would"
            | "Will"
            | "Did"
            | "Does"
            | "Do"
            | "Is"
            | "Are"
            | "Was"
            | "Were"
            | "Has"
            | "Have"
            | "Had"
            | "The"
            | "This"
            | "That"
            | "These"
            | "Those"
            | "There"
            | "Here"
            | "All"
            | "Any"
            | "Each"
            | "Every"
            | "Total"
            | "Hi"
            | "Hello"
            | "Hey"
            | "Thanks"
            | "Thank"
            | "Ok"
            | "Okay"
            | "My"
            | "We"
            | "Our"
            | "You"
            | "Your"
            | "They"
            | "Their"
            | "And"
            | "Or"
            | "But"
            | "In"
            | "On"
            | "At"
            | "For"
            | "From"
            | "With"
            | "By"
            | "Of"
            | "To"
            | "Task"
            | "Tasks"
            | "Project"
            | "Projects"
            | "User"
            | "Users"
            | "Bug"
            | "Bugs"
            | "Sprint"
            | "Sprints"
            | "Item"
            | "Items"
            | "Work"
            | "Feature"
            | "Epic"
            | "Story"
            | "Today"
            | "Yesterday"
            | "Tomorrow"
            | "Monday"
            | "Tuesday"
            | "Wednesday"
            | "Thursday"
            | "Friday"
            | "Saturday"
            | "Sunday"
            | "January"
            | "February"
            | "March"
            | "April"
            | "June"
            | "July"
            | "August"
            | "September"
            | "October"
            | "November"
            | "December"
    )
}
