//! Shared value types: conversation turns, schema text, queries and results.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Conversation
// =============================================================================

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Human,
    Assistant,
}

impl Role {
    /// Label used when the turn is rendered into a prompt.
    pub fn prompt_label(&self) -> &'static str {
        match self {
            Role::Human => "Human",
            Role::Assistant => "AI",
        }
    }
}

/// A single immutable turn in the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn human(content: impl Into<String>) -> Self {
        Self {
            role: Role::Human,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// Append-only, chronologically ordered conversation history.
///
/// Turns are never mutated, reordered or removed once pushed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChatHistory {
    turns: Vec<ConversationTurn>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// History that opens with a single assistant turn.
    pub fn with_welcome(message: impl Into<String>) -> Self {
        let mut history = Self::new();
        history.push(ConversationTurn::assistant(message));
        history
    }

    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    /// Number of turns with the given role.
    pub fn count(&self, role: Role) -> usize {
        self.turns.iter().filter(|t| t.role == role).count()
    }

    /// Render the history for inclusion in a prompt, one line per turn.
    pub fn render(&self) -> String {
        self.turns
            .iter()
            .map(|t| format!("{}: {}", t.role.prompt_label(), t.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// =============================================================================
// Query pipeline values
// =============================================================================

/// Text description of the queryable tables, regenerated on every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDescription(pub String);

impl SchemaDescription {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchemaDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single SQL statement produced by the model for one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedQuery(pub String);

impl GeneratedQuery {
    /// Wrap raw model output. Only surrounding whitespace is removed.
    pub fn from_model_output(text: &str) -> Self {
        Self(text.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GeneratedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rows returned by executing a [`GeneratedQuery`], already rendered to text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl QueryResult {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Render as a header line followed by one line per row.
    ///
    /// An empty row set renders as the empty string.
    pub fn to_text(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }
        let mut lines = Vec::with_capacity(self.rows.len() + 1);
        lines.push(self.columns.join(" | "));
        for row in &self.rows {
            lines.push(row.join(" | "));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_with_welcome() {
        let history = ChatHistory::with_welcome("Hello!");
        assert_eq!(history.len(), 1);
        assert_eq!(history.turns()[0].role, Role::Assistant);
        assert_eq!(history.count(Role::Human), 0);
    }

    #[test]
    fn test_history_preserves_order() {
        let mut history = ChatHistory::new();
        history.push(ConversationTurn::human("first"));
        history.push(ConversationTurn::assistant("second"));
        history.push(ConversationTurn::human("third"));

        let contents: Vec<&str> = history.turns().iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
        assert_eq!(history.last().unwrap().content, "third");
        assert_eq!(history.count(Role::Human), 2);
    }

    #[test]
    fn test_history_render() {
        let mut history = ChatHistory::with_welcome("Ask me anything.");
        history.push(ConversationTurn::human("List projects"));
        assert_eq!(history.render(), "AI: Ask me anything.\nHuman: List projects");
    }

    #[test]
    fn test_empty_history_renders_empty() {
        assert_eq!(ChatHistory::new().render(), "");
        assert!(ChatHistory::new().is_empty());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Role::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }

    #[test]
    fn test_generated_query_trims_whitespace_only() {
        let q = GeneratedQuery::from_model_output("\n  ```sql\nSELECT 1\n```  \n");
        assert_eq!(q.as_str(), "```sql\nSELECT 1\n```");
    }

    #[test]
    fn test_query_result_text() {
        let result = QueryResult {
            columns: vec!["project".into(), "tasks".into()],
            rows: vec![
                vec!["Apollo".into(), "3".into()],
                vec!["Zephyr".into(), "NULL".into()],
            ],
        };
        assert_eq!(result.row_count(), 2);
        assert_eq!(
            result.to_text(),
            "project | tasks\nApollo | 3\nZephyr | NULL"
        );
    }

    #[test]
    fn test_empty_query_result_text() {
        let result = QueryResult {
            columns: vec!["project".into()],
            rows: vec![],
        };
        assert!(result.is_empty());
        assert_eq!(result.to_text(), "");
    }
}
