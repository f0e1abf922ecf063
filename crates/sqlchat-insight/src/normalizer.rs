//! Person-name rewriting.
//!
//! The tracker stores people as `first.last@domain` identifiers, so two-token
//! person names in a question are replaced before the question reaches the
//! SQL generator. Best effort only: any recognized person is rewritten.

use std::sync::Arc;

use tracing::debug;

use crate::entity::EntityRecognizer;
use crate::error::InsightError;

/// Build `first.last@domain` from a name with exactly two whitespace tokens.
pub fn name_to_email(name: &str, domain: &str) -> Option<String> {
    let parts: Vec<&str> = name.split_whitespace().collect();
    match parts.as_slice() {
        [first, last] => Some(format!(
            "{}.{}@{}",
            first.to_lowercase(),
            last.to_lowercase(),
            domain
        )),
        _ => None,
    }
}

/// Rewrites recognized person names into identifier form.
#[derive(Clone)]
pub struct EntityNormalizer {
    recognizer: Arc<dyn EntityRecognizer>,
    email_domain: String,
}

impl EntityNormalizer {
    pub fn new(recognizer: Arc<dyn EntityRecognizer>, email_domain: impl Into<String>) -> Self {
        Self {
            recognizer,
            email_domain: email_domain.into(),
        }
    }

    pub fn email_domain(&self) -> &str {
        &self.email_domain
    }

    /// Replace every two-token person name in `text` with its identifier.
    ///
    /// Person spans of any other length are left as they are.
    pub fn normalize(&self, text: &str) -> Result<String, InsightError> {
        let spans = self.recognizer.recognize(text)?;
        let mut out = text.to_string();
        for span in spans.iter().filter(|s| s.is_person()) {
            if let Some(email) = name_to_email(&span.text, &self.email_domain) {
                debug!(name = %span.text, identifier = %email, "Rewriting person name");
                out = out.replace(&span.text, &email);
            }
        }
        Ok(out)
    }
}

impl std::fmt::Debug for EntityNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityNormalizer")
            .field("email_domain", &self.email_domain)
            .finish()
    }
}
