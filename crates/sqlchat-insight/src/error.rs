use thiserror::Error;

/// Errors that can occur while recognizing or rewriting entities.
#[derive(Error, Debug)]
pub enum InsightError {
    #[error("recognizer error: {0}")]
    Recognizer(String),
}
