//! Named-entity recognition and person-name rewriting for user questions.
//!
//! - [`EntityRecognizer`]: pluggable recognizer returning labelled spans
//! - [`HeuristicRecognizer`]: local, rule-based person-name recognizer
//! - [`EntityNormalizer`]: rewrites two-token person names to `first.last@domain`

pub mod entity;
pub mod error;
pub mod normalizer;

pub use entity::{EntityLabel, EntityRecognizer, EntitySpan, HeuristicRecognizer};
pub use error::InsightError;
pub use normalizer::{name_to_email, EntityNormalizer};
