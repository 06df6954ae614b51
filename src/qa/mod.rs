pub mod embedding;
pub mod generator;
pub mod model;
pub mod reader;
pub mod registry;
pub mod retriever;

use thiserror::Error;

use crate::ingest::IngestError;

#[derive(Error, Debug)]
pub enum QaError {
    #[error("model `{name}` is not initialized: {reason}")]
    ModelNotInitialized { name: String, reason: String },

    #[error("model `{0}` is not registered")]
    UnknownModel(String),

    #[error("no answer produced")]
    NoAnswer,

    #[error("generator connection failed: {0}")]
    GeneratorConnection(String),

    #[error("generator returned HTTP {status}: {body}")]
    GeneratorStatus { status: u16, body: String },

    #[error("generator response parsing failed: {0}")]
    GeneratorResponse(String),

    #[error(transparent)]
    Ingest(#[from] IngestError),
}

/// Lowercased alphanumeric tokens. Shared by the sparse index, the readers,
/// and the hashed embedder so all three agree on term boundaries.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_lowercases_and_splits_on_punctuation() {
        assert_eq!(
            tokenize("What is the capital-of France?"),
            vec!["what", "is", "the", "capital", "of", "france"]
        );
    }

    #[test]
    fn tokenize_keeps_numbers() {
        assert_eq!(tokenize("Revenue 14, year 2021."), vec!["revenue", "14", "year", "2021"]);
    }

    #[test]
    fn tokenize_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("?!  --").is_empty());
    }
}
