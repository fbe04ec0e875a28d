//! Error types shared across the workspace

use thiserror::Error;

/// Result alias using the workspace-wide [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Workspace-wide error type
///
/// Each crate keeps its own error enum and converts into this one at the
/// crate boundary.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Extraction(err.to_string())
    }
}
