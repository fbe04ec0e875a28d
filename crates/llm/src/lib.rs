//! Language model integration
//!
//! Backends for OpenAI-compatible and Anthropic chat APIs, plus the two
//! capabilities the chat service asks of them: turning a message into
//! property filters and turning a result digest into a short summary.

pub mod backend;
pub mod claude;
pub mod extractor;
pub mod factory;
pub mod json;
pub mod prompt;
pub mod summarizer;

pub use backend::{FinishReason, GenerationResult, LlmBackend, OpenAIBackend, OpenAIConfig};
pub use claude::{ClaudeBackend, ClaudeConfig};
pub use extractor::LlmFilterExtractor;
pub use factory::{check_credential, LlmFactory};
pub use json::{extract_json_object, strip_nulls};
pub use prompt::{filter_messages, summary_messages, Message, Role};
pub use summarizer::LlmSummaryGenerator;

use thiserror::Error;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::Network(err.to_string())
    }
}

impl From<LlmError> for propchat_core::Error {
    fn from(err: LlmError) -> Self {
        propchat_core::Error::Llm(err.to_string())
    }
}
