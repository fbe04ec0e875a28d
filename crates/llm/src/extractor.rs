//! Model-backed filter extraction

use std::sync::Arc;

use async_trait::async_trait;
use propchat_core::{FilterExtractor, PropertyFilters, Result};

use crate::backend::LlmBackend;
use crate::json::{extract_json_object, strip_nulls};
use crate::prompt::filter_messages;
use crate::LlmError;

/// [`FilterExtractor`] asking a language model for a JSON filter object
pub struct LlmFilterExtractor {
    backend: Arc<dyn LlmBackend>,
}

impl LlmFilterExtractor {
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl FilterExtractor for LlmFilterExtractor {
    async fn extract(&self, message: &str) -> Result<PropertyFilters> {
        let result = self.backend.generate(&filter_messages(message)).await?;

        let value = extract_json_object(&result.text).ok_or_else(|| {
            LlmError::InvalidResponse(format!("no JSON object in reply: {:.80}", result.text))
        })?;

        let filters = PropertyFilters::from_json_value(&strip_nulls(value));
        tracing::debug!(model = self.backend.model_name(), ?filters, "Filters extracted");
        Ok(filters)
    }

    fn name(&self) -> &str {
        self.backend.provider()
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use parking_lot::Mutex;

    use crate::backend::{FinishReason, GenerationResult, LlmBackend};
    use crate::prompt::Message;
    use crate::LlmError;

    /// Backend returning a canned reply and recording what it was sent
    pub struct MockBackend {
        reply: std::result::Result<String, String>,
        pub seen: Mutex<Vec<Vec<Message>>>,
    }

    impl MockBackend {
        pub fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(error: &str) -> Self {
            Self {
                reply: Err(error.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl LlmBackend for MockBackend {
        async fn generate(&self, messages: &[Message]) -> Result<GenerationResult, LlmError> {
            self.seen.lock().push(messages.to_vec());
            match &self.reply {
                Ok(text) => Ok(GenerationResult {
                    text: text.clone(),
                    tokens: 0,
                    total_time_ms: 0,
                    finish_reason: FinishReason::Stop,
                }),
                Err(e) => Err(LlmError::Api(e.clone())),
            }
        }

        fn model_name(&self) -> &str {
            "mock"
        }

        fn provider(&self) -> &'static str {
            "mock"
        }
    }
}
