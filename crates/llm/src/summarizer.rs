//! Model-backed result summaries

use std::sync::Arc;

use async_trait::async_trait;
use propchat_core::{Result, SummaryGenerator, SummaryRequest};

use crate::backend::LlmBackend;
use crate::prompt::summary_messages;
use crate::LlmError;

/// [`SummaryGenerator`] that shows the model the result digest, never listings
pub struct LlmSummaryGenerator {
    backend: Arc<dyn LlmBackend>,
}

impl LlmSummaryGenerator {
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl SummaryGenerator for LlmSummaryGenerator {
    async fn summarize(&self, request: &SummaryRequest) -> Result<String> {
        let messages = summary_messages(request)?;
        let result = self.backend.generate(&messages).await?;

        let summary = result.text.trim();
        if summary.is_empty() {
            return Err(LlmError::InvalidResponse("empty summary".to_string()).into());
        }

        Ok(summary.to_string())
    }

    fn name(&self) -> &str {
        self.backend.provider()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::mock::MockBackend;
    use propchat_core::{Property, PropertyFilters};

    #[tokio::test]
    async fn test_summary_text_is_trimmed() {
        let backend = Arc::new(MockBackend::replying("  Found nothing fancy.\n"));
        let generator = LlmSummaryGenerator::new(backend.clone());
        let request = SummaryRequest::new("castles", PropertyFilters::new(), &Vec::<Property>::new());

        assert_eq!(generator.summarize(&request).await.unwrap(), "Found nothing fancy.");
        assert_eq!(backend.seen.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_summary_is_an_error() {
        let generator = LlmSummaryGenerator::new(Arc::new(MockBackend::replying("   ")));
        let request = SummaryRequest::new("castles", PropertyFilters::new(), &Vec::<Property>::new());
        assert!(generator.summarize(&request).await.is_err());
    }
}
