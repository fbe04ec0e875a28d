//! Model-or-local capability composition
//!
//! Each wrapper holds an optional remote implementation and a local one.
//! The remote one is tried once; any error is logged, counted and answered
//! by the local implementation. No retries.

use std::sync::Arc;

use async_trait::async_trait;
use propchat_core::{FilterExtractor, PropertyFilters, Result, SummaryGenerator, SummaryRequest};

const FALLBACK_COUNTER: &str = "propchat_llm_fallbacks_total";

/// Filter extraction with a local fallback
pub struct FallbackFilterExtractor {
    primary: Option<Arc<dyn FilterExtractor>>,
    fallback: Arc<dyn FilterExtractor>,
}

impl FallbackFilterExtractor {
    pub fn new(primary: Option<Arc<dyn FilterExtractor>>, fallback: Arc<dyn FilterExtractor>) -> Self {
        Self { primary, fallback }
    }

    /// Whether a remote extractor is configured
    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }
}

#[async_trait]
impl FilterExtractor for FallbackFilterExtractor {
    async fn extract(&self, message: &str) -> Result<PropertyFilters> {
        if let Some(primary) = &self.primary {
            match primary.extract(message).await {
                Ok(filters) => return Ok(filters),
                Err(e) => {
                    tracing::warn!(
                        extractor = primary.name(),
                        error = %e,
                        "Filter extraction failed, using {}",
                        self.fallback.name()
                    );
                    metrics::counter!(FALLBACK_COUNTER, "capability" => "filters").increment(1);
                }
            }
        }

        self.fallback.extract(message).await
    }

    fn name(&self) -> &str {
        match &self.primary {
            Some(primary) => primary.name(),
            None => self.fallback.name(),
        }
    }
}

/// Summary generation with a local fallback
pub struct FallbackSummaryGenerator {
    primary: Option<Arc<dyn SummaryGenerator>>,
    fallback: Arc<dyn SummaryGenerator>,
}

impl FallbackSummaryGenerator {
    pub fn new(primary: Option<Arc<dyn SummaryGenerator>>, fallback: Arc<dyn SummaryGenerator>) -> Self {
        Self { primary, fallback }
    }

    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }
}

#[async_trait]
impl SummaryGenerator for FallbackSummaryGenerator {
    async fn summarize(&self, request: &SummaryRequest) -> Result<String> {
        if let Some(primary) = &self.primary {
            match primary.summarize(request).await {
                Ok(summary) => return Ok(summary),
                Err(e) => {
                    tracing::warn!(
                        generator = primary.name(),
                        error = %e,
                        "Summary generation failed, using {}",
                        self.fallback.name()
                    );
                    metrics::counter!(FALLBACK_COUNTER, "capability" => "summary").increment(1);
                }
            }
        }

        self.fallback.summarize(request).await
    }

    fn name(&self) -> &str {
        match &self.primary {
            Some(primary) => primary.name(),
            None => self.fallback.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::TemplateSummaryGenerator;
    use propchat_core::{Error, Property};
    use propchat_text_processing::HeuristicFilterExtractor;

    struct Broken;

    #[async_trait]
    impl FilterExtractor for Broken {
        async fn extract(&self, _message: &str) -> Result<PropertyFilters> {
            Err(Error::Llm("HTTP 500".to_string()))
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    #[async_trait]
    impl SummaryGenerator for Broken {
        async fn summarize(&self, _request: &SummaryRequest) -> Result<String> {
            Err(Error::Llm("timeout".to_string()))
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    struct Fixed;

    #[async_trait]
    impl FilterExtractor for Fixed {
        async fn extract(&self, _message: &str) -> Result<PropertyFilters> {
            Ok(PropertyFilters::new().with_city("Delhi"))
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn test_primary_result_is_used() {
        let extractor = FallbackFilterExtractor::new(Some(Arc::new(Fixed)), Arc::new(HeuristicFilterExtractor::new()));
        let filters = extractor.extract("3BHK in Pune").await.unwrap();
        assert_eq!(filters.city.as_deref(), Some("Delhi"));
        assert_eq!(extractor.name(), "fixed");
    }

    #[tokio::test]
    async fn test_failed_primary_falls_back() {
        let extractor = FallbackFilterExtractor::new(Some(Arc::new(Broken)), Arc::new(HeuristicFilterExtractor::new()));
        let filters = extractor.extract("3BHK in Pune under 1.2 Cr").await.unwrap();
        assert_eq!(filters.city.as_deref(), Some("pune"));
        assert_eq!(filters.bhk, Some(3));
    }

    #[tokio::test]
    async fn test_no_primary_uses_fallback() {
        let extractor = FallbackFilterExtractor::new(None, Arc::new(HeuristicFilterExtractor::new()));
        assert!(!extractor.has_primary());
        assert_eq!(extractor.name(), "keyword");
        let filters = extractor.extract("2 bedroom flat in Mumbai").await.unwrap();
        assert_eq!(filters.bhk, Some(2));
    }

    #[tokio::test]
    async fn test_summary_falls_back_to_template() {
        let generator = FallbackSummaryGenerator::new(Some(Arc::new(Broken)), Arc::new(TemplateSummaryGenerator::new()));
        let request = SummaryRequest::new(
            "cheap flat",
            PropertyFilters::new().with_max_price(9_000_000.0),
            &Vec::<Property>::new(),
        );
        let summary = generator.summarize(&request).await.unwrap();
        assert!(summary.contains("budget"));
    }
}
