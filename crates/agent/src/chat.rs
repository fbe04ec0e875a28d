//! Chat service
//!
//! One chat turn: extract filters from the message, select matching
//! entries from the shared collection, summarize them. The collection is
//! read-only, so requests share it without locking.

use std::sync::Arc;

use propchat_config::ChatConfig;
use propchat_core::{Error, FilterExtractor, Property, PropertyFilters, Result, SummaryGenerator, SummaryRequest};
use propchat_dataset::PropertyStore;
use propchat_llm::{LlmBackend, LlmFilterExtractor, LlmSummaryGenerator};
use propchat_text_processing::HeuristicFilterExtractor;
use serde::Serialize;
use tracing::Instrument;

use crate::fallback::{FallbackFilterExtractor, FallbackSummaryGenerator};
use crate::filter_engine::apply_filters;
use crate::summary::TemplateSummaryGenerator;

/// Reply to one chat message
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub summary: String,
    /// First `max_results` matches
    pub properties: Vec<Property>,
    pub filters: PropertyFilters,
    pub total_matches: usize,
}

/// A page of the collection
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub properties: Vec<Property>,
    /// Size of the whole collection
    pub total: usize,
}

#[derive(Clone)]
pub struct ChatService {
    store: Arc<PropertyStore>,
    extractor: Arc<FallbackFilterExtractor>,
    summarizer: Arc<FallbackSummaryGenerator>,
    config: ChatConfig,
}

impl ChatService {
    /// Compose the service from explicit capabilities
    pub fn new(
        store: Arc<PropertyStore>,
        extractor: FallbackFilterExtractor,
        summarizer: FallbackSummaryGenerator,
        config: ChatConfig,
    ) -> Self {
        Self {
            store,
            extractor: Arc::new(extractor),
            summarizer: Arc::new(summarizer),
            config,
        }
    }

    /// Model-backed capabilities when `backend` is present, local ones otherwise
    pub fn with_backend(store: Arc<PropertyStore>, backend: Option<Arc<dyn LlmBackend>>, config: ChatConfig) -> Self {
        let remote_extractor = backend
            .clone()
            .map(|b| Arc::new(LlmFilterExtractor::new(b)) as Arc<dyn FilterExtractor>);
        let remote_summarizer = backend.map(|b| Arc::new(LlmSummaryGenerator::new(b)) as Arc<dyn SummaryGenerator>);

        Self::new(
            store,
            FallbackFilterExtractor::new(remote_extractor, Arc::new(HeuristicFilterExtractor::new())),
            FallbackSummaryGenerator::new(remote_summarizer, Arc::new(TemplateSummaryGenerator::new())),
            config,
        )
    }

    /// Local capabilities only
    pub fn offline(store: Arc<PropertyStore>, config: ChatConfig) -> Self {
        Self::with_backend(store, None, config)
    }

    pub fn store(&self) -> &PropertyStore {
        &self.store
    }

    /// Whether a language model is configured
    pub fn llm_available(&self) -> bool {
        self.extractor.has_primary() && self.summarizer.has_primary()
    }

    /// Answer one chat message
    pub async fn chat(&self, message: &str) -> Result<ChatReply> {
        let message = message.trim();
        if message.is_empty() {
            return Err(Error::InvalidInput("message must not be empty".to_string()));
        }

        let request_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!("chat", %request_id);

        async move {
            metrics::counter!("propchat_chat_requests_total").increment(1);

            let filters = self.extractor.extract(message).await?;
            tracing::debug!(?filters, extractor = self.extractor.name(), "Filters resolved");

            let matches = self.search(&filters);
            let total_matches = matches.len();

            let request = SummaryRequest::new(message, filters.clone(), matches.iter().copied());
            let summary = self.summarizer.summarize(&request).await?;

            tracing::info!(total_matches, "Chat request answered");

            Ok(ChatReply {
                summary,
                properties: matches
                    .into_iter()
                    .take(self.config.max_results)
                    .cloned()
                    .collect(),
                filters,
                total_matches,
            })
        }
        .instrument(span)
        .await
    }

    /// Entries matching `filters`, in collection order
    pub fn search(&self, filters: &PropertyFilters) -> Vec<&Property> {
        apply_filters(self.store.properties(), filters)
    }

    /// First `limit` entries, or `default_limit` when not given
    pub fn all(&self, limit: Option<usize>) -> Listing {
        let limit = limit.unwrap_or(self.config.default_limit);
        Listing {
            properties: self.store.properties().iter().take(limit).cloned().collect(),
            total: self.store.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::property;
    use async_trait::async_trait;

    fn store() -> Arc<PropertyStore> {
        let mut properties = Vec::new();
        for i in 0..10 {
            properties.push(property(&format!("pune-{}", i), "Pune", 3, 9_000_000.0 + i as f64));
        }
        properties.push(property("mumbai-1", "Mumbai", 2, 20_000_000.0));
        Arc::new(PropertyStore::from_properties(properties))
    }

    fn config() -> ChatConfig {
        ChatConfig {
            max_results: 8,
            default_limit: 5,
        }
    }

    #[tokio::test]
    async fn test_chat_offline() {
        let service = ChatService::offline(store(), config());
        assert!(!service.llm_available());

        let reply = service.chat("3BHK in Pune under 1.2 Cr").await.unwrap();
        assert_eq!(reply.filters.city.as_deref(), Some("pune"));
        assert_eq!(reply.total_matches, 10);
        assert_eq!(reply.properties.len(), 8);
        assert_eq!(reply.properties[0].id, "pune-0");
        assert!(reply.summary.starts_with("I found 10 properties in Pune"));
    }

    #[tokio::test]
    async fn test_chat_without_matches() {
        let service = ChatService::offline(store(), config());
        let reply = service.chat("4 BHK in Chennai").await.unwrap();
        assert_eq!(reply.total_matches, 0);
        assert!(reply.properties.is_empty());
        assert!(reply.summary.starts_with("Sorry"));
    }

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let service = ChatService::offline(store(), config());
        let err = service.chat("   ").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    struct Echo;

    #[async_trait]
    impl SummaryGenerator for Echo {
        async fn summarize(&self, request: &SummaryRequest) -> Result<String> {
            Ok(format!("{} matches", request.total_matches))
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    #[tokio::test]
    async fn test_custom_capabilities() {
        let service = ChatService::new(
            store(),
            FallbackFilterExtractor::new(None, Arc::new(HeuristicFilterExtractor::new())),
            FallbackSummaryGenerator::new(Some(Arc::new(Echo)), Arc::new(TemplateSummaryGenerator::new())),
            config(),
        );
        let reply = service.chat("2 bedroom flat in Mumbai").await.unwrap();
        assert_eq!(reply.summary, "1 matches");
        assert_eq!(reply.properties[0].id, "mumbai-1");
    }

    #[test]
    fn test_all_uses_default_limit() {
        let service = ChatService::offline(store(), config());
        let listing = service.all(None);
        assert_eq!(listing.properties.len(), 5);
        assert_eq!(listing.total, 11);

        let listing = service.all(Some(100));
        assert_eq!(listing.properties.len(), 11);
    }

    #[test]
    fn test_reply_serializes_camel_case() {
        let reply = ChatReply {
            summary: "ok".to_string(),
            properties: Vec::new(),
            filters: PropertyFilters::new().with_bhk(2),
            total_matches: 0,
        };
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["totalMatches"], 0);
        assert_eq!(json["filters"], serde_json::json!({"bhk": 2}));
    }
}
