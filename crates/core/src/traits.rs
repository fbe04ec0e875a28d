//! Capability traits
//!
//! Filter extraction and summary generation each have a remote
//! (LLM-backed) implementation and a local heuristic one. Callers depend on
//! these traits only and never on which implementation answered.
//!
//! ```text
//! FilterExtractor:  free text   → PropertyFilters
//! SummaryGenerator: digest only → short paragraph
//! ```

use async_trait::async_trait;

use crate::{PropertyFilters, Result, SummaryRequest};

/// Turns a free-text query into structured filters
///
/// Implementations:
/// - `LlmFilterExtractor` - asks the language model for a JSON object
/// - `HeuristicFilterExtractor` - keyword/regex fallback parser
#[async_trait]
pub trait FilterExtractor: Send + Sync + 'static {
    /// Extract filters from a user message
    ///
    /// An empty filter object is a valid answer.
    async fn extract(&self, message: &str) -> Result<PropertyFilters>;

    /// Name for logging
    fn name(&self) -> &str;
}

/// Writes a short description of a result set
///
/// Implementations:
/// - `LlmSummaryGenerator` - language model fed with the digest
/// - `TemplateSummaryGenerator` - deterministic sentence templates
#[async_trait]
pub trait SummaryGenerator: Send + Sync + 'static {
    async fn summarize(&self, request: &SummaryRequest) -> Result<String>;

    /// Name for logging
    fn name(&self) -> &str;
}
