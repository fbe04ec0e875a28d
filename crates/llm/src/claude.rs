//! Claude Backend
//!
//! Implements the Anthropic Messages API. The system prompt travels in the
//! top-level `system` field, not as a message.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use propchat_config::constants::{endpoints, llm};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::backend::{FinishReason, GenerationResult, LlmBackend};
use crate::prompt::{Message, Role};
use crate::LlmError;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Configuration for Claude backend
#[derive(Debug, Clone)]
pub struct ClaudeConfig {
    /// API key
    pub api_key: String,
    /// Model id
    pub model: String,
    /// Maximum tokens to generate
    pub max_tokens: usize,
    /// Temperature (0.0 - 1.0)
    pub temperature: f32,
    /// Request timeout
    pub timeout: Duration,
    /// API endpoint (for testing or proxy)
    pub endpoint: String,
}

impl Default for ClaudeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: llm::CLAUDE_MODEL.to_string(),
            max_tokens: llm::MAX_TOKENS,
            temperature: llm::TEMPERATURE,
            timeout: Duration::from_secs(llm::TIMEOUT_SECS),
            endpoint: endpoints::ANTHROPIC_DEFAULT.to_string(),
        }
    }
}

impl ClaudeConfig {
    /// Create config with API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Set model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 1.0);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

/// Anthropic Messages API backend
pub struct ClaudeBackend {
    config: ClaudeConfig,
    client: Client,
}

impl ClaudeBackend {
    /// Create a new Claude backend
    pub fn new(config: ClaudeConfig) -> Result<Self, LlmError> {
        if config.api_key.is_empty() {
            return Err(LlmError::Configuration(
                "ANTHROPIC_API_KEY not set. Set it via environment or config.".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.endpoint.trim_end_matches('/'))
    }

    fn build_request(&self, messages: &[Message]) -> ClaudeRequest {
        let system = messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        ClaudeRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            messages: messages
                .iter()
                .filter(|m| m.role != Role::System)
                .map(|m| ClaudeMessage {
                    role: m.role.to_string(),
                    content: m.content.clone(),
                })
                .collect(),
            system: (!system.is_empty()).then_some(system),
            temperature: Some(self.config.temperature),
        }
    }
}

#[async_trait]
impl LlmBackend for ClaudeBackend {
    async fn generate(&self, messages: &[Message]) -> Result<GenerationResult, LlmError> {
        let start = Instant::now();

        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&self.build_request(messages))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("HTTP {}: {}", status, error_text)));
        }

        let response: ClaudeApiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let result = response.into_result(start.elapsed().as_millis() as u64);

        tracing::debug!(
            model = %self.config.model,
            tokens = result.tokens,
            total_ms = result.total_time_ms,
            "Claude generation complete"
        );

        Ok(result)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn provider(&self) -> &'static str {
        "claude"
    }
}

// =============================================================================
// API Types
// =============================================================================

#[derive(Debug, Serialize)]
struct ClaudeRequest {
    model: String,
    max_tokens: usize,
    messages: Vec<ClaudeMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ClaudeMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClaudeContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct ClaudeApiResponse {
    content: Vec<ClaudeContentBlock>,
    #[serde(default)]
    stop_reason: Option<ClaudeStopReason>,
    #[serde(default)]
    usage: Option<ClaudeUsage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ClaudeStopReason {
    EndTurn,
    MaxTokens,
    StopSequence,
    ToolUse,
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct ClaudeUsage {
    output_tokens: usize,
}

impl ClaudeApiResponse {
    fn into_result(self, total_time_ms: u64) -> GenerationResult {
        let text = self
            .content
            .into_iter()
            .filter_map(|block| match block {
                ClaudeContentBlock::Text { text } => Some(text),
                ClaudeContentBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("");

        GenerationResult {
            text,
            tokens: self.usage.map(|u| u.output_tokens).unwrap_or(0),
            total_time_ms,
            finish_reason: match self.stop_reason {
                Some(ClaudeStopReason::MaxTokens) => FinishReason::Length,
                Some(ClaudeStopReason::EndTurn)
                | Some(ClaudeStopReason::StopSequence)
                | Some(ClaudeStopReason::ToolUse)
                | Some(ClaudeStopReason::Other)
                | None => FinishReason::Stop,
            },
        }
    }
}
