//! LLM Factory
//!
//! Builds the configured backend from settings. A missing key, or one that
//! does not look like the provider's credential, means no backend: the
//! caller falls back to local extraction and templates without ever making
//! a network call.

use std::sync::Arc;
use std::time::Duration;

use propchat_config::{LlmProvider, LlmSettings};

use crate::backend::{LlmBackend, OpenAIBackend, OpenAIConfig};
use crate::claude::{ClaudeBackend, ClaudeConfig};
use crate::LlmError;

const OPENAI_KEY_PREFIX: &str = "sk-";
const ANTHROPIC_KEY_PREFIX: &str = "sk-ant-";

/// Check that `key` has the shape of a credential for `provider`
pub fn check_credential(provider: LlmProvider, key: &str) -> Result<(), LlmError> {
    let ok = match provider {
        LlmProvider::OpenAI => key.starts_with(OPENAI_KEY_PREFIX) && !key.starts_with(ANTHROPIC_KEY_PREFIX),
        LlmProvider::Claude => key.starts_with(ANTHROPIC_KEY_PREFIX),
        LlmProvider::None => false,
    };

    if ok {
        Ok(())
    } else {
        Err(LlmError::Configuration(format!(
            "API key does not match the {:?} credential format",
            provider
        )))
    }
}

/// Factory for creating LLM backends
pub struct LlmFactory;

impl LlmFactory {
    /// Create the backend described by `settings`
    pub fn create_backend(settings: &LlmSettings) -> Result<Arc<dyn LlmBackend>, LlmError> {
        if settings.provider == LlmProvider::None {
            return Err(LlmError::Configuration("LLM provider disabled".to_string()));
        }

        let api_key = settings.resolved_api_key().ok_or_else(|| {
            LlmError::Configuration(format!(
                "{} requires an API key",
                settings.provider.api_key_env().unwrap_or("provider")
            ))
        })?;
        check_credential(settings.provider, &api_key)?;

        let timeout = Duration::from_secs(settings.timeout_secs);

        match settings.provider {
            LlmProvider::OpenAI => {
                let config = OpenAIConfig {
                    endpoint: settings.resolved_endpoint(),
                    max_tokens: settings.max_tokens,
                    temperature: settings.temperature,
                    timeout,
                    ..OpenAIConfig::openai(api_key, settings.resolved_model())
                };
                Ok(Arc::new(OpenAIBackend::new(config)?))
            }

            LlmProvider::Claude => {
                let config = ClaudeConfig::new(api_key)
                    .with_model(settings.resolved_model())
                    .with_endpoint(settings.resolved_endpoint())
                    .with_max_tokens(settings.max_tokens)
                    .with_temperature(settings.temperature)
                    .with_timeout(timeout);
                Ok(Arc::new(ClaudeBackend::new(config)?))
            }

            LlmProvider::None => Err(LlmError::Configuration("LLM provider disabled".to_string())),
        }
    }
}
