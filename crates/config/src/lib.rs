//! Configuration management for the property chat service
//!
//! Supports loading configuration from:
//! - YAML/TOML files under `config/`
//! - Environment variables (`PROPCHAT__` prefix, `__` separator)

pub mod constants;
pub mod settings;

pub use settings::{
    load_settings, load_settings_from, ChatConfig, DataConfig, LlmProvider, LlmSettings,
    ObservabilityConfig, ServerConfig, Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<ConfigError> for propchat_core::Error {
    fn from(err: ConfigError) -> Self {
        propchat_core::Error::Config(err.to_string())
    }
}
