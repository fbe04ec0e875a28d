//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{chat, endpoints, files, llm};
use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Source files and merged output
    #[serde(default)]
    pub data: DataConfig,

    /// Language model access
    #[serde(default)]
    pub llm: LlmSettings,

    /// Chat response shaping
    #[serde(default)]
    pub chat: ChatConfig,

    /// Logging
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Settings {
    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_data()?;
        self.validate_llm()?;
        self.validate_chat()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }
        Ok(())
    }

    fn validate_data(&self) -> Result<(), ConfigError> {
        if self.data.dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingField("data.dir".to_string()));
        }
        Ok(())
    }

    fn validate_llm(&self) -> Result<(), ConfigError> {
        let llm = &self.llm;

        if !(0.0..=2.0).contains(&llm.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "llm.temperature".to_string(),
                message: format!("Must be between 0.0 and 2.0, got {}", llm.temperature),
            });
        }

        if llm.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "llm.timeout_secs".to_string(),
                message: "Timeout must be at least 1 second".to_string(),
            });
        }

        if llm.max_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                field: "llm.max_tokens".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    fn validate_chat(&self) -> Result<(), ConfigError> {
        if self.chat.max_results == 0 {
            return Err(ConfigError::InvalidValue {
                field: "chat.max_results".to_string(),
                message: "Must return at least 1 listing".to_string(),
            });
        }
        if self.chat.default_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "chat.default_limit".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Send CORS headers; false sends none, so browsers allow no cross-origin requests
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// CORS allowed origins
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: true,
            cors_origins: Vec::new(),
        }
    }
}

/// Source tables and merged output locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding the CSV sources
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_projects_file")]
    pub projects_file: String,

    #[serde(default = "default_addresses_file")]
    pub addresses_file: String,

    #[serde(default = "default_configurations_file")]
    pub configurations_file: String,

    #[serde(default = "default_variants_file")]
    pub variants_file: String,

    /// Merged output; defaults to `<dir>/properties.json`
    #[serde(default)]
    pub merged_path: Option<PathBuf>,

    /// Ignore an existing merged output and merge again
    #[serde(default)]
    pub rebuild: bool,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_projects_file() -> String {
    files::PROJECTS.to_string()
}
fn default_addresses_file() -> String {
    files::ADDRESSES.to_string()
}
fn default_configurations_file() -> String {
    files::CONFIGURATIONS.to_string()
}
fn default_variants_file() -> String {
    files::VARIANTS.to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
            projects_file: default_projects_file(),
            addresses_file: default_addresses_file(),
            configurations_file: default_configurations_file(),
            variants_file: default_variants_file(),
            merged_path: None,
            rebuild: false,
        }
    }
}

impl DataConfig {
    /// Data configuration rooted at `dir` with default file names
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Default::default()
        }
    }

    /// Full path of a source file
    pub fn source_path(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// Full path of the merged output
    pub fn merged_path(&self) -> PathBuf {
        self.merged_path
            .clone()
            .unwrap_or_else(|| self.dir.join(files::MERGED))
    }
}

/// Which remote language model API to call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// OpenAI-compatible chat completions
    #[default]
    OpenAI,
    /// Anthropic Messages API
    Claude,
    /// Never call a model, always use the local fallbacks
    None,
}

impl LlmProvider {
    /// Environment variable conventionally holding this provider's key
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            LlmProvider::OpenAI => Some("OPENAI_API_KEY"),
            LlmProvider::Claude => Some("ANTHROPIC_API_KEY"),
            LlmProvider::None => None,
        }
    }

    /// Default API base URL
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            LlmProvider::OpenAI | LlmProvider::None => endpoints::OPENAI_DEFAULT,
            LlmProvider::Claude => endpoints::ANTHROPIC_DEFAULT,
        }
    }

    /// Default model name
    pub fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::OpenAI | LlmProvider::None => llm::OPENAI_MODEL,
            LlmProvider::Claude => llm::CLAUDE_MODEL,
        }
    }
}

/// Language model access
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    #[serde(default)]
    pub provider: LlmProvider,

    /// Model name; provider default when unset
    #[serde(default)]
    pub model: Option<String>,

    /// API base URL; provider default when unset
    #[serde(default)]
    pub endpoint: Option<String>,

    /// API key; read from the provider's environment variable when unset
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_llm_max_tokens")]
    pub max_tokens: usize,

    #[serde(default = "default_llm_temperature")]
    pub temperature: f32,
}

fn default_llm_timeout() -> u64 {
    llm::TIMEOUT_SECS
}
fn default_llm_max_tokens() -> usize {
    llm::MAX_TOKENS
}
fn default_llm_temperature() -> f32 {
    llm::TEMPERATURE
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            model: None,
            endpoint: None,
            api_key: None,
            timeout_secs: default_llm_timeout(),
            max_tokens: default_llm_max_tokens(),
            temperature: default_llm_temperature(),
        }
    }
}

impl LlmSettings {
    /// Configured key, else the provider's environment variable
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| {
                self.provider
                    .api_key_env()
                    .and_then(|var| std::env::var(var).ok())
            })
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }

    pub fn resolved_model(&self) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| self.provider.default_model().to_string())
    }

    pub fn resolved_endpoint(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| self.provider.default_endpoint().to_string())
    }
}

/// Chat response shaping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Listings attached to a chat reply
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Listings returned by `/all` without an explicit limit
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

fn default_max_results() -> usize {
    chat::MAX_RESULTS
}
fn default_limit() -> usize {
    chat::DEFAULT_LIMIT
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            default_limit: default_limit(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

/// Load settings from `config/` and the environment
///
/// Priority: env vars > config/{env}.yaml > config/default.yaml > defaults
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from(Path::new("config"), env)
}

/// Load settings from an explicit configuration directory
pub fn load_settings_from(config_dir: &Path, env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    // Load default config
    builder = builder.add_source(File::from(config_dir.join("default")).required(false));

    // Load environment-specific config
    if let Some(env_name) = env {
        builder = builder.add_source(File::from(config_dir.join(env_name)).required(false));
    }

    // Load from environment variables
    builder = builder.add_source(
        Environment::with_prefix("PROPCHAT")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    tracing::debug!(
        config_dir = %config_dir.display(),
        env = env.unwrap_or("default"),
        "Settings loaded"
    );

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 5000);
        assert_eq!(settings.chat.max_results, 8);
        assert_eq!(settings.llm.provider, LlmProvider::OpenAI);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = Settings::default();
        settings.llm.temperature = 3.0;
        assert!(settings.validate().is_err());

        settings.llm.temperature = 0.5;
        settings.chat.max_results = 0;
        assert!(settings.validate().is_err());

        settings.chat.max_results = 8;
        settings.server.port = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_data_paths() {
        let data = DataConfig::in_dir("/srv/listings");
        assert_eq!(
            data.source_path(&data.projects_file),
            PathBuf::from("/srv/listings/project.csv")
        );
        assert_eq!(data.merged_path(), PathBuf::from("/srv/listings/properties.json"));

        let data = DataConfig {
            merged_path: Some(PathBuf::from("/tmp/merged.json")),
            ..DataConfig::in_dir("/srv/listings")
        };
        assert_eq!(data.merged_path(), PathBuf::from("/tmp/merged.json"));
    }

    #[test]
    fn test_llm_resolution() {
        let llm = LlmSettings {
            provider: LlmProvider::Claude,
            api_key: Some("  sk-ant-test  ".to_string()),
            ..Default::default()
        };
        assert_eq!(llm.resolved_api_key().as_deref(), Some("sk-ant-test"));
        assert_eq!(llm.resolved_model(), crate::constants::llm::CLAUDE_MODEL);
        assert_eq!(llm.resolved_endpoint(), "https://api.anthropic.com");

        let disabled = LlmSettings {
            provider: LlmProvider::None,
            ..Default::default()
        };
        assert!(disabled.resolved_api_key().is_none());
    }

    #[test]
    fn test_load_settings_from_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("default.yaml"),
            "server:\n  port: 9001\nllm:\n  provider: claude\n  temperature: 0.4\ndata:\n  dir: /var/lib/propchat\n",
        )
        .unwrap();

        let settings = load_settings_from(dir.path(), None).unwrap();
        assert_eq!(settings.server.port, 9001);
        assert_eq!(settings.llm.provider, LlmProvider::Claude);
        assert_eq!(settings.data.dir, PathBuf::from("/var/lib/propchat"));
        assert_eq!(settings.chat.default_limit, 20);
    }

    #[test]
    fn test_load_settings_missing_files_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from(dir.path(), Some("staging")).unwrap();
        assert_eq!(settings.server.host, "0.0.0.0");
    }
}
