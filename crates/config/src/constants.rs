//! Centralized defaults
//!
//! Single source of truth for default values referenced by [`Settings`]
//! and by the crates that need them outside a loaded configuration.
//!
//! [`Settings`]: crate::Settings

/// Source file names inside the data directory
pub mod files {
    pub const PROJECTS: &str = "project.csv";
    pub const ADDRESSES: &str = "ProjectAddress.csv";
    pub const CONFIGURATIONS: &str = "ProjectConfiguration.csv";
    pub const VARIANTS: &str = "ProjectConfigurationVariant.csv";

    /// Merged output, relative to the data directory
    pub const MERGED: &str = "properties.json";
}

/// Service endpoints
pub mod endpoints {
    /// OpenAI-compatible chat completions base URL
    pub const OPENAI_DEFAULT: &str = "https://api.openai.com/v1";

    /// Anthropic Messages API base URL
    pub const ANTHROPIC_DEFAULT: &str = "https://api.anthropic.com";
}

/// LLM request defaults
pub mod llm {
    pub const OPENAI_MODEL: &str = "gpt-4o-mini";
    pub const CLAUDE_MODEL: &str = "claude-3-5-haiku-20241022";
    pub const TIMEOUT_SECS: u64 = 15;
    pub const MAX_TOKENS: usize = 400;
    pub const TEMPERATURE: f32 = 0.2;
}

/// Chat response limits
pub mod chat {
    /// Listings returned with a chat reply
    pub const MAX_RESULTS: usize = 8;

    /// Listings returned by `/all` when no limit is given
    pub const DEFAULT_LIMIT: usize = 20;
}
