//! AI configuration management
//!
//! Settings come from environment variables; `--no-ai` on the command line
//! turns the feature off regardless.

use std::env;
use std::time::Duration;

// Environment variable names
pub const ENV_AI_API_KEY: &str = "AI_API_KEY";
pub const ENV_AI_API_URL: &str = "AI_API_URL";
pub const ENV_AI_API_ENDPOINT: &str = "AI_API_ENDPOINT";
pub const ENV_AI_MODEL: &str = "AI_MODEL";
pub const ENV_AI_TIMEOUT_SECS: &str = "AI_TIMEOUT_SECS";
pub const ENV_AI_MAX_TOKENS: &str = "AI_MAX_TOKENS";

const DEFAULT_TIMEOUT_SECS: u64 = 20;
const DEFAULT_MAX_TOKENS: u32 = 100;

/// Configuration for the topic suggestion provider
#[derive(Debug, Clone, Default)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub api_endpoint: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_tokens: Option<u32>,
}

impl AiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as missing; unparsable
    /// numbers fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            api_key: get(ENV_AI_API_KEY),
            api_url: get(ENV_AI_API_URL),
            api_endpoint: get(ENV_AI_API_ENDPOINT),
            model: get(ENV_AI_MODEL),
            timeout_secs: get(ENV_AI_TIMEOUT_SECS).and_then(|v| v.parse().ok()),
            max_tokens: get(ENV_AI_MAX_TOKENS).and_then(|v| v.parse().ok()),
        }
    }

    /// Check if AI is configured and ready to use
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Get the effective API URL (with default)
    pub fn effective_api_url(&self) -> &str {
        self.api_url
            .as_deref()
            .unwrap_or("https://api.openai.com")
    }

    /// Get the effective API endpoint (with default)
    pub fn effective_api_endpoint(&self) -> &str {
        self.api_endpoint
            .as_deref()
            .unwrap_or("/v1/chat/completions")
    }

    /// Get the effective model name (with default)
    pub fn effective_model(&self) -> &str {
        self.model.as_deref().unwrap_or("gpt-4o-mini")
    }

    pub fn effective_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn effective_max_tokens(&self) -> u32 {
        self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }
}
