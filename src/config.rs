use serde::Deserialize;
use std::time::Duration;

use crate::services::retry::RetryPolicy;

/// Bounds for `SEARCH_RESULT_CAP`
pub const MIN_RESULT_CAP: usize = 3;
pub const MAX_RESULT_CAP: usize = 5;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// OpenRouter API key
    pub openrouter_api_key: String,

    /// OpenAI-compatible chat completions base URL
    #[serde(default = "default_llm_api_url")]
    pub llm_api_url: String,

    #[serde(default = "default_llm_model")]
    pub llm_model: String,

    #[serde(default = "default_llm_temperature")]
    pub llm_temperature: f32,

    /// Search backend: `duckduckgo` or `json`
    #[serde(default = "default_search_backend")]
    pub search_backend: String,

    #[serde(default = "default_search_api_url")]
    pub search_api_url: String,

    /// Bearer token for the `json` search backend
    #[serde(default)]
    pub search_api_key: Option<String>,

    /// Maximum number of search results kept per query
    #[serde(default = "default_search_result_cap")]
    pub search_result_cap: usize,

    #[serde(default = "default_search_max_attempts")]
    pub search_max_attempts: u32,

    #[serde(default = "default_backoff_multiplier_secs")]
    pub search_backoff_multiplier_secs: u64,

    #[serde(default = "default_backoff_min_secs")]
    pub search_backoff_min_secs: u64,

    #[serde(default = "default_backoff_max_secs")]
    pub search_backoff_max_secs: u64,

    /// Timeout applied to every LLM and search call
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,

    /// Sessions idle longer than this are dropped
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,

    /// How often expired sessions are swept
    #[serde(default = "default_session_sweep_secs")]
    pub session_sweep_secs: u64,

    /// Ask the LLM for unverified suggestions when search yields nothing
    #[serde(default = "default_fallback_enabled")]
    pub fallback_enabled: bool,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_llm_api_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_llm_model() -> String {
    "meta-llama/llama-3.3-70b-instruct:free".to_string()
}

fn default_llm_temperature() -> f32 {
    0.5
}

fn default_search_backend() -> String {
    "duckduckgo".to_string()
}

fn default_search_api_url() -> String {
    "https://html.duckduckgo.com/html/".to_string()
}

fn default_search_result_cap() -> usize {
    5
}

fn default_search_max_attempts() -> u32 {
    3
}

fn default_backoff_multiplier_secs() -> u64 {
    1
}

fn default_backoff_min_secs() -> u64 {
    4
}

fn default_backoff_max_secs() -> u64 {
    10
}

fn default_call_timeout_secs() -> u64 {
    30
}

fn default_session_ttl_secs() -> u64 {
    60 * 60
}

fn default_session_sweep_secs() -> u64 {
    60
}

fn default_fallback_enabled() -> bool {
    true
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the service cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.openrouter_api_key.trim().is_empty() {
            anyhow::bail!("OPENROUTER_API_KEY must not be empty");
        }
        if !(MIN_RESULT_CAP..=MAX_RESULT_CAP).contains(&self.search_result_cap) {
            anyhow::bail!(
                "SEARCH_RESULT_CAP must be between {} and {}, got {}",
                MIN_RESULT_CAP,
                MAX_RESULT_CAP,
                self.search_result_cap
            );
        }
        if self.search_max_attempts == 0 {
            anyhow::bail!("SEARCH_MAX_ATTEMPTS must be at least 1");
        }
        if self.search_backoff_min_secs > self.search_backoff_max_secs {
            anyhow::bail!(
                "SEARCH_BACKOFF_MIN_SECS ({}) exceeds SEARCH_BACKOFF_MAX_SECS ({})",
                self.search_backoff_min_secs,
                self.search_backoff_max_secs
            );
        }
        if self.call_timeout_secs == 0 {
            anyhow::bail!("CALL_TIMEOUT_SECS must be positive");
        }
        if self.session_ttl_secs == 0 || self.session_sweep_secs == 0 {
            anyhow::bail!("SESSION_TTL_SECS and SESSION_SWEEP_SECS must be positive");
        }
        match self.search_backend.as_str() {
            "duckduckgo" | "json" => Ok(()),
            other => anyhow::bail!("Unknown SEARCH_BACKEND '{}'", other),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.search_max_attempts,
            Duration::from_secs(self.search_backoff_multiplier_secs),
            Duration::from_secs(self.search_backoff_min_secs),
            Duration::from_secs(self.search_backoff_max_secs),
        )
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn session_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.session_sweep_secs)
    }
}
