//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (LCATS_*)
//! 2. TOML config file (if LCATS_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::cache::RefreshPolicy;

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (LCATS_*, `__` separates nested keys)
/// 2. TOML config file (if LCATS_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Root directory for gathered namespaces.
    ///
    /// Set via LCATS_DATA_ROOT environment variable.
    #[serde(default = "default_data_root")]
    pub data_root: PathBuf,

    /// Directory for raw fetched resources.
    ///
    /// Set via LCATS_CACHE_ROOT environment variable.
    #[serde(default = "default_cache_root")]
    pub cache_root: PathBuf,

    /// Directory holding packaged corpora.
    ///
    /// Set via LCATS_CORPORA_ROOT environment variable.
    #[serde(default = "default_corpora_root")]
    pub corpora_root: PathBuf,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via LCATS_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via LCATS_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Whether cached resources are trusted or refetched on read.
    ///
    /// Set via LCATS_REFRESH_POLICY (`trust-local` or `always-refresh`).
    #[serde(default)]
    pub refresh_policy: RefreshPolicy,

    /// Text-completion service settings.
    #[serde(default)]
    pub completion: CompletionSettings,
}

/// Settings for the text-completion service used by extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionSettings {
    /// Base URL of an OpenAI-compatible API.
    ///
    /// Set via LCATS_COMPLETION__BASE_URL environment variable.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key for the completion service.
    ///
    /// Set via LCATS_COMPLETION__API_KEY environment variable.
    /// Required only when extraction is run.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model name sent with each request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Completion request timeout in milliseconds.
    #[serde(default = "default_completion_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_data_root() -> PathBuf {
    PathBuf::from("data")
}

fn default_cache_root() -> PathBuf {
    PathBuf::from("data/cache")
}

fn default_corpora_root() -> PathBuf {
    PathBuf::from("../corpora")
}

fn default_user_agent() -> String {
    "lcats/0.1".into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".into()
}

fn default_model() -> String {
    "gpt-3.5-turbo".into()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_completion_timeout_ms() -> u64 {
    120_000
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            timeout_ms: default_completion_timeout_ms(),
        }
    }
}

impl CompletionSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_root: default_data_root(),
            cache_root: default_cache_root(),
            corpora_root: default_corpora_root(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            refresh_policy: RefreshPolicy::default(),
            completion: CompletionSettings::default(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `LCATS_`
    /// 2. TOML file from `LCATS_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    /// The layered figment used by [`load`](Self::load).
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("LCATS_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment.merge(
            Env::prefixed("LCATS_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        )
    }

    /// Extract and validate a configuration from `figment`.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Check if a completion API key is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the API key is not set.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.completion.api_key.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "completion.api_key".into(),
            hint: "Set LCATS_COMPLETION__API_KEY environment variable".into(),
        })
    }
}
