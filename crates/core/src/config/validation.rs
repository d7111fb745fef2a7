//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    /// - `completion.model` is empty
    /// - `completion.temperature` is outside 0.0..=2.0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.completion.model.is_empty() {
            return Err(ConfigError::Invalid { field: "completion.model".into(), reason: "must not be empty".into() });
        }

        if !(0.0..=2.0).contains(&self.completion.temperature) {
            return Err(ConfigError::Invalid {
                field: "completion.temperature".into(),
                reason: "must be between 0.0 and 2.0".into(),
            });
        }

        if self.data_root == self.cache_root {
            tracing::warn!(
                root = %self.data_root.display(),
                "data_root and cache_root are the same directory; \
                 raw cache entries will sit beside gathered namespaces"
            );
        }

        Ok(())
    }
}
