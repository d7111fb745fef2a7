//! Completion client error types.

use std::sync::Arc;

/// Errors from a text-completion service.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CompletionError {
    /// No API key configured.
    #[error("missing API key: LCATS_COMPLETION__API_KEY not set")]
    MissingApiKey,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),

    /// The service answered without any choices.
    #[error("empty response: no choices returned")]
    EmptyResponse,
}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { CompletionError::Timeout } else { CompletionError::Network(Arc::new(err)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CompletionError::MissingApiKey;
        assert!(err.to_string().contains("API key"));

        let err = CompletionError::HttpError { status: 429 };
        assert_eq!(err.to_string(), "HTTP error: 429");

        let err = CompletionError::Parse("expected value".to_string());
        assert!(err.to_string().starts_with("parse error"));
    }
}
