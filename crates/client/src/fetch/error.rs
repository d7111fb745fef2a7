//! Fetch client error types.

use std::sync::Arc;

/// Errors from the blocking HTTP fetch client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    /// The URL is empty, unparseable or not http(s).
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request did not complete within the configured timeout.
    #[error("fetch timeout: {0}")]
    Timeout(String),

    /// Any status other than 200 OK.
    #[error("HTTP error: status {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// Connection or client construction failure.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// The response body could not be read as text.
    #[error("failed to read response body: {0}")]
    Body(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            let url = err.url().map(|u| u.to_string()).unwrap_or_default();
            FetchError::Timeout(url)
        } else {
            FetchError::Network(Arc::new(err))
        }
    }
}

impl From<super::url::UrlError> for FetchError {
    fn from(err: super::url::UrlError) -> Self {
        FetchError::InvalidUrl(err.to_string())
    }
}
