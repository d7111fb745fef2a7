//! Blocking HTTP fetch pipeline and URL resource cache.
//!
//! ### Acquisition
//! - One GET per acquisition, bounded by the configured timeout
//! - Only `200 OK` is a success; every other status is an error
//! - Timeouts surface as [`FetchError::Timeout`], never as empty content
//!
//! ### Caching
//! - URLs are keyed by SHA-256 of the full URL plus the path's extension
//! - [`UrlResourceCache`] skips the network entirely on a cache hit

pub mod error;
pub mod url;

pub use error::FetchError;
pub use url::{UrlCanonicalizer, UrlError, filename_from_url, parse_fetch_url, url_extension};

use std::path::PathBuf;
use std::time::{Duration, Instant};

use lcats_core::cache::{Acquirer, RefreshPolicy, ResourceCache};
use lcats_core::config::AppConfig;
use lcats_core::Error;
use reqwest::StatusCode;
use reqwest::blocking::Client;

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "lcats/0.1")
    pub user_agent: String,

    /// Request timeout (default: 10s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { user_agent: "lcats/0.1".to_string(), timeout: Duration::from_secs(10), max_redirects: 5 }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self { user_agent: config.user_agent.clone(), timeout: config.timeout(), ..Default::default() }
    }
}

/// Blocking HTTP client used as the acquirer for URL caches.
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: Client,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()?;

        Ok(Self { http })
    }

    /// Fetch a URL and return its body as text.
    ///
    /// Fails on anything other than `200 OK`.
    pub fn fetch(&self, url_str: &str) -> Result<String, FetchError> {
        let start = Instant::now();
        let url = parse_fetch_url(url_str)?;

        let response = self
            .http
            .get(url.as_str())
            .header("Accept", "text/html,application/xhtml+xml,text/plain;q=0.9,*/*;q=0.8")
            .send()?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::debug!("fetch of {} failed with status {}", url, status);
            return Err(FetchError::HttpStatus { status: status.as_u16(), url: url.to_string() });
        }

        let text = response.text().map_err(|e| {
            if e.is_timeout() { FetchError::Timeout(url.to_string()) } else { FetchError::Body(e.to_string()) }
        })?;

        tracing::debug!("fetched {} in {}ms ({} bytes)", url, start.elapsed().as_millis(), text.len());

        Ok(text)
    }
}

impl Acquirer for FetchClient {
    fn acquire(&self, id: &str) -> Result<String, Error> {
        self.fetch(id).map_err(|e| Error::acquisition(id, e))
    }
}

/// Resource cache keyed by hashed URLs and filled over HTTP.
pub type UrlResourceCache = ResourceCache<UrlCanonicalizer, FetchClient>;

/// Build a [`UrlResourceCache`] rooted at `root`.
pub fn url_resource_cache(root: impl Into<PathBuf>, config: FetchConfig) -> Result<UrlResourceCache, FetchError> {
    Ok(ResourceCache::new(root, UrlCanonicalizer, FetchClient::new(config)?))
}

/// Build a [`UrlResourceCache`] from application configuration.
pub fn url_resource_cache_from_config(config: &AppConfig) -> Result<UrlResourceCache, FetchError> {
    let refresh_policy: RefreshPolicy = config.refresh_policy;
    Ok(url_resource_cache(&config.cache_root, FetchConfig::from(config))?.with_refresh_policy(refresh_policy))
}
