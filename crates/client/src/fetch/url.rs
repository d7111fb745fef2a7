//! URL parsing and cache-key canonicalization.

use lcats_core::cache::{Canonicalizer, hash_key};
use lcats_core::Error;

/// Error type for URL parsing failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Parse a URL string for fetching.
///
/// Leading/trailing whitespace is trimmed; only `http` and `https` are accepted.
pub fn parse_fetch_url(input: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let parsed = url::Url::parse(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }
}

/// File extension of the URL's last path segment, including the dot.
///
/// Query strings and fragments are ignored. Dotfiles, trailing dots and
/// extensions with non-alphanumeric characters yield `None`.
pub fn url_extension(input: &str) -> Option<String> {
    let parsed = url::Url::parse(input.trim()).ok()?;
    let segment = parsed.path_segments()?.next_back()?;
    let (stem, ext) = segment.rsplit_once('.')?;

    if stem.is_empty() || ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(format!(".{ext}"))
}

/// Cache key for a URL: SHA-256 of the full URL string, plus its extension if any.
///
/// `http://example.com/file.txt` maps to `<64 hex chars>.txt`; URLs without a
/// path or extension map to the bare hash.
pub fn filename_from_url(input: &str) -> String {
    let hash = hash_key(input);
    match url_extension(input) {
        Some(ext) => format!("{hash}{ext}"),
        None => hash,
    }
}

/// [`Canonicalizer`] hashing URLs with [`filename_from_url`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlCanonicalizer;

impl Canonicalizer for UrlCanonicalizer {
    fn canonicalize(&self, id: &str) -> Result<String, Error> {
        Ok(filename_from_url(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let url = parse_fetch_url("https://example.com").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("example.com"));
    }

    #[test]
    fn test_parse_trim_whitespace() {
        let url = parse_fetch_url("  https://example.com  ").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn test_parse_preserve_query() {
        let url = parse_fetch_url("https://example.com?a=1&b=2").unwrap();
        assert_eq!(url.query(), Some("a=1&b=2"));
    }

    #[test]
    fn test_parse_http_allowed() {
        let url = parse_fetch_url("http://example.com").unwrap();
        assert_eq!(url.scheme(), "http");
    }

    #[test]
    fn test_parse_unsupported_scheme() {
        let result = parse_fetch_url("file:///etc/passwd");
        assert!(matches!(result, Err(UrlError::UnsupportedScheme(_))));
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(parse_fetch_url(""), Err(UrlError::Empty)));
        assert!(matches!(parse_fetch_url("   "), Err(UrlError::Empty)));
    }

    #[test]
    fn test_parse_missing_scheme() {
        assert!(matches!(parse_fetch_url("example.com/file.txt"), Err(UrlError::InvalidUrl(_))));
    }

    #[test]
    fn test_filename_basic_url() {
        let filename = filename_from_url("http://example.com/file.txt");
        assert!(filename.ends_with(".txt"));
        assert_eq!(filename.len(), 64 + ".txt".len());
    }

    #[test]
    fn test_filename_url_with_query() {
        let filename = filename_from_url("http://example.com/file.txt?param=value");
        assert_eq!(filename.len(), 64 + 4);
        assert!(filename.ends_with(".txt"));
        assert_ne!(filename, filename_from_url("http://example.com/file.txt"));
    }

    #[test]
    fn test_filename_url_without_extension() {
        let filename = filename_from_url("http://example.com/file");
        assert_eq!(filename.len(), 64);
        assert!(!filename.contains('.'));
    }

    #[test]
    fn test_filename_url_with_no_path() {
        assert_eq!(filename_from_url("http://example.com").len(), 64);
    }

    #[test]
    fn test_filename_empty_url() {
        let filename = filename_from_url("");
        assert_eq!(filename.len(), 64);
        assert!(filename.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_filename_gutenberg_page() {
        let filename = filename_from_url("https://www.gutenberg.org/cache/epub/68283/pg68283-images.html");
        assert!(filename.ends_with(".html"));
    }

    #[test]
    fn test_extension_edge_cases() {
        assert_eq!(url_extension("http://example.com/dir/.hidden"), None);
        assert_eq!(url_extension("http://example.com/file."), None);
        assert_eq!(url_extension("http://example.com/archive.tar.gz"), Some(".gz".to_string()));
        assert_eq!(url_extension("http://example.com/v1.2/"), None);
        assert_eq!(url_extension("http://example.com/page.html#section"), Some(".html".to_string()));
    }

    #[test]
    fn test_canonicalizer_deterministic() {
        let canonicalizer = UrlCanonicalizer;
        let a = canonicalizer.canonicalize("http://example.com/a.txt").unwrap();
        assert_eq!(a, canonicalizer.canonicalize("http://example.com/a.txt").unwrap());
        assert_ne!(a, canonicalizer.canonicalize("http://example.com/b.txt").unwrap());
    }
}
