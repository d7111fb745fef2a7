//! Generic fetch-or-load resource cache.
//!
//! A [`ResourceCache`] maps an identifier to content persisted at
//! `root/<key>`. The key comes from a [`Canonicalizer`]; content comes from an
//! [`Acquirer`], which only runs when the entry is missing or a refresh is forced.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::store::write_atomic;
use crate::Error;

/// Maps an identifier to a stable, filesystem-safe key.
///
/// Implementations must be deterministic: the same identifier always yields
/// the same key, across runs.
pub trait Canonicalizer {
    fn canonicalize(&self, id: &str) -> Result<String, Error>;
}

/// Retrieves the content for an identifier, possibly over the network.
pub trait Acquirer {
    fn acquire(&self, id: &str) -> Result<String, Error>;
}

/// Closure adapter returned by [`canonicalize_fn`].
#[derive(Debug, Clone, Copy)]
pub struct FnCanonicalizer<F>(F);

/// Closure adapter returned by [`acquire_fn`].
#[derive(Debug, Clone, Copy)]
pub struct FnAcquirer<F>(F);

/// Use a closure as a [`Canonicalizer`].
pub fn canonicalize_fn<F>(f: F) -> FnCanonicalizer<F>
where
    F: Fn(&str) -> Result<String, Error>,
{
    FnCanonicalizer(f)
}

/// Use a closure as an [`Acquirer`].
pub fn acquire_fn<F>(f: F) -> FnAcquirer<F>
where
    F: Fn(&str) -> Result<String, Error>,
{
    FnAcquirer(f)
}

impl<F> Canonicalizer for FnCanonicalizer<F>
where
    F: Fn(&str) -> Result<String, Error>,
{
    fn canonicalize(&self, id: &str) -> Result<String, Error> {
        (self.0)(id)
    }
}

impl<F> Acquirer for FnAcquirer<F>
where
    F: Fn(&str) -> Result<String, Error>,
{
    fn acquire(&self, id: &str) -> Result<String, Error> {
        (self.0)(id)
    }
}

/// Whether [`ResourceCache::get`] trusts existing entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RefreshPolicy {
    /// Serve existing entries; acquire only on a miss.
    #[default]
    TrustLocal,
    /// Re-acquire on every read.
    AlwaysRefresh,
}

/// Check that a key can be used as a single file name under the cache root.
///
/// # Errors
///
/// Returns `Error::Canonicalization` for empty keys, `.`/`..`, or keys
/// containing path separators or NUL.
pub fn validate_key(key: &str) -> Result<(), Error> {
    if key.is_empty() {
        return Err(Error::Canonicalization("empty key".into()));
    }
    if key == "." || key == ".." {
        return Err(Error::Canonicalization(format!("reserved key: {key}")));
    }
    if key.contains(['/', '\\', '\0']) {
        return Err(Error::Canonicalization(format!("key is not filesystem-safe: {key:?}")));
    }
    Ok(())
}

/// Idempotent fetch-or-load cache over a directory.
#[derive(Debug, Clone)]
pub struct ResourceCache<C, A> {
    root: PathBuf,
    canonicalizer: C,
    acquirer: A,
    refresh_policy: RefreshPolicy,
}

impl<C: Canonicalizer, A: Acquirer> ResourceCache<C, A> {
    /// Create a cache storing entries directly under `root`.
    pub fn new(root: impl Into<PathBuf>, canonicalizer: C, acquirer: A) -> Self {
        Self { root: root.into(), canonicalizer, acquirer, refresh_policy: RefreshPolicy::default() }
    }

    /// Set the refresh policy used by [`get`](Self::get).
    pub fn with_refresh_policy(mut self, refresh_policy: RefreshPolicy) -> Self {
        self.refresh_policy = refresh_policy;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn refresh_policy(&self) -> RefreshPolicy {
        self.refresh_policy
    }

    /// Location of the entry for `key`.
    pub fn full_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    /// Map an identifier to its validated key.
    pub fn canonicalize(&self, id: &str) -> Result<String, Error> {
        let key = self.canonicalizer.canonicalize(id)?;
        validate_key(&key)?;
        Ok(key)
    }

    /// Create the root directory if needed and report whether `key` is cached.
    ///
    /// Never touches existing content.
    pub fn ensure(&self, key: &str) -> Result<(bool, PathBuf), Error> {
        fs::create_dir_all(&self.root).map_err(|e| Error::persistence(&self.root, e))?;
        let path = self.full_path(key);
        Ok((path.is_file(), path))
    }

    /// Run the acquisition strategy for `id`.
    ///
    /// Failures are wrapped as `Error::Acquisition` with the upstream cause.
    pub fn acquire(&self, id: &str) -> Result<String, Error> {
        self.acquirer.acquire(id).map_err(|e| match e {
            err @ Error::Acquisition { .. } => err,
            other => Error::acquisition(id, other),
        })
    }

    /// Persist `content` at `path` atomically.
    pub fn store(&self, content: &str, path: &Path) -> Result<(), Error> {
        write_atomic(path, content.as_bytes())
    }

    /// Make sure `id` is cached, acquiring it on a miss or when `force` is set.
    ///
    /// Returns the path of the entry.
    pub fn cache(&self, id: &str, force: bool) -> Result<PathBuf, Error> {
        let key = self.canonicalize(id)?;
        let (exists, path) = self.ensure(&key)?;

        if exists && !force {
            tracing::debug!(id, path = %path.display(), "cache hit, skipping acquisition");
            return Ok(path);
        }

        let content = self.acquire(id)?;
        self.store(&content, &path)?;
        tracing::debug!(id, path = %path.display(), bytes = content.len(), "cached resource");
        Ok(path)
    }

    /// Return the cached content for `id`, acquiring it first if needed.
    ///
    /// Under [`RefreshPolicy::AlwaysRefresh`] the content is re-acquired on every call.
    pub fn get(&self, id: &str) -> Result<String, Error> {
        let force = self.refresh_policy == RefreshPolicy::AlwaysRefresh;
        let path = self.cache(id, force)?;
        fs::read_to_string(&path).map_err(|e| Error::persistence(&path, e))
    }

    /// Remove every entry under the root, keeping the root directory itself.
    pub fn clear(&self) -> Result<(), Error> {
        if !self.root.exists() {
            tracing::debug!(root = %self.root.display(), "cache root does not exist, nothing to clear");
            return Ok(());
        }

        let entries = fs::read_dir(&self.root).map_err(|e| Error::persistence(&self.root, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| Error::persistence(&self.root, e))?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(|e| Error::persistence(&path, e))?;
            let removed = if file_type.is_dir() { fs::remove_dir_all(&path) } else { fs::remove_file(&path) };
            removed.map_err(|e| Error::persistence(&path, e))?;
        }

        tracing::debug!(root = %self.root.display(), "cleared cache");
        Ok(())
    }
}
