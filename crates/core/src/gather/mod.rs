//! Namespace-scoped artifact gathering.
//!
//! A [`DataGatherer`] owns one namespace directory under a storage root. Each
//! named artifact is produced by a caller-supplied callback, which runs only
//! when the artifact is missing or a refresh is forced, and is persisted as a
//! single JSON document next to the namespace `LICENSE` file.

pub mod artifact;
pub mod corpora;

pub use artifact::Artifact;
pub use corpora::Corpora;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cache::{validate_key, write_atomic, write_new};
use crate::Error;

/// Attribution file written once per namespace.
pub const LICENSE_FILE: &str = "LICENSE";

/// Attribution used when a gatherer is built without one.
pub const DEFAULT_LICENSE: &str = "No license provided.";

/// Default artifact file suffix.
pub const DEFAULT_SUFFIX: &str = ".json";

/// Outcome of [`DataGatherer::download`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Download {
    /// The callback ran and the artifact was written.
    Saved(PathBuf),
    /// The artifact already existed; the callback was not invoked.
    Skipped(PathBuf),
}

impl Download {
    pub fn path(&self) -> &Path {
        match self {
            Download::Saved(p) | Download::Skipped(p) => p,
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, Download::Saved(_))
    }
}

/// Downloads named artifacts into a namespace directory if they are not already there.
#[derive(Debug, Clone)]
pub struct DataGatherer {
    name: String,
    description: Option<String>,
    root: PathBuf,
    suffix: String,
    license: Option<String>,
    downloads: BTreeMap<String, PathBuf>,
}

impl DataGatherer {
    /// Create a gatherer for namespace `name` under `root`.
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            description: None,
            root: root.into(),
            suffix: DEFAULT_SUFFIX.to_string(),
            license: None,
            downloads: BTreeMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = Some(license.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The namespace directory, `root/name`.
    pub fn path(&self) -> PathBuf {
        self.root.join(&self.name)
    }

    /// Where `artifact_name` is stored, whether or not it exists yet.
    pub fn artifact_path(&self, artifact_name: &str) -> PathBuf {
        self.path().join(format!("{artifact_name}{}", self.suffix))
    }

    /// Artifacts written during this run, by artifact name.
    pub fn downloads(&self) -> &BTreeMap<String, PathBuf> {
        &self.downloads
    }

    /// Create the namespace directory and its `LICENSE` file if needed, and
    /// report whether `artifact_name` already exists.
    pub fn ensure(&self, artifact_name: &str) -> Result<(bool, PathBuf), Error> {
        validate_key(artifact_name)?;

        let dir = self.path();
        fs::create_dir_all(&dir).map_err(|e| Error::persistence(&dir, e))?;

        let license = self.license.as_deref().unwrap_or(DEFAULT_LICENSE);
        if write_new(&dir.join(LICENSE_FILE), license.as_bytes())? {
            tracing::debug!(namespace = %self.name, "wrote namespace license");
        }

        let path = self.artifact_path(artifact_name);
        Ok((path.is_file(), path))
    }

    /// Produce and save `artifact_name` with `callback` unless it already exists.
    ///
    /// The callback is never invoked for an existing artifact unless `force` is set.
    /// Callback failures propagate and leave no file behind.
    pub fn download<F>(&mut self, artifact_name: &str, callback: F, force: bool) -> Result<Download, Error>
    where
        F: FnOnce() -> Result<Artifact, Error>,
    {
        let (exists, path) = self.ensure(artifact_name)?;

        if exists && !force {
            tracing::debug!(namespace = %self.name, artifact = artifact_name, "artifact exists, skipping download");
            return Ok(Download::Skipped(path));
        }

        let artifact = callback()?;
        write_atomic(&path, artifact.to_json()?.as_bytes())?;

        tracing::info!(namespace = %self.name, artifact = artifact_name, path = %path.display(), "artifact saved");
        self.downloads.insert(artifact_name.to_string(), path.clone());
        Ok(Download::Saved(path))
    }

    /// Delete the whole namespace directory, including subdirectories.
    pub fn clear(&self) -> Result<(), Error> {
        let dir = self.path();
        if !dir.exists() {
            tracing::debug!(path = %dir.display(), "namespace does not exist, nothing to clear");
            return Ok(());
        }

        fs::remove_dir_all(&dir).map_err(|e| Error::persistence(&dir, e))?;
        tracing::debug!(path = %dir.display(), "cleared namespace");
        Ok(())
    }
}
