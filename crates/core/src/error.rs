//! Unified error types for lcats.
//!
//! Cache-layer errors are never recovered locally: they propagate to the
//! caller, which decides whether to retry.

use std::path::{Path, PathBuf};

/// Boxed upstream cause carried by [`Error::Acquisition`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Unified error types for lcats caches and gatherers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., a display limit too small for its spacer).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Identifier could not be mapped to a filesystem-safe key.
    #[error("CANONICALIZATION_FAILED: {0}")]
    Canonicalization(String),

    /// The acquisition strategy failed for an identifier.
    #[error("ACQUISITION_FAILED: {id}: {source}")]
    Acquisition {
        id: String,
        #[source]
        source: BoxError,
    },

    /// Local write, read or delete failed.
    #[error("PERSISTENCE_FAILED: {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Artifact document could not be encoded or decoded.
    #[error("SERIALIZATION_FAILED: {0}")]
    Serialization(String),
}

impl Error {
    /// Wrap an upstream acquisition failure for `id`.
    pub fn acquisition(id: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Error::Acquisition { id: id.into(), source: source.into() }
    }

    /// Wrap an I/O failure at `path`.
    pub fn persistence(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Error::Persistence { path: path.as_ref().to_path_buf(), source }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
