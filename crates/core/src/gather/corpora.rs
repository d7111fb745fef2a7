//! Loading gathered artifacts back from disk.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::artifact::Artifact;
use crate::Error;

/// Artifacts grouped by namespace, as laid out by [`DataGatherer`](super::DataGatherer).
///
/// Every subdirectory of the corpora root is a corpus; every `*.json` file in
/// it is one artifact.
#[derive(Debug, Clone, Default)]
pub struct Corpora {
    root: PathBuf,
    corpora: BTreeMap<String, Vec<Artifact>>,
}

impl Corpora {
    /// Load all corpora under `root`. A missing root yields an empty set.
    pub fn load(root: impl Into<PathBuf>) -> Result<Self, Error> {
        let root = root.into();
        let mut corpora = BTreeMap::new();

        if !root.is_dir() {
            tracing::debug!(root = %root.display(), "corpora root does not exist");
            return Ok(Self { root, corpora });
        }

        for entry in fs::read_dir(&root).map_err(|e| Error::persistence(&root, e))? {
            let entry = entry.map_err(|e| Error::persistence(&root, e))?;
            let dir = entry.path();
            if !dir.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            corpora.insert(name, load_corpus(&dir)?);
        }

        Ok(Self { root, corpora })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Corpus names mapped to their artifacts.
    pub fn corpora(&self) -> &BTreeMap<String, Vec<Artifact>> {
        &self.corpora
    }

    /// Every artifact from every corpus.
    pub fn stories(&self) -> impl Iterator<Item = &Artifact> {
        self.corpora.values().flatten()
    }
}

fn load_corpus(dir: &Path) -> Result<Vec<Artifact>, Error> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| Error::persistence(dir, e))? {
        let path = entry.map_err(|e| Error::persistence(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    paths.iter().map(|p| Artifact::from_json_file(p)).collect()
}
