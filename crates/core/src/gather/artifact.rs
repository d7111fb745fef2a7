//! Artifact documents persisted by gatherers.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::cache::write_atomic;
use crate::text::{DEFAULT_SPACER, sm};
use crate::Error;

/// A named story document: display name, full text and free-form metadata.
///
/// Serialized as `{"name": ..., "body": ..., "metadata": {...}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Artifact {
    pub fn new(name: impl Into<String>, body: impl Into<String>, metadata: Map<String, Value>) -> Self {
        Self { name: name.into(), body: body.into(), metadata }
    }

    /// Load an artifact from a JSON document on disk.
    pub fn from_json_file(path: &Path) -> Result<Self, Error> {
        let raw = fs::read_to_string(path).map_err(|e| Error::persistence(path, e))?;
        serde_json::from_str(&raw).map_err(|e| Error::Serialization(format!("{}: {e}", path.display())))
    }

    /// Pretty-printed JSON document.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the artifact as a JSON document, replacing any existing file atomically.
    pub fn to_json_file(&self, path: &Path) -> Result<(), Error> {
        write_atomic(path, self.to_json()?.as_bytes())
    }

    /// Metadata value as a display string, if present.
    pub fn metadata_str(&self, key: &str) -> Option<String> {
        self.metadata.get(key).map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Short human-readable description with a shortened body excerpt.
    pub fn excerpt(&self, limit: usize) -> Result<String, Error> {
        let body = sm(&self.body, limit, DEFAULT_SPACER)?;
        Ok(format!(
            "Story: {}\nAuthor: {}\nYear: {}\nBody Excerpt:\n---{}\n---",
            self.name,
            self.metadata_str("author").unwrap_or_else(|| "Unknown".into()),
            self.metadata_str("year").unwrap_or_else(|| "N/A".into()),
            body
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample() -> Artifact {
        let metadata = json!({"author": "Arthur Conan Doyle", "year": 1891}).as_object().unwrap().clone();
        Artifact::new("A Scandal in Bohemia", "To Sherlock Holmes she is always the woman.", metadata)
    }

    #[test]
    fn test_json_file_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("scandal.json");
        let artifact = sample();

        artifact.to_json_file(&path).unwrap();

        assert_eq!(Artifact::from_json_file(&path).unwrap(), artifact);
    }

    #[test]
    fn test_document_shape() {
        let doc: Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();
        assert_eq!(doc["name"], "A Scandal in Bohemia");
        assert_eq!(doc["metadata"]["year"], 1891);
        assert!(doc["body"].as_str().unwrap().starts_with("To Sherlock"));
    }

    #[test]
    fn test_missing_keys_default() {
        let artifact: Artifact = serde_json::from_str(r#"{"name": "Untitled"}"#).unwrap();
        assert_eq!(artifact.name, "Untitled");
        assert!(artifact.body.is_empty());
        assert!(artifact.metadata.is_empty());
    }

    #[test]
    fn test_from_json_file_invalid() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(Artifact::from_json_file(&path), Err(Error::Serialization(_))));
    }

    #[test]
    fn test_excerpt() {
        let excerpt = sample().excerpt(20).unwrap();
        assert!(excerpt.contains("Story: A Scandal in Bohemia"));
        assert!(excerpt.contains("Author: Arthur Conan Doyle"));
        assert!(excerpt.contains("Year: 1891"));
        assert!(excerpt.contains("---To Sherl..."));
    }

    #[test]
    fn test_excerpt_unknown_author() {
        let artifact = Artifact::new("Anonymous", "text", Map::new());
        let excerpt = artifact.excerpt(80).unwrap();
        assert!(excerpt.contains("Author: Unknown"));
        assert!(excerpt.contains("Year: N/A"));
    }
}
