//! Atomic file writes for cache entries and artifact documents.
//!
//! Content is written to a temporary file in the destination directory and
//! renamed into place, so a reader sees either the complete previous file or
//! the complete new one.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::Error;

/// Write `contents` to `path`, replacing any existing file atomically.
///
/// Parent directories are created as needed.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), Error> {
    let tmp = stage(path, contents)?;
    tmp.persist(path).map_err(|e| Error::persistence(path, e.error))?;
    Ok(())
}

/// Write `contents` to `path` only if no file exists there yet.
///
/// Returns `true` if this call created the file, `false` if it was already present.
pub fn write_new(path: &Path, contents: &[u8]) -> Result<bool, Error> {
    if path.exists() {
        return Ok(false);
    }

    let tmp = stage(path, contents)?;
    match tmp.persist_noclobber(path) {
        Ok(_) => Ok(true),
        Err(e) if e.error.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(Error::persistence(path, e.error)),
    }
}

fn stage(path: &Path, contents: &[u8]) -> Result<NamedTempFile, Error> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| Error::persistence(parent, e))?;

    let mut tmp = NamedTempFile::new_in(parent).map_err(|e| Error::persistence(parent, e))?;
    tmp.write_all(contents).map_err(|e| Error::persistence(tmp.path(), e))?;
    tmp.as_file().sync_all().map_err(|e| Error::persistence(tmp.path(), e))?;
    Ok(tmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_atomic_creates_parents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a/b/entry.txt");

        write_atomic(&path, b"contents").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "contents");
    }

    #[test]
    fn test_write_atomic_replaces() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("entry.txt");

        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_write_atomic_leaves_no_temp_files() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("entry.txt");

        write_atomic(&path, b"contents").unwrap();

        let names: Vec<_> = fs::read_dir(temp.path()).unwrap().map(|e| e.unwrap().file_name()).collect();
        assert_eq!(names, vec![std::ffi::OsString::from("entry.txt")]);
    }

    #[test]
    fn test_write_new_never_overwrites() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("LICENSE");

        assert!(write_new(&path, b"original").unwrap());
        assert!(!write_new(&path, b"replacement").unwrap());

        assert_eq!(fs::read_to_string(&path).unwrap(), "original");
    }
}
