//! Key/value document store.
//!
//! Keys are plain strings. Two namespaces are special:
//! - `examples/<name>`: bundled documents, never written to the store
//! - `url/<url>`: remote documents, fetched on first load then cached
//!
//! Every other key names a document staged from a local file.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Namespace of documents fetched from a URL.
pub const URL_PREFIX: &str = "url/";

/// Namespace of bundled example documents.
pub const EXAMPLES_PREFIX: &str = "examples/";

/// Persistent string store.
pub trait Storage {
    fn get(&self, key: &str) -> io::Result<Option<String>>;
    fn set(&mut self, key: &str, value: String) -> io::Result<()>;
    /// All stored keys, sorted.
    fn keys(&self) -> io::Result<Vec<String>>;
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// Store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> io::Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn keys(&self) -> io::Result<Vec<String>> {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

// =============================================================================
// FileStorage
// =============================================================================

/// Store backed by one JSON object on disk.
///
/// The whole map is rewritten on every `set`, through a sibling temp file
/// renamed over the original, so a crash never leaves a half-written store.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text)
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err),
        };

        tracing::debug!(path = %path.display(), entries = entries.len(), "opened store");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> io::Result<()> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let text = serde_json::to_string(&self.entries).map_err(io::Error::other)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> io::Result<()> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }

    fn keys(&self) -> io::Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage() {
        let mut store = MemoryStorage::new();
        assert_eq!(store.get("a").unwrap(), None);

        store.set("b", "2".into()).unwrap();
        store.set("a", "1".into()).unwrap();
        store.set("a", "3".into()).unwrap();

        assert_eq!(store.get("a").unwrap().as_deref(), Some("3"));
        assert_eq!(store.keys().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_file_storage_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        {
            let mut store = FileStorage::open(&path).unwrap();
            assert!(store.keys().unwrap().is_empty());
            store.set("composition0", "token".into()).unwrap();
            store.set("url/https://x.test/a.json", "other".into()).unwrap();
        }

        let store = FileStorage::open(&path).unwrap();
        assert_eq!(store.get("composition0").unwrap().as_deref(), Some("token"));
        assert_eq!(store.keys().unwrap().len(), 2);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_file_storage_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "[1, 2").unwrap();

        let err = FileStorage::open(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_file_storage_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "").unwrap();

        assert!(FileStorage::open(&path).unwrap().keys().unwrap().is_empty());
    }
}
