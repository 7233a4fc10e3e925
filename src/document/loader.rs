//! Document loader.
//!
//! Stages documents into a [`Storage`] as compressed tokens and loads them
//! back by key:
//!
//! | key             | load behaviour                                    |
//! |-----------------|---------------------------------------------------|
//! | `examples/<n>`  | bundled document, straight from memory            |
//! | `url/<url>`     | stored copy if present, else fetched then stored  |
//! | anything else   | stored copy, else `NotFound`                      |

use std::fs;
use std::path::Path;

use serde_json::Value;

use super::bundled;
use super::compress::{compress, decompress};
use super::error::LoadError;
use super::fetch::{Fetcher, normalize_url};
use super::model::CompositionDocument;
use super::storage::{EXAMPLES_PREFIX, Storage, URL_PREFIX};
use super::validate::{document_from_value, parse_value, validate_document};

/// Number of rotating slots for documents opened from local files.
pub const LOCAL_SLOTS: usize = 10;

/// Key prefix of the rotating local slots (`composition0` .. `composition9`).
pub const LOCAL_SLOT_PREFIX: &str = "composition";

pub struct DocumentLoader<S, F> {
    storage: S,
    fetcher: F,
    next_slot: usize,
}

impl<S: Storage, F: Fetcher> DocumentLoader<S, F> {
    pub fn new(storage: S, fetcher: F) -> Self {
        Self {
            storage,
            fetcher,
            next_slot: 0,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Load the document stored under `key`.
    pub fn load(&mut self, key: &str) -> Result<CompositionDocument, LoadError> {
        if key.starts_with(EXAMPLES_PREFIX) {
            return bundled::get(key).ok_or_else(|| LoadError::NotFound(key.to_string()));
        }

        if let Some(token) = self.storage.get(key)? {
            tracing::debug!(key, "loading stored composition");
            return decode_token(&token);
        }

        match key.strip_prefix(URL_PREFIX) {
            Some(url) => {
                let staged = self.stage_url(url)?;
                let token = self
                    .storage
                    .get(&staged)?
                    .ok_or_else(|| LoadError::NotFound(staged.clone()))?;
                decode_token(&token)
            }
            None => Err(LoadError::NotFound(key.to_string())),
        }
    }

    /// Validate `text` and store it under `key`.
    pub fn stage_local(&mut self, text: &str, key: &str) -> Result<(), LoadError> {
        let value = parse_value(text)?;
        validate_document(&value)?;
        self.store(key, &value)
    }

    /// Fetch, validate and store the document at `url`.
    ///
    /// Returns the storage key, `url/<url>`, where `<url>` is the accepted
    /// form of the URL (possibly percent-decoded).
    pub fn stage_url(&mut self, url: &str) -> Result<String, LoadError> {
        let url = normalize_url(url)?;
        let text = self.fetcher.fetch(&url)?;

        let value = parse_value(&text)?;
        validate_document(&value)?;

        let key = format!("{URL_PREFIX}{url}");
        self.store(&key, &value)?;
        Ok(key)
    }

    /// Read a local file and stage it into the next rotating slot.
    ///
    /// Slots are reused round-robin, so only the last [`LOCAL_SLOTS`] opened
    /// files stay loadable.
    pub fn stage_file(&mut self, path: &Path) -> Result<String, LoadError> {
        let text = fs::read_to_string(path)?;
        let key = format!("{LOCAL_SLOT_PREFIX}{}", self.next_slot);
        self.stage_local(&text, &key)?;

        tracing::info!(path = %path.display(), key, "staged local file");
        self.next_slot = (self.next_slot + 1) % LOCAL_SLOTS;
        Ok(key)
    }

    fn store(&mut self, key: &str, value: &Value) -> Result<(), LoadError> {
        let token = compress(&value.to_string())?;
        self.storage.set(key, token)?;
        Ok(())
    }
}

fn decode_token(token: &str) -> Result<CompositionDocument, LoadError> {
    let text = decompress(token)?;
    let value = parse_value(&text)?;
    validate_document(&value)?;
    document_from_value(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::storage::MemoryStorage;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    const DOC: &str = r#"{
        "options": { "ticks_per_beat": 480 },
        "tree": {
            "element": { "Part": null },
            "start": 0, "end": 1000, "seed": 3, "rendered": true,
            "children": [
                { "element": { "Note": 60 }, "start": 0, "end": 100, "seed": 4, "rendered": true }
            ]
        }
    }"#;

    #[derive(Default)]
    struct FakeFetcher {
        pages: HashMap<String, String>,
        calls: Cell<usize>,
        requested: RefCell<Vec<String>>,
    }

    impl FakeFetcher {
        fn with(url: &str, body: &str) -> Self {
            let mut fetcher = Self::default();
            fetcher.pages.insert(url.to_string(), body.to_string());
            fetcher
        }
    }

    impl Fetcher for &FakeFetcher {
        fn fetch(&self, url: &str) -> Result<String, LoadError> {
            self.calls.set(self.calls.get() + 1);
            self.requested.borrow_mut().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| LoadError::fetch(url, "404 Not Found"))
        }
    }

    fn setup(fetcher: &FakeFetcher) -> DocumentLoader<MemoryStorage, &FakeFetcher> {
        DocumentLoader::new(MemoryStorage::new(), fetcher)
    }

    #[test]
    fn test_stage_local_then_load() {
        let fetcher = FakeFetcher::default();
        let mut loader = setup(&fetcher);

        loader.stage_local(DOC, "mine").unwrap();
        let doc = loader.load("mine").unwrap();

        assert_eq!(doc.options.ticks_per_beat, 480);
        assert_eq!(doc.tree.children.len(), 1);
        assert_eq!(doc.tree.children[0].end, 100);
    }

    #[test]
    fn test_stage_local_rejects_invalid() {
        let fetcher = FakeFetcher::default();
        let mut loader = setup(&fetcher);

        let err = loader.stage_local(r#"{"tree": {}}"#, "bad").unwrap_err();
        assert!(matches!(err, LoadError::Validation(_)));
        assert!(loader.storage().get("bad").unwrap().is_none());
    }

    #[test]
    fn test_load_unknown_key() {
        let fetcher = FakeFetcher::default();
        let mut loader = setup(&fetcher);

        let err = loader.load("composition7").unwrap_err();
        assert_eq!(err.to_string(), "Composition not found: composition7");
    }

    #[test]
    fn test_load_example() {
        let fetcher = FakeFetcher::default();
        let mut loader = setup(&fetcher);

        let doc = loader.load("examples/overlap").unwrap();
        assert_eq!(doc.tree.children.len(), 4);

        let err = loader.load("examples/missing").unwrap_err();
        assert_eq!(err.to_string(), "No such example: examples/missing");
        assert!(loader.storage().keys().unwrap().is_empty());
    }

    #[test]
    fn test_url_fetched_once_then_cached() {
        let url = "https://example.com/song.json";
        let fetcher = FakeFetcher::with(url, DOC);
        let mut loader = setup(&fetcher);

        let key = format!("url/{url}");
        let first = loader.load(&key).unwrap();
        let second = loader.load(&key).unwrap();

        assert_eq!(first, second);
        assert_eq!(fetcher.calls.get(), 1);
        assert_eq!(loader.storage().keys().unwrap(), vec![key]);
    }

    #[test]
    fn test_stage_url_decodes_key() {
        let url = "https://example.com/a b.json";
        let fetcher = FakeFetcher::with(url, DOC);
        let mut loader = setup(&fetcher);

        let key = loader
            .stage_url("https%3A%2F%2Fexample.com%2Fa%20b.json")
            .unwrap();

        assert_eq!(key, "url/https://example.com/a b.json");
        assert_eq!(fetcher.requested.borrow().as_slice(), [url]);
    }

    #[test]
    fn test_stage_url_fetch_failure() {
        let fetcher = FakeFetcher::default();
        let mut loader = setup(&fetcher);

        let err = loader.stage_url("https://example.com/gone.json").unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("404 Not Found: "));
        assert!(message.contains("Access-Control-Allow-Origin"));
    }

    #[test]
    fn test_stage_url_invalid_body() {
        let url = "https://example.com/bad.json";
        let fetcher = FakeFetcher::with(url, r#"{"options": {"ticks_per_beat": 1}}"#);
        let mut loader = setup(&fetcher);

        let err = loader.stage_url(url).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid composition JSON format: tree: missing field"
        );
    }

    #[test]
    fn test_stage_file_rotates_slots() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.json");
        fs::write(&path, DOC).unwrap();

        let fetcher = FakeFetcher::default();
        let mut loader = setup(&fetcher);

        let keys: Vec<String> = (0..LOCAL_SLOTS + 2)
            .map(|_| loader.stage_file(&path).unwrap())
            .collect();

        assert_eq!(keys[0], "composition0");
        assert_eq!(keys[9], "composition9");
        assert_eq!(keys[10], "composition0");
        assert_eq!(keys[11], "composition1");
        assert_eq!(loader.storage().keys().unwrap().len(), LOCAL_SLOTS);
    }

    #[test]
    fn test_stage_missing_file() {
        let fetcher = FakeFetcher::default();
        let mut loader = setup(&fetcher);

        let err = loader.stage_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, LoadError::Storage(_)));
    }

    #[test]
    fn test_corrupt_stored_token() {
        let fetcher = FakeFetcher::default();
        let mut storage = MemoryStorage::new();
        storage.set("broken", "not base64!".into()).unwrap();
        let mut loader = DocumentLoader::new(storage, &fetcher);

        assert!(matches!(loader.load("broken"), Err(LoadError::Decode(_))));
    }
}
