//! Load Session - background loading and stale-result filtering.
//!
//! Loading can touch the disk and the network, so it runs on a worker
//! thread. The UI thread only ever sees finished [`LoadOutcome`]s:
//!
//! ```text
//! UI thread                     loader thread
//! ─────────                     ─────────────
//! select(request) ── mpsc ──→   stage + load
//! accept(outcome) ←── mpsc ──   LoadOutcome { requested, result }
//! ```
//!
//! Every outcome carries the source it was requested for. The session keeps
//! only outcomes for the source that is selected right now, so a slow fetch
//! can never replace a document the user picked later.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use crate::document::storage::EXAMPLES_PREFIX;
use crate::document::{CompositionDocument, DocumentLoader, Fetcher, LoadError, Storage};

// =============================================================================
// Requests
// =============================================================================

/// Where a document should come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadRequest {
    /// Storage key or `examples/<name>`.
    Key(String),
    /// Local file, staged under a rotating key.
    File(PathBuf),
    /// Remote document, staged under `url/<url>`.
    Url(String),
}

impl LoadRequest {
    /// Interpret a command line source.
    ///
    /// `examples/` keys win over files of the same name, URLs are recognized
    /// by scheme, existing files come next, and anything else is a key.
    pub fn from_source(source: &str) -> Self {
        if source.starts_with(EXAMPLES_PREFIX) {
            Self::Key(source.to_string())
        } else if source.starts_with("http://") || source.starts_with("https://") {
            Self::Url(source.to_string())
        } else if Path::new(source).is_file() {
            Self::File(PathBuf::from(source))
        } else {
            Self::Key(source.to_string())
        }
    }

    /// Text identifying this request, shown while loading.
    pub fn label(&self) -> String {
        match self {
            Self::Key(key) => key.clone(),
            Self::File(path) => path.display().to_string(),
            Self::Url(url) => url.clone(),
        }
    }
}

/// A finished load.
#[derive(Debug)]
pub struct LoadOutcome {
    /// Label of the request this answers.
    pub requested: String,
    /// The storage key and document, or why loading failed.
    pub result: Result<(String, CompositionDocument), LoadError>,
}

/// Stage (if needed) and load one request.
pub fn run_request<S: Storage, F: Fetcher>(
    loader: &mut DocumentLoader<S, F>,
    request: &LoadRequest,
) -> Result<(String, CompositionDocument), LoadError> {
    let key = match request {
        LoadRequest::Key(key) => key.clone(),
        LoadRequest::File(path) => loader.stage_file(path)?,
        LoadRequest::Url(url) => loader.stage_url(url)?,
    };
    let doc = loader.load(&key)?;
    Ok((key, doc))
}

// =============================================================================
// Worker
// =============================================================================

/// Loader thread plus its two channels.
///
/// Dropping the worker closes the request channel, which ends the thread
/// after its current request. The thread is not joined, so a slow fetch
/// never blocks shutdown.
pub struct LoadWorker {
    requests: Sender<LoadRequest>,
    outcomes: Receiver<LoadOutcome>,
}

impl LoadWorker {
    pub fn spawn<S, F>(mut loader: DocumentLoader<S, F>) -> io::Result<Self>
    where
        S: Storage + Send + 'static,
        F: Fetcher + Send + 'static,
    {
        let (request_tx, request_rx) = mpsc::channel::<LoadRequest>();
        let (outcome_tx, outcome_rx) = mpsc::channel();

        thread::Builder::new()
            .name("document-loader".into())
            .spawn(move || {
                for request in request_rx {
                    let requested = request.label();
                    tracing::debug!(%requested, "loading");
                    let result = run_request(&mut loader, &request);
                    if let Err(err) = &result {
                        tracing::warn!(%requested, %err, "load failed");
                    }
                    if outcome_tx.send(LoadOutcome { requested, result }).is_err() {
                        break;
                    }
                }
            })?;

        Ok(Self {
            requests: request_tx,
            outcomes: outcome_rx,
        })
    }

    /// Queue a request. Returns false if the thread is gone.
    pub fn submit(&self, request: LoadRequest) -> bool {
        self.requests.send(request).is_ok()
    }

    /// Next finished load, if any. Never blocks.
    pub fn try_recv(&self) -> Option<LoadOutcome> {
        match self.outcomes.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

// =============================================================================
// Session
// =============================================================================

/// What the viewer is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing requested yet.
    Empty,
    /// Waiting for the given request.
    Loading(String),
    /// Showing the document stored under this key.
    Ready(String),
    /// The selected request failed.
    Failed { requested: String, message: String },
}

/// Tracks the selected source and filters outcomes against it.
#[derive(Debug)]
pub struct Session {
    selected: Option<String>,
    state: LoadState,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            selected: None,
            state: LoadState::Empty,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Make `request` the selected source.
    pub fn select(&mut self, request: &LoadRequest) {
        let label = request.label();
        self.state = LoadState::Loading(label.clone());
        self.selected = Some(label);
    }

    /// Take an outcome. Returns `None` when it answers an older selection.
    pub fn accept(
        &mut self,
        outcome: LoadOutcome,
    ) -> Option<Result<CompositionDocument, LoadError>> {
        if self.selected.as_deref() != Some(outcome.requested.as_str()) {
            tracing::debug!(requested = %outcome.requested, "discarding stale load");
            return None;
        }

        match outcome.result {
            Ok((key, doc)) => {
                tracing::info!(%key, "document loaded");
                self.state = LoadState::Ready(key);
                Some(Ok(doc))
            }
            Err(err) => {
                self.state = LoadState::Failed {
                    requested: outcome.requested,
                    message: err.to_string(),
                };
                Some(Err(err))
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::document::MemoryStorage;
    use crate::document::bundled;

    struct NoNetwork;

    impl Fetcher for NoNetwork {
        fn fetch(&self, url: &str) -> Result<String, LoadError> {
            Err(LoadError::fetch(url, "offline"))
        }
    }

    fn setup() -> DocumentLoader<MemoryStorage, NoNetwork> {
        DocumentLoader::new(MemoryStorage::new(), NoNetwork)
    }

    fn outcome(requested: &str, key: &str) -> LoadOutcome {
        LoadOutcome {
            requested: requested.to_string(),
            result: Ok((key.to_string(), bundled::get("examples/overlap").unwrap())),
        }
    }

    fn wait_for(worker: &LoadWorker) -> LoadOutcome {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(outcome) = worker.try_recv() {
                return outcome;
            }
            assert!(Instant::now() < deadline, "loader thread did not answer");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_from_source() {
        assert_eq!(
            LoadRequest::from_source("examples/deep"),
            LoadRequest::Key("examples/deep".into())
        );
        assert_eq!(
            LoadRequest::from_source("https://example.com/a.json"),
            LoadRequest::Url("https://example.com/a.json".into())
        );
        assert_eq!(
            LoadRequest::from_source("composition3"),
            LoadRequest::Key("composition3".into())
        );

        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap();
        assert_eq!(LoadRequest::from_source(path), LoadRequest::File(file.path().into()));
    }

    #[test]
    fn test_run_request_key() {
        let mut loader = setup();
        let request = LoadRequest::Key("examples/deep".into());
        let (key, doc) = run_request(&mut loader, &request).unwrap();
        assert_eq!(key, "examples/deep");
        assert_eq!(doc.options.ticks_per_beat, 480);

        let missing = run_request(&mut loader, &LoadRequest::Key("nothing".into()));
        assert!(matches!(missing, Err(LoadError::NotFound(_))));
    }

    #[test]
    fn test_session_discards_stale_outcomes() {
        let mut session = Session::new();
        session.select(&LoadRequest::Key("examples/overlap".into()));
        session.select(&LoadRequest::Key("examples/deep".into()));

        assert!(session.accept(outcome("examples/overlap", "examples/overlap")).is_none());
        assert_eq!(session.state(), &LoadState::Loading("examples/deep".into()));

        let accepted = session.accept(outcome("examples/deep", "examples/deep"));
        assert!(matches!(accepted, Some(Ok(_))));
        assert_eq!(session.state(), &LoadState::Ready("examples/deep".into()));
    }

    #[test]
    fn test_session_records_failure() {
        let mut session = Session::new();
        session.select(&LoadRequest::Key("gone".into()));
        let failed = LoadOutcome {
            requested: "gone".into(),
            result: Err(LoadError::NotFound("gone".into())),
        };

        assert!(matches!(session.accept(failed), Some(Err(LoadError::NotFound(_)))));
        assert!(matches!(
            session.state(),
            LoadState::Failed { requested, .. } if requested == "gone"
        ));
    }

    #[test]
    fn test_worker_loads_in_background() {
        let worker = LoadWorker::spawn(setup()).unwrap();
        assert!(worker.submit(LoadRequest::Key("examples/overlap".into())));

        let outcome = wait_for(&worker);
        assert_eq!(outcome.requested, "examples/overlap");
        let (key, doc) = outcome.result.unwrap();
        assert_eq!(key, "examples/overlap");
        assert_eq!(doc.tree.children.len(), 4);
    }

    #[test]
    fn test_worker_reports_fetch_errors() {
        let worker = LoadWorker::spawn(setup()).unwrap();
        worker.submit(LoadRequest::Url("https://example.com/x.json".into()));

        let outcome = wait_for(&worker);
        assert!(matches!(outcome.result, Err(LoadError::Fetch(_))));
    }
}
