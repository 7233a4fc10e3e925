//! Document layer: model, validation, storage and loading.

pub mod bundled;
pub mod compress;
pub mod error;
pub mod fetch;
pub mod loader;
pub mod model;
pub mod storage;
pub mod validate;

pub use error::LoadError;
pub use fetch::{Fetcher, HttpFetcher};
pub use loader::DocumentLoader;
pub use model::{CompositionDocument, CompositionNode, CompositionOptions};
pub use storage::{FileStorage, MemoryStorage, Storage};
