//! # composition-inspector
//!
//! Terminal inspector for nested composition documents.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! fine-grained reactivity and [taffy](https://docs.rs/taffy) for the header
//! layout.
//!
//! A composition is a tree of nodes, each covering a span of a shared time
//! axis. The inspector draws every node as a box positioned by its span,
//! packs overlapping children into rows, and keeps headers readable while
//! the view scrolls across long spans.
//!
//! ## Architecture
//!
//! ```text
//! source → document (load, validate, store) → engine (CompositionTree)
//!        → inspector (render tree + state) → renderer (paint, diff) → terminal
//! ```
//!
//! ## Modules
//!
//! - [`document`] - JSON model, validation, storage, bundled examples, fetch
//! - [`engine`] - Arena tree, spans, row packing, labels
//! - [`layout`] - Visibility, sliding headers, text measurement
//! - [`state`] - Scroll, node states, focus, keyboard and mouse input
//! - [`inspector`] - Viewer controller and background loading
//! - [`renderer`] - Frame buffer, painter, diff renderer
//! - [`pipeline`] - Terminal setup and the event loop

pub mod config;
pub mod document;
pub mod engine;
pub mod inspector;
pub mod layout;
pub mod logging;
pub mod pipeline;
pub mod renderer;
pub mod state;
pub mod theme;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::{Cli, InspectorConfig};
pub use document::{CompositionDocument, CompositionNode, DocumentLoader, LoadError};
pub use engine::{CompositionTree, NodeId, Span};
pub use inspector::{Flow, Inspector, LoadRequest, LoadWorker};
pub use pipeline::{App, mount};
pub use renderer::{DiffRenderer, FrameBuffer};
pub use theme::{ColorScheme, Palette};
