//! Composition engine: the flattened tree and the row layout over it.
//!
//! - Span: half-open intervals on the shared composition axis
//! - Arena: the loaded document flattened into `NodeId`-indexed nodes
//! - Rows: first-fit packing of children into non-overlapping rows
//! - Label: header text derived from a node's element
//!
//! # Architecture
//!
//! Nodes are NOT borrowed from the document. They are indices into one
//! pre-order vector, so per-node UI state can be kept in side tables keyed
//! by `NodeId`:
//!
//! ```text
//! NodeId(0): Composition  span=0..1000  children=[1, 2]
//! NodeId(1): Part         span=0..100
//! NodeId(2): Part         span=200..900
//! ```

mod arena;
mod label;
mod rows;
mod span;

pub use arena::*;
pub use label::*;
pub use rows::*;
pub use span::*;
