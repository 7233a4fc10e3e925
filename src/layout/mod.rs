//! Layout Module
//!
//! Pure geometry for the inspector:
//!
//! 1. Visibility: is a node within reach of the viewport
//! 2. Sliding: where a node's header content sits within the node
//! 3. Taffy bridge: resolves the header row as a flex row
//! 4. Text measurement in terminal cells
//!
//! # Reactivity
//!
//! These functions are plain and total. Reading scroll signals happens in
//! the callers, so calling them from a derived creates no extra
//! dependencies.
//!
//! # Example
//!
//! ```ignore
//! use composition_inspector::layout::is_visible;
//! use spark_signals::derived;
//!
//! let visible = derived(move || is_visible(scroll.get(), span, width.get()));
//! ```

mod sliding;
mod taffy_bridge;
mod text_measure;
mod visibility;

pub use sliding::*;
pub use taffy_bridge::*;
pub use text_measure::*;
pub use visibility::*;
