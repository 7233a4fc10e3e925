//! State Module - runtime state of the inspector
//!
//! - **Viewport** - shared scroll/size signals, one writer, many readers
//! - **Animate** - eased skip scrolls
//! - **Node state** - per-node expanded flag and visibility derived
//! - **Focus** - keyboard focus over drawn headers
//! - **Keyboard** / **Mouse** - bindings from terminal events to actions
//! - **Input** - crossterm polling

pub mod animate;
pub mod focus;
pub mod input;
pub mod keyboard;
pub mod mouse;
pub mod node_state;
pub mod viewport;

pub use animate::ScrollAnimation;
pub use focus::FocusRing;
pub use input::{InputEvent, poll_event};
pub use keyboard::{Action, NodeAction, Target};
pub use mouse::{Hit, HitGrid, HitPart};
pub use node_state::NodeStates;
pub use viewport::{ScrollController, ViewportHandle};
