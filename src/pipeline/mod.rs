//! Reactive Pipeline
//!
//! Connects the [`Inspector`](crate::inspector::Inspector) to the terminal.
//!
//! ```text
//! input → Inspector (scroll/size signals) → render effect → frame → diff → stdout
//! ```
//!
//! - **terminal** - raw mode, alternate screen, size signals
//! - **mount** - the event loop and the render effect that marks frames dirty

pub mod mount;
pub mod terminal;

pub use mount::{App, FRAME_INTERVAL, mount};
pub use terminal::{FALLBACK_SIZE, TerminalSetup, TerminalSize};
