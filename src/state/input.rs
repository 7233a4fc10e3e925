//! Input Module - crossterm event polling.
//!
//! Bridges crossterm's event stream with the keyboard and mouse bindings.
//!
//! # Example
//!
//! ```ignore
//! loop {
//!     match poll_event(Duration::from_millis(16), &hits)? {
//!         Some(InputEvent::Action(action)) => apply(action),
//!         Some(InputEvent::Resize(w, h)) => resize(w, h),
//!         _ => {}
//!     }
//! }
//! ```

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent};

use super::keyboard::{Action, action_for_key};
use super::mouse::{HitGrid, action_for_mouse};

/// One translated terminal event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Action(Action),
    /// Terminal resized to (columns, rows).
    Resize(u16, u16),
    /// Unbound key, mouse motion, focus change and the like.
    Ignored,
}

/// Translate one crossterm event.
pub fn translate(event: CrosstermEvent, hits: &HitGrid) -> InputEvent {
    let action = match event {
        CrosstermEvent::Key(key) => action_for_key(&key),
        CrosstermEvent::Mouse(mouse) => action_for_mouse(&mouse, hits),
        CrosstermEvent::Resize(w, h) => return InputEvent::Resize(w, h),
        _ => None,
    };
    action.map_or(InputEvent::Ignored, InputEvent::Action)
}

/// Poll for an event with timeout. Returns `None` if nothing arrived.
pub fn poll_event(timeout: Duration, hits: &HitGrid) -> io::Result<Option<InputEvent>> {
    if event::poll(timeout)? {
        Ok(Some(translate(event::read()?, hits)))
    } else {
        Ok(None)
    }
}
