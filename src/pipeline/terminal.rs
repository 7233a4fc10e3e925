//! Terminal setup and teardown.
//!
//! Handles entering/exiting raw mode, the alternate screen and mouse
//! capture, plus the terminal size signals the viewport follows.
//!
//! All terminal protocol writes go through crossterm commands.

use std::io::{self, Write};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::style::ResetColor;
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use spark_signals::{Signal, signal};

/// Used when the terminal cannot report its size.
pub const FALLBACK_SIZE: (u16, u16) = (80, 24);

// =============================================================================
// Size
// =============================================================================

/// Terminal size as signals, so anything reading it re-runs on resize.
#[derive(Clone)]
pub struct TerminalSize {
    width: Signal<u16>,
    height: Signal<u16>,
}

impl TerminalSize {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width: signal(width),
            height: signal(height),
        }
    }

    /// Current size of the attached terminal.
    pub fn detect() -> Self {
        let (width, height) = terminal::size().unwrap_or(FALLBACK_SIZE);
        Self::new(width, height)
    }

    pub fn width(&self) -> u16 {
        self.width.get()
    }

    pub fn height(&self) -> u16 {
        self.height.get()
    }

    pub fn get(&self) -> (u16, u16) {
        (self.width.get(), self.height.get())
    }

    /// Update both dimensions. Returns true if anything changed.
    pub fn set(&self, width: u16, height: u16) -> bool {
        let changed = self.get() != (width, height);
        if self.width.get() != width {
            self.width.set(width);
        }
        if self.height.get() != height {
            self.height.set(height);
        }
        changed
    }
}

// =============================================================================
// Setup
// =============================================================================

/// Terminal setup/teardown handle.
///
/// Restores the terminal on drop, so a panic or early return never leaves
/// the shell in raw mode.
#[derive(Debug, Default)]
pub struct TerminalSetup {
    is_fullscreen: bool,
    is_raw: bool,
    mouse_enabled: bool,
}

impl TerminalSetup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter fullscreen mode: raw mode, alternate screen, mouse capture.
    pub fn enter_fullscreen<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        self.is_raw = true;

        execute!(out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        self.is_fullscreen = true;

        execute!(out, EnableMouseCapture)?;
        self.mouse_enabled = true;
        Ok(())
    }

    /// Exit fullscreen mode and restore terminal.
    pub fn exit_fullscreen<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        if self.mouse_enabled {
            execute!(out, DisableMouseCapture)?;
            self.mouse_enabled = false;
        }
        if self.is_fullscreen {
            execute!(out, ResetColor, Show, LeaveAlternateScreen)?;
            self.is_fullscreen = false;
        }
        if self.is_raw {
            terminal::disable_raw_mode()?;
            self.is_raw = false;
        }
        Ok(())
    }

    pub fn is_fullscreen(&self) -> bool {
        self.is_fullscreen
    }
}

impl Drop for TerminalSetup {
    fn drop(&mut self) {
        if let Err(err) = self.exit_fullscreen(&mut io::stdout()) {
            tracing::warn!(%err, "failed to restore terminal");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_signals() {
        let size = TerminalSize::new(80, 24);
        assert_eq!(size.get(), (80, 24));
        assert!(!size.set(80, 24));
        assert!(size.set(120, 24));
        assert_eq!(size.width(), 120);
        assert_eq!(size.height(), 24);
    }

    #[test]
    fn test_setup_starts_inactive() {
        let mut setup = TerminalSetup::new();
        assert!(!setup.is_fullscreen());
        // Nothing was entered, so exiting writes nothing.
        let mut out = Vec::new();
        setup.exit_fullscreen(&mut out).unwrap();
        assert!(out.is_empty());
    }
}
