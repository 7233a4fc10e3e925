//! Mount API - application lifecycle and render effect.
//!
//! Ties the [`Inspector`] to the terminal:
//!
//! ```text
//! poll_event ──→ step ──→ Inspector::apply / accept / tick
//!                               │ writes scroll + size signals
//!                               ▼
//!                       render effect (marks the frame dirty)
//!                               │
//! render ──→ Inspector::frame ──→ DiffRenderer ──→ stdout
//! ```
//!
//! # Example
//!
//! ```ignore
//! let worker = LoadWorker::spawn(loader)?;
//! let mut app = mount(config, worker, TerminalSize::detect());
//! app.run()?;
//! ```

use std::cell::Cell;
use std::io::{self, BufWriter, Write};
use std::rc::Rc;
use std::time::{Duration, Instant};

use spark_signals::effect;

use super::terminal::{TerminalSetup, TerminalSize};
use crate::config::InspectorConfig;
use crate::inspector::{Flow, Inspector, LoadRequest, LoadWorker};
use crate::renderer::DiffRenderer;
use crate::state::{InputEvent, poll_event};

/// Poll timeout per loop iteration (~60fps).
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

// =============================================================================
// App
// =============================================================================

/// A mounted inspector. Dropping it stops the render effect.
pub struct App {
    inspector: Inspector,
    worker: LoadWorker,
    size: TerminalSize,
    renderer: DiffRenderer,
    dirty: Rc<Cell<bool>>,
    running: bool,
    stop_effect: Option<Box<dyn FnOnce()>>,
}

/// Mount the inspector.
///
/// Sets up the render effect over the viewport and terminal size signals.
/// No terminal I/O happens until [`App::run`] or [`App::render`].
pub fn mount(config: InspectorConfig, worker: LoadWorker, size: TerminalSize) -> App {
    let (cols, rows) = size.get();
    let inspector = Inspector::new(config, cols, rows);
    let dirty = Rc::new(Cell::new(true));

    let viewport = inspector.viewport();
    let watched = size.clone();
    let flag = dirty.clone();
    let stop = effect(move || {
        // Reads create the dependencies.
        let _ = (viewport.scroll_x(), viewport.scroll_y());
        let _ = (viewport.width(), viewport.height());
        let _ = watched.get();
        flag.set(true);
    });

    App {
        inspector,
        worker,
        size,
        renderer: DiffRenderer::new(),
        dirty,
        running: true,
        stop_effect: Some(Box::new(stop)),
    }
}

impl App {
    pub fn inspector(&self) -> &Inspector {
        &self.inspector
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop the event loop after the current iteration.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Select a new source and hand it to the loader thread.
    pub fn request(&mut self, request: LoadRequest) {
        let request = self.inspector.select(request);
        tracing::debug!(source = %request.label(), "requesting document");
        if !self.worker.submit(request) {
            tracing::error!("loader thread is gone");
        }
        self.dirty.set(true);
    }

    /// Process finished loads, one input event and one animation frame.
    ///
    /// Returns `false` once the app should stop.
    pub fn step(&mut self, event: Option<InputEvent>) -> bool {
        while let Some(outcome) = self.worker.try_recv() {
            if self.inspector.accept(outcome) {
                self.renderer.invalidate();
                self.dirty.set(true);
            }
        }

        match event {
            Some(InputEvent::Action(action)) => {
                match self.inspector.apply(action) {
                    Flow::Quit => self.running = false,
                    Flow::Load(request) => self.request(request),
                    Flow::Continue => {}
                }
                self.dirty.set(true);
            }
            Some(InputEvent::Resize(cols, rows)) => self.resize(cols, rows),
            Some(InputEvent::Ignored) | None => {}
        }

        if self.inspector.tick() {
            self.dirty.set(true);
        }
        self.running
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        if self.size.set(cols, rows) {
            tracing::debug!(cols, rows, "terminal resized");
        }
        self.inspector.resize(cols, rows);
        self.renderer.invalidate();
        self.dirty.set(true);
    }

    /// Paint and output a frame if anything changed since the last one.
    ///
    /// Returns true if a frame was rendered.
    pub fn render<W: Write>(&mut self, out: &mut W) -> io::Result<bool> {
        if !self.dirty.replace(false) {
            return Ok(false);
        }
        let started = Instant::now();
        let buffer = self.inspector.frame();
        let changed = self.renderer.render(out, &buffer)?;
        let elapsed_us = started.elapsed().as_micros() as u64;
        tracing::trace!(changed, elapsed_us, "frame rendered");
        Ok(true)
    }

    /// Run the event loop on the real terminal until quit.
    pub fn run(&mut self) -> io::Result<()> {
        let mut terminal = TerminalSetup::new();
        terminal.enter_fullscreen(&mut io::stdout())?;

        let detected = TerminalSize::detect().get();
        self.resize(detected.0, detected.1);

        let mut out = BufWriter::with_capacity(1 << 16, io::stdout());
        while self.running {
            self.render(&mut out)?;
            let event = poll_event(FRAME_INTERVAL, self.inspector.hits())?;
            self.step(event);
        }

        terminal.exit_fullscreen(&mut io::stdout())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Some(stop) = self.stop_effect.take() {
            stop();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
