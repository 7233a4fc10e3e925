//! Inspector - the viewer's state and the actions that change it.
//!
//! Owns one loaded [`CompositionTree`] plus everything the user can change
//! while looking at it:
//!
//! ```text
//! Action ──apply──→ ScrollController / NodeStates / FocusRing
//!                          │ (signals)
//! frame() ──→ RenderTreeBuilder ──→ Painter ──→ FrameBuffer + HitGrid
//! ```
//!
//! Loading is not done here: [`Inspector::apply`] returns
//! [`Flow::Load`] and the event loop hands the request to a
//! [`LoadWorker`]; finished loads come back through
//! [`Inspector::accept`].

pub mod render_tree;
pub mod session;

pub use render_tree::{Header, RenderNode, RenderTreeBuilder, RowItem, SkipControl};
pub use session::{LoadOutcome, LoadRequest, LoadState, LoadWorker, Session, run_request};

use crate::config::InspectorConfig;
use crate::document::{CompositionDocument, bundled};
use crate::engine::{CompositionTree, NodeId};
use crate::layout::{string_width, truncate_text};
use crate::renderer::{FrameBuffer, HEADER_ROWS, PaintOutput, PaintView, Painter};
use crate::state::{
    Action, FocusRing, HitGrid, NodeAction, NodeStates, ScrollController, Target, ViewportHandle,
};
use crate::theme::Palette;
use crate::types::{Attr, ClipRect};

/// Key hints shown at the right of the status line.
const HINTS: &str = "q quit  ←→ scroll  ↑↓ focus  ⏎ expand  [ ] skip  l log  tab example";

/// What the event loop should do after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
    /// Load another document.
    Load(LoadRequest),
}

pub struct Inspector {
    config: InspectorConfig,
    palette: Palette,
    session: Session,
    tree: Option<CompositionTree>,
    scroll: ScrollController,
    states: NodeStates,
    focus: FocusRing,
    painter: Painter,
    hits: HitGrid,
    last_frame: Option<RenderNode>,
    /// Set when `last_frame` no longer matches the expand state or viewport.
    stale: bool,
    rebuilds: usize,
    last_paint: PaintOutput,
    units_per_column: f64,
    size: (u16, u16),
}

impl Inspector {
    /// Create an empty inspector for a terminal of `cols` x `rows`.
    pub fn new(config: InspectorConfig, cols: u16, rows: u16) -> Self {
        let units_per_column = config.units_per_column.unwrap_or(1.0);
        let scroll = ScrollController::new(
            cols as f64 * units_per_column,
            content_rows(rows) as f64,
            config.animation_frames,
        );
        let states = NodeStates::new(scroll.handle());

        Self {
            palette: Palette::for_scheme(config.scheme),
            config,
            session: Session::new(),
            tree: None,
            scroll,
            states,
            focus: FocusRing::new(),
            painter: Painter::new(),
            hits: HitGrid::new(cols, rows),
            last_frame: None,
            stale: true,
            rebuilds: 0,
            last_paint: PaintOutput::default(),
            units_per_column,
            size: (cols, rows),
        }
    }

    /// Read-only view of the scroll signals.
    pub fn viewport(&self) -> ViewportHandle {
        self.scroll.handle()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn tree(&self) -> Option<&CompositionTree> {
        self.tree.as_ref()
    }

    pub fn states(&self) -> &NodeStates {
        &self.states
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focus.focused()
    }

    pub fn hits(&self) -> &HitGrid {
        &self.hits
    }

    pub fn units_per_column(&self) -> f64 {
        self.units_per_column
    }

    /// Number of times the render tree has been built.
    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }

    pub fn is_animating(&self) -> bool {
        self.scroll.is_animating()
    }

    // =========================================================================
    // Documents
    // =========================================================================

    /// Make `request` the selected source. Returns it for the worker.
    pub fn select(&mut self, request: LoadRequest) -> LoadRequest {
        self.session.select(&request);
        request
    }

    /// Take a finished load. Returns true if the view changed.
    pub fn accept(&mut self, outcome: LoadOutcome) -> bool {
        match self.session.accept(outcome) {
            Some(Ok(doc)) => {
                self.show(&doc);
                true
            }
            Some(Err(_)) => {
                self.clear_document();
                true
            }
            None => false,
        }
    }

    /// Replace the shown document.
    pub fn show(&mut self, doc: &CompositionDocument) {
        let tree = CompositionTree::from_document(doc);
        self.states.clear();
        self.focus.clear();
        self.last_frame = None;
        self.stale = true;
        self.last_paint = PaintOutput::default();

        self.units_per_column = self.config.units_per_column_for(tree.ticks_per_beat());
        let (cols, rows) = self.size;
        self.scroll
            .resize(cols as f64 * self.units_per_column, content_rows(rows) as f64);
        self.scroll.set_content(tree.root().span);
        self.scroll.set_content_height(0.0);

        tracing::debug!(
            nodes = tree.len(),
            depth = tree.max_depth(),
            units_per_column = self.units_per_column,
            "showing document"
        );
        self.tree = Some(tree);
    }

    fn clear_document(&mut self) {
        self.tree = None;
        self.states.clear();
        self.focus.clear();
        self.last_frame = None;
        self.stale = true;
        self.last_paint = PaintOutput::default();
    }

    // =========================================================================
    // Input
    // =========================================================================

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.size = (cols, rows);
        self.hits.resize(cols, rows);
        self.scroll
            .resize(cols as f64 * self.units_per_column, content_rows(rows) as f64);
        self.stale = true;
    }

    /// Advance a running skip animation. Returns true if the scroll moved.
    pub fn tick(&mut self) -> bool {
        self.scroll.tick()
    }

    pub fn apply(&mut self, action: Action) -> Flow {
        let step = self.config.scroll_step as f64 * self.units_per_column;

        match action {
            Action::Quit => return Flow::Quit,
            Action::ScrollSteps(n) => self.scroll.scroll_by(n as f64 * step),
            Action::ScrollPages(n) => self.scroll.scroll_by(n as f64 * self.scroll.width()),
            Action::ScrollHome => self.scroll.set_scroll(f64::NEG_INFINITY),
            Action::ScrollEnd => self.scroll.set_scroll(f64::INFINITY),
            Action::ScrollRows(n) => self.scroll.scroll_y_by(n as f64),
            Action::ScrollRowPages(n) => {
                let page = content_rows(self.size.1).max(1) as f64;
                self.scroll.scroll_y_by(n as f64 * page);
            }
            Action::FocusPrev => {
                self.focus.prev();
                self.reveal_focused();
            }
            Action::FocusNext => {
                self.focus.next();
                self.reveal_focused();
            }
            Action::Node(action, target) => self.apply_node(action, target),
            Action::NextExample => return Flow::Load(self.next_example()),
        }
        Flow::Continue
    }

    fn apply_node(&mut self, action: NodeAction, target: Target) {
        let id = match target {
            Target::Focused => self.focus.focused(),
            Target::Node(id) => {
                self.focus.focus(id);
                Some(id)
            }
        };
        let Some(id) = id else {
            return;
        };

        // Only visible nodes respond, as their controls are not drawn
        // otherwise.
        if !self.states.is_visible(id) {
            tracing::debug!(id = id.0, ?action, "ignoring action on hidden node");
            return;
        }

        match action {
            NodeAction::Toggle => {
                self.states.toggle(id);
                self.stale = true;
            }
            NodeAction::SkipBackward | NodeAction::SkipForward => {
                let Some(node) = self.last_frame.as_ref().and_then(|root| root.find(id)) else {
                    return;
                };
                let control = match action {
                    NodeAction::SkipBackward => node.header.back,
                    _ => node.header.forward,
                };
                if let SkipControl::Button { target } = control {
                    tracing::debug!(id = id.0, target, "skip");
                    self.scroll.animate_to(target);
                }
            }
            NodeAction::LogElement => {
                if let Some(node) = self.tree.as_ref().and_then(|tree| tree.get(id)) {
                    tracing::info!(
                        id = id.0,
                        span = %node.span_text(),
                        element = %node.element,
                        "element"
                    );
                }
            }
        }
    }

    fn reveal_focused(&mut self) {
        let Some(id) = self.focus.focused() else {
            return;
        };
        if let Some(&top) = self.last_paint.header_rows.get(&id) {
            self.scroll.reveal_rows(top as f64, (top + HEADER_ROWS) as f64);
        }
    }

    /// The bundled example after the selected one, wrapping around.
    fn next_example(&self) -> LoadRequest {
        let keys = bundled::keys();
        let next = self
            .session
            .selected()
            .and_then(|selected| keys.iter().position(|key| key == selected))
            .map_or(0, |i| (i + 1) % keys.len());
        LoadRequest::Key(keys[next].clone())
    }

    // =========================================================================
    // Frame
    // =========================================================================

    /// Build and paint the current frame.
    pub fn frame(&mut self) -> FrameBuffer {
        let (cols, rows) = self.size;
        let area = ClipRect::new(0, 1, cols, content_rows(rows));

        // Scroll alone only moves headers; the tree is rebuilt when its
        // structure or some node's visibility changed.
        let flipped = self.states.take_flipped();
        let root = match self.tree.as_ref() {
            Some(_) if !self.stale && !flipped && self.last_frame.is_some() => {
                self.last_frame.take()
            }
            Some(tree) => {
                tracing::trace!(flipped, "rebuilding render tree");
                self.rebuilds += 1;
                let handle = self.scroll.handle();
                RenderTreeBuilder::new(tree, &mut self.states, &handle).build_root()
            }
            None => None,
        };
        self.stale = false;

        let Some(root) = root else {
            let mut buf = self.blank();
            self.paint_message(&mut buf, area);
            self.last_frame = None;
            return buf;
        };

        let painted_focus = self.focus.focused();
        let (mut buf, mut out) = self.paint_tree(&root, area);
        self.focus.sync(out.focus_order.clone());

        // Focus moved during sync: repaint so the highlight is current.
        if self.focus.focused() != painted_focus {
            (buf, out) = self.paint_tree(&root, area);
        }

        self.scroll.set_content_height(out.content_height as f64);
        self.last_paint = out;
        self.last_frame = Some(root);
        buf
    }

    fn blank(&mut self) -> FrameBuffer {
        let (cols, rows) = self.size;
        self.hits.clear();
        let mut buf = FrameBuffer::with_background(cols, rows, self.palette.background);
        self.paint_status(&mut buf);
        buf
    }

    fn paint_tree(&mut self, root: &RenderNode, area: ClipRect) -> (FrameBuffer, PaintOutput) {
        let mut buf = self.blank();
        let handle = self.scroll.handle();
        let view = PaintView {
            palette: &self.palette,
            scroll_x: handle.scroll_x(),
            scroll_y: handle.scroll_y() as i64,
            window: handle.width(),
            units_per_column: self.units_per_column,
            focused: self.focus.focused(),
        };
        let out = self.painter.paint(root, &view, area, &mut buf, &mut self.hits);
        (buf, out)
    }

    fn paint_status(&self, buf: &mut FrameBuffer) {
        let cols = buf.width();
        if buf.height() == 0 {
            return;
        }
        buf.fill_rect(0, 0, cols, 1, self.palette.accent_background_alt, None);

        let status = match (self.session.state(), self.tree.as_ref()) {
            (LoadState::Loading(label), _) => format!(" Loading {label}…"),
            (LoadState::Failed { requested, .. }, _) => format!(" {requested}: load failed"),
            (LoadState::Ready(key), Some(tree)) => {
                let x = self.scroll.scroll_x();
                let span = tree.root().span;
                format!(
                    " {key}  {:.0}..{:.0} of {}..{}  {} units/col",
                    x,
                    x + self.scroll.width(),
                    span.start,
                    span.end,
                    self.units_per_column,
                )
            }
            _ => " No file loaded.".to_string(),
        };
        let status = truncate_text(&status, cols);
        let used = buf.draw_text(0, 0, &status, self.palette.text, Attr::BOLD, None);

        let hints_width = string_width(HINTS);
        if used + hints_width + 2 <= cols {
            buf.draw_text(cols - hints_width - 1, 0, HINTS, self.palette.tint, Attr::NONE, None);
        }
    }

    fn paint_message(&self, buf: &mut FrameBuffer, area: ClipRect) {
        let (text, fg) = match self.session.state() {
            LoadState::Loading(label) => (format!("Loading {label}…"), self.palette.text),
            LoadState::Failed { message, .. } => (message.clone(), self.palette.error),
            _ => ("No file loaded.".to_string(), self.palette.text),
        };
        let width = area.width.saturating_sub(4);
        buf.draw_text(2, area.y + 1, &truncate_text(&text, width), fg, Attr::BOLD, Some(&area));
    }
}

/// Rows below the status line.
fn content_rows(rows: u16) -> u16 {
    rows.saturating_sub(1)
}

// =============================================================================
// Tests
// =============================================================================
