//! Node State - per-instance UI state for mounted tree nodes.
//!
//! Every node that is currently part of the rendered tree is "mounted" and
//! owns:
//! - an expanded flag (collapsed on mount)
//! - a visibility derived over the shared viewport signals
//! - one effect that watches the derived and records flips
//!
//! The map is sparse: nodes under a collapsed parent are never mounted, and
//! nodes that leave the rendered tree are unmounted, which disposes their
//! effect and forgets their expanded flag.
//!
//! # Reactivity
//!
//! ```text
//! scroll_x, width (signals)
//!   └─→ visible (derived, one per node)
//!         └─→ watcher (effect, one per node)
//!               runs only when `visible` changes value
//! ```

use std::cell::Cell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use spark_signals::{derived, effect};

use super::viewport::ViewportHandle;
use crate::engine::{NodeId, Span};
use crate::layout::is_visible;

struct NodeInstance {
    expanded: bool,
    visible: Rc<dyn Fn() -> bool>,
    flips: Rc<Cell<u32>>,
    stop: Option<Box<dyn FnOnce()>>,
}

impl Drop for NodeInstance {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            stop();
        }
    }
}

/// Sparse per-node state, keyed by [`NodeId`].
pub struct NodeStates {
    viewport: ViewportHandle,
    nodes: HashMap<NodeId, NodeInstance>,
    flipped: Rc<Cell<bool>>,
}

impl NodeStates {
    pub fn new(viewport: ViewportHandle) -> Self {
        Self {
            viewport,
            nodes: HashMap::new(),
            flipped: Rc::new(Cell::new(false)),
        }
    }

    /// Mount `id` if it is not mounted yet. New nodes start collapsed.
    pub fn mount(&mut self, id: NodeId, span: Span) {
        if self.nodes.contains_key(&id) {
            return;
        }

        let viewport = self.viewport.clone();
        let visible = derived(move || is_visible(viewport.scroll_x(), span, viewport.width()));

        let flips = Rc::new(Cell::new(0u32));
        let watcher = visible.clone();
        let last: Cell<Option<bool>> = Cell::new(None);
        let flip_count = flips.clone();
        let flipped = self.flipped.clone();
        let stop = effect(move || {
            let now = watcher.get();
            if let Some(before) = last.replace(Some(now)) {
                if before != now {
                    flip_count.set(flip_count.get() + 1);
                    flipped.set(true);
                }
            }
        });

        let reader = visible.clone();
        self.nodes.insert(
            id,
            NodeInstance {
                expanded: false,
                visible: Rc::new(move || reader.get()),
                flips,
                stop: Some(Box::new(stop)),
            },
        );
    }

    pub fn is_mounted(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Current visibility of a mounted node. Unmounted nodes are invisible.
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(|node| (node.visible)())
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(|node| node.expanded)
    }

    /// Flip the expanded flag. Returns the new value, `false` if unmounted.
    pub fn toggle(&mut self, id: NodeId) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.expanded = !node.expanded;
                tracing::debug!(id = id.0, expanded = node.expanded, "toggled node");
                node.expanded
            }
            None => false,
        }
    }

    /// Number of visibility flips observed for `id` since it was mounted.
    pub fn flips(&self, id: NodeId) -> u32 {
        self.nodes.get(&id).map_or(0, |node| node.flips.get())
    }

    /// True if any mounted node flipped visibility since the last call.
    pub fn take_flipped(&self) -> bool {
        self.flipped.replace(false)
    }

    /// Unmount every node not in `keep`.
    pub fn retain(&mut self, keep: &HashSet<NodeId>) {
        self.nodes.retain(|id, _| keep.contains(id));
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Unmount everything.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.flipped.set(false);
    }
}
