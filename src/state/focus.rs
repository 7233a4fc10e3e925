//! Focus System - keyboard focus over rendered node headers.
//!
//! Focus order is the render order of the last frame (parents before their
//! child rows, rows top to bottom, nodes left to right). Only nodes whose
//! header was drawn take part, so hidden and unmounted nodes are skipped.
//!
//! When the order changes (a node collapses, a document loads), the focused
//! node keeps focus if it is still in the order; otherwise focus falls back
//! to the entry at the same position, clamped.

use crate::engine::NodeId;

#[derive(Debug, Default)]
pub struct FocusRing {
    order: Vec<NodeId>,
    focused: Option<NodeId>,
}

impl FocusRing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    pub fn focus(&mut self, id: NodeId) {
        self.focused = Some(id);
    }

    fn position(&self) -> Option<usize> {
        let focused = self.focused?;
        self.order.iter().position(|id| *id == focused)
    }

    /// Replace the focus order with the nodes drawn this frame.
    pub fn sync(&mut self, order: Vec<NodeId>) {
        let previous = self.position();
        self.order = order;

        if self.order.is_empty() {
            self.focused = None;
            return;
        }
        if self.position().is_some() {
            return;
        }

        let index = previous.unwrap_or(0).min(self.order.len() - 1);
        self.focused = Some(self.order[index]);
    }

    /// Move focus forward, stopping at the last node.
    pub fn next(&mut self) -> Option<NodeId> {
        self.step(1)
    }

    /// Move focus backward, stopping at the first node.
    pub fn prev(&mut self) -> Option<NodeId> {
        self.step(-1)
    }

    fn step(&mut self, delta: isize) -> Option<NodeId> {
        if self.order.is_empty() {
            return None;
        }
        let last = self.order.len() as isize - 1;
        let index = match self.position() {
            Some(i) => (i as isize + delta).clamp(0, last),
            None => 0,
        };
        self.focused = Some(self.order[index as usize]);
        self.focused
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.focused = None;
    }
}
