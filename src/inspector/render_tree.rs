//! Render Tree - what the inspector shows for the current state.
//!
//! Built from the [`CompositionTree`], the per-node UI state and the
//! viewport. Child rows come from the tree's packed-row cache, so a rebuild
//! never re-packs. The inspector only rebuilds when a node is toggled, the
//! viewport is resized or a node's visibility flips:
//!
//! ```text
//! RenderNode (root, Primary)
//! ├── header: « Sequence: {"bpm": 120} »  /  0..1920
//! └── rows (only when expanded)
//!     ├── [Spacer(20), Node(Part, Alternate), Spacer(80), Node(Part, Alternate)]
//!     └── [Node(Marker, Alternate)]
//! ```
//!
//! Building mounts every node it reaches and unmounts every node it no
//! longer reaches, so collapsing a node forgets the expanded state of its
//! whole subtree.

use std::collections::HashSet;

use crate::engine::{CompositionTree, NodeId, RowSlot, Span, TreeNode};
use crate::state::{NodeStates, ViewportHandle};
use crate::theme::ColorVariant;

/// A skip arrow in a node header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkipControl {
    /// Animated scroll to `target` (axis units) when pressed.
    Button { target: f64 },
    /// Blank space of the same size. Used while the node is not visible.
    Placeholder,
}

/// Header of one node box.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub back: SkipControl,
    /// `Tag(name): value` line.
    pub title: String,
    /// `start..end` line.
    pub span_text: String,
    pub forward: SkipControl,
}

/// One entry of a child row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowItem {
    /// Blank gap, in axis units.
    Spacer(i64),
    Node(RenderNode),
}

/// One rendered node box.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderNode {
    pub id: NodeId,
    pub span: Span,
    pub depth: usize,
    pub variant: ColorVariant,
    pub visible: bool,
    pub expanded: bool,
    pub header: Header,
    /// Packed child rows. Empty while collapsed.
    pub rows: Vec<Vec<RowItem>>,
}

impl RenderNode {
    /// Child nodes in row order.
    pub fn child_nodes(&self) -> impl Iterator<Item = &RenderNode> {
        self.rows.iter().flatten().filter_map(|item| match item {
            RowItem::Node(node) => Some(node),
            RowItem::Spacer(_) => None,
        })
    }

    /// Number of nodes in this subtree, self included.
    pub fn count(&self) -> usize {
        1 + self.child_nodes().map(RenderNode::count).sum::<usize>()
    }

    /// Find a node in this subtree.
    pub fn find(&self, id: NodeId) -> Option<&RenderNode> {
        if self.id == id {
            return Some(self);
        }
        self.child_nodes().find_map(|child| child.find(id))
    }
}

/// Walks the arena top-down, mounting what it reaches.
pub struct RenderTreeBuilder<'a> {
    tree: &'a CompositionTree,
    states: &'a mut NodeStates,
    viewport: &'a ViewportHandle,
    mounted: HashSet<NodeId>,
}

impl<'a> RenderTreeBuilder<'a> {
    pub fn new(
        tree: &'a CompositionTree,
        states: &'a mut NodeStates,
        viewport: &'a ViewportHandle,
    ) -> Self {
        Self {
            tree,
            states,
            viewport,
            mounted: HashSet::new(),
        }
    }

    /// Build the whole render tree and unmount nodes that were not reached.
    pub fn build_root(mut self) -> Option<RenderNode> {
        if self.tree.is_empty() {
            self.states.clear();
            return None;
        }
        let tree = self.tree;
        let root = self.build(tree.root(), ColorVariant::Primary);
        self.states.retain(&self.mounted);
        Some(root)
    }

    /// Build one node with the given colour variant. Children get the other
    /// variant.
    pub fn build(&mut self, node: &TreeNode, variant: ColorVariant) -> RenderNode {
        self.states.mount(node.id, node.span);
        self.mounted.insert(node.id);

        let visible = self.states.is_visible(node.id);
        let expanded = self.states.is_expanded(node.id);

        let header = Header {
            back: skip_control(visible, node.span.start as f64 - self.viewport.width()),
            title: node.title(),
            span_text: node.span_text(),
            forward: skip_control(visible, node.span.end as f64),
        };

        let rows = if expanded {
            self.build_rows(node, variant.other())
        } else {
            Vec::new()
        };

        RenderNode {
            id: node.id,
            span: node.span,
            depth: node.depth,
            variant,
            visible,
            expanded,
            header,
            rows,
        }
    }

    fn build_rows(&mut self, node: &TreeNode, variant: ColorVariant) -> Vec<Vec<RowItem>> {
        let tree = self.tree;

        tree.rows(node.id)
            .iter()
            .map(|row| {
                row.iter()
                    .filter_map(|slot| match *slot {
                        RowSlot::Spacer(width) => Some(RowItem::Spacer(width)),
                        RowSlot::Child(id) => {
                            tree.get(id).map(|child| RowItem::Node(self.build(child, variant)))
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

fn skip_control(visible: bool, target: f64) -> SkipControl {
    if visible {
        SkipControl::Button { target }
    } else {
        SkipControl::Placeholder
    }
}

// =============================================================================
// Tests
// =============================================================================
