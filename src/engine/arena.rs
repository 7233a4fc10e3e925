//! Composition tree arena.
//!
//! A loaded document is flattened into one `Vec<TreeNode>` in pre-order.
//! Nodes refer to each other by [`NodeId`] (an index into that vector), so
//! per-node UI state elsewhere can be keyed by a small `Copy` id instead of
//! borrowing into the document.
//!
//! ```text
//! id 0: Composition  parent=None  depth=0  children=[1, 4]
//! id 1: Part(lead)   parent=0     depth=1  children=[2, 3]
//! id 2: Note         parent=1     depth=2
//! id 3: Note         parent=1     depth=2
//! id 4: Part(keys)   parent=0     depth=1
//! ```
//!
//! Child rows do not depend on scroll position, so each node's packing is
//! computed once, on first use, and kept for the lifetime of the tree.

use std::cell::{Cell, OnceCell};

use serde_json::Value;

use super::label::{node_label, node_value};
use super::rows::{RowEntry, pack_rows, row_entries};
use super::span::{HasSpan, Span};
use crate::document::{CompositionDocument, CompositionNode};

/// Index of a node in its [`CompositionTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One flattened node with its display strings precomputed.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub depth: usize,
    pub span: Span,
    /// `Tag` or `Tag(name)`.
    pub label: String,
    /// Compact payload text, `None` when the payload is null.
    pub value: Option<String>,
    pub seed: u64,
    pub rendered: bool,
    pub element: Value,
    pub children: Vec<NodeId>,
}

impl TreeNode {
    /// Header title: `label` or `label: value`.
    pub fn title(&self) -> String {
        match &self.value {
            Some(value) => format!("{}: {}", self.label, value),
            None => self.label.clone(),
        }
    }

    /// Span text shown under the title.
    pub fn span_text(&self) -> String {
        format!("{}..{}", self.span.start, self.span.end)
    }
}

impl HasSpan for TreeNode {
    fn span(&self) -> Span {
        self.span
    }
}

/// One slot of a packed child row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSlot {
    /// Blank gap in axis units.
    Spacer(i64),
    Child(NodeId),
}

/// A loaded document, flattened.
#[derive(Debug, Clone)]
pub struct CompositionTree {
    nodes: Vec<TreeNode>,
    /// Packed child rows, parallel to `nodes`.
    rows: Vec<OnceCell<Vec<Vec<RowSlot>>>>,
    packed: Cell<usize>,
    ticks_per_beat: i64,
}

impl CompositionTree {
    /// Flatten a document. Never recurses, so tree depth is not bounded by
    /// the call stack.
    pub fn from_document(doc: &CompositionDocument) -> Self {
        let mut nodes: Vec<TreeNode> = Vec::new();
        let mut stack: Vec<(&CompositionNode, Option<NodeId>, usize)> =
            vec![(&doc.tree, None, 0)];

        while let Some((source, parent, depth)) = stack.pop() {
            let id = NodeId(nodes.len() as u32);

            nodes.push(TreeNode {
                id,
                parent,
                depth,
                span: source.span(),
                label: node_label(&source.element, source.name.as_deref()),
                value: node_value(&source.element),
                seed: source.seed,
                rendered: source.rendered,
                element: source.element.clone(),
                children: Vec::with_capacity(source.children.len()),
            });

            if let Some(parent) = parent {
                nodes[parent.index()].children.push(id);
            }

            // Reverse push keeps pre-order and sibling order.
            for child in source.children.iter().rev() {
                stack.push((child, Some(id), depth + 1));
            }
        }

        Self {
            rows: nodes.iter().map(|_| OnceCell::new()).collect(),
            nodes,
            packed: Cell::new(0),
            ticks_per_beat: doc.options.ticks_per_beat,
        }
    }

    pub fn root(&self) -> &TreeNode {
        &self.nodes[0]
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.index())
    }

    /// Children of `id` in document order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &TreeNode> {
        self.get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|child| self.get(*child))
    }

    /// Packed child rows of `id`, with spacers.
    ///
    /// Packs on the first call for each node and returns the stored rows
    /// afterwards.
    pub fn rows(&self, id: NodeId) -> &[Vec<RowSlot>] {
        let (Some(node), Some(cell)) = (self.get(id), self.rows.get(id.index())) else {
            return &[];
        };

        cell.get_or_init(|| {
            self.packed.set(self.packed.get() + 1);
            pack_rows(self.children(id), node.span)
                .iter()
                .map(|row| {
                    row_entries(row, node.span)
                        .into_iter()
                        .map(|entry| match entry {
                            RowEntry::Spacer(width) => RowSlot::Spacer(width),
                            RowEntry::Node(child) => RowSlot::Child(child.id),
                        })
                        .collect()
                })
                .collect()
        })
    }

    /// Number of nodes whose rows have been packed.
    pub fn packed_count(&self) -> usize {
        self.packed.get()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ticks_per_beat(&self) -> i64 {
        self.ticks_per_beat
    }

    /// Maximum depth (root is 0).
    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(|node| node.depth).max().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::CompositionOptions;
    use serde_json::json;

    fn setup() -> CompositionTree {
        let tree = CompositionNode::leaf(json!({ "Composition": null }), 0, 1000);
        let tree = tree.with_children(vec![
            CompositionNode::leaf(json!({ "Part": { "instrument": 0 } }), 0, 500)
                .with_name("lead")
                .with_children(vec![
                    CompositionNode::leaf(json!({ "Note": 60 }), 0, 100),
                    CompositionNode::leaf(json!({ "Note": 62 }), 100, 200),
                ]),
            CompositionNode::leaf(json!({ "Part": { "instrument": 4 } }), 500, 1000),
        ]);
        CompositionTree::from_document(&CompositionDocument {
            options: CompositionOptions { ticks_per_beat: 96 },
            tree,
        })
    }

    #[test]
    fn test_preorder_ids() {
        let tree = setup();
        let labels: Vec<&str> = tree.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["Composition", "Part(lead)", "Note", "Note", "Part"]);

        assert_eq!(tree.root().children, vec![NodeId(1), NodeId(4)]);
        assert_eq!(tree.get(NodeId(1)).unwrap().children, vec![NodeId(2), NodeId(3)]);
        assert_eq!(tree.get(NodeId(3)).unwrap().parent, Some(NodeId(1)));
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.ticks_per_beat(), 96);
    }

    #[test]
    fn test_children_in_order() {
        let tree = setup();
        let spans: Vec<Span> = tree.children(NodeId(1)).map(|n| n.span).collect();
        assert_eq!(spans, vec![Span::new(0, 100), Span::new(100, 200)]);
        assert_eq!(tree.children(NodeId(99)).count(), 0);
    }

    #[test]
    fn test_titles() {
        let tree = setup();
        assert_eq!(tree.root().title(), "Composition");
        assert_eq!(tree.get(NodeId(1)).unwrap().title(), r#"Part(lead): {"instrument": 0}"#);
        assert_eq!(tree.get(NodeId(2)).unwrap().title(), "Note: 60");
        assert_eq!(tree.get(NodeId(4)).unwrap().span_text(), "500..1000");
    }

    #[test]
    fn test_rows_packed_once() {
        let tree = setup();
        assert_eq!(tree.packed_count(), 0);

        let expected = vec![vec![RowSlot::Child(NodeId(1)), RowSlot::Child(NodeId(4))]];
        assert_eq!(tree.rows(NodeId::ROOT), expected.as_slice());
        assert_eq!(tree.rows(NodeId::ROOT), expected.as_slice());
        assert_eq!(tree.packed_count(), 1);

        assert_eq!(
            tree.rows(NodeId(1)),
            &[vec![RowSlot::Child(NodeId(2)), RowSlot::Child(NodeId(3))]]
        );
        assert_eq!(tree.packed_count(), 2);
        assert!(tree.rows(NodeId(99)).is_empty());
        assert_eq!(tree.packed_count(), 2);
    }

    #[test]
    fn test_rows_keep_spacers() {
        let tree = CompositionTree::from_document(&CompositionDocument {
            options: CompositionOptions { ticks_per_beat: 96 },
            tree: CompositionNode::leaf(json!({ "Layer": null }), 0, 1000).with_children(vec![
                CompositionNode::leaf(json!({ "Clip": 1 }), 100, 300),
                CompositionNode::leaf(json!({ "Clip": 2 }), 500, 600),
            ]),
        });
        assert_eq!(
            tree.rows(NodeId::ROOT),
            &[vec![
                RowSlot::Spacer(100),
                RowSlot::Child(NodeId(1)),
                RowSlot::Spacer(200),
                RowSlot::Child(NodeId(2)),
            ]]
        );
    }

    #[test]
    fn test_deep_tree_depths() {
        let mut node = CompositionNode::leaf(json!({ "Leaf": null }), 0, 100);
        for _ in 0..500 {
            node = CompositionNode::leaf(json!({ "Group": null }), 0, 100)
                .with_children(vec![node]);
        }
        let doc = CompositionDocument {
            options: CompositionOptions { ticks_per_beat: 1 },
            tree: node,
        };

        let tree = CompositionTree::from_document(&doc);
        assert_eq!(tree.len(), 501);
        assert_eq!(tree.max_depth(), 500);
        assert_eq!(tree.iter().last().unwrap().label, "Leaf");
    }
}
