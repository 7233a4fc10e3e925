//! Composition document model.
//!
//! A document is one options block plus a tree of nodes. Every node spans an
//! absolute `[start, end)` interval on the composition axis.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Root of one loaded document. Replaced wholesale on each load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionDocument {
    pub options: CompositionOptions,
    pub tree: CompositionNode,
}

/// Document-wide options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionOptions {
    pub ticks_per_beat: i64,
}

/// One node of the composition tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionNode {
    /// Single-key mapping: the key is the variant tag, the value its payload.
    pub element: Value,
    pub start: i64,
    pub end: i64,
    /// Optional instance label shown as `tag(name)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub seed: u64,
    pub rendered: bool,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub children: Vec<CompositionNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<CompositionNode>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<CompositionNode>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl CompositionNode {
    /// Create a leaf node with the given element and span.
    pub fn leaf(element: Value, start: i64, end: i64) -> Self {
        Self {
            element,
            start,
            end,
            name: None,
            seed: 0,
            rendered: false,
            children: Vec::new(),
            error: None,
        }
    }

    /// Builder-style helper to attach children.
    pub fn with_children(mut self, children: Vec<CompositionNode>) -> Self {
        self.children = children;
        self
    }

    /// Builder-style helper to set the instance name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Depth of the subtree rooted here (a leaf has depth 1).
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((node, depth)) = stack.pop() {
            max = max.max(depth);
            stack.extend(node.children.iter().map(|child| (child, depth + 1)));
        }
        max
    }
}
