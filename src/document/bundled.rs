//! Bundled example documents.
//!
//! Served under the `examples/` namespace straight from memory; they never
//! touch the store.

use serde_json::{Value, json};

use super::model::{CompositionDocument, CompositionNode, CompositionOptions};
use super::storage::EXAMPLES_PREFIX;

const TICKS_PER_BEAT: i64 = 480;

/// Names of all bundled examples, in display order.
const NAMES: [&str; 3] = ["arrangement", "overlap", "deep"];

/// Full storage keys of all bundled examples.
pub fn keys() -> Vec<String> {
    NAMES
        .iter()
        .map(|name| format!("{EXAMPLES_PREFIX}{name}"))
        .collect()
}

/// Look up a bundled example by its full key (`examples/<name>`).
pub fn get(key: &str) -> Option<CompositionDocument> {
    let tree = match key.strip_prefix(EXAMPLES_PREFIX)? {
        "arrangement" => arrangement(),
        "overlap" => overlap(),
        "deep" => deep(),
        _ => return None,
    };

    Some(CompositionDocument {
        options: CompositionOptions {
            ticks_per_beat: TICKS_PER_BEAT,
        },
        tree,
    })
}

fn node(element: Value, start: i64, end: i64, seed: u64) -> CompositionNode {
    let mut node = CompositionNode::leaf(element, start, end);
    node.seed = seed;
    node.rendered = true;
    node
}

fn bar(n: i64) -> i64 {
    n * 4 * TICKS_PER_BEAT
}

/// A small song: two parts, each split into sections and notes.
fn arrangement() -> CompositionNode {
    let melody = |bar_start: i64, seed: u64| {
        let notes = [60, 62, 64, 65, 67, 65, 64, 62]
            .iter()
            .enumerate()
            .map(|(i, pitch)| {
                let start = bar(bar_start) + i as i64 * TICKS_PER_BEAT;
                node(
                    json!({ "Note": { "pitch": pitch, "velocity": 96 } }),
                    start,
                    start + TICKS_PER_BEAT,
                    seed + i as u64,
                )
            })
            .collect();
        node(
            json!({ "Sequence": { "repeat": false } }),
            bar(bar_start),
            bar(bar_start + 2),
            seed,
        )
        .with_children(notes)
    };

    let chords = |bar_start: i64, seed: u64| {
        let roots = [48, 53, 55, 48];
        let children = roots
            .iter()
            .enumerate()
            .map(|(i, root)| {
                let start = bar(bar_start + i as i64);
                node(
                    json!({ "Chord": { "root": root, "quality": "major" } }),
                    start,
                    start + bar(1),
                    seed + i as u64,
                )
            })
            .collect();
        node(json!({ "Progression": null }), bar(bar_start), bar(bar_start + 4), seed)
            .with_children(children)
    };

    let lead = node(json!({ "Part": { "instrument": 0 } }), 0, bar(8), 11)
        .with_name("lead")
        .with_children(vec![
            melody(0, 100).with_name("verse"),
            melody(2, 200).with_name("verse"),
            melody(4, 300).with_name("chorus"),
            melody(6, 400).with_name("outro"),
        ]);

    let keys = node(json!({ "Part": { "instrument": 4 } }), 0, bar(8), 12)
        .with_name("keys")
        .with_children(vec![chords(0, 500), chords(4, 600)]);

    let mut silence = node(json!({ "Rest": null }), bar(8), bar(9), 13);
    silence.rendered = false;

    node(json!({ "Composition": { "tempo": 120 } }), 0, bar(9), 1)
        .with_name("demo")
        .with_children(vec![lead, keys, silence])
}

/// Overlapping children that need more than one row.
fn overlap() -> CompositionNode {
    node(json!({ "Layer": null }), 0, 1000, 1).with_children(vec![
        node(json!({ "Clip": { "gain": 0.5 } }), 0, 100, 2),
        node(json!({ "Clip": { "gain": 0.75 } }), 50, 150, 3),
        node(json!({ "Clip": { "gain": 1.0 } }), 200, 900, 4),
        // Too narrow to be drawn.
        node(json!({ "Marker": "cue" }), 400, 420, 5),
    ])
}

/// A single chain of nested nodes, deeper than usual.
fn deep() -> CompositionNode {
    const DEPTH: usize = 24;

    let mut tree = node(json!({ "Note": { "pitch": 72 } }), 0, bar(1), 0);
    for level in (0..DEPTH).rev() {
        let name = format!("level {level}");
        tree = node(json!({ "Group": { "level": level } }), 0, bar(1), level as u64)
            .with_name(name)
            .with_children(vec![tree]);
    }
    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::validate::validate_document;

    #[test]
    fn test_every_key_resolves() {
        for key in keys() {
            assert!(key.starts_with(EXAMPLES_PREFIX));
            let doc = get(&key).unwrap();
            let value = serde_json::to_value(&doc).unwrap();
            validate_document(&value).unwrap();
        }
    }

    #[test]
    fn test_unknown_example() {
        assert!(get("examples/nope").is_none());
        assert!(get("overlap").is_none());
    }

    #[test]
    fn test_deep_example_is_deep() {
        let doc = get("examples/deep").unwrap();
        assert!(doc.tree.depth() > 20);
    }

    #[test]
    fn test_overlap_example_spans() {
        let doc = get("examples/overlap").unwrap();
        let spans: Vec<(i64, i64)> = doc.tree.children.iter().map(|c| (c.start, c.end)).collect();
        assert_eq!(spans, vec![(0, 100), (50, 150), (200, 900), (400, 420)]);
    }
}
