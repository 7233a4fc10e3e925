//! Document validation.
//!
//! One strict pass over the raw JSON before it is deserialized, so that a
//! malformed document is rejected with a message that names the offending
//! field path (`tree.children[2].start: ...`).
//!
//! Required:
//! - `options.ticks_per_beat`: integer
//! - per node: `element` (any JSON value), `start`, `end`: integers,
//!   `seed`: unsigned integer, `rendered`: boolean
//!
//! Optional per node: `name` (string or null), `children` (array or null),
//! `error` (anything).
//!
//! Parsing keeps `serde_json`'s recursion limit of 128 nested arrays and
//! objects. Each tree level takes two of them (the node and its `children`
//! array), so text documents deeper than about 60 levels are rejected as
//! invalid before validation runs.

use serde_json::{Map, Value};

use super::error::LoadError;
use super::model::CompositionDocument;

/// Parse JSON text into a raw value.
pub fn parse_value(text: &str) -> Result<Value, LoadError> {
    serde_json::from_str(text).map_err(|err| LoadError::Validation(err.to_string()))
}

/// Parse, validate and deserialize a document in one go.
pub fn parse_document(text: &str) -> Result<CompositionDocument, LoadError> {
    let value = parse_value(text)?;
    validate_document(&value)?;
    document_from_value(value)
}

/// Deserialize an already validated value.
pub fn document_from_value(value: Value) -> Result<CompositionDocument, LoadError> {
    serde_json::from_value(value).map_err(|err| LoadError::Validation(err.to_string()))
}

/// Validate the shape of a raw document.
pub fn validate_document(value: &Value) -> Result<(), LoadError> {
    let root = value
        .as_object()
        .ok_or_else(|| invalid("document", "expected an object"))?;

    let options = root
        .get("options")
        .ok_or_else(|| invalid("options", "missing field"))?;
    let ticks = options
        .get("ticks_per_beat")
        .ok_or_else(|| invalid("options.ticks_per_beat", "missing field"))?;
    if !is_integer(ticks) {
        return Err(invalid("options.ticks_per_beat", "expected an integer"));
    }

    let tree = root.get("tree").ok_or_else(|| invalid("tree", "missing field"))?;

    // Explicit stack: values built in memory are not depth limited.
    let mut stack = vec![(tree, String::from("tree"))];
    while let Some((node, path)) = stack.pop() {
        validate_node(node, &path)?;

        if let Some(Value::Array(children)) = node.get("children") {
            for (i, child) in children.iter().enumerate().rev() {
                stack.push((child, format!("{path}.children[{i}]")));
            }
        }
    }

    Ok(())
}

fn validate_node(node: &Value, path: &str) -> Result<(), LoadError> {
    let fields = node
        .as_object()
        .ok_or_else(|| invalid(path, "expected an object"))?;

    let field = |name: &str| required(fields, path, name);

    field("element")?;

    for name in ["start", "end"] {
        if !is_integer(field(name)?) {
            return Err(invalid(&format!("{path}.{name}"), "expected an integer"));
        }
    }

    if field("seed")?.as_u64().is_none() {
        return Err(invalid(&format!("{path}.seed"), "expected an unsigned integer"));
    }

    if !field("rendered")?.is_boolean() {
        return Err(invalid(&format!("{path}.rendered"), "expected a boolean"));
    }

    match fields.get("name") {
        None | Some(Value::Null) | Some(Value::String(_)) => {}
        Some(_) => return Err(invalid(&format!("{path}.name"), "expected a string")),
    }

    match fields.get("children") {
        None | Some(Value::Null) | Some(Value::Array(_)) => {}
        Some(_) => return Err(invalid(&format!("{path}.children"), "expected an array")),
    }

    Ok(())
}

fn required<'v>(
    fields: &'v Map<String, Value>,
    path: &str,
    name: &str,
) -> Result<&'v Value, LoadError> {
    fields
        .get(name)
        .ok_or_else(|| invalid(&format!("{path}.{name}"), "missing field"))
}

fn is_integer(value: &Value) -> bool {
    value.as_i64().is_some()
}

fn invalid(path: &str, reason: &str) -> LoadError {
    LoadError::Validation(format!("{path}: {reason}"))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(start: i64, end: i64) -> Value {
        json!({
            "element": { "Part": null },
            "start": start,
            "end": end,
            "seed": 1,
            "rendered": true
        })
    }

    fn message(result: Result<(), LoadError>) -> String {
        result.unwrap_err().to_string()
    }

    #[test]
    fn test_valid_document() {
        let mut root = node(0, 1000);
        root["children"] = json!([node(0, 100), node(200, 900)]);
        let doc = json!({ "options": { "ticks_per_beat": 480 }, "tree": root });

        assert!(validate_document(&doc).is_ok());
        let parsed = document_from_value(doc).unwrap();
        assert_eq!(parsed.options.ticks_per_beat, 480);
        assert_eq!(parsed.tree.children.len(), 2);
    }

    #[test]
    fn test_missing_ticks_per_beat() {
        let doc = json!({ "options": {}, "tree": node(0, 10) });
        assert_eq!(
            message(validate_document(&doc)),
            "Invalid composition JSON format: options.ticks_per_beat: missing field"
        );
    }

    #[test]
    fn test_missing_options() {
        let doc = json!({ "tree": node(0, 10) });
        assert!(message(validate_document(&doc)).contains("options: missing field"));
    }

    #[test]
    fn test_missing_node_field_reports_path() {
        let mut bad = node(0, 100);
        bad.as_object_mut().unwrap().remove("rendered");
        let mut root = node(0, 1000);
        root["children"] = json!([node(0, 100), node(100, 200), bad]);
        let doc = json!({ "options": { "ticks_per_beat": 96 }, "tree": root });

        assert!(
            message(validate_document(&doc)).contains("tree.children[2].rendered: missing field")
        );
    }

    #[test]
    fn test_wrong_types() {
        let mut root = node(0, 10);
        root["start"] = json!("zero");
        let doc = json!({ "options": { "ticks_per_beat": 96 }, "tree": root });
        assert!(message(validate_document(&doc)).contains("tree.start: expected an integer"));

        let mut root = node(0, 10);
        root["seed"] = json!(-4);
        let doc = json!({ "options": { "ticks_per_beat": 96 }, "tree": root });
        assert!(message(validate_document(&doc)).contains("tree.seed"));

        let mut root = node(0, 10);
        root["children"] = json!({});
        let doc = json!({ "options": { "ticks_per_beat": 96 }, "tree": root });
        assert!(message(validate_document(&doc)).contains("tree.children: expected an array"));
    }

    #[test]
    fn test_element_shape_not_enforced() {
        let mut root = node(0, 10);
        root["element"] = json!("not a map");
        let doc = json!({ "options": { "ticks_per_beat": 96 }, "tree": root });
        assert!(validate_document(&doc).is_ok());
    }

    #[test]
    fn test_parse_document_rejects_bad_json() {
        let err = parse_document("{ not json").unwrap_err();
        assert!(matches!(err, LoadError::Validation(_)));
    }

    #[test]
    fn test_deep_tree() {
        let mut tree = node(0, 100);
        for _ in 0..40 {
            let mut parent = node(0, 100);
            parent["children"] = json!([tree]);
            tree = parent;
        }
        let doc = json!({ "options": { "ticks_per_beat": 96 }, "tree": tree });
        assert!(validate_document(&doc).is_ok());
    }

    fn nested_text(depth: usize) -> String {
        let mut tree = node(0, 100);
        for _ in 0..depth {
            let mut parent = node(0, 100);
            parent["children"] = json!([tree]);
            tree = parent;
        }
        json!({ "options": { "ticks_per_beat": 96 }, "tree": tree }).to_string()
    }

    #[test]
    fn test_parse_depth_limit() {
        assert!(parse_document(&nested_text(40)).is_ok());

        let err = parse_document(&nested_text(100)).unwrap_err();
        assert!(matches!(err, LoadError::Validation(_)));
        assert!(err.to_string().contains("recursion limit exceeded"));
    }
}
