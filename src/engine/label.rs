//! Node labels.
//!
//! A node's `element` is a single-key mapping, `{ "<Tag>": <payload> }`. The
//! header shows the tag (plus the instance name), the payload as compact
//! JSON:
//!
//! ```text
//! Note(lead)
//! {"pitch": 60, "velocity": 96}
//! ```

use serde_json::Value;

/// Shown in place of the tag when the element has no keys.
pub const UNKNOWN_TAG: &str = "undefined";

/// Variant tag of an element: its first key.
pub fn element_tag(element: &Value) -> Option<&str> {
    element.as_object()?.keys().next().map(String::as_str)
}

/// Title for a node header: `Tag` or `Tag(name)`. Empty names are ignored.
pub fn node_label(element: &Value, name: Option<&str>) -> String {
    let tag = element_tag(element).unwrap_or(UNKNOWN_TAG);
    match name {
        Some(name) if !name.is_empty() => format!("{tag}({name})"),
        _ => tag.to_string(),
    }
}

/// Payload text for a node header.
///
/// `None` when the payload is `null` or the element has no tag.
pub fn node_value(element: &Value) -> Option<String> {
    let payload = element.as_object()?.values().next()?;
    if payload.is_null() {
        return None;
    }
    Some(spaced_json(payload))
}

/// Compact JSON with one space after every `:` and `,`, strings included.
fn spaced_json(value: &Value) -> String {
    let compact = value.to_string();
    let mut out = String::with_capacity(compact.len() + compact.len() / 4);
    for c in compact.chars() {
        out.push(c);
        if matches!(c, ':' | ',') {
            out.push(' ');
        }
    }
    out
}
