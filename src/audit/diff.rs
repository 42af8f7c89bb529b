//! Field-level diffs for audit entries

use serde_json::{Map, Value};

/// Longest string value shown verbatim in a diff
const MAX_STRING_DISPLAY: usize = 40;

/// Describe how `after` differs from `before`
///
/// Nested objects are walked and reported with dotted paths
/// (`name.first: "Ada" -> "Augusta"`). Returns `None` when nothing changed.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let mut changes = Vec::new();
    collect_changes("", before, after, &mut changes);

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn collect_changes(path: &str, before: &Value, after: &Value, out: &mut Vec<String>) {
    match (before, after) {
        (Value::Object(b), Value::Object(a)) => diff_objects(path, b, a, out),
        _ if before != after => {
            let label = if path.is_empty() { "value" } else { path };
            out.push(format!(
                "{}: {} -> {}",
                label,
                format_value(before),
                format_value(after)
            ));
        }
        _ => {}
    }
}

fn diff_objects(path: &str, before: &Map<String, Value>, after: &Map<String, Value>, out: &mut Vec<String>) {
    let join = |key: &str| {
        if path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", path, key)
        }
    };

    for (key, old) in before {
        match after.get(key) {
            Some(new) => collect_changes(&join(key), old, new, out),
            None => out.push(format!("{}: {} -> (removed)", join(key), format_value(old))),
        }
    }

    for (key, new) in after {
        if !before.contains_key(key) {
            out.push(format!("{}: (added) -> {}", join(key), format_value(new)));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) if s.chars().count() > MAX_STRING_DISPLAY => {
            let head: String = s.chars().take(MAX_STRING_DISPLAY - 3).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(fields) => format!("{{{} fields}}", fields.len()),
        other => other.to_string(),
    }
}
