// Dot-path access into nested widget parameters
// Author: Gabriel Demetrios Lafis

use serde_json::{Map, Value as JsonValue};

use super::WidgetParams;

fn segments(path: &str) -> Option<Vec<&str>> {
    let parts: Vec<&str> = path.split('.').collect();
    if parts.iter().any(|p| p.is_empty()) {
        None
    } else {
        Some(parts)
    }
}

/// Read the value at a dot-delimited path
pub fn get_nested_param<'a>(params: &'a WidgetParams, path: &str) -> Option<&'a JsonValue> {
    let parts = segments(path)?;
    let (last, parents) = parts.split_last()?;

    let mut current = params;
    for part in parents {
        current = current.get(*part)?.as_object()?;
    }
    current.get(*last)
}

/// Return a copy of `params` with `value` stored at a dot-delimited path
///
/// Intermediate objects are created as needed; a non-object value in the way
/// is replaced by an object. Sibling keys are left untouched.
pub fn set_nested_param(params: &WidgetParams, path: &str, value: JsonValue) -> WidgetParams {
    let mut updated = params.clone();
    match segments(path) {
        Some(parts) => set_in(&mut updated, &parts, value),
        None => log::warn!("Ignoring parameter update with malformed path '{}'", path),
    }
    updated
}

fn set_in(map: &mut Map<String, JsonValue>, parts: &[&str], value: JsonValue) {
    match parts {
        [] => {}
        [last] => {
            map.insert(last.to_string(), value);
        }
        [head, rest @ ..] => {
            let entry = map
                .entry(head.to_string())
                .or_insert_with(|| JsonValue::Object(Map::new()));
            if !entry.is_object() {
                *entry = JsonValue::Object(Map::new());
            }
            if let JsonValue::Object(child) = entry {
                set_in(child, rest, value);
            }
        }
    }
}

/// Dot paths of every leaf value, in map order
pub fn leaf_paths(params: &WidgetParams) -> Vec<String> {
    let mut paths = Vec::new();
    collect_leaves(params, "", &mut paths);
    paths
}

fn collect_leaves(map: &Map<String, JsonValue>, prefix: &str, out: &mut Vec<String>) {
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            JsonValue::Object(child) if !child.is_empty() => collect_leaves(child, &path, out),
            _ => out.push(path),
        }
    }
}
