//! Dot-path addressing over nested JSON objects.
//!
//! Objects are the only containers: a path descends through `Value::Object`
//! entries one `.`-separated segment at a time. Arrays and scalars are leaves.

use serde_json::{Map, Value};

/// Reads the value at `path`.
///
/// `None` yields the whole container. A literal key equal to `path` wins over
/// dot decomposition, so `{"a.b": 1}` answers `a.b` directly.
pub fn get<'a>(container: &'a Value, path: Option<&str>) -> Option<&'a Value> {
    let Some(path) = path else {
        return Some(container);
    };

    if let Some(found) = container.as_object().and_then(|map| map.get(path)) {
        return Some(found);
    }

    let mut current = container;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Reads the value at `path`, falling back to `default` when it is missing.
pub fn get_or(container: &Value, path: Option<&str>, default: Value) -> Value {
    get(container, path).cloned().unwrap_or(default)
}

/// Reads the value at `path`, evaluating `default` only when it is missing.
pub fn get_or_else<F>(container: &Value, path: Option<&str>, default: F) -> Value
where
    F: FnOnce() -> Value,
{
    get(container, path).cloned().unwrap_or_else(default)
}

/// Writes `value` at `path`, creating intermediate objects as needed.
///
/// `None` replaces the whole container. Any non-object found on the way
/// (including the container itself) is overwritten by an empty object.
pub fn set<'a>(container: &'a mut Value, path: Option<&str>, value: Value) -> &'a mut Value {
    let Some(path) = path else {
        *container = value;
        return container;
    };

    let segments: Vec<&str> = path.split('.').collect();
    insert_at(container, &segments, value);
    container
}

/// Flattens nested objects into one level keyed by `prefix` + dotted path.
///
/// Empty objects contribute no entries.
pub fn flatten(container: &Value, prefix: &str) -> Map<String, Value> {
    let mut flat = Map::new();
    if let Value::Object(map) = container {
        flatten_into(map, prefix, &mut flat);
    }
    flat
}

fn flatten_into(map: &Map<String, Value>, prefix: &str, flat: &mut Map<String, Value>) {
    for (key, value) in map {
        match value {
            Value::Object(nested) => flatten_into(nested, &format!("{prefix}{key}."), flat),
            leaf => {
                flat.insert(format!("{prefix}{key}"), leaf.clone());
            }
        }
    }
}

fn insert_at(target: &mut Value, segments: &[&str], value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        *target = value;
        return;
    };
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    if let Value::Object(map) = target {
        let child = map.entry(head.to_string()).or_insert(Value::Null);
        insert_at(child, rest, value);
    }
}
