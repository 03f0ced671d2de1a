use serde_json::{Map, Value};

use crate::domain::rules::Messages;
use crate::engine::rule::NestedFailure;

/// Caller-supplied message tables, lowest priority first.
#[derive(Debug, Clone, Copy)]
pub struct MessageSources<'a> {
    pub defaults: &'a Messages,
    pub global: &'a Messages,
    pub field: &'a Messages,
}

/// Builds the error entry for a failed assertion.
///
/// Engine defaults are overridden by the constructor defaults, then by the
/// call-level table, then by the field table. Falsy messages (`""` and
/// `"0"`) are dropped.
/// With `show_rule_names` the entry maps identifier to message, otherwise it
/// is the list of messages in failure order.
pub fn resolve_entry(
    failure: &NestedFailure,
    sources: MessageSources<'_>,
    show_rule_names: bool,
) -> Value {
    let identifiers = failed_identifiers(failure);
    let mut merged = Map::new();
    for (id, message) in failure.find_messages(identifiers.iter().map(String::as_str)) {
        merged.insert(id, Value::String(message));
    }

    for table in [sources.defaults, sources.global, sources.field] {
        if table.is_empty() {
            continue;
        }
        for (id, message) in failure.render_messages(table) {
            merged.insert(id, Value::String(message));
        }
    }

    merged.retain(|_, message| message.as_str().is_some_and(is_truthy));

    if show_rule_names {
        Value::Object(merged)
    } else {
        Value::Array(merged.into_iter().map(|(_, message)| message).collect())
    }
}

fn is_truthy(message: &str) -> bool {
    !message.is_empty() && message != "0"
}

/// Failed identifiers in first-seen order without repeats.
pub fn failed_identifiers(failure: &NestedFailure) -> Vec<String> {
    let mut identifiers: Vec<String> = Vec::new();
    for id in failure.failed_rule_identifiers() {
        if !identifiers.iter().any(|seen| seen == id) {
            identifiers.push(id.to_string());
        }
    }
    identifiers
}
