use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message table keyed by rule identifier (or bare rule name).
pub type Messages = BTreeMap<String, String>;

/// Keys accepted by a field options map.
pub const OPTION_KEYS: [&str; 3] = ["rules", "messages", "group"];

/// Serialized form of one built-in rule or combinator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum RuleConfig {
    NotBlank,
    NotEmpty,
    NoWhitespace,
    Numeric,
    /// Letters plus the given extra characters.
    Alpha(String),
    /// Letters and digits plus the given extra characters.
    Alnum(String),
    Length(LengthRule),
    Regex(String),
    AllOf(Vec<RuleExpr>),
    OneOf(Vec<RuleExpr>),
    Optional(Box<RuleExpr>),
}

/// A rule expression: one rule, or a list that must all pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RuleExpr {
    Rule(RuleConfig),
    List(Vec<RuleExpr>),
}

/// Inclusive length boundaries.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LengthRule {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

/// Serialized field options map (`rules`, `messages`, `group`).
///
/// `rules` stays raw so a missing or malformed value can be reported against
/// the field key instead of as a generic parse error.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RuleOptionsConfig {
    pub rules: Option<Value>,
    pub messages: Messages,
    pub group: Option<String>,
}
