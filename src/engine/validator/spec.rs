use serde_json::Value;

use crate::domain::error::RuleSpecError;
use crate::domain::rules::{Messages, OPTION_KEYS, RuleExpr, RuleOptionsConfig};
use crate::engine::rule::config::{build_composite, declared_len};
use crate::engine::rule::{Composite, RuleNode, compose_rules};

use super::address;

/// How the rules of one field (or of a scalar input) are declared.
#[derive(Debug, Clone)]
pub enum RuleDefinition {
    /// A pre-built composite, used as-is.
    Composite(Composite),
    /// Rules plus optional per-field messages and group.
    Options(RuleSpecOptions),
    /// Declared without any definition, e.g. `"name": null`.
    Missing,
}

impl RuleDefinition {
    /// Reads a definition from serialized data.
    ///
    /// Objects carrying any of `rules`, `messages`, `group` are options maps;
    /// other strings, lists and objects are rule expressions.
    pub fn from_value(key: Option<&str>, value: &Value) -> Result<Self, RuleSpecError> {
        let key_label = || RuleSpecError::key_label(key);
        match value {
            Value::Null => Ok(Self::Missing),
            Value::Object(map) if map.keys().any(|name| OPTION_KEYS.contains(&name.as_str())) => {
                let config: RuleOptionsConfig =
                    serde_json::from_value(value.clone()).map_err(|err| {
                        RuleSpecError::InvalidOptions {
                            key: key_label(),
                            reason: err.to_string(),
                        }
                    })?;
                let rules = match config.rules.as_ref().and_then(parse_expr) {
                    Some(expr) if declared_len(&expr) > 0 => {
                        Some(RuleList::Composite(build(key, &expr)?))
                    }
                    _ => return Err(RuleSpecError::MissingRules { key: key_label() }),
                };
                Ok(Self::Options(RuleSpecOptions {
                    rules,
                    messages: config.messages,
                    group: config.group,
                }))
            }
            Value::Object(_) | Value::String(_) | Value::Array(_) => {
                let expr: RuleExpr =
                    serde_json::from_value(value.clone()).map_err(|err| {
                        RuleSpecError::InvalidRule {
                            key: key_label(),
                            reason: err.to_string(),
                        }
                    })?;
                if declared_len(&expr) == 0 {
                    return Err(RuleSpecError::MissingRules { key: key_label() });
                }
                Ok(Self::Composite(build(key, &expr)?))
            }
            Value::Bool(_) | Value::Number(_) => {
                Err(RuleSpecError::UnrecognizedDefinition { key: key_label() })
            }
        }
    }
}

impl From<Composite> for RuleDefinition {
    fn from(value: Composite) -> Self {
        Self::Composite(value)
    }
}

impl From<RuleSpecOptions> for RuleDefinition {
    fn from(value: RuleSpecOptions) -> Self {
        Self::Options(value)
    }
}

impl From<Vec<RuleNode>> for RuleDefinition {
    fn from(value: Vec<RuleNode>) -> Self {
        Self::Options(RuleSpecOptions::new(value))
    }
}

/// Options form of a definition.
#[derive(Debug, Clone, Default)]
pub struct RuleSpecOptions {
    pub rules: Option<RuleList>,
    pub messages: Messages,
    pub group: Option<String>,
}

impl RuleSpecOptions {
    pub fn new(rules: impl Into<RuleList>) -> Self {
        Self {
            rules: Some(rules.into()),
            ..Self::default()
        }
    }

    pub fn with_message(mut self, rule: impl Into<String>, message: impl Into<String>) -> Self {
        self.messages.insert(rule.into(), message.into());
        self
    }

    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}

/// Rules inside an options map: a composite, or named rules to combine.
#[derive(Debug, Clone)]
pub enum RuleList {
    Composite(Composite),
    Rules(Vec<RuleNode>),
}

impl From<Composite> for RuleList {
    fn from(value: Composite) -> Self {
        Self::Composite(value)
    }
}

impl From<Vec<RuleNode>> for RuleList {
    fn from(value: Vec<RuleNode>) -> Self {
        Self::Rules(value)
    }
}

impl From<RuleNode> for RuleList {
    fn from(value: RuleNode) -> Self {
        Self::Rules(vec![value])
    }
}

/// Ordered field-key to definition map. Fields validate in insertion order.
#[derive(Debug, Clone, Default)]
pub struct FieldRules {
    fields: Vec<(String, RuleDefinition)>,
}

impl FieldRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: impl Into<String>, definition: impl Into<RuleDefinition>) -> Self {
        self.insert(key, definition);
        self
    }

    /// Adds a field, replacing an earlier definition for the same key in place.
    pub fn insert(&mut self, key: impl Into<String>, definition: impl Into<RuleDefinition>) {
        let key = key.into();
        let definition = definition.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = definition,
            None => self.fields.push((key, definition)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleDefinition)> {
        self.fields
            .iter()
            .map(|(key, definition)| (key.as_str(), definition))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Reads a field map from serialized data.
    pub fn from_value(value: &Value) -> Result<Self, RuleSpecError> {
        let Value::Object(map) = value else {
            return Err(RuleSpecError::FieldRulesRequired);
        };
        let mut fields = Self::new();
        for (key, definition) in map {
            fields.insert(key.as_str(), RuleDefinition::from_value(Some(key), definition)?);
        }
        Ok(fields)
    }
}

impl<K, D> FromIterator<(K, D)> for FieldRules
where
    K: Into<String>,
    D: Into<RuleDefinition>,
{
    fn from_iter<T: IntoIterator<Item = (K, D)>>(iter: T) -> Self {
        let mut fields = Self::new();
        for (key, definition) in iter {
            fields.insert(key, definition);
        }
        fields
    }
}

/// Rules handed to one `validate` call.
#[derive(Debug, Clone)]
pub enum Rules {
    /// Per-field definitions for object input.
    Fields(FieldRules),
    /// One definition for scalar input.
    Single(RuleDefinition),
}

impl Rules {
    /// Reads rules from serialized data, shaped for object or scalar input.
    pub fn from_value(value: &Value, structured: bool) -> Result<Self, RuleSpecError> {
        if structured {
            FieldRules::from_value(value).map(Self::Fields)
        } else {
            RuleDefinition::from_value(None, value).map(Self::Single)
        }
    }
}

impl From<FieldRules> for Rules {
    fn from(value: FieldRules) -> Self {
        Self::Fields(value)
    }
}

impl From<RuleDefinition> for Rules {
    fn from(value: RuleDefinition) -> Self {
        Self::Single(value)
    }
}

impl From<RuleSpecOptions> for Rules {
    fn from(value: RuleSpecOptions) -> Self {
        Self::Single(value.into())
    }
}

impl From<Composite> for Rules {
    fn from(value: Composite) -> Self {
        Self::Single(value.into())
    }
}

/// Checked rule definition for one field or scalar, with its resolved group.
#[derive(Debug, Clone)]
pub struct RuleSpec {
    rules: Composite,
    key: Option<String>,
    group: Option<String>,
    messages: Messages,
}

impl RuleSpec {
    /// Checks `definition` and resolves its group.
    ///
    /// For a field, a group declared on the definition wins over the
    /// inherited `group`. For a scalar (no key) the inherited `group` wins.
    pub fn new(
        definition: &RuleDefinition,
        key: Option<&str>,
        group: Option<&str>,
    ) -> Result<Self, RuleSpecError> {
        let key = non_empty(key);
        let inherited = non_empty(group);
        let (rules, messages, group) = match definition {
            RuleDefinition::Missing => {
                return Err(RuleSpecError::UnrecognizedDefinition {
                    key: RuleSpecError::key_label(key),
                });
            }
            RuleDefinition::Composite(composite) => (composite.clone(), Messages::new(), inherited),
            RuleDefinition::Options(options) => {
                let rules = match &options.rules {
                    Some(RuleList::Composite(composite)) => composite.clone(),
                    Some(RuleList::Rules(rules)) if !rules.is_empty() => {
                        compose_rules(rules.iter().cloned())
                    }
                    _ => {
                        return Err(RuleSpecError::MissingRules {
                            key: RuleSpecError::key_label(key),
                        });
                    }
                };
                let own = non_empty(options.group.as_deref());
                let group = match key {
                    Some(_) => own.or(inherited),
                    None => inherited.or(own),
                };
                (rules, options.messages.clone(), group)
            }
        };

        Ok(Self {
            rules,
            key: key.map(ToOwned::to_owned),
            group: group.map(ToOwned::to_owned),
            messages,
        })
    }

    pub fn rules(&self) -> &Composite {
        &self.rules
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    pub fn has_messages(&self) -> bool {
        !self.messages.is_empty()
    }

    /// Store address for this field's value and error entry.
    pub fn address(&self) -> String {
        address::resolve(self.key(), self.group())
    }
}

fn parse_expr(value: &Value) -> Option<RuleExpr> {
    match value {
        Value::Null => None,
        Value::String(text) if text.is_empty() => None,
        other => serde_json::from_value(other.clone()).ok(),
    }
}

fn build(key: Option<&str>, expr: &RuleExpr) -> Result<Composite, RuleSpecError> {
    build_composite(expr).map_err(|reason| RuleSpecError::InvalidRule {
        key: RuleSpecError::key_label(key),
        reason,
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}
