//! Validation orchestrator.
//!
//! Runs rule definitions against input, stores every attempted value in
//! the values store and every failure in the error store, both addressed by
//! the same group/key policy.

pub mod address;
pub mod messages;
pub mod spec;

use serde_json::{Map, Value};

use crate::domain::error::RuleSpecError;
use crate::domain::report::ValidationReport;
use crate::domain::rules::Messages;
use crate::domain::value_path;

pub use messages::MessageSources;
pub use spec::{FieldRules, RuleDefinition, RuleList, RuleSpec, RuleSpecOptions, Rules};

/// Presentation settings fixed for the lifetime of a [`Validator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorOptions {
    /// Key error entries by rule identifier. Otherwise entries are plain lists.
    pub show_rule_names: bool,
    /// Store errors under literal dotted keys instead of nested objects.
    pub dot_error_keys: bool,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            show_rule_names: true,
            dot_error_keys: false,
        }
    }
}

impl ValidatorOptions {
    pub fn disable_rule_names(mut self) -> Self {
        self.show_rule_names = false;
        self
    }

    pub fn use_dot_error_keys(mut self) -> Self {
        self.dot_error_keys = true;
        self
    }
}

/// Request-scoped validator. Stores accumulate across `validate` calls until
/// [`Validator::reset`]; use one instance per logical validation run.
#[derive(Debug, Clone)]
pub struct Validator {
    options: ValidatorOptions,
    default_messages: Messages,
    values: Value,
    errors: Value,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(Messages::new())
    }
}

impl Validator {
    pub fn new(default_messages: Messages) -> Self {
        Self::with_options(default_messages, ValidatorOptions::default())
    }

    pub fn with_options(default_messages: Messages, options: ValidatorOptions) -> Self {
        Self {
            options,
            default_messages,
            values: empty_store(),
            errors: empty_store(),
        }
    }

    pub fn options(&self) -> ValidatorOptions {
        self.options
    }

    /// Validates `input` against `rules`.
    ///
    /// Object input takes field rules and returns the whole values store.
    /// Any other input takes a single definition and returns the value stored
    /// for it (`null` if absent). Rule failures land in the error store; only
    /// a malformed rule definition returns `Err`, before anything is stored.
    pub fn validate(
        &mut self,
        input: &Value,
        rules: &Rules,
        group: Option<&str>,
        global_messages: &Messages,
    ) -> Result<Value, RuleSpecError> {
        match (input, rules) {
            (Value::Object(_), Rules::Fields(fields)) => {
                self.validate_fields(input, fields, group, global_messages)
            }
            (Value::Object(_), Rules::Single(_)) => Err(RuleSpecError::FieldRulesRequired),
            (_, Rules::Single(definition)) => {
                self.validate_value(input, definition, group, global_messages)
            }
            (_, Rules::Fields(_)) => Err(RuleSpecError::SingleRulesRequired),
        }
    }

    /// Validates each declared field of `input`, reading it by dot path.
    pub fn validate_fields(
        &mut self,
        input: &Value,
        rules: &FieldRules,
        group: Option<&str>,
        global_messages: &Messages,
    ) -> Result<Value, RuleSpecError> {
        let specs = rules
            .iter()
            .map(|(key, definition)| RuleSpec::new(definition, Some(key), group))
            .collect::<Result<Vec<_>, _>>()?;

        for spec in &specs {
            let value = value_path::get_or(input, spec.key(), Value::Null);
            self.validate_input(&value, spec, global_messages);
        }

        Ok(self.values.clone())
    }

    /// Validates one scalar and returns the value stored for it.
    pub fn validate_value(
        &mut self,
        input: &Value,
        definition: &RuleDefinition,
        group: Option<&str>,
        global_messages: &Messages,
    ) -> Result<Value, RuleSpecError> {
        let spec = RuleSpec::new(definition, None, group)?;
        self.validate_input(input, &spec, global_messages);

        let address = spec.address();
        Ok(self.value(&address).cloned().unwrap_or(Value::Null))
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        value_path::get(&self.values, Some(key))
    }

    pub fn values(&self) -> &Value {
        &self.values
    }

    pub fn is_valid(&self) -> bool {
        self.errors.as_object().is_none_or(Map::is_empty)
    }

    pub fn errors(&self) -> &Value {
        &self.errors
    }

    /// Error entry or subtree at `key`, or an empty object.
    pub fn errors_at(&self, key: &str) -> Value {
        value_path::get_or_else(&self.errors, Some(key), empty_store)
    }

    /// Error store as one level of dotted paths ending in the rule identifier
    /// (or list of messages when rule names are disabled).
    pub fn flat_errors(&self) -> Map<String, Value> {
        value_path::flatten(&self.errors, "")
    }

    /// First message (or first nested entry) stored at `key`.
    pub fn error(&self, key: &str) -> Option<&Value> {
        match value_path::get(&self.errors, Some(key))? {
            Value::Array(items) => items.first(),
            Value::Object(map) => map.values().next(),
            scalar => Some(scalar),
        }
    }

    /// Clears both stores. Options and default messages are kept.
    pub fn reset(&mut self) {
        self.values = empty_store();
        self.errors = empty_store();
    }

    pub fn report(&self) -> ValidationReport {
        ValidationReport {
            valid: self.is_valid(),
            values: self.values.clone(),
            errors: self.errors.clone(),
        }
    }

    fn validate_input(&mut self, input: &Value, spec: &RuleSpec, global_messages: &Messages) {
        let address = spec.address();

        if let Err(failure) = spec.rules().assert(input) {
            let entry = messages::resolve_entry(
                &failure,
                MessageSources {
                    defaults: &self.default_messages,
                    global: global_messages,
                    field: spec.messages(),
                },
                self.options.show_rule_names,
            );
            self.store_error(&address, entry);
        }

        // The attempted value is kept even when validation failed.
        value_path::set(&mut self.values, Some(&address), input.clone());
    }

    fn store_error(&mut self, address: &str, entry: Value) {
        if !self.options.dot_error_keys {
            value_path::set(&mut self.errors, Some(address), entry);
            return;
        }

        if !self.errors.is_object() {
            self.errors = empty_store();
        }
        if let Value::Object(map) = &mut self.errors {
            map.insert(address.to_string(), entry);
        }
    }
}

fn empty_store() -> Value {
    Value::Object(Map::new())
}
