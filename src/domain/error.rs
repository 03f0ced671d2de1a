use thiserror::Error;

use crate::io::IoError;

/// Malformed rule definition. Always fatal for the current `validate` call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuleSpecError {
    /// Definition is neither a rule expression nor an options map.
    #[error(
        "For {key} key use only validation rules or an options map with: rules, messages, group."
    )]
    UnrecognizedDefinition { key: String },

    /// Options map without a usable `rules` entry.
    #[error(
        "Validation rules are missing or invalid on `{key}` key. Use only named validation rules."
    )]
    MissingRules { key: String },

    /// Options map carrying keys other than `rules`, `messages`, `group`.
    #[error("Invalid options on `{key}` key: {reason}. Accepted keys: rules, messages, group.")]
    InvalidOptions { key: String, reason: String },

    /// A rule expression could not be built (unknown rule, bad pattern, ...).
    #[error("Invalid rule on `{key}` key: {reason}")]
    InvalidRule { key: String, reason: String },

    /// Object input was paired with a single rule definition.
    #[error("structured input requires a map of field rules")]
    FieldRulesRequired,

    /// Scalar input was paired with a map of field rules.
    #[error("scalar input requires a single rule definition")]
    SingleRulesRequired,
}

impl RuleSpecError {
    /// Label used for the field key in messages; scalar definitions have none.
    pub fn key_label(key: Option<&str>) -> String {
        key.unwrap_or("<value>").to_string()
    }
}

/// Failures of the `validate` command outside of rule evaluation.
#[derive(Debug, Error)]
pub enum ValidateError {
    /// Input could not be resolved to a readable format.
    #[error("failed to resolve {label} format: {source}")]
    ResolveFormat {
        label: &'static str,
        #[source]
        source: IoError,
    },

    /// A file could not be opened.
    #[error("failed to open {label} file `{path}`: {source}")]
    Open {
        label: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A file or stream could not be parsed.
    #[error("failed to read {label}: {source}")]
    Read {
        label: &'static str,
        #[source]
        source: IoError,
    },

    /// A message table was not a map of strings.
    #[error("invalid {label} table: {source}")]
    Messages {
        label: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The rule definitions were rejected.
    #[error(transparent)]
    Rules(#[from] RuleSpecError),

    /// Structured report could not be serialized.
    #[error("failed to serialize validation report: {source}")]
    SerializeReport {
        #[source]
        source: serde_json::Error,
    },
}
