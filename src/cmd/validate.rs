use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::error::{RuleSpecError, ValidateError};
use crate::domain::report::ValidationReport;
use crate::domain::rules::Messages;
use crate::engine::validator::{Rules, Validator, ValidatorOptions};
use crate::io::{self, Format, reader};

/// Input arguments for validate command execution API.
#[derive(Debug, Clone, Default)]
pub struct ValidateCommandArgs {
    pub input: Option<PathBuf>,
    pub from: Option<Format>,
    pub rules: PathBuf,
    pub group: Option<String>,
    pub messages: Option<PathBuf>,
    pub global_messages: Option<PathBuf>,
    pub options: ValidatorOptions,
}

/// Structured command response that carries exit-code mapping and JSON payload.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ValidateCommandResponse {
    pub exit_code: i32,
    pub payload: Value,
}

pub fn run_with_stdin<R: Read>(args: &ValidateCommandArgs, stdin: R) -> ValidateCommandResponse {
    match execute(args, stdin) {
        Ok(report) => ValidateCommandResponse {
            exit_code: if report.valid { 0 } else { 2 },
            payload: report.payload,
        },
        Err(error @ ValidateError::SerializeReport { .. }) => {
            error_response(1, "internal_error", &error)
        }
        Err(error) => error_response(3, error_kind(&error), &error),
    }
}

fn error_response(
    exit_code: i32,
    kind: &'static str,
    error: &ValidateError,
) -> ValidateCommandResponse {
    ValidateCommandResponse {
        exit_code,
        payload: json!({
            "error": kind,
            "message": error.to_string(),
            "code": exit_code,
            "details": error_details(error),
        }),
    }
}

fn error_details(error: &ValidateError) -> Value {
    match error {
        ValidateError::ResolveFormat { label, .. }
        | ValidateError::Read { label, .. }
        | ValidateError::Messages { label, .. } => {
            json!({"command": "validate", "source": label})
        }
        ValidateError::Open { label, path, .. } => {
            json!({"command": "validate", "source": label, "path": path})
        }
        ValidateError::Rules(_) => json!({"command": "validate", "source": "rules"}),
        ValidateError::SerializeReport { .. } => json!({"command": "validate"}),
    }
}

/// Steps reported by `--emit-pipeline`.
pub fn pipeline_steps() -> Vec<String> {
    [
        "load_rules",
        "load_message_tables",
        "read_input",
        "build_rule_specs",
        "assert_rules",
        "resolve_messages",
        "emit_report",
    ]
    .into_iter()
    .map(ToOwned::to_owned)
    .collect()
}

/// Ordering guarantees reported by `--emit-pipeline`.
pub fn deterministic_guards() -> Vec<String> {
    [
        "fields_validated_in_declaration_order",
        "object_key_order_preserved",
        "message_priority_engine_defaults_global_field",
    ]
    .into_iter()
    .map(ToOwned::to_owned)
    .collect()
}

struct SerializedReport {
    valid: bool,
    payload: Value,
}

fn execute<R: Read>(args: &ValidateCommandArgs, stdin: R) -> Result<SerializedReport, ValidateError> {
    let rules_value = read_file("rules", &args.rules, None)?;
    let default_messages = load_messages("messages", args.messages.as_deref())?;
    let global_messages = load_messages("global messages", args.global_messages.as_deref())?;
    let input = load_input(args, stdin)?;

    let rules = Rules::from_value(&rules_value, input.is_object())?;
    let mut validator = Validator::with_options(default_messages, args.options);
    validator.validate(&input, &rules, args.group.as_deref(), &global_messages)?;

    let report: ValidationReport = validator.report();
    let payload = serde_json::to_value(&report)
        .map_err(|source| ValidateError::SerializeReport { source })?;
    Ok(SerializedReport {
        valid: report.valid,
        payload,
    })
}

fn load_input<R: Read>(args: &ValidateCommandArgs, stdin: R) -> Result<Value, ValidateError> {
    match &args.input {
        Some(path) => read_file("input", path, args.from),
        None => {
            let format = args.from.unwrap_or(Format::Json);
            reader::read_value(stdin, format)
                .map_err(|source| ValidateError::Read { label: "input", source })
        }
    }
}

fn load_messages(label: &'static str, path: Option<&Path>) -> Result<Messages, ValidateError> {
    let Some(path) = path else {
        return Ok(Messages::new());
    };
    let value = read_file(label, path, None)?;
    serde_json::from_value(value).map_err(|source| ValidateError::Messages { label, source })
}

fn read_file(
    label: &'static str,
    path: &Path,
    explicit: Option<Format>,
) -> Result<Value, ValidateError> {
    let format = io::resolve_format(label, explicit, Some(path))
        .map_err(|source| ValidateError::ResolveFormat { label, source })?;
    let file = File::open(path).map_err(|source| ValidateError::Open {
        label,
        path: path.display().to_string(),
        source,
    })?;
    reader::read_value(file, format).map_err(|source| ValidateError::Read { label, source })
}

fn error_kind(error: &ValidateError) -> &'static str {
    match error {
        ValidateError::Rules(RuleSpecError::FieldRulesRequired)
        | ValidateError::Rules(RuleSpecError::SingleRulesRequired) => "input_usage_error",
        ValidateError::Rules(_) => "rule_spec_error",
        _ => "input_usage_error",
    }
}
