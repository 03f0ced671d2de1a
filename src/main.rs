use std::io;
use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand, ValueEnum};
use flexval::cmd::validate;
use flexval::domain::report::{PipelineInput, PipelineInputSource, PipelineReport};
use flexval::engine::validator::ValidatorOptions;
use flexval::io::{self as flexval_io, Format};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Debug, Parser)]
#[command(
    name = "flexval",
    version,
    about = "Field validation with layered error messages"
)]
struct Cli {
    #[arg(long, global = true, default_value_t = false)]
    emit_pipeline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate input against per-field rule definitions.
    Validate(ValidateArgs),
}

#[derive(Debug, clap::Args)]
struct ValidateArgs {
    #[arg(long)]
    rules: PathBuf,

    #[arg(long)]
    input: Option<PathBuf>,

    #[arg(long, value_enum)]
    from: Option<CliInputFormat>,

    /// Group namespace for fields without their own group.
    #[arg(long)]
    group: Option<String>,

    /// Default message table applied to every call.
    #[arg(long)]
    messages: Option<PathBuf>,

    /// Call-level message table, overriding `--messages`.
    #[arg(long)]
    global_messages: Option<PathBuf>,

    /// Report error messages as lists instead of maps keyed by rule.
    #[arg(long, default_value_t = false)]
    no_rule_names: bool,

    /// Key errors by literal dotted paths instead of nested objects.
    #[arg(long, default_value_t = false)]
    dot_error_keys: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliInputFormat {
    Json,
    Yaml,
}

impl From<CliInputFormat> for Format {
    fn from(value: CliInputFormat) -> Self {
        match value {
            CliInputFormat::Json => Self::Json,
            CliInputFormat::Yaml => Self::Yaml,
        }
    }
}

#[derive(Serialize)]
struct CliError<'a> {
    error: &'a str,
    message: String,
    code: i32,
    details: Value,
}

fn main() {
    process::exit(run());
}

fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => return handle_parse_error(error),
    };

    let emit_pipeline = cli.emit_pipeline;
    match cli.command {
        Commands::Validate(args) => run_validate(args, emit_pipeline),
    }
}

fn handle_parse_error(error: clap::Error) -> i32 {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            print!("{error}");
            0
        }
        _ => {
            emit_error(
                "input_usage_error",
                error.to_string(),
                json!({"kind": "cli_parse_error"}),
                3,
            );
            3
        }
    }
}

fn run_validate(args: ValidateArgs, emit_pipeline: bool) -> i32 {
    let from = args.from.map(Format::from);
    let pipeline_report = build_validate_pipeline_report(&args, from);

    let mut options = ValidatorOptions::default();
    if args.no_rule_names {
        options = options.disable_rule_names();
    }
    if args.dot_error_keys {
        options = options.use_dot_error_keys();
    }
    let command_args = validate::ValidateCommandArgs {
        input: args.input,
        from,
        rules: args.rules,
        group: args.group,
        messages: args.messages,
        global_messages: args.global_messages,
        options,
    };

    let stdin = io::stdin();
    let response = validate::run_with_stdin(&command_args, stdin.lock());

    let exit_code = match response.exit_code {
        0 | 2 => {
            if emit_json_stdout(&response.payload) {
                response.exit_code
            } else {
                emit_error(
                    "internal_error",
                    "failed to serialize validation report".to_string(),
                    json!({"command": "validate"}),
                    1,
                );
                1
            }
        }
        3 | 1 => {
            if emit_json_stderr(&response.payload) {
                response.exit_code
            } else {
                emit_error(
                    "internal_error",
                    "failed to serialize validation error".to_string(),
                    json!({"command": "validate"}),
                    1,
                );
                1
            }
        }
        other => {
            emit_error(
                "internal_error",
                format!("unexpected validate exit code: {other}"),
                json!({"command": "validate"}),
                1,
            );
            1
        }
    };

    if emit_pipeline {
        emit_pipeline_report(&pipeline_report);
    }
    exit_code
}

fn build_validate_pipeline_report(args: &ValidateArgs, from: Option<Format>) -> PipelineReport {
    let mut sources = Vec::with_capacity(4);
    sources.push(PipelineInputSource::path(
        "rules",
        args.rules.display().to_string(),
        format_label(flexval_io::resolve_format("rules", None, Some(args.rules.as_path())).ok()),
    ));
    for (label, path) in [
        ("messages", &args.messages),
        ("global_messages", &args.global_messages),
    ] {
        if let Some(path) = path {
            sources.push(PipelineInputSource::path(
                label,
                path.display().to_string(),
                format_label(flexval_io::resolve_format(label, None, Some(path.as_path())).ok()),
            ));
        }
    }
    match &args.input {
        Some(path) => sources.push(PipelineInputSource::path(
            "input",
            path.display().to_string(),
            format_label(flexval_io::resolve_format("input", from, Some(path.as_path())).ok()),
        )),
        None => sources.push(PipelineInputSource::stdin(
            "input",
            format_label(Some(from.unwrap_or(Format::Json))),
        )),
    }

    PipelineReport::new(
        "validate",
        PipelineInput::new(sources),
        validate::pipeline_steps(),
        validate::deterministic_guards(),
    )
    .with_option("no_rule_names", args.no_rule_names)
    .with_option("dot_error_keys", args.dot_error_keys)
}

fn format_label(format: Option<Format>) -> Option<&'static str> {
    format.map(Format::as_str)
}

fn emit_json_stdout(value: &Value) -> bool {
    match serde_json::to_string(value) {
        Ok(serialized) => {
            println!("{serialized}");
            true
        }
        Err(_) => false,
    }
}

fn emit_json_stderr(value: &Value) -> bool {
    match serde_json::to_string(value) {
        Ok(serialized) => {
            eprintln!("{serialized}");
            true
        }
        Err(_) => false,
    }
}

fn emit_pipeline_report(report: &PipelineReport) {
    match serde_json::to_string(report) {
        Ok(serialized) => eprintln!("{serialized}"),
        Err(error) => emit_error(
            "internal_error",
            format!("failed to serialize pipeline report: {error}"),
            json!({"command": "emit_pipeline"}),
            1,
        ),
    }
}

fn emit_error(error: &'static str, message: String, details: Value, code: i32) {
    let payload = CliError {
        error,
        message,
        code,
        details,
    };
    match serde_json::to_string(&payload) {
        Ok(serialized) => eprintln!("{serialized}"),
        Err(_) => eprintln!(
            "{{\"error\":\"internal_error\",\"message\":\"failed to serialize error\",\"code\":1}}"
        ),
    }
}
