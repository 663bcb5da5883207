//! CLI for the attendance record store.
//!
//! Runs one command per invocation: loads the data file, executes `mark`,
//! `view` or `stats`, saves if attendance was recorded, and prints a single
//! JSON object on stdout. Diagnostics go to stderr.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use attendance::command;
use attendance::error::ArgumentError;
use attendance::storage::{DEFAULT_DATA_FILE, DataFile};
use attendance::Response;
use clap::Parser;
use clap::builder::BoolishValueParser;
use clap::error::{ContextKind, ContextValue, ErrorKind};
use tracing_subscriber::EnvFilter;

/// Default log filter when neither `--log-level` nor `RUST_LOG` is set.
const DEFAULT_LOG_LEVEL: &str = "warn";

/// attendance — Mark and view student attendance.
#[derive(Parser)]
#[command(name = "attendance", version, about)]
struct Cli {
    /// Path to the data file.
    #[arg(long, env = "ATTENDANCE_DATA_FILE", default_value = DEFAULT_DATA_FILE)]
    data_file: PathBuf,

    /// Require positive roll numbers and YYYY-MM-DD dates.
    #[arg(long, env = "ATTENDANCE_STRICT", value_parser = BoolishValueParser::new())]
    strict: bool,

    /// Log filter for stderr diagnostics (e.g. "debug", "attendance=trace").
    #[arg(long, env = "ATTENDANCE_LOG")]
    log_level: Option<String>,

    /// Command to run: mark, view, or stats.
    command: Option<String>,

    /// Arguments for the command (`mark <roll_no> <date>`, `view <roll_no>`).
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) if e.kind() == ErrorKind::UnknownArgument => {
            // A leading token clap does not know is a command name nobody
            // defined, e.g. `attendance -x`.
            let command = match e.get(ContextKind::InvalidArg) {
                Some(ContextValue::String(arg)) => arg.clone(),
                _ => String::new(),
            };
            let err = ArgumentError::UnknownCommand { command };
            println!("{}", Response::error(err).to_json());
            return;
        }
        Err(e) => {
            let rendered = e.to_string();
            let message = rendered.lines().next().unwrap_or("invalid arguments");
            println!("{}", Response::error(message.trim_start_matches("error: ")).to_json());
            std::process::exit(1);
        }
    };

    init_tracing(cli.log_level.as_deref());

    let Some(name) = cli.command else {
        println!("{}", Response::error(ArgumentError::MissingCommand).to_json());
        std::process::exit(1);
    };

    let response = cmd_run(&cli.data_file, &name, &cli.args, cli.strict);
    println!("{}", response.to_json());
}

/// Implements `attendance <command> [args...]`.
///
/// A write failure never changes the response: a mark that could not be
/// saved is still reported as recorded, with the error logged.
fn cmd_run(data_file: &Path, name: &str, args: &[String], strict: bool) -> Response {
    command::invoke(&DataFile::new(data_file), name, args, strict)
}

/// Sends tracing output to stderr so stdout carries only the response.
fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}
