//! CLI module for gradebench
//!
//! Grading binaries build their list of [`TestCase`]s and hand it to [`run_main`], which parses the
//! standard suite flags, runs the batch and exits with a status reflecting the result.
//!
//! ## Flags
//!
//! - `--timeout <SECONDS>` - run each test in an isolated process with this deadline
//! - `--show-traces` - append the failing check's location to messages
//! - `--grading-file <PATH>` - write grading columns instead of printing the log
//! - `--warnings <once|ignore|always>` - display policy for unexpected-return warnings
//! - `-k <SUBSTRING>` - only run tests whose id contains the substring
//!
//! ## Exit codes
//!
//! `0` when every test passed, `1` when any test failed, `2` when the harness itself failed.
//!
//! ## Design
//!
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run_main()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use std::fmt;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{Args, Parser};

use crate::harness::{Suite, SuiteOptions, TestCase, WarningFilter};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
    pub const HARNESS_ERROR: ExitCode = ExitCode(2);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a usage error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Create a harness error (exit code 2).
    pub fn harness(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::HARNESS_ERROR)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Suite options as command-line flags; flatten into a grading binary's own parser.
#[derive(Args, Debug, Clone, Default)]
pub struct SuiteArgs {
    /// Per-test wall-clock limit; each test then runs in its own process
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<f64>,

    /// Append the location of the failing check to failure messages
    #[arg(long)]
    pub show_traces: bool,

    /// Write comma-separated grading columns to this file instead of printing the log
    #[arg(long, value_name = "PATH")]
    pub grading_file: Option<PathBuf>,

    /// Display policy for unexpected-return warnings
    #[arg(long = "warnings", value_enum, default_value_t = WarningFilter::Once)]
    pub warning_filter: WarningFilter,

    /// Only run tests whose id contains this substring
    #[arg(short = 'k', long = "filter", value_name = "SUBSTRING")]
    pub filter: Option<String>,
}

impl SuiteArgs {
    /// Validate the flags and build [`SuiteOptions`].
    pub fn to_options(&self) -> CliResult<SuiteOptions> {
        let mut options = SuiteOptions::new()
            .with_show_traces(self.show_traces)
            .with_warning_filter(self.warning_filter);
        if let Some(seconds) = self.timeout {
            let timeout = Duration::try_from_secs_f64(seconds)
                .ok()
                .filter(|t| !t.is_zero())
                .ok_or_else(|| CliError::failure(format!("Error: --timeout must be a positive number of seconds, got {seconds}")))?;
            options = options.with_timeout(timeout);
        }
        if let Some(path) = &self.grading_file {
            options = options.with_grading_file(path);
        }
        if let Some(filter) = &self.filter {
            options = options.with_filter(filter);
        }
        Ok(options)
    }
}

/// Run a batch of grading tests
#[derive(Parser, Debug)]
#[command(name = "gradebench")]
#[command(version)]
#[command(about = "Run a batch of grading tests", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub suite: SuiteArgs,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called on the parent side. All
/// other functions return `CliResult` and errors are handled here.
pub fn run_main(cases: Vec<TestCase>) {
    let cli = Cli::parse();

    match execute(&cli.suite, cases) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Run the batch described by `args` and map the result to an exit code.
pub fn execute(args: &SuiteArgs, cases: Vec<TestCase>) -> CliResult<ExitCode> {
    let options = args.to_options()?;
    let suite = Suite::new(cases).map_err(|e| CliError::harness(format!("Error: {e}")))?;
    let aggregator = suite
        .run_and_report(&options)
        .map_err(|e| CliError::harness(format!("Error: {e}")))?;
    Ok(if aggregator.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

// ============================================================================
// Tests
// ============================================================================
