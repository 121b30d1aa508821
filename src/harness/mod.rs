//! The verification harness.
//!
//! ## Modules
//!
//! - `generic` - outcome comparator (`GenericTest`, `generic_test`, `assert_array_equals`)
//! - `guard` - mutation guard for read-only arguments
//! - `behavior` - scripted call sequences against live objects
//! - `executor` - inline and process-isolated test execution
//! - `aggregator` - ordered outcomes, failure log and grading columns
//! - `suite` - test definitions, batch options and the batch runner
//! - `warnings` - soft warnings and their batch-scoped display filter
//!
//! ## Design
//!
//! Checks return `Result<(), CheckFailure>` and never panic on a candidate's behalf. Every test is
//! converted to exactly one `TestOutcome` at the executor boundary, so nothing a candidate does can abort
//! the batch. `HarnessError` is reserved for defects in the harness itself.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod aggregator;
mod behavior;
mod executor;
mod generic;
mod guard;
mod outcome;
mod suite;
mod warnings;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub use aggregator::{ResultAggregator, TIMEOUT_KIND};
pub use behavior::Behavior;
pub use executor::{CHILD_ENV, Execution, InlineExecutor, ProcessExecutor, REPORT_MARKER, TestExecutor, run_inline};
#[allow(deprecated)]
pub use generic::run_generic_test;
pub use generic::{Args, Comparator, Expected, GenericTest, Renderer, assert_array_equals, generic_test};
pub use guard::{MutationGuard, NoMod, ordinal};
pub use outcome::{CHILD_CRASHED_KIND, CheckFailure, MISCONFIGURED_KIND, Site, TestOutcome};
pub use suite::{Suite, SuiteOptions, TestCase, build_and_run_watched_suite};
pub use warnings::{
    SoftWarning, UNEXPECTED_RETURN_MESSAGE, WarningCategory, WarningDisplay, WarningFilter, capture, warn,
};

/// Errors in the harness itself, as opposed to anything a candidate did.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("duplicate test id `{0}` in suite")]
    DuplicateTest(String),

    #[error("no test named `{0}` in this suite")]
    UnknownTest(String),

    #[error("failed to spawn isolated test `{test}`: {source}")]
    Spawn {
        test: String,
        #[source]
        source: io::Error,
    },

    #[error("malformed report from isolated test `{test}`: {source}")]
    Protocol {
        test: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write grading file {path:?}: {source}")]
    GradingFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
