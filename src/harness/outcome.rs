//! Test outcomes and the failures that produce them.

use std::panic::Location;
use std::time::Duration;

use gradebench_core::FaultKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where a check was invoked from, captured with `#[track_caller]`.
pub type Site = &'static Location<'static>;

/// Errored kind recorded for a test whose check was assembled incorrectly.
pub const MISCONFIGURED_KIND: &str = "HarnessConfiguration";
/// Errored kind recorded for an isolated test process that died without reporting.
pub const CHILD_CRASHED_KIND: &str = "ChildCrashed";

/// The result of exactly one test invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TestOutcome {
    Passed,
    Failed { message: String },
    Errored { kind: String, message: String },
    TimedOut { after: Duration },
}

impl TestOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, TestOutcome::Passed)
    }

    pub fn errored(kind: impl Into<String>, message: impl Into<String>) -> Self {
        TestOutcome::Errored {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

/// Why a check rejected the candidate.
///
/// Every variant remembers the [`Site`] of the check that produced it so `--show-traces` can point at
/// the failing assertion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckFailure {
    /// The actual value differs from the expected one under the active comparator.
    #[error("{message}")]
    Mismatch { message: String, site: Site },

    /// An argument flagged as read-only was modified. `ordinal` is 1-indexed.
    #[error("{message}")]
    MutationViolation { ordinal: usize, message: String, site: Site },

    /// The candidate raised a fault that was not the expected one.
    #[error("{message}")]
    UnexpectedFault { kind: FaultKind, message: String, site: Site },

    /// The check itself was assembled incorrectly; a defect in the test, not the candidate.
    #[error("misconfigured check: {message}")]
    Misconfigured { message: String, site: Site },
}

impl CheckFailure {
    #[track_caller]
    pub fn mismatch(message: impl Into<String>) -> Self {
        CheckFailure::Mismatch {
            message: message.into(),
            site: Location::caller(),
        }
    }

    #[track_caller]
    pub fn mutation(ordinal: usize, message: impl Into<String>) -> Self {
        CheckFailure::MutationViolation {
            ordinal,
            message: message.into(),
            site: Location::caller(),
        }
    }

    #[track_caller]
    pub fn unexpected_fault(kind: FaultKind, message: impl Into<String>) -> Self {
        CheckFailure::UnexpectedFault {
            kind,
            message: message.into(),
            site: Location::caller(),
        }
    }

    #[track_caller]
    pub fn misconfigured(message: impl Into<String>) -> Self {
        CheckFailure::Misconfigured {
            message: message.into(),
            site: Location::caller(),
        }
    }

    pub fn site(&self) -> Site {
        match self {
            CheckFailure::Mismatch { site, .. }
            | CheckFailure::MutationViolation { site, .. }
            | CheckFailure::UnexpectedFault { site, .. }
            | CheckFailure::Misconfigured { site, .. } => site,
        }
    }

    /// Convert into the outcome recorded for the test.
    ///
    /// Mismatches and mutation violations fail the test; faults and misconfiguration error it.
    pub fn into_outcome(self, show_traces: bool) -> TestOutcome {
        let site = self.site();
        let traced = |message: String| {
            if show_traces {
                with_trace(message, &site.to_string())
            } else {
                message
            }
        };
        match self {
            CheckFailure::Mismatch { message, .. } | CheckFailure::MutationViolation { message, .. } => {
                TestOutcome::Failed {
                    message: traced(message),
                }
            }
            CheckFailure::UnexpectedFault { kind, message, .. } => TestOutcome::errored(kind.as_str(), traced(message)),
            CheckFailure::Misconfigured { message, .. } => {
                tracing::error!(%site, %message, "check is misconfigured");
                TestOutcome::errored(MISCONFIGURED_KIND, traced(message))
            }
        }
    }
}

pub(crate) fn with_trace(message: String, site: &str) -> String {
    format!("{message}\n  at {site}")
}
