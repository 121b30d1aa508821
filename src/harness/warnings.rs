//! Soft warnings: diagnostics that never fail a test.
//!
//! Checks raise warnings through [`warn`] into a per-thread pending list. The executor drains that list
//! around each test with [`capture`] and hands the warnings to the batch's [`WarningDisplay`], which
//! applies the configured [`WarningFilter`] and prints what survives. Isolated test processes ship their
//! captured warnings back with the outcome, so "once" holds across the whole batch.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const UNEXPECTED_RETURN_MESSAGE: &str =
    "A function that is meant to modify its argument(s) returned a non-None value.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WarningCategory {
    /// An in-place candidate returned something.
    UnexpectedReturn,
    Deprecation,
}

impl WarningCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            WarningCategory::UnexpectedReturn => "UnexpectedReturnWarning",
            WarningCategory::Deprecation => "DeprecationWarning",
        }
    }
}

impl fmt::Display for WarningCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SoftWarning {
    pub category: WarningCategory,
    pub message: String,
}

impl fmt::Display for SoftWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category, self.message)
    }
}

thread_local! {
    static PENDING: RefCell<Vec<SoftWarning>> = const { RefCell::new(Vec::new()) };
}

/// Raise a soft warning from inside a check.
pub fn warn(category: WarningCategory, message: impl Into<String>) {
    let warning = SoftWarning {
        category,
        message: message.into(),
    };
    tracing::debug!(%warning, "soft warning raised");
    PENDING.with(|pending| pending.borrow_mut().push(warning));
}

/// Run `f` and return what it produced together with every warning it raised.
///
/// Warnings raised before the call are left pending for the enclosing scope.
pub fn capture<R>(f: impl FnOnce() -> R) -> (R, Vec<SoftWarning>) {
    let outer = PENDING.with(|pending| pending.take());
    let result = f();
    let raised = PENDING.with(|pending| pending.replace(outer));
    (result, raised)
}

/// Display policy for [`WarningCategory::UnexpectedReturn`] warnings.
///
/// Deprecation warnings are always shown once per batch regardless of this policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum WarningFilter {
    /// Show each distinct warning the first time it is raised.
    #[default]
    Once,
    /// Never show them.
    Ignore,
    /// Show every occurrence.
    Always,
}

impl FromStr for WarningFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "once" => Ok(WarningFilter::Once),
            "ignore" => Ok(WarningFilter::Ignore),
            "always" => Ok(WarningFilter::Always),
            other => Err(format!("unknown warning filter `{other}`, expected once, ignore or always")),
        }
    }
}

/// Batch-scoped display state; a fresh one is created for every batch run.
#[derive(Debug)]
pub struct WarningDisplay {
    filter: WarningFilter,
    shown: HashSet<SoftWarning>,
}

impl WarningDisplay {
    pub fn new(filter: WarningFilter) -> Self {
        Self {
            filter,
            shown: HashSet::new(),
        }
    }

    /// Decide whether `warning` should be printed, remembering it for "once" semantics.
    pub fn admit(&mut self, warning: &SoftWarning) -> bool {
        let filter = match warning.category {
            WarningCategory::Deprecation => WarningFilter::Once,
            WarningCategory::UnexpectedReturn => self.filter,
        };
        match filter {
            WarningFilter::Ignore => false,
            WarningFilter::Always => true,
            WarningFilter::Once => self.shown.insert(warning.clone()),
        }
    }

    /// Print every admitted warning to stderr in yellow.
    pub fn emit(&mut self, warnings: &[SoftWarning]) {
        for warning in warnings {
            if self.admit(warning) {
                eprintln!("\x1b[93m{warning}\x1b[0m");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn unexpected_return() -> SoftWarning {
        SoftWarning {
            category: WarningCategory::UnexpectedReturn,
            message: UNEXPECTED_RETURN_MESSAGE.to_string(),
        }
    }

    #[test]
    fn capture_isolates_nested_scopes() {
        warn(WarningCategory::Deprecation, "outer");
        let ((), inner) = capture(|| warn(WarningCategory::UnexpectedReturn, UNEXPECTED_RETURN_MESSAGE));
        assert_eq!(inner, vec![unexpected_return()]);
        let ((), outer) = capture(|| {});
        assert!(outer.is_empty());
        // the pre-existing warning is still pending for the enclosing scope
        let pending = PENDING.with(|p| p.take());
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].message, "outer");
    }

    #[test]
    fn once_shows_each_distinct_warning_a_single_time() {
        let mut display = WarningDisplay::new(WarningFilter::Once);
        assert!(display.admit(&unexpected_return()));
        assert!(!display.admit(&unexpected_return()));
    }

    #[test]
    fn ignore_and_always() {
        let mut ignore = WarningDisplay::new(WarningFilter::Ignore);
        assert!(!ignore.admit(&unexpected_return()));
        let mut always = WarningDisplay::new(WarningFilter::Always);
        assert!(always.admit(&unexpected_return()));
        assert!(always.admit(&unexpected_return()));
    }

    #[test]
    fn deprecations_are_shown_once_even_when_ignoring() {
        let deprecation = SoftWarning {
            category: WarningCategory::Deprecation,
            message: "old".to_string(),
        };
        let mut display = WarningDisplay::new(WarningFilter::Ignore);
        assert!(display.admit(&deprecation));
        assert!(!display.admit(&deprecation));
    }

    #[test]
    fn filters_parse_from_their_names() {
        assert_eq!("once".parse::<WarningFilter>().unwrap(), WarningFilter::Once);
        assert_eq!("ignore".parse::<WarningFilter>().unwrap(), WarningFilter::Ignore);
        assert!("loud".parse::<WarningFilter>().is_err());
    }
}
