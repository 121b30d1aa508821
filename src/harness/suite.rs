//! Test definitions, batch options and the watched batch runner.

use std::collections::HashSet;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use super::HarnessError;
use super::aggregator::ResultAggregator;
use super::executor::{CHILD_ENV, InlineExecutor, ProcessExecutor, TestExecutor, serve_child};
use super::outcome::CheckFailure;
use super::warnings::{WarningDisplay, WarningFilter};

type TestBody = Box<dyn Fn() -> Result<(), CheckFailure>>;

/// One named test: a body that either passes or returns the failure of its first failed check.
pub struct TestCase {
    id: String,
    description: Option<String>,
    body: TestBody,
}

impl TestCase {
    pub fn new(id: impl Into<String>, body: impl Fn() -> Result<(), CheckFailure> + 'static) -> Self {
        Self {
            id: id.into(),
            description: None,
            body: Box::new(body),
        }
    }

    /// Attach a human description, printed above the failure message in the log.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn call(&self) -> Result<(), CheckFailure> {
        (self.body)()
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("id", &self.id)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Options for one batch run.
#[derive(Debug, Clone, Default)]
pub struct SuiteOptions {
    /// Per-test wall-clock limit; `None` runs every test inline.
    pub timeout: Option<Duration>,
    /// Append the failing check's source location to failure messages.
    pub show_traces: bool,
    /// Write grading columns here instead of printing the log.
    pub grading_file: Option<PathBuf>,
    pub warning_filter: WarningFilter,
    /// Only run tests whose id contains this substring.
    pub filter: Option<String>,
}

impl SuiteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_show_traces(mut self, show_traces: bool) -> Self {
        self.show_traces = show_traces;
        self
    }

    pub fn with_grading_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.grading_file = Some(path.into());
        self
    }

    pub fn with_warning_filter(mut self, filter: WarningFilter) -> Self {
        self.warning_filter = filter;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }
}

/// An ordered batch of uniquely named tests.
#[derive(Debug)]
pub struct Suite {
    cases: Vec<TestCase>,
}

impl Suite {
    /// ## Errors
    /// [`HarnessError::DuplicateTest`] when two cases share an id.
    pub fn new(cases: impl IntoIterator<Item = TestCase>) -> Result<Self, HarnessError> {
        let cases: Vec<TestCase> = cases.into_iter().collect();
        let mut seen = HashSet::new();
        for case in &cases {
            if !seen.insert(case.id()) {
                return Err(HarnessError::DuplicateTest(case.id().to_string()));
            }
        }
        Ok(Self { cases })
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    fn find(&self, id: &str) -> Result<&TestCase, HarnessError> {
        self.cases
            .iter()
            .find(|case| case.id() == id)
            .ok_or_else(|| HarnessError::UnknownTest(id.to_string()))
    }

    /// Run every selected test sequentially and collect the outcomes.
    ///
    /// Inside an isolated child process (see [`CHILD_ENV`]) this serves the one requested test and exits
    /// the process instead of returning.
    ///
    /// ## Errors
    /// Only harness defects abort the batch: failing to spawn or talk to an isolated test. Candidate
    /// failures of every kind are recorded as outcomes.
    #[tracing::instrument(skip_all, fields(tests = self.cases.len(), timeout = ?options.timeout))]
    pub fn run(&self, options: &SuiteOptions) -> Result<ResultAggregator, HarnessError> {
        if let Ok(id) = env::var(CHILD_ENV) {
            serve_child(self.find(&id)?, options.show_traces)?;
            std::process::exit(0);
        }

        let executor: Box<dyn TestExecutor> = match options.timeout {
            Some(timeout) => Box::new(ProcessExecutor::new(timeout)),
            None => Box::new(InlineExecutor::new(options.show_traces)),
        };
        let mut display = WarningDisplay::new(options.warning_filter);
        let mut aggregator = ResultAggregator::new();
        let selected = self
            .cases
            .iter()
            .filter(|case| options.filter.as_deref().is_none_or(|f| case.id().contains(f)));
        for case in selected {
            let execution = executor.execute(case)?;
            display.emit(&execution.warnings);
            aggregator.record_described(case.id(), case.description(), execution.outcome);
        }
        tracing::info!(passed = aggregator.passed(), total = aggregator.total(), "batch finished");
        Ok(aggregator)
    }

    /// Run the batch, then write the grading file if one is configured or print the log otherwise.
    pub fn run_and_report(&self, options: &SuiteOptions) -> Result<ResultAggregator, HarnessError> {
        let aggregator = self.run(options)?;
        match &options.grading_file {
            Some(path) => aggregator
                .write_columns(path)
                .map_err(|source| HarnessError::GradingFile {
                    path: path.clone(),
                    source,
                })?,
            None => println!("{}", aggregator.render_log()),
        }
        Ok(aggregator)
    }
}

/// Assemble `cases` into a suite, run it with `options` and report the results.
pub fn build_and_run_watched_suite(
    cases: impl IntoIterator<Item = TestCase>,
    options: &SuiteOptions,
) -> Result<ResultAggregator, HarnessError> {
    Suite::new(cases)?.run_and_report(options)
}
