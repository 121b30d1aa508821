//! The result aggregator: collects outcomes in arrival order and renders the batch report.

use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use super::outcome::TestOutcome;

/// Errored kind shown for a timed-out test.
pub const TIMEOUT_KIND: &str = "TestTimeoutError";

const DIVIDER_WIDTH: usize = 40;

#[derive(Debug, Clone)]
struct Record {
    id: String,
    description: Option<String>,
    outcome: TestOutcome,
}

/// Ordered outcomes for one batch run.
///
/// Test ids are expected to be unique within a batch; [`super::Suite`] enforces that.
#[derive(Debug, Clone, Default)]
pub struct ResultAggregator {
    records: Vec<Record>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, id: impl Into<String>, outcome: TestOutcome) {
        self.record_described(id, None, outcome);
    }

    /// Record an outcome together with the test's human description, shown in the failure log.
    pub fn record_described(&mut self, id: impl Into<String>, description: Option<&str>, outcome: TestOutcome) {
        self.records.push(Record {
            id: id.into(),
            description: description.map(str::to_string),
            outcome,
        });
    }

    pub fn passed(&self) -> usize {
        self.records.iter().filter(|r| r.outcome.is_passed()).count()
    }

    pub fn total(&self) -> usize {
        self.records.len()
    }

    pub fn all_passed(&self) -> bool {
        self.passed() == self.total()
    }

    pub fn outcome(&self, id: &str) -> Option<&TestOutcome> {
        self.records.iter().find(|r| r.id == id).map(|r| &r.outcome)
    }

    pub fn outcomes(&self) -> impl Iterator<Item = (&str, &TestOutcome)> {
        self.records.iter().map(|r| (r.id.as_str(), &r.outcome))
    }

    /// Human-readable failure log.
    ///
    /// Each failing or erroring test gets one entry; entries are separated by a dashed divider and the log
    /// ends with a `passed/total tests passed.` tally under a double divider.
    pub fn render_log(&self) -> String {
        let entries: Vec<String> = self.records.iter().filter_map(log_entry).collect();
        let divider = format!("\n{}\n", "-".repeat(DIVIDER_WIDTH));
        format!(
            "\n{}\n{}\n{}/{} tests passed.\n",
            entries.join(&divider),
            "=".repeat(DIVIDER_WIDTH),
            self.passed(),
            self.total()
        )
    }

    /// Grading columns: comma-joined test ids, then comma-joined `1`/`0` pass flags in the same order.
    pub fn render_columns(&self) -> (String, String) {
        let ids: Vec<&str> = self.records.iter().map(|r| r.id.as_str()).collect();
        let flags: Vec<&str> = self
            .records
            .iter()
            .map(|r| if r.outcome.is_passed() { "1" } else { "0" })
            .collect();
        (ids.join(","), flags.join(","))
    }

    /// Write the grading columns as a two-line file, replacing any existing file.
    pub fn write_columns(&self, path: &Path) -> io::Result<()> {
        let (ids, flags) = self.render_columns();
        fs::write(path, format!("{ids}\n{flags}\n"))
    }
}

/// `StackTest.test_pop` is labelled `Stack`; ids without a `Test.` infix use their first dotted segment.
fn label(id: &str) -> &str {
    let group = id.split("Test.").next().unwrap_or(id);
    if group.len() == id.len() {
        id.split('.').next().unwrap_or(id)
    } else {
        group
    }
}

fn description_block(description: Option<&str>) -> String {
    match description {
        None => "\n".to_string(),
        Some(text) => {
            let lines: Vec<&str> = text.trim().lines().map(str::trim).collect();
            format!("{}\n", lines.join("\n"))
        }
    }
}

fn seconds(after: Duration) -> String {
    if after.subsec_nanos() == 0 {
        after.as_secs().to_string()
    } else {
        after.as_secs_f64().to_string()
    }
}

fn log_entry(record: &Record) -> Option<String> {
    let block = description_block(record.description.as_deref());
    let label = label(&record.id);
    match &record.outcome {
        TestOutcome::Passed => None,
        TestOutcome::Failed { message } => Some(format!("{label} test failed.\n{block}{message}")),
        TestOutcome::Errored { kind, message } => Some(format!("{label} test raised {kind}.\n{block}Message: {message}")),
        TestOutcome::TimedOut { after } => Some(format!(
            "{label} test raised {TIMEOUT_KIND}.\n{block}Message: Test timed out after {}s.",
            seconds(*after)
        )),
    }
}
