//! The bounded executor.
//!
//! Without a timeout a test runs inline on the calling thread. With a timeout it runs in an isolated
//! child process so that a candidate that hangs, spins or deadlocks can be killed outright:
//!
//! 1. the current executable is re-executed with its original argv and [`CHILD_ENV`] set to the test id;
//! 2. the child's batch runner notices the variable, runs just that test inline and prints one
//!    [`REPORT_MARKER`]-prefixed JSON line holding the outcome and any soft warnings, then exits;
//! 3. the parent reads the child's stdout on a reader thread and waits on a channel with
//!    `recv_timeout`. Past the deadline the child is killed and reaped and the test is `TimedOut`.
//!
//! ## Notes
//! - Nothing the child does is visible to the parent after a timeout. Partial work is discarded.
//! - Lines the candidate prints to stdout are forwarded to the parent's stdout unchanged.

use std::cell::{Cell, RefCell};
use std::env;
use std::io::{self, BufRead, BufReader, Write};
use std::panic::{self, AssertUnwindSafe, PanicHookInfo};
use std::process::{Child, Command, Stdio};
use std::sync::Once;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use gradebench_core::Fault;
use serde::{Deserialize, Serialize};

use super::HarnessError;
use super::outcome::{CHILD_CRASHED_KIND, TestOutcome, with_trace};
use super::suite::TestCase;
use super::warnings::{self, SoftWarning};

/// Environment variable naming the single test an isolated child must run.
pub const CHILD_ENV: &str = "GRADEBENCH_CHILD_TEST";
/// Prefix of the report line a child writes to stdout.
pub const REPORT_MARKER: &str = "@@gradebench-report@@ ";

/// What one test produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    pub outcome: TestOutcome,
    pub warnings: Vec<SoftWarning>,
}

/// Strategy for running a single test.
pub trait TestExecutor {
    fn execute(&self, case: &TestCase) -> Result<Execution, HarnessError>;
}

/// Runs tests on the calling thread.
#[derive(Debug, Default)]
pub struct InlineExecutor {
    show_traces: bool,
}

impl InlineExecutor {
    pub fn new(show_traces: bool) -> Self {
        Self { show_traces }
    }
}

impl TestExecutor for InlineExecutor {
    fn execute(&self, case: &TestCase) -> Result<Execution, HarnessError> {
        Ok(run_inline(case, self.show_traces))
    }
}

thread_local! {
    static CAPTURING_PANICS: Cell<bool> = const { Cell::new(false) };
    static PANIC_SITE: RefCell<Option<String>> = const { RefCell::new(None) };
}

static PANIC_HOOK: Once = Once::new();

// Installed once for the whole process. Threads running a test record the panic location instead of
// printing; every other thread keeps the previous hook's behavior.
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info: &PanicHookInfo<'_>| {
            if CAPTURING_PANICS.with(Cell::get) {
                let site = info.location().map(ToString::to_string);
                PANIC_SITE.with(|slot| *slot.borrow_mut() = site);
            } else {
                previous(info);
            }
        }));
    });
}

/// Run one test on this thread, converting whatever it does into an [`Execution`].
///
/// Panics escaping the test body are caught and recorded as a `Panic` error; the default panic message is
/// suppressed while the test runs so candidate panics do not clutter the report.
#[tracing::instrument(skip_all, fields(test = %case.id()))]
pub fn run_inline(case: &TestCase, show_traces: bool) -> Execution {
    install_panic_hook();
    PANIC_SITE.with(|slot| *slot.borrow_mut() = None);
    CAPTURING_PANICS.with(|flag| flag.set(true));
    let (result, warnings) = warnings::capture(|| panic::catch_unwind(AssertUnwindSafe(|| case.call())));
    CAPTURING_PANICS.with(|flag| flag.set(false));

    let outcome = match result {
        Ok(Ok(())) => TestOutcome::Passed,
        Ok(Err(failure)) => failure.into_outcome(show_traces),
        Err(payload) => {
            let fault = Fault::from_panic(payload);
            let site = PANIC_SITE.with(|slot| slot.borrow_mut().take());
            let message = match site {
                Some(site) if show_traces => with_trace(fault.message, &site),
                _ => fault.message,
            };
            TestOutcome::errored(fault.kind.as_str(), message)
        }
    };
    tracing::debug!(passed = outcome.is_passed(), "test finished");
    Execution { outcome, warnings }
}

/// Serve a single test as an isolated child: run it inline and write the report line.
pub(crate) fn serve_child(case: &TestCase, show_traces: bool) -> Result<(), HarnessError> {
    let execution = run_inline(case, show_traces);
    let report = serde_json::to_string(&execution).map_err(|source| HarnessError::Protocol {
        test: case.id().to_string(),
        source,
    })?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{REPORT_MARKER}{report}")?;
    stdout.flush()?;
    Ok(())
}

/// Runs each test in a child process with a wall-clock deadline.
#[derive(Debug)]
pub struct ProcessExecutor {
    timeout: Duration,
}

impl ProcessExecutor {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn spawn(&self, case: &TestCase) -> Result<Child, HarnessError> {
        let exe = env::current_exe()?;
        Command::new(exe)
            .args(env::args_os().skip(1))
            .env(CHILD_ENV, case.id())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| HarnessError::Spawn {
                test: case.id().to_string(),
                source,
            })
    }
}

enum Waited {
    Report(String),
    Closed,
    TimedOut,
}

fn wait_for_report(lines: &Receiver<String>, deadline: Instant) -> Waited {
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match lines.recv_timeout(remaining) {
            // The candidate may leave a partial line, so the marker can start mid-line.
            Ok(line) => match line.find(REPORT_MARKER) {
                Some(at) => {
                    let (candidate, report) = line.split_at(at);
                    if !candidate.is_empty() {
                        println!("{candidate}");
                    }
                    return Waited::Report(report[REPORT_MARKER.len()..].to_string());
                }
                None => println!("{line}"),
            },
            Err(RecvTimeoutError::Timeout) => return Waited::TimedOut,
            Err(RecvTimeoutError::Disconnected) => return Waited::Closed,
        }
    }
}

impl TestExecutor for ProcessExecutor {
    #[tracing::instrument(skip_all, fields(test = %case.id(), timeout = ?self.timeout))]
    fn execute(&self, case: &TestCase) -> Result<Execution, HarnessError> {
        let deadline = Instant::now() + self.timeout;
        let mut child = self.spawn(case)?;
        tracing::debug!(pid = child.id(), "spawned isolated test");

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("isolated test stdout was not captured"))?;
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            for line in BufReader::new(stdout).lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        });

        match wait_for_report(&rx, deadline) {
            Waited::Report(report) => {
                let status = child.wait()?;
                tracing::debug!(%status, "isolated test exited");
                serde_json::from_str(&report).map_err(|source| HarnessError::Protocol {
                    test: case.id().to_string(),
                    source,
                })
            }
            Waited::Closed => {
                let status = child.wait()?;
                tracing::warn!(%status, "isolated test exited without a report");
                Ok(Execution {
                    outcome: TestOutcome::errored(
                        CHILD_CRASHED_KIND,
                        format!("Isolated test exited ({status}) before reporting an outcome."),
                    ),
                    warnings: Vec::new(),
                })
            }
            Waited::TimedOut => {
                tracing::warn!("test exceeded its deadline, killing it");
                // The child may have exited on its own between the deadline and the kill.
                let _ = child.kill();
                child.wait()?;
                Ok(Execution {
                    outcome: TestOutcome::TimedOut { after: self.timeout },
                    warnings: Vec::new(),
                })
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::harness::generic::generic_test;
    use crate::harness::warnings::{UNEXPECTED_RETURN_MESSAGE, WarningCategory};

    #[test]
    fn inline_execution_classifies_outcomes() {
        let pass = TestCase::new("Demo.pass", || Ok(()));
        assert_eq!(run_inline(&pass, false).outcome, TestOutcome::Passed);

        let fail = TestCase::new("Demo.fail", || generic_test(1, 2, |args| Ok(args[0].clone())));
        assert_eq!(
            run_inline(&fail, false).outcome,
            TestOutcome::Failed {
                message: "Input: 1\nExpected: 2\nOutput: 1".to_string()
            }
        );
    }

    #[test]
    fn panicking_test_body_is_an_error_not_a_crash() {
        let case = TestCase::new("Demo.panics", || {
            let items: Vec<i32> = Vec::new();
            assert!(!items.is_empty(), "no items");
            Ok(())
        });
        let execution = run_inline(&case, false);
        assert_eq!(execution.outcome, TestOutcome::errored("Panic", "no items"));
    }

    #[test]
    fn panic_site_is_appended_when_tracing() {
        let case = TestCase::new("Demo.panics", || panic!("boom"));
        let TestOutcome::Errored { message, .. } = run_inline(&case, true).outcome else {
            panic!("expected an error");
        };
        assert!(message.starts_with("boom\n  at "), "{message}");
        assert!(message.contains("executor.rs"), "{message}");
    }

    #[test]
    fn inline_execution_collects_warnings() {
        let case = TestCase::new("Demo.warns", || {
            warnings::warn(WarningCategory::UnexpectedReturn, UNEXPECTED_RETURN_MESSAGE);
            Ok(())
        });
        let execution = run_inline(&case, false);
        assert_eq!(execution.warnings.len(), 1);
    }

    #[test]
    fn report_line_round_trips() {
        let execution = Execution {
            outcome: TestOutcome::errored("IndexError", "index (3) can't be < 0 or >= length (3)"),
            warnings: vec![SoftWarning {
                category: WarningCategory::Deprecation,
                message: "old".to_string(),
            }],
        };
        let line = format!("{REPORT_MARKER}{}", serde_json::to_string(&execution).unwrap());
        let (tx, rx) = mpsc::channel();
        tx.send("candidate chatter".to_string()).unwrap();
        tx.send(line).unwrap();
        let Waited::Report(report) = wait_for_report(&rx, Instant::now() + Duration::from_secs(5)) else {
            panic!("expected a report");
        };
        assert_eq!(serde_json::from_str::<Execution>(&report).unwrap(), execution);
    }

    #[test]
    fn report_after_partial_candidate_line_is_found() {
        let execution = Execution {
            outcome: TestOutcome::Passed,
            warnings: Vec::new(),
        };
        let line = format!("debug: {REPORT_MARKER}{}", serde_json::to_string(&execution).unwrap());
        let (tx, rx) = mpsc::channel();
        tx.send(line).unwrap();
        let Waited::Report(report) = wait_for_report(&rx, Instant::now() + Duration::from_secs(5)) else {
            panic!("expected a report");
        };
        assert_eq!(serde_json::from_str::<Execution>(&report).unwrap(), execution);
    }

    #[test]
    fn panic_site_does_not_outlive_its_test() {
        let caught = TestCase::new("Demo.caught", || {
            generic_test(1, 1, |_| -> Result<gradebench_core::Value, Fault> { panic!("inside candidate") })
        });
        assert!(matches!(
            run_inline(&caught, true).outcome,
            TestOutcome::Errored { kind, .. } if kind == "Panic"
        ));

        let quiet = TestCase::new("Demo.quiet", || Ok(()));
        assert_eq!(run_inline(&quiet, true).outcome, TestOutcome::Passed);
        assert_eq!(PANIC_SITE.with(|slot| slot.borrow_mut().take()), None);
    }

    #[test]
    fn silent_channel_times_out_and_closed_channel_is_reported() {
        let (tx, rx) = mpsc::channel::<String>();
        assert!(matches!(
            wait_for_report(&rx, Instant::now() + Duration::from_millis(20)),
            Waited::TimedOut
        ));
        drop(tx);
        assert!(matches!(
            wait_for_report(&rx, Instant::now() + Duration::from_secs(5)),
            Waited::Closed
        ));
    }
}
