//! Process isolation end to end.
//!
//! Built without the libtest harness: the executor re-runs this binary for each test, and the re-run
//! must reach the same suite so it can serve the requested test and exit.

use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use gradebench::harness::{Suite, SuiteOptions, TestCase, TestOutcome, generic_test};
use gradebench::{Value, factory::make_array};

fn cases() -> Vec<TestCase> {
    vec![
        TestCase::new("Timeout.test_hangs", || {
            thread::sleep(Duration::from_secs(10));
            Ok(())
        }),
        TestCase::new("Timeout.test_next_runs", || {
            generic_test(make_array([1, 2]), 2, |args| Ok(Value::from(args[0].array()?.length())))
        }),
        TestCase::new("Timeout.test_chatty_failure", || {
            println!("candidate output");
            generic_test(1, 2, |args| Ok(args[0].clone()))
        }),
        TestCase::new("Timeout.test_panics", || panic!("boom")),
        TestCase::new("Timeout.test_partial_line", || {
            print!("debug: ");
            generic_test(1, 1, |args| Ok(args[0].clone()))
        }),
    ]
}

fn check(condition: bool, what: &str, failures: &mut Vec<String>) {
    if !condition {
        failures.push(what.to_string());
    }
}

fn main() -> ExitCode {
    let suite = match Suite::new(cases()) {
        Ok(suite) => suite,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let options = SuiteOptions::new().with_timeout(Duration::from_secs(2));

    let started = Instant::now();
    // In a re-run child this serves one test and exits the process.
    let aggregator = match suite.run(&options) {
        Ok(aggregator) => aggregator,
        Err(e) => {
            eprintln!("harness error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let elapsed = started.elapsed();

    let mut failures = Vec::new();
    check(
        aggregator.outcome("Timeout.test_hangs") == Some(&TestOutcome::TimedOut { after: Duration::from_secs(2) }),
        "hanging test is recorded as timed out",
        &mut failures,
    );
    check(
        aggregator.outcome("Timeout.test_next_runs") == Some(&TestOutcome::Passed),
        "test after a timeout still runs and passes",
        &mut failures,
    );
    check(
        aggregator.outcome("Timeout.test_chatty_failure")
            == Some(&TestOutcome::Failed {
                message: "Input: 1\nExpected: 2\nOutput: 1".to_string(),
            }),
        "failure message survives the report protocol",
        &mut failures,
    );
    check(
        aggregator.outcome("Timeout.test_panics") == Some(&TestOutcome::errored("Panic", "boom")),
        "panic in an isolated test is an error",
        &mut failures,
    );
    check(
        aggregator.outcome("Timeout.test_partial_line") == Some(&TestOutcome::Passed),
        "report is found after an unterminated candidate line",
        &mut failures,
    );
    check(elapsed < Duration::from_secs(9), "hanging test was killed at its deadline", &mut failures);
    check(
        aggregator.render_log().contains("Timeout test raised TestTimeoutError.\n\nMessage: Test timed out after 2s."),
        "timeout is logged",
        &mut failures,
    );

    if failures.is_empty() {
        println!("timeout_isolation: ok ({} tests in {elapsed:?})", aggregator.total());
        ExitCode::SUCCESS
    } else {
        for failure in &failures {
            eprintln!("timeout_isolation: FAILED: {failure}");
        }
        ExitCode::FAILURE
    }
}
