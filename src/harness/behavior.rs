//! The sequence behavior verifier ("behavior test").
//!
//! Drives a scripted sequence of method calls against an already-constructed subject and checks each
//! result. A transcript of every step is accumulated so a failure shows the whole history leading up to
//! it:
//!
//! ```text
//! Behavior:
//! init Stack
//! push(1) -> None ✓
//! pop() -> 2 ✗
//! expected 1
//! ```

use gradebench_core::{Fault, Value, equals, render};

use super::generic::{Args, Expected, invoke};
use super::outcome::CheckFailure;

type StepCall<'s, S> = Box<dyn FnOnce(&mut S, &[Value]) -> Result<Value, Fault> + 's>;

struct Step<'s, S> {
    expected: Expected,
    method: String,
    args: Vec<Value>,
    call: StepCall<'s, S>,
}

/// A scripted sequence of calls against `subject`.
///
/// Several objects can be driven together by making `S` a tuple and naming each one in `new`.
pub struct Behavior<'s, S> {
    subject: &'s mut S,
    transcript: String,
    steps: Vec<Step<'s, S>>,
}

impl<'s, S> Behavior<'s, S> {
    /// `names` label the subjects on the transcript's `init` line.
    pub fn new(subject: &'s mut S, names: &[&str]) -> Self {
        Self {
            subject,
            transcript: format!("Behavior:\ninit {}\n", names.join(", ")),
            steps: Vec::new(),
        }
    }

    /// Add a step whose result must equal `expected`, or whose fault must match an expected kind.
    pub fn expect<F>(mut self, expected: impl Into<Expected>, method: &str, args: impl Into<Args>, call: F) -> Self
    where
        F: FnOnce(&mut S, &[Value]) -> Result<Value, Fault> + 's,
    {
        self.steps.push(Step {
            expected: expected.into(),
            method: method.to_string(),
            args: args.into().as_slice().to_vec(),
            call: Box::new(call),
        });
        self
    }

    /// Add a step that must return nothing.
    pub fn call<F>(self, method: &str, args: impl Into<Args>, call: F) -> Self
    where
        F: FnOnce(&mut S, &[Value]) -> Result<Value, Fault> + 's,
    {
        self.expect(Value::None, method, args, call)
    }

    /// Execute the steps in order, stopping at the first mismatch.
    ///
    /// A fault matching a step's expected kind ends the sequence successfully; later steps do not run.
    #[track_caller]
    pub fn run(self) -> Result<(), CheckFailure> {
        let Behavior {
            subject,
            mut transcript,
            steps,
        } = self;
        for Step {
            expected,
            method,
            args,
            call,
        } in steps
        {
            let label = format!("{method}({})", args.iter().map(render).collect::<Vec<_>>().join(", "));
            match invoke(|s: &mut S| call(s, &args), &mut *subject) {
                Ok(result) => {
                    transcript.push_str(&format!("{label} -> {}", render(&result)));
                    let matched = match &expected {
                        Expected::Value(value) => equals(&result, value),
                        Expected::Raises(_) => false,
                    };
                    if !matched {
                        transcript.push_str(&format!(" ✗\nexpected {}", render_expected(&expected)));
                        return Err(CheckFailure::mismatch(transcript));
                    }
                    transcript.push_str(" ✓\n");
                }
                Err(fault) => {
                    if let Expected::Raises(kind) = &expected {
                        if fault.kind.is_instance_of(kind) {
                            return Ok(());
                        }
                    }
                    transcript.push_str(&format!("{label} ✗\nUnexpected error: {}", fault.kind));
                    return Err(CheckFailure::unexpected_fault(fault.kind, transcript));
                }
            }
        }
        Ok(())
    }
}

fn render_expected(expected: &Expected) -> String {
    match expected {
        Expected::Value(value) => render(value),
        Expected::Raises(kind) => kind.to_string(),
    }
}
