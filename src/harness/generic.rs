//! The outcome comparator ("generic test").
//!
//! A [`GenericTest`] calls a candidate once with a set of arguments and classifies what happened:
//!
//! - a fault matching an expected fault kind passes immediately, skipping every other check;
//! - any other fault is an unexpected fault;
//! - a returned value (or, for in-place candidates, the mutated arguments) is compared against the
//!   expectation, and a mismatch fails with both renderings;
//! - finally the mutation guard verifies that read-only arguments were left alone.
//!
//! Failure messages start with an `Input: ...\nExpected: ...\n` header rendered before the call, followed
//! by `Output: ...` describing what went wrong.

use std::panic::{self, AssertUnwindSafe};

use gradebench_core::{Array, Fault, FaultKind, Value, equals, render};

use super::guard::{MutationGuard, NoMod, ordinal};
use super::outcome::CheckFailure;
use super::warnings::{self, UNEXPECTED_RETURN_MESSAGE, WarningCategory};

/// Arguments passed to a candidate.
#[derive(Debug, Clone)]
pub enum Args {
    /// A lone argument; rendered bare in messages.
    Single(Value),
    /// A positional argument list; rendered as `[a, b, ...]`.
    Many(Vec<Value>),
}

impl Args {
    pub fn none() -> Self {
        Args::Many(Vec::new())
    }

    pub fn many<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Args::Many(items.into_iter().map(Into::into).collect())
    }

    pub fn len(&self) -> usize {
        match self {
            Args::Single(_) => 1,
            Args::Many(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_slice(&self) -> &[Value] {
        match self {
            Args::Single(value) => std::slice::from_ref(value),
            Args::Many(items) => items,
        }
    }

    pub fn as_mut_slice(&mut self) -> &mut [Value] {
        match self {
            Args::Single(value) => std::slice::from_mut(value),
            Args::Many(items) => items,
        }
    }

    /// The arguments as one value: the lone argument itself, or a list of all of them.
    pub fn to_value(&self) -> Value {
        match self {
            Args::Single(value) => value.clone(),
            Args::Many(items) => Value::List(items.clone()),
        }
    }
}

impl<T: Into<Value>> From<T> for Args {
    fn from(value: T) -> Self {
        Args::Single(value.into())
    }
}

/// What a candidate is expected to produce.
#[derive(Debug, Clone)]
pub enum Expected {
    Value(Value),
    /// The candidate must raise a fault that is an instance of this kind.
    Raises(FaultKind),
}

impl Expected {
    pub fn raises(kind: FaultKind) -> Self {
        Expected::Raises(kind)
    }

    fn render_with(&self, renderer: Option<&Renderer<'_>>) -> String {
        match (self, renderer) {
            (Expected::Value(value), Some(renderer)) => renderer(value),
            (Expected::Value(value), None) => render(value),
            (Expected::Raises(kind), _) => kind.to_string(),
        }
    }
}

impl<T: Into<Value>> From<T> for Expected {
    fn from(value: T) -> Self {
        Expected::Value(value.into())
    }
}

pub type Comparator<'c> = Box<dyn Fn(&Value, &Value) -> bool + 'c>;
pub type Renderer<'c> = Box<dyn Fn(&Value) -> String + 'c>;

/// Builder for one outcome comparison.
///
/// ## Notes
/// - `in_place` compares the expectation against the arguments after the call instead of the return
///   value. A non-`None` return from an in-place candidate raises an
///   [`UnexpectedReturn`](WarningCategory::UnexpectedReturn) soft warning but does not fail the test.
/// - Panics inside the candidate are caught and treated as a [`FaultKind::Panic`] fault.
pub struct GenericTest<'c> {
    args: Args,
    expected: Expected,
    comparator: Option<Comparator<'c>>,
    in_place: bool,
    no_mod: NoMod,
    params_renderer: Option<Renderer<'c>>,
    expected_renderer: Option<Renderer<'c>>,
    output_renderer: Option<Renderer<'c>>,
}

impl<'c> GenericTest<'c> {
    pub fn new(args: impl Into<Args>, expected: impl Into<Expected>) -> Self {
        Self {
            args: args.into(),
            expected: expected.into(),
            comparator: None,
            in_place: false,
            no_mod: NoMod::default(),
            params_renderer: None,
            expected_renderer: None,
            output_renderer: None,
        }
    }

    /// Replace [`equals`] with a custom `(expected, actual)` comparison.
    pub fn with_comparator(mut self, comparator: impl Fn(&Value, &Value) -> bool + 'c) -> Self {
        self.comparator = Some(Box::new(comparator));
        self
    }

    pub fn in_place(mut self, in_place: bool) -> Self {
        self.in_place = in_place;
        self
    }

    pub fn no_mod(mut self, no_mod: impl Into<NoMod>) -> Self {
        self.no_mod = no_mod.into();
        self
    }

    /// Render the arguments with `renderer`; it receives the same value shape as [`Args::to_value`].
    pub fn render_params_with(mut self, renderer: impl Fn(&Value) -> String + 'c) -> Self {
        self.params_renderer = Some(Box::new(renderer));
        self
    }

    pub fn render_expected_with(mut self, renderer: impl Fn(&Value) -> String + 'c) -> Self {
        self.expected_renderer = Some(Box::new(renderer));
        self
    }

    pub fn render_output_with(mut self, renderer: impl Fn(&Value) -> String + 'c) -> Self {
        self.output_renderer = Some(Box::new(renderer));
        self
    }

    fn render_params(&self) -> String {
        let value = self.args.to_value();
        match &self.params_renderer {
            Some(renderer) => renderer(&value),
            None => render(&value),
        }
    }

    fn render_output(&self, value: &Value) -> String {
        match &self.output_renderer {
            Some(renderer) => renderer(value),
            None => render(value),
        }
    }

    /// Invoke `method` with the arguments and check the outcome.
    ///
    /// ## Errors
    /// - [`CheckFailure::Mismatch`] when the result differs from the expectation, or a fault was expected
    ///   and none was raised.
    /// - [`CheckFailure::UnexpectedFault`] when the candidate raised a fault that does not match.
    /// - [`CheckFailure::MutationViolation`] when a read-only argument changed.
    /// - [`CheckFailure::Misconfigured`] when the no-mod flags do not fit the arguments.
    #[track_caller]
    pub fn run<F>(mut self, method: F) -> Result<(), CheckFailure>
    where
        F: FnOnce(&mut [Value]) -> Result<Value, Fault>,
    {
        let header = format!(
            "Input: {}\nExpected: {}\n",
            self.render_params(),
            self.expected.render_with(self.expected_renderer.as_ref())
        );
        let guard = match MutationGuard::arm(self.args.as_slice(), &self.no_mod) {
            Ok(guard) => guard,
            Err(message) => return Err(CheckFailure::misconfigured(message)),
        };

        let result = match invoke(method, self.args.as_mut_slice()) {
            Ok(result) => result,
            Err(fault) => {
                return match &self.expected {
                    Expected::Raises(kind) if fault.kind.is_instance_of(kind) => Ok(()),
                    _ => Err(CheckFailure::unexpected_fault(
                        fault.kind.clone(),
                        format!("{header}Output: {fault}"),
                    )),
                };
            }
        };

        let actual = if self.in_place {
            if !result.is_none() {
                warnings::warn(WarningCategory::UnexpectedReturn, UNEXPECTED_RETURN_MESSAGE);
            }
            self.args.to_value()
        } else {
            result
        };

        let matched = match &self.expected {
            Expected::Raises(_) => false,
            Expected::Value(expected) => match &self.comparator {
                Some(comparator) => comparator(expected, &actual),
                None => equals(expected, &actual),
            },
        };
        if !matched {
            return Err(CheckFailure::mismatch(format!(
                "{header}Output: {}",
                self.render_output(&actual)
            )));
        }

        if let Some(position) = guard.first_violation(self.args.as_slice()) {
            return Err(CheckFailure::mutation(
                position,
                format!(
                    "{header}Output: The {} input argument should not have been modified.\nArguments: {}",
                    ordinal(position),
                    self.render_params()
                ),
            ));
        }
        Ok(())
    }
}

/// Shorthand for `GenericTest::new(args, expected).run(method)`.
#[track_caller]
pub fn generic_test<F>(args: impl Into<Args>, expected: impl Into<Expected>, method: F) -> Result<(), CheckFailure>
where
    F: FnOnce(&mut [Value]) -> Result<Value, Fault>,
{
    GenericTest::new(args, expected).run(method)
}

/// Older entry point that lets the caller rewrite the arguments and expectation before the run.
#[deprecated(since = "0.1.0", note = "use `GenericTest::run` or `generic_test` instead")]
#[track_caller]
pub fn run_generic_test<F>(
    mut test: GenericTest<'_>,
    init_params: Option<&dyn Fn(Args) -> Args>,
    init_expected: Option<&dyn Fn(Expected) -> Expected>,
    method: F,
) -> Result<(), CheckFailure>
where
    F: FnOnce(&mut [Value]) -> Result<Value, Fault>,
{
    warnings::warn(
        WarningCategory::Deprecation,
        "run_generic_test is deprecated, use generic_test instead.",
    );
    if let Some(init) = init_params {
        test.args = init(test.args);
    }
    if let Some(init) = init_expected {
        test.expected = init(test.expected);
    }
    test.run(method)
}

/// Element-wise array assertion with index-level messages.
///
/// `msg` replaces the generated message when given.
#[track_caller]
pub fn assert_array_equals(expected: &Array, actual: &Value, msg: Option<&str>) -> Result<(), CheckFailure> {
    match array_difference(expected, actual) {
        None => Ok(()),
        Some(generated) => Err(CheckFailure::mismatch(msg.map_or(generated, str::to_string))),
    }
}

fn array_difference(expected: &Array, actual: &Value) -> Option<String> {
    let Value::Array(actual) = actual else {
        return Some(format!("Expected an Array, Actual = {}", actual.type_name()));
    };
    if expected.length() != actual.length() {
        return Some(format!(
            "Expected Array length = {}, Actual Array length = {}",
            expected.length(),
            actual.length()
        ));
    }
    expected
        .as_slice()
        .iter()
        .zip(actual.as_slice())
        .enumerate()
        .find(|(_, (e, a))| !equals(e, a))
        .map(|(i, (e, a))| format!("Expected {} at index {i}, Actual = {}", render(e), render(a)))
}

/// Call a candidate, turning an escaping panic into a fault.
pub(crate) fn invoke<A: ?Sized, R>(method: impl FnOnce(&mut A) -> Result<R, Fault>, args: &mut A) -> Result<R, Fault> {
    panic::catch_unwind(AssertUnwindSafe(|| method(args))).unwrap_or_else(|payload| Err(Fault::from_panic(payload)))
}
