//! Grading scenarios through the public API, from candidate call to rendered log.

use gradebench::factory::{make_array, make_chain, make_queue, make_set, make_stack};
use gradebench::harness::{
    Args, Behavior, CheckFailure, Expected, GenericTest, ResultAggregator, Suite, SuiteOptions, TestCase,
    TestOutcome, WarningCategory, assert_array_equals, capture, generic_test,
};
use gradebench::{Array, Fault, FaultKind, Queue, Value};

fn enqueue(queue: &mut Queue, args: &[Value]) -> Result<Value, Fault> {
    queue.enqueue(args[0].clone());
    Ok(Value::None)
}

fn dequeue(queue: &mut Queue, _args: &[Value]) -> Result<Value, Fault> {
    queue.dequeue()
}

fn message(failure: CheckFailure) -> String {
    failure.to_string()
}

#[test]
fn returned_value_is_compared_with_the_inspector() {
    assert!(generic_test(make_set([3, 1, 2]), make_set([1, 2, 3]), |args| Ok(args[0].clone())).is_ok());
    assert!(generic_test(make_chain([1, 2], Some(0)), make_chain([1, 2], Some(0)), |args| Ok(args[0].clone())).is_ok());

    let failure = generic_test(make_queue([1, 2]), make_queue([2, 1]), |args| Ok(args[0].clone())).unwrap_err();
    assert_eq!(message(failure), "Input: [1, 2]\nExpected: [2, 1]\nOutput: [1, 2]");
}

#[test]
fn expected_fault_ends_the_check_early() {
    let result = GenericTest::new(make_stack(Vec::<i64>::new()), Expected::raises(FaultKind::Exception))
        .run(|args| args[0].stack_mut()?.pop());
    assert!(result.is_ok());

    let failure = GenericTest::new(make_stack([1]), Expected::raises(FaultKind::StackUnderflowError))
        .run(|args| args[0].stack_mut()?.pop())
        .unwrap_err();
    assert_eq!(message(failure), "Input: [1]\nExpected: StackUnderflowError\nOutput: 1");
}

#[test]
fn in_place_candidates_are_judged_by_their_arguments() {
    let (result, warnings) = capture(|| {
        GenericTest::new(make_array([2, 1]), make_array([1, 2]))
            .in_place(true)
            .run(|args| {
                args[0].array_mut()?.swap(0, 1)?;
                Ok(Value::Bool(true))
            })
    });
    assert!(result.is_ok());
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].category, WarningCategory::UnexpectedReturn);
}

#[test]
fn mutation_guard_reports_the_first_modified_argument() {
    let failure = GenericTest::new(Args::many([make_array([1]), make_array([2])]), Value::None)
        .no_mod(true)
        .run(|args| {
            args[0].array_mut()?.set(0, 9)?;
            args[1].array_mut()?.set(0, 9)?;
            Ok(Value::None)
        })
        .unwrap_err();
    assert!(matches!(failure, CheckFailure::MutationViolation { ordinal: 1, .. }));
    assert_eq!(
        message(failure),
        "Input: [[1], [2]]\nExpected: None\nOutput: The 1st input argument should not have been modified.\nArguments: [[9], [9]]"
    );
}

#[test]
fn too_many_no_mod_flags_is_a_misconfiguration() {
    let failure = GenericTest::new(make_array([1]), Value::None)
        .no_mod([true, true])
        .run(|_| Ok(Value::None))
        .unwrap_err();
    assert!(matches!(failure, CheckFailure::Misconfigured { .. }));
}

#[test]
fn behavior_drives_a_queue() {
    let mut queue = Queue::new();
    let result = Behavior::new(&mut queue, &["Queue"])
        .call("enqueue", 1, enqueue)
        .call("enqueue", 2, enqueue)
        .expect(1, "dequeue", Args::none(), dequeue)
        .expect(2, "dequeue", Args::none(), dequeue)
        .expect(Expected::raises(FaultKind::QueueUnderflowError), "dequeue", Args::none(), dequeue)
        .run();
    assert!(result.is_ok());
    assert!(queue.is_empty());
}

#[test]
fn behavior_reports_unexpected_faults_with_the_transcript() {
    let mut queue = Queue::new();
    let failure = Behavior::new(&mut queue, &["Queue"])
        .expect(1, "dequeue", Args::none(), dequeue)
        .run()
        .unwrap_err();
    assert!(matches!(failure, CheckFailure::UnexpectedFault { kind: FaultKind::QueueUnderflowError, .. }));
    assert_eq!(
        message(failure),
        "Behavior:\ninit Queue\ndequeue() ✗\nUnexpected error: QueueUnderflowError"
    );
}

#[test]
fn array_assertion_names_the_differing_index() {
    let expected: Array = make_array([1, 2, 3]);
    assert!(assert_array_equals(&expected, &Value::from(make_array([1, 2, 3])), None).is_ok());
    assert!(assert_array_equals(&expected, &Value::from(make_array([1, 5, 3])), None).is_err());
    let custom = assert_array_equals(&expected, &Value::Int(1), Some("not an array")).unwrap_err();
    assert_eq!(message(custom), "not an array");
}

#[test]
fn batch_log_matches_the_grading_format() {
    let cases = vec![
        TestCase::new("ArrayTest.test_length", || {
            generic_test(make_array([1, 2, 3]), 3, |args| Ok(Value::from(args[0].array()?.length())))
        }),
        TestCase::new("ArrayTest.test_off_by_one", || {
            generic_test(make_array([1, 2, 3]), 3, |args| {
                Ok(Value::from(args[0].array()?.length() - 1))
            })
        })
        .describe("\n    Length of a three element array.\n    "),
        TestCase::new("StackTest.test_pop_empty", || {
            generic_test(make_stack(Vec::<i64>::new()), 1, |args| args[0].stack_mut()?.pop())
        }),
    ];
    let aggregator = Suite::new(cases).unwrap().run(&SuiteOptions::new()).unwrap();
    assert!(matches!(
        aggregator.outcome("StackTest.test_pop_empty"),
        Some(TestOutcome::Errored { kind, .. }) if kind == "StackUnderflowError"
    ));
    insta::assert_snapshot!(aggregator.render_log().trim(), @r"
    Array test failed.
    Length of a three element array.
    Input: [1, 2, 3]
    Expected: 3
    Output: 2
    ----------------------------------------
    Stack test raised StackUnderflowError.

    Message: Input: []
    Expected: 1
    Output: StackUnderflowError: cannot perform pop() on an empty stack
    ========================================
    1/3 tests passed.
    ");
}

#[test]
fn empty_aggregator_renders_a_zero_tally() {
    let aggregator = ResultAggregator::new();
    assert!(aggregator.all_passed());
    assert_eq!(aggregator.render_columns(), (String::new(), String::new()));
    assert!(aggregator.render_log().ends_with("0/0 tests passed.\n"));
}
