//! The built-in grading batch run by the `gradebench` binary.
//!
//! It grades a handful of reference candidates (sorting, searching, a stack, chain reversal, tree
//! height) and then turns the harness on known-bad candidates, passing only when each defect is caught
//! and classified correctly. A green run means the harness is fit to grade real submissions.

use gradebench_core::factory::{make_array, make_chain, make_stack};
use gradebench_core::{BinaryTreeNode, Fault, FaultKind, ListNode, Stack, Value};

use crate::harness::{Args, Behavior, CheckFailure, Expected, GenericTest, TestCase, generic_test};

/// Every case of the built-in batch, in run order.
pub fn cases() -> Vec<TestCase> {
    vec![
        TestCase::new("InsertionSortTest.test_sorts_in_place", || {
            GenericTest::new(make_array([5, 2, 4, 6, 1, 3]), make_array([1, 2, 3, 4, 5, 6]))
                .in_place(true)
                .run(insertion_sort)
        })
        .describe("Sorts an array in place without returning it."),
        TestCase::new("BinarySearchTest.test_finds_key", || {
            GenericTest::new(Args::many([Value::from(make_array([1, 3, 5, 7, 9])), Value::Int(7)]), 3)
                .no_mod(true)
                .run(binary_search)
        }),
        TestCase::new("BinarySearchTest.test_missing_key_raises", || {
            GenericTest::new(
                Args::many([Value::from(make_array([1, 3, 5])), Value::Int(4)]),
                Expected::raises(FaultKind::ValueError),
            )
            .no_mod(true)
            .run(binary_search)
        }),
        TestCase::new("StackTest.test_push_pop_sequence", || {
            let mut stack = Stack::new();
            Behavior::new(&mut stack, &["Stack"])
                .call("push", 1, push)
                .call("push", 2, push)
                .expect(2, "pop", Args::none(), pop)
                .expect(1, "pop", Args::none(), pop)
                .expect(Expected::raises(FaultKind::StackUnderflowError), "pop", Args::none(), pop)
                .run()
        }),
        TestCase::new("ChainTest.test_reverse", || {
            generic_test(make_chain([1, 2, 3, 4], None), make_chain([4, 3, 2, 1], None), reverse_chain)
        }),
        TestCase::new("TreeTest.test_height", || {
            let leaf = BinaryTreeNode::new(3);
            let root = BinaryTreeNode::with_children(1, Some(BinaryTreeNode::with_children(2, Some(leaf), None)), None);
            GenericTest::new(root, 2).no_mod(true).run(tree_height)
        }),
        TestCase::new("HarnessTest.test_flags_wrong_output", || {
            let result = generic_test(make_array([2, 1]), make_array([1, 2]), |args| Ok(args[0].clone()));
            caught(result, "a wrong return value", |failure| {
                matches!(failure, CheckFailure::Mismatch { message, .. } if message.ends_with("Output: [2, 1]"))
            })
        }),
        TestCase::new("HarnessTest.test_flags_mutated_argument", || {
            let result = GenericTest::new(Args::many([Value::from(make_array([1])), Value::from(make_array([3, 2]))]), 1)
                .no_mod([false, true])
                .run(|args| {
                    args[1].array_mut()?.swap(0, 1)?;
                    Ok(Value::Int(1))
                });
            caught(result, "a modified read-only argument", |failure| {
                matches!(failure, CheckFailure::MutationViolation { ordinal: 2, message, .. }
                    if message.contains("The 2nd input argument should not have been modified."))
            })
        }),
        TestCase::new("HarnessTest.test_flags_unexpected_fault", || {
            let result = generic_test(make_stack(Vec::<i64>::new()), 1, |args| args[0].stack_mut()?.pop());
            caught(result, "an unexpected fault", |failure| {
                matches!(failure, CheckFailure::UnexpectedFault { kind: FaultKind::StackUnderflowError, .. })
            })
        }),
        TestCase::new("HarnessTest.test_flags_panicking_candidate", || {
            let result = generic_test(make_array([1]), 1, |args| {
                let index = args.len() + 3;
                Ok(args[index].clone())
            });
            caught(result, "a panic", |failure| {
                matches!(failure, CheckFailure::UnexpectedFault { kind: FaultKind::Panic, .. })
            })
        }),
        TestCase::new("HarnessTest.test_behavior_transcript", || {
            let mut stack = Stack::new();
            let result = Behavior::new(&mut stack, &["Stack"])
                .call("push", 1, push)
                .expect(2, "pop", Args::none(), pop)
                .run();
            caught(result, "a wrong step result", |failure| {
                matches!(failure, CheckFailure::Mismatch { message, .. }
                    if message == "Behavior:\ninit Stack\npush(1) -> None ✓\npop() -> 1 ✗\nexpected 2")
            })
        }),
    ]
}

/// Pass only if `result` is a failure accepted by `detected`.
#[track_caller]
fn caught(
    result: Result<(), CheckFailure>,
    what: &str,
    detected: impl FnOnce(&CheckFailure) -> bool,
) -> Result<(), CheckFailure> {
    match result {
        Err(failure) if detected(&failure) => Ok(()),
        Err(failure) => Err(CheckFailure::mismatch(format!(
            "The harness misclassified {what}:\n{failure}"
        ))),
        Ok(()) => Err(CheckFailure::mismatch(format!("The harness did not detect {what}."))),
    }
}

// ============================================================================
// Reference candidates
// ============================================================================

fn insertion_sort(args: &mut [Value]) -> Result<Value, Fault> {
    let array = args[0].array_mut()?;
    for j in 1..array.length() {
        let key = array.get(j)?.clone();
        let mut i = j;
        while i > 0 && array.get(i - 1)?.as_int() > key.as_int() {
            let shifted = array.get(i - 1)?.clone();
            array.set(i, shifted)?;
            i -= 1;
        }
        array.set(i, key)?;
    }
    Ok(Value::None)
}

fn binary_search(args: &mut [Value]) -> Result<Value, Fault> {
    let key = args[1].as_int().ok_or_else(|| Fault::type_error("search key must be an int"))?;
    let array = args[0].array()?;
    let (mut low, mut high) = (0, array.length());
    while low < high {
        let mid = low + (high - low) / 2;
        match array.get(mid)?.as_int() {
            Some(value) if value == key => return Ok(Value::from(mid)),
            Some(value) if value < key => low = mid + 1,
            _ => high = mid,
        }
    }
    Err(Fault::value_error(format!("{key} is not in the array")))
}

fn push(stack: &mut Stack, args: &[Value]) -> Result<Value, Fault> {
    stack.push(args[0].clone());
    Ok(Value::None)
}

fn pop(stack: &mut Stack, _args: &[Value]) -> Result<Value, Fault> {
    stack.pop()
}

fn reverse_chain(args: &mut [Value]) -> Result<Value, Fault> {
    let mut current = args[0].chain()?;
    let mut previous: Option<ListNode> = None;
    while let Some(node) = current {
        current = node.next();
        node.set_next(previous);
        previous = Some(node);
    }
    Ok(Value::Chain(previous))
}

fn tree_height(args: &mut [Value]) -> Result<Value, Fault> {
    fn height(node: Option<BinaryTreeNode>) -> i64 {
        match node {
            None => -1,
            Some(node) => 1 + height(node.left()).max(height(node.right())),
        }
    }
    Ok(Value::Int(height(args[0].binary_tree()?)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::harness::{Suite, SuiteOptions};

    #[test]
    fn builtin_batch_passes() {
        let aggregator = Suite::new(cases()).unwrap().run(&SuiteOptions::new()).unwrap();
        let failures: Vec<_> = aggregator
            .outcomes()
            .filter(|(_, outcome)| !outcome.is_passed())
            .map(|(id, outcome)| format!("{id}: {outcome:?}"))
            .collect();
        assert!(failures.is_empty(), "{failures:#?}");
    }

    #[test]
    fn reference_sort_handles_duplicates() {
        let mut args = [Value::from(make_array([3, 1, 3, 2]))];
        insertion_sort(&mut args).unwrap();
        assert!(gradebench_core::equals(&args[0], &Value::from(make_array([1, 2, 3, 3]))));
    }
}
