//! Property tests for the value inspector.
//!
//! These exercise the algebraic guarantees the harness relies on: equality is reflexive and symmetric,
//! deep copies are indistinguishable from their source, and comparing never mutates.

use gradebench_core::factory::{make_array, make_chain, make_queue, make_set, make_stack};
use gradebench_core::{Value, equals, render};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn scalar() -> BoxedStrategy<Value> {
    prop_oneof![
        Just(Value::None),
        any::<bool>().prop_map(Value::Bool),
        (-1000i64..1000).prop_map(Value::Int),
        (-1.0e6f64..1.0e6).prop_map(Value::Float),
        "[a-z]{0,6}".prop_map(Value::Str),
    ]
    .boxed()
}

fn container() -> impl Strategy<Value = Value> {
    let items = prop::collection::vec(scalar(), 0..8).boxed();
    prop_oneof![
        items.clone().prop_map(Value::List),
        items.clone().prop_map(|v| make_array(v).into()),
        items.clone().prop_map(|v| make_queue(v).into()),
        items.clone().prop_map(|v| make_stack(v).into()),
        items.clone().prop_map(|v| make_set(v).into()),
        (items, any::<prop::sample::Index>(), any::<bool>()).prop_map(|(v, at, cyclic)| {
            let cycle_to = (cyclic && !v.is_empty()).then(|| at.index(v.len()));
            Value::from(make_chain(v, cycle_to))
        }),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    prop_oneof![scalar(), container()]
}

// ============================================================================
// Laws
// ============================================================================

proptest! {
    #[test]
    fn equality_is_reflexive(v in value()) {
        prop_assert!(equals(&v, &v));
    }

    #[test]
    fn equality_is_symmetric(a in value(), b in value()) {
        prop_assert_eq!(equals(&a, &b), equals(&b, &a));
    }

    #[test]
    fn deep_copy_is_equal_and_renders_identically(v in value()) {
        let copy = v.deep_copy();
        prop_assert!(equals(&v, &copy));
        prop_assert_eq!(render(&v), render(&copy));
    }

    #[test]
    fn comparing_does_not_mutate(v in container()) {
        let before = render(&v);
        let copy = v.deep_copy();
        for _ in 0..3 {
            let _ = equals(&v, &copy);
        }
        prop_assert_eq!(render(&v), before);
    }

    #[test]
    fn self_comparison_of_stacks_and_queues_is_idempotent(items in prop::collection::vec(scalar(), 0..8)) {
        let stack: Value = make_stack(items.clone()).into();
        let queue: Value = make_queue(items.clone()).into();
        for _ in 0..3 {
            prop_assert!(equals(&stack, &stack));
            prop_assert!(equals(&queue, &queue));
        }
        let stack = stack.stack().unwrap();
        let queue = queue.queue().unwrap();
        prop_assert_eq!(stack.size(), items.len());
        prop_assert_eq!(queue.size(), items.len());
        if let Some(last) = items.last() {
            prop_assert!(equals(stack.top().unwrap(), last));
        }
        if let Some(first) = items.first() {
            prop_assert!(equals(queue.front().unwrap(), first));
        }
    }

    #[test]
    fn set_equality_ignores_insertion_order(items in prop::collection::vec(-50i64..50, 0..10)) {
        let mut reversed = items.clone();
        reversed.reverse();
        let forward: Value = make_set(items).into();
        let backward: Value = make_set(reversed).into();
        prop_assert!(equals(&forward, &backward));
    }

    #[test]
    fn changing_any_array_element_breaks_equality(
        items in prop::collection::vec(-50i64..50, 1..8),
        at in any::<prop::sample::Index>(),
    ) {
        let original: Value = make_array(items.clone()).into();
        let mut changed = items;
        let i = at.index(changed.len());
        changed[i] += 1000;
        prop_assert!(!equals(&original, &make_array(changed).into()));
    }

    #[test]
    fn stacks_with_different_top_differ(items in prop::collection::vec(0i64..10, 1..6), extra in 10i64..20) {
        let base: Value = make_stack(items.clone()).into();
        let mut pushed = make_stack(items);
        pushed.push(extra);
        prop_assert!(!equals(&base, &pushed.into()));
    }
}
