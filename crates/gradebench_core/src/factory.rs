//! Builders for container fixtures.
//!
//! Test cases are mostly literals, so every factory takes any `IntoIterator` of things convertible to a
//! [`Value`]: `make_stack([1, 2, 3])`, `make_array(vec!["a", "b"])`.

use crate::containers::{Array, Array2D, ListNode, OrderedSet, Queue, Stack};
use crate::faults::Fault;
use crate::value::Value;

pub fn make_array<I>(items: I) -> Array
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    Array::from_values(items.into_iter().map(Into::into).collect())
}

/// Build a grid from its rows.
///
/// ## Errors
/// `ValueError` when there are no rows, no columns, or the rows are ragged.
pub fn make_array2d<R, I>(rows: R) -> Result<Array2D, Fault>
where
    R: IntoIterator<Item = I>,
    I: IntoIterator,
    I::Item: Into<Value>,
{
    Array2D::from_rows(
        rows.into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect(),
    )
}

/// Enqueue left to right; the first item ends up at the front.
pub fn make_queue<I>(items: I) -> Queue
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    let mut queue = Queue::new();
    for item in items {
        queue.enqueue(item);
    }
    queue
}

/// Push left to right; the last item ends up on top.
pub fn make_stack<I>(items: I) -> Stack
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    let mut stack = Stack::new();
    for item in items {
        stack.push(item);
    }
    stack
}

/// A stack with the same order and independently copied elements.
pub fn copy_stack(stack: &Stack) -> Stack {
    make_stack(stack.iter_from_bottom().map(Value::deep_copy))
}

pub fn make_set<I>(items: I) -> OrderedSet
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    items.into_iter().collect()
}

/// Link the items into a chain and return its head, or `None` for no items.
///
/// With `cycle_to = Some(i)` the last node points back at the `i`-th node. An index past the end leaves
/// the chain acyclic.
pub fn make_chain<I>(items: I, cycle_to: Option<usize>) -> Option<ListNode>
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    let nodes: Vec<ListNode> = items.into_iter().map(ListNode::new).collect();
    for pair in nodes.windows(2) {
        pair[0].set_next(Some(pair[1].clone()));
    }
    if let (Some(last), Some(target)) = (nodes.last(), cycle_to.and_then(|i| nodes.get(i))) {
        last.set_next(Some(target.clone()));
    }
    nodes.into_iter().next()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::render;

    #[test]
    fn stack_top_is_last_item() {
        let mut stack = make_stack([1, 2, 3]);
        assert_eq!(stack.pop().unwrap(), Value::Int(3));
    }

    #[test]
    fn queue_front_is_first_item() {
        let mut queue = make_queue(["a", "b"]);
        assert_eq!(queue.dequeue().unwrap(), Value::from("a"));
    }

    #[test]
    fn copy_stack_leaves_source_intact() {
        let source = make_stack([make_array([1]), make_array([2])]);
        let mut copy = copy_stack(&source);
        copy.pop().unwrap();
        assert_eq!(source.size(), 2);
        assert_eq!(render(&Value::from(source)), "[[1], [2]]");
    }

    #[test]
    fn ragged_grid_is_rejected() {
        let err = make_array2d(vec![vec![1, 2], vec![3]]).unwrap_err();
        assert_eq!(err.kind, crate::FaultKind::ValueError);
    }

    #[test]
    fn chain_with_cycle_index_past_end_stays_acyclic() {
        assert!(make_chain(Vec::<i64>::new(), None).is_none());
        let head = make_chain([1, 2], Some(7)).unwrap();
        assert!(head.next().unwrap().next().is_none());
    }
}
