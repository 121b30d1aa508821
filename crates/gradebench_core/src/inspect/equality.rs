use std::collections::{HashMap, HashSet};

use crate::containers::{BinaryTreeNode, ListNode, NaryTreeNode, OrderedSet};
use crate::value::Value;

const REL_TOL: f64 = 1e-9;

/// Structural equality between two checked values.
pub fn equals(first: &Value, second: &Value) -> bool {
    match (first, second) {
        (Value::Array(a), Value::Array(b)) => a.length() == b.length() && pairwise(a.as_slice(), b.as_slice()),
        (Value::Array2D(a), Value::Array2D(b)) => {
            a.rows() == b.rows() && a.columns() == b.columns() && (0..a.rows()).all(|r| pairwise(a.row(r), b.row(r)))
        }
        (Value::Queue(a), Value::Queue(b)) => {
            a.size() == b.size() && a.iter().zip(b.iter()).all(|(x, y)| equals(x, y))
        }
        (Value::Stack(a), Value::Stack(b)) => {
            a.size() == b.size() && a.iter_from_top().zip(b.iter_from_top()).all(|(x, y)| equals(x, y))
        }
        (Value::Set(a), Value::Set(b)) => set_equals(a, b),
        (Value::Chain(Some(a)), Value::Chain(Some(b))) => chain_equals(a, b),
        (Value::BinaryTree(Some(a)), Value::BinaryTree(Some(b))) => binary_equals(a, b),
        (Value::NaryTree(Some(a)), Value::NaryTree(Some(b))) => nary_equals(a, b),
        (Value::Vertex(a), Value::Vertex(b)) => a == b,
        (Value::Graph(a), Value::Graph(b)) => a == b,
        (Value::List(a), Value::List(b)) => a.len() == b.len() && pairwise(a, b),
        (Value::Float(a), Value::Float(b)) => is_close(*a, *b),
        (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => (*a as f64) == *b,
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        // Booleans are numbers under native equality: `True == 1` and `False == 0.0`.
        (Value::Bool(a), Value::Int(b)) | (Value::Int(b), Value::Bool(a)) => i64::from(*a) == *b,
        (Value::Bool(a), Value::Float(b)) | (Value::Float(b), Value::Bool(a)) => f64::from(u8::from(*a)) == *b,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Native(a), Value::Native(b)) => a.native_eq(b.as_ref()),
        (a, b) => a.is_none() && b.is_none(),
    }
}

/// Relative closeness within `REL_TOL`. Infinities are close only to themselves and NaN to nothing.
pub fn is_close(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    if a.is_infinite() || b.is_infinite() {
        return false;
    }
    (a - b).abs() <= REL_TOL * a.abs().max(b.abs())
}

fn pairwise(a: &[Value], b: &[Value]) -> bool {
    a.iter().zip(b).all(|(x, y)| equals(x, y))
}

fn set_equals(a: &OrderedSet, b: &OrderedSet) -> bool {
    a.size() == b.size() && a.iter().all(|x| b.contains(x)) && b.iter().all(|y| a.contains(y))
}

/// Walk both chains in lock-step.
///
/// Each chain tracks the position at which every node was first seen. Revisiting a node means that chain
/// closes a cycle; the chains are equal only if both close their cycle at the same step, back to the same
/// position. A cycle in just one chain, or chains of different lengths, are unequal.
fn chain_equals(expected: &ListNode, actual: &ListNode) -> bool {
    let mut seen_expected: HashMap<usize, usize> = HashMap::new();
    let mut seen_actual: HashMap<usize, usize> = HashMap::new();
    let mut e = Some(expected.clone());
    let mut a = Some(actual.clone());
    let mut position = 0usize;
    loop {
        match (e, a) {
            (None, None) => return true,
            (Some(x), Some(y)) => {
                match (seen_expected.get(&x.id()), seen_actual.get(&y.id())) {
                    (None, None) => {}
                    (Some(i), Some(j)) => return i == j,
                    _ => return false,
                }
                seen_expected.insert(x.id(), position);
                seen_actual.insert(y.id(), position);
                if !equals(&x.data(), &y.data()) {
                    return false;
                }
                e = x.next();
                a = y.next();
                position += 1;
            }
            _ => return false,
        }
    }
}

fn binary_equals(a: &BinaryTreeNode, b: &BinaryTreeNode) -> bool {
    let mut pending = vec![(a.clone(), b.clone())];
    let mut visited = HashSet::new();
    while let Some((x, y)) = pending.pop() {
        if !visited.insert((x.id(), y.id())) {
            continue;
        }
        if !equals(&x.data(), &y.data()) {
            return false;
        }
        for pair in [(x.left(), y.left()), (x.right(), y.right())] {
            match pair {
                (None, None) => {}
                (Some(p), Some(q)) => pending.push((p, q)),
                _ => return false,
            }
        }
    }
    true
}

// Parent links are back-references; the shape is fully described by child/sibling links.
fn nary_equals(a: &NaryTreeNode, b: &NaryTreeNode) -> bool {
    let mut pending = vec![(a.clone(), b.clone())];
    let mut visited = HashSet::new();
    while let Some((x, y)) = pending.pop() {
        if !visited.insert((x.id(), y.id())) {
            continue;
        }
        if !equals(&x.data(), &y.data()) {
            return false;
        }
        for pair in [
            (x.leftmost_child(), y.leftmost_child()),
            (x.right_sibling(), y.right_sibling()),
        ] {
            match pair {
                (None, None) => {}
                (Some(p), Some(q)) => pending.push((p, q)),
                _ => return false,
            }
        }
    }
    true
}
