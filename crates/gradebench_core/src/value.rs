//! The checked value model.
//!
//! Everything that flows through the harness (arguments, return values, expectations) is a [`Value`].
//! The recognized container shapes are closed variants so the inspector can dispatch with an exhaustive
//! `match`; anything else rides in [`Value::Native`] and falls back to its own `PartialEq`/`Display`.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::containers::{
    Array, Array2D, BinaryTreeNode, Graph, ListNode, NaryTreeNode, OrderedSet, Queue, Stack, Vertex,
};
use crate::faults::Fault;
use crate::inspect::{equals, render};

/// A value subject to equality checks and rendering.
#[derive(Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// A plain sequence (argument lists, tuples of results, ...).
    List(Vec<Value>),
    Array(Array),
    Array2D(Array2D),
    Queue(Queue),
    Stack(Stack),
    Set(OrderedSet),
    /// Head of a singly linked chain; `None` is the empty chain.
    Chain(Option<ListNode>),
    BinaryTree(Option<BinaryTreeNode>),
    NaryTree(Option<NaryTreeNode>),
    Vertex(Vertex),
    Graph(Graph),
    /// Any other type; compared with its own `PartialEq` and rendered with its `Display`.
    Native(Rc<dyn NativeValue>),
}

/// Object-safe view of a foreign type that only knows native equality and display.
pub trait NativeValue: fmt::Display {
    fn as_any(&self) -> &dyn Any;
    fn native_eq(&self, other: &dyn NativeValue) -> bool;
    fn native_type_name(&self) -> &'static str;
}

impl<T: PartialEq + fmt::Display + 'static> NativeValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn native_eq(&self, other: &dyn NativeValue) -> bool {
        other.as_any().downcast_ref::<T>().is_some_and(|o| self == o)
    }

    fn native_type_name(&self) -> &'static str {
        let full = std::any::type_name::<T>();
        full.rsplit("::").next().unwrap_or(full)
    }
}

macro_rules! shape_accessors {
    ($($variant:ident => $ty:ty, $get:ident, $get_mut:ident;)*) => {
        $(
            #[doc = concat!("Borrow as `", stringify!($ty), "`, or fault with `TypeError`.")]
            pub fn $get(&self) -> Result<&$ty, Fault> {
                match self {
                    Value::$variant(inner) => Ok(inner),
                    other => Err(other.shape_mismatch(stringify!($variant))),
                }
            }

            #[doc = concat!("Mutably borrow as `", stringify!($ty), "`, or fault with `TypeError`.")]
            pub fn $get_mut(&mut self) -> Result<&mut $ty, Fault> {
                match self {
                    Value::$variant(inner) => Ok(inner),
                    other => Err(other.shape_mismatch(stringify!($variant))),
                }
            }
        )*
    };
}

impl Value {
    /// Wrap a foreign value that should be compared natively.
    pub fn native<T: PartialEq + fmt::Display + 'static>(value: T) -> Value {
        Value::Native(Rc::new(value))
    }

    /// Whether this is `None` or an empty chain/tree handle.
    pub fn is_none(&self) -> bool {
        matches!(
            self,
            Value::None | Value::Chain(None) | Value::BinaryTree(None) | Value::NaryTree(None)
        )
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    shape_accessors! {
        List => Vec<Value>, list, list_mut;
        Array => Array, array, array_mut;
        Array2D => Array2D, array2d, array2d_mut;
        Queue => Queue, queue, queue_mut;
        Stack => Stack, stack, stack_mut;
        Set => OrderedSet, set, set_mut;
        Vertex => Vertex, vertex, vertex_mut;
        Graph => Graph, graph, graph_mut;
    }

    /// Head node of a chain; `Ok(None)` for an empty chain or `None`.
    pub fn chain(&self) -> Result<Option<ListNode>, Fault> {
        match self {
            Value::Chain(head) => Ok(head.clone()),
            Value::None => Ok(None),
            other => Err(other.shape_mismatch("Chain")),
        }
    }

    pub fn binary_tree(&self) -> Result<Option<BinaryTreeNode>, Fault> {
        match self {
            Value::BinaryTree(root) => Ok(root.clone()),
            Value::None => Ok(None),
            other => Err(other.shape_mismatch("BinaryTree")),
        }
    }

    pub fn nary_tree(&self) -> Result<Option<NaryTreeNode>, Fault> {
        match self {
            Value::NaryTree(root) => Ok(root.clone()),
            Value::None => Ok(None),
            other => Err(other.shape_mismatch("NaryTree")),
        }
    }

    /// Name of the value's shape, as shown in behavior transcripts and type faults.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Array(_) => "Array",
            Value::Array2D(_) => "Array2D",
            Value::Queue(_) => "Queue",
            Value::Stack(_) => "Stack",
            Value::Set(_) => "Set",
            Value::Chain(_) => "SinglyLinkedListNode",
            Value::BinaryTree(_) => "BinaryTreeNode",
            Value::NaryTree(_) => "NaryTreeNode",
            Value::Vertex(_) => "Vertex",
            Value::Graph(_) => "Graph",
            Value::Native(inner) => inner.native_type_name(),
        }
    }

    fn shape_mismatch(&self, wanted: &str) -> Fault {
        Fault::type_error(format!("expected {wanted}, got {}", self.type_name()))
    }

    /// Produce an independent copy that shares no mutable state with `self`.
    ///
    /// Node aliasing inside the value is reproduced: two references to one node become two references to
    /// one copied node, and cycles stay cycles. Native values are immutable and stay shared.
    pub fn deep_copy(&self) -> Value {
        Copier::default().copy(self)
    }
}

#[derive(Default)]
struct Copier {
    chains: HashMap<usize, ListNode>,
    binary: HashMap<usize, BinaryTreeNode>,
    nary: HashMap<usize, NaryTreeNode>,
}

impl Copier {
    fn copy(&mut self, value: &Value) -> Value {
        match value {
            Value::List(items) => Value::List(items.iter().map(|item| self.copy(item)).collect()),
            Value::Array(array) => {
                let mut out = array.clone();
                self.copy_all(out.values_mut());
                Value::Array(out)
            }
            Value::Array2D(grid) => {
                let mut out = grid.clone();
                self.copy_all(out.cells_mut());
                Value::Array2D(out)
            }
            Value::Queue(queue) => {
                let mut out = queue.clone();
                self.copy_all(out.values_mut());
                Value::Queue(out)
            }
            Value::Stack(stack) => {
                let mut out = stack.clone();
                self.copy_all(out.values_mut());
                Value::Stack(out)
            }
            Value::Set(set) => {
                let mut out = set.clone();
                self.copy_all(out.values_mut());
                Value::Set(out)
            }
            Value::Vertex(vertex) => {
                let mut out = vertex.clone();
                self.copy_all(out.attribute_values_mut());
                Value::Vertex(out)
            }
            Value::Graph(graph) => {
                let mut out = graph.clone();
                self.copy_all(out.values_mut());
                Value::Graph(out)
            }
            Value::Chain(head) => Value::Chain(head.as_ref().map(|h| self.chain(h))),
            Value::BinaryTree(root) => Value::BinaryTree(root.as_ref().map(|r| self.binary(r))),
            Value::NaryTree(root) => Value::NaryTree(root.as_ref().map(|r| self.nary(r))),
            Value::None
            | Value::Bool(_)
            | Value::Int(_)
            | Value::Float(_)
            | Value::Str(_)
            | Value::Native(_) => value.clone(),
        }
    }

    fn copy_all<'v>(&mut self, values: impl IntoIterator<Item = &'v mut Value>) {
        for slot in values {
            *slot = self.copy(slot);
        }
    }

    // Iterative along `next` so long chains do not grow the call stack.
    fn chain(&mut self, head: &ListNode) -> ListNode {
        if let Some(done) = self.chains.get(&head.id()) {
            return done.clone();
        }
        let first = ListNode::new(Value::None);
        self.chains.insert(head.id(), first.clone());

        let mut src = head.clone();
        let mut dst = first.clone();
        loop {
            let data = self.copy(&src.data());
            dst.set_data(data);
            let Some(next) = src.next() else { break };
            if let Some(seen) = self.chains.get(&next.id()) {
                dst.set_next(Some(seen.clone()));
                break;
            }
            let node = ListNode::new(Value::None);
            self.chains.insert(next.id(), node.clone());
            dst.set_next(Some(node.clone()));
            src = next;
            dst = node;
        }
        first
    }

    // Trees are copied from a worklist rather than by recursion so a degenerate (list-shaped) tree
    // cannot exhaust the call stack. A node is memoized before its children are visited.
    fn binary(&mut self, root: &BinaryTreeNode) -> BinaryTreeNode {
        let mut pending = Vec::new();
        let out = self.binary_shell(root, &mut pending);
        while let Some((src, dst)) = pending.pop() {
            let data = self.copy(&src.data());
            dst.set_data(data);
            let left = src.left().map(|l| self.binary_shell(&l, &mut pending));
            dst.set_left(left);
            let right = src.right().map(|r| self.binary_shell(&r, &mut pending));
            dst.set_right(right);
        }
        out
    }

    fn binary_shell(
        &mut self,
        src: &BinaryTreeNode,
        pending: &mut Vec<(BinaryTreeNode, BinaryTreeNode)>,
    ) -> BinaryTreeNode {
        if let Some(done) = self.binary.get(&src.id()) {
            return done.clone();
        }
        let node = BinaryTreeNode::new(Value::None);
        self.binary.insert(src.id(), node.clone());
        pending.push((src.clone(), node.clone()));
        node
    }

    fn nary(&mut self, root: &NaryTreeNode) -> NaryTreeNode {
        let mut pending = Vec::new();
        let out = self.nary_shell(root, &mut pending);
        while let Some((src, dst)) = pending.pop() {
            let data = self.copy(&src.data());
            dst.set_data(data);
            let child = src.leftmost_child().map(|c| self.nary_shell(&c, &mut pending));
            dst.set_leftmost_child(child);
            let sibling = src.right_sibling().map(|s| self.nary_shell(&s, &mut pending));
            dst.set_right_sibling(sibling);
        }
        out
    }

    fn nary_shell(&mut self, src: &NaryTreeNode, pending: &mut Vec<(NaryTreeNode, NaryTreeNode)>) -> NaryTreeNode {
        if let Some(done) = self.nary.get(&src.id()) {
            return done.clone();
        }
        let node = NaryTreeNode::new(Value::None);
        self.nary.insert(src.id(), node.clone());
        // A parent outside the copied subtree stays the original parent. Parents are always reached
        // before their children, so an inside parent is already memoized here.
        if let Some(parent) = src.parent() {
            let mapped = self.nary.get(&parent.id()).cloned().unwrap_or(parent);
            node.set_parent(Some(&mapped));
        }
        pending.push((src.clone(), node.clone()));
        node
    }
}

impl PartialEq for Value {
    /// Structural equality, as decided by [`crate::inspect::equals`].
    fn eq(&self, other: &Self) -> bool {
        equals(self, other)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.type_name(), render(self))
    }
}

macro_rules! value_from {
    ($($ty:ty => |$v:ident| $body:expr;)*) => {
        $(
            impl From<$ty> for Value {
                fn from($v: $ty) -> Self {
                    $body
                }
            }
        )*
    };
}

value_from! {
    () => |_v| Value::None;
    bool => |v| Value::Bool(v);
    i64 => |v| Value::Int(v);
    i32 => |v| Value::Int(i64::from(v));
    u32 => |v| Value::Int(i64::from(v));
    usize => |v| Value::Int(i64::try_from(v).unwrap_or(i64::MAX));
    f64 => |v| Value::Float(v);
    f32 => |v| Value::Float(f64::from(v));
    &str => |v| Value::Str(v.to_string());
    String => |v| Value::Str(v);
    Array => |v| Value::Array(v);
    Array2D => |v| Value::Array2D(v);
    Queue => |v| Value::Queue(v);
    Stack => |v| Value::Stack(v);
    OrderedSet => |v| Value::Set(v);
    ListNode => |v| Value::Chain(Some(v));
    BinaryTreeNode => |v| Value::BinaryTree(Some(v));
    NaryTreeNode => |v| Value::NaryTree(Some(v));
    Vertex => |v| Value::Vertex(v);
    Graph => |v| Value::Graph(v);
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::None, Into::into)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::factory::{make_array, make_chain};

    #[test]
    fn deep_copy_is_independent_of_the_original() {
        let original = Value::List(vec![make_array([1, 2, 3]).into(), Value::from("x")]);
        let mut copy = original.deep_copy();
        copy.list_mut().unwrap()[0].array_mut().unwrap().set(0, 99).unwrap();
        assert_eq!(render(&original), "[[1, 2, 3], x]");
        assert_eq!(render(&copy), "[[99, 2, 3], x]");
    }

    #[test]
    fn deep_copy_preserves_cycles_and_aliasing() {
        let head = make_chain([1, 2, 3], Some(1)).unwrap();
        let original = Value::List(vec![Value::from(head.clone()), Value::from(head.clone())]);
        let copy = original.deep_copy();
        let items = copy.list().unwrap();
        let (a, b) = (items[0].chain().unwrap().unwrap(), items[1].chain().unwrap().unwrap());
        assert!(a.ptr_eq(&b), "aliasing inside one value must be kept");
        assert!(!a.ptr_eq(&head));
        // 1 -> 2 -> 3 -> back to 2
        let third = a.next().unwrap().next().unwrap();
        assert!(third.next().unwrap().ptr_eq(&a.next().unwrap()));
        assert_eq!(render(&items[0]), "1➔ 2➔ 3➔ cycle");
    }

    #[test]
    fn deep_copy_remaps_nary_parents() {
        let root = NaryTreeNode::new(1);
        let child = NaryTreeNode::new(2);
        root.add_child(&child);
        let copy = Value::from(root.clone()).deep_copy().nary_tree().unwrap().unwrap();
        let copied_child = copy.leftmost_child().unwrap();
        assert!(copied_child.parent().unwrap().ptr_eq(&copy));
        assert_eq!(copied_child.depth(), 1);
    }

    #[test]
    fn deep_copy_handles_degenerate_trees() {
        const DEPTH: i64 = 100_000;
        let mut spine = BinaryTreeNode::new(0);
        for i in 1..DEPTH {
            spine = BinaryTreeNode::with_children(i, Some(spine), None);
        }
        let original = Value::from(spine);
        let copy = original.deep_copy();
        assert!(crate::equals(&original, &copy));

        let root = NaryTreeNode::new(0);
        let mut deepest = root.clone();
        for i in 1..DEPTH {
            let child = NaryTreeNode::new(i);
            deepest.add_child(&child);
            deepest = child;
        }
        let copy = Value::from(root.clone()).deep_copy().nary_tree().unwrap().unwrap();
        assert!(crate::equals(&Value::from(root), &Value::from(copy)));
        // Dropping the copies and originals must not recurse once per level either.
    }

    #[test]
    fn long_chains_drop_without_recursion() {
        let head = crate::factory::make_chain(0..200_000i64, None);
        let copy = Value::from(head).deep_copy();
        drop(copy);
    }

    #[test]
    fn accessors_fault_on_shape_mismatch() {
        let mut v = Value::Int(3);
        let err = v.stack_mut().unwrap_err();
        assert_eq!(err.to_string(), "TypeError: expected Stack, got int");
        assert!(Value::None.chain().unwrap().is_none());
    }

    #[test]
    fn native_values_compare_with_their_own_eq() {
        #[derive(PartialEq)]
        struct Point(i32, i32);
        impl fmt::Display for Point {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "({}, {})", self.0, self.1)
            }
        }
        assert_eq!(Value::native(Point(1, 2)), Value::native(Point(1, 2)));
        assert_ne!(Value::native(Point(1, 2)), Value::native(Point(2, 1)));
        assert_ne!(Value::native(Point(1, 2)), Value::native(3_u8));
        assert_eq!(Value::native(Point(1, 2)).type_name(), "Point");
        assert_eq!(render(&Value::native(Point(1, 2))), "(1, 2)");
    }
}
