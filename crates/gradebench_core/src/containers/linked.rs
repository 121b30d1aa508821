//! Singly linked chains built from shared nodes.

use std::cell::RefCell;
use std::rc::Rc;

use crate::value::Value;

#[derive(Debug)]
struct ListNodeData {
    data: Value,
    next: Option<ListNode>,
}

// Walk the owned tail instead of recursing so long chains drop in constant stack.
impl Drop for ListNodeData {
    fn drop(&mut self) {
        let mut next = self.next.take();
        while let Some(node) = next {
            next = match Rc::try_unwrap(node.0) {
                Ok(cell) => cell.into_inner().next.take(),
                Err(_) => None,
            };
        }
    }
}

/// A shared handle to a singly linked list node.
///
/// Cloning the handle aliases the node; use [`Value::deep_copy`] for an independent chain. Chains may be
/// cyclic: `a.set_next(Some(a.clone()))` is a valid one-node cycle.
#[derive(Clone)]
pub struct ListNode(Rc<RefCell<ListNodeData>>);

impl ListNode {
    pub fn new(data: impl Into<Value>) -> Self {
        Self::with_next(data, None)
    }

    pub fn with_next(data: impl Into<Value>, next: Option<ListNode>) -> Self {
        ListNode(Rc::new(RefCell::new(ListNodeData {
            data: data.into(),
            next,
        })))
    }

    pub fn data(&self) -> Value {
        self.0.borrow().data.clone()
    }

    pub fn set_data(&self, data: impl Into<Value>) {
        self.0.borrow_mut().data = data.into();
    }

    pub fn next(&self) -> Option<ListNode> {
        self.0.borrow().next.clone()
    }

    pub fn set_next(&self, next: Option<ListNode>) {
        self.0.borrow_mut().next = next;
    }

    /// Whether both handles point at the same node.
    pub fn ptr_eq(&self, other: &ListNode) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Node identity, stable for the node's lifetime.
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl std::fmt::Debug for ListNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The derived form would recurse forever on a cycle.
        f.write_str(&crate::render(&Value::Chain(Some(self.clone()))))
    }
}
