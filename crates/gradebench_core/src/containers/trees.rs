//! Binary and n-ary tree nodes.
//!
//! Both node types are shared handles (`Rc<RefCell<_>>`) so candidates can re-link subtrees freely.
//! The n-ary node uses the leftmost-child/right-sibling encoding; its parent link is weak so a tree
//! does not keep itself alive through its own back-references.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::faults::Fault;
use crate::value::Value;

#[derive(Debug)]
struct BinaryData {
    data: Value,
    left: Option<BinaryTreeNode>,
    right: Option<BinaryTreeNode>,
}

// Unlink owned subtrees from a worklist so dropping a deep tree does not recurse once per level.
impl Drop for BinaryData {
    fn drop(&mut self) {
        let mut pending: Vec<BinaryTreeNode> = self.left.take().into_iter().chain(self.right.take()).collect();
        while let Some(node) = pending.pop() {
            if let Ok(cell) = Rc::try_unwrap(node.0) {
                let mut data = cell.into_inner();
                pending.extend(data.left.take());
                pending.extend(data.right.take());
            }
        }
    }
}

/// A binary tree node with `data`, `left` and `right`.
#[derive(Clone)]
pub struct BinaryTreeNode(Rc<RefCell<BinaryData>>);

impl BinaryTreeNode {
    pub fn new(data: impl Into<Value>) -> Self {
        Self::with_children(data, None, None)
    }

    pub fn with_children(data: impl Into<Value>, left: Option<BinaryTreeNode>, right: Option<BinaryTreeNode>) -> Self {
        BinaryTreeNode(Rc::new(RefCell::new(BinaryData {
            data: data.into(),
            left,
            right,
        })))
    }

    pub fn data(&self) -> Value {
        self.0.borrow().data.clone()
    }

    pub fn set_data(&self, data: impl Into<Value>) {
        self.0.borrow_mut().data = data.into();
    }

    pub fn left(&self) -> Option<BinaryTreeNode> {
        self.0.borrow().left.clone()
    }

    pub fn set_left(&self, left: Option<BinaryTreeNode>) {
        self.0.borrow_mut().left = left;
    }

    pub fn right(&self) -> Option<BinaryTreeNode> {
        self.0.borrow().right.clone()
    }

    pub fn set_right(&self, right: Option<BinaryTreeNode>) {
        self.0.borrow_mut().right = right;
    }

    pub fn ptr_eq(&self, other: &BinaryTreeNode) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl std::fmt::Debug for BinaryTreeNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&crate::render(&Value::BinaryTree(Some(self.clone()))))
    }
}

struct NaryData {
    data: Value,
    parent: Weak<RefCell<NaryData>>,
    leftmost_child: Option<NaryTreeNode>,
    right_sibling: Option<NaryTreeNode>,
}

impl Drop for NaryData {
    fn drop(&mut self) {
        let mut pending: Vec<NaryTreeNode> = self
            .leftmost_child
            .take()
            .into_iter()
            .chain(self.right_sibling.take())
            .collect();
        while let Some(node) = pending.pop() {
            if let Ok(cell) = Rc::try_unwrap(node.0) {
                let mut data = cell.into_inner();
                pending.extend(data.leftmost_child.take());
                pending.extend(data.right_sibling.take());
            }
        }
    }
}

/// An n-ary tree node in leftmost-child/right-sibling form.
#[derive(Clone)]
pub struct NaryTreeNode(Rc<RefCell<NaryData>>);

impl NaryTreeNode {
    pub fn new(data: impl Into<Value>) -> Self {
        NaryTreeNode(Rc::new(RefCell::new(NaryData {
            data: data.into(),
            parent: Weak::new(),
            leftmost_child: None,
            right_sibling: None,
        })))
    }

    pub fn data(&self) -> Value {
        self.0.borrow().data.clone()
    }

    pub fn set_data(&self, data: impl Into<Value>) {
        self.0.borrow_mut().data = data.into();
    }

    /// The parent, if it is still alive.
    pub fn parent(&self) -> Option<NaryTreeNode> {
        self.0.borrow().parent.upgrade().map(NaryTreeNode)
    }

    pub fn set_parent(&self, parent: Option<&NaryTreeNode>) {
        self.0.borrow_mut().parent = parent.map_or_else(Weak::new, |p| Rc::downgrade(&p.0));
    }

    pub fn leftmost_child(&self) -> Option<NaryTreeNode> {
        self.0.borrow().leftmost_child.clone()
    }

    pub fn set_leftmost_child(&self, child: Option<NaryTreeNode>) {
        self.0.borrow_mut().leftmost_child = child;
    }

    pub fn right_sibling(&self) -> Option<NaryTreeNode> {
        self.0.borrow().right_sibling.clone()
    }

    pub fn set_right_sibling(&self, sibling: Option<NaryTreeNode>) {
        self.0.borrow_mut().right_sibling = sibling;
    }

    /// Append `child` as the new rightmost child, wiring its parent link.
    pub fn add_child(&self, child: &NaryTreeNode) {
        child.set_parent(Some(self));
        match self.leftmost_child() {
            None => self.set_leftmost_child(Some(child.clone())),
            Some(first) => {
                let mut last = first;
                while let Some(next) = last.right_sibling() {
                    last = next;
                }
                last.set_right_sibling(Some(child.clone()));
            }
        }
    }

    /// Number of edges between this node and the root of its tree.
    pub fn depth(&self) -> usize {
        let mut levels = 0;
        let mut current = self.parent();
        while let Some(node) = current {
            levels += 1;
            current = node.parent();
        }
        levels
    }

    pub fn ptr_eq(&self, other: &NaryTreeNode) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl std::fmt::Debug for NaryTreeNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&crate::render(&Value::NaryTree(Some(self.clone()))))
    }
}

/// Depth of an n-ary node held in a `Value`.
///
/// ## Errors
/// - `TypeError` if `value` is not an n-ary tree node.
pub fn depth(value: &Value) -> Result<usize, Fault> {
    match value {
        Value::NaryTree(Some(node)) => Ok(node.depth()),
        other => Err(Fault::type_error(format!(
            "can only calculate depth of NaryTreeNode not {}",
            other.type_name()
        ))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn depth_follows_parent_links() {
        let root = NaryTreeNode::new(1);
        let child = NaryTreeNode::new(2);
        let grandchild = NaryTreeNode::new(3);
        root.add_child(&child);
        child.add_child(&grandchild);
        assert_eq!(root.depth(), 0);
        assert_eq!(grandchild.depth(), 2);
        assert_eq!(depth(&Value::NaryTree(Some(grandchild))).unwrap(), 2);
        assert!(depth(&Value::Int(1)).is_err());
    }

    #[test]
    fn add_child_appends_to_the_sibling_chain() {
        let root = NaryTreeNode::new("r");
        let a = NaryTreeNode::new("a");
        let b = NaryTreeNode::new("b");
        root.add_child(&a);
        root.add_child(&b);
        let first = root.leftmost_child().unwrap();
        assert!(first.ptr_eq(&a));
        assert!(first.right_sibling().unwrap().ptr_eq(&b));
        assert!(b.parent().unwrap().ptr_eq(&root));
    }
}
