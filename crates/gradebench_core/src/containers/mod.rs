//! Container shapes the harness knows how to compare and render.
//!
//! These are deliberately small collaborators: each exposes the read operations the inspector needs
//! (size, positional access, ordered iteration, adjacency) plus the mutating operations candidate code
//! is expected to exercise. Operations that can fail return a [`crate::Fault`] with the kind a grader
//! would expect to match on (e.g. `StackUnderflowError`).

mod graph;
mod linked;
mod sequential;
mod set;
mod trees;

pub use graph::{Graph, Vertex};
pub use linked::ListNode;
pub use sequential::{Array, Array2D, Queue, Stack};
pub use set::OrderedSet;
pub use trees::{BinaryTreeNode, NaryTreeNode, depth};
