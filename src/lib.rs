#![forbid(unsafe_code)]
//! Gradebench: a verification harness for grading data-structure implementations
//!
//! Graders write [`harness::TestCase`]s that call candidate code through the outcome comparator
//! ([`harness::GenericTest`]) or the sequence behavior verifier ([`harness::Behavior`]). A
//! [`harness::Suite`] runs them, optionally each in its own time-limited process, and reports either a
//! human-readable log or machine-readable grading columns.
//!
//! The value model, containers and inspector live in the `gradebench_core` crate and are re-exported
//! here.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` and `harness` modules
//!   enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **Candidate code**: Panics raised by graded code are caught and recorded as faults; they never abort a
//!   batch.

pub mod cli;
pub mod harness;
pub mod selfcheck;

pub use gradebench_core::{containers, factory, faults, inspect, value};
pub use gradebench_core::{
    Array, Array2D, BinaryTreeNode, Fault, FaultKind, Graph, ListNode, NaryTreeNode, OrderedSet, Queue, Stack, Value,
    Vertex, equals, render,
};
