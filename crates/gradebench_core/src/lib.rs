//! Core value model for the gradebench verification harness.
//!
//! This crate knows nothing about processes, logs, or CLI flags. It defines the values candidate code
//! operates on ([`Value`] and the [`containers`]), the fault vocabulary candidates may raise
//! ([`FaultKind`], [`Fault`]), and the inspector that decides equality and renders values for humans
//! ([`equals`], [`render`]).
//!
//! ## Panic Policy
//!
//! Library code returns [`Fault`]s rather than panicking. Panics that escape candidate code are caught by
//! the harness and turned into [`FaultKind::Panic`] via [`Fault::from_panic`].

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used)]

pub mod containers;
pub mod factory;
pub mod faults;
pub mod inspect;
pub mod value;

pub use containers::{Array, Array2D, BinaryTreeNode, Graph, ListNode, NaryTreeNode, OrderedSet, Queue, Stack, Vertex};
pub use faults::{FAULTS, Fault, FaultKind};
pub use inspect::{equals, render};
pub use value::{NativeValue, Value};
