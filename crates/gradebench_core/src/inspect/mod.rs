//! The value inspector: structural equality and canonical rendering.
//!
//! Both entry points are total over [`crate::Value`]. They dispatch on the value's shape with a single
//! `match`; the first shape pair that applies decides, and mismatched shapes are unequal.
//!
//! ## Notes
//! - Floats compare with a relative tolerance (`1e-9`), never bit-exactly.
//! - Queue and stack comparison walks the containers in place; nothing is drained, so comparing a value
//!   with itself any number of times leaves it untouched.
//! - Sets compare order-independently even though they render in insertion order.
//! - Graphs use their native equality (`Graph: PartialEq`). Callers that need a looser graph comparison
//!   pass their own comparator to the harness.
//! - Linked and tree traversals track node identity, so cyclic values terminate.

mod equality;
mod render;

pub use equality::{equals, is_close};
pub use render::{render, render_float};
