//! Fault vocabulary raised by candidate code and container collaborators.
//!
//! Candidate functions report failure by returning a [`Fault`]. The harness only ever matches on the
//! [`FaultKind`], so the registry below is the single place where kind names and their meaning live.
//!
//! ## Notes
//! - `Exception` is the base kind: every fault is an instance of it, mirroring "catch anything" expectations.
//! - Panics escaping candidate code are converted to [`FaultKind::Panic`] at the invocation boundary.

use std::any::Any;
use std::fmt;

use thiserror::Error;

/// Identify the kind of a fault.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FaultKind {
    Exception,
    ValueError,
    TypeError,
    IndexError,
    KeyError,
    RuntimeError,
    ZeroDivisionError,
    StackUnderflowError,
    QueueUnderflowError,
    PriorityQueueUnderflowError,
    VertexAttributeError,
    GraphVertexError,
    GraphEdgeError,
    /// Candidate code panicked instead of returning a fault.
    Panic,
    /// A kind defined by the caller (e.g. a student-defined error type).
    Custom(String),
}

/// Metadata for a builtin fault kind.
#[derive(Debug, Clone, Copy)]
pub struct FaultInfo {
    pub id: BuiltinFault,
    pub canonical: &'static str,
    pub description: &'static str,
}

/// Builtin (non-custom) fault kinds, usable in `const` tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinFault {
    Exception,
    ValueError,
    TypeError,
    IndexError,
    KeyError,
    RuntimeError,
    ZeroDivisionError,
    StackUnderflowError,
    QueueUnderflowError,
    PriorityQueueUnderflowError,
    VertexAttributeError,
    GraphVertexError,
    GraphEdgeError,
    Panic,
}

/// Registry of builtin fault kinds.
pub const FAULTS: &[FaultInfo] = &[
    info(BuiltinFault::Exception, "Exception", "Base kind; every fault is an instance of it."),
    info(
        BuiltinFault::ValueError,
        "ValueError",
        "An operation received a value of the right type but an invalid value.",
    ),
    info(
        BuiltinFault::TypeError,
        "TypeError",
        "An operation received a value of an inappropriate type.",
    ),
    info(BuiltinFault::IndexError, "IndexError", "An index is out of bounds."),
    info(BuiltinFault::KeyError, "KeyError", "A key is missing from a table."),
    info(
        BuiltinFault::RuntimeError,
        "RuntimeError",
        "An operation is not allowed on this value (e.g. iterating an Array).",
    ),
    info(BuiltinFault::ZeroDivisionError, "ZeroDivisionError", "Division or modulo by zero."),
    info(
        BuiltinFault::StackUnderflowError,
        "StackUnderflowError",
        "`top()` or `pop()` on an empty stack.",
    ),
    info(
        BuiltinFault::QueueUnderflowError,
        "QueueUnderflowError",
        "`front()` or `dequeue()` on an empty queue.",
    ),
    info(
        BuiltinFault::PriorityQueueUnderflowError,
        "PriorityQueueUnderflowError",
        "`minimum()` or `extract_min()` on an empty priority queue.",
    ),
    info(
        BuiltinFault::VertexAttributeError,
        "VertexAttributeError",
        "A vertex does not carry the requested attribute.",
    ),
    info(
        BuiltinFault::GraphVertexError,
        "GraphVertexError",
        "A vertex is not part of the graph.",
    ),
    info(
        BuiltinFault::GraphEdgeError,
        "GraphEdgeError",
        "An edge is not part of the graph.",
    ),
    info(BuiltinFault::Panic, "Panic", "Candidate code panicked."),
];

const fn info(id: BuiltinFault, canonical: &'static str, description: &'static str) -> FaultInfo {
    FaultInfo {
        id,
        canonical,
        description,
    }
}

impl FaultKind {
    fn builtin(&self) -> Option<BuiltinFault> {
        Some(match self {
            FaultKind::Exception => BuiltinFault::Exception,
            FaultKind::ValueError => BuiltinFault::ValueError,
            FaultKind::TypeError => BuiltinFault::TypeError,
            FaultKind::IndexError => BuiltinFault::IndexError,
            FaultKind::KeyError => BuiltinFault::KeyError,
            FaultKind::RuntimeError => BuiltinFault::RuntimeError,
            FaultKind::ZeroDivisionError => BuiltinFault::ZeroDivisionError,
            FaultKind::StackUnderflowError => BuiltinFault::StackUnderflowError,
            FaultKind::QueueUnderflowError => BuiltinFault::QueueUnderflowError,
            FaultKind::PriorityQueueUnderflowError => BuiltinFault::PriorityQueueUnderflowError,
            FaultKind::VertexAttributeError => BuiltinFault::VertexAttributeError,
            FaultKind::GraphVertexError => BuiltinFault::GraphVertexError,
            FaultKind::GraphEdgeError => BuiltinFault::GraphEdgeError,
            FaultKind::Panic => BuiltinFault::Panic,
            FaultKind::Custom(_) => return None,
        })
    }

    /// Return the canonical spelling (e.g. `"IndexError"`).
    pub fn as_str(&self) -> &str {
        match self {
            FaultKind::Custom(name) => name,
            other => other
                .builtin()
                .and_then(|id| FAULTS.iter().find(|f| f.id == id))
                .map_or("Exception", |f| f.canonical),
        }
    }

    /// Return the registry description, if this is a builtin kind.
    pub fn description(&self) -> Option<&'static str> {
        let id = self.builtin()?;
        FAULTS.iter().find(|f| f.id == id).map(|f| f.description)
    }

    /// Resolve a spelling to a fault kind. Unknown names become [`FaultKind::Custom`].
    pub fn from_name(name: &str) -> FaultKind {
        let builtin = FAULTS.iter().find(|f| f.canonical == name).map(|f| f.id);
        match builtin {
            Some(BuiltinFault::Exception) => FaultKind::Exception,
            Some(BuiltinFault::ValueError) => FaultKind::ValueError,
            Some(BuiltinFault::TypeError) => FaultKind::TypeError,
            Some(BuiltinFault::IndexError) => FaultKind::IndexError,
            Some(BuiltinFault::KeyError) => FaultKind::KeyError,
            Some(BuiltinFault::RuntimeError) => FaultKind::RuntimeError,
            Some(BuiltinFault::ZeroDivisionError) => FaultKind::ZeroDivisionError,
            Some(BuiltinFault::StackUnderflowError) => FaultKind::StackUnderflowError,
            Some(BuiltinFault::QueueUnderflowError) => FaultKind::QueueUnderflowError,
            Some(BuiltinFault::PriorityQueueUnderflowError) => FaultKind::PriorityQueueUnderflowError,
            Some(BuiltinFault::VertexAttributeError) => FaultKind::VertexAttributeError,
            Some(BuiltinFault::GraphVertexError) => FaultKind::GraphVertexError,
            Some(BuiltinFault::GraphEdgeError) => FaultKind::GraphEdgeError,
            Some(BuiltinFault::Panic) => FaultKind::Panic,
            None => FaultKind::Custom(name.to_string()),
        }
    }

    /// Whether a fault of this kind satisfies an expectation of kind `expected`.
    ///
    /// Kinds are flat apart from [`FaultKind::Exception`], which every kind is an instance of.
    pub fn is_instance_of(&self, expected: &FaultKind) -> bool {
        *expected == FaultKind::Exception || self == expected
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fault raised by candidate code or a container operation.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}: {message}")]
pub struct Fault {
    pub kind: FaultKind,
    pub message: String,
}

impl Fault {
    pub fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn value_error(message: impl Into<String>) -> Self {
        Self::new(FaultKind::ValueError, message)
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(FaultKind::TypeError, message)
    }

    pub fn index_error(message: impl Into<String>) -> Self {
        Self::new(FaultKind::IndexError, message)
    }

    pub fn key_error(message: impl Into<String>) -> Self {
        Self::new(FaultKind::KeyError, message)
    }

    pub fn stack_underflow(operation: &str) -> Self {
        Self::new(
            FaultKind::StackUnderflowError,
            format!("cannot perform {operation} on an empty stack"),
        )
    }

    pub fn queue_underflow(operation: &str) -> Self {
        Self::new(
            FaultKind::QueueUnderflowError,
            format!("cannot perform {operation} on an empty queue"),
        )
    }

    /// Convert a caught panic payload into a [`FaultKind::Panic`] fault.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "candidate panicked with a non-string payload".to_string()
        };
        Self::new(FaultKind::Panic, message)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_round_trips_through_its_name() {
        for entry in FAULTS {
            let kind = FaultKind::from_name(entry.canonical);
            assert_eq!(kind.as_str(), entry.canonical);
            assert!(kind.description().is_some());
        }
    }

    #[test]
    fn unknown_names_are_custom() {
        let kind = FaultKind::from_name("HeapCorruptedError");
        assert_eq!(kind, FaultKind::Custom("HeapCorruptedError".to_string()));
        assert_eq!(kind.to_string(), "HeapCorruptedError");
        assert_eq!(kind.description(), None);
    }

    #[test]
    fn exception_is_the_base_of_every_kind() {
        assert!(FaultKind::IndexError.is_instance_of(&FaultKind::Exception));
        assert!(FaultKind::Custom("X".into()).is_instance_of(&FaultKind::Exception));
        assert!(FaultKind::IndexError.is_instance_of(&FaultKind::IndexError));
        assert!(!FaultKind::IndexError.is_instance_of(&FaultKind::KeyError));
        assert!(!FaultKind::Exception.is_instance_of(&FaultKind::ValueError));
    }

    #[test]
    fn fault_display_is_kind_prefixed() {
        let fault = Fault::stack_underflow("pop()");
        assert_eq!(fault.to_string(), "StackUnderflowError: cannot perform pop() on an empty stack");
    }

    #[test]
    fn panic_payloads_become_panic_faults() {
        let caught = std::panic::catch_unwind(|| panic!("boom {}", 1)).unwrap_err();
        let fault = Fault::from_panic(caught);
        assert_eq!(fault.kind, FaultKind::Panic);
        assert_eq!(fault.message, "boom 1");
    }
}
