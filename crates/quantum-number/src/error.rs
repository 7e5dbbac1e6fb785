//! Error type shared by every fallible operation in the crate.
//!
//! Arithmetic itself never fails: operations that have no representable
//! answer return the sentinel unit. Errors are reserved for structural
//! problems (bad indices, malformed bytes, unbound variables, wrong arity)
//! and for exact operations that would otherwise lose information.

use thiserror::Error;

use crate::expr::{FunctionKind, OperationKind};

/// Errors reported by the Quantum Number library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QnError {
    /// An ordinal index outside `0..=11`.
    #[error("ordinal index {index} is out of range (expected 0..=11)")]
    Index {
        /// The offending index.
        index: usize,
    },

    /// A decoded magnitude outside the representable range.
    #[error("ordinal {index} holds magnitude {value}, outside the representable range")]
    Range {
        /// Slot that held the value.
        index: usize,
        /// The out-of-range magnitude.
        value: i64,
    },

    /// Stored checksum does not match the recomputed one.
    #[error("checksum mismatch: stored {stored:#x}, computed {computed:#x}")]
    Integrity {
        /// Checksum read from the encoded unit.
        stored: u8,
        /// Checksum recomputed from the decoded ordinals.
        computed: u8,
    },

    /// A variable leaf with no binding was reached during quantition.
    #[error("variable `{name}` is unbound")]
    UnboundVariable {
        /// Variable name.
        name: String,
    },

    /// An operation node was given the wrong number of children.
    #[error("`{kind}` takes {expected} operand(s), got {found}")]
    Arity {
        /// The operation.
        kind: OperationKind,
        /// Required operand count.
        expected: usize,
        /// Supplied operand count.
        found: usize,
    },

    /// A function with no exact definition over atomic units.
    #[error("function `{kind}` has no exact definition over atomic units")]
    UnsupportedOperation {
        /// The function.
        kind: FunctionKind,
    },

    /// An exact operation produced a non-integral ordinal.
    #[error("ordinal {index} is not integral: {value}")]
    Inexact {
        /// Slot that would lose precision.
        index: usize,
        /// The exact rational value, rendered as text.
        value: String,
    },

    /// Text that is not a valid atomic unit.
    #[error("cannot parse `{input}` as an atomic unit: {reason}")]
    Parse {
        /// The rejected input.
        input: String,
        /// What was wrong with it.
        reason: &'static str,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, QnError>;
