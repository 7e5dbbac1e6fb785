//! Quantum Number: a 256-bit structured numeric encoding and its evaluator.
//!
//! The crate is built in three composition levels over one value type:
//!
//! | Level | Type | Meaning |
//! |-------|------|---------|
//! | Minimum unit | [`AtomicUnit`] | twelve signed ordinals plus a 4-bit checksum |
//! | Standard unit | [`WeightedSum`] | `Σ coefficientᵢ × unitᵢ`, optionally infinite |
//! | AST unit | [`Node`] | expression tree over units and variables |
//!
//! **Quantition** resolves a tree to one atomic unit by post-order
//! evaluation with slot-wise arithmetic at every internal node.
//!
//! # Atomic units
//!
//! ```
//! use quantum_number::{AtomicUnit, OrdinalIndex};
//!
//! let half = AtomicUnit::from_ratio(2, 4);
//! assert_eq!(half.get(OrdinalIndex::REAL), 1);
//! assert_eq!(half.get(OrdinalIndex::DENOMINATOR), 2);
//! assert_eq!(half.to_string(), "1/2");
//!
//! // Division by a zero unit is a value, not an error.
//! let undefined = AtomicUnit::from(7) / AtomicUnit::zero();
//! assert!(undefined.is_symbolic_undefined());
//! assert!(undefined.verify());
//! ```
//!
//! # Layout
//!
//! ```text
//! bit  0 ..  19   slot a magnitude      bit 20   slot a sign
//! bit 21 ..  40   slot b magnitude      bit 41   slot b sign
//! ...
//! bit 231 .. 250  slot l magnitude      bit 251  slot l sign
//! bit 252 .. 255  checksum
//! ```
//!
//! Bits are numbered little-endian within a 32-byte array. Loading verifies
//! the checksum and never repairs it.
//!
//! # Quantition
//!
//! ```
//! use quantum_number::{quantition, AtomicUnit, Node};
//!
//! let tree = Node::sub(Node::mul(Node::leaf(4), Node::leaf(3)), Node::leaf(2));
//! assert_eq!(quantition(&tree).unwrap(), AtomicUnit::from(10));
//! ```
//!
//! The library performs no I/O and installs no `tracing` subscriber; clamps
//! are reported as `warn` events, cache hits and resolutions as `debug`.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

// Layout constants, ordinal vector, checksum, digest
pub mod core;

// Error type shared by every module
pub mod error;

// The 256-bit atomic unit and its arithmetic
pub mod unit;

// Weighted sums and continuation rules
pub mod series;

// Expression trees, kinds, paths, ids, simplification
pub mod expr;

// Quantition engine, bindings, cache, derivations
pub mod engine;

// Re-export core types at crate root
pub use crate::core::{compute_checksum, Checksum, Clamped, OrdinalIndex, OrdinalVector};
pub use error::{QnError, Result};
pub use unit::{is_symbolic_undefined, verify, AtomicUnit};

// Re-export weighted sums
pub use series::{Continuation, FnContinuation, Geometric, Rational, WeightedSum, WeightedTerm};

// Re-export expression trees
pub use expr::{
    create_function, create_leaf, create_operation, create_variable, has_variables, height,
    node_count, simplify, substitute, ExprId, FunctionKind, Node, NodePath, OperationKind,
};

// Re-export the engine
pub use engine::{
    quantition, Bindings, CacheStats, Derivation, DerivationId, DerivationStep, Engine, EvalState,
    Expression, QuantitionCache, StepKind,
};

/// Commonly used items in one import.
pub mod prelude {
    pub use crate::{
        quantition, simplify, AtomicUnit, Bindings, Engine, Expression, FunctionKind, Node,
        OperationKind, OrdinalIndex, QnError, QuantitionCache, Rational, WeightedSum,
        WeightedTerm,
    };
}
