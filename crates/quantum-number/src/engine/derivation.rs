//! Derivation history of a quantition.
//!
//! A [`Derivation`] lists every operation and function applied while a tree
//! was resolved, innermost first (post-order). Each step names its node by
//! [`NodePath`]; `step.path.parent()` is the node that consumed the result.
//!
//! Every derivation carries a content-addressed [`DerivationId`]: equal step
//! sequences (same kinds, same paths, same intermediate values) get equal ids.

use std::fmt;

use crate::core::digest::{self, Fnv256};
use crate::expr::{FunctionKind, NodePath, OperationKind};
use crate::unit::AtomicUnit;

/// What a derivation step applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    /// An arithmetic operation.
    Operation(OperationKind),
    /// A function.
    Function(FunctionKind),
}

impl StepKind {
    /// Stable one-byte code of the applied kind.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Operation(kind) => kind.code(),
            Self::Function(kind) => kind.code(),
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operation(kind) => write!(f, "{kind}"),
            Self::Function(kind) => write!(f, "{kind}"),
        }
    }
}

/// One applied operation or function.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DerivationStep {
    /// Position of the node in the evaluated tree.
    pub path: NodePath,
    /// What was applied.
    pub kind: StepKind,
    /// The value the node resolved to.
    pub result: AtomicUnit,
}

impl DerivationStep {
    fn hash_into(&self, hasher: &mut Fnv256) {
        hasher.update(&[self.kind.code()]);
        hasher.update_len(self.path.depth());
        for &index in self.path.indices() {
            hasher.update_len(index);
        }
        hasher.update(&self.result.to_bytes());
    }
}

/// A 32-byte content address of a derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DerivationId([u8; 32]);

impl DerivationId {
    /// Wraps raw digest bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The raw digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex of the digest.
    #[must_use]
    pub fn to_hex(&self) -> String {
        digest::to_hex(&self.0)
    }

    /// Hashes the step count, then every step in order.
    #[must_use]
    pub fn compute(steps: &[DerivationStep]) -> Self {
        let mut hasher = Fnv256::new();
        hasher.update_len(steps.len());
        for step in steps {
            step.hash_into(&mut hasher);
        }
        Self(hasher.finalize())
    }
}

impl fmt::Display for DerivationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Ordered steps of a quantition with their content address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Derivation {
    id: DerivationId,
    steps: Vec<DerivationStep>,
}

impl Derivation {
    /// Seals a step list, computing its id.
    #[must_use]
    pub fn new(steps: Vec<DerivationStep>) -> Self {
        Self {
            id: DerivationId::compute(&steps),
            steps,
        }
    }

    /// The content address.
    #[must_use]
    pub fn id(&self) -> DerivationId {
        self.id
    }

    /// Steps, innermost first.
    #[must_use]
    pub fn steps(&self) -> &[DerivationStep] {
        &self.steps
    }

    /// Applied kinds, innermost first.
    #[must_use]
    pub fn kinds(&self) -> Vec<StepKind> {
        self.steps.iter().map(|s| s.kind).collect()
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True for a tree with no internal nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Display for Derivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            let (path, kind) = (step.path.to_string(), step.kind.to_string());
            writeln!(f, "{i:>3}  {path:<10} {kind:<12} = {}", step.result)?;
        }
        write!(f, "derivation {}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(path: Vec<usize>, kind: OperationKind, result: i32) -> DerivationStep {
        DerivationStep {
            path: NodePath::from(path),
            kind: StepKind::Operation(kind),
            result: AtomicUnit::from(result),
        }
    }

    #[test]
    fn test_id_deterministic() {
        let a = Derivation::new(vec![step(vec![], OperationKind::Add, 3)]);
        let b = Derivation::new(vec![step(vec![], OperationKind::Add, 3)]);
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn test_id_sensitive_to_kind_path_and_value() {
        let base = Derivation::new(vec![step(vec![0], OperationKind::Add, 3)]).id();
        assert_ne!(base, Derivation::new(vec![step(vec![0], OperationKind::Multiply, 3)]).id());
        assert_ne!(base, Derivation::new(vec![step(vec![1], OperationKind::Add, 3)]).id());
        assert_ne!(base, Derivation::new(vec![step(vec![0], OperationKind::Add, 4)]).id());
        assert_ne!(base, Derivation::new(Vec::new()).id());
    }

    #[test]
    fn test_kinds_in_order() {
        let d = Derivation::new(vec![
            step(vec![0], OperationKind::Multiply, 12),
            step(vec![], OperationKind::Negate, -12),
        ]);
        assert_eq!(
            d.kinds(),
            [
                StepKind::Operation(OperationKind::Multiply),
                StepKind::Operation(OperationKind::Negate)
            ]
        );
        assert_eq!(d.len(), 2);
    }

    #[test]
    fn test_display_lists_steps() {
        let d = Derivation::new(vec![step(vec![], OperationKind::Add, 3)]);
        let text = d.to_string();
        assert!(text.contains("add"));
        assert!(text.ends_with(&d.id().to_hex()));
    }
}
