//! Expression lifecycle: unevaluated, simplified, resolved.

use std::sync::OnceLock;

use super::{Derivation, Engine};
use crate::error::Result;
use crate::expr::{self, Node};
use crate::unit::AtomicUnit;

/// Where an [`Expression`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvalState {
    /// Built, not yet simplified or resolved.
    Unevaluated,
    /// Simplified, not yet resolved.
    Simplified,
    /// Resolved to a unit; the value and derivation are memoised.
    Resolved,
}

#[derive(Debug, Clone)]
struct Resolution {
    value: AtomicUnit,
    derivation: Derivation,
}

/// A tree together with its memoised resolution.
///
/// The tree is never rewritten in place: [`simplify`](Self::simplify)
/// returns a new expression and resolution keeps the original tree.
#[derive(Debug, Clone)]
pub struct Expression {
    root: Node,
    simplified: bool,
    resolution: OnceLock<Resolution>,
}

impl Expression {
    /// Wraps an unevaluated tree.
    #[must_use]
    pub fn new(root: Node) -> Self {
        Self {
            root,
            simplified: false,
            resolution: OnceLock::new(),
        }
    }

    /// The tree.
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> EvalState {
        match (self.resolution.get(), self.simplified) {
            (Some(_), _) => EvalState::Resolved,
            (None, true) => EvalState::Simplified,
            (None, false) => EvalState::Unevaluated,
        }
    }

    /// True once [`quantition`](Self::quantition) has succeeded.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolution.get().is_some()
    }

    /// A new, unresolved expression over the simplified tree.
    #[must_use]
    pub fn simplify(&self) -> Self {
        Self {
            root: expr::simplify(&self.root),
            simplified: true,
            resolution: OnceLock::new(),
        }
    }

    /// A new, unevaluated expression with `name` replaced by `value`.
    #[must_use]
    pub fn substitute(&self, name: &str, value: AtomicUnit) -> Self {
        Self::new(self.root.substitute(name, value))
    }

    /// Resolves the tree, memoising the value and derivation on success.
    ///
    /// # Errors
    ///
    /// Any error of [`Engine::quantition`]; failures are not memoised.
    pub fn quantition(&self) -> Result<AtomicUnit> {
        self.resolve().map(|r| r.value)
    }

    /// The derivation of the resolution, resolving first if needed.
    ///
    /// # Errors
    ///
    /// Same as [`quantition`](Self::quantition).
    pub fn derivation(&self) -> Result<&Derivation> {
        self.resolve().map(|r| &r.derivation)
    }

    fn resolve(&self) -> Result<&Resolution> {
        if let Some(resolution) = self.resolution.get() {
            return Ok(resolution);
        }
        let (value, derivation) = Engine::new().trace(&self.root)?;
        Ok(self.resolution.get_or_init(|| Resolution { value, derivation }))
    }
}

impl From<Node> for Expression {
    fn from(root: Node) -> Self {
        Self::new(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QnError;
    use crate::expr::OperationKind;
    use crate::engine::StepKind;

    #[test]
    fn test_lifecycle() {
        let tree = Node::add(Node::mul(Node::leaf(4), Node::Leaf(AtomicUnit::one())), Node::leaf(0));
        let expression = Expression::new(tree.clone());
        assert_eq!(expression.state(), EvalState::Unevaluated);

        let simplified = expression.simplify();
        assert_eq!(simplified.state(), EvalState::Simplified);
        assert_eq!(simplified.root(), &Node::leaf(4));
        assert_eq!(expression.root(), &tree);

        assert_eq!(expression.quantition(), Ok(AtomicUnit::from(4)));
        assert_eq!(expression.state(), EvalState::Resolved);
        assert_eq!(expression.root(), &tree);
    }

    #[test]
    fn test_memoised_derivation() {
        let expression = Expression::from(Node::neg(Node::mul(Node::leaf(4), Node::leaf(3))));
        let derivation = expression.derivation().unwrap().clone();
        assert!(expression.is_resolved());
        assert_eq!(
            derivation.kinds(),
            [
                StepKind::Operation(OperationKind::Multiply),
                StepKind::Operation(OperationKind::Negate)
            ]
        );
        assert_eq!(expression.quantition(), Ok(AtomicUnit::from(-12)));
        assert_eq!(expression.derivation().unwrap().id(), derivation.id());
    }

    #[test]
    fn test_failure_is_not_memoised() {
        let expression = Expression::new(Node::add(Node::variable("x"), Node::leaf(1)));
        assert!(matches!(expression.quantition(), Err(QnError::UnboundVariable { .. })));
        assert_eq!(expression.state(), EvalState::Unevaluated);

        let bound = expression.substitute("x", AtomicUnit::from(41));
        assert_eq!(bound.quantition(), Ok(AtomicUnit::from(42)));
    }

    #[test]
    fn test_clone_keeps_resolution() {
        let expression = Expression::new(Node::add(Node::leaf(1), Node::leaf(2)));
        expression.quantition().unwrap();
        assert!(expression.clone().is_resolved());
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Expression>();
    }
}
