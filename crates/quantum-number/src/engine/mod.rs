//! The Quantition engine: resolving expression trees to atomic units.
//!
//! Quantition walks a tree in post-order and applies atomic-unit arithmetic
//! at every internal node. It is linear in the number of nodes and never
//! recurses through anything but the tree itself, which owns its children,
//! so it always terminates.
//!
//! Configuration is explicit and per call:
//!
//! ```
//! use quantum_number::{AtomicUnit, Bindings, Engine, Node, QuantitionCache};
//!
//! let tree = Node::mul(Node::add(Node::variable("x"), Node::leaf(1)), Node::leaf(2));
//! let bindings = Bindings::new().bind("x", AtomicUnit::from(20));
//! let mut cache = QuantitionCache::new();
//!
//! let value = Engine::new()
//!     .with_bindings(&bindings)
//!     .with_cache(&mut cache)
//!     .simplify_first(true)
//!     .quantition(&tree)
//!     .unwrap();
//! assert_eq!(value, AtomicUnit::from(42));
//! assert_eq!(cache.len(), 2);
//! ```

mod bindings;
mod cache;
mod derivation;
mod expression;

pub use bindings::Bindings;
pub use cache::{CacheStats, QuantitionCache};
pub use derivation::{Derivation, DerivationId, DerivationStep, StepKind};
pub use expression::{EvalState, Expression};

use crate::error::{QnError, Result};
use crate::expr::{self, check_arity, FunctionKind, IdTree, Node, NodePath, OperationKind};
use crate::unit::AtomicUnit;

/// Per-call evaluation settings.
///
/// Borrowed bindings and cache live only as long as the engine; nothing is
/// kept between engines.
#[derive(Debug, Default)]
pub struct Engine<'a> {
    bindings: Option<&'a Bindings>,
    cache: Option<&'a mut QuantitionCache>,
    simplify_first: bool,
}

impl<'a> Engine<'a> {
    /// An engine with no bindings, no cache, and no simplification.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves variables through `bindings`.
    #[must_use]
    pub fn with_bindings(mut self, bindings: &'a Bindings) -> Self {
        self.bindings = Some(bindings);
        self
    }

    /// Reads and fills `cache` for every internal node.
    #[must_use]
    pub fn with_cache(mut self, cache: &'a mut QuantitionCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Simplifies the tree before resolving it.
    ///
    /// Derivation paths then refer to the simplified tree.
    #[must_use]
    pub fn simplify_first(mut self, enabled: bool) -> Self {
        self.simplify_first = enabled;
        self
    }

    /// Resolves `tree` to one atomic unit.
    ///
    /// # Errors
    ///
    /// * [`QnError::UnboundVariable`] for a variable with no binding.
    /// * [`QnError::UnsupportedOperation`] for a reserved function.
    /// * [`QnError::Arity`] for an operation with the wrong child count.
    #[tracing::instrument(level = "debug", skip_all, fields(nodes = tree.node_count()))]
    pub fn quantition(&mut self, tree: &Node) -> Result<AtomicUnit> {
        self.run(tree, false).map(|(value, _)| value)
    }

    /// Resolves `tree` and records every applied step.
    ///
    /// The cache is written but never read, so the derivation always lists
    /// every internal node.
    ///
    /// # Errors
    ///
    /// Same as [`quantition`](Self::quantition).
    #[tracing::instrument(level = "debug", skip_all, fields(nodes = tree.node_count()))]
    pub fn trace(&mut self, tree: &Node) -> Result<(AtomicUnit, Derivation)> {
        self.run(tree, true)
            .map(|(value, steps)| (value, Derivation::new(steps)))
    }

    fn run(&mut self, tree: &Node, record: bool) -> Result<(AtomicUnit, Vec<DerivationStep>)> {
        let simplified;
        let tree = if self.simplify_first {
            simplified = expr::simplify(tree);
            &simplified
        } else {
            tree
        };
        let ids = self
            .cache
            .is_some()
            .then(|| IdTree::build(tree, self.bindings));
        let mut walk = Walk {
            bindings: self.bindings,
            cache: self.cache.as_deref_mut(),
            steps: record.then(Vec::new),
            path: NodePath::root(),
        };
        let value = walk.eval(tree, ids.as_ref())?;
        tracing::debug!(%value, "expression resolved");
        Ok((value, walk.steps.unwrap_or_default()))
    }
}

/// State of one post-order traversal.
struct Walk<'e> {
    bindings: Option<&'e Bindings>,
    cache: Option<&'e mut QuantitionCache>,
    /// `Some` when recording a derivation; disables cache reads.
    steps: Option<Vec<DerivationStep>>,
    path: NodePath,
}

impl Walk<'_> {
    fn eval(&mut self, node: &Node, ids: Option<&IdTree>) -> Result<AtomicUnit> {
        match node {
            Node::Leaf(unit) => Ok(*unit),
            Node::Variable(name) => self
                .bindings
                .and_then(|b| b.get(name))
                .copied()
                .ok_or_else(|| QnError::UnboundVariable { name: name.clone() }),
            Node::Operation { kind, children } => self.memoised(ids, |walk| {
                check_arity(*kind, children.len())?;
                let mut operands = Vec::with_capacity(children.len());
                for (i, child) in children.iter().enumerate() {
                    operands.push(walk.eval_child(i, child, ids)?);
                }
                let value = apply_operation(*kind, &operands)?;
                Ok((value, StepKind::Operation(*kind)))
            }),
            Node::Function { kind, argument } => self.memoised(ids, |walk| {
                if !kind.is_supported() {
                    return Err(QnError::UnsupportedOperation { kind: *kind });
                }
                let operand = walk.eval_child(0, argument, ids)?;
                let value = apply_function(*kind, operand)?;
                Ok((value, StepKind::Function(*kind)))
            }),
        }
    }

    /// Runs `compute` for an internal node between a cache read and write.
    fn memoised(
        &mut self,
        ids: Option<&IdTree>,
        compute: impl FnOnce(&mut Self) -> Result<(AtomicUnit, StepKind)>,
    ) -> Result<AtomicUnit> {
        if self.steps.is_none() {
            if let (Some(cache), Some(ids)) = (self.cache.as_deref_mut(), ids) {
                if let Some(value) = cache.lookup(&ids.id) {
                    return Ok(value);
                }
            }
        }
        let (value, kind) = compute(self)?;
        if let Some(steps) = self.steps.as_mut() {
            steps.push(DerivationStep {
                path: self.path.clone(),
                kind,
                result: value,
            });
        }
        if let (Some(cache), Some(ids)) = (self.cache.as_deref_mut(), ids) {
            cache.insert(ids.id, value);
        }
        Ok(value)
    }

    fn eval_child(&mut self, index: usize, child: &Node, ids: Option<&IdTree>) -> Result<AtomicUnit> {
        self.path.push(index);
        let value = self.eval(child, ids.and_then(|t| t.children.get(index)));
        self.path.pop();
        value
    }
}

fn apply_operation(kind: OperationKind, operands: &[AtomicUnit]) -> Result<AtomicUnit> {
    match (kind, operands) {
        (OperationKind::Add, &[a, b]) => Ok(a + b),
        (OperationKind::Subtract, &[a, b]) => Ok(a - b),
        (OperationKind::Multiply, &[a, b]) => Ok(a * b),
        (OperationKind::Divide, &[a, b]) => Ok(a / b),
        (OperationKind::Negate, &[a]) => Ok(-a),
        _ => Err(QnError::Arity {
            kind,
            expected: kind.arity(),
            found: operands.len(),
        }),
    }
}

fn apply_function(kind: FunctionKind, operand: AtomicUnit) -> Result<AtomicUnit> {
    match kind {
        FunctionKind::Abs => Ok(operand.abs()),
        FunctionKind::Sqrt => Ok(operand.sqrt()),
        FunctionKind::Conjugate => Ok(operand.conjugate()),
        FunctionKind::Sin
        | FunctionKind::Cos
        | FunctionKind::Tan
        | FunctionKind::Exp
        | FunctionKind::Log => Err(QnError::UnsupportedOperation { kind }),
    }
}

/// Resolves `tree` with no bindings and no cache.
///
/// # Errors
///
/// See [`Engine::quantition`].
pub fn quantition(tree: &Node) -> Result<AtomicUnit> {
    Engine::new().quantition(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_to_end_arithmetic() {
        let cases = [
            (OperationKind::Add, 1, 2, 3),
            (OperationKind::Subtract, 5, 3, 2),
            (OperationKind::Multiply, 4, 3, 12),
            (OperationKind::Divide, 12, 4, 3),
        ];
        for (kind, a, b, expected) in cases {
            let tree = Node::operation(kind, vec![Node::leaf(a), Node::leaf(b)]).unwrap();
            assert_eq!(quantition(&tree), Ok(AtomicUnit::from(expected)), "{kind}");
        }
    }

    #[test]
    fn test_unbound_variable() {
        let tree = Node::add(Node::variable("x"), Node::leaf(1));
        assert_eq!(
            quantition(&tree),
            Err(QnError::UnboundVariable { name: "x".into() })
        );
    }

    #[test]
    fn test_bindings_resolve_variables() {
        let tree = Node::add(Node::variable("x"), Node::leaf(1));
        let bindings = Bindings::new().bind("x", AtomicUnit::from(41));
        let value = Engine::new().with_bindings(&bindings).quantition(&tree);
        assert_eq!(value, Ok(AtomicUnit::from(42)));
    }

    #[test]
    fn test_reserved_function_fails() {
        let tree = Node::function(FunctionKind::Sin, Node::leaf(1));
        assert_eq!(
            quantition(&tree),
            Err(QnError::UnsupportedOperation {
                kind: FunctionKind::Sin
            })
        );
    }

    #[test]
    fn test_supported_functions() {
        let abs = Node::function(FunctionKind::Abs, Node::leaf(-9));
        assert_eq!(quantition(&abs), Ok(AtomicUnit::from(9)));
        let sqrt = Node::function(FunctionKind::Sqrt, abs);
        assert_eq!(quantition(&sqrt), Ok(AtomicUnit::from(3)));
        let conj = Node::function(FunctionKind::Conjugate, Node::leaf(AtomicUnit::complex(1, 2)));
        assert_eq!(quantition(&conj), Ok(AtomicUnit::complex(1, -2)));
    }

    #[test]
    fn test_malformed_arity_fails() {
        let tree = Node::Operation {
            kind: OperationKind::Divide,
            children: vec![Node::leaf(1)],
        };
        assert_eq!(
            quantition(&tree),
            Err(QnError::Arity {
                kind: OperationKind::Divide,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_division_by_zero_resolves_to_sentinel() {
        let tree = Node::div(Node::leaf(1), Node::leaf(0));
        assert!(quantition(&tree).unwrap().is_symbolic_undefined());
    }

    #[test]
    fn test_trace_is_post_order() {
        // -(4 × 3) + abs(-1)
        let tree = Node::add(
            Node::neg(Node::mul(Node::leaf(4), Node::leaf(3))),
            Node::function(FunctionKind::Abs, Node::leaf(-1)),
        );
        let (value, derivation) = Engine::new().trace(&tree).unwrap();
        assert_eq!(value, AtomicUnit::from(-11));
        assert_eq!(
            derivation.kinds(),
            [
                StepKind::Operation(OperationKind::Multiply),
                StepKind::Operation(OperationKind::Negate),
                StepKind::Function(FunctionKind::Abs),
                StepKind::Operation(OperationKind::Add),
            ]
        );
        let paths: Vec<_> = derivation.steps().iter().map(|s| s.path.to_string()).collect();
        assert_eq!(paths, ["/0/0", "/0", "/1", "/"]);
        let mul = &derivation.steps()[0];
        assert_eq!(mul.path.parent(), Some(NodePath::from(vec![0])));
        assert_eq!(tree.at(&mul.path), Some(&Node::mul(Node::leaf(4), Node::leaf(3))));
    }

    #[test]
    fn test_cache_hits_on_repeated_subtrees() {
        let shared = Node::mul(Node::leaf(6), Node::leaf(7));
        let tree = Node::add(shared.clone(), shared);
        let mut cache = QuantitionCache::new();
        let value = Engine::new().with_cache(&mut cache).quantition(&tree);
        assert_eq!(value, Ok(AtomicUnit::from(84)));
        // Root miss, left miss, right hit.
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_cache_respects_bindings() {
        let tree = Node::mul(Node::variable("x"), Node::leaf(2));
        let mut cache = QuantitionCache::new();
        for x in [3, 5] {
            let bindings = Bindings::new().bind("x", AtomicUnit::from(x));
            let value = Engine::new()
                .with_bindings(&bindings)
                .with_cache(&mut cache)
                .quantition(&tree);
            assert_eq!(value, Ok(AtomicUnit::from(2 * x)));
        }
        assert_eq!(cache.hits(), 0);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_trace_bypasses_cache_reads() {
        let tree = Node::add(Node::leaf(1), Node::leaf(2));
        let mut cache = QuantitionCache::new();
        let _ = Engine::new().with_cache(&mut cache).quantition(&tree);
        let (_, derivation) = Engine::new().with_cache(&mut cache).trace(&tree).unwrap();
        assert_eq!(derivation.len(), 1);
        assert_eq!(cache.hits(), 0);
    }

    #[test]
    fn test_simplify_first() {
        // -((7 × one) + 0) resolves with one step once simplified.
        let tree = Node::neg(Node::add(
            Node::mul(Node::leaf(7), Node::leaf(AtomicUnit::one())),
            Node::leaf(0),
        ));
        let (plain, full) = Engine::new().trace(&tree).unwrap();
        let (simplified, short) = Engine::new().simplify_first(true).trace(&tree).unwrap();
        assert_eq!(simplified, plain);
        assert_eq!(plain, -AtomicUnit::from(7));
        assert_eq!(full.len(), 3);
        assert_eq!(short.len(), 1);
    }

    #[test]
    fn test_determinism() {
        let tree = Node::sub(Node::leaf(AtomicUnit::from_ratio(1, 3)), Node::leaf(AtomicUnit::complex(2, 5)));
        assert_eq!(quantition(&tree), quantition(&tree));
    }
}
