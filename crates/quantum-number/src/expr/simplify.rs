//! Structural simplification.
//!
//! Children are simplified first, then local identities are applied at each
//! node. Every rule removes at least one node, so simplification terminates,
//! and the output is a fixpoint: `simplify(&simplify(t)) == simplify(t)`.
//!
//! | Rule | Condition |
//! |------|-----------|
//! | `x + 0 → x`, `x - 0 → x` | `0` is [`AtomicUnit::zero`] |
//! | `x × 1 → x`, `1 × x → x`, `x / 1 → x` | `1` is [`AtomicUnit::one`] |
//! | `x × 0 → 0`, `0 × x → 0` | `x` is a leaf other than the sentinel |
//! | `-(-x) → x` | |
//! | `abs(abs(x)) → abs(x)` | |
//! | `conj(conj(x)) → x` | |
//!
//! Resolving the simplified tree gives a unit structurally equal to
//! resolving the original, negative-zero flags included. `0 + x` and `0 - x`
//! are left alone: the sum would drop negative zeros of `x`. A product with
//! an unresolved operand is kept, since that operand may resolve to the
//! sentinel, which absorbs the zero.

use super::{FunctionKind, Node, OperationKind};
use crate::unit::AtomicUnit;

/// Returns the simplified form of `tree`.
#[must_use]
pub fn simplify(tree: &Node) -> Node {
    let node = match tree {
        Node::Leaf(_) | Node::Variable(_) => return tree.clone(),
        Node::Operation { kind, children } => Node::Operation {
            kind: *kind,
            children: children.iter().map(simplify).collect(),
        },
        Node::Function { kind, argument } => Node::Function {
            kind: *kind,
            argument: Box::new(simplify(argument)),
        },
    };
    rewrite(node)
}

fn is_zero_leaf(node: &Node) -> bool {
    matches!(node, Node::Leaf(u) if *u == AtomicUnit::zero())
}

fn is_one_leaf(node: &Node) -> bool {
    matches!(node, Node::Leaf(u) if *u == AtomicUnit::one())
}

fn is_defined_leaf(node: &Node) -> bool {
    matches!(node, Node::Leaf(u) if !u.is_symbolic_undefined())
}

/// Applies root rules until none match. Children are already simplified.
fn rewrite(node: Node) -> Node {
    match node {
        Node::Operation { kind, children } => {
            let [lhs, rhs] = match <[Node; 2]>::try_from(children) {
                Ok(pair) => pair,
                Err(children) => return rewrite_unary(kind, children),
            };
            match kind {
                OperationKind::Add | OperationKind::Subtract if is_zero_leaf(&rhs) => lhs,
                OperationKind::Multiply if is_one_leaf(&rhs) => lhs,
                OperationKind::Multiply if is_one_leaf(&lhs) => rhs,
                OperationKind::Multiply
                    if (is_zero_leaf(&rhs) && is_defined_leaf(&lhs))
                        || (is_zero_leaf(&lhs) && is_defined_leaf(&rhs)) =>
                {
                    Node::Leaf(AtomicUnit::zero())
                }
                OperationKind::Divide if is_one_leaf(&rhs) => lhs,
                _ => Node::Operation {
                    kind,
                    children: vec![lhs, rhs],
                },
            }
        }
        Node::Function { kind, argument } => match (kind, *argument) {
            (FunctionKind::Abs, inner @ Node::Function { kind: FunctionKind::Abs, .. }) => inner,
            (FunctionKind::Conjugate, Node::Function { kind: FunctionKind::Conjugate, argument }) => {
                *argument
            }
            (kind, argument) => Node::Function {
                kind,
                argument: Box::new(argument),
            },
        },
        leaf_or_variable => leaf_or_variable,
    }
}

fn rewrite_unary(kind: OperationKind, children: Vec<Node>) -> Node {
    let [operand] = match <[Node; 1]>::try_from(children) {
        Ok(single) => single,
        Err(children) => return Node::Operation { kind, children },
    };
    match operand {
        Node::Operation {
            kind: OperationKind::Negate,
            children: inner,
        } if kind == OperationKind::Negate => {
            match <[Node; 1]>::try_from(inner) {
                Ok([x]) => x,
                Err(inner) => Node::neg(Node::Operation {
                    kind: OperationKind::Negate,
                    children: inner,
                }),
            }
        }
        operand => Node::Operation {
            kind,
            children: vec![operand],
        },
    }
}
