//! Content-addressed expression ids.
//!
//! An [`ExprId`] is a Merkle digest: a node's id hashes its own tag and kind
//! together with the ids of its children, so structurally equal subtrees get
//! equal ids wherever they occur. Bound variables hash exactly like a leaf
//! holding their value, which lets `x + 1` with `x = 41` share cache entries
//! with `41 + 1`.

use std::fmt;

use super::Node;
use crate::core::digest::{self, Fnv256};
use crate::engine::Bindings;
use crate::unit::AtomicUnit;

const TAG_LEAF: u8 = b'L';
const TAG_VARIABLE: u8 = b'V';
const TAG_OPERATION: u8 = b'O';
const TAG_FUNCTION: u8 = b'F';

/// A 32-byte content address of an expression subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExprId([u8; 32]);

impl ExprId {
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

    fn of_leaf(unit: &AtomicUnit) -> Self {
        Self(Fnv256::new().update(&[TAG_LEAF]).update(&unit.to_bytes()).finalize())
    }

    fn of_variable(name: &str) -> Self {
        Self(
            Fnv256::new()
                .update(&[TAG_VARIABLE])
                .update_len(name.len())
                .update(name.as_bytes())
                .finalize(),
        )
    }

    fn of_internal(tag: u8, code: u8, children: &[IdTree]) -> Self {
        let mut hasher = Fnv256::new();
        hasher.update(&[tag, code]).update_len(children.len());
        for child in children {
            hasher.update(child.id.as_bytes());
        }
        Self(hasher.finalize())
    }
}

impl fmt::Display for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Ids of every subtree, shaped like the expression it was built from.
#[derive(Debug, Clone)]
pub(crate) struct IdTree {
    pub(crate) id: ExprId,
    pub(crate) children: Vec<IdTree>,
}

impl IdTree {
    /// Hashes the whole tree bottom-up, once per node.
    pub(crate) fn build(node: &Node, bindings: Option<&Bindings>) -> Self {
        match node {
            Node::Leaf(unit) => Self::terminal(ExprId::of_leaf(unit)),
            Node::Variable(name) => match bindings.and_then(|b| b.get(name)) {
                Some(unit) => Self::terminal(ExprId::of_leaf(unit)),
                None => Self::terminal(ExprId::of_variable(name)),
            },
            Node::Operation { kind, children } => {
                let children: Vec<_> = children
                    .iter()
                    .map(|child| Self::build(child, bindings))
                    .collect();
                Self {
                    id: ExprId::of_internal(TAG_OPERATION, kind.code(), &children),
                    children,
                }
            }
            Node::Function { kind, argument } => {
                let children = vec![Self::build(argument, bindings)];
                Self {
                    id: ExprId::of_internal(TAG_FUNCTION, kind.code(), &children),
                    children,
                }
            }
        }
    }

    fn terminal(id: ExprId) -> Self {
        Self {
            id,
            children: Vec::new(),
        }
    }
}

impl Node {
    /// Content address of this tree, variables hashed by name.
    #[must_use]
    pub fn id(&self) -> ExprId {
        IdTree::build(self, None).id
    }

    /// Content address with bound variables hashed as their values.
    #[must_use]
    pub fn id_with(&self, bindings: &Bindings) -> ExprId {
        IdTree::build(self, Some(bindings)).id
    }
}
