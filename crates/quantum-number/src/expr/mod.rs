//! Expression trees over atomic units.
//!
//! A [`Node`] is a closed sum type: a leaf holding an [`AtomicUnit`], a named
//! variable, an [`OperationKind`] over ordered children, or a
//! [`FunctionKind`] over one argument. Parents own their children; trees are
//! never shared or cyclic, and every transformation ([`Node::substitute`],
//! [`simplify`]) returns a new tree.
//!
//! # Example
//!
//! ```
//! use quantum_number::{quantition, AtomicUnit, Node};
//!
//! let tree = Node::add(Node::variable("x"), Node::leaf(1));
//! assert!(tree.has_variables());
//! assert_eq!(tree.height(), 2);
//! assert_eq!(tree.node_count(), 3);
//!
//! let bound = tree.substitute("x", AtomicUnit::from(41));
//! assert_eq!(quantition(&bound).unwrap(), AtomicUnit::from(42));
//! ```

mod id;
mod kind;
mod path;
mod simplify;

use std::collections::BTreeSet;
use std::fmt;

pub use id::ExprId;
pub(crate) use id::IdTree;
pub use kind::{FunctionKind, OperationKind};
pub use path::NodePath;
pub use simplify::simplify;

use crate::engine::Bindings;
use crate::error::{QnError, Result};
use crate::unit::AtomicUnit;

/// One node of an expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    /// A resolved value.
    Leaf(AtomicUnit),
    /// A named placeholder, resolved through bindings or substitution.
    Variable(String),
    /// An arithmetic operation over ordered children.
    Operation {
        /// The operation.
        kind: OperationKind,
        /// Operands, left to right.
        children: Vec<Node>,
    },
    /// A function of one argument.
    Function {
        /// The function.
        kind: FunctionKind,
        /// The argument.
        argument: Box<Node>,
    },
}

impl Node {
    /// A leaf node.
    #[must_use]
    pub fn leaf(value: impl Into<AtomicUnit>) -> Self {
        Self::Leaf(value.into())
    }

    /// A variable node.
    #[must_use]
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    /// An operation node, checking the number of children.
    ///
    /// # Errors
    ///
    /// Returns [`QnError::Arity`] unless binary kinds get exactly two
    /// children and [`OperationKind::Negate`] exactly one.
    pub fn operation(kind: OperationKind, children: Vec<Node>) -> Result<Self> {
        check_arity(kind, children.len())?;
        Ok(Self::Operation { kind, children })
    }

    /// A function node.
    #[must_use]
    pub fn function(kind: FunctionKind, argument: Node) -> Self {
        Self::Function {
            kind,
            argument: Box::new(argument),
        }
    }

    fn binary(kind: OperationKind, lhs: Node, rhs: Node) -> Self {
        Self::Operation {
            kind,
            children: vec![lhs, rhs],
        }
    }

    /// `lhs + rhs`.
    #[must_use]
    pub fn add(lhs: Node, rhs: Node) -> Self {
        Self::binary(OperationKind::Add, lhs, rhs)
    }

    /// `lhs - rhs`.
    #[must_use]
    pub fn sub(lhs: Node, rhs: Node) -> Self {
        Self::binary(OperationKind::Subtract, lhs, rhs)
    }

    /// `lhs × rhs`.
    #[must_use]
    pub fn mul(lhs: Node, rhs: Node) -> Self {
        Self::binary(OperationKind::Multiply, lhs, rhs)
    }

    /// `lhs / rhs`.
    #[must_use]
    pub fn div(lhs: Node, rhs: Node) -> Self {
        Self::binary(OperationKind::Divide, lhs, rhs)
    }

    /// `-operand`.
    #[must_use]
    pub fn neg(operand: Node) -> Self {
        Self::Operation {
            kind: OperationKind::Negate,
            children: vec![operand],
        }
    }

    /// Direct children, left to right (the argument of a function).
    #[must_use]
    pub fn children(&self) -> &[Node] {
        match self {
            Self::Leaf(_) | Self::Variable(_) => &[],
            Self::Operation { children, .. } => children,
            Self::Function { argument, .. } => std::slice::from_ref(argument),
        }
    }

    /// Levels from this node to its deepest leaf; a leaf has height 1.
    #[must_use]
    pub fn height(&self) -> usize {
        1 + self.children().iter().map(Node::height).max().unwrap_or(0)
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(Node::node_count).sum::<usize>()
    }

    /// True if any `Variable` occurs in the tree.
    #[must_use]
    pub fn has_variables(&self) -> bool {
        match self {
            Self::Variable(_) => true,
            _ => self.children().iter().any(Node::has_variables),
        }
    }

    /// Names of all variables, sorted and deduplicated.
    #[must_use]
    pub fn variables(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables<'a>(&'a self, names: &mut BTreeSet<&'a str>) {
        match self {
            Self::Variable(name) => {
                names.insert(name.as_str());
            }
            _ => {
                for child in self.children() {
                    child.collect_variables(names);
                }
            }
        }
    }

    /// Returns a copy with every `Variable(name)` replaced by `Leaf(value)`.
    #[must_use]
    pub fn substitute(&self, name: &str, value: AtomicUnit) -> Self {
        self.map_variables(&|var| (var == name).then_some(value))
    }

    /// Returns a copy with every bound variable replaced by its value.
    #[must_use]
    pub fn substitute_all(&self, bindings: &Bindings) -> Self {
        self.map_variables(&|var| bindings.get(var).copied())
    }

    fn map_variables(&self, lookup: &dyn Fn(&str) -> Option<AtomicUnit>) -> Self {
        match self {
            Self::Leaf(_) => self.clone(),
            Self::Variable(name) => lookup(name).map_or_else(|| self.clone(), Self::Leaf),
            Self::Operation { kind, children } => Self::Operation {
                kind: *kind,
                children: children.iter().map(|c| c.map_variables(lookup)).collect(),
            },
            Self::Function { kind, argument } => Self::Function {
                kind: *kind,
                argument: Box::new(argument.map_variables(lookup)),
            },
        }
    }

    /// The node at `path`, if it exists.
    #[must_use]
    pub fn at(&self, path: &NodePath) -> Option<&Node> {
        path.indices()
            .iter()
            .try_fold(self, |node, &index| node.children().get(index))
    }
}

impl From<AtomicUnit> for Node {
    fn from(unit: AtomicUnit) -> Self {
        Self::Leaf(unit)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(unit) => write!(f, "{unit}"),
            Self::Variable(name) => f.write_str(name),
            Self::Operation { kind, children } => match (kind, children.as_slice()) {
                (OperationKind::Negate, [operand]) => write!(f, "-({operand})"),
                (_, [lhs, rhs]) if kind.arity() == 2 => {
                    write!(f, "({lhs} {} {rhs})", kind.symbol())
                }
                _ => {
                    write!(f, "{kind}(")?;
                    for (i, child) in children.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{child}")?;
                    }
                    f.write_str(")")
                }
            },
            Self::Function { kind, argument } => write!(f, "{kind}({argument})"),
        }
    }
}

pub(crate) fn check_arity(kind: OperationKind, found: usize) -> Result<()> {
    if found == kind.arity() {
        Ok(())
    } else {
        Err(QnError::Arity {
            kind,
            expected: kind.arity(),
            found,
        })
    }
}

/// Builds a leaf node.
#[must_use]
pub fn create_leaf(value: AtomicUnit) -> Node {
    Node::Leaf(value)
}

/// Builds a variable node.
#[must_use]
pub fn create_variable(name: impl Into<String>) -> Node {
    Node::variable(name)
}

/// Builds an operation node.
///
/// # Errors
///
/// Returns [`QnError::Arity`] if the child count does not match the kind.
pub fn create_operation(kind: OperationKind, children: Vec<Node>) -> Result<Node> {
    Node::operation(kind, children)
}

/// Builds a function node.
#[must_use]
pub fn create_function(kind: FunctionKind, argument: Node) -> Node {
    Node::function(kind, argument)
}

/// Returns a copy of `tree` with `Variable(name)` replaced by `Leaf(value)`.
#[must_use]
pub fn substitute(tree: &Node, name: &str, value: AtomicUnit) -> Node {
    tree.substitute(name, value)
}

/// Height of `tree`; a leaf has height 1.
#[must_use]
pub fn height(tree: &Node) -> usize {
    tree.height()
}

/// Number of nodes in `tree`.
#[must_use]
pub fn node_count(tree: &Node) -> usize {
    tree.node_count()
}

/// True if `tree` contains a variable.
#[must_use]
pub fn has_variables(tree: &Node) -> bool {
    tree.has_variables()
}
