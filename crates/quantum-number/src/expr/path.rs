//! Positions of nodes inside an expression tree.

use std::fmt;

/// Child indices leading from the root to a node.
///
/// Trees own their children outright; a path is the non-owning way to name
/// a node, and [`parent`](Self::parent) is the back-reference.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    /// The root of a tree.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Path of this node's `index`-th child.
    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Path of the parent node, `None` at the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, parent) = self.0.split_last()?;
        Some(Self(parent.to_vec()))
    }

    /// Number of edges from the root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// True for the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Child indices from the root.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub(crate) fn push(&mut self, index: usize) {
        self.0.push(index);
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for index in &self.0 {
            write!(f, "/{index}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_walks_up() {
        let p = NodePath::root().child(1).child(0);
        assert_eq!(p.depth(), 2);
        assert_eq!(p.parent(), Some(NodePath::from(vec![1])));
        assert_eq!(p.parent().and_then(|p| p.parent()), Some(NodePath::root()));
        assert_eq!(NodePath::root().parent(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(NodePath::root().to_string(), "/");
        assert_eq!(NodePath::from(vec![0, 1]).to_string(), "/0/1");
    }
}
