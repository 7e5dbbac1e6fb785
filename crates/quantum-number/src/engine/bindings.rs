//! Variable bindings supplied to quantition.

use std::collections::btree_map;
use std::collections::BTreeMap;

use crate::unit::AtomicUnit;

/// Values for named variables, iterated in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings(BTreeMap<String, AtomicUnit>);

impl Bindings {
    /// No bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn bind(mut self, name: impl Into<String>, value: AtomicUnit) -> Self {
        self.insert(name, value);
        self
    }

    /// Binds `name`, returning the previous value if it was bound.
    pub fn insert(&mut self, name: impl Into<String>, value: AtomicUnit) -> Option<AtomicUnit> {
        self.0.insert(name.into(), value)
    }

    /// The value bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AtomicUnit> {
        self.0.get(name)
    }

    /// Number of bound names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Bound names and values in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, AtomicUnit> {
        self.0.iter()
    }
}

impl<S: Into<String>> FromIterator<(S, AtomicUnit)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (S, AtomicUnit)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<S: Into<String>> Extend<(S, AtomicUnit)> for Bindings {
    fn extend<I: IntoIterator<Item = (S, AtomicUnit)>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(|(k, v)| (k.into(), v)));
    }
}

impl<'a> IntoIterator for &'a Bindings {
    type Item = (&'a String, &'a AtomicUnit);
    type IntoIter = btree_map::Iter<'a, String, AtomicUnit>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
