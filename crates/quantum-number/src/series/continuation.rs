//! Continuation rules generating weighted-sum terms by index.

use std::fmt;

use num_traits::{CheckedMul, Zero};

use super::{Rational, WeightedTerm};

/// Generates the term at an absolute index of a weighted sum.
///
/// Indices count from the start of the sum, stored prefix included, so a
/// rule can be attached to a sum with any number of stored terms. `None`
/// ends the sum.
pub trait Continuation: Send + Sync + fmt::Debug {
    /// The term at `index`, or `None` past the end.
    fn term(&self, index: usize) -> Option<WeightedTerm>;
}

/// Adapts a closure into a [`Continuation`].
pub struct FnContinuation<F>(F);

impl<F> FnContinuation<F>
where
    F: Fn(usize) -> Option<WeightedTerm> + Send + Sync,
{
    /// Wraps `f`.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> Continuation for FnContinuation<F>
where
    F: Fn(usize) -> Option<WeightedTerm> + Send + Sync,
{
    fn term(&self, index: usize) -> Option<WeightedTerm> {
        (self.0)(index)
    }
}

impl<F> fmt::Debug for FnContinuation<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnContinuation(..)")
    }
}

/// Coefficients `first × ratioⁿ` over a fixed term.
///
/// The sequence ends where the coefficient no longer fits an `i64` ratio,
/// and after index 0 when `first` or `ratio` has a zero denominator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Geometric {
    /// Term at index 0.
    pub first: WeightedTerm,
    /// Coefficient ratio between consecutive terms.
    pub ratio: Rational,
}

impl Geometric {
    /// Geometric rule starting at `first`.
    #[must_use]
    pub fn new(first: WeightedTerm, ratio: Rational) -> Self {
        Self { first, ratio }
    }
}

impl Continuation for Geometric {
    fn term(&self, index: usize) -> Option<WeightedTerm> {
        let mut coefficient = self.first.coefficient;
        if index > 0 && (coefficient.denom().is_zero() || self.ratio.denom().is_zero()) {
            return None;
        }
        for _ in 0..index {
            coefficient = coefficient.checked_mul(&self.ratio)?;
            if coefficient.is_zero() {
                break;
            }
        }
        Some(WeightedTerm {
            coefficient,
            term: self.first.term,
        })
    }
}
