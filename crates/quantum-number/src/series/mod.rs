//! Weighted sums of atomic units (the standard unit).
//!
//! A [`WeightedSum`] means `Σ coefficientᵢ × termᵢ` over an ordered list of
//! [`WeightedTerm`]s. It stores a finite prefix and may carry a
//! [`Continuation`] that generates further terms on demand, so infinite
//! series are expressible without being materialised.
//!
//! Values are accumulated exactly, slot by slot, with big rationals; only
//! the final per-slot sum has to be an integer.

mod continuation;

pub use continuation::{Continuation, FnContinuation, Geometric};

use std::sync::Arc;

use num_bigint::BigInt;
use num_rational::{BigRational, Ratio};
use num_traits::{Signed, ToPrimitive, Zero};

use crate::core::{OrdinalIndex, OrdinalVector, NUM_ORDINALS};
use crate::error::{QnError, Result};
use crate::unit::AtomicUnit;

/// Exact coefficient type.
pub type Rational = Ratio<i64>;

/// One `coefficient × term` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeightedTerm {
    /// Exact scale factor.
    pub coefficient: Rational,
    /// The unit being scaled.
    pub term: AtomicUnit,
}

impl WeightedTerm {
    /// Pairs a coefficient with a term.
    #[must_use]
    pub fn new(coefficient: Rational, term: AtomicUnit) -> Self {
        Self { coefficient, term }
    }

    /// True when the coefficient has a zero denominator.
    fn is_undefined(&self) -> bool {
        self.coefficient.denom().is_zero()
    }

    /// Per-slot exact contribution `coefficient × value`.
    ///
    /// The coefficient must have a non-zero denominator.
    fn contribution(&self) -> [BigRational; NUM_ORDINALS] {
        let coefficient = widen(self.coefficient);
        let values = self.term.ordinals().values();
        values.map(|v| &coefficient * &BigRational::from_integer(BigInt::from(v)))
    }
}

/// Ordered weighted terms with an optional continuation rule.
#[derive(Debug, Clone, Default)]
pub struct WeightedSum {
    terms: Vec<WeightedTerm>,
    continuation: Option<Arc<dyn Continuation>>,
}

impl WeightedSum {
    /// An empty, finite sum.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a rule generating every term past the stored prefix.
    #[must_use]
    pub fn with_continuation(mut self, rule: impl Continuation + 'static) -> Self {
        self.continuation = Some(Arc::new(rule));
        self
    }

    /// Appends `coefficient × term` to the stored prefix.
    pub fn append(&mut self, coefficient: Rational, term: AtomicUnit) -> &mut Self {
        self.push(WeightedTerm::new(coefficient, term))
    }

    /// Appends a term to the stored prefix.
    pub fn push(&mut self, term: WeightedTerm) -> &mut Self {
        self.terms.push(term);
        self
    }

    /// The stored prefix, in insertion order.
    #[must_use]
    pub fn terms(&self) -> &[WeightedTerm] {
        &self.terms
    }

    /// Number of stored terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// True when nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// True when a continuation rule is attached.
    #[must_use]
    pub fn is_infinite(&self) -> bool {
        self.continuation.is_some()
    }

    /// The term at `index`, stored or generated.
    #[must_use]
    pub fn term(&self, index: usize) -> Option<WeightedTerm> {
        match self.terms.get(index) {
            Some(term) => Some(*term),
            None => self.continuation.as_ref()?.term(index),
        }
    }

    /// Stores generated terms until the prefix holds `n` or the rule ends.
    ///
    /// Returns the new stored length.
    pub fn materialize(&mut self, n: usize) -> usize {
        while self.terms.len() < n {
            match self.term(self.terms.len()) {
                Some(term) => self.terms.push(term),
                None => break,
            }
        }
        self.terms.len()
    }

    /// Exact value of the first `n` terms (fewer if the sum ends earlier).
    ///
    /// A sentinel term makes the value that sentinel, and a coefficient with a
    /// zero denominator makes it [`AtomicUnit::SYMBOLIC_UNDEFINED`], as
    /// [`AtomicUnit::scale`] does. Slots outside the representable range
    /// clamp.
    ///
    /// # Errors
    ///
    /// Returns [`QnError::Inexact`] for the first slot whose sum is not an
    /// integer.
    pub fn partial_value(&self, n: usize) -> Result<AtomicUnit> {
        let mut totals: [BigRational; NUM_ORDINALS] = std::array::from_fn(|_| BigRational::zero());
        for index in 0..n {
            let Some(term) = self.term(index) else {
                break;
            };
            if term.term.is_symbolic_undefined() {
                return Ok(term.term);
            }
            if term.is_undefined() {
                return Ok(AtomicUnit::SYMBOLIC_UNDEFINED);
            }
            for (total, part) in totals.iter_mut().zip(term.contribution()) {
                *total += part;
            }
        }
        let mut out = OrdinalVector::new();
        for (slot, total) in OrdinalIndex::all().zip(totals) {
            if !total.is_integer() {
                return Err(QnError::Inexact {
                    index: slot.get(),
                    value: total.to_string(),
                });
            }
            out.store(slot, saturate_big(&total.to_integer()));
        }
        Ok(AtomicUnit::new(out))
    }

    /// Exact value of the stored prefix.
    ///
    /// # Errors
    ///
    /// Same as [`partial_value`](Self::partial_value).
    pub fn value(&self) -> Result<AtomicUnit> {
        self.partial_value(self.terms.len())
    }

    /// Heuristic convergence check on the stored prefix.
    ///
    /// True when every slot of the last stored term's contribution is within
    /// `epsilon` of zero. An empty prefix is never convergent, and neither is
    /// an undefined last term or an `epsilon` with a zero denominator.
    #[must_use]
    pub fn is_convergent_so_far(&self, epsilon: Rational) -> bool {
        let Some(last) = self.terms.last() else {
            return false;
        };
        if last.is_undefined() || last.term.is_symbolic_undefined() || epsilon.denom().is_zero() {
            return false;
        }
        let bound = widen(epsilon).abs();
        last.contribution().iter().all(|part| part.abs() <= bound)
    }
}

impl FromIterator<WeightedTerm> for WeightedSum {
    fn from_iter<I: IntoIterator<Item = WeightedTerm>>(iter: I) -> Self {
        Self {
            terms: iter.into_iter().collect(),
            continuation: None,
        }
    }
}

impl Extend<WeightedTerm> for WeightedSum {
    fn extend<I: IntoIterator<Item = WeightedTerm>>(&mut self, iter: I) {
        self.terms.extend(iter);
    }
}

/// Moves a coefficient to big integers without reducing it again.
fn widen(value: Rational) -> BigRational {
    Ratio::new_raw(BigInt::from(*value.numer()), BigInt::from(*value.denom()))
}

/// Narrows to `i64`, saturating; the slot store clamps further.
fn saturate_big(value: &BigInt) -> i64 {
    value.to_i64().unwrap_or(if value.is_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(n: i64, d: i64) -> Rational {
        Rational::new(n, d)
    }

    #[test]
    fn test_insertion_order_and_value() {
        let mut sum = WeightedSum::new();
        sum.append(r(1, 2), AtomicUnit::from(4))
            .append(r(3, 1), AtomicUnit::from(-1));
        assert_eq!(sum.len(), 2);
        assert_eq!(sum.terms()[0].coefficient, r(1, 2));
        assert_eq!(sum.value(), Ok(AtomicUnit::from(-1)));
    }

    #[test]
    fn test_exact_accumulation_across_terms() {
        // 1/3 × 1 + 2/3 × 1 == 1 even though neither term is integral.
        let sum: WeightedSum = [
            WeightedTerm::new(r(1, 3), AtomicUnit::from(1)),
            WeightedTerm::new(r(2, 3), AtomicUnit::from(1)),
        ]
        .into_iter()
        .collect();
        assert_eq!(sum.value(), Ok(AtomicUnit::from(1)));
    }

    #[test]
    fn test_inexact_slot() {
        let sum: WeightedSum = [WeightedTerm::new(r(1, 2), AtomicUnit::from(3))]
            .into_iter()
            .collect();
        assert_eq!(
            sum.value(),
            Err(QnError::Inexact {
                index: 0,
                value: "3/2".to_string()
            })
        );
    }

    #[test]
    fn test_sentinel_term_absorbs() {
        let mut sum = WeightedSum::new();
        sum.append(r(1, 1), AtomicUnit::from(2))
            .append(r(0, 1), AtomicUnit::SYMBOLIC_UNDEFINED);
        assert_eq!(sum.value(), Ok(AtomicUnit::SYMBOLIC_UNDEFINED));
        assert_eq!(sum.partial_value(1), Ok(AtomicUnit::from(2)));
    }

    #[test]
    fn test_negated_sentinel_term_is_kept() {
        let n = -AtomicUnit::SYMBOLIC_UNDEFINED;
        let mut sum = WeightedSum::new();
        sum.append(r(1, 1), AtomicUnit::from(2)).append(r(1, 1), n);
        assert_eq!(sum.value(), Ok(n));
    }

    #[test]
    fn test_zero_denominator_coefficient() {
        let mut sum = WeightedSum::new();
        sum.append(r(1, 1), AtomicUnit::from(2))
            .append(Rational::new_raw(1, 0), AtomicUnit::from(2));
        assert_eq!(sum.value(), Ok(AtomicUnit::SYMBOLIC_UNDEFINED));
        assert_eq!(
            sum.value(),
            AtomicUnit::from(2).scale(Rational::new_raw(1, 0))
        );
        assert_eq!(sum.partial_value(1), Ok(AtomicUnit::from(2)));
        assert!(!sum.is_convergent_so_far(r(1, 1)));

        let mut small = WeightedSum::new();
        small.append(r(0, 1), AtomicUnit::from(1));
        assert!(small.is_convergent_so_far(r(1, 1)));
        assert!(!small.is_convergent_so_far(Rational::new_raw(1, 0)));
    }

    #[test]
    fn test_out_of_range_clamps() {
        let sum: WeightedSum = [WeightedTerm::new(r(1_000_000, 1), AtomicUnit::from(1_000))]
            .into_iter()
            .collect();
        let value = sum.value().unwrap();
        assert_eq!(value.real(), crate::core::MAGNITUDE_MAX as i32);
    }

    #[test]
    fn test_continuation_and_materialize() {
        let first = WeightedTerm::new(r(1, 1), AtomicUnit::from(64));
        let mut sum = WeightedSum::new().with_continuation(Geometric::new(first, r(1, 2)));
        assert!(sum.is_infinite());
        assert!(sum.is_empty());
        assert_eq!(sum.term(3).map(|t| t.coefficient), Some(r(1, 8)));

        // 64 + 32 + 16 + 8
        assert_eq!(sum.partial_value(4), Ok(AtomicUnit::from(120)));
        assert_eq!(sum.materialize(4), 4);
        assert_eq!(sum.len(), 4);
        assert_eq!(sum.value(), Ok(AtomicUnit::from(120)));
    }

    #[test]
    fn test_materialize_stops_at_end_of_rule() {
        let mut sum = WeightedSum::new().with_continuation(FnContinuation::new(|i| {
            (i < 2).then(|| WeightedTerm::new(r(1, 1), AtomicUnit::one()))
        }));
        assert_eq!(sum.materialize(10), 2);
        assert_eq!(sum.partial_value(10).map(|u| u.real()), Ok(2));
    }

    #[test]
    fn test_convergence_heuristic() {
        let first = WeightedTerm::new(r(1, 1), AtomicUnit::from(64));
        let mut sum = WeightedSum::new().with_continuation(Geometric::new(first, r(1, 2)));
        assert!(!sum.is_convergent_so_far(r(1, 1)));
        sum.materialize(3);
        assert!(!sum.is_convergent_so_far(r(8, 1)));
        sum.materialize(7);
        assert!(sum.is_convergent_so_far(r(1, 1)));
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WeightedSum>();
    }
}
