//! Slot-wise arithmetic over atomic units.
//!
//! Every binary operation works on each slot independently, using the
//! slot's effective signed value. Results never wrap: a slot whose exact
//! result leaves the representable range is clamped (with a `tracing`
//! warning). Any operand equal to the sentinel makes the result that
//! operand, so either orientation survives unchanged.
//!
//! Zero result slots are positive except where an identity has to keep a
//! negative zero: a sum keeps the left flag against a zero right slot, and a
//! product or quotient keeps a negative zero met by a positive non-zero slot.
//! This makes `x + 0`, `x - 0`, `x × one()`, `one() × x` and `x / one()`
//! structurally equal to `x`.
//!
//! Multiplication is the simplified per-slot product. It does not follow
//! nested-fraction algebra, and it does not distribute over the `a / b`
//! reading of slots `a` and `b`.

use std::ops::{Add, Div, Mul, Neg, Sub};

use num_rational::Ratio;

use super::{saturate, AtomicUnit, ALL_SIGNS};
use crate::core::{OrdinalIndex, OrdinalVector};
use crate::error::{QnError, Result};

impl AtomicUnit {
    /// The sentinel operand, if either is one. The left operand wins.
    pub(crate) fn absorbing(self, rhs: Self) -> Option<Self> {
        if self.is_symbolic_undefined() {
            Some(self)
        } else if rhs.is_symbolic_undefined() {
            Some(rhs)
        } else {
            None
        }
    }

    /// Applies `op` to each pair of effective slot values.
    ///
    /// A zero result slot is negative where `negative_zero(slot)` holds.
    fn slotwise(
        self,
        rhs: Self,
        op: impl Fn(i64, i64) -> i64,
        negative_zero: impl Fn(OrdinalIndex) -> bool,
    ) -> Self {
        if let Some(sentinel) = self.absorbing(rhs) {
            return sentinel;
        }
        let mut out = OrdinalVector::new();
        for slot in OrdinalIndex::all() {
            let value = op(i64::from(self.get(slot)), i64::from(rhs.get(slot)));
            out.store(slot, value);
            if value == 0 && negative_zero(slot) {
                out.put(slot.get(), 0, true);
            }
        }
        Self::new(out)
    }

    /// True when one slot is a negative zero and the other is positive and
    /// non-zero.
    fn keeps_negative_zero(self, rhs: Self, slot: OrdinalIndex) -> bool {
        let negative_zero = |u: Self| u.magnitude(slot) == 0 && u.sign(slot);
        let positive = |u: Self| u.magnitude(slot) != 0 && !u.sign(slot);
        (negative_zero(self) && positive(rhs)) || (negative_zero(rhs) && positive(self))
    }

    /// Clears every sign flag.
    #[must_use]
    pub fn abs(self) -> Self {
        if self.is_symbolic_undefined() {
            return self;
        }
        Self::new(OrdinalVector::from_raw_parts(self.ordinals.magnitudes(), 0))
    }

    /// Slot-wise floor square root of the magnitudes, signs cleared.
    #[must_use]
    pub fn sqrt(self) -> Self {
        if self.is_symbolic_undefined() {
            return self;
        }
        Self::new(OrdinalVector::from_raw_parts(
            self.ordinals.magnitudes().map(isqrt),
            0,
        ))
    }

    /// Exact slot-wise division.
    ///
    /// Behaves like `/` (including the sentinel for zero denominators) but
    /// refuses to truncate.
    ///
    /// # Errors
    ///
    /// Returns [`QnError::Inexact`] for the first slot whose quotient has a
    /// remainder.
    pub fn checked_div(self, rhs: Self) -> Result<Self> {
        let quotient = self / rhs;
        if quotient.is_symbolic_undefined() {
            return Ok(quotient);
        }
        for slot in OrdinalIndex::all() {
            let (a, b) = (self.get(slot), rhs.get(slot));
            if b != 0 && a % b != 0 {
                return Err(QnError::Inexact {
                    index: slot.get(),
                    value: format!("{a}/{b}"),
                });
            }
        }
        Ok(quotient)
    }

    /// Multiplies every slot by an exact rational.
    ///
    /// A zero denominator yields the sentinel; a sentinel unit is returned
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`QnError::Inexact`] for the first slot whose scaled value is
    /// not an integer.
    pub fn scale(self, coefficient: Ratio<i64>) -> Result<Self> {
        let (p, q) = (
            i128::from(*coefficient.numer()),
            i128::from(*coefficient.denom()),
        );
        if self.is_symbolic_undefined() {
            return Ok(self);
        }
        if q == 0 {
            return Ok(Self::SYMBOLIC_UNDEFINED);
        }
        let mut out = OrdinalVector::new();
        for slot in OrdinalIndex::all() {
            let product = i128::from(self.get(slot)) * p;
            if product % q != 0 {
                return Err(QnError::Inexact {
                    index: slot.get(),
                    value: Ratio::new(product, q).to_string(),
                });
            }
            out.store(slot, saturate(product / q));
        }
        Ok(Self::new(out))
    }
}

impl Add for AtomicUnit {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        // A zero sum against a zero right slot keeps the left sign flag.
        self.slotwise(
            rhs,
            |a, b| a + b,
            |slot| rhs.magnitude(slot) == 0 && self.sign(slot),
        )
    }
}

impl Sub for AtomicUnit {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + -rhs
    }
}

impl Neg for AtomicUnit {
    type Output = Self;

    /// Flips every sign flag; magnitudes are unchanged.
    fn neg(self) -> Self {
        Self::new(OrdinalVector::from_raw_parts(
            self.ordinals.magnitudes(),
            self.ordinals.sign_bits() ^ ALL_SIGNS,
        ))
    }
}

impl Mul for AtomicUnit {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.slotwise(rhs, |a, b| a * b, |slot| self.keeps_negative_zero(rhs, slot))
    }
}

impl Div for AtomicUnit {
    type Output = Self;

    /// Slot-wise quotient truncated toward zero.
    ///
    /// A sentinel operand is returned as is. Otherwise an all-zero divisor,
    /// or any slot `x / 0` with `x != 0`, yields the sentinel. A `0 / 0` slot
    /// is `0`.
    fn div(self, rhs: Self) -> Self {
        if let Some(sentinel) = self.absorbing(rhs) {
            return sentinel;
        }
        if rhs.is_zero() {
            return Self::SYMBOLIC_UNDEFINED;
        }
        let stray_zero = OrdinalIndex::all()
            .any(|slot| rhs.magnitude(slot) == 0 && self.magnitude(slot) != 0);
        if stray_zero {
            return Self::SYMBOLIC_UNDEFINED;
        }
        self.slotwise(
            rhs,
            |a, b| if b == 0 { 0 } else { a / b },
            |slot| self.keeps_negative_zero(rhs, slot),
        )
    }
}

/// Floor square root.
fn isqrt(n: u32) -> u32 {
    if n < 2 {
        return n;
    }
    let n = u64::from(n);
    let mut x = n;
    let mut y = (x + 1) / 2;
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x as u32
}
