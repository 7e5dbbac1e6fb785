//! The atomic unit: an ordinal vector sealed with its checksum.
//!
//! An [`AtomicUnit`] is an immutable `Copy` value. Every constructor and every
//! arithmetic result recomputes the checksum together with the ordinals, so a
//! unit obtained through the public API always satisfies
//! `checksum == Checksum::of(ordinals)`. The only way to observe a mismatch is
//! to load foreign data ([`AtomicUnit::from_raw`], [`AtomicUnit::from_bytes`]),
//! which reports it as [`QnError::Integrity`].
//!
//! # Slot conventions
//!
//! | Slot | Name | Role |
//! |------|------|------|
//! | 0 | `a` | real component / numerator |
//! | 1 | `b` | denominator of the nested-division head `a / b` |
//! | 8 | `i` | imaginary component |
//! | 9, 10 | `j`, `k` | quaternion extension |
//!
//! # Symbolic undefined
//!
//! Division by a zero denominator does not fail. It yields
//! [`AtomicUnit::SYMBOLIC_UNDEFINED`]: magnitudes `[1,0,1,1,1,1,1,1,1,1,1,1]`
//! with only slot `b` flagged negative, checksum 12. The sentinel absorbs:
//! any arithmetic with a sentinel operand returns that operand. Negation is a
//! pure sign flip, so the negated sentinel is a second, equally recognised
//! orientation of the same pattern, and it is kept as is through arithmetic.
//!
//! # Example
//!
//! ```
//! use quantum_number::AtomicUnit;
//!
//! let six = AtomicUnit::from(6);
//! let two = AtomicUnit::from(2);
//! assert_eq!(six / two, AtomicUnit::from(3));
//!
//! let undefined = six / AtomicUnit::zero();
//! assert!(undefined.is_symbolic_undefined());
//! assert!(undefined.verify());
//! ```

mod arith;
mod complex;
mod layout;
#[cfg(feature = "serde")]
mod serde_impl;
mod text;

use std::fmt;

use num_rational::Ratio;

use crate::core::{
    Checksum, Clamped, OrdinalIndex, OrdinalVector, MAGNITUDE_MAX, NUM_ORDINALS,
};
use crate::error::{QnError, Result};

/// The 256-bit Quantum Number value.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AtomicUnit {
    ordinals: OrdinalVector,
    checksum: Checksum,
}

/// Sign mask of the canonical sentinel: only slot `b`.
const SENTINEL_SIGNS: u16 = 1 << 1;

/// Mask covering all twelve sign flags.
const ALL_SIGNS: u16 = (1 << NUM_ORDINALS) - 1;

/// Sign mask of the negated sentinel.
const NEGATED_SENTINEL_SIGNS: u16 = ALL_SIGNS ^ SENTINEL_SIGNS;

const SENTINEL_MAGNITUDES: [u32; NUM_ORDINALS] = [1, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1];

impl AtomicUnit {
    /// The symbolic undefined sentinel returned for division by zero.
    pub const SYMBOLIC_UNDEFINED: Self = Self {
        ordinals: OrdinalVector::from_raw_parts(SENTINEL_MAGNITUDES, SENTINEL_SIGNS),
        checksum: Checksum::from_nibble(12),
    };

    /// Seals an ordinal vector, computing its checksum.
    #[must_use]
    pub fn new(ordinals: OrdinalVector) -> Self {
        Self {
            checksum: Checksum::of(&ordinals),
            ordinals,
        }
    }

    /// Every slot zero, every sign positive.
    #[must_use]
    pub fn zero() -> Self {
        Self::new(OrdinalVector::ZERO)
    }

    /// Every slot one: the slot-wise multiplicative identity.
    ///
    /// Note that `one() != AtomicUnit::from(1)`: integer conversion only
    /// populates slot `a`.
    #[must_use]
    pub fn one() -> Self {
        Self::new(OrdinalVector::from_raw_parts([1; NUM_ORDINALS], 0))
    }

    /// The symbolic undefined sentinel.
    #[inline]
    #[must_use]
    pub const fn symbolic_undefined() -> Self {
        Self::SYMBOLIC_UNDEFINED
    }

    /// Builds a unit from stored ordinals and independent sign flags,
    /// clamping magnitudes and computing the checksum.
    #[must_use]
    pub fn from_parts(values: [i32; NUM_ORDINALS], signs: [bool; NUM_ORDINALS]) -> Self {
        Self::new(OrdinalVector::from_parts(values, signs))
    }

    /// Loads a unit from raw arrays, verifying range and checksum.
    ///
    /// # Errors
    ///
    /// Returns [`QnError::Range`] if a magnitude exceeds the representable
    /// range and [`QnError::Integrity`] if `checksum` does not match.
    pub fn from_raw(
        magnitudes: [u32; NUM_ORDINALS],
        signs: [bool; NUM_ORDINALS],
        checksum: u8,
    ) -> Result<Self> {
        if let Some((index, &value)) = magnitudes
            .iter()
            .enumerate()
            .find(|(_, &m)| m > MAGNITUDE_MAX)
        {
            return Err(QnError::Range {
                index,
                value: i64::from(value),
            });
        }
        let mask = signs
            .iter()
            .enumerate()
            .fold(0u16, |mask, (i, &negative)| mask | (u16::from(negative) << i));
        let ordinals = OrdinalVector::from_raw_parts(magnitudes, mask);
        let computed = Checksum::of(&ordinals);
        if checksum != computed.get() {
            return Err(QnError::Integrity {
                stored: checksum,
                computed: computed.get(),
            });
        }
        Ok(Self {
            ordinals,
            checksum: computed,
        })
    }

    /// Builds the unit for `numerator / denominator`.
    ///
    /// The fraction is reduced and its sign moved to the numerator. A unit
    /// denominator gives a plain integer unit (slot `a` only); otherwise slot
    /// `a` holds the numerator and slot `b` the denominator. A zero
    /// denominator gives the sentinel. Terms too wide for a slot clamp.
    #[must_use]
    pub fn from_ratio(numerator: i64, denominator: i64) -> Self {
        if denominator == 0 {
            return Self::SYMBOLIC_UNDEFINED;
        }
        let (mut n, mut d) = (i128::from(numerator), i128::from(denominator));
        let g = gcd(n, d);
        if g > 1 {
            n /= g;
            d /= g;
        }
        if d < 0 {
            n = -n;
            d = -d;
        }
        let mut ordinals = OrdinalVector::new();
        ordinals.store(OrdinalIndex::REAL, saturate(n));
        if d != 1 {
            ordinals.store(OrdinalIndex::DENOMINATOR, saturate(d));
        }
        Self::new(ordinals)
    }

    /// Builds a unit with one slot set and every other slot zero.
    ///
    /// Returns the unit and, if the value had to be clamped, the clamp record.
    #[must_use]
    pub fn with_slot(index: OrdinalIndex, value: i64) -> (Self, Option<Clamped>) {
        let mut ordinals = OrdinalVector::new();
        let event = ordinals.store(index, value);
        (Self::new(ordinals), event)
    }

    /// The ordinal vector (a copy can be edited and re-sealed with [`new`](Self::new)).
    #[inline]
    #[must_use]
    pub const fn ordinals(&self) -> &OrdinalVector {
        &self.ordinals
    }

    /// The stored checksum.
    #[inline]
    #[must_use]
    pub const fn checksum(&self) -> Checksum {
        self.checksum
    }

    /// Effective signed value of a slot.
    #[inline]
    #[must_use]
    pub const fn get(&self, index: OrdinalIndex) -> i32 {
        self.ordinals.get(index)
    }

    /// Effective signed value of a slot given by number.
    ///
    /// # Errors
    ///
    /// Returns [`QnError::Index`] if `index` is not in `0..=11`.
    pub fn try_get(&self, index: usize) -> Result<i32> {
        self.ordinals.try_get(index)
    }

    /// Stored magnitude of a slot.
    #[inline]
    #[must_use]
    pub const fn magnitude(&self, index: OrdinalIndex) -> u32 {
        self.ordinals.magnitude(index)
    }

    /// Sign flag of a slot (`true` is negative).
    #[inline]
    #[must_use]
    pub const fn sign(&self, index: OrdinalIndex) -> bool {
        self.ordinals.sign(index)
    }

    /// True if every magnitude is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.ordinals.is_zero()
    }

    /// True for the sentinel in either sign orientation.
    #[must_use]
    pub fn is_symbolic_undefined(&self) -> bool {
        self.ordinals.magnitudes() == SENTINEL_MAGNITUDES
            && matches!(
                self.ordinals.sign_bits(),
                SENTINEL_SIGNS | NEGATED_SENTINEL_SIGNS
            )
    }

    /// True if the stored checksum matches the ordinals.
    #[inline]
    #[must_use]
    pub fn verify(&self) -> bool {
        self.checksum.verify(&self.ordinals)
    }

    /// Reads the unit as a rational `a / b`.
    ///
    /// Returns `None` unless every slot other than `a` and `b` is zero. A
    /// zero `b` reads as the integer `a`. The ratio is returned reduced, so
    /// structurally different units may read as the same ratio.
    #[must_use]
    pub fn to_ratio(&self) -> Option<Ratio<i64>> {
        let head_only = OrdinalIndex::all()
            .skip(2)
            .all(|slot| self.magnitude(slot) == 0);
        if !head_only {
            return None;
        }
        let n = i64::from(self.get(OrdinalIndex::REAL));
        match i64::from(self.get(OrdinalIndex::DENOMINATOR)) {
            0 => Some(Ratio::from_integer(n)),
            d => Some(Ratio::new(n, d)),
        }
    }
}

impl Default for AtomicUnit {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<OrdinalVector> for AtomicUnit {
    fn from(ordinals: OrdinalVector) -> Self {
        Self::new(ordinals)
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for AtomicUnit {
                /// Places the integer in slot `a`, clamping wide values.
                fn from(value: $t) -> Self {
                    Self::with_slot(OrdinalIndex::REAL, i64::from(value)).0
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16);

impl fmt::Debug for AtomicUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtomicUnit")
            .field("ordinals", &self.ordinals)
            .field("checksum", &self.checksum.get())
            .finish()
    }
}

/// Checks the checksum invariant of a unit.
#[inline]
#[must_use]
pub fn verify(unit: &AtomicUnit) -> bool {
    unit.verify()
}

/// True if the unit is the symbolic undefined sentinel.
#[inline]
#[must_use]
pub fn is_symbolic_undefined(unit: &AtomicUnit) -> bool {
    unit.is_symbolic_undefined()
}

fn gcd(a: i128, b: i128) -> i128 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Narrows to `i64`, saturating; the slot store clamps further.
pub(crate) fn saturate(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}
