//! The ordinal vector: twelve magnitude slots with independent sign flags.
//!
//! A slot's effective signed value is `sign ? -|magnitude| : +|magnitude|`.
//! Magnitudes never leave `0..=MAGNITUDE_MAX`; writes beyond the range are
//! clamped to the boundary and reported as a [`Clamped`] event (and a
//! `tracing` warning), never wrapped.
//!
//! # Example
//!
//! ```
//! use quantum_number::{OrdinalIndex, OrdinalVector};
//!
//! let mut v = OrdinalVector::new();
//! v.set(0, -42).unwrap();
//! assert_eq!(v.get(OrdinalIndex::REAL), -42);
//! assert_eq!(v.magnitude(OrdinalIndex::REAL), 42);
//! assert!(v.sign(OrdinalIndex::REAL));
//!
//! // Out of range: clamped, not an error.
//! let event = v.set(1, 1 << 30).unwrap();
//! assert!(event.is_some());
//! assert_eq!(v.get(OrdinalIndex::DENOMINATOR), 524_287);
//! ```

use std::fmt;

use super::constants::{MAGNITUDE_MAX, NUM_ORDINALS, ORDINAL_NAMES};
use crate::error::{QnError, Result};

// ============================================================================
// OrdinalIndex
// ============================================================================

/// A slot index that is valid by construction (`0..=11`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrdinalIndex(u8);

impl OrdinalIndex {
    /// Slot `a`: the real component.
    pub const REAL: Self = Self(0);

    /// Slot `b`: denominator of the nested-division head `a / b`.
    pub const DENOMINATOR: Self = Self(1);

    /// Slot `i`: the imaginary component.
    pub const IMAGINARY: Self = Self(8);

    /// Slot `j`: quaternion extension.
    pub const J: Self = Self(9);

    /// Slot `k`: quaternion extension.
    pub const K: Self = Self(10);

    /// Returns the index if it names one of the twelve slots.
    #[inline]
    #[must_use]
    pub const fn new(index: usize) -> Option<Self> {
        if index < NUM_ORDINALS {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// The raw slot number.
    #[inline]
    #[must_use]
    pub const fn get(self) -> usize {
        self.0 as usize
    }

    /// Conventional slot name (`a`..`l`).
    #[inline]
    #[must_use]
    pub const fn name(self) -> char {
        ORDINAL_NAMES[self.0 as usize]
    }

    /// Looks a slot up by its conventional name.
    #[must_use]
    pub fn from_name(name: char) -> Option<Self> {
        ORDINAL_NAMES
            .iter()
            .position(|&c| c == name)
            .and_then(Self::new)
    }

    /// All twelve slots in order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..NUM_ORDINALS as u8).map(Self)
    }
}

impl TryFrom<usize> for OrdinalIndex {
    type Error = QnError;

    fn try_from(index: usize) -> Result<Self> {
        Self::new(index).ok_or(QnError::Index { index })
    }
}

impl fmt::Display for OrdinalIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Clamping
// ============================================================================

/// Record of a write that exceeded the ordinal range and was clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clamped {
    /// Slot that was written.
    pub index: usize,
    /// Effective signed value that was requested.
    pub requested: i64,
    /// Effective signed value that was stored.
    pub stored: i32,
}

/// Clamps an effective signed value into the representable range.
///
/// Returns `(magnitude, negative, event)`.
pub(crate) fn clamp_signed(index: usize, value: i64) -> (u32, bool, Option<Clamped>) {
    let limit = i64::from(MAGNITUDE_MAX);
    let stored = value.clamp(-limit, limit);
    let event = (stored != value).then(|| {
        tracing::warn!(
            slot = index,
            requested = value,
            stored,
            "ordinal clamped to representable range"
        );
        Clamped {
            index,
            requested: value,
            stored: stored as i32,
        }
    });
    (stored.unsigned_abs() as u32, stored < 0, event)
}

// ============================================================================
// OrdinalVector
// ============================================================================

/// Twelve ordinal slots plus twelve independent sign flags.
///
/// This is the mutable payload an [`AtomicUnit`](crate::AtomicUnit) is built
/// from; the unit itself is immutable.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OrdinalVector {
    magnitudes: [u32; NUM_ORDINALS],
    /// Bit `i` set means slot `i` is negative.
    signs: u16,
}

impl OrdinalVector {
    /// All slots zero, all signs positive.
    pub const ZERO: Self = Self {
        magnitudes: [0; NUM_ORDINALS],
        signs: 0,
    };

    /// Creates an all-zero vector.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::ZERO
    }

    /// Trusted constructor; callers guarantee every magnitude is in range.
    pub(crate) const fn from_raw_parts(magnitudes: [u32; NUM_ORDINALS], signs: u16) -> Self {
        Self { magnitudes, signs }
    }

    /// Builds a vector from stored ordinals and independent sign flags.
    ///
    /// The sign of each `values[i]` is ignored: the slot stores `|values[i]|`
    /// and `signs[i]` alone decides the effective sign. Magnitudes above the
    /// range are clamped.
    #[must_use]
    pub fn from_parts(values: [i32; NUM_ORDINALS], signs: [bool; NUM_ORDINALS]) -> Self {
        let mut v = Self::ZERO;
        for (index, (&value, &negative)) in values.iter().zip(signs.iter()).enumerate() {
            let magnitude = i64::from(value.unsigned_abs());
            let (magnitude, _, _) = clamp_signed(index, magnitude);
            v.put(index, magnitude, negative);
        }
        v
    }

    /// Builds a vector from effective signed values (`sign = value < 0`).
    #[must_use]
    pub fn from_signed(values: [i64; NUM_ORDINALS]) -> Self {
        let mut v = Self::ZERO;
        for (index, &value) in values.iter().enumerate() {
            let (magnitude, negative, _) = clamp_signed(index, value);
            v.put(index, magnitude, negative);
        }
        v
    }

    /// Effective signed value of a slot.
    #[inline]
    #[must_use]
    pub const fn get(&self, index: OrdinalIndex) -> i32 {
        let m = self.magnitudes[index.get()] as i32;
        if self.sign(index) {
            -m
        } else {
            m
        }
    }

    /// Effective signed value of a slot given by number.
    ///
    /// # Errors
    ///
    /// Returns [`QnError::Index`] if `index` is not in `0..=11`.
    pub fn try_get(&self, index: usize) -> Result<i32> {
        OrdinalIndex::try_from(index).map(|i| self.get(i))
    }

    /// Stored magnitude of a slot.
    #[inline]
    #[must_use]
    pub const fn magnitude(&self, index: OrdinalIndex) -> u32 {
        self.magnitudes[index.get()]
    }

    /// Sign flag of a slot (`true` is negative).
    #[inline]
    #[must_use]
    pub const fn sign(&self, index: OrdinalIndex) -> bool {
        self.signs & (1 << index.get()) != 0
    }

    /// Sets a slot to an effective signed value.
    ///
    /// Values outside the representable range are clamped; the returned
    /// [`Clamped`] record describes the adjustment.
    ///
    /// # Errors
    ///
    /// Returns [`QnError::Index`] if `index` is not in `0..=11`.
    pub fn set(&mut self, index: usize, value: i64) -> Result<Option<Clamped>> {
        let slot = OrdinalIndex::try_from(index)?;
        Ok(self.store(slot, value))
    }

    /// Sets a slot through a typed index; never fails.
    pub fn store(&mut self, index: OrdinalIndex, value: i64) -> Option<Clamped> {
        let (magnitude, negative, event) = clamp_signed(index.get(), value);
        self.put(index.get(), magnitude, negative);
        event
    }

    /// Sets a slot's sign flag, leaving the magnitude untouched.
    ///
    /// # Errors
    ///
    /// Returns [`QnError::Index`] if `index` is not in `0..=11`.
    pub fn set_sign(&mut self, index: usize, negative: bool) -> Result<()> {
        let slot = OrdinalIndex::try_from(index)?;
        self.put(slot.get(), self.magnitudes[slot.get()], negative);
        Ok(())
    }

    pub(crate) fn put(&mut self, index: usize, magnitude: u32, negative: bool) {
        debug_assert!(magnitude <= MAGNITUDE_MAX);
        self.magnitudes[index] = magnitude;
        if negative {
            self.signs |= 1 << index;
        } else {
            self.signs &= !(1 << index);
        }
    }

    /// All stored magnitudes.
    #[inline]
    #[must_use]
    pub const fn magnitudes(&self) -> [u32; NUM_ORDINALS] {
        self.magnitudes
    }

    /// Sign flags packed as a 12-bit mask (bit `i` = slot `i` negative).
    #[inline]
    #[must_use]
    pub const fn sign_bits(&self) -> u16 {
        self.signs
    }

    /// Effective signed values of all slots.
    #[must_use]
    pub fn values(&self) -> [i32; NUM_ORDINALS] {
        let mut out = [0; NUM_ORDINALS];
        for slot in OrdinalIndex::all() {
            out[slot.get()] = self.get(slot);
        }
        out
    }

    /// True if every magnitude is zero (sign flags are not consulted).
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.magnitudes.iter().all(|&m| m == 0)
    }
}

impl fmt::Debug for OrdinalVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_map();
        for slot in OrdinalIndex::all() {
            let sign = if self.sign(slot) { '-' } else { '+' };
            list.entry(
                &slot.name(),
                &format_args!("{sign}{}", self.magnitude(slot)),
            );
        }
        list.finish()
    }
}
