//! The 4-bit integrity checksum.
//!
//! `checksum = (Σ |ordinal_i| + Σ sign_i) mod 16`
//!
//! Every atomic unit stores the checksum of its own vector. It is recomputed
//! whenever a unit is decoded from bytes; a mismatch is reported as
//! [`QnError::Integrity`](crate::QnError::Integrity).

use std::fmt;

use super::constants::CHECKSUM_MODULUS;
use super::ordinal::OrdinalVector;

/// A 4-bit checksum value (`0..=15`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Checksum(u8);

impl Checksum {
    /// Wraps a raw nibble, keeping only the low four bits.
    #[inline]
    #[must_use]
    pub const fn from_nibble(nibble: u8) -> Self {
        Self(nibble & 0x0F)
    }

    /// The raw 4-bit value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Computes the checksum of an ordinal vector.
    #[must_use]
    pub fn of(vector: &OrdinalVector) -> Self {
        let magnitudes: u64 = vector.magnitudes().iter().map(|&m| u64::from(m)).sum();
        let signs = u64::from(vector.sign_bits().count_ones());
        Self(((magnitudes + signs) % u64::from(CHECKSUM_MODULUS)) as u8)
    }

    /// True if this checksum matches the vector.
    #[inline]
    #[must_use]
    pub fn verify(self, vector: &OrdinalVector) -> bool {
        self == Self::of(vector)
    }
}

/// Computes the checksum of an ordinal vector.
#[inline]
#[must_use]
pub fn compute_checksum(vector: &OrdinalVector) -> Checksum {
    Checksum::of(vector)
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}
