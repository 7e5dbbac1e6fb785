//! Complex and quaternion views over slots `a`, `i`, `j` and `k`.

use super::AtomicUnit;
use crate::core::{OrdinalIndex, OrdinalVector};

impl AtomicUnit {
    /// Builds `re + im·i` (slot `a` and slot `i`), clamping each part.
    #[must_use]
    pub fn complex(re: i64, im: i64) -> Self {
        let mut ordinals = OrdinalVector::new();
        ordinals.store(OrdinalIndex::REAL, re);
        ordinals.store(OrdinalIndex::IMAGINARY, im);
        Self::new(ordinals)
    }

    /// Real component (slot `a`).
    #[inline]
    #[must_use]
    pub const fn real(&self) -> i32 {
        self.get(OrdinalIndex::REAL)
    }

    /// Imaginary component (slot `i`).
    #[inline]
    #[must_use]
    pub const fn imaginary(&self) -> i32 {
        self.get(OrdinalIndex::IMAGINARY)
    }

    /// Quaternion `j` component.
    #[inline]
    #[must_use]
    pub const fn j(&self) -> i32 {
        self.get(OrdinalIndex::J)
    }

    /// Quaternion `k` component.
    #[inline]
    #[must_use]
    pub const fn k(&self) -> i32 {
        self.get(OrdinalIndex::K)
    }

    /// Flips the sign flag of the imaginary slot. The sentinel is returned
    /// unchanged.
    #[must_use]
    pub fn conjugate(self) -> Self {
        if self.is_symbolic_undefined() {
            return self;
        }
        let mut ordinals = self.ordinals;
        let slot = OrdinalIndex::IMAGINARY;
        ordinals.put(slot.get(), self.magnitude(slot), !self.sign(slot));
        Self::new(ordinals)
    }

    /// Complex product over slots `a` and `i`: `(ac - bd) + (ad + bc)i`.
    ///
    /// The result carries only the real and imaginary slots.
    #[must_use]
    pub fn complex_mul(self, rhs: Self) -> Self {
        if let Some(sentinel) = self.absorbing(rhs) {
            return sentinel;
        }
        let (a, b) = (i64::from(self.real()), i64::from(self.imaginary()));
        let (c, d) = (i64::from(rhs.real()), i64::from(rhs.imaginary()));
        Self::complex(a * c - b * d, a * d + b * c)
    }
}
