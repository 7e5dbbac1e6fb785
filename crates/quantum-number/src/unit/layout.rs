//! Canonical 256-bit binary layout.
//!
//! Bits are numbered little-endian: bit `n` lives in byte `n / 8` at
//! position `n % 8`.
//!
//! ```text
//! bits 21·i .. 21·i+19   slot i magnitude (20 bits, i = 0..11)
//! bit  21·i+20           slot i sign (1 = negative)
//! bits 252 .. 255        checksum
//! ```
//!
//! Decoding re-checks the range of every magnitude and the checksum; it
//! never repairs a unit.

use super::AtomicUnit;
use crate::core::digest;
use crate::core::{
    CHECKSUM_BITS, CHECKSUM_OFFSET, NUM_ORDINALS, ORDINAL_BITS, SLOT_BITS, UNIT_BYTES,
};
use crate::error::{QnError, Result};

fn write_bits(buf: &mut [u8; UNIT_BYTES], offset: usize, width: usize, value: u32) {
    for bit in 0..width {
        if value >> bit & 1 == 1 {
            let n = offset + bit;
            buf[n / 8] |= 1 << (n % 8);
        }
    }
}

fn read_bits(buf: &[u8; UNIT_BYTES], offset: usize, width: usize) -> u32 {
    (0..width).fold(0, |acc, bit| {
        let n = offset + bit;
        acc | (u32::from(buf[n / 8] >> (n % 8) & 1) << bit)
    })
}

fn nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl AtomicUnit {
    /// Encodes the unit into its 32-byte layout.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; UNIT_BYTES] {
        let mut buf = [0u8; UNIT_BYTES];
        let magnitudes = self.ordinals.magnitudes();
        let signs = self.ordinals.sign_bits();
        for (i, &magnitude) in magnitudes.iter().enumerate() {
            let base = i * SLOT_BITS;
            write_bits(&mut buf, base, ORDINAL_BITS, magnitude);
            write_bits(&mut buf, base + ORDINAL_BITS, 1, u32::from(signs >> i & 1));
        }
        write_bits(
            &mut buf,
            CHECKSUM_OFFSET,
            CHECKSUM_BITS,
            u32::from(self.checksum.get()),
        );
        buf
    }

    /// Decodes a unit from its 32-byte layout.
    ///
    /// # Errors
    ///
    /// Returns [`QnError::Range`] if a 20-bit magnitude field exceeds the
    /// representable range and [`QnError::Integrity`] if the stored checksum
    /// does not match the decoded ordinals.
    pub fn from_bytes(bytes: &[u8; UNIT_BYTES]) -> Result<Self> {
        let mut magnitudes = [0u32; NUM_ORDINALS];
        let mut signs = [false; NUM_ORDINALS];
        for i in 0..NUM_ORDINALS {
            let base = i * SLOT_BITS;
            magnitudes[i] = read_bits(bytes, base, ORDINAL_BITS);
            signs[i] = read_bits(bytes, base + ORDINAL_BITS, 1) == 1;
        }
        let checksum = read_bits(bytes, CHECKSUM_OFFSET, CHECKSUM_BITS) as u8;
        Self::from_raw(magnitudes, signs, checksum)
    }

    /// The layout as 64 lowercase hex digits (byte 0 first).
    #[must_use]
    pub fn to_hex(&self) -> String {
        digest::to_hex(&self.to_bytes())
    }

    /// Decodes a unit from 64 hex digits (either case).
    ///
    /// # Errors
    ///
    /// Returns [`QnError::Parse`] if the text is not 64 hex digits, and the
    /// errors of [`from_bytes`](Self::from_bytes) otherwise.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let hex = hex.trim();
        let parse_error = |reason| QnError::Parse {
            input: hex.to_string(),
            reason,
        };
        if hex.len() != UNIT_BYTES * 2 {
            return Err(parse_error("expected 64 hex digits"));
        }
        let mut bytes = [0u8; UNIT_BYTES];
        for (byte, pair) in bytes.iter_mut().zip(hex.as_bytes().chunks_exact(2)) {
            let (hi, lo) = (nibble(pair[0]), nibble(pair[1]));
            *byte = match (hi, lo) {
                (Some(hi), Some(lo)) => hi << 4 | lo,
                _ => return Err(parse_error("invalid hex digit")),
            };
        }
        Self::from_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{OrdinalIndex, MAGNITUDE_MAX};

    #[test]
    fn test_zero_encodes_to_zero_bytes() {
        assert_eq!(AtomicUnit::zero().to_bytes(), [0u8; UNIT_BYTES]);
    }

    #[test]
    fn test_slot_a_occupies_low_bits() {
        let bytes = AtomicUnit::from(5).to_bytes();
        assert_eq!(bytes[0], 5);
        // Checksum 5 in the top nibble of byte 31.
        assert_eq!(bytes[31], 5 << 4);
    }

    #[test]
    fn test_sign_bit_position() {
        let bytes = AtomicUnit::from(-1).to_bytes();
        // Bit 0 is the magnitude, bit 20 the sign.
        assert_eq!(bytes[0], 1);
        assert_eq!(bytes[2], 1 << 4);
        assert_eq!(bytes[31], 2 << 4);
    }

    #[test]
    fn test_sentinel_layout_is_stable() {
        let s = AtomicUnit::SYMBOLIC_UNDEFINED;
        let decoded = AtomicUnit::from_bytes(&s.to_bytes()).unwrap();
        assert_eq!(decoded, s);
        assert!(decoded.is_symbolic_undefined());
        assert_eq!(s.to_bytes()[31] >> 4, 12);
    }

    #[test]
    fn test_flipped_bit_is_integrity_error() {
        let mut bytes = AtomicUnit::complex(3, 4).to_bytes();
        bytes[0] ^= 0x01;
        assert!(matches!(
            AtomicUnit::from_bytes(&bytes),
            Err(QnError::Integrity { .. })
        ));
    }

    #[test]
    fn test_oversized_magnitude_is_range_error() {
        let mut bytes = [0u8; UNIT_BYTES];
        // Slot 0 magnitude = 2^19 (one past the maximum).
        bytes[2] = 0x08;
        assert_eq!(
            AtomicUnit::from_bytes(&bytes),
            Err(QnError::Range {
                index: 0,
                value: i64::from(MAGNITUDE_MAX) + 1
            })
        );
    }

    #[test]
    fn test_hex_round_trip_of_wide_unit() {
        let u = AtomicUnit::with_slot(OrdinalIndex::K, -123_456).0 + AtomicUnit::complex(7, 9);
        let hex = u.to_hex();
        assert_eq!(hex.len(), 64);
        assert_eq!(AtomicUnit::from_hex(&hex), Ok(u));
        assert_eq!(AtomicUnit::from_hex(&hex.to_uppercase()), Ok(u));
    }

    #[test]
    fn test_bad_hex() {
        assert!(matches!(
            AtomicUnit::from_hex("abc"),
            Err(QnError::Parse { .. })
        ));
        let not_hex = "zz".repeat(32);
        assert!(matches!(
            AtomicUnit::from_hex(&not_hex),
            Err(QnError::Parse { .. })
        ));
    }
}
