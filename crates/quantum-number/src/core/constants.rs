//! Layout constants of the 256-bit Quantum Number.
//!
//! ```text
//! 12 slots × (20 magnitude bits + 1 sign bit) = 252 bits
//!                              + 4 checksum bits = 256 bits
//! ```

/// Number of ordinal slots in an atomic unit.
pub const NUM_ORDINALS: usize = 12;

/// Width of one ordinal magnitude field.
pub const ORDINAL_BITS: usize = 20;

/// Width of one slot region in the binary layout (magnitude + sign bit).
pub const SLOT_BITS: usize = ORDINAL_BITS + 1;

/// Width of the checksum field.
pub const CHECKSUM_BITS: usize = 4;

/// Bit offset of the checksum field in the binary layout.
pub const CHECKSUM_OFFSET: usize = NUM_ORDINALS * SLOT_BITS; // 252

/// Total width of an atomic unit.
pub const UNIT_BITS: usize = CHECKSUM_OFFSET + CHECKSUM_BITS; // 256

/// Size of the binary layout in bytes.
pub const UNIT_BYTES: usize = UNIT_BITS / 8; // 32

/// Lower bound of the declared ordinal range (-2^19).
pub const ORDINAL_MIN: i32 = -(1 << (ORDINAL_BITS - 1));

/// Upper bound of the declared ordinal range (2^19 - 1).
pub const ORDINAL_MAX: i32 = (1 << (ORDINAL_BITS - 1)) - 1;

/// Largest magnitude a slot stores.
///
/// Sign and magnitude are independent, so the representable values are
/// symmetric: `-ORDINAL_MIN` is not reachable and clamps to `MAGNITUDE_MAX`.
pub const MAGNITUDE_MAX: u32 = ORDINAL_MAX as u32;

/// Modulus of the 4-bit checksum.
pub const CHECKSUM_MODULUS: u32 = 1 << CHECKSUM_BITS;

/// Conventional slot names, `a` through `l`.
pub const ORDINAL_NAMES: [char; NUM_ORDINALS] =
    ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l'];
