//! Fixed-width building blocks: layout constants, the ordinal vector, the
//! 4-bit checksum, and the digest behind content-addressed ids.

pub mod checksum;
pub mod constants;
pub(crate) mod digest;
pub mod ordinal;

pub use checksum::{compute_checksum, Checksum};
pub use constants::*;
pub use ordinal::{Clamped, OrdinalIndex, OrdinalVector};
