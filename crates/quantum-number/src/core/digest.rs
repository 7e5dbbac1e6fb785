//! 256-bit FNV-1a digest used for content-addressed ids.
//!
//! Four 64-bit FNV-1a lanes with a cross-lane mix after every byte. Not
//! cryptographic: ids only need to be stable and well spread, and equal input
//! always gives an equal digest.

/// Streaming 256-bit digest.
#[derive(Debug, Clone)]
pub(crate) struct Fnv256 {
    state: [u64; 4],
}

impl Fnv256 {
    const PRIME: u64 = 0x0000_0100_0000_01B3;
    const OFFSET: [u64; 4] = [
        0xcbf2_9ce4_8422_2325,
        0x6c62_272e_07bb_0142,
        0x62b8_2175_6bd6_2611,
        0x7b7c_00a1_00ad_4d17,
    ];

    pub(crate) const fn new() -> Self {
        Self {
            state: Self::OFFSET,
        }
    }

    /// Absorbs bytes.
    pub(crate) fn update(&mut self, data: &[u8]) -> &mut Self {
        for &byte in data {
            for lane in &mut self.state {
                *lane ^= u64::from(byte);
                *lane = lane.wrapping_mul(Self::PRIME);
            }
            self.state[0] = self.state[0].wrapping_add(self.state[3]);
            self.state[1] = self.state[1].wrapping_add(self.state[0]);
            self.state[2] = self.state[2].wrapping_add(self.state[1]);
            self.state[3] = self.state[3].wrapping_add(self.state[2]);
        }
        self
    }

    /// Absorbs a length or count as eight little-endian bytes.
    pub(crate) fn update_len(&mut self, len: usize) -> &mut Self {
        self.update(&(len as u64).to_le_bytes())
    }

    pub(crate) fn finalize(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        for (chunk, lane) in out.chunks_exact_mut(8).zip(self.state.iter()) {
            chunk.copy_from_slice(&lane.to_le_bytes());
        }
        out
    }
}

/// Lowercase hex of a byte slice.
pub(crate) fn to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut s = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(s, "{byte:02x}");
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let a = Fnv256::new().update(b"quantition").finalize();
        let b = Fnv256::new().update(b"quantition").finalize();
        assert_eq!(a, b);
    }

    #[test]
    fn test_input_sensitive() {
        let a = Fnv256::new().update(b"x").finalize();
        let b = Fnv256::new().update(b"y").finalize();
        assert_ne!(a, b);
    }

    #[test]
    fn test_chunking_is_transparent() {
        let whole = Fnv256::new().update(b"abcdef").finalize();
        let split = Fnv256::new().update(b"abc").update(b"def").finalize();
        assert_eq!(whole, split);
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(to_hex(&[0x00, 0xab, 0x10]), "00ab10");
    }
}
