//! serde support: a unit travels as its 32-byte layout.
//!
//! Human-readable formats (JSON, TOML) carry the 64-digit hex string;
//! binary formats carry the raw byte array. Both paths go through
//! [`AtomicUnit::from_bytes`], so a tampered unit fails to deserialise.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::AtomicUnit;
use crate::core::UNIT_BYTES;

impl Serialize for AtomicUnit {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            self.to_bytes().serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for AtomicUnit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let hex = String::deserialize(deserializer)?;
            AtomicUnit::from_hex(&hex).map_err(D::Error::custom)
        } else {
            let bytes = <[u8; UNIT_BYTES]>::deserialize(deserializer)?;
            AtomicUnit::from_bytes(&bytes).map_err(D::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_carries_hex() {
        let u = AtomicUnit::complex(3, 4);
        let json = serde_json::to_string(&u).unwrap();
        assert_eq!(json, format!("\"{}\"", u.to_hex()));
        let back: AtomicUnit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, u);
    }

    #[test]
    fn test_json_rejects_bad_checksum() {
        let mut bytes = AtomicUnit::from(7).to_bytes();
        bytes[31] ^= 0x10;
        let json = format!("\"{}\"", crate::core::digest::to_hex(&bytes));
        let err = serde_json::from_str::<AtomicUnit>(&json).unwrap_err();
        assert!(err.to_string().contains("checksum mismatch"));
    }
}
