//! Transaction hash type.

use crate::error::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 32-byte transaction hash, displayed as `0x`-prefixed hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxHash([u8; 32]);

impl TxHash {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Parse a `0x`-prefixed 64-digit hex hash as returned by JSON-RPC.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let digits = s
            .strip_prefix("0x")
            .ok_or_else(|| TypeError::InvalidHash(format!("missing 0x prefix: {s}")))?;
        if digits.len() != 64 {
            return Err(TypeError::InvalidHash(format!(
                "expected 64 hex digits, got {}: {s}",
                digits.len()
            )));
        }
        let mut bytes = [0u8; 32];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16)
                .map_err(|_| TypeError::InvalidHash(format!("non-hex characters: {s}")))?;
        }
        Ok(Self(bytes))
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let full = self.to_string();
        write!(f, "TxHash({}…)", &full[..10])
    }
}

impl FromStr for TxHash {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip() {
        let s = "0x00ff00ff00ff00ff00ff00ff00ff00ff00ff00ff00ff00ff00ff00ff00ff00ff";
        let hash = TxHash::from_hex(s).unwrap();
        assert_eq!(hash.to_string(), s);
        assert!(!hash.is_zero());
    }

    #[test]
    fn rejects_malformed() {
        assert!(TxHash::from_hex("0x1234").is_err());
        assert!(TxHash::from_hex("00ff").is_err());
    }
}
