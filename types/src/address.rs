//! EVM account address type.

use crate::error::TypeError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A 20-byte EVM address, displayed as `0x`-prefixed lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; 20]);

impl Address {
    pub const ZERO: Self = Self([0u8; 20]);

    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Parse a `0x`-prefixed 40-digit hex address (case-insensitive).
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let digits = s
            .strip_prefix("0x")
            .ok_or_else(|| TypeError::InvalidAddress(format!("missing 0x prefix: {s}")))?;
        if digits.len() != 40 {
            return Err(TypeError::InvalidAddress(format!(
                "expected 40 hex digits, got {}: {s}",
                digits.len()
            )));
        }
        let mut bytes = [0u8; 20];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let hi = hex_nibble(digits.as_bytes()[i * 2])?;
            let lo = hex_nibble(digits.as_bytes()[i * 2 + 1])?;
            *byte = hi << 4 | lo;
        }
        Ok(Self(bytes))
    }

    /// Shortened display form for UI surfaces: `0x1234…abcd`.
    pub fn short(&self) -> String {
        let full = self.to_string();
        format!("{}…{}", &full[..6], &full[full.len() - 4..])
    }
}

fn hex_nibble(c: u8) -> Result<u8, TypeError> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        other => Err(TypeError::InvalidAddress(format!(
            "non-hex character '{}'",
            other as char
        ))),
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl FromStr for Address {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip() {
        let s = "0x2c3cba7e40f0704292bdd9d04d985c9fb20b4ed2";
        let addr = Address::from_hex(s).unwrap();
        assert_eq!(addr.to_string(), s);
    }

    #[test]
    fn mixed_case_parses_to_lowercase() {
        let addr = Address::from_hex("0x2c3Cba7E40f0704292BDd9D04d985c9FB20B4ed2").unwrap();
        assert_eq!(addr.to_string(), "0x2c3cba7e40f0704292bdd9d04d985c9fb20b4ed2");
    }

    #[test]
    fn rejects_malformed() {
        assert!(Address::from_hex("2c3cba7e40f0704292bdd9d04d985c9fb20b4ed2").is_err());
        assert!(Address::from_hex("0x1234").is_err());
        assert!(Address::from_hex("0xzz3cba7e40f0704292bdd9d04d985c9fb20b4ed2").is_err());
    }

    #[test]
    fn short_form() {
        let addr = Address::from_hex("0x2c3cba7e40f0704292bdd9d04d985c9fb20b4ed2").unwrap();
        assert_eq!(addr.short(), "0x2c3c…4ed2");
    }
}
