//! Unsigned 256-bit integer for on-chain quantities.
//!
//! Every on-chain quantity (stake amounts, pool totals, ids) is a `uint256`
//! on the wire. Values are kept as four little-endian u64 limbs and never
//! pass through floating point, so no precision is lost.

use crate::error::TypeError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// An unsigned 256-bit integer, stored as little-endian u64 limbs.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct U256([u64; 4]);

impl U256 {
    pub const ZERO: Self = Self([0, 0, 0, 0]);
    pub const ONE: Self = Self([1, 0, 0, 0]);
    pub const MAX: Self = Self([u64::MAX; 4]);

    pub fn from_u64(v: u64) -> Self {
        Self([v, 0, 0, 0])
    }

    pub fn from_u128(v: u128) -> Self {
        Self([v as u64, (v >> 64) as u64, 0, 0])
    }

    /// Narrow to u64, or `None` if the value does not fit.
    pub fn to_u64(self) -> Option<u64> {
        if self.0[1] == 0 && self.0[2] == 0 && self.0[3] == 0 {
            Some(self.0[0])
        } else {
            None
        }
    }

    /// Narrow to u128, or `None` if the value does not fit.
    pub fn to_u128(self) -> Option<u128> {
        if self.0[2] == 0 && self.0[3] == 0 {
            Some(self.0[0] as u128 | (self.0[1] as u128) << 64)
        } else {
            None
        }
    }

    pub fn is_zero(self) -> bool {
        self.0 == [0, 0, 0, 0]
    }

    /// Interpret a 32-byte big-endian word (the ABI representation).
    pub fn from_be_bytes(bytes: [u8; 32]) -> Self {
        let mut limbs = [0u64; 4];
        for (i, limb) in limbs.iter_mut().enumerate() {
            let start = (3 - i) * 8;
            let mut chunk = [0u8; 8];
            chunk.copy_from_slice(&bytes[start..start + 8]);
            *limb = u64::from_be_bytes(chunk);
        }
        Self(limbs)
    }

    /// Big-endian 32-byte representation (the ABI word).
    pub fn to_be_bytes(self) -> [u8; 32] {
        let mut out = [0u8; 32];
        for (i, limb) in self.0.iter().enumerate() {
            let start = (3 - i) * 8;
            out[start..start + 8].copy_from_slice(&limb.to_be_bytes());
        }
        out
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        let mut out = [0u64; 4];
        let mut carry = 0u64;
        for i in 0..4 {
            let (s, c1) = self.0[i].overflowing_add(rhs.0[i]);
            let (s, c2) = s.overflowing_add(carry);
            out[i] = s;
            carry = c1 as u64 + c2 as u64;
        }
        if carry != 0 {
            None
        } else {
            Some(Self(out))
        }
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        let mut out = [0u64; 4];
        let mut borrow = 0u64;
        for i in 0..4 {
            let (d, b1) = self.0[i].overflowing_sub(rhs.0[i]);
            let (d, b2) = d.overflowing_sub(borrow);
            out[i] = d;
            borrow = b1 as u64 + b2 as u64;
        }
        if borrow != 0 {
            None
        } else {
            Some(Self(out))
        }
    }

    pub fn saturating_sub(self, rhs: Self) -> Self {
        self.checked_sub(rhs).unwrap_or(Self::ZERO)
    }

    /// Multiply by a small factor, `None` on overflow.
    pub fn checked_mul_u64(self, rhs: u64) -> Option<Self> {
        let mut out = [0u64; 4];
        let mut carry: u128 = 0;
        for i in 0..4 {
            let product = self.0[i] as u128 * rhs as u128 + carry;
            out[i] = product as u64;
            carry = product >> 64;
        }
        if carry != 0 {
            None
        } else {
            Some(Self(out))
        }
    }

    /// Divide by a small divisor, returning `(quotient, remainder)`.
    ///
    /// # Panics
    /// Panics if `divisor` is zero.
    pub fn div_rem_u64(self, divisor: u64) -> (Self, u64) {
        assert!(divisor != 0, "division by zero");
        let mut out = [0u64; 4];
        let mut rem: u128 = 0;
        for i in (0..4).rev() {
            let cur = (rem << 64) | self.0[i] as u128;
            out[i] = (cur / divisor as u128) as u64;
            rem = cur % divisor as u128;
        }
        (Self(out), rem as u64)
    }

    /// Parse a base-10 string.
    pub fn from_dec_str(s: &str) -> Result<Self, TypeError> {
        if s.is_empty() {
            return Err(TypeError::InvalidUint("empty string".into()));
        }
        let mut acc = Self::ZERO;
        for c in s.chars() {
            let digit = c
                .to_digit(10)
                .ok_or_else(|| TypeError::InvalidUint(format!("non-digit character '{c}'")))?;
            acc = acc
                .checked_mul_u64(10)
                .and_then(|v| v.checked_add(Self::from_u64(digit as u64)))
                .ok_or_else(|| TypeError::InvalidUint(format!("value too large: {s}")))?;
        }
        Ok(acc)
    }

    /// Parse a `0x`-prefixed hex quantity as returned by JSON-RPC.
    pub fn from_hex_str(s: &str) -> Result<Self, TypeError> {
        let digits = s
            .strip_prefix("0x")
            .ok_or_else(|| TypeError::InvalidUint(format!("missing 0x prefix: {s}")))?;
        if digits.is_empty() {
            return Err(TypeError::InvalidUint("empty hex quantity".into()));
        }
        if digits.len() > 64 {
            return Err(TypeError::InvalidUint(format!("hex quantity too wide: {s}")));
        }
        let mut bytes = [0u8; 32];
        // Right-align the nibbles so short quantities like 0x1 parse correctly.
        let mut nibble_index = 64 - digits.len();
        for c in digits.chars() {
            let nibble = c
                .to_digit(16)
                .ok_or_else(|| TypeError::InvalidUint(format!("non-hex character '{c}'")))?
                as u8;
            let byte = nibble_index / 2;
            if nibble_index % 2 == 0 {
                bytes[byte] |= nibble << 4;
            } else {
                bytes[byte] |= nibble;
            }
            nibble_index += 1;
        }
        Ok(Self::from_be_bytes(bytes))
    }
}

impl PartialOrd for U256 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for U256 {
    fn cmp(&self, other: &Self) -> Ordering {
        // Limbs are little-endian; compare from the most significant down.
        for i in (0..4).rev() {
            match self.0[i].cmp(&other.0[i]) {
                Ordering::Equal => continue,
                non_eq => return non_eq,
            }
        }
        Ordering::Equal
    }
}

impl fmt::Display for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        let mut digits = Vec::new();
        let mut n = *self;
        while !n.is_zero() {
            let (q, r) = n.div_rem_u64(10);
            digits.push(b'0' + r as u8);
            n = q;
        }
        digits.reverse();
        // Digits are built from ASCII, always valid UTF-8.
        f.write_str(std::str::from_utf8(&digits).map_err(|_| fmt::Error)?)
    }
}

impl fmt::Debug for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U256({self})")
    }
}

impl FromStr for U256 {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_dec_str(s)
    }
}

impl From<u64> for U256 {
    fn from(v: u64) -> Self {
        Self::from_u64(v)
    }
}

impl From<u128> for U256 {
    fn from(v: u128) -> Self {
        Self::from_u128(v)
    }
}

// Serialized as a decimal string: uint256 does not fit in any JSON number.
impl Serialize for U256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for U256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_dec_str(&s).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dec_str_roundtrip() {
        let cases = ["0", "1", "1000000000000000000", "340282366920938463463374607431768211456"];
        for s in cases {
            assert_eq!(U256::from_dec_str(s).unwrap().to_string(), s);
        }
    }

    #[test]
    fn rejects_bad_dec_strings() {
        assert!(U256::from_dec_str("").is_err());
        assert!(U256::from_dec_str("12a").is_err());
        // 2^256 overflows by one.
        assert!(U256::from_dec_str(
            "115792089237316195423570985008687907853269984665640564039457584007913129639936"
        )
        .is_err());
    }

    #[test]
    fn max_value_parses() {
        let max = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
        assert_eq!(U256::from_dec_str(max).unwrap(), U256::MAX);
    }

    #[test]
    fn be_bytes_roundtrip() {
        let v = U256::from_u128(0x0123_4567_89ab_cdef_fedc_ba98_7654_3210);
        assert_eq!(U256::from_be_bytes(v.to_be_bytes()), v);

        let mut one = [0u8; 32];
        one[31] = 1;
        assert_eq!(U256::from_be_bytes(one), U256::ONE);
    }

    #[test]
    fn hex_quantities() {
        assert_eq!(U256::from_hex_str("0x0").unwrap(), U256::ZERO);
        assert_eq!(U256::from_hex_str("0x1").unwrap(), U256::ONE);
        assert_eq!(U256::from_hex_str("0xff").unwrap(), U256::from_u64(255));
        assert_eq!(
            U256::from_hex_str("0xde0b6b3a7640000").unwrap(),
            U256::from_u128(1_000_000_000_000_000_000)
        );
        assert!(U256::from_hex_str("ff").is_err());
        assert!(U256::from_hex_str("0x").is_err());
    }

    #[test]
    fn checked_arithmetic() {
        let a = U256::from_u64(7);
        let b = U256::from_u64(5);
        assert_eq!(a.checked_add(b), Some(U256::from_u64(12)));
        assert_eq!(a.checked_sub(b), Some(U256::from_u64(2)));
        assert_eq!(b.checked_sub(a), None);
        assert_eq!(b.saturating_sub(a), U256::ZERO);
        assert_eq!(U256::MAX.checked_add(U256::ONE), None);
        assert_eq!(U256::MAX.checked_mul_u64(2), None);
    }

    #[test]
    fn carry_propagates_across_limbs() {
        let v = U256::from_u128(u128::MAX);
        let sum = v.checked_add(U256::ONE).unwrap();
        assert_eq!(sum.to_u128(), None);
        assert_eq!(sum.checked_sub(U256::ONE).unwrap(), v);
    }

    #[test]
    fn div_rem_small() {
        let v = U256::from_dec_str("1000000000000000000000000000001").unwrap();
        let (q, r) = v.div_rem_u64(10);
        assert_eq!(q.to_string(), "100000000000000000000000000000");
        assert_eq!(r, 1);
    }

    #[test]
    fn ordering_uses_most_significant_limbs() {
        let small = U256::from_u64(u64::MAX);
        let big = U256::from_u128(1u128 << 64);
        assert!(small < big);
        assert!(big > small);
        assert_eq!(big.cmp(&big), Ordering::Equal);
    }

    #[test]
    fn serde_as_decimal_string() {
        let v = U256::from_u128(12345678901234567890);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "\"12345678901234567890\"");
        let back: U256 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }
}
