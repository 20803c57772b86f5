//! Stake amounts in the native token's smallest unit.
//!
//! Amounts stay in base units (the token's smallest indivisible unit) end to
//! end. Display conversion to a decimal token string and back must recover
//! the exact original integer.

use crate::error::TypeError;
use crate::uint::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Base units per whole token (18 decimals).
const UNITS_PER_TOKEN: u64 = 1_000_000_000_000_000_000;
const DECIMALS: usize = 18;

/// A stake or pool amount, in base units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StakeAmount(U256);

impl StakeAmount {
    pub const ZERO: Self = Self(U256::ZERO);

    pub fn new(raw: U256) -> Self {
        Self(raw)
    }

    pub fn from_base_units(raw: u128) -> Self {
        Self(U256::from_u128(raw))
    }

    /// Whole tokens, scaled to base units.
    pub fn from_tokens(tokens: u64) -> Self {
        // u64 tokens × 10^18 always fits in 128 bits.
        Self(U256::from_u128(tokens as u128 * UNITS_PER_TOKEN as u128))
    }

    pub fn raw(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Render as a decimal token string, trailing fraction zeros trimmed.
    pub fn to_decimal_string(&self) -> String {
        let (whole, frac) = self.0.div_rem_u64(UNITS_PER_TOKEN);
        if frac == 0 {
            whole.to_string()
        } else {
            let frac = format!("{frac:018}");
            format!("{}.{}", whole, frac.trim_end_matches('0'))
        }
    }

    /// Parse a decimal token string back into base units.
    ///
    /// Rejects more than 18 fraction digits: such a value cannot be
    /// represented without rounding.
    pub fn from_decimal_str(s: &str) -> Result<Self, TypeError> {
        let s = s.trim();
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(TypeError::InvalidAmount("empty amount".into()));
        }
        if frac.len() > DECIMALS {
            return Err(TypeError::InvalidAmount(format!(
                "more than {DECIMALS} fraction digits: {s}"
            )));
        }

        let whole = if whole.is_empty() {
            U256::ZERO
        } else {
            U256::from_dec_str(whole)?
        };
        let scaled = whole
            .checked_mul_u64(UNITS_PER_TOKEN)
            .ok_or_else(|| TypeError::InvalidAmount(format!("amount too large: {s}")))?;

        let frac_units = if frac.is_empty() {
            0u64
        } else {
            // u64::FromStr tolerates a leading `+`; the fraction must be
            // digits only.
            if !frac.bytes().all(|b| b.is_ascii_digit()) {
                return Err(TypeError::InvalidAmount(format!("non-digit fraction: {s}")));
            }
            let digits: u64 = frac
                .parse()
                .map_err(|_| TypeError::InvalidAmount(format!("non-digit fraction: {s}")))?;
            digits * 10u64.pow((DECIMALS - frac.len()) as u32)
        };

        scaled
            .checked_add(U256::from_u64(frac_units))
            .map(Self)
            .ok_or_else(|| TypeError::InvalidAmount(format!("amount too large: {s}")))
    }
}

impl fmt::Display for StakeAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ROSE", self.to_decimal_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_tokens_display_without_fraction() {
        assert_eq!(StakeAmount::from_tokens(5).to_decimal_string(), "5");
        assert_eq!(StakeAmount::ZERO.to_decimal_string(), "0");
    }

    #[test]
    fn fraction_trims_trailing_zeros() {
        let half = StakeAmount::from_base_units(500_000_000_000_000_000);
        assert_eq!(half.to_decimal_string(), "0.5");

        let one_unit = StakeAmount::from_base_units(1);
        assert_eq!(one_unit.to_decimal_string(), "0.000000000000000001");
    }

    #[test]
    fn parse_accepts_partial_forms() {
        assert_eq!(
            StakeAmount::from_decimal_str("1.5").unwrap(),
            StakeAmount::from_base_units(1_500_000_000_000_000_000)
        );
        assert_eq!(
            StakeAmount::from_decimal_str(".5").unwrap(),
            StakeAmount::from_base_units(500_000_000_000_000_000)
        );
        assert_eq!(
            StakeAmount::from_decimal_str("2").unwrap(),
            StakeAmount::from_tokens(2)
        );
    }

    #[test]
    fn parse_rejects_excess_precision() {
        assert!(StakeAmount::from_decimal_str("0.0000000000000000001").is_err());
        assert!(StakeAmount::from_decimal_str("").is_err());
        assert!(StakeAmount::from_decimal_str("1.x").is_err());
    }

    #[test]
    fn parse_rejects_signed_fraction_digits() {
        assert!(StakeAmount::from_decimal_str("1.+5").is_err());
        assert!(StakeAmount::from_decimal_str("1.-5").is_err());
        assert!(StakeAmount::from_decimal_str("+1.5").is_err());
    }

    #[test]
    fn display_parse_roundtrip_is_exact() {
        for raw in [1u128, 999, 1_000_000_000_000_000_001, 123_456_789_000_000_000_000] {
            let amount = StakeAmount::from_base_units(raw);
            let rendered = amount.to_decimal_string();
            assert_eq!(StakeAmount::from_decimal_str(&rendered).unwrap(), amount);
        }
    }
}
