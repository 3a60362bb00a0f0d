//! Fixed-point token amounts.
//!
//! Decimal-string amounts from callers are converted once, at the edge, into
//! raw integer units tagged with their decimal places. All arithmetic past
//! this point is integer-only.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::types::errors::ClmmSdkError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenAmount {
    raw:      U256,
    decimals: u8
}

impl TokenAmount {
    pub fn new(raw: U256, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    pub fn zero(decimals: u8) -> Self {
        Self { raw: U256::ZERO, decimals }
    }

    #[inline]
    pub fn raw(&self) -> U256 {
        self.raw
    }

    #[inline]
    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    /// Parses a non-negative decimal string ("12", "0.5", "1.000001") into
    /// raw units. Fractional digits beyond the token's decimal places are
    /// rejected rather than silently truncated.
    pub fn from_decimal_str(value: &str, decimals: u8) -> Result<Self, ClmmSdkError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ClmmSdkError::input("empty amount"));
        }
        if value.starts_with('-') {
            return Err(ClmmSdkError::input(format!("negative amount: {value}")));
        }

        let (int_part, frac_part) = match value.split_once('.') {
            Some((i, f)) => (i, f),
            None => (value, "")
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(ClmmSdkError::input(format!("malformed amount: {value}")));
        }
        if !int_part.chars().all(|c| c.is_ascii_digit())
            || !frac_part.chars().all(|c| c.is_ascii_digit())
        {
            return Err(ClmmSdkError::input(format!("malformed amount: {value}")));
        }
        if frac_part.len() > decimals as usize {
            return Err(ClmmSdkError::input(format!(
                "amount {value} has more than {decimals} fractional digits"
            )));
        }

        let int_units = if int_part.is_empty() {
            U256::ZERO
        } else {
            U256::from_str_radix(int_part, 10)
                .map_err(|_| ClmmSdkError::input(format!("amount out of range: {value}")))?
        };

        let frac_units = if frac_part.is_empty() {
            U256::ZERO
        } else {
            let padded = pow10(decimals - frac_part.len() as u8);
            U256::from_str_radix(frac_part, 10)
                .map_err(|_| ClmmSdkError::input(format!("amount out of range: {value}")))?
                .checked_mul(padded)
                .ok_or_else(|| ClmmSdkError::input(format!("amount out of range: {value}")))?
        };

        let raw = int_units
            .checked_mul(pow10(decimals))
            .and_then(|scaled| scaled.checked_add(frac_units))
            .ok_or_else(|| ClmmSdkError::input(format!("amount out of range: {value}")))?;

        Ok(Self { raw, decimals })
    }

    /// Formats the raw units back to a decimal string, trimming trailing
    /// fractional zeros.
    pub fn to_decimal_string(&self) -> String {
        let scale = pow10(self.decimals);
        let int_part = self.raw / scale;
        let frac_part = self.raw % scale;

        if frac_part.is_zero() {
            return int_part.to_string();
        }

        let digits = frac_part.to_string();
        let mut frac = "0".repeat(self.decimals as usize - digits.len());
        frac.push_str(&digits);
        format!("{int_part}.{}", frac.trim_end_matches('0'))
    }
}

fn pow10(exp: u8) -> U256 {
    U256::from(10u8).pow(U256::from(exp))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whole_and_fractional() {
        let amt = TokenAmount::from_decimal_str("1.5", 6).unwrap();
        assert_eq!(amt.raw(), U256::from(1_500_000u64));

        let amt = TokenAmount::from_decimal_str("0.000001", 6).unwrap();
        assert_eq!(amt.raw(), U256::from(1u8));

        let amt = TokenAmount::from_decimal_str("100", 0).unwrap();
        assert_eq!(amt.raw(), U256::from(100u8));

        let amt = TokenAmount::from_decimal_str(".25", 2).unwrap();
        assert_eq!(amt.raw(), U256::from(25u8));

        let amt = TokenAmount::from_decimal_str("2.", 18).unwrap();
        assert_eq!(amt.raw(), U256::from(2u8) * U256::from(10u8).pow(U256::from(18u8)));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(TokenAmount::from_decimal_str("", 6).is_err());
        assert!(TokenAmount::from_decimal_str("-1", 6).is_err());
        assert!(TokenAmount::from_decimal_str("1.2.3", 6).is_err());
        assert!(TokenAmount::from_decimal_str("1,5", 6).is_err());
        assert!(TokenAmount::from_decimal_str(".", 6).is_err());
        assert!(TokenAmount::from_decimal_str("0x10", 6).is_err());
    }

    #[test]
    fn test_parse_rejects_excess_precision() {
        assert!(TokenAmount::from_decimal_str("1.1234567", 6).is_err());
        assert!(TokenAmount::from_decimal_str("0.1", 0).is_err());
    }

    #[test]
    fn test_decimal_string_round_trip() {
        for (s, decimals) in [("1.5", 6), ("0.000001", 6), ("42", 18), ("7.25", 8)] {
            let amt = TokenAmount::from_decimal_str(s, decimals).unwrap();
            assert_eq!(amt.to_decimal_string(), s);
        }
    }

    #[test]
    fn test_display_pads_leading_fraction_zeros() {
        let amt = TokenAmount::new(U256::from(1_050u64), 6);
        assert_eq!(amt.to_decimal_string(), "0.00105");
    }
}
