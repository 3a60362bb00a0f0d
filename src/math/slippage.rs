//! Slippage bound derivation.
//!
//! Bounds either come verbatim from the caller (who then accepts the full
//! risk) or are derived from a dry-run simulation's expected amounts with a
//! basis-point tolerance applied here.

use alloy_primitives::{U256, U512};

use crate::types::errors::ClmmSdkError;

pub const DEFAULT_SLIPPAGE_BPS: u16 = 20;
pub const MAX_SLIPPAGE_BPS: u16 = 300;
pub const BPS_DENOMINATOR: u16 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundKind {
    /// Minimum acceptable output: `expected * (10000 - tol) / 10000`.
    MinOut,
    /// Maximum acceptable input: `expected * (10000 + tol) / 10000`.
    MaxIn
}

/// Tolerances outside [0, 300] bps are rejected before any remote call is
/// made.
pub fn validate_tolerance_bps(tolerance_bps: u16) -> Result<u16, ClmmSdkError> {
    if tolerance_bps > MAX_SLIPPAGE_BPS {
        return Err(ClmmSdkError::input(format!(
            "slippage tolerance {tolerance_bps} bps exceeds the maximum of {MAX_SLIPPAGE_BPS} bps"
        )));
    }
    Ok(tolerance_bps)
}

/// Derives a settlement bound from a simulated expected amount.
pub fn bound_from_expected(kind: BoundKind, expected: U256, tolerance_bps: u16) -> U256 {
    let numerator: u32 = match kind {
        BoundKind::MinOut => u32::from(BPS_DENOMINATOR).saturating_sub(u32::from(tolerance_bps)),
        BoundKind::MaxIn => u32::from(BPS_DENOMINATOR) + u32::from(tolerance_bps)
    };
    mul_div(expected, U256::from(numerator), U256::from(BPS_DENOMINATOR))
}

/// `floor(value * bps / 10000)`.
pub fn scale_by_bps(value: U256, bps: u16) -> U256 {
    mul_div(value, U256::from(bps), U256::from(BPS_DENOMINATOR))
}

/// `floor(liquidity * percentage_bps / 10000)`, widened internally so the
/// intermediate product cannot overflow.
pub fn liquidity_to_remove(liquidity: u128, percentage_bps: u16) -> u128 {
    let scaled = U256::from(liquidity) * U256::from(percentage_bps) / U256::from(BPS_DENOMINATOR);
    scaled.to::<u128>()
}

/// 512-bit-widened `floor(a * b / denominator)`.
fn mul_div(a: U256, b: U256, denominator: U256) -> U256 {
    let product = U512::from(a) * U512::from(b);
    U256::from(product / U512::from(denominator))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tolerance_range() {
        assert!(validate_tolerance_bps(0).is_ok());
        assert!(validate_tolerance_bps(DEFAULT_SLIPPAGE_BPS).is_ok());
        assert!(validate_tolerance_bps(MAX_SLIPPAGE_BPS).is_ok());
        assert!(validate_tolerance_bps(301).is_err());
        assert!(validate_tolerance_bps(u16::MAX).is_err());
    }

    #[test]
    fn test_min_out_default_tolerance() {
        // expected X at 20 bps: X * 0.9998, floor
        let expected = U256::from(1_000_000u64);
        assert_eq!(
            bound_from_expected(BoundKind::MinOut, expected, DEFAULT_SLIPPAGE_BPS),
            U256::from(999_800u64)
        );

        // a value that does not divide evenly floors
        let expected = U256::from(12_345u64);
        // 12345 * 9980 / 10000 = 12320.31
        assert_eq!(
            bound_from_expected(BoundKind::MinOut, expected, DEFAULT_SLIPPAGE_BPS),
            U256::from(12_320u64)
        );
    }

    #[test]
    fn test_max_in_bound() {
        let expected = U256::from(1_000_000u64);
        assert_eq!(
            bound_from_expected(BoundKind::MaxIn, expected, 300),
            U256::from(1_030_000u64)
        );
    }

    #[test]
    fn test_zero_tolerance_is_identity() {
        let expected = U256::from(777u64);
        assert_eq!(bound_from_expected(BoundKind::MinOut, expected, 0), expected);
        assert_eq!(bound_from_expected(BoundKind::MaxIn, expected, 0), expected);
    }

    #[test]
    fn test_bound_does_not_overflow_on_large_amounts() {
        let expected = U256::MAX;
        let bound = bound_from_expected(BoundKind::MinOut, expected, DEFAULT_SLIPPAGE_BPS);
        assert!(bound < expected);
    }

    #[test]
    fn test_liquidity_to_remove_floors() {
        assert_eq!(liquidity_to_remove(1000, 10_000), 1000);
        assert_eq!(liquidity_to_remove(1000, 0), 0);
        assert_eq!(liquidity_to_remove(1000, 5000), 500);
        // 333 * 1000 / 10000 = 33.3
        assert_eq!(liquidity_to_remove(333, 1000), 33);
        // full removal at max liquidity must not overflow
        assert_eq!(liquidity_to_remove(u128::MAX, 10_000), u128::MAX);
    }

    #[test]
    fn test_scale_by_bps() {
        assert_eq!(scale_by_bps(U256::from(1000u64), 1000), U256::from(100u64));
        assert_eq!(scale_by_bps(U256::from(999u64), 10_000), U256::from(999u64));
        // floor(1001 * 3333 / 10000) = 333
        assert_eq!(scale_by_bps(U256::from(1001u64), 3333), U256::from(333u64));
    }
}
