//! Decimal price <-> tick conversion.
//!
//! A tick `t` prices the pool at `1.0001^t` in raw token units (token1 per
//! token0). Human-readable prices are scaled by the tokens' decimal places
//! before taking the log.

use crate::types::errors::ClmmSdkError;

/// Protocol tick range bounds.
pub const MIN_TICK: i32 = -887272;
pub const MAX_TICK: i32 = 887272;

const TICK_BASE: f64 = 1.0001;
/// Drift guard: log-derived tick indices this close to an integer are treated
/// as exactly that integer, so boundary prices do not fall to a neighbor.
const TICK_EPSILON: f64 = 1e-6;

/// Lowest tick usable with the given spacing (snapped inward).
pub fn min_usable_tick(tick_spacing: i32) -> i32 {
    ceil_to_spacing(MIN_TICK, tick_spacing)
}

/// Highest tick usable with the given spacing (snapped inward).
pub fn max_usable_tick(tick_spacing: i32) -> i32 {
    floor_to_spacing(MAX_TICK, tick_spacing)
}

/// Converts a decimal price (token1 per token0) to a tick aligned to
/// `tick_spacing`. `round_down` selects the snap direction: down for a lower
/// bound, up for an upper bound. The result is clamped to the usable range.
pub fn price_to_tick(
    price: f64,
    decimals0: u8,
    decimals1: u8,
    tick_spacing: i32,
    round_down: bool
) -> Result<i32, ClmmSdkError> {
    if tick_spacing <= 0 {
        return Err(ClmmSdkError::input(format!("tick spacing must be positive: {tick_spacing}")));
    }
    if !price.is_finite() || price <= 0.0 {
        return Err(ClmmSdkError::input(format!("price must be a positive number: {price}")));
    }

    let scaled = price * 10f64.powi(decimals1 as i32 - decimals0 as i32);
    let raw_tick = scaled.ln() / TICK_BASE.ln();

    let corrected =
        if (raw_tick - raw_tick.round()).abs() < TICK_EPSILON { raw_tick.round() } else { raw_tick };

    let tick = if round_down {
        floor_to_spacing(clamp_tick(corrected.floor()), tick_spacing)
    } else {
        ceil_to_spacing(clamp_tick(corrected.ceil()), tick_spacing)
    };

    Ok(tick.clamp(min_usable_tick(tick_spacing), max_usable_tick(tick_spacing)))
}

/// Inverse of [`price_to_tick`]: the decimal price at a tick.
pub fn tick_to_price(tick: i32, decimals0: u8, decimals1: u8) -> f64 {
    TICK_BASE.powi(tick) * 10f64.powi(decimals0 as i32 - decimals1 as i32)
}

/// Widens a collapsed (lower == upper) range by exactly one spacing unit on
/// the side that keeps the range on the correct side of the market: the lower
/// bound drops when the collapsed tick is at or below the current tick, the
/// upper bound rises otherwise.
pub fn widen_collapsed_range(
    tick_lower: i32,
    tick_upper: i32,
    current_tick: i32,
    tick_spacing: i32
) -> (i32, i32) {
    if tick_lower != tick_upper {
        return (tick_lower, tick_upper);
    }

    if tick_lower <= current_tick {
        (tick_lower - tick_spacing, tick_upper)
    } else {
        (tick_lower, tick_upper + tick_spacing)
    }
}

fn clamp_tick(tick: f64) -> i32 {
    tick.clamp(MIN_TICK as f64, MAX_TICK as f64) as i32
}

fn floor_to_spacing(tick: i32, tick_spacing: i32) -> i32 {
    tick.div_euclid(tick_spacing) * tick_spacing
}

fn ceil_to_spacing(tick: i32, tick_spacing: i32) -> i32 {
    -((-tick).div_euclid(tick_spacing)) * tick_spacing
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_price_is_tick_zero() {
        assert_eq!(price_to_tick(1.0, 18, 18, 60, true).unwrap(), 0);
        assert_eq!(price_to_tick(1.0, 18, 18, 60, false).unwrap(), 0);
    }

    #[test]
    fn test_round_direction_brackets_price() {
        let price = tick_to_price(1234, 18, 18) * 1.00003;

        let down = price_to_tick(price, 18, 18, 10, true).unwrap();
        let up = price_to_tick(price, 18, 18, 10, false).unwrap();

        assert_eq!(down % 10, 0);
        assert_eq!(up % 10, 0);
        assert!(tick_to_price(down, 18, 18) <= price);
        assert!(tick_to_price(up, 18, 18) >= price);
        assert_eq!(down, 1230);
        assert_eq!(up, 1240);
    }

    #[test]
    fn test_exact_boundary_price_does_not_drift() {
        // 1.0001^600 is representable closely enough that both directions
        // must land on 600 itself, not a neighboring multiple.
        let price = tick_to_price(600, 6, 6);
        assert_eq!(price_to_tick(price, 6, 6, 60, true).unwrap(), 600);
        assert_eq!(price_to_tick(price, 6, 6, 60, false).unwrap(), 600);
    }

    #[test]
    fn test_decimal_scaling_inverts() {
        // WETH (18) / USDC (6) style skew.
        let tick = price_to_tick(1850.0, 18, 6, 10, true).unwrap();
        assert!(tick < 0);
        assert_eq!(tick % 10, 0);

        let price = tick_to_price(tick, 18, 6);
        assert!(price <= 1850.0);
        assert!(price > 1850.0 * 0.998);
    }

    #[test]
    fn test_clamps_to_usable_range() {
        assert_eq!(price_to_tick(1e300, 18, 18, 60, false).unwrap(), max_usable_tick(60));
        assert_eq!(price_to_tick(1e-300, 18, 18, 60, true).unwrap(), min_usable_tick(60));

        assert_eq!(min_usable_tick(60), -887220);
        assert_eq!(max_usable_tick(60), 887220);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        assert!(price_to_tick(0.0, 18, 18, 60, true).is_err());
        assert!(price_to_tick(-1.5, 18, 18, 60, true).is_err());
        assert!(price_to_tick(f64::NAN, 18, 18, 60, true).is_err());
        assert!(price_to_tick(1.0, 18, 18, 0, true).is_err());
    }

    #[test]
    fn test_widen_collapsed_range() {
        // collapsed at or below the market: lower bound gives way
        assert_eq!(widen_collapsed_range(100, 100, 150, 10), (90, 100));
        assert_eq!(widen_collapsed_range(100, 100, 100, 10), (90, 100));
        // collapsed above the market: upper bound gives way
        assert_eq!(widen_collapsed_range(100, 100, 50, 10), (100, 110));
        // distinct bounds pass through untouched
        assert_eq!(widen_collapsed_range(100, 200, 150, 10), (100, 200));
    }

    #[test]
    fn test_negative_tick_snapping() {
        // floor/ceil must behave euclidean-style below zero
        let price = tick_to_price(-105, 18, 18) * 1.00001;
        assert_eq!(price_to_tick(price, 18, 18, 10, true).unwrap(), -110);
        assert_eq!(price_to_tick(price, 18, 18, 10, false).unwrap(), -100);
    }
}
