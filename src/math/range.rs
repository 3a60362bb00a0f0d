//! Range classification against the current pool price, and the per-side
//! amount requirements that follow from it.

use alloy_primitives::U256;

use crate::types::{
    errors::{AmountField, ClmmSdkError, TokenSide},
    requests::OperationKind
};

/// Where a tick range sits relative to the current tick, which determines
/// which token(s) the position economically requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeKind {
    /// The current tick is inside the range; both tokens are required.
    TwoSided,
    /// The whole range is above the current tick; only token0 is required.
    SingleSidedBelow,
    /// The whole range is below the current tick; only token1 is required.
    SingleSidedAbove
}

pub fn classify(current_tick: i32, tick_lower: i32, tick_upper: i32) -> RangeKind {
    if current_tick < tick_lower {
        RangeKind::SingleSidedBelow
    } else if current_tick > tick_upper {
        RangeKind::SingleSidedAbove
    } else {
        RangeKind::TwoSided
    }
}

/// Enforces the nonzero-amount rules for a classified range.
///
/// Two-sided ranges need both amounts; single-sided ranges only the required
/// side's. Minimums are held to the same rule for increase and decrease, but
/// deliberately not for mint, matching the relaxed mint validation in the
/// position manager tooling this models.
pub fn validate_amounts(
    amounts: (U256, U256),
    minimums: (U256, U256),
    kind: RangeKind,
    operation: OperationKind
) -> Result<(), ClmmSdkError> {
    let check_minimums = matches!(operation, OperationKind::Increase | OperationKind::Decrease);

    let require = |value: U256, side: TokenSide, field: AmountField| {
        if value.is_zero() {
            Err(ClmmSdkError::InsufficientAmount { side, field })
        } else {
            Ok(())
        }
    };

    match kind {
        RangeKind::TwoSided => {
            require(amounts.0, TokenSide::Token0, AmountField::Amount)?;
            require(amounts.1, TokenSide::Token1, AmountField::Amount)?;
            if check_minimums {
                require(minimums.0, TokenSide::Token0, AmountField::Minimum)?;
                require(minimums.1, TokenSide::Token1, AmountField::Minimum)?;
            }
        }
        RangeKind::SingleSidedBelow => {
            require(amounts.0, TokenSide::Token0, AmountField::Amount)?;
            if check_minimums {
                require(minimums.0, TokenSide::Token0, AmountField::Minimum)?;
            }
        }
        RangeKind::SingleSidedAbove => {
            require(amounts.1, TokenSide::Token1, AmountField::Amount)?;
            if check_minimums {
                require(minimums.1, TokenSide::Token1, AmountField::Minimum)?;
            }
        }
    }

    Ok(())
}
