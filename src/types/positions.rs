use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::types::contracts::RangePositionManager;

/// On-chain position state as read from the position manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub id:                      U256,
    pub operator:                Address,
    pub token0:                  Address,
    pub token1:                  Address,
    pub tick_lower:              i32,
    pub tick_upper:              i32,
    pub liquidity:               u128,
    pub fee_growth_inside0_x128: U256,
    pub fee_growth_inside1_x128: U256,
    pub tokens_owed0:            u128,
    pub tokens_owed1:            u128
}

impl Position {
    pub fn is_open(&self) -> bool {
        self.liquidity > 0
    }

    pub(crate) fn from_positions_return(
        id: U256,
        ret: RangePositionManager::positionsReturn
    ) -> Self {
        Self {
            id,
            operator: ret.operator,
            token0: ret.token0,
            token1: ret.token1,
            tick_lower: ret.tickLower.as_i32(),
            tick_upper: ret.tickUpper.as_i32(),
            liquidity: ret.liquidity,
            fee_growth_inside0_x128: ret.feeGrowthInside0LastX128,
            fee_growth_inside1_x128: ret.feeGrowthInside1LastX128,
            tokens_owed0: ret.tokensOwed0,
            tokens_owed1: ret.tokensOwed1
        }
    }
}

/// One row from the external position index. The index only ever returns
/// open (liquidity > 0) positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedPosition {
    pub id:                U256,
    pub token0:            Address,
    pub token1:            Address,
    pub tick_lower:        i32,
    pub tick_upper:        i32,
    pub deposited_amount0: U256,
    pub deposited_amount1: U256
}

impl IndexedPosition {
    /// Order-insensitive pair match.
    pub fn matches_pair(&self, token_a: Address, token_b: Address) -> bool {
        (self.token0 == token_a && self.token1 == token_b)
            || (self.token0 == token_b && self.token1 == token_a)
    }
}
