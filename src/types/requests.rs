use std::fmt;

use alloy_primitives::{Address, TxHash, U256};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    Mint,
    Increase,
    Decrease,
    Collect
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Mint => write!(f, "mint"),
            OperationKind::Increase => write!(f, "increaseLiquidity"),
            OperationKind::Decrease => write!(f, "decreaseLiquidity"),
            OperationKind::Collect => write!(f, "collect")
        }
    }
}

/// One side of a mint's price range. Absent bounds default to the protocol's
/// min/max tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PriceBound {
    /// Decimal price of token1 per token0, e.g. "1850.5".
    Absolute(String),
    /// Signed offset from the current pool price in basis points:
    /// -500 is 5% below, 500 is 5% above.
    PercentFromCurrent(i32)
}

/// Open a new position. Amounts are decimal strings in the caller's
/// (token_a, token_b) order; the flow remaps them onto the pool's canonical
/// ordering. Missing minimums are derived from a dry-run simulation with a
/// fixed 20 bps tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MintRequest {
    pub token_a:      Address,
    pub token_b:      Address,
    pub amount_a:     String,
    pub amount_b:     String,
    pub lower_price:  Option<PriceBound>,
    pub upper_price:  Option<PriceBound>,
    pub amount_a_min: Option<String>,
    pub amount_b_min: Option<String>
}

/// Add liquidity to an existing position. Without an explicit id, the
/// position is resolved from the index by (owner, token pair).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncreaseRequest {
    pub position_id:  Option<U256>,
    pub token_a:      Address,
    pub token_b:      Address,
    pub amount_a:     String,
    pub amount_b:     String,
    pub amount_a_min: Option<String>,
    pub amount_b_min: Option<String>,
    /// Tolerance for simulation-derived minimums, default 20 bps, max 300.
    pub slippage_bps: Option<u16>
}

/// Remove a percentage of a position's liquidity. At 10000 bps the batch
/// also collects all fees and burns the position atomically. The tolerance
/// for derived minimums is fixed at 20 bps and not caller-configurable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecreaseRequest {
    pub position_id:    Option<U256>,
    pub token_a:        Address,
    pub token_b:        Address,
    pub percentage_bps: u16,
    pub amount_a_min:   Option<String>,
    pub amount_b_min:   Option<String>
}

/// Collect accrued fees up to per-side caps. Without explicit caps, a 100%
/// dry-run collect discovers the owed amounts and `collect_percentage_bps`
/// (default 10000) scales them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectRequest {
    pub position_id:            Option<U256>,
    pub token_a:                Address,
    pub token_b:                Address,
    pub collect_percentage_bps: Option<u16>,
    pub max_a:                  Option<String>,
    pub max_b:                  Option<String>
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintReceipt {
    pub tx_hash:     TxHash,
    pub position_id: U256,
    pub liquidity:   u128,
    pub amount0:     U256,
    pub amount1:     U256
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityChangeReceipt {
    pub tx_hash:         TxHash,
    pub position_id:     U256,
    pub liquidity_delta: u128,
    pub amount0:         U256,
    pub amount1:         U256,
    /// Set when the batch ended with a full exit (collect + burn).
    pub burned:          bool
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectReceipt {
    pub tx_hash:     TxHash,
    pub position_id: U256,
    pub amount0:     U256,
    pub amount1:     U256
}
