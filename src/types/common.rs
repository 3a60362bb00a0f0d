use alloy_primitives::{Address, U160};
use serde::{Deserialize, Serialize};

/// A canonically ordered token pair (`token0 < token1` by address).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TokenPair {
    pub token0: Address,
    pub token1: Address
}

impl TokenPair {
    /// Builds the pair from tokens in either order.
    pub fn new(token_a: Address, token_b: Address) -> Self {
        let (token0, token1) = sort_tokens(token_a, token_b);
        Self { token0, token1 }
    }

    /// Order-insensitive match against another pair of addresses.
    pub fn matches(&self, token_a: Address, token_b: Address) -> bool {
        let (token0, token1) = sort_tokens(token_a, token_b);
        self.token0 == token0 && self.token1 == token1
    }
}

pub(crate) fn sort_tokens(token0: Address, token1: Address) -> (Address, Address) {
    if token0 < token1 { (token0, token1) } else { (token1, token0) }
}

/// Snapshot of the pool fields the mutation flows depend on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PoolState {
    pub pool:           Address,
    pub token0:         Address,
    pub token1:         Address,
    pub tick_spacing:   i32,
    pub sqrt_price_x96: U160,
    pub current_tick:   i32
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;

    use super::*;

    #[test]
    fn test_pair_is_canonical_either_way() {
        let a = address!("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
        let b = address!("0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");

        assert_eq!(TokenPair::new(a, b), TokenPair::new(b, a));
        assert_eq!(TokenPair::new(a, b).token0, a);
    }

    #[test]
    fn test_pair_matches_unordered() {
        let a = address!("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
        let b = address!("0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
        let c = address!("0x6b175474e89094c44da98b954eedeac495271d0f");

        let pair = TokenPair::new(a, b);
        assert!(pair.matches(b, a));
        assert!(!pair.matches(a, c));
    }
}
