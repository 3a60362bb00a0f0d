use alloy_primitives::{Address, ChainId, address};

/// Per-chain deployment table for the range AMM contracts.
///
/// Injected into [`crate::ClmmApi`] at construction; nothing in this crate
/// reads deployment addresses from global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClmmChainConstants {
    chain_id:                 u64,
    factory_address:          Address,
    position_manager_address: Address,
    deploy_block:             u64
}

impl ClmmChainConstants {
    pub fn by_chain(chain_id: ChainId) -> Option<Self> {
        match chain_id {
            1 => Some(CLMM_CONSTANTS_MAINNET),
            11155111 => Some(CLMM_CONSTANTS_SEPOLIA_TESTNET),
            _ => None
        }
    }

    #[inline]
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    #[inline]
    pub fn factory_address(&self) -> Address {
        self.factory_address
    }

    #[inline]
    pub fn position_manager_address(&self) -> Address {
        self.position_manager_address
    }

    #[inline]
    pub fn deploy_block(&self) -> u64 {
        self.deploy_block
    }
}

pub const CLMM_CONSTANTS_MAINNET: ClmmChainConstants = ClmmChainConstants {
    chain_id:                 1,
    factory_address:          address!("0x6aA397CAB00a2A40025614207f5B1E64fA52f447"),
    position_manager_address: address!("0x88D0779a1F1658aD618d85Ca80d13b5223d430e9"),
    deploy_block:             21689003
};

pub const CLMM_CONSTANTS_SEPOLIA_TESTNET: ClmmChainConstants = ClmmChainConstants {
    chain_id:                 11155111,
    factory_address:          address!("0xD22045a138eaB2BC99e9cd5Bae49b33b1B1a3612"),
    position_manager_address: address!("0x4Ac393957e5A84875CE10d1b4BbEcBAdCa92a708"),
    deploy_block:             7398241
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_chain() {
        let mainnet = ClmmChainConstants::by_chain(1).unwrap();
        assert_eq!(mainnet, CLMM_CONSTANTS_MAINNET);
        assert_ne!(mainnet.factory_address(), Address::ZERO);
        assert_ne!(mainnet.position_manager_address(), Address::ZERO);

        assert_eq!(
            ClmmChainConstants::by_chain(11155111),
            Some(CLMM_CONSTANTS_SEPOLIA_TESTNET)
        );
        assert_eq!(ClmmChainConstants::by_chain(42), None);
    }
}
