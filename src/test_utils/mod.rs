use alloy_primitives::Address;
use alloy_provider::{Provider, ProviderBuilder};

use crate::{
    ClmmApi,
    index::{HttpPositionIndex, PositionIndexApi},
    types::{TokenPair, errors::ClmmSdkError, positions::IndexedPosition}
};

/// In-memory stand-in for the position index, for tests and examples.
#[derive(Debug, Clone, Default)]
pub struct StaticPositionIndex {
    positions: Vec<(Address, IndexedPosition)>
}

impl StaticPositionIndex {
    pub fn new(positions: Vec<(Address, IndexedPosition)>) -> Self {
        Self { positions }
    }
}

#[async_trait::async_trait]
impl PositionIndexApi for StaticPositionIndex {
    async fn open_positions(
        &self,
        owner: Address,
        pair: Option<TokenPair>
    ) -> Result<Vec<IndexedPosition>, ClmmSdkError> {
        Ok(self
            .positions
            .iter()
            .filter(|(position_owner, position)| {
                *position_owner == owner
                    && pair
                        .map(|p| position.matches_pair(p.token0, p.token1))
                        .unwrap_or(true)
            })
            .map(|(_, position)| *position)
            .collect())
    }
}

pub fn eth_rpc_url() -> String {
    dotenv::dotenv().ok();
    std::env::var("ETH_RPC_URL").unwrap_or_else(|_| panic!("ETH_RPC_URL not found in .env"))
}

pub fn position_index_url() -> String {
    dotenv::dotenv().ok();
    std::env::var("POSITION_INDEX_URL")
        .unwrap_or_else(|_| panic!("POSITION_INDEX_URL not found in .env"))
}

/// Live API wired from `.env`, for examples and manual smoke runs.
pub async fn clmm_api_from_env() -> eyre::Result<ClmmApi<impl Provider, HttpPositionIndex>> {
    let provider = ProviderBuilder::new().connect(&eth_rpc_url()).await?;
    let chain_id = provider.get_chain_id().await?;

    Ok(ClmmApi::new(provider, HttpPositionIndex::new(position_index_url()), chain_id)?)
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{U256, address};

    use super::*;

    #[tokio::test]
    async fn test_static_index_filters_by_owner_and_pair() {
        let owner = address!("0x1111111111111111111111111111111111111111");
        let other = address!("0x2222222222222222222222222222222222222222");
        let usdc = address!("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
        let weth = address!("0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
        let dai = address!("0x6b175474e89094c44da98b954eedeac495271d0f");

        let row = |id: u64, token0: Address, token1: Address| IndexedPosition {
            id: U256::from(id),
            token0,
            token1,
            tick_lower: -60,
            tick_upper: 60,
            deposited_amount0: U256::from(1u8),
            deposited_amount1: U256::from(1u8)
        };

        let index = StaticPositionIndex::new(vec![
            (owner, row(1, usdc, weth)),
            (owner, row(2, dai, weth)),
            (other, row(3, usdc, weth)),
        ]);

        let all = index.open_positions(owner, None).await.unwrap();
        assert_eq!(all.len(), 2);

        let filtered = index
            .open_positions(owner, Some(TokenPair::new(weth, usdc)))
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, U256::from(1u8));

        let none = index
            .open_positions(other, Some(TokenPair::new(dai, weth)))
            .await
            .unwrap();
        assert!(none.is_empty());
    }
}
