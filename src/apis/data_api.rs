use alloy_primitives::{Address, U256};
use alloy_provider::Provider;

use super::utils::view_call;
use crate::types::{
    PoolState,
    common::sort_tokens,
    contracts::{ERC20, RangeFactory, RangePool},
    errors::{ClmmSdkError, ReadSite}
};

/// Read-only pool and token lookups, implemented for any alloy provider.
#[async_trait::async_trait]
pub trait ClmmDataApi: Provider + Sized {
    /// Resolves the pool for an unordered token pair through the factory.
    /// The factory's zero-address sentinel becomes a typed error here.
    async fn pool_address(
        &self,
        factory: Address,
        token_a: Address,
        token_b: Address
    ) -> Result<Address, ClmmSdkError> {
        let (token0, token1) = sort_tokens(token_a, token_b);

        let pool = view_call(
            self,
            factory,
            RangeFactory::getPoolCall { tokenA: token0, tokenB: token1 },
            ReadSite::PoolLookup
        )
        .await?;

        if pool == Address::ZERO {
            return Err(ClmmSdkError::PoolNotFound { token0, token1 });
        }

        Ok(pool)
    }

    /// Reads the pool fields the mutation flows depend on. The four reads
    /// are independent and issued concurrently.
    async fn pool_state(&self, pool: Address) -> Result<PoolState, ClmmSdkError> {
        let (slot0, tick_spacing, token0, token1) = tokio::try_join!(
            view_call(self, pool, RangePool::slot0Call {}, ReadSite::PoolState),
            view_call(self, pool, RangePool::tickSpacingCall {}, ReadSite::PoolState),
            view_call(self, pool, RangePool::token0Call {}, ReadSite::PoolState),
            view_call(self, pool, RangePool::token1Call {}, ReadSite::PoolState),
        )?;

        Ok(PoolState {
            pool,
            token0,
            token1,
            tick_spacing: tick_spacing.as_i32(),
            sqrt_price_x96: slot0.sqrtPriceX96,
            current_tick: slot0.tick.as_i32()
        })
    }

    async fn token_decimals(&self, token: Address) -> Result<u8, ClmmSdkError> {
        view_call(self, token, ERC20::decimalsCall {}, ReadSite::TokenMetadata).await
    }

    /// Decimal places of a canonical pair, fetched concurrently.
    async fn pair_decimals(
        &self,
        token0: Address,
        token1: Address
    ) -> Result<(u8, u8), ClmmSdkError> {
        tokio::try_join!(self.token_decimals(token0), self.token_decimals(token1))
    }

    async fn token_balance(&self, token: Address, owner: Address) -> Result<U256, ClmmSdkError> {
        view_call(self, token, ERC20::balanceOfCall { owner }, ReadSite::TokenMetadata).await
    }

    async fn token_allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address
    ) -> Result<U256, ClmmSdkError> {
        view_call(self, token, ERC20::allowanceCall { owner, spender }, ReadSite::TokenMetadata)
            .await
    }
}

impl<P: Provider> ClmmDataApi for P {}
