//! Client for the external position-indexing service.
//!
//! The index is the only non-ledger remote this SDK talks to: it answers
//! "which open positions does this owner have on this pair" so callers do not
//! have to pass explicit position ids.

use alloy_primitives::Address;

use crate::types::{
    TokenPair,
    errors::{ClmmSdkError, ReadSite},
    positions::IndexedPosition
};

#[async_trait::async_trait]
pub trait PositionIndexApi: Send + Sync {
    /// All open (liquidity > 0) positions owned by `owner`, optionally
    /// filtered to one unordered token pair. Ordering follows the service.
    async fn open_positions(
        &self,
        owner: Address,
        pair: Option<TokenPair>
    ) -> Result<Vec<IndexedPosition>, ClmmSdkError>;
}

#[derive(Debug, Clone)]
pub struct HttpPositionIndex {
    client:   reqwest::Client,
    base_url: String
}

impl HttpPositionIndex {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { client: reqwest::Client::new(), base_url: base_url.into() }
    }
}

#[async_trait::async_trait]
impl PositionIndexApi for HttpPositionIndex {
    async fn open_positions(
        &self,
        owner: Address,
        pair: Option<TokenPair>
    ) -> Result<Vec<IndexedPosition>, ClmmSdkError> {
        let mut query = vec![("owner", owner.to_string()), ("minLiquidity", "1".to_string())];
        if let Some(pair) = pair {
            query.push(("token0", pair.token0.to_string()));
            query.push(("token1", pair.token1.to_string()));
        }

        let positions = self
            .client
            .get(format!("{}/v1/positions", self.base_url))
            .query(&query)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| ClmmSdkError::remote(ReadSite::PositionIndex, e))?
            .json::<Vec<IndexedPosition>>()
            .await
            .map_err(|e| ClmmSdkError::remote(ReadSite::PositionIndex, e))?;

        Ok(positions)
    }
}
