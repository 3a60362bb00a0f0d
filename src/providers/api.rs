use alloy_network::{Ethereum, EthereumWallet, TxSigner};
use alloy_primitives::{Address, Signature, U256};
use alloy_provider::{
    Identity, Provider,
    fillers::{FillProvider, JoinFill, WalletFiller}
};
use alloy_signer::{Signer, SignerSync};

use crate::{
    apis::position_api::select_position,
    constants::ClmmChainConstants,
    index::PositionIndexApi,
    types::{TokenPair, errors::ClmmSdkError, positions::IndexedPosition}
};

pub type ClmmWalletProvider<P> = FillProvider<JoinFill<Identity, WalletFiller<EthereumWallet>>, P>;

/// Entry point for every operation: an eth provider for ledger reads and
/// submissions, the position-index client, and the chain's deployment table.
#[derive(Clone)]
pub struct ClmmApi<P, I>
where
    P: Provider,
    I: PositionIndexApi
{
    eth_provider: P,
    index:        I,
    constants:    ClmmChainConstants,
    from:         Option<Address>
}

impl<P, I> ClmmApi<P, I>
where
    P: Provider,
    I: PositionIndexApi
{
    /// Fails up front when the chain id has no known deployment.
    pub fn new(eth_provider: P, index: I, chain_id: u64) -> Result<Self, ClmmSdkError> {
        let constants = ClmmChainConstants::by_chain(chain_id)
            .ok_or_else(|| ClmmSdkError::input(format!("unsupported chain id: {chain_id}")))?;

        Ok(Self { eth_provider, index, constants, from: None })
    }

    /// Sets the account submissions are made from without attaching a local
    /// signer (the wallet backing `wallet_sendCalls` signs).
    pub fn with_from_address(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    /// Wraps the provider with a local signing wallet and uses its address
    /// as the submitting account.
    pub fn with_signer<S>(self, signer: S) -> ClmmApi<ClmmWalletProvider<P>, I>
    where
        S: Signer + SignerSync + TxSigner<Signature> + Send + Sync + 'static
    {
        let from = signer.address();
        let eth_provider = alloy_provider::builder::<Ethereum>()
            .wallet(EthereumWallet::new(signer))
            .connect_provider(self.eth_provider);

        ClmmApi { eth_provider, index: self.index, constants: self.constants, from: Some(from) }
    }

    pub fn eth_provider(&self) -> &P {
        &self.eth_provider
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    pub fn constants(&self) -> &ClmmChainConstants {
        &self.constants
    }

    pub fn from_address(&self) -> Option<Address> {
        self.from
    }

    pub(crate) fn require_from(&self) -> Result<Address, ClmmSdkError> {
        self.from.ok_or_else(|| {
            ClmmSdkError::input("no account configured: set a signer or a from address")
        })
    }

    /// Passthrough listing of the owner's open positions from the index.
    pub async fn open_positions(
        &self,
        owner: Address,
        pair: Option<TokenPair>
    ) -> Result<Vec<IndexedPosition>, ClmmSdkError> {
        self.index.open_positions(owner, pair).await
    }

    /// Maps (owner, unordered pair) to exactly one open position unless the
    /// caller already supplied an id, which is used verbatim and validated
    /// by the downstream on-chain read.
    pub async fn resolve_position(
        &self,
        owner: Address,
        token_a: Address,
        token_b: Address,
        explicit_id: Option<U256>
    ) -> Result<U256, ClmmSdkError> {
        if let Some(id) = explicit_id {
            return Ok(id);
        }

        let candidates = self
            .index
            .open_positions(owner, Some(TokenPair::new(token_a, token_b)))
            .await?;

        select_position(&candidates, owner, token_a, token_b)
    }
}
