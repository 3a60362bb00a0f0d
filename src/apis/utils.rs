use alloy_primitives::{Address, TxKind};
use alloy_provider::Provider;
use alloy_rpc_types::{TransactionInput, TransactionRequest};
use alloy_sol_types::SolCall;

use crate::types::errors::{ClmmSdkError, ReadSite};

/// `eth_call` helper for view reads. Transport and ABI failures are both
/// folded into [`ClmmSdkError::RemoteRead`] tagged with the calling site so
/// a failed read names what was being fetched.
pub(crate) async fn view_call<P, C>(
    provider: &P,
    contract: Address,
    call: C,
    site: ReadSite
) -> Result<C::Return, ClmmSdkError>
where
    P: Provider,
    C: SolCall + Send
{
    let tx = TransactionRequest {
        to: Some(TxKind::Call(contract)),
        input: TransactionInput::both(call.abi_encode().into()),
        ..Default::default()
    };

    let data = provider
        .call(tx)
        .await
        .map_err(|e| ClmmSdkError::remote(site, e))?;

    C::abi_decode_returns(&data).map_err(|e| ClmmSdkError::remote(site, e))
}
