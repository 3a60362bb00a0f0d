//! Dry-run execution of a prospective batch via `eth_simulateV1`.
//!
//! The whole batch is simulated in order against latest state, so a mutation
//! sees the effects of the approvals ahead of it, exactly as it would when
//! submitted. Nothing here mutates ledger state.

use alloy_primitives::{Address, Bytes, U256, aliases::U64};
use alloy_provider::Provider;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    builders::InstructionBatch,
    types::errors::{ClmmSdkError, ReadSite}
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulatePayload {
    block_state_calls: Vec<SimBlock>,
    validation:        bool,
    trace_transfers:   bool
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimBlock {
    calls: Vec<SimCall>
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimCall {
    from:  Address,
    to:    Address,
    value: U256,
    data:  Bytes
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SimulatedBlock {
    calls: Vec<SimCallResult>
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SimCallResult {
    status:      U64,
    #[serde(default)]
    return_data: Bytes,
    #[serde(default)]
    error:       Option<SimCallError>
}

#[derive(Debug, Clone, Deserialize)]
struct SimCallError {
    #[serde(default)]
    message: String
}

/// Simulates every instruction of the batch in order and returns their raw
/// return data, index-aligned with the batch. Any failing step fails the
/// whole dry run.
pub(crate) async fn simulate_batch<P: Provider>(
    provider: &P,
    from: Address,
    batch: &InstructionBatch
) -> Result<Vec<Bytes>, ClmmSdkError> {
    let payload = SimulatePayload {
        block_state_calls: vec![SimBlock {
            calls: batch
                .instructions()
                .iter()
                .map(|instruction| SimCall {
                    from,
                    to: instruction.to,
                    value: instruction.value,
                    data: instruction.data.clone()
                })
                .collect()
        }],
        validation:        false,
        trace_transfers:   false
    };

    debug!(instructions = batch.len(), "simulating batch");
    let blocks: Vec<SimulatedBlock> = provider
        .raw_request("eth_simulateV1".into(), (payload, "latest"))
        .await
        .map_err(|e| ClmmSdkError::remote(ReadSite::Simulation, e))?;

    let block = blocks
        .into_iter()
        .next()
        .ok_or_else(|| ClmmSdkError::remote(ReadSite::Simulation, "empty simulation response"))?;

    block
        .calls
        .into_iter()
        .enumerate()
        .map(|(idx, result)| {
            if result.status == U64::from(1u8) {
                Ok(result.return_data)
            } else {
                let reason = result
                    .error
                    .map(|e| e.message)
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| "execution reverted".to_string());
                Err(ClmmSdkError::remote(
                    ReadSite::Simulation,
                    format!("instruction {idx} reverted in dry run: {reason}")
                ))
            }
        })
        .collect()
}
