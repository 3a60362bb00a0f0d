//! Atomic submission of an instruction batch through the wallet batch
//! primitive (`wallet_sendCalls` / `wallet_getCallsStatus`).
//!
//! The wallet either confirms the whole batch in one transaction or rejects
//! it; a batch parked in a signature queue (a multisig, typically) stays in
//! the pending status and never yields a confirmable hash from here.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use alloy_primitives::{Address, B256, Bytes, LogData, TxHash, U256, aliases::U64};
use alloy_provider::Provider;
use alloy_sol_types::SolEvent;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    builders::InstructionBatch,
    types::errors::ClmmSdkError
};

/// Deadline embedded in every mutation and used as the polling cutoff.
pub const DEADLINE_SECONDS: u64 = 300;

const BATCH_STATUS_PENDING: u16 = 100;
const BATCH_STATUS_CONFIRMED: u16 = 200;
const POLL_INTERVAL: Duration = Duration::from_secs(2);

pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

pub(crate) fn deadline_from_now() -> u64 {
    unix_now() + DEADLINE_SECONDS
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct WalletCall {
    to:    Address,
    value: U256,
    data:  Bytes
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendCallsRequest {
    version:         String,
    chain_id:        U64,
    from:            Address,
    calls:           Vec<WalletCall>,
    atomic_required: bool
}

#[derive(Debug, Clone, Deserialize)]
struct SendCallsResponse {
    id: String
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CallsStatusResponse {
    status:   u16,
    #[serde(default)]
    receipts: Vec<BatchReceipt>
}

/// One confirmed transaction receipt of a submitted batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReceipt {
    pub transaction_hash: TxHash,
    #[serde(default)]
    pub logs:             Vec<ReceiptLog>
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptLog {
    pub address: Address,
    #[serde(default)]
    pub topics:  Vec<B256>,
    #[serde(default)]
    pub data:    Bytes
}

/// Submits the batch atomically. Returns the wallet's batch id; the batch is
/// not confirmed (and may never be) until [`wait_for_receipts`] sees it land.
pub(crate) async fn submit_batch<P: Provider>(
    provider: &P,
    from: Address,
    chain_id: u64,
    batch: &InstructionBatch
) -> Result<String, ClmmSdkError> {
    let request = SendCallsRequest {
        version:         "2.0.0".to_string(),
        chain_id:        U64::from(chain_id),
        from,
        calls:           batch
            .instructions()
            .iter()
            .map(|instruction| WalletCall {
                to:    instruction.to,
                value: instruction.value,
                data:  instruction.data.clone()
            })
            .collect(),
        atomic_required: true
    };

    info!(instructions = batch.len(), %from, "submitting atomic batch");
    let response: SendCallsResponse = provider
        .raw_request("wallet_sendCalls".into(), (request,))
        .await?;

    Ok(response.id)
}

/// Polls the batch status until it confirms or the deadline passes. A batch
/// still pending at the deadline (parked for multisig approval) is a
/// submission failure: accepted, but with no confirmable hash.
pub(crate) async fn wait_for_receipts<P: Provider>(
    provider: &P,
    batch_id: &str,
    deadline_unix: u64
) -> Result<Vec<BatchReceipt>, ClmmSdkError> {
    loop {
        let status: CallsStatusResponse = provider
            .raw_request("wallet_getCallsStatus".into(), (batch_id.to_string(),))
            .await?;

        match status.status {
            BATCH_STATUS_CONFIRMED => {
                info!(batch_id, receipts = status.receipts.len(), "batch confirmed");
                return Ok(status.receipts);
            }
            BATCH_STATUS_PENDING => {
                if unix_now() >= deadline_unix {
                    warn!(batch_id, "batch still pending at deadline");
                    return Err(ClmmSdkError::Submission(format!(
                        "batch {batch_id} is still pending approval at the deadline; no \
                         transaction hash is available yet"
                    )));
                }
                debug!(batch_id, "batch pending, polling again");
                tokio::time::sleep(POLL_INTERVAL).await;
            }
            other => {
                return Err(ClmmSdkError::Submission(format!(
                    "batch {batch_id} failed with wallet status {other}"
                )));
            }
        }
    }
}

/// Scans confirmed receipts for the first decodable instance of the expected
/// settlement event.
pub(crate) fn find_settlement_event<E: SolEvent>(receipts: &[BatchReceipt]) -> Option<(TxHash, E)> {
    receipts.iter().find_map(|receipt| {
        receipt.logs.iter().find_map(|log| {
            let raw = alloy_primitives::Log {
                address: log.address,
                data:    LogData::new_unchecked(log.topics.clone(), log.data.clone())
            };
            E::decode_log(&raw)
                .ok()
                .map(|decoded| (receipt.transaction_hash, decoded.data))
        })
    })
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{U256, address, b256};

    use super::*;
    use crate::types::contracts::RangePositionManager;

    fn receipt_with(events: Vec<LogData>) -> BatchReceipt {
        BatchReceipt {
            transaction_hash: b256!(
                "0x1111111111111111111111111111111111111111111111111111111111111111"
            ),
            logs:             events
                .into_iter()
                .map(|data| ReceiptLog {
                    address: address!("0x88D0779a1F1658aD618d85Ca80d13b5223d430e9"),
                    topics:  data.topics().to_vec(),
                    data:    data.data.clone()
                })
                .collect()
        }
    }

    #[test]
    fn test_find_settlement_event_decodes_collect() {
        let event = RangePositionManager::Collect {
            tokenId:   U256::from(9u8),
            recipient: address!("0x1111111111111111111111111111111111111111"),
            amount0:   U256::from(1000u64),
            amount1:   U256::from(2000u64)
        };
        let receipts = vec![receipt_with(vec![event.encode_log_data()])];

        let (tx_hash, decoded) =
            find_settlement_event::<RangePositionManager::Collect>(&receipts).unwrap();
        assert_eq!(tx_hash, receipts[0].transaction_hash);
        assert_eq!(decoded.tokenId, U256::from(9u8));
        assert_eq!(decoded.amount0, U256::from(1000u64));
        assert_eq!(decoded.amount1, U256::from(2000u64));
    }

    #[test]
    fn test_find_settlement_event_skips_unrelated_logs() {
        let increase = RangePositionManager::IncreaseLiquidity {
            tokenId:   U256::from(3u8),
            liquidity: 500,
            amount0:   U256::from(10u8),
            amount1:   U256::from(20u8)
        };
        let receipts = vec![receipt_with(vec![increase.encode_log_data()])];

        assert!(find_settlement_event::<RangePositionManager::Collect>(&receipts).is_none());

        let (_, decoded) =
            find_settlement_event::<RangePositionManager::IncreaseLiquidity>(&receipts).unwrap();
        assert_eq!(decoded.liquidity, 500);
    }

    #[test]
    fn test_deadline_is_in_the_future() {
        assert!(deadline_from_now() > unix_now());
        assert_eq!(deadline_from_now() - unix_now(), DEADLINE_SECONDS);
    }
}
