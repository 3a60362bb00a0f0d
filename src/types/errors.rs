use std::fmt;

use alloy::transports::TransportErrorKind;
use alloy_json_rpc::RpcError;
use alloy_primitives::{Address, TxHash, U256};
use serde::{Deserialize, Serialize};

/// Which side of the pair an amount check refers to, in the pool's canonical
/// ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenSide {
    Token0,
    Token1
}

impl fmt::Display for TokenSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenSide::Token0 => write!(f, "token0"),
            TokenSide::Token1 => write!(f, "token1")
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AmountField {
    Amount,
    Minimum
}

impl fmt::Display for AmountField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountField::Amount => write!(f, "amount"),
            AmountField::Minimum => write!(f, "minimum")
        }
    }
}

/// The remote call site a failed read originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadSite {
    TokenMetadata,
    PoolLookup,
    PoolState,
    PositionLookup,
    PositionIndex,
    Simulation
}

impl fmt::Display for ReadSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadSite::TokenMetadata => write!(f, "token metadata"),
            ReadSite::PoolLookup => write!(f, "pool lookup"),
            ReadSite::PoolState => write!(f, "pool state"),
            ReadSite::PositionLookup => write!(f, "position lookup"),
            ReadSite::PositionIndex => write!(f, "position index"),
            ReadSite::Simulation => write!(f, "simulation")
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClmmSdkError {
    #[error("invalid input: {0}")]
    InputValidation(String),
    #[error("multiple open positions match this pair, pass an explicit position id: {candidates:?}")]
    AmbiguousPosition { candidates: Vec<U256> },
    #[error("position not found: {0}")]
    PositionNotFound(String),
    #[error("no pool deployed for pair {token0} / {token1}")]
    PoolNotFound { token0: Address, token1: Address },
    #[error("{side} {field} must be nonzero for this range")]
    InsufficientAmount { side: TokenSide, field: AmountField },
    #[error("nothing to collect, both fee caps are zero")]
    NothingToCollect,
    #[error("{site} read failed: {reason}")]
    RemoteRead { site: ReadSite, reason: String },
    #[error("submission did not yield a confirmable transaction: {0}")]
    Submission(String),
    #[error("transaction {tx_hash} confirmed but the settlement event is missing from the receipt")]
    EventNotFound { tx_hash: TxHash },
    #[error("eth call error: {0:?}")]
    EthCall(#[from] RpcError<TransportErrorKind>),
    #[error("abi decode error: {0:?}")]
    AbiDecode(#[from] alloy_sol_types::Error)
}

impl ClmmSdkError {
    pub(crate) fn remote(site: ReadSite, reason: impl fmt::Display) -> Self {
        Self::RemoteRead { site, reason: reason.to_string() }
    }

    pub(crate) fn input(reason: impl fmt::Display) -> Self {
        Self::InputValidation(reason.to_string())
    }
}

/// Uniform operation-boundary result. Every public flow can be run through a
/// `*_report` wrapper that folds success and failure into this shape so
/// nothing escapes the entrypoint as an unhandled fault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationReport {
    pub message:  String,
    pub is_error: bool
}

impl OperationReport {
    pub fn from_result(result: Result<String, ClmmSdkError>) -> Self {
        match result {
            Ok(message) => Self { message, is_error: false },
            Err(e) => Self { message: e.to_string(), is_error: true }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_amount_names_side_and_field() {
        let err = ClmmSdkError::InsufficientAmount {
            side:  TokenSide::Token0,
            field: AmountField::Amount
        };
        assert_eq!(err.to_string(), "token0 amount must be nonzero for this range");

        let err = ClmmSdkError::InsufficientAmount {
            side:  TokenSide::Token1,
            field: AmountField::Minimum
        };
        assert_eq!(err.to_string(), "token1 minimum must be nonzero for this range");
    }

    #[test]
    fn test_report_folds_errors() {
        let ok = OperationReport::from_result(Ok("minted position 7".to_string()));
        assert!(!ok.is_error);
        assert_eq!(ok.message, "minted position 7");

        let err = OperationReport::from_result(Err(ClmmSdkError::NothingToCollect));
        assert!(err.is_error);
        assert_eq!(err.message, "nothing to collect, both fee caps are zero");
    }

    #[test]
    fn test_remote_read_names_site() {
        let err = ClmmSdkError::remote(ReadSite::PoolLookup, "connection refused");
        assert_eq!(err.to_string(), "pool lookup read failed: connection refused");
    }
}
