use alloy_primitives::{Address, U256};
use alloy_provider::Provider;

use super::utils::view_call;
use crate::types::{
    contracts::RangePositionManager,
    errors::{ClmmSdkError, ReadSite},
    positions::{IndexedPosition, Position}
};

/// On-chain position reads, implemented for any alloy provider.
#[async_trait::async_trait]
pub trait ClmmPositionApi: Provider + Sized {
    async fn position_by_id(
        &self,
        position_manager: Address,
        position_id: U256
    ) -> Result<Position, ClmmSdkError> {
        let ret = view_call(
            self,
            position_manager,
            RangePositionManager::positionsCall { tokenId: position_id },
            ReadSite::PositionLookup
        )
        .await?;

        // the manager zero-fills unknown ids rather than reverting
        if ret.token0 == Address::ZERO && ret.token1 == Address::ZERO {
            return Err(ClmmSdkError::PositionNotFound(format!("no position with id {position_id}")));
        }

        Ok(Position::from_positions_return(position_id, ret))
    }

    /// Uncollected fees currently accounted to the position, in canonical
    /// order.
    async fn position_fees(
        &self,
        position_manager: Address,
        position_id: U256
    ) -> Result<(u128, u128), ClmmSdkError> {
        let position = self.position_by_id(position_manager, position_id).await?;
        Ok((position.tokens_owed0, position.tokens_owed1))
    }
}

impl<P: Provider> ClmmPositionApi for P {}

/// Picks the single open position matching an unordered pair out of the
/// index's candidates. Zero matches and multiple matches are both hard
/// errors; disambiguation is the caller's job, not a guess this SDK makes.
pub fn select_position(
    candidates: &[IndexedPosition],
    owner: Address,
    token_a: Address,
    token_b: Address
) -> Result<U256, ClmmSdkError> {
    let matching = candidates
        .iter()
        .filter(|candidate| candidate.matches_pair(token_a, token_b))
        .collect::<Vec<_>>();

    match matching.as_slice() {
        [] => Err(ClmmSdkError::PositionNotFound(format!(
            "owner {owner} has no open position on pair {token_a} / {token_b}"
        ))),
        [only] => Ok(only.id),
        many => Err(ClmmSdkError::AmbiguousPosition {
            candidates: many.iter().map(|candidate| candidate.id).collect()
        })
    }
}
