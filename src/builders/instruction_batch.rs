//! Ordered, atomic instruction batches.
//!
//! A batch is an ordered list of opaque encoded calls submitted through the
//! wallet's all-or-nothing batch primitive. The builder only knows about
//! ordering; it never models data flow between steps, since the ledger
//! resolves intermediate state (a decrease's output feeding the following
//! collect) atomically on its own.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;

use crate::types::contracts::{ERC20, RangePositionManager};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub to:    Address,
    pub value: U256,
    pub data:  Bytes
}

impl Instruction {
    pub fn contract_call<C: SolCall>(to: Address, call: C) -> Self {
        Self { to, value: U256::ZERO, data: call.abi_encode().into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstructionBatch {
    instructions: Vec<Instruction>
}

impl InstructionBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn push_approval(&mut self, token: Address, spender: Address, amount: U256) {
        self.instructions.push(Instruction::contract_call(
            token,
            ERC20::approveCall { spender, amount }
        ));
    }

    pub fn push_mint(
        &mut self,
        position_manager: Address,
        params: RangePositionManager::MintParams
    ) {
        self.instructions.push(Instruction::contract_call(
            position_manager,
            RangePositionManager::mintCall { params }
        ));
    }

    pub fn push_increase(
        &mut self,
        position_manager: Address,
        params: RangePositionManager::IncreaseLiquidityParams
    ) {
        self.instructions.push(Instruction::contract_call(
            position_manager,
            RangePositionManager::increaseLiquidityCall { params }
        ));
    }

    pub fn push_decrease(
        &mut self,
        position_manager: Address,
        params: RangePositionManager::DecreaseLiquidityParams
    ) {
        self.instructions.push(Instruction::contract_call(
            position_manager,
            RangePositionManager::decreaseLiquidityCall { params }
        ));
    }

    pub fn push_collect(
        &mut self,
        position_manager: Address,
        params: RangePositionManager::CollectParams
    ) {
        self.instructions.push(Instruction::contract_call(
            position_manager,
            RangePositionManager::collectCall { params }
        ));
    }

    pub fn push_burn(&mut self, position_manager: Address, token_id: U256) {
        self.instructions.push(Instruction::contract_call(
            position_manager,
            RangePositionManager::burnCall { tokenId: token_id }
        ));
    }

    /// Appends the full-exit tail: collect every owed token, then burn the
    /// now-empty position. Only meaningful directly after a 100% decrease in
    /// the same batch, which is what keeps a complete withdrawal indivisible.
    pub fn push_full_exit(&mut self, position_manager: Address, token_id: U256, recipient: Address) {
        self.push_collect(
            position_manager,
            RangePositionManager::CollectParams {
                tokenId:    token_id,
                recipient,
                amount0Max: u128::MAX,
                amount1Max: u128::MAX
            }
        );
        self.push_burn(position_manager, token_id);
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;
    use alloy_sol_types::SolCall;

    use super::*;

    const MANAGER: Address = address!("0x88D0779a1F1658aD618d85Ca80d13b5223d430e9");
    const TOKEN: Address = address!("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
    const OWNER: Address = address!("0x1111111111111111111111111111111111111111");

    #[test]
    fn test_approval_then_mint_ordering() {
        let mut batch = InstructionBatch::new();
        batch.push_approval(TOKEN, MANAGER, U256::from(500u64));
        batch.push_mint(
            MANAGER,
            RangePositionManager::MintParams {
                token0:         TOKEN,
                token1:         MANAGER,
                tickLower:      alloy_primitives::aliases::I24::unchecked_from(-60),
                tickUpper:      alloy_primitives::aliases::I24::unchecked_from(60),
                amount0Desired: U256::from(500u64),
                amount1Desired: U256::from(500u64),
                amount0Min:     U256::ZERO,
                amount1Min:     U256::ZERO,
                recipient:      OWNER,
                deadline:       U256::from(1_700_000_000u64)
            }
        );

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.instructions()[0].to, TOKEN);
        assert_eq!(&batch.instructions()[0].data[..4], ERC20::approveCall::SELECTOR.as_slice());
        assert_eq!(batch.instructions()[1].to, MANAGER);
        assert_eq!(
            &batch.instructions()[1].data[..4],
            RangePositionManager::mintCall::SELECTOR.as_slice()
        );
    }

    #[test]
    fn test_full_exit_appends_collect_then_burn() {
        let token_id = U256::from(42u64);

        let mut batch = InstructionBatch::new();
        batch.push_decrease(
            MANAGER,
            RangePositionManager::DecreaseLiquidityParams {
                tokenId:    token_id,
                liquidity:  1_000,
                amount0Min: U256::ONE,
                amount1Min: U256::ONE,
                deadline:   U256::from(1_700_000_000u64)
            }
        );
        batch.push_full_exit(MANAGER, token_id, OWNER);

        assert_eq!(batch.len(), 3);
        let decrease_selector = RangePositionManager::decreaseLiquidityCall::SELECTOR;
        let collect_selector = RangePositionManager::collectCall::SELECTOR;
        let burn_selector = RangePositionManager::burnCall::SELECTOR;
        let selectors: Vec<&[u8]> =
            batch.instructions().iter().map(|i| &i.data[..4]).collect();
        assert_eq!(
            selectors,
            vec![
                decrease_selector.as_slice(),
                collect_selector.as_slice(),
                burn_selector.as_slice()
            ]
        );

        // the uncapped collect takes everything the decrease released
        let collect =
            RangePositionManager::collectCall::abi_decode(&batch.instructions()[1].data).unwrap();
        assert_eq!(collect.params.amount0Max, u128::MAX);
        assert_eq!(collect.params.amount1Max, u128::MAX);
        assert_eq!(collect.params.recipient, OWNER);
    }
}
