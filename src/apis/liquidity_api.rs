//! The four position mutation flows: mint, increase, decrease (with the
//! atomic full-exit tail) and collect.
//!
//! Every flow is a single linear chain: validate inputs, read what the
//! operation depends on (independent reads concurrently), dry-run when a
//! bound is missing, classify and validate the range, then submit exactly one
//! atomic batch and decode the settlement event from its receipts. A failure
//! anywhere before submission means nothing was mutated.

use alloy_primitives::{Address, U256, aliases::I24};
use alloy_provider::Provider;
use alloy_sol_types::SolCall;
use tracing::{debug, info};

use super::{data_api::ClmmDataApi, position_api::ClmmPositionApi};
use crate::{
    builders::InstructionBatch,
    index::PositionIndexApi,
    math::{
        range::{classify, validate_amounts},
        slippage::{
            BPS_DENOMINATOR, BoundKind, DEFAULT_SLIPPAGE_BPS, bound_from_expected,
            liquidity_to_remove, scale_by_bps, validate_tolerance_bps
        },
        tick::{max_usable_tick, min_usable_tick, price_to_tick, tick_to_price,
               widen_collapsed_range}
    },
    providers::{
        ClmmApi,
        batch::{BatchReceipt, deadline_from_now, find_settlement_event, submit_batch,
                wait_for_receipts},
        simulate::simulate_batch
    },
    types::{
        PoolState, TokenAmount,
        contracts::RangePositionManager,
        errors::{ClmmSdkError, ReadSite},
        requests::{
            CollectReceipt, CollectRequest, DecreaseRequest, IncreaseRequest,
            LiquidityChangeReceipt, MintReceipt, MintRequest, OperationKind, PriceBound
        }
    }
};

/// Reorders a caller-supplied (token_a, token_b) pair of values onto the
/// pool's canonical (token0, token1) ordering.
fn remap_to_canonical<T>(token_a: Address, token0: Address, value_a: T, value_b: T) -> (T, T) {
    if token_a == token0 { (value_a, value_b) } else { (value_b, value_a) }
}

fn resolve_price(
    bound: &PriceBound,
    state: &PoolState,
    decimals0: u8,
    decimals1: u8
) -> Result<f64, ClmmSdkError> {
    match bound {
        PriceBound::Absolute(price) => price
            .trim()
            .parse::<f64>()
            .map_err(|_| ClmmSdkError::input(format!("malformed price: {price}"))),
        PriceBound::PercentFromCurrent(offset_bps) => {
            let current = tick_to_price(state.current_tick, decimals0, decimals1);
            Ok(current * f64::from(BPS_DENOMINATOR as i32 + offset_bps)
                / f64::from(BPS_DENOMINATOR))
        }
    }
}

fn parse_optional_amount(
    value: Option<&String>,
    decimals: u8
) -> Result<Option<TokenAmount>, ClmmSdkError> {
    value
        .map(|v| TokenAmount::from_decimal_str(v, decimals))
        .transpose()
}

fn first_tx_hash(receipts: &[BatchReceipt]) -> alloy_primitives::TxHash {
    receipts
        .first()
        .map(|receipt| receipt.transaction_hash)
        .unwrap_or_default()
}

impl<P, I> ClmmApi<P, I>
where
    P: Provider,
    I: PositionIndexApi
{
    /// Opens a new position. Missing price bounds default to the full usable
    /// range; missing minimums are derived from a dry run at a fixed 20 bps
    /// tolerance.
    pub async fn mint(&self, request: MintRequest) -> Result<MintReceipt, ClmmSdkError> {
        let owner = self.require_from()?;
        let manager = self.constants().position_manager_address();

        if request.token_a == request.token_b {
            return Err(ClmmSdkError::input("token pair must contain two distinct tokens"));
        }

        let provider = self.eth_provider();
        let pool = provider
            .pool_address(self.constants().factory_address(), request.token_a, request.token_b)
            .await?;
        let state = provider.pool_state(pool).await?;
        let (decimals0, decimals1) = provider.pair_decimals(state.token0, state.token1).await?;

        let (amount0_str, amount1_str) =
            remap_to_canonical(request.token_a, state.token0, &request.amount_a, &request.amount_b);
        let amount0 = TokenAmount::from_decimal_str(amount0_str, decimals0)?;
        let amount1 = TokenAmount::from_decimal_str(amount1_str, decimals1)?;

        let (min0_str, min1_str) = remap_to_canonical(
            request.token_a,
            state.token0,
            request.amount_a_min.as_ref(),
            request.amount_b_min.as_ref()
        );
        let explicit_min0 = parse_optional_amount(min0_str, decimals0)?;
        let explicit_min1 = parse_optional_amount(min1_str, decimals1)?;

        let tick_lower = match &request.lower_price {
            None => min_usable_tick(state.tick_spacing),
            Some(bound) => price_to_tick(
                resolve_price(bound, &state, decimals0, decimals1)?,
                decimals0,
                decimals1,
                state.tick_spacing,
                true
            )?
        };
        let tick_upper = match &request.upper_price {
            None => max_usable_tick(state.tick_spacing),
            Some(bound) => price_to_tick(
                resolve_price(bound, &state, decimals0, decimals1)?,
                decimals0,
                decimals1,
                state.tick_spacing,
                false
            )?
        };

        if tick_lower > tick_upper {
            return Err(ClmmSdkError::input(format!(
                "inverted price bounds: lower tick {tick_lower} is above upper tick {tick_upper}"
            )));
        }
        let (tick_lower, tick_upper) =
            widen_collapsed_range(tick_lower, tick_upper, state.current_tick, state.tick_spacing);
        debug!(tick_lower, tick_upper, current = state.current_tick, "mint range resolved");

        let classification = classify(state.current_tick, tick_lower, tick_upper);
        // minimums are deliberately not required for mint, so placeholders
        // make this an amount-only check ahead of any dry run
        validate_amounts(
            (amount0.raw(), amount1.raw()),
            (U256::MAX, U256::MAX),
            classification,
            OperationKind::Mint
        )?;

        self.check_balances(owner, &state, amount0.raw(), amount1.raw())
            .await?;
        let approvals = self
            .approval_instructions(owner, manager, &state, amount0.raw(), amount1.raw())
            .await?;

        let deadline = deadline_from_now();
        let mint_params = |min0: U256, min1: U256| RangePositionManager::MintParams {
            token0:         state.token0,
            token1:         state.token1,
            tickLower:      I24::unchecked_from(tick_lower),
            tickUpper:      I24::unchecked_from(tick_upper),
            amount0Desired: amount0.raw(),
            amount1Desired: amount1.raw(),
            amount0Min:     min0,
            amount1Min:     min1,
            recipient:      owner,
            deadline:       U256::from(deadline)
        };

        let (min0, min1) = match (explicit_min0, explicit_min1) {
            (Some(min0), Some(min1)) => (min0.raw(), min1.raw()),
            (explicit0, explicit1) => {
                let mut dry_run = InstructionBatch::new();
                for (token, amount) in &approvals {
                    dry_run.push_approval(*token, manager, *amount);
                }
                dry_run.push_mint(manager, mint_params(U256::ZERO, U256::ZERO));

                let returns = simulate_batch(provider, owner, &dry_run).await?;
                let expected = decode_simulated::<RangePositionManager::mintCall>(&returns)?;
                debug!(
                    expected0 = %expected.amount0,
                    expected1 = %expected.amount1,
                    "mint dry run settled"
                );

                (
                    explicit0.map(|m| m.raw()).unwrap_or_else(|| {
                        bound_from_expected(
                            BoundKind::MinOut,
                            expected.amount0,
                            DEFAULT_SLIPPAGE_BPS
                        )
                    }),
                    explicit1.map(|m| m.raw()).unwrap_or_else(|| {
                        bound_from_expected(
                            BoundKind::MinOut,
                            expected.amount1,
                            DEFAULT_SLIPPAGE_BPS
                        )
                    })
                )
            }
        };

        let mut batch = InstructionBatch::new();
        for (token, amount) in &approvals {
            batch.push_approval(*token, manager, *amount);
        }
        batch.push_mint(manager, mint_params(min0, min1));

        let receipts = self.submit(owner, &batch, deadline).await?;
        let (tx_hash, event) =
            find_settlement_event::<RangePositionManager::IncreaseLiquidity>(&receipts).ok_or(
                ClmmSdkError::EventNotFound { tx_hash: first_tx_hash(&receipts) }
            )?;

        info!(position_id = %event.tokenId, %tx_hash, "mint confirmed");
        Ok(MintReceipt {
            tx_hash,
            position_id: event.tokenId,
            liquidity: event.liquidity,
            amount0: event.amount0,
            amount1: event.amount1
        })
    }

    /// Adds liquidity to an existing position. Resolves the position from
    /// the index when no explicit id is given.
    pub async fn increase_liquidity(
        &self,
        request: IncreaseRequest
    ) -> Result<LiquidityChangeReceipt, ClmmSdkError> {
        let tolerance =
            validate_tolerance_bps(request.slippage_bps.unwrap_or(DEFAULT_SLIPPAGE_BPS))?;
        let owner = self.require_from()?;
        let manager = self.constants().position_manager_address();
        let provider = self.eth_provider();

        let position_id = self
            .resolve_position(owner, request.token_a, request.token_b, request.position_id)
            .await?;
        let position = provider.position_by_id(manager, position_id).await?;

        let pool = provider
            .pool_address(self.constants().factory_address(), position.token0, position.token1)
            .await?;
        let (state, (decimals0, decimals1)) = tokio::try_join!(
            provider.pool_state(pool),
            provider.pair_decimals(position.token0, position.token1)
        )?;

        let (amount0_str, amount1_str) = remap_to_canonical(
            request.token_a,
            position.token0,
            &request.amount_a,
            &request.amount_b
        );
        let amount0 = TokenAmount::from_decimal_str(amount0_str, decimals0)?;
        let amount1 = TokenAmount::from_decimal_str(amount1_str, decimals1)?;

        let (min0_str, min1_str) = remap_to_canonical(
            request.token_a,
            position.token0,
            request.amount_a_min.as_ref(),
            request.amount_b_min.as_ref()
        );
        let explicit_min0 = parse_optional_amount(min0_str, decimals0)?;
        let explicit_min1 = parse_optional_amount(min1_str, decimals1)?;

        let classification = classify(state.current_tick, position.tick_lower, position.tick_upper);
        // amount-only precheck ahead of the dry run: placeholder minimums
        // pass the nonzero rule, the real ones are validated below
        validate_amounts(
            (amount0.raw(), amount1.raw()),
            (U256::MAX, U256::MAX),
            classification,
            OperationKind::Increase
        )?;

        self.check_balances(owner, &state, amount0.raw(), amount1.raw())
            .await?;
        let approvals = self
            .approval_instructions(owner, manager, &state, amount0.raw(), amount1.raw())
            .await?;

        let deadline = deadline_from_now();
        let increase_params =
            |min0: U256, min1: U256| RangePositionManager::IncreaseLiquidityParams {
                tokenId:        position_id,
                amount0Desired: amount0.raw(),
                amount1Desired: amount1.raw(),
                amount0Min:     min0,
                amount1Min:     min1,
                deadline:       U256::from(deadline)
            };

        let (min0, min1) = match (explicit_min0, explicit_min1) {
            (Some(min0), Some(min1)) => (min0.raw(), min1.raw()),
            (explicit0, explicit1) => {
                let mut dry_run = InstructionBatch::new();
                for (token, amount) in &approvals {
                    dry_run.push_approval(*token, manager, *amount);
                }
                dry_run.push_increase(manager, increase_params(U256::ZERO, U256::ZERO));

                let returns = simulate_batch(provider, owner, &dry_run).await?;
                let expected =
                    decode_simulated::<RangePositionManager::increaseLiquidityCall>(&returns)?;

                (
                    explicit0.map(|m| m.raw()).unwrap_or_else(|| {
                        bound_from_expected(BoundKind::MinOut, expected.amount0, tolerance)
                    }),
                    explicit1.map(|m| m.raw()).unwrap_or_else(|| {
                        bound_from_expected(BoundKind::MinOut, expected.amount1, tolerance)
                    })
                )
            }
        };

        validate_amounts(
            (amount0.raw(), amount1.raw()),
            (min0, min1),
            classification,
            OperationKind::Increase
        )?;

        let mut batch = InstructionBatch::new();
        for (token, amount) in &approvals {
            batch.push_approval(*token, manager, *amount);
        }
        batch.push_increase(manager, increase_params(min0, min1));

        let receipts = self.submit(owner, &batch, deadline).await?;
        let (tx_hash, event) =
            find_settlement_event::<RangePositionManager::IncreaseLiquidity>(&receipts).ok_or(
                ClmmSdkError::EventNotFound { tx_hash: first_tx_hash(&receipts) }
            )?;

        info!(position_id = %position_id, %tx_hash, "increase confirmed");
        Ok(LiquidityChangeReceipt {
            tx_hash,
            position_id,
            liquidity_delta: event.liquidity,
            amount0: event.amount0,
            amount1: event.amount1,
            burned: false
        })
    }

    /// Removes a percentage of the position's liquidity. At 10000 bps the
    /// batch atomically collects all fees and burns the position, so a full
    /// withdrawal never leaves an empty-but-alive position observable.
    pub async fn decrease_liquidity(
        &self,
        request: DecreaseRequest
    ) -> Result<LiquidityChangeReceipt, ClmmSdkError> {
        if request.percentage_bps > BPS_DENOMINATOR {
            return Err(ClmmSdkError::input(format!(
                "decrease percentage {} bps is outside [0, {BPS_DENOMINATOR}]",
                request.percentage_bps
            )));
        }

        let owner = self.require_from()?;
        let manager = self.constants().position_manager_address();
        let provider = self.eth_provider();

        let position_id = self
            .resolve_position(owner, request.token_a, request.token_b, request.position_id)
            .await?;
        let position = provider.position_by_id(manager, position_id).await?;

        let pool = provider
            .pool_address(self.constants().factory_address(), position.token0, position.token1)
            .await?;
        let (state, (decimals0, decimals1)) = tokio::try_join!(
            provider.pool_state(pool),
            provider.pair_decimals(position.token0, position.token1)
        )?;

        let liquidity_delta = liquidity_to_remove(position.liquidity, request.percentage_bps);
        if liquidity_delta == 0 {
            return Err(ClmmSdkError::input(format!(
                "decreasing {} bps of {} liquidity removes nothing",
                request.percentage_bps, position.liquidity
            )));
        }
        let full_exit = request.percentage_bps == BPS_DENOMINATOR;

        let (min0_str, min1_str) = remap_to_canonical(
            request.token_a,
            position.token0,
            request.amount_a_min.as_ref(),
            request.amount_b_min.as_ref()
        );
        let explicit_min0 = parse_optional_amount(min0_str, decimals0)?;
        let explicit_min1 = parse_optional_amount(min1_str, decimals1)?;

        let classification = classify(state.current_tick, position.tick_lower, position.tick_upper);

        let deadline = deadline_from_now();
        let decrease_params =
            |min0: U256, min1: U256| RangePositionManager::DecreaseLiquidityParams {
                tokenId:    position_id,
                liquidity:  liquidity_delta,
                amount0Min: min0,
                amount1Min: min1,
                deadline:   U256::from(deadline)
            };

        // the decrease tolerance is fixed; only fully explicit minimums skip
        // the dry run
        let (amounts, min0, min1) = match (explicit_min0, explicit_min1) {
            (Some(min0), Some(min1)) => ((min0.raw(), min1.raw()), min0.raw(), min1.raw()),
            (explicit0, explicit1) => {
                let mut dry_run = InstructionBatch::new();
                dry_run.push_decrease(manager, decrease_params(U256::ZERO, U256::ZERO));

                let returns = simulate_batch(provider, owner, &dry_run).await?;
                let expected =
                    decode_simulated::<RangePositionManager::decreaseLiquidityCall>(&returns)?;
                debug!(
                    expected0 = %expected.amount0,
                    expected1 = %expected.amount1,
                    "decrease dry run settled"
                );

                let min0 = explicit0.map(|m| m.raw()).unwrap_or_else(|| {
                    bound_from_expected(BoundKind::MinOut, expected.amount0, DEFAULT_SLIPPAGE_BPS)
                });
                let min1 = explicit1.map(|m| m.raw()).unwrap_or_else(|| {
                    bound_from_expected(BoundKind::MinOut, expected.amount1, DEFAULT_SLIPPAGE_BPS)
                });
                ((expected.amount0, expected.amount1), min0, min1)
            }
        };

        validate_amounts(amounts, (min0, min1), classification, OperationKind::Decrease)?;

        let mut batch = InstructionBatch::new();
        batch.push_decrease(manager, decrease_params(min0, min1));
        if full_exit {
            batch.push_full_exit(manager, position_id, owner);
        }

        let receipts = self.submit(owner, &batch, deadline).await?;
        let (tx_hash, event) =
            find_settlement_event::<RangePositionManager::DecreaseLiquidity>(&receipts).ok_or(
                ClmmSdkError::EventNotFound { tx_hash: first_tx_hash(&receipts) }
            )?;

        info!(position_id = %position_id, full_exit, %tx_hash, "decrease confirmed");
        Ok(LiquidityChangeReceipt {
            tx_hash,
            position_id,
            liquidity_delta: event.liquidity,
            amount0: event.amount0,
            amount1: event.amount1,
            burned: full_exit
        })
    }

    /// Collects accrued fees up to per-side caps. Without explicit caps the
    /// owed amounts are discovered with a 100% dry-run collect and scaled by
    /// the requested percentage.
    pub async fn collect(&self, request: CollectRequest) -> Result<CollectReceipt, ClmmSdkError> {
        let collect_bps = request.collect_percentage_bps.unwrap_or(BPS_DENOMINATOR);
        if collect_bps > BPS_DENOMINATOR {
            return Err(ClmmSdkError::input(format!(
                "collect percentage {collect_bps} bps is outside [0, {BPS_DENOMINATOR}]"
            )));
        }

        let owner = self.require_from()?;
        let manager = self.constants().position_manager_address();
        let provider = self.eth_provider();

        let position_id = self
            .resolve_position(owner, request.token_a, request.token_b, request.position_id)
            .await?;
        let position = provider.position_by_id(manager, position_id).await?;

        let (max0_str, max1_str) = remap_to_canonical(
            request.token_a,
            position.token0,
            request.max_a.as_ref(),
            request.max_b.as_ref()
        );

        let collect_params = |cap0: u128, cap1: u128| RangePositionManager::CollectParams {
            tokenId:    position_id,
            recipient:  owner,
            amount0Max: cap0,
            amount1Max: cap1
        };

        let (cap0, cap1) = match (max0_str, max1_str) {
            (Some(max0), Some(max1)) => {
                let (decimals0, decimals1) = provider
                    .pair_decimals(position.token0, position.token1)
                    .await?;
                (
                    cap_to_u128(TokenAmount::from_decimal_str(max0, decimals0)?.raw()),
                    cap_to_u128(TokenAmount::from_decimal_str(max1, decimals1)?.raw())
                )
            }
            (explicit0, explicit1) => {
                let mut dry_run = InstructionBatch::new();
                dry_run.push_collect(manager, collect_params(u128::MAX, u128::MAX));

                let returns = simulate_batch(provider, owner, &dry_run).await?;
                let owed = decode_simulated::<RangePositionManager::collectCall>(&returns)?;
                debug!(owed0 = %owed.amount0, owed1 = %owed.amount1, "collect dry run settled");

                let cap0 = match explicit0 {
                    Some(max0) => {
                        let decimals0 = provider.token_decimals(position.token0).await?;
                        cap_to_u128(TokenAmount::from_decimal_str(max0, decimals0)?.raw())
                    }
                    None => cap_to_u128(scale_by_bps(owed.amount0, collect_bps))
                };
                let cap1 = match explicit1 {
                    Some(max1) => {
                        let decimals1 = provider.token_decimals(position.token1).await?;
                        cap_to_u128(TokenAmount::from_decimal_str(max1, decimals1)?.raw())
                    }
                    None => cap_to_u128(scale_by_bps(owed.amount1, collect_bps))
                };
                (cap0, cap1)
            }
        };

        if cap0 == 0 && cap1 == 0 {
            return Err(ClmmSdkError::NothingToCollect);
        }

        let deadline = deadline_from_now();
        let mut batch = InstructionBatch::new();
        batch.push_collect(manager, collect_params(cap0, cap1));

        let receipts = self.submit(owner, &batch, deadline).await?;
        let (tx_hash, event) = find_settlement_event::<RangePositionManager::Collect>(&receipts)
            .ok_or(ClmmSdkError::EventNotFound { tx_hash: first_tx_hash(&receipts) })?;

        info!(position_id = %position_id, %tx_hash, "collect confirmed");
        Ok(CollectReceipt {
            tx_hash,
            position_id,
            amount0: event.amount0,
            amount1: event.amount1
        })
    }

    pub async fn mint_report(&self, request: MintRequest) -> crate::types::OperationReport {
        crate::types::OperationReport::from_result(self.mint(request).await.map(|receipt| {
            format!(
                "minted position {} with liquidity {}, settled {} token0 / {} token1 (tx {})",
                receipt.position_id,
                receipt.liquidity,
                receipt.amount0,
                receipt.amount1,
                receipt.tx_hash
            )
        }))
    }

    pub async fn increase_liquidity_report(
        &self,
        request: IncreaseRequest
    ) -> crate::types::OperationReport {
        crate::types::OperationReport::from_result(
            self.increase_liquidity(request).await.map(|receipt| {
                format!(
                    "increased position {} by {} liquidity, settled {} token0 / {} token1 (tx {})",
                    receipt.position_id,
                    receipt.liquidity_delta,
                    receipt.amount0,
                    receipt.amount1,
                    receipt.tx_hash
                )
            })
        )
    }

    pub async fn decrease_liquidity_report(
        &self,
        request: DecreaseRequest
    ) -> crate::types::OperationReport {
        crate::types::OperationReport::from_result(
            self.decrease_liquidity(request).await.map(|receipt| {
                let tail = if receipt.burned { ", collected all fees and burned it" } else { "" };
                format!(
                    "decreased position {} by {} liquidity, settled {} token0 / {} token1{} (tx {})",
                    receipt.position_id,
                    receipt.liquidity_delta,
                    receipt.amount0,
                    receipt.amount1,
                    tail,
                    receipt.tx_hash
                )
            })
        )
    }

    pub async fn collect_report(&self, request: CollectRequest) -> crate::types::OperationReport {
        crate::types::OperationReport::from_result(self.collect(request).await.map(|receipt| {
            format!(
                "collected {} token0 / {} token1 from position {} (tx {})",
                receipt.amount0, receipt.amount1, receipt.position_id, receipt.tx_hash
            )
        }))
    }

    async fn submit(
        &self,
        owner: Address,
        batch: &InstructionBatch,
        deadline: u64
    ) -> Result<Vec<BatchReceipt>, ClmmSdkError> {
        let provider = self.eth_provider();
        let batch_id =
            submit_batch(provider, owner, self.constants().chain_id(), batch).await?;
        wait_for_receipts(provider, &batch_id, deadline).await
    }

    /// Balances of both sides read concurrently; a desired amount above the
    /// on-hand balance fails before any state-changing submission.
    async fn check_balances(
        &self,
        owner: Address,
        state: &PoolState,
        amount0: U256,
        amount1: U256
    ) -> Result<(), ClmmSdkError> {
        let provider = self.eth_provider();
        let (balance0, balance1) = tokio::try_join!(
            provider.token_balance(state.token0, owner),
            provider.token_balance(state.token1, owner)
        )?;

        for (token, desired, balance) in
            [(state.token0, amount0, balance0), (state.token1, amount1, balance1)]
        {
            if desired > balance {
                return Err(ClmmSdkError::input(format!(
                    "insufficient balance of {token}: need {desired}, hold {balance}"
                )));
            }
        }

        Ok(())
    }

    /// One approval per token whose current allowance to the position
    /// manager cannot cover the desired amount. Both allowance legs are read
    /// concurrently.
    async fn approval_instructions(
        &self,
        owner: Address,
        manager: Address,
        state: &PoolState,
        amount0: U256,
        amount1: U256
    ) -> Result<Vec<(Address, U256)>, ClmmSdkError> {
        let provider = self.eth_provider();
        let (allowance0, allowance1) = tokio::try_join!(
            provider.token_allowance(state.token0, owner, manager),
            provider.token_allowance(state.token1, owner, manager)
        )?;

        let mut approvals = Vec::new();
        if !amount0.is_zero() && allowance0 < amount0 {
            approvals.push((state.token0, amount0));
        }
        if !amount1.is_zero() && allowance1 < amount1 {
            approvals.push((state.token1, amount1));
        }

        Ok(approvals)
    }
}

/// Decodes the mutation instruction's simulated return data. The mutation is
/// always the last instruction of a dry-run batch.
fn decode_simulated<C: SolCall>(returns: &[alloy_primitives::Bytes]) -> Result<C::Return, ClmmSdkError> {
    let data = returns
        .last()
        .ok_or_else(|| ClmmSdkError::remote(ReadSite::Simulation, "empty dry-run result"))?;
    C::abi_decode_returns(data).map_err(|e| ClmmSdkError::remote(ReadSite::Simulation, e))
}

fn cap_to_u128(value: U256) -> u128 {
    value.min(U256::from(u128::MAX)).to::<u128>()
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{U160, address};
    use alloy_sol_types::SolValue;

    use super::*;

    const USDC: Address = address!("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
    const WETH: Address = address!("0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");

    fn pool_state(current_tick: i32) -> PoolState {
        PoolState {
            pool: address!("0x3333333333333333333333333333333333333333"),
            token0: USDC,
            token1: WETH,
            tick_spacing: 60,
            sqrt_price_x96: U160::from(1u8) << 96,
            current_tick
        }
    }

    #[test]
    fn test_remap_to_canonical() {
        // caller passed tokens in canonical order
        assert_eq!(remap_to_canonical(USDC, USDC, "a", "b"), ("a", "b"));
        // caller passed them flipped
        assert_eq!(remap_to_canonical(WETH, USDC, "a", "b"), ("b", "a"));
    }

    #[test]
    fn test_resolve_price_absolute() {
        let state = pool_state(0);
        let price = resolve_price(&PriceBound::Absolute("1850.25".to_string()), &state, 18, 6)
            .unwrap();
        assert_eq!(price, 1850.25);

        assert!(
            resolve_price(&PriceBound::Absolute("12,5".to_string()), &state, 18, 6).is_err()
        );
    }

    #[test]
    fn test_resolve_price_percent_from_current() {
        let state = pool_state(0);
        // tick 0 with equal decimals prices at exactly 1.0
        let below =
            resolve_price(&PriceBound::PercentFromCurrent(-500), &state, 18, 18).unwrap();
        let above =
            resolve_price(&PriceBound::PercentFromCurrent(500), &state, 18, 18).unwrap();

        assert!((below - 0.95).abs() < 1e-12);
        assert!((above - 1.05).abs() < 1e-12);
    }

    #[test]
    fn test_cap_to_u128_saturates() {
        assert_eq!(cap_to_u128(U256::from(42u8)), 42);
        assert_eq!(cap_to_u128(U256::MAX), u128::MAX);
        assert_eq!(cap_to_u128(U256::from(u128::MAX)), u128::MAX);
    }

    #[test]
    fn test_decode_simulated_reads_last_return() {
        // decrease returns (amount0, amount1) abi-encoded as a flat tuple
        let returns = vec![
            alloy_primitives::Bytes::new(),
            (U256::from(111u64), U256::from(222u64)).abi_encode().into(),
        ];

        let decoded =
            decode_simulated::<RangePositionManager::decreaseLiquidityCall>(&returns).unwrap();
        assert_eq!(decoded.amount0, U256::from(111u64));
        assert_eq!(decoded.amount1, U256::from(222u64));
    }

    #[test]
    fn test_decode_simulated_empty_is_a_simulation_error() {
        let err =
            decode_simulated::<RangePositionManager::decreaseLiquidityCall>(&[]).unwrap_err();
        assert!(matches!(err, ClmmSdkError::RemoteRead { site: ReadSite::Simulation, .. }));
    }

    #[test]
    fn test_parse_optional_amount() {
        assert_eq!(parse_optional_amount(None, 6).unwrap(), None);

        let parsed = parse_optional_amount(Some(&"1.5".to_string()), 6).unwrap().unwrap();
        assert_eq!(parsed.raw(), U256::from(1_500_000u64));

        assert!(parse_optional_amount(Some(&"bogus".to_string()), 6).is_err());
    }
}
