// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Constant-product AMM pair transformer.
//!
//! Interprets V2-style `Swap`/`Mint`/`Burn` logs. Swap amounts arrive as
//! four unsigned in/out legs; they are folded into taker-perspective signed
//! base/quote deltas so downstream consumers never re-derive direction.

use alloy_primitives::{Address, I256, U256};
use tracing::trace;

use crate::abi_events::{event_name, pair};
use crate::decoded::{DecodedLog, DecodedTransaction};
use crate::errors::ValidationError;
use crate::signal::{FeeCollectSignal, PoolBurnSignal, PoolMintSignal, PoolSwapSignal, Signal};

use super::{to_signed, Transformer};

/// Transformer for one constant-product pair contract.
#[derive(Debug, Clone)]
pub struct ConstantProductPoolTransformer {
    pool: Address,
    base_token: Address,
    quote_token: Address,
    /// Whether the pair's token0 is the base token
    base_is_token0: bool,
}

impl ConstantProductPoolTransformer {
    pub fn new(
        pool: Address,
        base_token: Address,
        quote_token: Address,
        base_is_token0: bool,
    ) -> Self {
        Self {
            pool,
            base_token,
            quote_token,
            base_is_token0,
        }
    }

    /// Map taker-perspective (token0, token1) deltas onto (base, quote).
    fn orient(&self, amount0: I256, amount1: I256) -> (I256, I256) {
        if self.base_is_token0 {
            (amount0, amount1)
        } else {
            (amount1, amount0)
        }
    }

    fn swap_signal(
        &self,
        log: &DecodedLog,
        tx: &DecodedTransaction,
    ) -> Result<Vec<Signal>, ValidationError> {
        let to = log.address_param("to")?;
        let amount0_in = log.u256_param("amount0In")?;
        let amount1_in = log.u256_param("amount1In")?;
        let amount0_out = log.u256_param("amount0Out")?;
        let amount1_out = log.u256_param("amount1Out")?;

        if amount0_in.is_zero()
            && amount1_in.is_zero()
            && amount0_out.is_zero()
            && amount1_out.is_zero()
        {
            return Err(ValidationError::transfer_shape(
                "swap log carries no amounts on either side",
            ));
        }

        self.check_swap_transfer_shape(log, tx)?;

        // Taker receives the out leg and pays the in leg
        let amount0 = to_signed(amount0_out, "amount0Out")?
            .checked_sub(to_signed(amount0_in, "amount0In")?)
            .ok_or_else(|| ValidationError::amount_overflow("amount0In"))?;
        let amount1 = to_signed(amount1_out, "amount1Out")?
            .checked_sub(to_signed(amount1_in, "amount1In")?)
            .ok_or_else(|| ValidationError::amount_overflow("amount1In"))?;

        let (base_amount, quote_amount) = self.orient(amount0, amount1);

        Ok(vec![Signal::PoolSwap(PoolSwapSignal {
            pool: self.pool,
            sender: to,
            base_token: self.base_token,
            quote_token: self.quote_token,
            base_amount,
            quote_amount,
            log_index: log.log_index,
        })])
    }

    /// A two-sided swap expects at least two matched transfers touching the
    /// pool. Skipped when the transaction batches several swaps against this
    /// pool, where per-swap attribution of transfers is not possible.
    fn check_swap_transfer_shape(
        &self,
        log: &DecodedLog,
        tx: &DecodedTransaction,
    ) -> Result<(), ValidationError> {
        let swap_name = event_name(pair::SWAP_EVENT_SIGNATURE);
        let swaps_against_pool = tx
            .logs
            .iter()
            .filter(|l| l.contract == self.pool && l.event_name == swap_name)
            .count();
        if swaps_against_pool > 1 {
            return Ok(());
        }

        let matched = tx
            .transfers_touching(self.pool)
            .filter(|t| t.token == self.base_token || t.token == self.quote_token)
            .count();
        if matched < 2 {
            return Err(ValidationError::transfer_shape(format!(
                "two-sided swap at log {} expects two matched transfers, found {}",
                log.log_index, matched
            )));
        }
        Ok(())
    }

    fn mint_signal(&self, log: &DecodedLog) -> Result<Vec<Signal>, ValidationError> {
        let sender = log.address_param("sender")?;
        let amount0 = log.u256_param("amount0")?;
        let amount1 = log.u256_param("amount1")?;
        let (base_amount, quote_amount) = orient_unsigned(self.base_is_token0, amount0, amount1);

        Ok(vec![Signal::PoolMint(PoolMintSignal {
            pool: self.pool,
            provider: sender,
            base_token: self.base_token,
            quote_token: self.quote_token,
            base_amount,
            quote_amount,
            // Pair Mint logs do not report the LP amount
            liquidity: U256::ZERO,
            bin_id: None,
            log_index: log.log_index,
        })])
    }

    fn burn_signal(&self, log: &DecodedLog) -> Result<Vec<Signal>, ValidationError> {
        let to = log.address_param("to")?;
        let amount0 = log.u256_param("amount0")?;
        let amount1 = log.u256_param("amount1")?;
        let (base_amount, quote_amount) = orient_unsigned(self.base_is_token0, amount0, amount1);

        Ok(vec![Signal::PoolBurn(PoolBurnSignal {
            pool: self.pool,
            provider: to,
            base_token: self.base_token,
            quote_token: self.quote_token,
            base_amount,
            quote_amount,
            liquidity: U256::ZERO,
            bin_id: None,
            log_index: log.log_index,
        })])
    }

    fn collect_signal(&self, log: &DecodedLog) -> Result<Vec<Signal>, ValidationError> {
        let recipient = log.address_param("recipient")?;
        let amount0 = log.u256_param("amount0")?;
        let amount1 = log.u256_param("amount1")?;
        let (base_amount, quote_amount) = orient_unsigned(self.base_is_token0, amount0, amount1);

        Ok(vec![Signal::FeeCollect(FeeCollectSignal {
            pool: self.pool,
            recipient,
            base_token: self.base_token,
            quote_token: self.quote_token,
            base_amount,
            quote_amount,
            log_index: log.log_index,
        })])
    }
}

fn orient_unsigned(base_is_token0: bool, amount0: U256, amount1: U256) -> (U256, U256) {
    if base_is_token0 {
        (amount0, amount1)
    } else {
        (amount1, amount0)
    }
}

impl Transformer for ConstantProductPoolTransformer {
    fn name(&self) -> &'static str {
        "constant_product_pool"
    }

    fn process_log(
        &self,
        log: &DecodedLog,
        tx: &DecodedTransaction,
    ) -> Result<Vec<Signal>, ValidationError> {
        if log.event_name == event_name(pair::SWAP_EVENT_SIGNATURE) {
            self.swap_signal(log, tx)
        } else if log.event_name == event_name(pair::MINT_EVENT_SIGNATURE) {
            self.mint_signal(log)
        } else if log.event_name == event_name(pair::BURN_EVENT_SIGNATURE) {
            self.burn_signal(log)
        } else if log.event_name == event_name(pair::COLLECT_EVENT_SIGNATURE) {
            self.collect_signal(log)
        } else {
            // Sync and other housekeeping events carry no balance movement
            trace!(
                pool = %self.pool,
                event = %log.event_name,
                "constant-product transformer ignoring event"
            );
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_chains::NamedChain;
    use alloy_primitives::{address, B256};
    use std::collections::HashMap;

    use crate::decoded::{DecodedValue, RawTransfer};

    const POOL: Address = address!("3333333333333333333333333333333333333333");
    const BASE: Address = address!("1111111111111111111111111111111111111111");
    const QUOTE: Address = address!("2222222222222222222222222222222222222222");
    const TAKER: Address = address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");

    fn transformer() -> ConstantProductPoolTransformer {
        ConstantProductPoolTransformer::new(POOL, BASE, QUOTE, true)
    }

    fn swap_log(log_index: u32, a0_in: u64, a1_in: u64, a0_out: u64, a1_out: u64) -> DecodedLog {
        let mut params = HashMap::new();
        params.insert("sender".to_string(), DecodedValue::Address(TAKER));
        params.insert("to".to_string(), DecodedValue::Address(TAKER));
        params.insert("amount0In".to_string(), DecodedValue::Uint256(U256::from(a0_in)));
        params.insert("amount1In".to_string(), DecodedValue::Uint256(U256::from(a1_in)));
        params.insert("amount0Out".to_string(), DecodedValue::Uint256(U256::from(a0_out)));
        params.insert("amount1Out".to_string(), DecodedValue::Uint256(U256::from(a1_out)));
        DecodedLog {
            contract: POOL,
            event_name: "Swap".to_string(),
            log_index,
            params,
        }
    }

    fn tx_for_swap(log: DecodedLog, base_to_pool: u64, quote_from_pool: u64) -> DecodedTransaction {
        let log_index = log.log_index;
        DecodedTransaction {
            chain: NamedChain::Mainnet,
            tx_hash: B256::repeat_byte(0x55),
            block_number: 10,
            timestamp: 1_700_000_000,
            from: TAKER,
            to: Some(POOL),
            logs: vec![log],
            transfers: vec![
                RawTransfer {
                    token: BASE,
                    from: TAKER,
                    to: POOL,
                    amount: U256::from(base_to_pool),
                    log_index: Some(log_index.saturating_sub(1)),
                },
                RawTransfer {
                    token: QUOTE,
                    from: POOL,
                    to: TAKER,
                    amount: U256::from(quote_from_pool),
                    log_index: Some(log_index + 1),
                },
            ],
        }
    }

    #[test]
    fn test_sell_swap_signed_taker_perspective() {
        // Taker pays 50 base (token0), receives 1000 quote (token1)
        let log = swap_log(1, 50, 0, 0, 1000);
        let tx = tx_for_swap(log.clone(), 50, 1000);

        let signals = transformer().process_log(&log, &tx).unwrap();
        assert_eq!(signals.len(), 1);
        let Signal::PoolSwap(swap) = &signals[0] else {
            panic!("expected a pool-swap signal");
        };
        assert_eq!(swap.base_amount, I256::try_from(-50i64).unwrap());
        assert_eq!(swap.quote_amount, I256::try_from(1000i64).unwrap());
        assert_eq!(swap.sender, TAKER);
    }

    #[test]
    fn test_base_orientation_respects_token1_config() {
        let transformer = ConstantProductPoolTransformer::new(POOL, BASE, QUOTE, false);
        // token1 is base: taker receives 50 base, pays 1000 quote (token0)
        let log = swap_log(1, 1000, 0, 0, 50);
        let tx = tx_for_swap(log.clone(), 1000, 50);

        let signals = transformer.process_log(&log, &tx).unwrap();
        let Signal::PoolSwap(swap) = &signals[0] else {
            panic!("expected a pool-swap signal");
        };
        assert_eq!(swap.base_amount, I256::try_from(50i64).unwrap());
        assert_eq!(swap.quote_amount, I256::try_from(-1000i64).unwrap());
    }

    #[test]
    fn test_all_zero_amounts_rejected() {
        let log = swap_log(1, 0, 0, 0, 0);
        let tx = tx_for_swap(log.clone(), 0, 0);

        let result = transformer().process_log(&log, &tx);
        assert!(matches!(result, Err(ValidationError::TransferShape { .. })));
    }

    #[test]
    fn test_missing_transfers_fail_shape_check() {
        let log = swap_log(1, 50, 0, 0, 1000);
        let mut tx = tx_for_swap(log.clone(), 50, 1000);
        tx.transfers.clear();

        let result = transformer().process_log(&log, &tx);
        assert!(matches!(result, Err(ValidationError::TransferShape { .. })));
    }

    #[test]
    fn test_batched_swaps_skip_shape_check() {
        let first = swap_log(1, 50, 0, 0, 1000);
        let second = swap_log(3, 20, 0, 0, 400);
        let mut tx = tx_for_swap(first.clone(), 50, 1000);
        tx.logs.push(second);
        tx.transfers.clear();

        // Two swaps against the same pool: per-swap transfer attribution is
        // not possible, so the shape check steps aside
        assert!(transformer().process_log(&first, &tx).is_ok());
    }

    #[test]
    fn test_mint_and_burn_signals() {
        let mut params = HashMap::new();
        params.insert("sender".to_string(), DecodedValue::Address(TAKER));
        params.insert("amount0".to_string(), DecodedValue::Uint256(U256::from(30u64)));
        params.insert("amount1".to_string(), DecodedValue::Uint256(U256::from(600u64)));
        let mint = DecodedLog {
            contract: POOL,
            event_name: "Mint".to_string(),
            log_index: 2,
            params: params.clone(),
        };
        let tx = tx_for_swap(swap_log(9, 1, 0, 0, 1), 1, 1);

        let signals = transformer().process_log(&mint, &tx).unwrap();
        assert!(matches!(
            &signals[0],
            Signal::PoolMint(m) if m.base_amount == U256::from(30u64) && m.provider == TAKER
        ));

        params.insert("to".to_string(), DecodedValue::Address(TAKER));
        let burn = DecodedLog {
            contract: POOL,
            event_name: "Burn".to_string(),
            log_index: 3,
            params,
        };
        let signals = transformer().process_log(&burn, &tx).unwrap();
        assert!(matches!(
            &signals[0],
            Signal::PoolBurn(b) if b.quote_amount == U256::from(600u64)
        ));
    }

    #[test]
    fn test_collect_becomes_fee_signal() {
        let mut params = HashMap::new();
        params.insert("sender".to_string(), DecodedValue::Address(TAKER));
        params.insert("recipient".to_string(), DecodedValue::Address(TAKER));
        params.insert("amount0".to_string(), DecodedValue::Uint256(U256::from(3u64)));
        params.insert("amount1".to_string(), DecodedValue::Uint256(U256::from(7u64)));
        let log = DecodedLog {
            contract: POOL,
            event_name: "Collect".to_string(),
            log_index: 4,
            params,
        };
        let tx = tx_for_swap(swap_log(9, 1, 0, 0, 1), 1, 1);

        let signals = transformer().process_log(&log, &tx).unwrap();
        assert!(matches!(
            &signals[0],
            Signal::FeeCollect(f) if f.recipient == TAKER
                && f.base_amount == U256::from(3u64)
                && f.quote_amount == U256::from(7u64)
        ));
    }

    #[test]
    fn test_unrelated_event_ignored() {
        let log = DecodedLog {
            contract: POOL,
            event_name: "Sync".to_string(),
            log_index: 5,
            params: HashMap::new(),
        };
        let tx = tx_for_swap(swap_log(1, 1, 0, 0, 1), 1, 1);
        assert!(transformer().process_log(&log, &tx).unwrap().is_empty());
    }
}
