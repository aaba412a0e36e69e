// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Fungible-token transformers.
//!
//! [`TokenTransformer`] recognizes a token contract's own movements, which
//! the decoder has already captured as raw transfers; its log handling only
//! fills gaps where a `Transfer` log arrived without a matching raw
//! transfer. [`WrappedNativeTransformer`] additionally folds WETH9-style
//! `Deposit`/`Withdrawal` into transfers against the zero address so wrap
//! and unwrap flows participate in balance accounting.

use alloy_primitives::Address;
use tracing::trace;

use crate::abi_events::{erc20, event_name, wrapped_native};
use crate::decoded::{DecodedLog, DecodedTransaction, RawTransfer};
use crate::errors::ValidationError;
use crate::signal::{Signal, TransferSignal};

use super::Transformer;

/// Transformer for a plain fungible token contract.
#[derive(Debug, Clone)]
pub struct TokenTransformer {
    token: Address,
}

impl TokenTransformer {
    pub fn new(token: Address) -> Self {
        Self { token }
    }
}

impl Transformer for TokenTransformer {
    fn name(&self) -> &'static str {
        "token"
    }

    fn process_transfers(
        &self,
        transfers: &[RawTransfer],
        _tx: &DecodedTransaction,
    ) -> Result<Vec<Signal>, ValidationError> {
        Ok(transfers
            .iter()
            .filter(|t| t.token == self.token)
            .map(|t| {
                Signal::Transfer(TransferSignal {
                    token: t.token,
                    from: t.from,
                    to: t.to,
                    amount: t.amount,
                    log_index: t.log_index,
                })
            })
            .collect())
    }

    fn process_log(
        &self,
        log: &DecodedLog,
        tx: &DecodedTransaction,
    ) -> Result<Vec<Signal>, ValidationError> {
        transfer_log_to_signal(self.token, log, tx)
    }
}

/// Transformer for a wrapped native token (WETH9-style).
#[derive(Debug, Clone)]
pub struct WrappedNativeTransformer {
    token: Address,
}

impl WrappedNativeTransformer {
    pub fn new(token: Address) -> Self {
        Self { token }
    }
}

impl Transformer for WrappedNativeTransformer {
    fn name(&self) -> &'static str {
        "wrapped_native"
    }

    fn process_transfers(
        &self,
        transfers: &[RawTransfer],
        _tx: &DecodedTransaction,
    ) -> Result<Vec<Signal>, ValidationError> {
        Ok(transfers
            .iter()
            .filter(|t| t.token == self.token)
            .map(|t| {
                Signal::Transfer(TransferSignal {
                    token: t.token,
                    from: t.from,
                    to: t.to,
                    amount: t.amount,
                    log_index: t.log_index,
                })
            })
            .collect())
    }

    fn process_log(
        &self,
        log: &DecodedLog,
        tx: &DecodedTransaction,
    ) -> Result<Vec<Signal>, ValidationError> {
        if log.event_name == event_name(wrapped_native::DEPOSIT_EVENT_SIGNATURE) {
            // Wrap: native value became token balance; mint from zero
            let dst = log.address_param("dst")?;
            let wad = log.u256_param("wad")?;
            return Ok(vec![Signal::Transfer(TransferSignal {
                token: self.token,
                from: Address::ZERO,
                to: dst,
                amount: wad,
                log_index: Some(log.log_index),
            })]);
        }

        if log.event_name == event_name(wrapped_native::WITHDRAWAL_EVENT_SIGNATURE) {
            let src = log.address_param("src")?;
            let wad = log.u256_param("wad")?;
            return Ok(vec![Signal::Transfer(TransferSignal {
                token: self.token,
                from: src,
                to: Address::ZERO,
                amount: wad,
                log_index: Some(log.log_index),
            })]);
        }

        transfer_log_to_signal(self.token, log, tx)
    }
}

/// Handle an ERC-20 `Transfer` log, skipping logs the decoder already
/// captured as raw transfers (those were signaled in the transfer phase).
fn transfer_log_to_signal(
    token: Address,
    log: &DecodedLog,
    tx: &DecodedTransaction,
) -> Result<Vec<Signal>, ValidationError> {
    if log.event_name != event_name(erc20::TRANSFER_EVENT_SIGNATURE) {
        trace!(
            contract = %log.contract,
            event = %log.event_name,
            "token transformer ignoring unrelated event"
        );
        return Ok(Vec::new());
    }

    if tx.transfer_at_log(log.log_index).is_some() {
        // Already captured as a raw transfer in the transfer phase
        return Ok(Vec::new());
    }

    let from = log.address_param("from")?;
    let to = log.address_param("to")?;
    let value = log.u256_param("value")?;

    Ok(vec![Signal::Transfer(TransferSignal {
        token,
        from,
        to,
        amount: value,
        log_index: Some(log.log_index),
    })])
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_chains::NamedChain;
    use alloy_primitives::{address, B256, U256};
    use std::collections::HashMap;

    use crate::decoded::DecodedValue;

    const TOKEN: Address = address!("1111111111111111111111111111111111111111");
    const ALICE: Address = address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
    const BOB: Address = address!("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb");

    fn empty_tx() -> DecodedTransaction {
        DecodedTransaction {
            chain: NamedChain::Mainnet,
            tx_hash: B256::repeat_byte(0x44),
            block_number: 1,
            timestamp: 1_700_000_000,
            from: ALICE,
            to: Some(TOKEN),
            logs: Vec::new(),
            transfers: Vec::new(),
        }
    }

    fn transfer_log(log_index: u32) -> DecodedLog {
        let mut params = HashMap::new();
        params.insert("from".to_string(), DecodedValue::Address(ALICE));
        params.insert("to".to_string(), DecodedValue::Address(BOB));
        params.insert("value".to_string(), DecodedValue::Uint256(U256::from(100u64)));
        DecodedLog {
            contract: TOKEN,
            event_name: "Transfer".to_string(),
            log_index,
            params,
        }
    }

    #[test]
    fn test_raw_transfers_become_signals() {
        let transformer = TokenTransformer::new(TOKEN);
        let mut tx = empty_tx();
        tx.transfers = vec![RawTransfer {
            token: TOKEN,
            from: ALICE,
            to: BOB,
            amount: U256::from(100u64),
            log_index: Some(0),
        }];

        let signals = transformer.process_transfers(&tx.transfers, &tx).unwrap();
        assert_eq!(signals.len(), 1);
        assert!(matches!(&signals[0], Signal::Transfer(t) if t.amount == U256::from(100u64)));
    }

    #[test]
    fn test_other_tokens_transfers_ignored() {
        let transformer = TokenTransformer::new(TOKEN);
        let mut tx = empty_tx();
        tx.transfers = vec![RawTransfer {
            token: address!("9999999999999999999999999999999999999999"),
            from: ALICE,
            to: BOB,
            amount: U256::from(5u64),
            log_index: Some(0),
        }];

        let signals = transformer.process_transfers(&tx.transfers, &tx).unwrap();
        assert!(signals.is_empty());
    }

    #[test]
    fn test_transfer_log_skipped_when_raw_transfer_exists() {
        let transformer = TokenTransformer::new(TOKEN);
        let mut tx = empty_tx();
        tx.transfers = vec![RawTransfer {
            token: TOKEN,
            from: ALICE,
            to: BOB,
            amount: U256::from(100u64),
            log_index: Some(4),
        }];

        let signals = transformer.process_log(&transfer_log(4), &tx).unwrap();
        assert!(signals.is_empty());
    }

    #[test]
    fn test_transfer_log_fills_decoder_gap() {
        let transformer = TokenTransformer::new(TOKEN);
        let tx = empty_tx();

        let signals = transformer.process_log(&transfer_log(4), &tx).unwrap();
        assert_eq!(signals.len(), 1);
    }

    #[test]
    fn test_transfer_log_missing_value_is_rejected() {
        let transformer = TokenTransformer::new(TOKEN);
        let tx = empty_tx();
        let mut log = transfer_log(0);
        log.params.remove("value");

        assert_eq!(
            transformer.process_log(&log, &tx),
            Err(ValidationError::missing_field("value"))
        );
    }

    #[test]
    fn test_deposit_mints_from_zero_address() {
        let transformer = WrappedNativeTransformer::new(TOKEN);
        let tx = empty_tx();
        let mut params = HashMap::new();
        params.insert("dst".to_string(), DecodedValue::Address(ALICE));
        params.insert("wad".to_string(), DecodedValue::Uint256(U256::from(7u64)));
        let log = DecodedLog {
            contract: TOKEN,
            event_name: "Deposit".to_string(),
            log_index: 0,
            params,
        };

        let signals = transformer.process_log(&log, &tx).unwrap();
        assert_eq!(signals.len(), 1);
        assert!(
            matches!(&signals[0], Signal::Transfer(t) if t.from == Address::ZERO && t.to == ALICE)
        );
    }

    #[test]
    fn test_withdrawal_burns_to_zero_address() {
        let transformer = WrappedNativeTransformer::new(TOKEN);
        let tx = empty_tx();
        let mut params = HashMap::new();
        params.insert("src".to_string(), DecodedValue::Address(BOB));
        params.insert("wad".to_string(), DecodedValue::Uint256(U256::from(7u64)));
        let log = DecodedLog {
            contract: TOKEN,
            event_name: "Withdrawal".to_string(),
            log_index: 0,
            params,
        };

        let signals = transformer.process_log(&log, &tx).unwrap();
        assert!(
            matches!(&signals[0], Signal::Transfer(t) if t.from == BOB && t.to == Address::ZERO)
        );
    }
}
