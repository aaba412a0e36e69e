// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Shared helpers for txform integration tests.

#![allow(dead_code)]

use std::collections::HashMap;

use alloy_chains::NamedChain;
use alloy_primitives::{address, Address, B256, U256};
use txform::{
    ContractConfig, DecodedLog, DecodedTransaction, DecodedValue, PipelineConfig,
    PipelineConfigBuilder, RawTransfer, TransformManager,
};

/// Route pipeline tracing to the test harness; honors `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub const TARGET: Address = address!("1111111111111111111111111111111111111111");
pub const QUOTE: Address = address!("2222222222222222222222222222222222222222");
pub const POOL_A: Address = address!("3333333333333333333333333333333333333333");
pub const POOL_B: Address = address!("4444444444444444444444444444444444444444");
pub const BIN_POOL: Address = address!("5555555555555555555555555555555555555555");
pub const ROUTER: Address = address!("dddddddddddddddddddddddddddddddddddddddd");
pub const TAKER: Address = address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
pub const ALICE: Address = address!("eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee");
pub const BOB: Address = address!("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb");

/// A config covering the target token, quote token, two constant-product
/// pools, one bin pool, and a router.
pub fn test_config() -> PipelineConfig {
    PipelineConfigBuilder::new(NamedChain::Mainnet, TARGET)
        .contract(TARGET, ContractConfig::token())
        .contract(QUOTE, ContractConfig::token())
        .contract(POOL_A, ContractConfig::constant_product(TARGET, QUOTE, true))
        .contract(POOL_B, ContractConfig::constant_product(TARGET, QUOTE, true))
        .contract(BIN_POOL, ContractConfig::bin_liquidity(TARGET, QUOTE, true))
        .contract(ROUTER, ContractConfig::router())
        .build()
}

pub fn manager() -> TransformManager {
    TransformManager::from_config(test_config()).unwrap()
}

/// Builder for decoded transactions with ascending log indices.
pub struct TxBuilder {
    tx: DecodedTransaction,
}

impl TxBuilder {
    pub fn new() -> Self {
        Self {
            tx: DecodedTransaction {
                chain: NamedChain::Mainnet,
                tx_hash: B256::repeat_byte(0x42),
                block_number: 1_000_000,
                timestamp: 1_700_000_000,
                from: TAKER,
                to: Some(POOL_A),
                logs: Vec::new(),
                transfers: Vec::new(),
            },
        }
    }

    pub fn tx_hash(mut self, byte: u8) -> Self {
        self.tx.tx_hash = B256::repeat_byte(byte);
        self
    }

    pub fn from(mut self, from: Address) -> Self {
        self.tx.from = from;
        self
    }

    pub fn to(mut self, to: Address) -> Self {
        self.tx.to = Some(to);
        self
    }

    pub fn log(mut self, log: DecodedLog) -> Self {
        self.tx.logs.push(log);
        self
    }

    pub fn transfer(mut self, token: Address, from: Address, to: Address, amount: u64, log_index: u32) -> Self {
        self.tx.transfers.push(RawTransfer {
            token,
            from,
            to,
            amount: U256::from(amount),
            log_index: Some(log_index),
        });
        self
    }

    pub fn native_transfer(mut self, from: Address, to: Address, amount: u64) -> Self {
        self.tx.transfers.push(RawTransfer {
            token: Address::ZERO,
            from,
            to,
            amount: U256::from(amount),
            log_index: None,
        });
        self
    }

    pub fn build(self) -> DecodedTransaction {
        self.tx
    }
}

/// A constant-product Swap log. Amounts are (in0, in1, out0, out1).
pub fn swap_log(pool: Address, to: Address, log_index: u32, amounts: (u64, u64, u64, u64)) -> DecodedLog {
    let (in0, in1, out0, out1) = amounts;
    let mut params = HashMap::new();
    params.insert("sender".to_string(), DecodedValue::Address(to));
    params.insert("to".to_string(), DecodedValue::Address(to));
    params.insert("amount0In".to_string(), DecodedValue::Uint256(U256::from(in0)));
    params.insert("amount1In".to_string(), DecodedValue::Uint256(U256::from(in1)));
    params.insert("amount0Out".to_string(), DecodedValue::Uint256(U256::from(out0)));
    params.insert("amount1Out".to_string(), DecodedValue::Uint256(U256::from(out1)));
    DecodedLog {
        contract: pool,
        event_name: "Swap".to_string(),
        log_index,
        params,
    }
}

/// A bin-book deposit log with parallel id/amount arrays.
pub fn bin_deposit_log(
    pool: Address,
    to: Address,
    log_index: u32,
    ids: &[u32],
    xs: &[u64],
    ys: &[u64],
) -> DecodedLog {
    let mut params = HashMap::new();
    params.insert("sender".to_string(), DecodedValue::Address(to));
    params.insert("to".to_string(), DecodedValue::Address(to));
    params.insert(
        "ids".to_string(),
        DecodedValue::Array(ids.iter().map(|v| DecodedValue::Uint32(*v)).collect()),
    );
    params.insert(
        "amountsX".to_string(),
        DecodedValue::Array(xs.iter().map(|v| DecodedValue::Uint256(U256::from(*v))).collect()),
    );
    params.insert(
        "amountsY".to_string(),
        DecodedValue::Array(ys.iter().map(|v| DecodedValue::Uint256(U256::from(*v))).collect()),
    );
    DecodedLog {
        contract: pool,
        event_name: "DepositedToBins".to_string(),
        log_index,
        params,
    }
}
