// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Provisional signals produced by transformers.
//!
//! A signal is a per-log (or per-transfer) interpretation that has not yet
//! been finalized into a domain event. Transformers emit signals; the
//! pattern matcher and reconciliation turn them into events. Route signals
//! are the one exception: they only mark intent and never become events.

use alloy_primitives::{Address, I256, U256};

/// A provisional interpretation of one or more logs/transfers.
///
/// Each variant carries its originating log index (or indices) for
/// traceability and deterministic ordering.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// A plain token movement
    Transfer(TransferSignal),
    /// A swap against a liquidity pool, taker-perspective signed
    PoolSwap(PoolSwapSignal),
    /// Liquidity added to a pool
    PoolMint(PoolMintSignal),
    /// Liquidity removed from a pool
    PoolBurn(PoolBurnSignal),
    /// Accrued fees claimed from a pool
    FeeCollect(FeeCollectSignal),
    /// A swap routed through an aggregator; intent marker only
    Route(RouteSignal),
}

impl Signal {
    /// Originating log indices, for ordering and content-id derivation.
    pub fn log_indices(&self) -> Vec<u32> {
        match self {
            Signal::Transfer(s) => s.log_index.into_iter().collect(),
            Signal::PoolSwap(s) => vec![s.log_index],
            Signal::PoolMint(s) => vec![s.log_index],
            Signal::PoolBurn(s) => vec![s.log_index],
            Signal::FeeCollect(s) => vec![s.log_index],
            Signal::Route(s) => s.log_index.into_iter().collect(),
        }
    }

    /// Short name for logging.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Signal::Transfer(_) => "transfer",
            Signal::PoolSwap(_) => "pool_swap",
            Signal::PoolMint(_) => "pool_mint",
            Signal::PoolBurn(_) => "pool_burn",
            Signal::FeeCollect(_) => "fee_collect",
            Signal::Route(_) => "route",
        }
    }
}

/// A plain token movement between two addresses.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferSignal {
    pub token: Address,
    pub from: Address,
    pub to: Address,
    pub amount: U256,
    /// `None` for native value transfers
    pub log_index: Option<u32>,
}

/// A swap against a liquidity pool.
///
/// Amounts are signed from the taker's perspective: positive means the taker
/// received that token, negative means the taker paid it.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolSwapSignal {
    pub pool: Address,
    /// Trader-side address (the recipient of the swap output)
    pub sender: Address,
    pub base_token: Address,
    pub quote_token: Address,
    pub base_amount: I256,
    pub quote_amount: I256,
    pub log_index: u32,
}

/// Liquidity provided to a pool (one bin for bin-book pools).
#[derive(Debug, Clone, PartialEq)]
pub struct PoolMintSignal {
    pub pool: Address,
    pub provider: Address,
    pub base_token: Address,
    pub quote_token: Address,
    pub base_amount: U256,
    pub quote_amount: U256,
    /// LP amount, where the pool reports one; zero otherwise
    pub liquidity: U256,
    /// Discretized price bin, for bin-book pools
    pub bin_id: Option<u32>,
    pub log_index: u32,
}

/// Liquidity withdrawn from a pool (one bin for bin-book pools).
#[derive(Debug, Clone, PartialEq)]
pub struct PoolBurnSignal {
    pub pool: Address,
    pub provider: Address,
    pub base_token: Address,
    pub quote_token: Address,
    pub base_amount: U256,
    pub quote_amount: U256,
    pub liquidity: U256,
    pub bin_id: Option<u32>,
    pub log_index: u32,
}

/// Accrued fees claimed from a pool.
#[derive(Debug, Clone, PartialEq)]
pub struct FeeCollectSignal {
    pub pool: Address,
    pub recipient: Address,
    pub base_token: Address,
    pub quote_token: Address,
    pub base_amount: U256,
    pub quote_amount: U256,
    pub log_index: u32,
}

/// A swap routed through an aggregator contract.
///
/// Never finalized into an event; only tells the pattern matcher where the
/// ultimate taker is and which router the trade went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteSignal {
    pub router: Address,
    /// The address that entered the router call
    pub caller: Address,
    pub log_index: Option<u32>,
}
