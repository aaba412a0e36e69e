// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Finalized domain events.
//!
//! A domain event is a uniquely identified business-level fact derived from
//! one transaction: a trade, a pool swap, a transfer, a liquidity action, a
//! reward claim, or a reconciliation position. Every event carries an
//! [`EventMeta`] whose [`ContentId`] is the idempotency key the external
//! writer upserts by.

use alloy_chains::NamedChain;
use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};

use crate::types::amount::{SignedAmount, TokenAmount};
use crate::types::content_id::ContentId;

/// Discriminant over the closed set of event kinds.
///
/// The numeric tag feeds content-id derivation and must stay stable across
/// releases; reusing a tag for a new kind would break idempotent upserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Trade,
    PoolSwap,
    Transfer,
    Position,
    Liquidity,
    Reward,
}

impl EventKind {
    /// Stable one-byte tag for content-id derivation.
    pub const fn tag(&self) -> u8 {
        match self {
            EventKind::Trade => 1,
            EventKind::PoolSwap => 2,
            EventKind::Transfer => 3,
            EventKind::Position => 4,
            EventKind::Liquidity => 5,
            EventKind::Reward => 6,
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EventKind::Trade => "trade",
            EventKind::PoolSwap => "pool_swap",
            EventKind::Transfer => "transfer",
            EventKind::Position => "position",
            EventKind::Liquidity => "liquidity",
            EventKind::Reward => "reward",
        };
        f.write_str(name)
    }
}

/// Fields common to every domain event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMeta {
    /// Deterministic identifier; the writer's upsert key
    pub content_id: ContentId,
    /// Chain the transaction was observed on
    pub chain: NamedChain,
    /// Originating transaction hash
    pub tx_hash: B256,
    /// Block number of the originating transaction
    pub block_number: u64,
    /// Block timestamp (unix seconds)
    pub timestamp: u64,
}

/// Economic direction of a trade relative to the base token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeDirection {
    /// Taker acquired base tokens
    Buy,
    /// Taker disposed of base tokens
    Sell,
}

impl std::fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeDirection::Buy => f.write_str("buy"),
            TradeDirection::Sell => f.write_str("sell"),
        }
    }
}

/// Classification of a folded trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeType {
    /// Ordinary directional trade
    Trade,
    /// Offsetting buy/sell pair that nets to (approximately) zero
    Arbitrage,
}

/// Which way a liquidity event moved tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiquidityAction {
    Add,
    Remove,
}

/// How a position delta was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionSource {
    /// Net target-token movement that no emitted event explains
    Reconciliation,
}

/// One or more same-direction pool swaps folded into a single economic fact.
///
/// A trade owns its constituent swaps: `swap_ids` lists their content ids,
/// and each constituent [`PoolSwapEvent`] holds only a nullable `trade_id`
/// back-reference, never a live reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub meta: EventMeta,
    /// Resolved economic counterparty; `None` when attribution failed
    pub taker: Option<Address>,
    pub direction: TradeDirection,
    pub trade_type: TradeType,
    pub base_token: Address,
    /// Net signed base amount across constituent swaps (taker perspective)
    pub base_amount: SignedAmount,
    /// Net signed quote amount across constituent swaps (taker perspective)
    pub quote_amount: SignedAmount,
    /// Aggregator the trade was routed through, if any
    pub router: Option<Address>,
    /// Number of constituent pool swaps
    pub swap_count: u32,
    /// Content ids of the constituent pool-swap events
    pub swap_ids: Vec<ContentId>,
}

/// A single swap against one pool. Pool-level facts are never withheld, even
/// when the swap is folded into a trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolSwapEvent {
    pub meta: EventMeta,
    pub pool: Address,
    /// Trader-side address for this hop
    pub sender: Address,
    pub base_token: Address,
    pub quote_token: Address,
    pub base_amount: SignedAmount,
    pub quote_amount: SignedAmount,
    pub log_index: u32,
    /// Weak back-reference to the owning trade
    pub trade_id: Option<ContentId>,
}

/// A plain token movement not consumed by any pool interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferEvent {
    pub meta: EventMeta,
    pub token: Address,
    pub from: Address,
    pub to: Address,
    pub amount: TokenAmount,
    /// `None` for native value transfers
    pub log_index: Option<u32>,
}

/// Liquidity added to or removed from a pool (one bin for bin-book pools).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidityEvent {
    pub meta: EventMeta,
    pub pool: Address,
    pub provider: Address,
    pub action: LiquidityAction,
    pub base_token: Address,
    pub quote_token: Address,
    pub base_amount: TokenAmount,
    pub quote_amount: TokenAmount,
    /// LP amount, where the pool reports one
    pub liquidity: TokenAmount,
    pub bin_id: Option<u32>,
    pub log_index: u32,
}

/// Accrued fees claimed from a pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardEvent {
    pub meta: EventMeta,
    pub pool: Address,
    pub recipient: Address,
    pub base_token: Address,
    pub quote_token: Address,
    pub base_amount: TokenAmount,
    pub quote_amount: TokenAmount,
    pub log_index: u32,
}

/// A signed balance delta for a (user, token) pair derived from
/// reconciliation.
///
/// Positions capture target-token movement that no emitted event explains
/// (fee siphons, unrecognized contract behavior), so balance accounting
/// never silently loses amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub meta: EventMeta,
    pub address: Address,
    pub token: Address,
    pub delta: SignedAmount,
    pub source: PositionSource,
}

/// The closed set of domain-event variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DomainEvent {
    Trade(Trade),
    PoolSwap(PoolSwapEvent),
    Transfer(TransferEvent),
    Liquidity(LiquidityEvent),
    Reward(RewardEvent),
    Position(Position),
}

impl DomainEvent {
    /// Common metadata for any event kind.
    pub fn meta(&self) -> &EventMeta {
        match self {
            DomainEvent::Trade(e) => &e.meta,
            DomainEvent::PoolSwap(e) => &e.meta,
            DomainEvent::Transfer(e) => &e.meta,
            DomainEvent::Liquidity(e) => &e.meta,
            DomainEvent::Reward(e) => &e.meta,
            DomainEvent::Position(e) => &e.meta,
        }
    }

    /// The event's idempotency key.
    pub fn content_id(&self) -> ContentId {
        self.meta().content_id
    }

    /// The event's kind discriminant.
    pub fn kind(&self) -> EventKind {
        match self {
            DomainEvent::Trade(_) => EventKind::Trade,
            DomainEvent::PoolSwap(_) => EventKind::PoolSwap,
            DomainEvent::Transfer(_) => EventKind::Transfer,
            DomainEvent::Liquidity(_) => EventKind::Liquidity,
            DomainEvent::Reward(_) => EventKind::Reward,
            DomainEvent::Position(_) => EventKind::Position,
        }
    }
}
