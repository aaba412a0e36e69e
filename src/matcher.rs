// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Pattern matching: signals to finalized events.
//!
//! Runs after both transformer phases, over the whole signal set of one
//! transaction. Folds same-direction pool swaps into trades, resolves the
//! taker, applies the arbitrage tie-break, finalizes liquidity and reward
//! events, and emits transfer events for movements no pool consumed.

use std::collections::{BTreeMap, BTreeSet};

use alloy_primitives::{Address, I256};
use tracing::{debug, trace};

use crate::config::PipelineConfig;
use crate::context::TransformContext;
use crate::errors::MatchError;
use crate::event::{
    DomainEvent, EventKind, LiquidityAction, LiquidityEvent, PoolSwapEvent, RewardEvent, Trade,
    TradeDirection, TradeType, TransferEvent,
};
use crate::signal::{PoolSwapSignal, Signal};
use crate::types::amount::{SignedAmount, TokenAmount};
use crate::types::content_id::ContentId;

/// Fold pool-swap signals into trades and emit both levels of fact.
///
/// Every swap becomes a [`PoolSwapEvent`]; same-direction swaps over the
/// same base token additionally fold into one [`Trade`] that owns them via
/// `swap_ids`. The swap keeps only a weak `trade_id` back-reference.
pub(crate) fn aggregate_trades(ctx: &mut TransformContext, config: &PipelineConfig) {
    let swaps: Vec<PoolSwapSignal> = ctx
        .signals
        .iter()
        .filter_map(|s| match s {
            Signal::PoolSwap(swap) => Some(swap.clone()),
            _ => None,
        })
        .collect();
    if swaps.is_empty() {
        return;
    }

    let (taker, router) = resolve_taker(ctx, &swaps);

    // Group same-direction swaps per base token; direction 0 = buy, 1 = sell
    let mut groups: BTreeMap<(Address, u8), Vec<usize>> = BTreeMap::new();
    for (position, swap) in swaps.iter().enumerate() {
        let direction = swap_direction(swap);
        let tag = match direction {
            TradeDirection::Buy => 0u8,
            TradeDirection::Sell => 1u8,
        };
        groups.entry((swap.base_token, tag)).or_default().push(position);
    }

    // Net base sums per (token, direction), for the arbitrage tie-break
    let mut net_by_group: BTreeMap<(Address, u8), I256> = BTreeMap::new();
    for ((token, tag), members) in &groups {
        let mut sum = I256::ZERO;
        for &position in members {
            sum = sum.saturating_add(swaps[position].base_amount);
        }
        net_by_group.insert((*token, *tag), sum);
    }

    let mut swap_events: Vec<PoolSwapEvent> = swaps
        .iter()
        .map(|swap| PoolSwapEvent {
            meta: ctx.meta(EventKind::PoolSwap, &[swap.log_index]),
            pool: swap.pool,
            sender: swap.sender,
            base_token: swap.base_token,
            quote_token: swap.quote_token,
            base_amount: SignedAmount::new(swap.base_amount),
            quote_amount: SignedAmount::new(swap.quote_amount),
            log_index: swap.log_index,
            trade_id: None,
        })
        .collect();

    let mut trades: Vec<(u32, Trade)> = Vec::new();
    for ((base_token, tag), members) in &groups {
        let direction = if *tag == 0 {
            TradeDirection::Buy
        } else {
            TradeDirection::Sell
        };

        let mut base_sum = I256::ZERO;
        let mut quote_sum = I256::ZERO;
        let mut overflowed = false;
        for &position in members {
            let swap = &swaps[position];
            match (
                base_sum.checked_add(swap.base_amount),
                quote_sum.checked_add(swap.quote_amount),
            ) {
                (Some(b), Some(q)) => {
                    base_sum = b;
                    quote_sum = q;
                }
                _ => {
                    overflowed = true;
                    base_sum = base_sum.saturating_add(swap.base_amount);
                    quote_sum = quote_sum.saturating_add(swap.quote_amount);
                }
            }
        }
        if overflowed {
            ctx.record_error(
                None,
                "pattern_match",
                MatchError::AmountOverflow {
                    swap_count: members.len(),
                },
            );
        }

        let trade_type = classify_trade(config, &net_by_group, *base_token, *tag);

        let mut log_indices: Vec<u32> = members.iter().map(|&p| swaps[p].log_index).collect();
        log_indices.sort_unstable();
        let meta = ctx.meta(EventKind::Trade, &log_indices);

        let mut members_by_log = members.clone();
        members_by_log.sort_unstable_by_key(|&p| swaps[p].log_index);
        let swap_ids: Vec<ContentId> = members_by_log
            .iter()
            .map(|&p| swap_events[p].meta.content_id)
            .collect();
        for &position in members {
            swap_events[position].trade_id = Some(meta.content_id);
        }

        let first_log = log_indices.first().copied().unwrap_or(0);
        trades.push((
            first_log,
            Trade {
                meta,
                taker,
                direction,
                trade_type,
                base_token: *base_token,
                base_amount: SignedAmount::new(base_sum),
                quote_amount: SignedAmount::new(quote_sum),
                router,
                swap_count: members.len() as u32,
                swap_ids,
            },
        ));
    }

    debug!(
        swap_count = swap_events.len(),
        trade_count = trades.len(),
        "folded pool swaps into trades"
    );

    // Swaps in log order, then trades ordered by first constituent swap
    ctx.events
        .extend(swap_events.into_iter().map(DomainEvent::PoolSwap));
    trades.sort_by_key(|(first_log, _)| *first_log);
    ctx.events
        .extend(trades.into_iter().map(|(_, t)| DomainEvent::Trade(t)));
}

/// Resolve the economic taker and routing aggregator for this transaction.
///
/// One distinct router means the route caller took the trade. Several
/// distinct routers cannot be attributed and leave the taker null. With no
/// router, a unique swap sender is the taker, falling back to the
/// transaction sender.
fn resolve_taker(
    ctx: &mut TransformContext,
    swaps: &[PoolSwapSignal],
) -> (Option<Address>, Option<Address>) {
    let mut routers: BTreeSet<Address> = BTreeSet::new();
    let mut caller = None;
    for signal in &ctx.signals {
        if let Signal::Route(route) = signal {
            routers.insert(route.router);
            caller = Some(route.caller);
        }
    }

    match routers.len() {
        0 => {
            let senders: BTreeSet<Address> = swaps.iter().map(|s| s.sender).collect();
            let taker = if senders.len() == 1 {
                senders.first().copied()
            } else {
                Some(ctx.tx_from)
            };
            (taker, None)
        }
        1 => (caller, routers.first().copied()),
        candidates => {
            ctx.record_error(None, "pattern_match", MatchError::AmbiguousTaker { candidates });
            (None, None)
        }
    }
}

/// Direction of one swap relative to its base token, taker perspective.
fn swap_direction(swap: &PoolSwapSignal) -> TradeDirection {
    if swap.base_amount.is_positive() {
        TradeDirection::Buy
    } else if swap.base_amount.is_negative() {
        TradeDirection::Sell
    } else if swap.quote_amount.is_negative() {
        // Zero base movement: paid quote means the taker was buying
        TradeDirection::Buy
    } else {
        TradeDirection::Sell
    }
}

/// Arbitrage tie-break: when one buy and one sell group exist for the same
/// base token and their nets offset within tolerance, both are arbitrage.
fn classify_trade(
    config: &PipelineConfig,
    net_by_group: &BTreeMap<(Address, u8), I256>,
    base_token: Address,
    tag: u8,
) -> TradeType {
    let opposite = if tag == 0 { 1 } else { 0 };
    let Some(other) = net_by_group.get(&(base_token, opposite)) else {
        return TradeType::Trade;
    };
    let own = net_by_group[&(base_token, tag)];
    let (buy, sell) = if tag == 0 { (own, *other) } else { (*other, own) };
    if config.arbitrage_tolerance.is_wash(buy, sell) {
        TradeType::Arbitrage
    } else {
        TradeType::Trade
    }
}

/// Finalize mint/burn signals into liquidity events and fee collections into
/// rewards.
pub(crate) fn finalize_liquidity(ctx: &mut TransformContext) {
    let mut events = Vec::new();
    for signal in &ctx.signals {
        match signal {
            Signal::PoolMint(mint) => events.push(DomainEvent::Liquidity(LiquidityEvent {
                meta: liquidity_meta(ctx, mint.log_index, mint.bin_id),
                pool: mint.pool,
                provider: mint.provider,
                action: LiquidityAction::Add,
                base_token: mint.base_token,
                quote_token: mint.quote_token,
                base_amount: TokenAmount::new(mint.base_amount),
                quote_amount: TokenAmount::new(mint.quote_amount),
                liquidity: TokenAmount::new(mint.liquidity),
                bin_id: mint.bin_id,
                log_index: mint.log_index,
            })),
            Signal::PoolBurn(burn) => events.push(DomainEvent::Liquidity(LiquidityEvent {
                meta: liquidity_meta(ctx, burn.log_index, burn.bin_id),
                pool: burn.pool,
                provider: burn.provider,
                action: LiquidityAction::Remove,
                base_token: burn.base_token,
                quote_token: burn.quote_token,
                base_amount: TokenAmount::new(burn.base_amount),
                quote_amount: TokenAmount::new(burn.quote_amount),
                liquidity: TokenAmount::new(burn.liquidity),
                bin_id: burn.bin_id,
                log_index: burn.log_index,
            })),
            Signal::FeeCollect(fee) => events.push(DomainEvent::Reward(RewardEvent {
                meta: ctx.meta(EventKind::Reward, &[fee.log_index]),
                pool: fee.pool,
                recipient: fee.recipient,
                base_token: fee.base_token,
                quote_token: fee.quote_token,
                base_amount: TokenAmount::new(fee.base_amount),
                quote_amount: TokenAmount::new(fee.quote_amount),
                log_index: fee.log_index,
            })),
            _ => {}
        }
    }
    ctx.events.extend(events);
}

/// One bin-book log unpacks into several per-bin events that share a log
/// index; the bin id joins the identity key to keep them distinct.
fn liquidity_meta(
    ctx: &TransformContext,
    log_index: u32,
    bin_id: Option<u32>,
) -> crate::event::EventMeta {
    match bin_id {
        None => ctx.meta(EventKind::Liquidity, &[log_index]),
        Some(bin) => {
            let mut key = [0u8; 8];
            key[..4].copy_from_slice(&log_index.to_be_bytes());
            key[4..].copy_from_slice(&bin.to_be_bytes());
            ctx.meta_keyed(EventKind::Liquidity, &key)
        }
    }
}

/// Emit transfer events for movements no pool interaction consumed.
///
/// Transfers touching a pool that produced a swap/mint/burn/fee signal are
/// that interaction's settlement legs; emitting them as standalone transfers
/// would double-count the movement against the pool events. The same holds
/// for transfers touching a router while a swap is present: a router-funded
/// trade settles taker→router→pool, and the trade already attributes the
/// taker's side.
pub(crate) fn finalize_transfers(ctx: &mut TransformContext) {
    let mut consumed: BTreeSet<Address> = BTreeSet::new();
    let mut has_swap = false;
    for signal in &ctx.signals {
        match signal {
            Signal::PoolSwap(s) => {
                has_swap = true;
                consumed.insert(s.pool);
            }
            Signal::PoolMint(s) => {
                consumed.insert(s.pool);
            }
            Signal::PoolBurn(s) => {
                consumed.insert(s.pool);
            }
            Signal::FeeCollect(s) => {
                consumed.insert(s.pool);
            }
            _ => {}
        }
    }
    if has_swap {
        for signal in &ctx.signals {
            if let Signal::Route(route) = signal {
                consumed.insert(route.router);
            }
        }
    }

    let mut events = Vec::new();
    let mut native_ordinal: u32 = 0;
    for signal in &ctx.signals {
        let Signal::Transfer(transfer) = signal else {
            continue;
        };
        if consumed.contains(&transfer.from) || consumed.contains(&transfer.to) {
            trace!(
                token = %transfer.token,
                from = %transfer.from,
                to = %transfer.to,
                "transfer consumed by pool or router settlement"
            );
            continue;
        }

        let meta = match transfer.log_index {
            Some(log_index) => ctx.meta(EventKind::Transfer, &[log_index]),
            None => {
                // Native transfers have no log anchor; key by endpoints and
                // an ordinal so repeated identical movements stay distinct
                let mut key = Vec::with_capacity(44);
                key.extend_from_slice(transfer.from.as_slice());
                key.extend_from_slice(transfer.to.as_slice());
                key.extend_from_slice(&native_ordinal.to_be_bytes());
                native_ordinal += 1;
                ctx.meta_keyed(EventKind::Transfer, &key)
            }
        };

        events.push(DomainEvent::Transfer(TransferEvent {
            meta,
            token: transfer.token,
            from: transfer.from,
            to: transfer.to,
            amount: TokenAmount::new(transfer.amount),
            log_index: transfer.log_index,
        }));
    }
    ctx.events.extend(events);
}
