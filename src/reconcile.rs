// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Target-token reconciliation.
//!
//! After pattern matching, every raw target-token movement should be
//! explained by some emitted event: a transfer event, the pool side of a
//! swap or liquidity action, or the taker side of a trade. Whatever remains
//! unexplained per address becomes a [`Position`] delta, so fee siphons and
//! unrecognized contract behavior never silently lose amounts.

use std::collections::BTreeMap;

use alloy_primitives::{Address, I256};
use tracing::debug;

use crate::config::PipelineConfig;
use crate::context::TransformContext;
use crate::decoded::DecodedTransaction;
use crate::errors::ReconciliationError;
use crate::event::{DomainEvent, EventKind, LiquidityAction, Position, PositionSource};

/// Attribute net target-token movement to events and emit positions for the
/// remainder.
pub(crate) fn reconcile(
    ctx: &mut TransformContext,
    tx: &DecodedTransaction,
    config: &PipelineConfig,
) {
    let target = config.target_token;

    // Net observed movement per address, from raw transfers
    let mut net: BTreeMap<Address, I256> = BTreeMap::new();
    for transfer in &tx.transfers {
        if transfer.token != target {
            continue;
        }
        let Ok(amount) = I256::try_from(transfer.amount) else {
            ctx.record_error(
                transfer.log_index,
                "reconcile",
                ReconciliationError::AmountOverflow {
                    address: transfer.from,
                },
            );
            continue;
        };
        apply(&mut net, transfer.from, -amount);
        apply(&mut net, transfer.to, amount);
    }
    if net.is_empty() {
        return;
    }

    // Movement already explained by emitted events
    let mut explained: BTreeMap<Address, I256> = BTreeMap::new();
    for event in &ctx.events {
        match event {
            DomainEvent::Transfer(t) if t.token == target => {
                let Ok(amount) = I256::try_from(t.amount.as_u256()) else {
                    continue;
                };
                apply(&mut explained, t.from, -amount);
                apply(&mut explained, t.to, amount);
            }
            DomainEvent::PoolSwap(s) => {
                // The pool's delta mirrors the taker's
                if s.base_token == target {
                    apply(&mut explained, s.pool, -s.base_amount.as_i256());
                }
                if s.quote_token == target {
                    apply(&mut explained, s.pool, -s.quote_amount.as_i256());
                }
            }
            DomainEvent::Trade(t) if t.base_token == target => {
                if let Some(taker) = t.taker {
                    apply(&mut explained, taker, t.base_amount.as_i256());
                }
            }
            DomainEvent::Liquidity(l) => {
                let amount = if l.base_token == target {
                    I256::try_from(l.base_amount.as_u256()).ok()
                } else if l.quote_token == target {
                    I256::try_from(l.quote_amount.as_u256()).ok()
                } else {
                    None
                };
                let Some(amount) = amount else { continue };
                match l.action {
                    LiquidityAction::Add => {
                        apply(&mut explained, l.provider, -amount);
                        apply(&mut explained, l.pool, amount);
                    }
                    LiquidityAction::Remove => {
                        apply(&mut explained, l.pool, -amount);
                        apply(&mut explained, l.provider, amount);
                    }
                }
            }
            DomainEvent::Reward(r) => {
                let amount = if r.base_token == target {
                    I256::try_from(r.base_amount.as_u256()).ok()
                } else if r.quote_token == target {
                    I256::try_from(r.quote_amount.as_u256()).ok()
                } else {
                    None
                };
                let Some(amount) = amount else { continue };
                apply(&mut explained, r.pool, -amount);
                apply(&mut explained, r.recipient, amount);
            }
            _ => {}
        }
    }

    let mut position_count = 0usize;
    for (address, observed) in net {
        if address == Address::ZERO {
            // Mint/burn endpoint; no balance to reconcile
            continue;
        }
        let accounted = explained.get(&address).copied().unwrap_or(I256::ZERO);
        let remainder = observed.saturating_sub(accounted);
        if remainder.is_zero() {
            continue;
        }

        let mut key = Vec::with_capacity(40);
        key.extend_from_slice(address.as_slice());
        key.extend_from_slice(target.as_slice());
        let meta = ctx.meta_keyed(EventKind::Position, &key);

        ctx.positions.push(Position {
            meta,
            address,
            token: target,
            delta: crate::types::amount::SignedAmount::new(remainder),
            source: PositionSource::Reconciliation,
        });
        position_count += 1;
    }

    if position_count > 0 {
        debug!(position_count, token = %target, "reconciliation emitted positions");
    }
}

fn apply(deltas: &mut BTreeMap<Address, I256>, address: Address, amount: I256) {
    let entry = deltas.entry(address).or_insert(I256::ZERO);
    *entry = entry.saturating_add(amount);
}
