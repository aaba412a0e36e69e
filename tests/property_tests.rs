// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for trade folding, reconciliation netting, and the
//! arbitrage tie-break.

mod helpers;

use alloy_primitives::{I256, U256};
use helpers::*;
use proptest::prelude::*;
use txform::{ArbitrageTolerance, DomainEvent, TransformStatus};

/// Per-hop swap amounts: base sold into the pool and quote received back.
fn arb_hops() -> impl Strategy<Value = Vec<(u64, u64)>> {
    prop::collection::vec((1u64..=1_000_000, 1u64..=1_000_000), 1..=5)
}

/// Build a transaction that sells target through `hops` pools in sequence,
/// alternating between the two configured pools.
fn sell_tx(hops: &[(u64, u64)]) -> txform::DecodedTransaction {
    let mut builder = TxBuilder::new();
    let mut log_index = 0u32;
    for (position, (base_in, quote_out)) in hops.iter().enumerate() {
        let pool = if position % 2 == 0 { POOL_A } else { POOL_B };
        builder = builder
            .transfer(TARGET, TAKER, pool, *base_in, log_index)
            .log(swap_log(pool, TAKER, log_index + 1, (*base_in, 0, 0, *quote_out)))
            .transfer(QUOTE, pool, TAKER, *quote_out, log_index + 2);
        log_index += 3;
    }
    builder.build()
}

proptest! {
    /// Same-direction swaps always fold into exactly one trade whose sums
    /// and count cover every constituent swap.
    #[test]
    fn prop_same_direction_swaps_fold_into_one_trade(hops in arb_hops()) {
        let outcome = manager().process_transaction(&sell_tx(&hops)).unwrap();
        prop_assert_eq!(outcome.status, TransformStatus::Success);

        let trades: Vec<_> = outcome
            .events
            .iter()
            .filter_map(|e| match e {
                DomainEvent::Trade(t) => Some(t),
                _ => None,
            })
            .collect();
        prop_assert_eq!(trades.len(), 1);

        let trade = trades[0];
        prop_assert_eq!(trade.swap_count as usize, hops.len());
        prop_assert_eq!(trade.swap_ids.len(), hops.len());

        let base_sum: i128 = hops.iter().map(|(b, _)| -(*b as i128)).sum();
        let quote_sum: i128 = hops.iter().map(|(_, q)| *q as i128).sum();
        prop_assert_eq!(trade.base_amount.as_i256(), I256::try_from(base_sum).unwrap());
        prop_assert_eq!(trade.quote_amount.as_i256(), I256::try_from(quote_sum).unwrap());

        let swap_count = outcome
            .events
            .iter()
            .filter(|e| matches!(e, DomainEvent::PoolSwap(_)))
            .count();
        prop_assert_eq!(swap_count, hops.len());
    }

    /// Every target-token movement in a fully recognized transaction is
    /// explained by events: reconciliation emits no positions.
    #[test]
    fn prop_recognized_movement_reconciles_to_zero(hops in arb_hops()) {
        let outcome = manager().process_transaction(&sell_tx(&hops)).unwrap();
        prop_assert!(outcome.positions.is_empty());
    }

    /// Absolute tolerance is the exact |buy + sell| boundary.
    #[test]
    fn prop_absolute_tolerance_boundary(
        buy in 1i64..=1_000_000,
        sell in 1i64..=1_000_000,
        limit in 0u64..=1_000,
    ) {
        let tolerance = ArbitrageTolerance::Absolute(U256::from(limit));
        let buy = I256::try_from(buy).unwrap();
        let sell = -I256::try_from(sell).unwrap();
        let net = (buy + sell).unsigned_abs();
        prop_assert_eq!(tolerance.is_wash(buy, sell), net <= U256::from(limit));
    }

    /// Reprocessing identical input yields identical content ids in
    /// identical order.
    #[test]
    fn prop_reprocessing_is_idempotent(hops in arb_hops()) {
        let tx = sell_tx(&hops);
        let first = manager().process_transaction(&tx).unwrap();
        let second = manager().process_transaction(&tx).unwrap();

        let ids = |outcome: &txform::TransformOutcome| -> Vec<String> {
            outcome
                .events
                .iter()
                .map(|e| e.content_id().to_string())
                .chain(outcome.positions.iter().map(|p| p.meta.content_id.to_string()))
                .collect()
        };
        prop_assert_eq!(ids(&first), ids(&second));
    }
}
