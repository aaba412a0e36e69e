// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tracing span helpers for the transform pipeline.

use alloy_chains::NamedChain;
use alloy_primitives::{Address, B256};
use tracing::Span;

#[inline]
pub(crate) fn process_transaction(chain: NamedChain, tx_hash: B256) -> Span {
    tracing::debug_span!("txform.process_transaction", %chain, %tx_hash)
}

#[inline]
pub(crate) fn transfer_phase(transfer_count: usize) -> Span {
    tracing::trace_span!("txform.transfer_phase", transfer_count)
}

#[inline]
pub(crate) fn signal_phase(log_count: usize) -> Span {
    tracing::trace_span!("txform.signal_phase", log_count)
}

#[inline]
pub(crate) fn pattern_match(signal_count: usize) -> Span {
    tracing::trace_span!("txform.pattern_match", signal_count)
}

#[inline]
pub(crate) fn reconcile(target_token: Address) -> Span {
    tracing::trace_span!("txform.reconcile", %target_token)
}
