// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Per-transaction transform state.
//!
//! A [`TransformContext`] accumulates everything produced while one
//! transaction moves through the pipeline: provisional signals, finalized
//! events, reconciliation positions, and non-fatal error records. It is
//! created fresh per transaction and consumed by [`TransformContext::finish`];
//! nothing in it outlives the transaction.

use alloy_chains::NamedChain;
use alloy_primitives::{Address, B256};
use serde::Serialize;

use crate::decoded::DecodedTransaction;
use crate::errors::{TransformErrorRecord, TxformError};
use crate::event::{DomainEvent, EventKind, EventMeta, Position};
use crate::signal::Signal;
use crate::types::content_id::ContentId;

/// Whether a transaction's transform completed cleanly.
///
/// Determined solely by the error-record list: any recorded error means
/// partial failure, even when every event was still derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformStatus {
    /// Every log and transfer was interpreted without error
    Success,
    /// Some inputs could not be interpreted; derived events are still valid
    PartialFailure,
}

/// The finished output for one transaction.
#[derive(Debug, PartialEq, Serialize)]
pub struct TransformOutcome {
    /// Finalized domain events in deterministic order
    pub events: Vec<DomainEvent>,
    /// Reconciliation positions, sorted by address
    pub positions: Vec<Position>,
    /// Non-fatal errors recorded along the way
    pub errors: Vec<TransformErrorRecord>,
    /// Completion status, derived from `errors`
    pub status: TransformStatus,
}

impl TransformOutcome {
    /// Total number of facts produced (events plus positions).
    pub fn fact_count(&self) -> usize {
        self.events.len() + self.positions.len()
    }
}

/// Mutable state threaded through one transaction's transform.
#[derive(Debug)]
pub struct TransformContext {
    pub chain: NamedChain,
    pub tx_hash: B256,
    pub block_number: u64,
    pub timestamp: u64,
    /// External sender of the transaction
    pub tx_from: Address,
    /// Provisional signals collected during the transfer and signal phases
    pub signals: Vec<Signal>,
    /// Events finalized by the pattern matcher
    pub events: Vec<DomainEvent>,
    /// Positions produced by reconciliation
    pub positions: Vec<Position>,
    /// Non-fatal errors recorded by any stage
    pub errors: Vec<TransformErrorRecord>,
}

impl TransformContext {
    /// Start a fresh context for one decoded transaction.
    pub fn new(tx: &DecodedTransaction) -> Self {
        Self {
            chain: tx.chain,
            tx_hash: tx.tx_hash,
            block_number: tx.block_number,
            timestamp: tx.timestamp,
            tx_from: tx.from,
            signals: Vec::new(),
            events: Vec::new(),
            positions: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Event metadata for a kind derived from specific log indices.
    pub fn meta(&self, kind: EventKind, log_indices: &[u32]) -> EventMeta {
        EventMeta {
            content_id: ContentId::derive(self.tx_hash, kind.tag(), log_indices),
            chain: self.chain,
            tx_hash: self.tx_hash,
            block_number: self.block_number,
            timestamp: self.timestamp,
        }
    }

    /// Event metadata for a kind with no log anchoring, keyed by
    /// caller-supplied bytes instead.
    pub fn meta_keyed(&self, kind: EventKind, key: &[u8]) -> EventMeta {
        EventMeta {
            content_id: ContentId::derive_keyed(self.tx_hash, kind.tag(), key),
            chain: self.chain,
            tx_hash: self.tx_hash,
            block_number: self.block_number,
            timestamp: self.timestamp,
        }
    }

    /// Record a non-fatal error and keep going.
    pub fn record_error(
        &mut self,
        log_index: Option<u32>,
        source: impl Into<String>,
        error: impl Into<TxformError>,
    ) {
        self.errors
            .push(TransformErrorRecord::new(log_index, source, error));
    }

    /// Consume the context into the transaction's outcome.
    pub fn finish(self) -> TransformOutcome {
        let status = if self.errors.is_empty() {
            TransformStatus::Success
        } else {
            TransformStatus::PartialFailure
        };
        TransformOutcome {
            events: self.events,
            positions: self.positions,
            errors: self.errors,
            status,
        }
    }
}
