// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Pipeline orchestration.
//!
//! [`TransformManager`] owns the registry and configuration for one
//! processing session and drives each transaction through the phases in
//! order: structural validation, the transfer phase, the signal phase,
//! pattern matching, and reconciliation.
//!
//! Errors inside the pipeline are non-fatal by design: a transformer that
//! rejects a log costs that log's signals, nothing more. Only structurally
//! invalid input ([`InputError`]) aborts a transaction.

use std::collections::BTreeSet;

use alloy_primitives::Address;
use tracing::{info, trace, warn};

use crate::config::PipelineConfig;
use crate::context::{TransformContext, TransformOutcome, TransformStatus};
use crate::decoded::DecodedTransaction;
use crate::errors::{ConfigError, InputError};
use crate::registry::TransformerRegistry;
use crate::{matcher, reconcile, spans};

/// Drives decoded transactions through the transform pipeline.
#[derive(Debug)]
pub struct TransformManager {
    registry: TransformerRegistry,
    config: PipelineConfig,
}

impl TransformManager {
    /// Create a manager from an already-built registry.
    pub fn new(registry: TransformerRegistry, config: PipelineConfig) -> Self {
        Self { registry, config }
    }

    /// Build a manager, constructing the registry from the configuration.
    pub fn from_config(config: PipelineConfig) -> Result<Self, ConfigError> {
        let registry = TransformerRegistry::from_config(&config)?;
        Ok(Self::new(registry, config))
    }

    /// The configuration this session runs with.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Transform one decoded transaction into its domain events.
    ///
    /// Always runs to completion once validation passes: transformer and
    /// matcher errors are recorded into the outcome instead of propagating,
    /// and every event that could still be derived is returned.
    pub fn process_transaction(
        &self,
        tx: &DecodedTransaction,
    ) -> Result<TransformOutcome, InputError> {
        tx.validate()?;

        let span = spans::process_transaction(tx.chain, tx.tx_hash);
        let _guard = span.enter();

        let mut ctx = TransformContext::new(tx);
        self.run_transfer_phase(&mut ctx, tx);
        self.run_signal_phase(&mut ctx, tx);

        {
            let span = spans::pattern_match(ctx.signals.len());
            let _guard = span.enter();
            matcher::aggregate_trades(&mut ctx, &self.config);
            matcher::finalize_liquidity(&mut ctx);
            matcher::finalize_transfers(&mut ctx);
        }

        {
            let span = spans::reconcile(self.config.target_token);
            let _guard = span.enter();
            reconcile::reconcile(&mut ctx, tx, &self.config);
        }

        let outcome = ctx.finish();
        match outcome.status {
            TransformStatus::Success => info!(
                tx_hash = %tx.tx_hash,
                event_count = outcome.events.len(),
                position_count = outcome.positions.len(),
                "transaction transformed"
            ),
            TransformStatus::PartialFailure => warn!(
                tx_hash = %tx.tx_hash,
                event_count = outcome.events.len(),
                error_count = outcome.errors.len(),
                "transaction transformed with errors"
            ),
        }
        Ok(outcome)
    }

    /// Phase one: interpret raw transfers.
    ///
    /// Each configured contract that the transaction's transfers (or its
    /// call target) touch gets exactly one `process_transfers` call.
    fn run_transfer_phase(&self, ctx: &mut TransformContext, tx: &DecodedTransaction) {
        let span = spans::transfer_phase(tx.transfers.len());
        let _guard = span.enter();

        let mut candidates: BTreeSet<Address> = BTreeSet::new();
        for transfer in &tx.transfers {
            candidates.insert(transfer.token);
            candidates.insert(transfer.from);
            candidates.insert(transfer.to);
        }
        if let Some(to) = tx.to {
            candidates.insert(to);
        }

        for address in candidates {
            let Some(transformer) = self.registry.get(&address) else {
                continue;
            };
            match transformer.process_transfers(&tx.transfers, tx) {
                Ok(signals) => ctx.signals.extend(signals),
                Err(error) => ctx.record_error(None, transformer.name(), error),
            }
        }
    }

    /// Phase two: interpret decoded logs in ascending log-index order.
    fn run_signal_phase(&self, ctx: &mut TransformContext, tx: &DecodedTransaction) {
        let span = spans::signal_phase(tx.logs.len());
        let _guard = span.enter();

        for log in &tx.logs {
            let Some(transformer) = self.registry.get(&log.contract) else {
                trace!(
                    contract = %log.contract,
                    log_index = log.log_index,
                    "no transformer configured; skipping log"
                );
                continue;
            };
            match transformer.process_log(log, tx) {
                Ok(signals) => ctx.signals.extend(signals),
                Err(error) => ctx.record_error(Some(log.log_index), transformer.name(), error),
            }
        }
    }
}
