// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Swap-router transformer.
//!
//! Routers only mark intent: a route signal tells the pattern matcher who
//! entered the swap path and through which aggregator, so the taker of a
//! multi-hop trade can be attributed. Route signals never become events.

use alloy_primitives::Address;

use crate::decoded::{DecodedLog, DecodedTransaction, RawTransfer};
use crate::errors::ValidationError;
use crate::signal::{RouteSignal, Signal};

use super::Transformer;

/// Transformer for a swap-routing aggregator contract.
#[derive(Debug, Clone)]
pub struct RouterTransformer {
    router: Address,
}

impl RouterTransformer {
    pub fn new(router: Address) -> Self {
        Self { router }
    }
}

impl Transformer for RouterTransformer {
    fn name(&self) -> &'static str {
        "router"
    }

    fn process_transfers(
        &self,
        _transfers: &[RawTransfer],
        tx: &DecodedTransaction,
    ) -> Result<Vec<Signal>, ValidationError> {
        // A direct call into the router marks the caller as the taker even
        // when the router emits no logs of its own
        if tx.to == Some(self.router) {
            return Ok(vec![Signal::Route(RouteSignal {
                router: self.router,
                caller: tx.from,
                log_index: None,
            })]);
        }
        Ok(Vec::new())
    }

    fn process_log(
        &self,
        log: &DecodedLog,
        tx: &DecodedTransaction,
    ) -> Result<Vec<Signal>, ValidationError> {
        // Router event schemas vary by aggregator; any log from the router
        // is routing intent regardless of its shape
        Ok(vec![Signal::Route(RouteSignal {
            router: self.router,
            caller: tx.from,
            log_index: Some(log.log_index),
        })])
    }
}
