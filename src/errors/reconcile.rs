// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for transfer reconciliation.

use alloy_primitives::Address;

/// Errors raised while attributing net target-token movement to events.
///
/// Reconciliation never drops amounts: on error the affected transfer is
/// skipped from netting and the error is recorded into the context so the
/// discrepancy is visible downstream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconciliationError {
    /// A raw transfer amount does not fit the signed accumulation range.
    #[error("transfer amount for {address} overflows the signed netting range")]
    AmountOverflow {
        /// Address whose net delta could not be accumulated
        address: Address,
    },
}
