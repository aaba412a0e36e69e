// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for trade aggregation.

/// Errors raised while folding pool-swap signals into trades.
///
/// None of these abort processing: the pattern matcher records them into the
/// transform context and still emits the affected trade (with a null taker).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    /// Multiple unrelated route signals were present and no taker could be
    /// attributed to the transaction's trades.
    #[error("ambiguous taker: {candidates} distinct routers in one transaction")]
    AmbiguousTaker {
        /// Number of distinct router addresses seen
        candidates: usize,
    },

    /// Summing constituent swap amounts overflowed the signed range.
    #[error("trade amount accumulation overflowed while folding {swap_count} swaps")]
    AmountOverflow {
        /// Number of swaps in the group being folded
        swap_count: usize,
    },
}
