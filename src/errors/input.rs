// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for structurally invalid caller input.
//!
//! These are the only errors that stop processing before the per-transaction
//! state machine starts. Everything downstream of input validation is
//! recorded into the transform context instead of being raised.

/// Errors describing a decoded transaction that cannot be processed at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// Decoded logs are not in ascending log-index order.
    #[error("decoded logs are not sorted by log index (position {position})")]
    UnsortedLogs {
        /// Position in the log list where order breaks
        position: usize,
    },

    /// Two decoded logs share the same log index.
    #[error("duplicate log index {log_index} in decoded transaction")]
    DuplicateLogIndex {
        /// The duplicated log index
        log_index: u32,
    },
}
