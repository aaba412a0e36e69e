// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for transformer input validation.
//!
//! Transformers validate decoded logs and raw transfers before interpreting
//! them. A validation failure never aborts the transaction: the orchestrator
//! records it into the transform context and continues with the next log.

/// Errors that can occur while a transformer validates a decoded log or
/// transfer before producing signals.
///
/// These are returned from `Transformer::process_log` /
/// `Transformer::process_transfers` as typed results; the orchestrator
/// collects them into the per-transaction error list rather than propagating.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A decoded log is missing a required parameter.
    #[error("missing required field: {field}")]
    MissingField {
        /// Name of the missing parameter
        field: String,
    },

    /// A decoded parameter has an unexpected type.
    #[error("field '{field}' is not {expected}")]
    TypeMismatch {
        /// Name of the offending parameter
        field: String,
        /// The type the transformer expected
        expected: &'static str,
    },

    /// The raw transfers accompanying a log do not match the expected shape
    /// (e.g. a two-sided swap with fewer than two matched transfers).
    #[error("transfer shape mismatch: {details}")]
    TransferShape {
        /// Details about the mismatch
        details: String,
    },

    /// Per-bin amounts of a bin-liquidity log do not reconcile.
    #[error("bin consistency check failed: {details}")]
    BinMismatch {
        /// Details about which bins failed to reconcile
        details: String,
    },

    /// An unsigned amount does not fit the signed delta range.
    #[error("amount in field '{field}' overflows the signed range")]
    AmountOverflow {
        /// Name of the offending parameter
        field: String,
    },
}

impl ValidationError {
    /// Create a `MissingField` error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        ValidationError::MissingField {
            field: field.into(),
        }
    }

    /// Create a `TypeMismatch` error.
    pub fn type_mismatch(field: impl Into<String>, expected: &'static str) -> Self {
        ValidationError::TypeMismatch {
            field: field.into(),
            expected,
        }
    }

    /// Create a `TransferShape` error with details.
    pub fn transfer_shape(details: impl Into<String>) -> Self {
        ValidationError::TransferShape {
            details: details.into(),
        }
    }

    /// Create a `BinMismatch` error with details.
    pub fn bin_mismatch(details: impl Into<String>) -> Self {
        ValidationError::BinMismatch {
            details: details.into(),
        }
    }

    /// Create an `AmountOverflow` error for a field.
    pub fn amount_overflow(field: impl Into<String>) -> Self {
        ValidationError::AmountOverflow {
            field: field.into(),
        }
    }
}
