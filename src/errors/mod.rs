// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the txform library.
//!
//! This module provides strongly-typed errors for all public APIs in txform.
//! It follows a hybrid approach:
//!
//! - **Module-specific errors** for fine-grained error handling
//!   ([`ValidationError`], [`MatchError`], etc.)
//! - **Unified error type** ([`TxformError`]) for convenience when you don't
//!   need to distinguish between error sources
//!
//! # Architecture
//!
//! Each major stage has its own error type:
//! - [`InputError`] - Structurally invalid caller input (the only fatal class)
//! - [`ConfigError`] - Invalid or incomplete pipeline configuration
//! - [`ValidationError`] - Malformed logs/transfers caught by transformers
//! - [`MatchError`] - Trade aggregation problems (ambiguous taker)
//! - [`ReconciliationError`] - Net-transfer attribution problems
//!
//! Apart from [`InputError`] and [`ConfigError`], nothing here is raised to
//! the caller. Errors are captured as [`TransformErrorRecord`]s inside the
//! transform context, with enough context (log index, source, cause) to be
//! actionable, and processing always runs to completion.

mod config;
mod input;
mod matcher;
mod reconcile;
mod validation;

pub use config::ConfigError;
pub use input::InputError;
pub use matcher::MatchError;
pub use reconcile::ReconciliationError;
pub use validation::ValidationError;

use serde::{Serialize, Serializer};

/// Unified error type for all txform operations.
///
/// All module-specific error types automatically convert to `TxformError`
/// via `From` implementations, so `?` propagates naturally where an error
/// actually crosses module boundaries (registry construction, error records).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TxformError {
    /// Structurally invalid caller input.
    #[error("input error: {0}")]
    Input(#[from] InputError),

    /// Invalid or incomplete pipeline configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A transformer rejected a log or transfer during validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The pattern matcher could not fully resolve a trade.
    #[error("trade aggregation error: {0}")]
    Match(#[from] MatchError),

    /// Reconciliation could not attribute a net transfer amount.
    #[error("reconciliation error: {0}")]
    Reconciliation(#[from] ReconciliationError),
}

/// A structured, non-fatal error captured during one transaction's transform.
///
/// Records carry the originating log index (where one exists), the name of
/// the component that produced the error, and the typed cause. They are part
/// of the per-transaction output: a transaction with a non-empty record list
/// completes with `PartialFailure` status but still returns every event that
/// could be derived.
#[derive(Debug, PartialEq, Serialize)]
pub struct TransformErrorRecord {
    /// Originating log index, if the error is tied to a specific log
    pub log_index: Option<u32>,
    /// Name of the transformer or pipeline stage that recorded the error
    pub source: String,
    /// The typed cause (serialized as its display string)
    #[serde(rename = "cause", serialize_with = "serialize_cause")]
    pub error: TxformError,
}

impl TransformErrorRecord {
    /// Create a new record.
    pub fn new(log_index: Option<u32>, source: impl Into<String>, error: impl Into<TxformError>) -> Self {
        Self {
            log_index,
            source: source.into(),
            error: error.into(),
        }
    }

    /// Human-readable cause string.
    pub fn cause(&self) -> String {
        self.error.to_string()
    }
}

fn serialize_cause<S: Serializer>(error: &TxformError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}
