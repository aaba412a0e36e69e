// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for pipeline configuration.

use alloy_primitives::Address;

/// Errors raised while building the transformer registry from configuration.
///
/// Configuration is validated once per processing session, before any
/// transaction is handed to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A contract entry is missing a parameter its transformer kind requires.
    #[error("contract {contract} is missing required parameter '{field}'")]
    MissingParameter {
        /// The contract address whose entry is incomplete
        contract: Address,
        /// Name of the missing parameter
        field: &'static str,
    },
}

impl ConfigError {
    /// Create a `MissingParameter` error.
    pub fn missing_parameter(contract: Address, field: &'static str) -> Self {
        ConfigError::MissingParameter { contract, field }
    }
}
