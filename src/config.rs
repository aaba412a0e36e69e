// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Configuration for the transform pipeline
//!
//! A [`PipelineConfig`] is built once per processing session from external
//! contract-registry data: which contracts map to which transformer kinds,
//! which token this indexer instance tracks, and how tolerant the arbitrage
//! tie-break is. Use [`PipelineConfigBuilder`] for a fluent API.
//!
//! # Example
//!
//! ```
//! use alloy_chains::NamedChain;
//! use alloy_primitives::{address, U256};
//! use txform::{ArbitrageTolerance, ContractConfig, PipelineConfigBuilder};
//!
//! let target = address!("1111111111111111111111111111111111111111");
//! let quote = address!("2222222222222222222222222222222222222222");
//! let pool = address!("3333333333333333333333333333333333333333");
//!
//! let config = PipelineConfigBuilder::new(NamedChain::Base, target)
//!     .contract(target, ContractConfig::token())
//!     .contract(pool, ContractConfig::constant_product(target, quote, true))
//!     .arbitrage_tolerance(ArbitrageTolerance::Absolute(U256::from(1u64)))
//!     .build();
//! assert_eq!(config.contracts.len(), 2);
//! ```

use std::collections::HashMap;

use alloy_chains::NamedChain;
use alloy_primitives::{Address, I256, U256};
use serde::{Deserialize, Serialize};

use crate::types::amount::{u256_to_f64, TokenDecimals};

/// The transformer variant a contract address maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformerKind {
    /// Plain fungible token
    Token,
    /// Wrapped native token (WETH9-style deposit/withdrawal)
    WrappedNative,
    /// Constant-product AMM pair
    ConstantProductPool,
    /// Bin-based liquidity book pair
    BinLiquidityPool,
    /// Swap-routing aggregator
    Router,
}

/// Per-contract transformer parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractConfig {
    pub kind: TransformerKind,
    /// Base token for pool kinds
    #[serde(default)]
    pub base_token: Option<Address>,
    /// Quote token for pool kinds
    #[serde(default)]
    pub quote_token: Option<Address>,
    /// For constant-product pools: whether token0 is the base token
    #[serde(default)]
    pub base_is_token0: Option<bool>,
    /// For bin-book pools: whether tokenX is the base token
    #[serde(default)]
    pub base_is_x: Option<bool>,
}

impl ContractConfig {
    /// Configuration for a plain fungible token.
    pub fn token() -> Self {
        Self {
            kind: TransformerKind::Token,
            base_token: None,
            quote_token: None,
            base_is_token0: None,
            base_is_x: None,
        }
    }

    /// Configuration for a wrapped native token.
    pub fn wrapped_native() -> Self {
        Self {
            kind: TransformerKind::WrappedNative,
            ..Self::token()
        }
    }

    /// Configuration for a constant-product pool.
    pub fn constant_product(base_token: Address, quote_token: Address, base_is_token0: bool) -> Self {
        Self {
            kind: TransformerKind::ConstantProductPool,
            base_token: Some(base_token),
            quote_token: Some(quote_token),
            base_is_token0: Some(base_is_token0),
            base_is_x: None,
        }
    }

    /// Configuration for a bin-liquidity-book pool.
    pub fn bin_liquidity(base_token: Address, quote_token: Address, base_is_x: bool) -> Self {
        Self {
            kind: TransformerKind::BinLiquidityPool,
            base_token: Some(base_token),
            quote_token: Some(quote_token),
            base_is_token0: None,
            base_is_x: Some(base_is_x),
        }
    }

    /// Configuration for a swap-routing aggregator.
    pub fn router() -> Self {
        Self {
            kind: TransformerKind::Router,
            ..Self::token()
        }
    }
}

/// Tolerance policy for the round-trip arbitrage tie-break.
///
/// When one buy-direction and one sell-direction trade group exist in the
/// same transaction, their net base amounts are compared under this policy;
/// if they offset within tolerance, both trades are tagged as arbitrage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArbitrageTolerance {
    /// Absolute raw-amount tolerance: `|buy + sell| <= limit`
    Absolute(U256),
    /// Relative tolerance: `|buy + sell| / max(|buy|, |sell|) <= ratio`
    Relative(f64),
}

impl ArbitrageTolerance {
    /// Whether offsetting buy/sell sums net to a wash under this policy.
    pub fn is_wash(&self, buy: I256, sell: I256) -> bool {
        let Some(net) = buy.checked_add(sell) else {
            return false;
        };
        match self {
            ArbitrageTolerance::Absolute(limit) => net.unsigned_abs() <= *limit,
            ArbitrageTolerance::Relative(ratio) => {
                let largest = buy.unsigned_abs().max(sell.unsigned_abs());
                if largest.is_zero() {
                    return true;
                }
                u256_to_f64(net.unsigned_abs()) / u256_to_f64(largest) <= *ratio
            }
        }
    }
}

impl Default for ArbitrageTolerance {
    fn default() -> Self {
        // Exact wash only; callers widen this per target-token decimals
        ArbitrageTolerance::Absolute(U256::ZERO)
    }
}

/// Configuration for one processing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Chain this session processes
    pub chain: NamedChain,
    /// The single asset this indexer instance tracks balances for
    pub target_token: Address,
    /// Decimal precision of the target token
    pub target_decimals: TokenDecimals,
    /// Arbitrage tie-break tolerance
    pub arbitrage_tolerance: ArbitrageTolerance,
    /// Contract address → transformer mapping
    pub contracts: HashMap<Address, ContractConfig>,
}

impl PipelineConfig {
    /// Start building a configuration.
    pub fn builder(chain: NamedChain, target_token: Address) -> PipelineConfigBuilder {
        PipelineConfigBuilder::new(chain, target_token)
    }
}

/// Fluent builder for [`PipelineConfig`].
#[derive(Debug, Clone)]
pub struct PipelineConfigBuilder {
    chain: NamedChain,
    target_token: Address,
    target_decimals: TokenDecimals,
    arbitrage_tolerance: ArbitrageTolerance,
    contracts: HashMap<Address, ContractConfig>,
}

impl PipelineConfigBuilder {
    /// Create a builder for the given chain and target token.
    pub fn new(chain: NamedChain, target_token: Address) -> Self {
        Self {
            chain,
            target_token,
            target_decimals: TokenDecimals::STANDARD,
            arbitrage_tolerance: ArbitrageTolerance::default(),
            contracts: HashMap::new(),
        }
    }

    /// Set the target token's decimal precision.
    pub fn target_decimals(mut self, decimals: TokenDecimals) -> Self {
        self.target_decimals = decimals;
        self
    }

    /// Set the arbitrage tie-break tolerance.
    pub fn arbitrage_tolerance(mut self, tolerance: ArbitrageTolerance) -> Self {
        self.arbitrage_tolerance = tolerance;
        self
    }

    /// Register a contract with its transformer configuration.
    pub fn contract(mut self, address: Address, config: ContractConfig) -> Self {
        self.contracts.insert(address, config);
        self
    }

    /// Register many contracts at once.
    pub fn contracts<I>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (Address, ContractConfig)>,
    {
        self.contracts.extend(entries);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> PipelineConfig {
        PipelineConfig {
            chain: self.chain,
            target_token: self.target_token,
            target_decimals: self.target_decimals,
            arbitrage_tolerance: self.arbitrage_tolerance,
            contracts: self.contracts,
        }
    }
}
