// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Address-to-transformer dispatch.
//!
//! Built once per processing session from the [`PipelineConfig`]; lookups
//! during transformation are plain map reads with no locking.

use std::collections::HashMap;

use alloy_primitives::Address;
use tracing::info;

use crate::config::{ContractConfig, PipelineConfig, TransformerKind};
use crate::errors::ConfigError;
use crate::transformer::{
    BinLiquidityPoolTransformer, ConstantProductPoolTransformer, RouterTransformer,
    TokenTransformer, Transformer, WrappedNativeTransformer,
};

/// Maps configured contract addresses to their transformer instances.
pub struct TransformerRegistry {
    transformers: HashMap<Address, Box<dyn Transformer>>,
}

impl TransformerRegistry {
    /// Build the registry from a pipeline configuration.
    ///
    /// Pool kinds require their token parameters; a missing parameter fails
    /// the whole build rather than leaving a half-configured contract silently
    /// unhandled.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, ConfigError> {
        let mut transformers: HashMap<Address, Box<dyn Transformer>> = HashMap::new();

        for (address, contract) in &config.contracts {
            let transformer = build_transformer(*address, contract)?;
            transformers.insert(*address, transformer);
        }

        info!(
            chain = %config.chain,
            contract_count = transformers.len(),
            "transformer registry built"
        );

        Ok(Self { transformers })
    }

    /// Look up the transformer for a contract address.
    pub fn get(&self, address: &Address) -> Option<&dyn Transformer> {
        self.transformers.get(address).map(|t| t.as_ref())
    }

    /// Number of configured contracts.
    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }

    /// Iterate over configured addresses and their transformers.
    pub fn iter(&self) -> impl Iterator<Item = (&Address, &dyn Transformer)> {
        self.transformers.iter().map(|(a, t)| (a, t.as_ref()))
    }
}

impl std::fmt::Debug for TransformerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformerRegistry")
            .field("contract_count", &self.transformers.len())
            .finish()
    }
}

fn build_transformer(
    address: Address,
    contract: &ContractConfig,
) -> Result<Box<dyn Transformer>, ConfigError> {
    let transformer: Box<dyn Transformer> = match contract.kind {
        TransformerKind::Token => Box::new(TokenTransformer::new(address)),
        TransformerKind::WrappedNative => Box::new(WrappedNativeTransformer::new(address)),
        TransformerKind::ConstantProductPool => {
            let base = required(address, contract.base_token, "base_token")?;
            let quote = required(address, contract.quote_token, "quote_token")?;
            let base_is_token0 = required(address, contract.base_is_token0, "base_is_token0")?;
            Box::new(ConstantProductPoolTransformer::new(
                address,
                base,
                quote,
                base_is_token0,
            ))
        }
        TransformerKind::BinLiquidityPool => {
            let base = required(address, contract.base_token, "base_token")?;
            let quote = required(address, contract.quote_token, "quote_token")?;
            let base_is_x = required(address, contract.base_is_x, "base_is_x")?;
            Box::new(BinLiquidityPoolTransformer::new(address, base, quote, base_is_x))
        }
        TransformerKind::Router => Box::new(RouterTransformer::new(address)),
    };
    Ok(transformer)
}

fn required<T>(
    contract: Address,
    value: Option<T>,
    field: &'static str,
) -> Result<T, ConfigError> {
    value.ok_or_else(|| ConfigError::missing_parameter(contract, field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_chains::NamedChain;
    use alloy_primitives::address;

    use crate::config::PipelineConfigBuilder;

    const TARGET: Address = address!("1111111111111111111111111111111111111111");
    const QUOTE: Address = address!("2222222222222222222222222222222222222222");
    const POOL: Address = address!("3333333333333333333333333333333333333333");

    #[test]
    fn test_registry_builds_from_config() {
        let config = PipelineConfigBuilder::new(NamedChain::Mainnet, TARGET)
            .contract(TARGET, ContractConfig::token())
            .contract(POOL, ContractConfig::constant_product(TARGET, QUOTE, true))
            .build();

        let registry = TransformerRegistry::from_config(&config).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(&POOL).unwrap().name(), "constant_product_pool");
        assert!(registry.get(&QUOTE).is_none());
    }

    #[test]
    fn test_pool_without_tokens_fails_build() {
        let bad = ContractConfig {
            kind: TransformerKind::ConstantProductPool,
            base_token: None,
            quote_token: None,
            base_is_token0: None,
            base_is_x: None,
        };
        let config = PipelineConfigBuilder::new(NamedChain::Mainnet, TARGET)
            .contract(POOL, bad)
            .build();

        assert_eq!(
            TransformerRegistry::from_config(&config).unwrap_err(),
            ConfigError::missing_parameter(POOL, "base_token")
        );
    }

    #[test]
    fn test_bin_pool_requires_orientation() {
        let mut contract = ContractConfig::bin_liquidity(TARGET, QUOTE, true);
        contract.base_is_x = None;
        let config = PipelineConfigBuilder::new(NamedChain::Avalanche, TARGET)
            .contract(POOL, contract)
            .build();

        assert_eq!(
            TransformerRegistry::from_config(&config).unwrap_err(),
            ConfigError::missing_parameter(POOL, "base_is_x")
        );
    }
}
