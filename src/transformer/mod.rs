// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Transformer capability: per-contract log and transfer interpretation.
//!
//! A transformer is a polymorphic unit, one instance per configured contract
//! address, that turns decoded logs and raw transfers into provisional
//! signals. The set of variants is closed and statically known; the registry
//! selects the right instance per address.
//!
//! Transformers validate before interpreting and return typed results
//! instead of raising: the orchestrator collects validation failures into
//! the per-transaction context and keeps going, so one malformed log never
//! costs the rest of the transaction.

mod bin_liquidity;
mod constant_product;
mod router;
mod token;

pub use bin_liquidity::BinLiquidityPoolTransformer;
pub use constant_product::ConstantProductPoolTransformer;
pub use router::RouterTransformer;
pub use token::{TokenTransformer, WrappedNativeTransformer};

use alloy_primitives::{I256, U256};

use crate::decoded::{DecodedLog, DecodedTransaction, RawTransfer};
use crate::errors::ValidationError;
use crate::signal::Signal;

/// Core trait all transformer variants implement.
///
/// Both methods are pure with respect to the transaction: they read decoded
/// input and produce signals, never touching storage or shared state.
pub trait Transformer: Send + Sync {
    /// Unique name for this transformer kind (used in logging and error
    /// records).
    fn name(&self) -> &'static str;

    /// Interpret raw transfers addressed to/from this contract.
    ///
    /// Invoked once per transaction, before log interpretation, because
    /// transfer-derived signals are context for the log phase. The default
    /// produces nothing; token-like transformers override it.
    fn process_transfers(
        &self,
        transfers: &[RawTransfer],
        tx: &DecodedTransaction,
    ) -> Result<Vec<Signal>, ValidationError> {
        let _ = (transfers, tx);
        Ok(Vec::new())
    }

    /// Interpret one decoded log emitted by this contract.
    ///
    /// Returns every signal the log implies (bin-book deposits unpack into
    /// one signal per bin). Unrecognized event names produce an empty list,
    /// not an error.
    fn process_log(
        &self,
        log: &DecodedLog,
        tx: &DecodedTransaction,
    ) -> Result<Vec<Signal>, ValidationError>;
}

/// Convert an unsigned amount into the signed taker-delta range.
pub(crate) fn to_signed(amount: U256, field: &str) -> Result<I256, ValidationError> {
    I256::try_from(amount).map_err(|_| ValidationError::amount_overflow(field))
}
