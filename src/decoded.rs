// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Decoder-facing input contract.
//!
//! The decoder (an external collaborator) turns raw blocks into one
//! [`DecodedTransaction`] per transaction: an ordered list of decoded logs
//! plus the raw token movements observed in the receipt. Everything the
//! transform core needs is supplied here synchronously before a run starts;
//! the core performs no I/O of its own.

use std::collections::HashMap;

use alloy_chains::NamedChain;
use alloy_primitives::{Address, B256, I256, U256};
use serde::{Deserialize, Serialize};

use crate::errors::{InputError, ValidationError};

/// A decoded value from an event parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DecodedValue {
    Address(Address),
    Uint256(U256),
    Int256(I256),
    Uint64(u64),
    Uint32(u32),
    Int32(i32),
    Bool(bool),
    Bytes32(B256),
    Bytes(Vec<u8>),
    String(String),
    /// Array of values
    Array(Vec<DecodedValue>),
}

impl DecodedValue {
    /// Try to get as an address.
    pub fn as_address(&self) -> Option<Address> {
        match self {
            DecodedValue::Address(a) => Some(*a),
            _ => None,
        }
    }

    /// Try to get as U256 (widening from smaller unsigned values).
    pub fn as_u256(&self) -> Option<U256> {
        match self {
            DecodedValue::Uint256(v) => Some(*v),
            DecodedValue::Uint64(v) => Some(U256::from(*v)),
            DecodedValue::Uint32(v) => Some(U256::from(*v)),
            _ => None,
        }
    }

    /// Try to get as I256 (widening from smaller signed values).
    pub fn as_i256(&self) -> Option<I256> {
        match self {
            DecodedValue::Int256(v) => Some(*v),
            DecodedValue::Int32(v) => Some(I256::try_from(*v).unwrap_or_default()),
            _ => None,
        }
    }

    /// Try to get as u64.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            DecodedValue::Uint64(v) => Some(*v),
            DecodedValue::Uint32(v) => Some(*v as u64),
            DecodedValue::Uint256(v) => (*v).try_into().ok(),
            _ => None,
        }
    }

    /// Try to get as u32 (bin ids, fee tiers).
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            DecodedValue::Uint32(v) => Some(*v),
            DecodedValue::Uint64(v) => (*v).try_into().ok(),
            DecodedValue::Uint256(v) => (*v).try_into().ok(),
            _ => None,
        }
    }

    /// Try to get as i32 (tick values).
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            DecodedValue::Int32(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DecodedValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as bytes32.
    pub fn as_bytes32(&self) -> Option<B256> {
        match self {
            DecodedValue::Bytes32(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as an array slice.
    pub fn as_array(&self) -> Option<&[DecodedValue]> {
        match self {
            DecodedValue::Array(values) => Some(values),
            _ => None,
        }
    }
}

/// A decoded event log ready for transformation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedLog {
    /// Emitting contract address
    pub contract: Address,
    /// Short event name (e.g. "Swap", "Transfer")
    pub event_name: String,
    /// Position within the transaction's receipt
    pub log_index: u32,
    /// Decoded parameter values keyed by field name
    pub params: HashMap<String, DecodedValue>,
}

impl DecodedLog {
    /// Get a parameter by name, returning an error if missing.
    pub fn get(&self, name: &str) -> Result<&DecodedValue, ValidationError> {
        self.params
            .get(name)
            .ok_or_else(|| ValidationError::missing_field(name))
    }

    /// Try to get a parameter by name.
    pub fn try_get(&self, name: &str) -> Option<&DecodedValue> {
        self.params.get(name)
    }

    /// Get a parameter as an address.
    pub fn address_param(&self, name: &str) -> Result<Address, ValidationError> {
        self.get(name)?
            .as_address()
            .ok_or_else(|| ValidationError::type_mismatch(name, "address"))
    }

    /// Get a parameter as a U256 amount.
    pub fn u256_param(&self, name: &str) -> Result<U256, ValidationError> {
        self.get(name)?
            .as_u256()
            .ok_or_else(|| ValidationError::type_mismatch(name, "uint256"))
    }

    /// Get a parameter as a bool.
    pub fn bool_param(&self, name: &str) -> Result<bool, ValidationError> {
        self.get(name)?
            .as_bool()
            .ok_or_else(|| ValidationError::type_mismatch(name, "bool"))
    }

    /// Get a parameter as a u32.
    pub fn u32_param(&self, name: &str) -> Result<u32, ValidationError> {
        self.get(name)?
            .as_u32()
            .ok_or_else(|| ValidationError::type_mismatch(name, "uint32"))
    }

    /// Get an array parameter as u32 elements.
    pub fn u32_array_param(&self, name: &str) -> Result<Vec<u32>, ValidationError> {
        self.get(name)?
            .as_array()
            .ok_or_else(|| ValidationError::type_mismatch(name, "uint32[]"))?
            .iter()
            .map(|v| {
                v.as_u32()
                    .ok_or_else(|| ValidationError::type_mismatch(name, "uint32[]"))
            })
            .collect()
    }

    /// Get an array parameter as U256 elements.
    pub fn u256_array_param(&self, name: &str) -> Result<Vec<U256>, ValidationError> {
        self.get(name)?
            .as_array()
            .ok_or_else(|| ValidationError::type_mismatch(name, "uint256[]"))?
            .iter()
            .map(|v| {
                v.as_u256()
                    .ok_or_else(|| ValidationError::type_mismatch(name, "uint256[]"))
            })
            .collect()
    }
}

/// A raw token movement observed in a transaction receipt.
///
/// Produced by the decoder from ERC-20 `Transfer` logs and native value
/// transfers. Immutable input; the transform core never mutates these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTransfer {
    /// Token contract address; [`Address::ZERO`] means the chain's native asset
    pub token: Address,
    /// Sending address
    pub from: Address,
    /// Receiving address
    pub to: Address,
    /// Raw amount (not normalized for decimals)
    pub amount: U256,
    /// Originating log index; `None` for native value transfers
    pub log_index: Option<u32>,
}

impl RawTransfer {
    /// Whether this is a native value transfer rather than a token transfer.
    pub fn is_native(&self) -> bool {
        self.token == Address::ZERO
    }
}

/// One decoded transaction: the unit of work for the transform core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedTransaction {
    /// Chain the transaction was observed on
    pub chain: NamedChain,
    /// Transaction hash
    pub tx_hash: B256,
    /// Block the transaction was included in
    pub block_number: u64,
    /// Block timestamp (unix seconds)
    pub timestamp: u64,
    /// External sender of the transaction
    pub from: Address,
    /// Called contract, if any (contract creations have none)
    pub to: Option<Address>,
    /// Decoded logs in ascending log-index order
    pub logs: Vec<DecodedLog>,
    /// Raw token movements in receipt order
    pub transfers: Vec<RawTransfer>,
}

impl DecodedTransaction {
    /// Validate structural invariants before processing starts.
    ///
    /// Log order is a determinism requirement: signals are collected in
    /// ascending log-index order, so unsorted or duplicated indices are
    /// rejected up front rather than being silently reordered.
    pub fn validate(&self) -> Result<(), InputError> {
        for (position, pair) in self.logs.windows(2).enumerate() {
            if pair[1].log_index == pair[0].log_index {
                return Err(InputError::DuplicateLogIndex {
                    log_index: pair[0].log_index,
                });
            }
            if pair[1].log_index < pair[0].log_index {
                return Err(InputError::UnsortedLogs {
                    position: position + 1,
                });
            }
        }
        Ok(())
    }

    /// Raw transfers that touch the given contract (as token, sender, or
    /// recipient).
    pub fn transfers_touching(&self, address: Address) -> impl Iterator<Item = &RawTransfer> {
        self.transfers
            .iter()
            .filter(move |t| t.token == address || t.from == address || t.to == address)
    }

    /// The raw transfer originating from a specific log index, if any.
    pub fn transfer_at_log(&self, log_index: u32) -> Option<&RawTransfer> {
        self.transfers
            .iter()
            .find(|t| t.log_index == Some(log_index))
    }
}
