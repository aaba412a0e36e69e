// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Transaction transformation for an EVM token-tracking indexer.
//!
//! Takes decoded transactions (logs plus raw token movements) and turns them
//! into typed, deduplicated domain events: trades, pool swaps, transfers,
//! liquidity actions, rewards, and reconciliation positions. Processing is
//! pure and synchronous; I/O belongs to the decoder upstream and the event
//! writer downstream.
//!
//! The entry point is [`TransformManager`]: build one per processing session
//! from a [`PipelineConfig`], then feed it [`DecodedTransaction`]s.

pub mod abi_events;
mod config;
mod context;
mod decoded;
pub mod errors;
mod event;
mod manager;
mod matcher;
mod reconcile;
mod registry;
mod signal;
mod spans;
mod transformer;
mod types;

pub use config::*;
pub use context::*;
pub use decoded::*;
pub use event::*;
pub use manager::*;
pub use registry::*;
pub use signal::*;
pub use transformer::*;
pub use types::amount::*;
pub use types::content_id::*;
