// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Strong types for type safety across txform.
//!
//! This module provides newtype wrappers for various domain concepts:
//! - Raw and signed token amounts
//! - Token decimal precision
//! - Deterministic content identifiers for idempotent event writes

pub mod amount;
pub mod content_id;

// Note: Public types are re-exported from lib.rs, not here
