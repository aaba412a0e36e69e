// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Strong types for token amounts
//!
//! Newtype wrappers around `U256`/`I256` keep raw on-chain amounts, signed
//! taker-perspective deltas, and decimal precision from being mixed up.
//!
//! # Type Relationships
//!
//! ```text
//! TokenAmount (U256, raw, unsigned)      SignedAmount (I256, taker delta)
//!     |                                      |
//!     | normalize(TokenDecimals)             | normalize(TokenDecimals)
//!     ↓                                      ↓
//! f64 (human-readable)                   f64 (human-readable, signed)
//! ```

use alloy_primitives::{I256, U256};
use serde::{Deserialize, Serialize};

/// Raw token amount (not normalized for decimals)
///
/// This represents the raw token amount as stored on-chain in the smallest
/// unit (e.g., wei for ETH). To convert to a human-readable amount, use
/// [`normalize`](Self::normalize) with the token's [`TokenDecimals`].
///
/// # Examples
///
/// ```
/// use alloy_primitives::U256;
/// use txform::{TokenAmount, TokenDecimals};
///
/// // 1.5 ETH in wei (18 decimals)
/// let amount = TokenAmount::new(U256::from(1_500_000_000_000_000_000u64));
/// let normalized = amount.normalize(TokenDecimals::STANDARD);
/// assert!((normalized - 1.5).abs() < 0.0001);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenAmount(U256);

impl TokenAmount {
    /// Zero token amount
    pub const ZERO: Self = Self(U256::ZERO);

    /// Create a new token amount from U256
    pub const fn new(amount: U256) -> Self {
        Self(amount)
    }

    /// Get the inner U256 value
    pub const fn as_u256(&self) -> U256 {
        self.0
    }

    /// Whether the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Add another amount, saturating at `U256::MAX`
    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Normalize by token decimals: amount / 10^decimals
    ///
    /// Precision loss is acceptable here: normalized values feed display and
    /// pricing paths, never balance accounting.
    pub fn normalize(&self, decimals: TokenDecimals) -> f64 {
        u256_to_f64(self.0) / decimals.divisor()
    }
}

impl From<U256> for TokenAmount {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Signed token delta from the perspective of one party
///
/// Positive means the party received tokens; negative means the party paid
/// them out. Trade and pool-swap events carry their base/quote amounts as
/// `SignedAmount` so downstream pricing never has to re-derive direction.
///
/// # Examples
///
/// ```
/// use alloy_primitives::I256;
/// use txform::SignedAmount;
///
/// let sold = SignedAmount::new(I256::try_from(-50i64).unwrap());
/// assert!(sold.is_negative());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignedAmount(I256);

impl SignedAmount {
    /// Zero delta
    pub const ZERO: Self = Self(I256::ZERO);

    /// Create a new signed amount from I256
    pub const fn new(amount: I256) -> Self {
        Self(amount)
    }

    /// Get the inner I256 value
    pub const fn as_i256(&self) -> I256 {
        self.0
    }

    /// Whether the delta is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Whether the delta is negative (tokens paid out)
    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    /// Whether the delta is positive (tokens received)
    pub fn is_positive(&self) -> bool {
        self.0.is_positive()
    }

    /// Magnitude of the delta as an unsigned amount
    pub fn abs(&self) -> TokenAmount {
        TokenAmount(self.0.unsigned_abs())
    }

    /// Normalize by token decimals, preserving sign
    pub fn normalize(&self, decimals: TokenDecimals) -> f64 {
        let magnitude = u256_to_f64(self.0.unsigned_abs()) / decimals.divisor();
        if self.0.is_negative() {
            -magnitude
        } else {
            magnitude
        }
    }
}

impl From<I256> for SignedAmount {
    fn from(value: I256) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for SignedAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ERC-20 token decimal precision
///
/// Represents the number of decimal places for a token. Most ERC-20 tokens
/// use 18 decimals (like ETH), but some use different values:
/// - USDC: 6 decimals
/// - WBTC: 8 decimals
/// - Standard: 18 decimals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenDecimals(u8);

impl TokenDecimals {
    /// Maximum reasonable decimals (following ERC-20 convention)
    pub const MAX_REASONABLE: u8 = 18;

    /// Standard decimals for ETH-like tokens (18)
    pub const STANDARD: Self = Self(18);

    /// USDC decimals (6)
    pub const USDC: Self = Self(6);

    /// WBTC decimals (8)
    pub const WBTC: Self = Self(8);

    /// Create a new decimal precision value
    pub const fn new(decimals: u8) -> Self {
        Self(decimals)
    }

    /// Get the inner u8 value
    pub const fn as_u8(&self) -> u8 {
        self.0
    }

    /// Check if decimals are in reasonable range (0-18)
    ///
    /// While the ERC-20 standard allows any u8 value, most tokens use 18 or
    /// fewer decimals. Values over 18 are unusual and may indicate data errors.
    pub const fn is_reasonable(&self) -> bool {
        self.0 <= Self::MAX_REASONABLE
    }

    /// Calculate the divisor for normalization: 10^decimals
    pub fn divisor(&self) -> f64 {
        10_f64.powi(self.0 as i32)
    }
}

impl From<u8> for TokenDecimals {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for TokenDecimals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} decimals", self.0)
    }
}

/// Lossy U256 → f64 conversion for normalization paths.
pub(crate) fn u256_to_f64(value: U256) -> f64 {
    value.to_string().parse::<f64>().unwrap_or(f64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_amount_normalization() {
        let amount = TokenAmount::new(U256::from(1_500_000u64));
        let normalized = amount.normalize(TokenDecimals::USDC);
        assert!((normalized - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_token_amount_saturating_add() {
        let near_max = TokenAmount::new(U256::MAX - U256::from(100u64));
        let sum = near_max.saturating_add(TokenAmount::new(U256::from(200u64)));
        assert_eq!(sum.as_u256(), U256::MAX);
    }

    #[test]
    fn test_signed_amount_sign_preserved_in_normalization() {
        let sold = SignedAmount::new(I256::try_from(-2_500_000i64).unwrap());
        let normalized = sold.normalize(TokenDecimals::USDC);
        assert!((normalized + 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_signed_amount_abs() {
        let sold = SignedAmount::new(I256::try_from(-50i64).unwrap());
        assert_eq!(sold.abs(), TokenAmount::new(U256::from(50u64)));
        assert!(sold.is_negative());
        assert!(!sold.is_positive());
    }

    #[test]
    fn test_decimals_reasonable_range() {
        assert!(TokenDecimals::STANDARD.is_reasonable());
        assert!(TokenDecimals::new(0).is_reasonable());
        assert!(!TokenDecimals::new(24).is_reasonable());
    }

    #[test]
    fn test_u256_to_f64_large_values() {
        let one_eth = U256::from(1_000_000_000_000_000_000u64);
        assert!((u256_to_f64(one_eth) - 1e18).abs() < 1e6);
    }
}
