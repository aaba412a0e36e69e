// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Deterministic content identifiers for idempotent event writes
//!
//! Every domain event carries a [`ContentId`] derived from the transaction
//! hash, the event kind, and the originating log indices. Re-running the
//! pipeline over identical input always yields identical identifiers, which
//! the external writer uses as its upsert key. Two distinct logical events
//! within one transaction never share an identifier because the kind tag and
//! log-index set (or explicit key) always differ.

use std::str::FromStr;

use alloy_primitives::{hex, keccak256, B256};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// A 16-byte deterministic event identifier
///
/// Derived as the first 16 bytes of
/// `keccak256(tx_hash ‖ kind_tag ‖ sorted log indices)`.
///
/// # Examples
///
/// ```
/// use alloy_primitives::B256;
/// use txform::ContentId;
///
/// let tx_hash = B256::repeat_byte(0xab);
/// let a = ContentId::derive(tx_hash, 2, &[4]);
/// let b = ContentId::derive(tx_hash, 2, &[4]);
/// assert_eq!(a, b);
/// assert_ne!(a, ContentId::derive(tx_hash, 2, &[5]));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentId([u8; Self::LEN]);

impl ContentId {
    /// Identifier length in bytes
    pub const LEN: usize = 16;

    /// Derive an identifier from the originating log indices.
    ///
    /// Indices are sorted before hashing so that signal collection order
    /// never influences the result.
    pub fn derive(tx_hash: B256, kind_tag: u8, log_indices: &[u32]) -> Self {
        let mut sorted: Vec<u32> = log_indices.to_vec();
        sorted.sort_unstable();

        let mut preimage = Vec::with_capacity(32 + 1 + sorted.len() * 4);
        preimage.extend_from_slice(tx_hash.as_slice());
        preimage.push(kind_tag);
        for index in sorted {
            preimage.extend_from_slice(&index.to_be_bytes());
        }

        Self::from_hash(&preimage)
    }

    /// Derive an identifier for an event with no originating log index.
    ///
    /// Native value transfers and reconciliation positions have no log to
    /// reference; the caller supplies a key that is unique within the
    /// transaction for the given kind (e.g. address bytes plus an ordinal).
    pub fn derive_keyed(tx_hash: B256, kind_tag: u8, key: &[u8]) -> Self {
        let mut preimage = Vec::with_capacity(32 + 1 + key.len());
        preimage.extend_from_slice(tx_hash.as_slice());
        preimage.push(kind_tag);
        preimage.extend_from_slice(key);

        Self::from_hash(&preimage)
    }

    fn from_hash(preimage: &[u8]) -> Self {
        let digest = keccak256(preimage);
        let mut bytes = [0u8; Self::LEN];
        bytes.copy_from_slice(&digest[..Self::LEN]);
        Self(bytes)
    }

    /// Get the raw identifier bytes
    pub const fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }
}

impl std::fmt::Display for ContentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl std::fmt::Debug for ContentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ContentId({})", self)
    }
}

impl FromStr for ContentId {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes: [u8; Self::LEN] = hex::decode_to_array(s)?;
        Ok(Self(bytes))
    }
}

impl Serialize for ContentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ContentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx_hash() -> B256 {
        B256::repeat_byte(0x11)
    }

    #[test]
    fn test_same_input_same_id() {
        let a = ContentId::derive(tx_hash(), 1, &[3, 7]);
        let b = ContentId::derive(tx_hash(), 1, &[3, 7]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_log_index_order_does_not_matter() {
        let a = ContentId::derive(tx_hash(), 1, &[7, 3]);
        let b = ContentId::derive(tx_hash(), 1, &[3, 7]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_distinct_kinds_never_collide() {
        let swap = ContentId::derive(tx_hash(), 2, &[4]);
        let transfer = ContentId::derive(tx_hash(), 3, &[4]);
        assert_ne!(swap, transfer);
    }

    #[test]
    fn test_distinct_transactions_never_collide() {
        let a = ContentId::derive(B256::repeat_byte(0x01), 1, &[0]);
        let b = ContentId::derive(B256::repeat_byte(0x02), 1, &[0]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_keyed_derivation_distinct_keys() {
        let a = ContentId::derive_keyed(tx_hash(), 4, b"address-a");
        let b = ContentId::derive_keyed(tx_hash(), 4, b"address-b");
        assert_ne!(a, b);
    }

    #[test]
    fn test_display_round_trip() {
        let id = ContentId::derive(tx_hash(), 2, &[12]);
        let parsed: ContentId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert_eq!(id.to_string().len(), ContentId::LEN * 2);
    }
}
