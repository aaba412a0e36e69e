// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Canonical event definitions the decoder contract is expressed against.
//!
//! The decoder (an external collaborator) hands this crate pre-decoded logs
//! keyed by event name. The definitions here pin down exactly which ABI
//! events each transformer understands, and the signature constants are the
//! reference the decoder configuration should be checked against.

use alloy_sol_types::sol;

/// ERC-20 events.
pub mod erc20 {
    use super::sol;

    /// The canonical Transfer event signature
    pub const TRANSFER_EVENT_SIGNATURE: &str = "Transfer(address,address,uint256)";

    sol! {
        event Transfer(address indexed from, address indexed to, uint256 value);
    }
}

/// Wrapped-native-token (WETH9-style) events.
pub mod wrapped_native {
    use super::sol;

    /// The canonical Deposit event signature
    pub const DEPOSIT_EVENT_SIGNATURE: &str = "Deposit(address,uint256)";

    /// The canonical Withdrawal event signature
    pub const WITHDRAWAL_EVENT_SIGNATURE: &str = "Withdrawal(address,uint256)";

    sol! {
        event Deposit(address indexed dst, uint256 wad);
        event Withdrawal(address indexed src, uint256 wad);
    }
}

/// Constant-product (V2-style) pair events.
pub mod pair {
    use super::sol;

    /// The canonical pair Swap event signature
    pub const SWAP_EVENT_SIGNATURE: &str =
        "Swap(address,uint256,uint256,uint256,uint256,address)";

    /// The canonical pair Mint event signature
    pub const MINT_EVENT_SIGNATURE: &str = "Mint(address,uint256,uint256)";

    /// The canonical pair Burn event signature
    pub const BURN_EVENT_SIGNATURE: &str = "Burn(address,uint256,uint256,address)";

    /// The canonical fee-claim event signature
    pub const COLLECT_EVENT_SIGNATURE: &str = "Collect(address,address,uint256,uint256)";

    sol! {
        event Swap(
            address indexed sender,
            uint256 amount0In,
            uint256 amount1In,
            uint256 amount0Out,
            uint256 amount1Out,
            address indexed to
        );
        event Mint(address indexed sender, uint256 amount0, uint256 amount1);
        event Burn(address indexed sender, uint256 amount0, uint256 amount1, address indexed to);
        event Collect(
            address indexed sender,
            address indexed recipient,
            uint256 amount0,
            uint256 amount1
        );
    }
}

/// Bin-liquidity-book pair events.
pub mod bin_pair {
    use super::sol;

    /// The canonical bin-book Swap event signature
    pub const SWAP_EVENT_SIGNATURE: &str =
        "Swap(address,address,uint32,bool,uint256,uint256)";

    /// The canonical bin-book deposit event signature
    pub const DEPOSITED_TO_BINS_EVENT_SIGNATURE: &str =
        "DepositedToBins(address,address,uint32[],uint256[],uint256[])";

    /// The canonical bin-book withdrawal event signature
    pub const WITHDRAWN_FROM_BINS_EVENT_SIGNATURE: &str =
        "WithdrawnFromBins(address,address,uint32[],uint256[],uint256[])";

    /// The canonical fee collection event signature
    pub const FEES_COLLECTED_EVENT_SIGNATURE: &str =
        "FeesCollected(address,address,uint256,uint256)";

    sol! {
        event Swap(
            address indexed sender,
            address indexed to,
            uint32 id,
            bool swapForY,
            uint256 amountIn,
            uint256 amountOut
        );
        event DepositedToBins(
            address indexed sender,
            address indexed to,
            uint32[] ids,
            uint256[] amountsX,
            uint256[] amountsY
        );
        event WithdrawnFromBins(
            address indexed sender,
            address indexed to,
            uint32[] ids,
            uint256[] amountsX,
            uint256[] amountsY
        );
        event FeesCollected(
            address indexed sender,
            address indexed recipient,
            uint256 amountX,
            uint256 amountY
        );
    }
}

/// Extract the short event name from a full signature.
///
/// e.g. `"Swap(address,uint256,...)"` → `"Swap"`. Decoded logs carry the
/// short name, so transformers match against this.
pub fn event_name(signature: &str) -> &str {
    signature.split('(').next().unwrap_or(signature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_sol_types::SolEvent;

    #[test]
    fn test_signature_constants_match_definitions() {
        assert_eq!(erc20::Transfer::SIGNATURE, erc20::TRANSFER_EVENT_SIGNATURE);
        assert_eq!(
            wrapped_native::Deposit::SIGNATURE,
            wrapped_native::DEPOSIT_EVENT_SIGNATURE
        );
        assert_eq!(
            wrapped_native::Withdrawal::SIGNATURE,
            wrapped_native::WITHDRAWAL_EVENT_SIGNATURE
        );
        assert_eq!(pair::Swap::SIGNATURE, pair::SWAP_EVENT_SIGNATURE);
        assert_eq!(pair::Mint::SIGNATURE, pair::MINT_EVENT_SIGNATURE);
        assert_eq!(pair::Burn::SIGNATURE, pair::BURN_EVENT_SIGNATURE);
        assert_eq!(pair::Collect::SIGNATURE, pair::COLLECT_EVENT_SIGNATURE);
        assert_eq!(bin_pair::Swap::SIGNATURE, bin_pair::SWAP_EVENT_SIGNATURE);
        assert_eq!(
            bin_pair::DepositedToBins::SIGNATURE,
            bin_pair::DEPOSITED_TO_BINS_EVENT_SIGNATURE
        );
        assert_eq!(
            bin_pair::WithdrawnFromBins::SIGNATURE,
            bin_pair::WITHDRAWN_FROM_BINS_EVENT_SIGNATURE
        );
        assert_eq!(
            bin_pair::FeesCollected::SIGNATURE,
            bin_pair::FEES_COLLECTED_EVENT_SIGNATURE
        );
    }

    #[test]
    fn test_event_name_extraction() {
        assert_eq!(event_name(erc20::TRANSFER_EVENT_SIGNATURE), "Transfer");
        assert_eq!(event_name(pair::SWAP_EVENT_SIGNATURE), "Swap");
        assert_eq!(event_name("NoParens"), "NoParens");
    }
}
