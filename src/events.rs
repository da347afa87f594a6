// Copyright (c) Portal Bridge, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Chain-family-agnostic intermediate events, plus the Move event structs
//! emitted by the bridge package on object-based chains. We rely on the
//! structures in this file to decode the bcs content of emitted Move events;
//! each raw struct has a sanitized counterpart the rest of the engine uses.

use crate::error::{BridgeError, BridgeResult};
use crate::types::{MoveAddress, MoveEventEntry};
use ethers::types::U256;
use serde::{Deserialize, Serialize};

/// One decoded bridge protocol operation. The classifier dispatches on the
/// variant tag only, never on chain-family-specific shapes. Addresses and
/// token identities are already in canonical display form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeOperation {
    /// Native asset wrapped and deposited into the bridge.
    WrapAndTransfer {
        sender: String,
        /// Wrapped-native token the bridge observed. Carried for provenance;
        /// the canonical record uses the chain's native-token sentinel.
        raw_token: String,
        amount: U256,
    },
    /// Token deposit, wrapped or native, with or without payload. A wrapped
    /// token sent back toward its origin chain is burned rather than locked.
    TransferTokens {
        sender: String,
        token: String,
        amount: U256,
        to_origin_chain: bool,
    },
    /// Withdrawal releasing a native-origin asset.
    CompleteTransfer {
        recipient: String,
        token: String,
        amount: U256,
    },
    /// Withdrawal unwrapping to the chain's native asset.
    CompleteTransferAndUnwrap { recipient: String, amount: U256 },
    /// Withdrawal minting a wrapped asset, inferred from the
    /// zero-address-origin mint pattern.
    Mint {
        recipient: String,
        token: String,
        amount: U256,
    },
}

impl BridgeOperation {
    /// Primary operation events decide classification on their own; a lone
    /// `Mint` is only consulted when no primary event is present.
    pub fn is_primary(&self) -> bool {
        !matches!(self, BridgeOperation::Mint { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            BridgeOperation::WrapAndTransfer { .. } => "wrap_and_transfer",
            BridgeOperation::TransferTokens { .. } => "transfer_tokens",
            BridgeOperation::CompleteTransfer { .. } => "complete_transfer",
            BridgeOperation::CompleteTransferAndUnwrap { .. } => "complete_transfer_and_unwrap",
            BridgeOperation::Mint { .. } => "mint",
        }
    }
}

/// A decoded operation together with the transaction context it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntermediateEvent {
    pub tx_id: String,
    pub block_number: u64,
    pub tx_index: u64,
    /// Within-transaction position, used only as an ordering tie-break.
    pub event_index: u64,
    pub operation: BridgeOperation,
}

// `TokensTransferred` emitted in transfer_tokens.move
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct MoveTokensTransferredEvent {
    pub sender: Vec<u8>,
    pub coin_type: Vec<u8>,
    pub amount: u64,
    pub to_origin_chain: bool,
}

// `TransferRedeemed` emitted in complete_transfer.move
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct MoveTransferRedeemedEvent {
    pub recipient: Vec<u8>,
    pub coin_type: Vec<u8>,
    pub amount: u64,
}

// `UnwrapRedeemed` emitted in complete_transfer.move
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct MoveUnwrapRedeemedEvent {
    pub recipient: Vec<u8>,
    pub amount: u64,
}

// `WrappedMinted` emitted in treasury.move
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct MoveWrappedMintedEvent {
    pub recipient: Vec<u8>,
    pub coin_type: Vec<u8>,
    pub amount: u64,
}

// Sanitized version of MoveTokensTransferredEvent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokensTransferred {
    pub sender: MoveAddress,
    pub coin_type: String,
    pub amount: u64,
    pub to_origin_chain: bool,
}

// Sanitized version of MoveTransferRedeemedEvent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRedeemed {
    pub recipient: MoveAddress,
    pub coin_type: String,
    pub amount: u64,
}

// Sanitized version of MoveUnwrapRedeemedEvent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnwrapRedeemed {
    pub recipient: MoveAddress,
    pub amount: u64,
}

// Sanitized version of MoveWrappedMintedEvent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedMinted {
    pub recipient: MoveAddress,
    pub coin_type: String,
    pub amount: u64,
}

fn parse_coin_type(bytes: Vec<u8>) -> BridgeResult<String> {
    String::from_utf8(bytes)
        .map_err(|e| BridgeError::Generic(format!("coin type is not valid utf8: {e:?}")))
}

impl TryFrom<MoveTokensTransferredEvent> for TokensTransferred {
    type Error = BridgeError;

    fn try_from(event: MoveTokensTransferredEvent) -> BridgeResult<Self> {
        if event.amount == 0 {
            return Err(BridgeError::Generic(format!(
                "0 value transfer should not be allowed in Move: {event:?}"
            )));
        }
        Ok(Self {
            sender: MoveAddress::from_bytes(&event.sender)?,
            coin_type: parse_coin_type(event.coin_type)?,
            amount: event.amount,
            to_origin_chain: event.to_origin_chain,
        })
    }
}

impl TryFrom<MoveTransferRedeemedEvent> for TransferRedeemed {
    type Error = BridgeError;

    fn try_from(event: MoveTransferRedeemedEvent) -> BridgeResult<Self> {
        Ok(Self {
            recipient: MoveAddress::from_bytes(&event.recipient)?,
            coin_type: parse_coin_type(event.coin_type)?,
            amount: event.amount,
        })
    }
}

impl TryFrom<MoveUnwrapRedeemedEvent> for UnwrapRedeemed {
    type Error = BridgeError;

    fn try_from(event: MoveUnwrapRedeemedEvent) -> BridgeResult<Self> {
        Ok(Self {
            recipient: MoveAddress::from_bytes(&event.recipient)?,
            amount: event.amount,
        })
    }
}

impl TryFrom<MoveWrappedMintedEvent> for WrappedMinted {
    type Error = BridgeError;

    fn try_from(event: MoveWrappedMintedEvent) -> BridgeResult<Self> {
        Ok(Self {
            recipient: MoveAddress::from_bytes(&event.recipient)?,
            coin_type: parse_coin_type(event.coin_type)?,
            amount: event.amount,
        })
    }
}

/// A decoded, sanitized event from the bridge package on an object-based
/// chain. Type tags map 1:1 to variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveBridgeEvent {
    TokensTransferred(TokensTransferred),
    TransferRedeemed(TransferRedeemed),
    UnwrapRedeemed(UnwrapRedeemed),
    WrappedMinted(WrappedMinted),
}

pub const TOKENS_TRANSFERRED_TAG: &str = "transfer_tokens::TokensTransferred";
pub const TRANSFER_REDEEMED_TAG: &str = "complete_transfer::TransferRedeemed";
pub const UNWRAP_REDEEMED_TAG: &str = "complete_transfer::UnwrapRedeemed";
pub const WRAPPED_MINTED_TAG: &str = "treasury::WrappedMinted";

fn decode_bcs<'a, T: Deserialize<'a>>(tag: &str, bytes: &'a [u8]) -> BridgeResult<T> {
    bcs::from_bytes(bytes)
        .map_err(|e| BridgeError::Decode(format!("failed to deserialize {tag} event: {e:?}")))
}

impl MoveBridgeEvent {
    /// Ok(None) means the event type is not a bridge operation and should be
    /// dropped as noise. A recognized tag with a malformed payload is a
    /// decode error for that single entry.
    pub fn try_from_move_event(entry: &MoveEventEntry) -> BridgeResult<Option<MoveBridgeEvent>> {
        match entry.type_.as_str() {
            TOKENS_TRANSFERRED_TAG => {
                let event: MoveTokensTransferredEvent = decode_bcs(&entry.type_, &entry.bcs)?;
                Ok(Some(MoveBridgeEvent::TokensTransferred(event.try_into()?)))
            }
            TRANSFER_REDEEMED_TAG => {
                let event: MoveTransferRedeemedEvent = decode_bcs(&entry.type_, &entry.bcs)?;
                Ok(Some(MoveBridgeEvent::TransferRedeemed(event.try_into()?)))
            }
            UNWRAP_REDEEMED_TAG => {
                let event: MoveUnwrapRedeemedEvent = decode_bcs(&entry.type_, &entry.bcs)?;
                Ok(Some(MoveBridgeEvent::UnwrapRedeemed(event.try_into()?)))
            }
            WRAPPED_MINTED_TAG => {
                let event: MoveWrappedMintedEvent = decode_bcs(&entry.type_, &entry.bcs)?;
                Ok(Some(MoveBridgeEvent::WrappedMinted(event.try_into()?)))
            }
            _ => Ok(None),
        }
    }

    pub fn into_operation(self) -> BridgeOperation {
        match self {
            MoveBridgeEvent::TokensTransferred(event) => BridgeOperation::TransferTokens {
                sender: event.sender.to_string(),
                token: event.coin_type,
                amount: U256::from(event.amount),
                to_origin_chain: event.to_origin_chain,
            },
            MoveBridgeEvent::TransferRedeemed(event) => BridgeOperation::CompleteTransfer {
                recipient: event.recipient.to_string(),
                token: event.coin_type,
                amount: U256::from(event.amount),
            },
            MoveBridgeEvent::UnwrapRedeemed(event) => BridgeOperation::CompleteTransferAndUnwrap {
                recipient: event.recipient.to_string(),
                amount: U256::from(event.amount),
            },
            MoveBridgeEvent::WrappedMinted(event) => BridgeOperation::Mint {
                recipient: event.recipient.to_string(),
                token: event.coin_type,
                amount: U256::from(event.amount),
            },
        }
    }
}
