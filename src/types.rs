// Copyright (c) Portal Bridge, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Shared raw-entry and canonical-output types. Raw entries are produced by a
//! [`crate::source::ChainLogSource`] and consumed exactly once by the decoder;
//! [`BridgeTransfer`] is the canonical record handed to callers.

use crate::error::BridgeError;
use ethers::types::{Log, H256, U256};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One Ethereum-family log entry, annotated with the transaction context the
/// decoder needs to group and order events without further network calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EthLog {
    pub block_number: u64,
    pub tx_hash: H256,
    /// Position of the transaction within its block.
    pub tx_index: u64,
    /// Block-global log index. Only used to order events within one
    /// transaction, so the block-global numbering is fine.
    pub event_index: u64,
    pub log: Log,
}

/// One Move-call event from an object-based chain, keyed by checkpoint
/// sequence number instead of block number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveEventEntry {
    pub checkpoint: u64,
    pub tx_digest: String,
    /// Position of the transaction within its checkpoint.
    pub tx_index: u64,
    pub event_index: u64,
    /// Emitting package address. Events from other packages are noise.
    pub package: MoveAddress,
    /// Event type as `module::Name`, relative to the bridge package.
    pub type_: String,
    /// BCS-encoded event payload.
    pub bcs: Vec<u8>,
}

/// A raw on-chain entry, one variant per chain family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawLogEntry {
    Eth(EthLog),
    Move(MoveEventEntry),
}

impl RawLogEntry {
    /// Block number for account-based chains, checkpoint sequence number for
    /// object-based chains.
    pub fn block_number(&self) -> u64 {
        match self {
            RawLogEntry::Eth(log) => log.block_number,
            RawLogEntry::Move(event) => event.checkpoint,
        }
    }

    pub fn tx_index(&self) -> u64 {
        match self {
            RawLogEntry::Eth(log) => log.tx_index,
            RawLogEntry::Move(event) => event.tx_index,
        }
    }

    pub fn event_index(&self) -> u64 {
        match self {
            RawLogEntry::Eth(log) => log.event_index,
            RawLogEntry::Move(event) => event.event_index,
        }
    }

    /// Transaction hash or checkpoint transaction digest, in display form.
    pub fn tx_id(&self) -> String {
        match self {
            RawLogEntry::Eth(log) => format!("{:?}", log.tx_hash),
            RawLogEntry::Move(event) => event.tx_digest.clone(),
        }
    }
}

/// 32-byte address on an object-based chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveAddress(pub [u8; 32]);

impl MoveAddress {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BridgeError> {
        if bytes.len() != 32 {
            return Err(BridgeError::Generic(format!(
                "MoveAddress must be 32 bytes, got {}",
                bytes.len()
            )));
        }
        let mut addr = [0u8; 32];
        addr.copy_from_slice(bytes);
        Ok(MoveAddress(addr))
    }
}

impl std::fmt::Display for MoveAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for MoveAddress {
    type Err = BridgeError;

    // Accepts short-form addresses and left-pads them to 32 bytes, the way
    // object-based explorers render them.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        if stripped.len() > 64 {
            return Err(BridgeError::Generic(format!(
                "MoveAddress too long: {s}"
            )));
        }
        let padded = format!("{stripped:0>64}");
        let bytes = hex::decode(padded)
            .map_err(|e| BridgeError::Generic(format!("invalid MoveAddress {s}: {e}")))?;
        Self::from_bytes(&bytes)
    }
}

/// Canonical bridge transfer record, independent of the originating chain's
/// event model. `amount` is the exact integer carried by the matched primary
/// event after chain decimal normalization, never a display-scaled value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BridgeTransfer {
    /// Block number, or checkpoint sequence number for object-based chains.
    pub block_number: u64,
    /// Transaction hash, or checkpoint transaction digest.
    pub tx_hash: String,
    pub from: String,
    pub to: String,
    /// Token contract address or Move coin type.
    pub token: String,
    pub amount: U256,
    /// True when funds enter the bridge on the source chain, false when they
    /// exit on the destination chain.
    pub is_deposit: bool,
    /// The observed sender is a known relayer contract. Provenance only,
    /// never affects classification.
    pub via_relayer: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_address_roundtrip() {
        let addr: MoveAddress = "0xc57508ee0d4595e5a8728974a4a93a787d38f339757230d441e895422c07aba9"
            .parse()
            .unwrap();
        assert_eq!(
            addr.to_string(),
            "0xc57508ee0d4595e5a8728974a4a93a787d38f339757230d441e895422c07aba9"
        );
    }

    #[test]
    fn test_move_address_short_form_is_left_padded() {
        let addr: MoveAddress = "0x2".parse().unwrap();
        assert_eq!(
            addr.to_string(),
            "0x0000000000000000000000000000000000000000000000000000000000000002"
        );
    }

    #[test]
    fn test_move_address_rejects_bad_input() {
        assert!("0xzz".parse::<MoveAddress>().is_err());
        assert!(MoveAddress::from_bytes(&[0u8; 16]).is_err());
    }
}
