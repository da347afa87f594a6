// Copyright (c) Portal Bridge, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Fixture builders and an in-memory log source. Event topics are computed
//! through the generated filters so the fixtures stay in lockstep with the
//! ABI definitions.

use crate::abi::{
    ApprovalFilter, CompleteTransferAndUnwrapFilter, CompleteTransferFilter, TransferFilter,
    TransferTokensFilter, WrapAndTransferFilter,
};
use crate::error::BridgeResult;
use crate::source::ChainLogSource;
use crate::types::{EthLog, MoveAddress, MoveEventEntry, RawLogEntry};
use async_trait::async_trait;
use ethers::abi::Token;
use ethers::contract::EthEvent;
use ethers::types::{Address as EthAddress, Log, H256, U256};

pub const TX_A: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
pub const TX_B: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

pub const SUI_BRIDGE_PACKAGE: &str =
    "0xc57508ee0d4595e5a8728974a4a93a787d38f339757230d441e895422c07aba9";

pub fn addr(s: &str) -> EthAddress {
    s.parse().unwrap()
}

pub fn u256(s: &str) -> U256 {
    U256::from_dec_str(s).unwrap()
}

fn make_log(address: EthAddress, topics: Vec<H256>, data: Vec<u8>) -> Log {
    Log {
        address,
        topics,
        data: data.into(),
        ..Default::default()
    }
}

pub fn wrap_and_transfer_log(
    bridge: EthAddress,
    sender: EthAddress,
    wrapped_native: EthAddress,
    amount: U256,
) -> Log {
    make_log(
        bridge,
        vec![WrapAndTransferFilter::signature(), H256::from(sender)],
        ethers::abi::encode(&[Token::Address(wrapped_native), Token::Uint(amount)]),
    )
}

pub fn transfer_tokens_log(
    bridge: EthAddress,
    sender: EthAddress,
    token: EthAddress,
    amount: U256,
    to_origin_chain: bool,
) -> Log {
    make_log(
        bridge,
        vec![
            TransferTokensFilter::signature(),
            H256::from(sender),
            H256::from(token),
        ],
        ethers::abi::encode(&[Token::Uint(amount), Token::Bool(to_origin_chain)]),
    )
}

pub fn complete_transfer_log(
    bridge: EthAddress,
    recipient: EthAddress,
    token: EthAddress,
    amount: U256,
) -> Log {
    make_log(
        bridge,
        vec![
            CompleteTransferFilter::signature(),
            H256::from(recipient),
            H256::from(token),
        ],
        ethers::abi::encode(&[Token::Uint(amount)]),
    )
}

pub fn unwrap_log(bridge: EthAddress, recipient: EthAddress, amount: U256) -> Log {
    make_log(
        bridge,
        vec![
            CompleteTransferAndUnwrapFilter::signature(),
            H256::from(recipient),
        ],
        ethers::abi::encode(&[Token::Uint(amount)]),
    )
}

pub fn erc20_transfer_log(
    token: EthAddress,
    from: EthAddress,
    to: EthAddress,
    value: U256,
) -> Log {
    make_log(
        token,
        vec![TransferFilter::signature(), H256::from(from), H256::from(to)],
        ethers::abi::encode(&[Token::Uint(value)]),
    )
}

pub fn erc20_approval_log(
    token: EthAddress,
    owner: EthAddress,
    spender: EthAddress,
    value: U256,
) -> Log {
    make_log(
        token,
        vec![
            ApprovalFilter::signature(),
            H256::from(owner),
            H256::from(spender),
        ],
        ethers::abi::encode(&[Token::Uint(value)]),
    )
}

/// Recognized bridge signature with truncated data, for decode-fault paths.
pub fn truncated_bridge_log(bridge: EthAddress, sender: EthAddress) -> Log {
    make_log(
        bridge,
        vec![WrapAndTransferFilter::signature(), H256::from(sender)],
        vec![0u8; 4],
    )
}

pub fn eth_entry(
    block_number: u64,
    tx_hash: &str,
    tx_index: u64,
    event_index: u64,
    log: Log,
) -> RawLogEntry {
    RawLogEntry::Eth(EthLog {
        block_number,
        tx_hash: tx_hash.parse().unwrap(),
        tx_index,
        event_index,
        log,
    })
}

pub fn move_entry(
    checkpoint: u64,
    tx_digest: &str,
    event_index: u64,
    type_: &str,
    bcs: Vec<u8>,
) -> MoveEventEntry {
    MoveEventEntry {
        checkpoint,
        tx_digest: tx_digest.to_string(),
        tx_index: 0,
        event_index,
        package: SUI_BRIDGE_PACKAGE.parse().unwrap(),
        type_: type_.to_string(),
        bcs,
    }
}

pub fn sui_transfer_tokens_entry(
    checkpoint: u64,
    tx_digest: &str,
    event_index: u64,
    sender: &str,
    coin_type: &str,
    amount: u64,
    to_origin_chain: bool,
) -> RawLogEntry {
    let sender: MoveAddress = sender.parse().unwrap();
    let raw = crate::events::MoveTokensTransferredEvent {
        sender: sender.0.to_vec(),
        coin_type: coin_type.as_bytes().to_vec(),
        amount,
        to_origin_chain,
    };
    RawLogEntry::Move(move_entry(
        checkpoint,
        tx_digest,
        event_index,
        crate::events::TOKENS_TRANSFERRED_TAG,
        bcs::to_bytes(&raw).unwrap(),
    ))
}

pub fn sui_transfer_redeemed_entry(
    checkpoint: u64,
    tx_digest: &str,
    event_index: u64,
    recipient: &str,
    coin_type: &str,
    amount: u64,
) -> RawLogEntry {
    let recipient: MoveAddress = recipient.parse().unwrap();
    let raw = crate::events::MoveTransferRedeemedEvent {
        recipient: recipient.0.to_vec(),
        coin_type: coin_type.as_bytes().to_vec(),
        amount,
    };
    RawLogEntry::Move(move_entry(
        checkpoint,
        tx_digest,
        event_index,
        crate::events::TRANSFER_REDEEMED_TAG,
        bcs::to_bytes(&raw).unwrap(),
    ))
}

pub fn sui_wrapped_minted_entry(
    checkpoint: u64,
    tx_digest: &str,
    event_index: u64,
    recipient: &str,
    coin_type: &str,
    amount: u64,
) -> RawLogEntry {
    let recipient: MoveAddress = recipient.parse().unwrap();
    let raw = crate::events::MoveWrappedMintedEvent {
        recipient: recipient.0.to_vec(),
        coin_type: coin_type.as_bytes().to_vec(),
        amount,
    };
    RawLogEntry::Move(move_entry(
        checkpoint,
        tx_digest,
        event_index,
        crate::events::WRAPPED_MINTED_TAG,
        bcs::to_bytes(&raw).unwrap(),
    ))
}

pub fn sui_unwrap_redeemed_entry(
    checkpoint: u64,
    tx_digest: &str,
    event_index: u64,
    recipient: &str,
    amount: u64,
) -> RawLogEntry {
    let recipient: MoveAddress = recipient.parse().unwrap();
    let raw = crate::events::MoveUnwrapRedeemedEvent {
        recipient: recipient.0.to_vec(),
        amount,
    };
    RawLogEntry::Move(move_entry(
        checkpoint,
        tx_digest,
        event_index,
        crate::events::UNWRAP_REDEEMED_TAG,
        bcs::to_bytes(&raw).unwrap(),
    ))
}

/// In-memory log source serving a fixed entry set, range-filtered the same
/// way a real source would be.
pub struct MockLogSource {
    entries: Vec<RawLogEntry>,
}

impl MockLogSource {
    pub fn new(entries: Vec<RawLogEntry>) -> Self {
        Self { entries }
    }
}

#[async_trait]
impl ChainLogSource for MockLogSource {
    async fn fetch(&self, from_block: u64, to_block: u64) -> BridgeResult<Vec<RawLogEntry>> {
        Ok(self
            .entries
            .iter()
            .filter(|e| e.block_number() >= from_block && e.block_number() < to_block)
            .cloned()
            .collect())
    }
}
