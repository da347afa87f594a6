// Copyright (c) Portal Bridge, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Generated bindings for the events the account-based decoder recognizes:
//! the bridge contract's own operation events, plus the ERC20 `Transfer` /
//! `Approval` events that surround them in the same transactions.

use crate::types::EthLog;
use ethers::abi::RawLog;
use ethers::contract::{abigen, EthEvent, EthLogDecode};
use ethers::types::{Log, H256};
use once_cell::sync::Lazy;

abigen!(PortalTokenBridge, "abi/portal_token_bridge.json");
abigen!(Erc20Token, "abi/erc20.json");

/// Any event the account-based decoder knows how to parse.
#[derive(Debug, Clone)]
pub enum EthBridgeEvent {
    PortalTokenBridgeEvents(PortalTokenBridgeEvents),
    Erc20TokenEvents(Erc20TokenEvents),
}

static BRIDGE_EVENT_SIGNATURES: Lazy<[H256; 4]> = Lazy::new(|| {
    [
        WrapAndTransferFilter::signature(),
        TransferTokensFilter::signature(),
        CompleteTransferFilter::signature(),
        CompleteTransferAndUnwrapFilter::signature(),
    ]
});

/// Whether `topic0` is one of the bridge contract's operation event
/// signatures. A log that matches here but fails to decode is a protocol or
/// version mismatch, not noise.
pub fn is_bridge_event_signature(topic0: &H256) -> bool {
    BRIDGE_EVENT_SIGNATURES.contains(topic0)
}

impl EthBridgeEvent {
    pub fn try_from_eth_log(log: &EthLog) -> Option<EthBridgeEvent> {
        Self::try_from_log(&log.log)
    }

    pub fn try_from_log(log: &Log) -> Option<EthBridgeEvent> {
        let raw_log = RawLog {
            topics: log.topics.clone(),
            data: log.data.to_vec(),
        };

        if let Ok(decoded) = PortalTokenBridgeEvents::decode_log(&raw_log) {
            return Some(EthBridgeEvent::PortalTokenBridgeEvents(decoded));
        }
        if let Ok(decoded) = Erc20TokenEvents::decode_log(&raw_log) {
            return Some(EthBridgeEvent::Erc20TokenEvents(decoded));
        }

        None
    }
}
