// Copyright (c) Portal Bridge, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Raw entries to intermediate events, grouped by transaction. Noise logs
//! (ERC20 approvals, transfers that are not mints, unrelated contracts and
//! packages) are dropped here; a recognized bridge signature with an
//! unexpected shape is a per-entry fault that never aborts the batch.

use crate::abi::{
    self, Erc20TokenEvents, EthBridgeEvent, PortalTokenBridgeEvents, TransferFilter,
};
use crate::config::{ChainContracts, ChainDescriptor};
use crate::error::{BridgeError, BridgeResult};
use crate::events::{BridgeOperation, IntermediateEvent, MoveBridgeEvent};
use crate::types::{EthLog, MoveEventEntry, RawLogEntry};
use ethers::contract::EthEvent;
use ethers::types::Address as EthAddress;
use ethers::utils::to_checksum;
use tracing::{debug, warn};

/// All intermediate events of one transaction or checkpoint digest, in
/// emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxEvents {
    pub tx_id: String,
    pub block_number: u64,
    pub tx_index: u64,
    pub events: Vec<IntermediateEvent>,
}

/// A per-entry or per-transaction problem surfaced alongside successful
/// results, never silently dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFault {
    pub tx_id: String,
    pub block_number: u64,
    pub error: BridgeError,
}

#[derive(Debug, Default)]
pub struct DecodedBatch {
    /// Grouped by transaction, ascending by (block, tx position).
    pub transactions: Vec<TxEvents>,
    pub faults: Vec<EntryFault>,
}

/// Decode a fetched batch for one chain. Entries may arrive in any order;
/// output grouping is deterministic for a fixed input set.
pub fn decode_batch(chain: &ChainDescriptor, mut entries: Vec<RawLogEntry>) -> DecodedBatch {
    entries.sort_by_key(|e| (e.block_number(), e.tx_index(), e.event_index()));

    let mut batch = DecodedBatch::default();
    for entry in entries {
        let tx_id = entry.tx_id();
        let block_number = entry.block_number();
        let tx_index = entry.tx_index();
        let event_index = entry.event_index();

        let decoded = match (&chain.contracts, entry) {
            (ChainContracts::Evm { bridge, .. }, RawLogEntry::Eth(log)) => {
                decode_eth_entry(bridge, &log)
            }
            (ChainContracts::Move { bridge_package, .. }, RawLogEntry::Move(event)) => {
                decode_move_entry(bridge_package, &event)
            }
            (_, entry) => Err(BridgeError::Decode(format!(
                "entry family does not match chain {} family: {entry:?}",
                chain.name
            ))),
        };

        match decoded {
            Ok(Some(operation)) => {
                debug!(
                    chain = %chain.name,
                    tx = %tx_id,
                    kind = operation.kind(),
                    "decoded bridge event"
                );
                let event = IntermediateEvent {
                    tx_id: tx_id.clone(),
                    block_number,
                    tx_index,
                    event_index,
                    operation,
                };
                match batch.transactions.last_mut() {
                    Some(tx) if tx.tx_id == tx_id => tx.events.push(event),
                    _ => batch.transactions.push(TxEvents {
                        tx_id,
                        block_number,
                        tx_index,
                        events: vec![event],
                    }),
                }
            }
            Ok(None) => (),
            Err(error) => {
                warn!(
                    chain = %chain.name,
                    tx = %tx_id,
                    error = %error,
                    "failed to decode log entry, skipping"
                );
                batch.faults.push(EntryFault {
                    tx_id,
                    block_number,
                    error,
                });
            }
        }
    }
    batch
}

/// Ok(None) is noise. Position within the transaction is never meaningful
/// here: some chains emit the approval log after the deposit log, so only
/// signature matching decides what a log is.
fn decode_eth_entry(
    bridge: &EthAddress,
    entry: &EthLog,
) -> BridgeResult<Option<BridgeOperation>> {
    let Some(topic0) = entry.log.topics.first() else {
        return Ok(None);
    };

    if entry.log.address == *bridge && abi::is_bridge_event_signature(topic0) {
        let event = EthBridgeEvent::try_from_eth_log(entry).ok_or_else(|| {
            BridgeError::Decode(format!(
                "bridge log with recognized signature has unexpected shape: tx {:?} topics {:?}",
                entry.tx_hash, entry.log.topics
            ))
        })?;
        let EthBridgeEvent::PortalTokenBridgeEvents(event) = event else {
            return Err(BridgeError::Decode(format!(
                "bridge signature decoded to a non-bridge event: tx {:?}",
                entry.tx_hash
            )));
        };
        return Ok(Some(operation_from_bridge_event(event)));
    }

    // Zero-address-origin ERC20 transfer is a wrapped-token mint. Any other
    // Transfer, and every Approval, is auxiliary noise. A log that merely
    // shares the Transfer topic but has a different shape (e.g. ERC721) is
    // noise too, not a decode fault.
    if *topic0 == TransferFilter::signature() {
        match EthBridgeEvent::try_from_log(&entry.log) {
            Some(EthBridgeEvent::Erc20TokenEvents(Erc20TokenEvents::TransferFilter(transfer)))
                if transfer.from.is_zero() =>
            {
                return Ok(Some(BridgeOperation::Mint {
                    recipient: to_checksum(&transfer.to, None),
                    token: to_checksum(&entry.log.address, None),
                    amount: transfer.value,
                }));
            }
            _ => return Ok(None),
        }
    }

    Ok(None)
}

fn decode_move_entry(
    bridge_package: &crate::types::MoveAddress,
    entry: &MoveEventEntry,
) -> BridgeResult<Option<BridgeOperation>> {
    if entry.package != *bridge_package {
        return Ok(None);
    }
    Ok(MoveBridgeEvent::try_from_move_event(entry)?.map(MoveBridgeEvent::into_operation))
}

fn operation_from_bridge_event(event: PortalTokenBridgeEvents) -> BridgeOperation {
    match event {
        PortalTokenBridgeEvents::WrapAndTransferFilter(ev) => BridgeOperation::WrapAndTransfer {
            sender: to_checksum(&ev.sender, None),
            raw_token: to_checksum(&ev.wrapped_native, None),
            amount: ev.amount,
        },
        PortalTokenBridgeEvents::TransferTokensFilter(ev) => BridgeOperation::TransferTokens {
            sender: to_checksum(&ev.sender, None),
            token: to_checksum(&ev.token, None),
            amount: ev.amount,
            to_origin_chain: ev.to_origin_chain,
        },
        PortalTokenBridgeEvents::CompleteTransferFilter(ev) => BridgeOperation::CompleteTransfer {
            recipient: to_checksum(&ev.recipient, None),
            token: to_checksum(&ev.token, None),
            amount: ev.amount,
        },
        PortalTokenBridgeEvents::CompleteTransferAndUnwrapFilter(ev) => {
            BridgeOperation::CompleteTransferAndUnwrap {
                recipient: to_checksum(&ev.recipient, None),
                amount: ev.amount,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChainRegistry;
    use crate::test_utils::*;
    use ethers::types::U256;

    #[test]
    fn test_noise_logs_are_dropped() {
        let registry = ChainRegistry::mainnet();
        let ethereum = registry.resolve("ethereum").unwrap();
        let token = addr("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
        let user = addr("0xba4eeD5A9E6Acb87e298F6F11e278404f8da28df");
        let spender = addr("0x3ee18B2214AFF97000D974cf647E7C347E8fa585");

        let entries = vec![
            eth_entry(100, TX_A, 0, 0, erc20_approval_log(token, user, spender, U256::from(5))),
            // user-to-user transfer, not a mint
            eth_entry(100, TX_A, 0, 1, erc20_transfer_log(token, user, spender, U256::from(5))),
        ];
        let batch = decode_batch(&ethereum, entries);
        assert!(batch.transactions.is_empty());
        assert!(batch.faults.is_empty());
    }

    #[test]
    fn test_bridge_event_from_foreign_contract_is_noise() {
        let registry = ChainRegistry::mainnet();
        let ethereum = registry.resolve("ethereum").unwrap();
        let fake_bridge = addr("0x0e082F06FF657D94310cB8cE8B0D9a04541d8052");
        let sender = addr("0x15E9dffFeC3f4E8cFC1b7C5770aa38709a712A3c");
        let weth = addr("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");

        let entries = vec![eth_entry(
            100,
            TX_A,
            0,
            0,
            wrap_and_transfer_log(fake_bridge, sender, weth, U256::from(1)),
        )];
        let batch = decode_batch(&ethereum, entries);
        assert!(batch.transactions.is_empty());
        assert!(batch.faults.is_empty());
    }

    #[test]
    fn test_malformed_bridge_log_is_fault_but_batch_continues() {
        let registry = ChainRegistry::mainnet();
        let ethereum = registry.resolve("ethereum").unwrap();
        let bridge = addr("0x3ee18B2214AFF97000D974cf647E7C347E8fa585");
        let sender = addr("0x15E9dffFeC3f4E8cFC1b7C5770aa38709a712A3c");
        let weth = addr("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");

        let entries = vec![
            // Recognized signature, truncated data
            eth_entry(100, TX_A, 0, 0, truncated_bridge_log(bridge, sender)),
            eth_entry(
                101,
                TX_B,
                0,
                0,
                wrap_and_transfer_log(bridge, sender, weth, U256::from(7)),
            ),
        ];
        let batch = decode_batch(&ethereum, entries);
        assert_eq!(batch.faults.len(), 1);
        assert_eq!(batch.faults[0].error.error_type(), "decode_error");
        assert_eq!(batch.transactions.len(), 1);
        assert_eq!(batch.transactions[0].block_number, 101);
    }

    #[test]
    fn test_grouping_preserves_emission_order() {
        let registry = ChainRegistry::mainnet();
        let ethereum = registry.resolve("ethereum").unwrap();
        let bridge = addr("0x3ee18B2214AFF97000D974cf647E7C347E8fa585");
        let sender = addr("0x15E9dffFeC3f4E8cFC1b7C5770aa38709a712A3c");
        let weth = addr("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");

        // Shuffled input: later block first
        let entries = vec![
            eth_entry(
                200,
                TX_B,
                0,
                0,
                wrap_and_transfer_log(bridge, sender, weth, U256::from(2)),
            ),
            eth_entry(
                100,
                TX_A,
                0,
                0,
                wrap_and_transfer_log(bridge, sender, weth, U256::from(1)),
            ),
        ];
        let batch = decode_batch(&ethereum, entries);
        assert_eq!(batch.transactions.len(), 2);
        assert_eq!(batch.transactions[0].block_number, 100);
        assert_eq!(batch.transactions[1].block_number, 200);
    }

    #[test]
    fn test_move_entry_from_foreign_package_is_noise() {
        let registry = ChainRegistry::mainnet();
        let sui = registry.resolve("sui").unwrap();
        let mut entry = sui_transfer_tokens_entry(
            100,
            "digest",
            0,
            "0xbda9efe864e492f5921f30287a10f60287eafdcc82f259a39bb2335fb069a948",
            "0x2::sui::SUI",
            1_000_000,
            false,
        );
        if let RawLogEntry::Move(ref mut inner) = entry {
            inner.package = "0x42".parse().unwrap();
        }
        let batch = decode_batch(&sui, vec![entry]);
        assert!(batch.transactions.is_empty());
        assert!(batch.faults.is_empty());
    }
}
