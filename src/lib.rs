// Copyright (c) Portal Bridge, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Canonical bridge-transfer extraction for the Portal token bridge.
//!
//! Raw, chain-specific on-chain activity (contract logs on account-based
//! chains, Move-call events on object-based chains) is decoded, classified
//! and normalized into one [`types::BridgeTransfer`] shape per transaction,
//! so consumers depend on a single canonical record rather than per-chain
//! log formats. The engine is computation-only: the per-chain
//! [`source::ChainLogSource`] owns transport, retries and chunking.

pub mod abi;
pub mod classify;
pub mod config;
pub mod decode;
pub mod error;
pub mod eth_source;
pub mod events;
pub mod metrics;
pub mod monitor;
pub mod source;
pub mod types;

#[cfg(test)]
pub mod test_utils;


pub use config::{ChainConfig, ChainDescriptor, ChainFamily, ChainRegistry};
pub use error::{BridgeError, BridgeResult};
pub use metrics::BridgeMetrics;
pub use monitor::{BridgeMonitor, TransferQueryResult};
pub use source::ChainLogSource;
pub use types::{BridgeTransfer, RawLogEntry};
