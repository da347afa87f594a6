// Copyright (c) Portal Bridge, Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::error::BridgeResult;
use crate::types::RawLogEntry;
use async_trait::async_trait;

/// Boundary to the per-chain log source. Implementations own transport,
/// pagination and retry policy; the engine only requires that every returned
/// entry carries enough context to decode without further network calls.
///
/// The range is half-open: `[from_block, to_block)`. For object-based chains
/// the bounds are checkpoint sequence numbers.
#[async_trait]
pub trait ChainLogSource: Send + Sync {
    async fn fetch(&self, from_block: u64, to_block: u64) -> BridgeResult<Vec<RawLogEntry>>;
}
