// Copyright (c) Portal Bridge, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Account-based chain log source backed by an ethers provider. Issues two
//! `eth_getLogs` queries per range: everything the bridge contract emitted,
//! plus zero-address-origin ERC20 transfers (wrapped-token mints). Chunking
//! of oversized ranges is the caller's concern, same as retries.

use crate::abi::TransferFilter;
use crate::error::{BridgeError, BridgeResult};
use crate::source::ChainLogSource;
use crate::types::{EthLog, RawLogEntry};
use async_trait::async_trait;
use ethers::contract::EthEvent;
use ethers::providers::{Http, JsonRpcClient, Middleware, Provider};
use ethers::types::{Address as EthAddress, Filter, Log, H256};
use tap::TapFallible;

pub struct EthLogSource<P> {
    provider: Provider<P>,
    bridge_address: EthAddress,
}

impl EthLogSource<Http> {
    pub fn connect(provider_url: &str, bridge_address: EthAddress) -> anyhow::Result<Self> {
        let provider = Provider::<Http>::try_from(provider_url)?;
        Ok(Self {
            provider,
            bridge_address,
        })
    }
}

impl<P> EthLogSource<P>
where
    P: JsonRpcClient + 'static,
{
    pub fn new(provider: Provider<P>, bridge_address: EthAddress) -> Self {
        Self {
            provider,
            bridge_address,
        }
    }

    async fn get_logs(&self, filter: &Filter) -> BridgeResult<Vec<Log>> {
        self.provider
            .get_logs(filter)
            .await
            .map_err(|e| BridgeError::ProviderError(e.to_string()))
            .tap_err(|e| {
                tracing::error!("get_logs failed. Filter: {:?}. Error {:?}", filter, e)
            })
    }
}

fn into_entry(log: Log) -> BridgeResult<RawLogEntry> {
    let block_number = log
        .block_number
        .ok_or(BridgeError::ProviderError(
            "Provider returns log without block_number".into(),
        ))?
        .as_u64();
    let tx_hash = log.transaction_hash.ok_or(BridgeError::ProviderError(
        "Provider returns log without transaction_hash".into(),
    ))?;
    let tx_index = log
        .transaction_index
        .ok_or(BridgeError::ProviderError(
            "Provider returns log without transaction_index".into(),
        ))?
        .as_u64();
    let event_index = log
        .log_index
        .ok_or(BridgeError::ProviderError(
            "Provider returns log without log_index".into(),
        ))?
        .as_u64();
    Ok(RawLogEntry::Eth(EthLog {
        block_number,
        tx_hash,
        tx_index,
        event_index,
        log,
    }))
}

#[async_trait]
impl<P> ChainLogSource for EthLogSource<P>
where
    P: JsonRpcClient + 'static,
{
    async fn fetch(&self, from_block: u64, to_block: u64) -> BridgeResult<Vec<RawLogEntry>> {
        if from_block >= to_block {
            return Ok(vec![]);
        }
        // eth_getLogs ranges are inclusive on both ends
        let last_block = to_block - 1;

        let bridge_filter = Filter::new()
            .from_block(from_block)
            .to_block(last_block)
            .address(self.bridge_address);
        let bridge_logs = self.get_logs(&bridge_filter).await?;

        // Safeguard check that all events are emitted from the requested
        // contract address
        if bridge_logs.iter().any(|log| log.address != self.bridge_address) {
            return Err(BridgeError::ProviderError(format!(
                "Provider returns logs from different contract address (expected: {:?})",
                self.bridge_address
            )));
        }

        let mint_filter = Filter::new()
            .from_block(from_block)
            .to_block(last_block)
            .topic0(TransferFilter::signature())
            .topic1(H256::zero());
        let mint_logs = self.get_logs(&mint_filter).await?;

        let mut entries = bridge_logs
            .into_iter()
            .chain(mint_logs)
            .map(into_entry)
            .collect::<BridgeResult<Vec<_>>>()?;
        entries.sort_by_key(|e| (e.block_number(), e.tx_index(), e.event_index()));
        entries.dedup();
        Ok(entries)
    }
}
