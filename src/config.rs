// Copyright (c) Portal Bridge, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Chain adapter registry. Descriptors are immutable, resolved once at
//! startup, and passed into the engine by reference so tests can register
//! synthetic chains without touching shared state.

use crate::error::{BridgeError, BridgeResult};
use crate::types::MoveAddress;
use ethers::types::Address as EthAddress;
use ethers::utils::to_checksum;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChainFamily {
    AccountBased,
    ObjectBased,
}

/// Per-family contract identities. Membership in `relayers` never changes
/// classification, only the provenance flag on the canonical record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainContracts {
    Evm {
        bridge: EthAddress,
        /// Canonical wrapped-native token, used as the native-token sentinel.
        wrapped_native: EthAddress,
        relayers: HashSet<EthAddress>,
    },
    Move {
        /// Package whose events the decoder accepts.
        bridge_package: MoveAddress,
        /// Bridge object funds move through, used as counterparty address.
        bridge: MoveAddress,
        /// Native coin type, used as the native-token sentinel.
        native_coin: String,
        relayers: HashSet<MoveAddress>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainDescriptor {
    pub name: String,
    pub contracts: ChainContracts,
    /// Power-of-ten shift applied exactly once to every amount, for chains
    /// whose on-chain events carry decimal-capped values.
    pub decimal_shift: u32,
}

impl ChainDescriptor {
    pub fn family(&self) -> ChainFamily {
        match self.contracts {
            ChainContracts::Evm { .. } => ChainFamily::AccountBased,
            ChainContracts::Move { .. } => ChainFamily::ObjectBased,
        }
    }

    /// Bridge contract address in canonical display form.
    pub fn bridge_display(&self) -> String {
        match &self.contracts {
            ChainContracts::Evm { bridge, .. } => to_checksum(bridge, None),
            ChainContracts::Move { bridge, .. } => bridge.to_string(),
        }
    }

    /// Native-token sentinel in canonical display form.
    pub fn native_token_display(&self) -> String {
        match &self.contracts {
            ChainContracts::Evm { wrapped_native, .. } => to_checksum(wrapped_native, None),
            ChainContracts::Move { native_coin, .. } => native_coin.clone(),
        }
    }

    /// Zero-address sentinel. The canonical record uses the 20-byte form for
    /// both families, matching what downstream consumers already key on.
    pub fn zero_display(&self) -> String {
        to_checksum(&EthAddress::zero(), None)
    }

    pub fn is_relayer(&self, address: &str) -> bool {
        match &self.contracts {
            ChainContracts::Evm { relayers, .. } => address
                .parse::<EthAddress>()
                .map(|a| relayers.contains(&a))
                .unwrap_or(false),
            ChainContracts::Move { relayers, .. } => address
                .parse::<MoveAddress>()
                .map(|a| relayers.contains(&a))
                .unwrap_or(false),
        }
    }
}

/// Serde-facing chain table entry. `bridge-package` is required for
/// object-based chains and ignored for account-based ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ChainConfig {
    pub name: String,
    pub family: ChainFamily,
    // Bridge contract (account-based) or bridge object (object-based)
    pub bridge_address: String,
    // Wrapped-native token address or native coin type
    pub native_token: String,
    #[serde(default)]
    pub bridge_package: Option<String>,
    #[serde(default)]
    pub decimal_shift: u32,
    #[serde(default)]
    pub relayer_addresses: Vec<String>,
}

impl TryFrom<ChainConfig> for ChainDescriptor {
    type Error = BridgeError;

    fn try_from(config: ChainConfig) -> BridgeResult<Self> {
        let contracts = match config.family {
            ChainFamily::AccountBased => {
                let bridge = config.bridge_address.parse::<EthAddress>().map_err(|e| {
                    BridgeError::InvalidChainConfig(format!(
                        "chain {}: bad bridge address {}: {e}",
                        config.name, config.bridge_address
                    ))
                })?;
                let wrapped_native = config.native_token.parse::<EthAddress>().map_err(|e| {
                    BridgeError::InvalidChainConfig(format!(
                        "chain {}: bad native token {}: {e}",
                        config.name, config.native_token
                    ))
                })?;
                let relayers = config
                    .relayer_addresses
                    .iter()
                    .map(|r| {
                        r.parse::<EthAddress>().map_err(|e| {
                            BridgeError::InvalidChainConfig(format!(
                                "chain {}: bad relayer address {r}: {e}",
                                config.name
                            ))
                        })
                    })
                    .collect::<BridgeResult<HashSet<_>>>()?;
                ChainContracts::Evm {
                    bridge,
                    wrapped_native,
                    relayers,
                }
            }
            ChainFamily::ObjectBased => {
                let bridge = config.bridge_address.parse::<MoveAddress>()?;
                let bridge_package = match &config.bridge_package {
                    Some(package) => package.parse::<MoveAddress>()?,
                    None => {
                        return Err(BridgeError::InvalidChainConfig(format!(
                            "chain {}: object-based chain requires bridge-package",
                            config.name
                        )))
                    }
                };
                let relayers = config
                    .relayer_addresses
                    .iter()
                    .map(|r| r.parse::<MoveAddress>())
                    .collect::<BridgeResult<HashSet<_>>>()?;
                ChainContracts::Move {
                    bridge_package,
                    bridge,
                    native_coin: config.native_token.clone(),
                    relayers,
                }
            }
        };
        Ok(ChainDescriptor {
            name: config.name,
            contracts,
            decimal_shift: config.decimal_shift,
        })
    }
}

/// Immutable chain-name to descriptor table.
#[derive(Debug, Clone, Default)]
pub struct ChainRegistry {
    chains: BTreeMap<String, Arc<ChainDescriptor>>,
}

impl ChainRegistry {
    pub fn from_configs(configs: Vec<ChainConfig>) -> BridgeResult<Self> {
        let mut chains = BTreeMap::new();
        for config in configs {
            let descriptor: ChainDescriptor = config.try_into()?;
            chains.insert(descriptor.name.clone(), Arc::new(descriptor));
        }
        Ok(Self { chains })
    }

    pub fn resolve(&self, name: &str) -> BridgeResult<Arc<ChainDescriptor>> {
        self.chains
            .get(name)
            .cloned()
            .ok_or_else(|| BridgeError::UnknownChain(name.to_string()))
    }

    pub fn chain_names(&self) -> impl Iterator<Item = &str> {
        self.chains.keys().map(|s| s.as_str())
    }

    /// The production chain table. Adding a chain here is a data change, not
    /// a logic change, unless the chain introduces a new family.
    pub fn mainnet() -> Self {
        let configs = vec![
            ChainConfig {
                name: "ethereum".to_string(),
                family: ChainFamily::AccountBased,
                bridge_address: "0x3ee18B2214AFF97000D974cf647E7C347E8fa585".to_string(),
                native_token: "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2".to_string(),
                bridge_package: None,
                decimal_shift: 0,
                relayer_addresses: vec![
                    "0x072AFd05d41A2a9Ca0fa1755d7B79f861eDb04F3".to_string(),
                    "0xdC382CDF2a25790F535a518EC26958c227e9DCF2".to_string(),
                ],
            },
            ChainConfig {
                name: "avalanche".to_string(),
                family: ChainFamily::AccountBased,
                bridge_address: "0x0e082F06FF657D94310cB8cE8B0D9a04541d8052".to_string(),
                native_token: "0xB31f66AA3C1e785363F0875A1B74E27b85FD66c7".to_string(),
                bridge_package: None,
                decimal_shift: 0,
                relayer_addresses: vec![],
            },
            ChainConfig {
                name: "optimism".to_string(),
                family: ChainFamily::AccountBased,
                bridge_address: "0x1D68124e65faFC907325e3EDbF8c4d84499DAa8b".to_string(),
                native_token: "0x8B21e9b7dAF2c4325bf3D18c1BeB79A347fE902A".to_string(),
                bridge_package: None,
                decimal_shift: 0,
                relayer_addresses: vec![],
            },
            ChainConfig {
                name: "moonbeam".to_string(),
                family: ChainFamily::AccountBased,
                bridge_address: "0xB1731c586ca89a23809861c6103F0b96B3F57D92".to_string(),
                native_token: "0xAcc15dC74880C9944775448304B263D191c6077F".to_string(),
                bridge_package: None,
                decimal_shift: 0,
                relayer_addresses: vec![],
            },
            ChainConfig {
                name: "klaytn".to_string(),
                family: ChainFamily::AccountBased,
                bridge_address: "0x5b08ac39EAED75c0439FC750d9FE7E1F9dD0193F".to_string(),
                native_token: "0xe4f05A66Ec68B54A58B17c22107b02e0232cC817".to_string(),
                bridge_package: None,
                decimal_shift: 0,
                relayer_addresses: vec![],
            },
            ChainConfig {
                name: "sui".to_string(),
                family: ChainFamily::ObjectBased,
                bridge_address:
                    "0xc57508ee0d4595e5a8728974a4a93a787d38f339757230d441e895422c07aba9"
                        .to_string(),
                native_token: "0x2::sui::SUI".to_string(),
                bridge_package: Some(
                    "0xc57508ee0d4595e5a8728974a4a93a787d38f339757230d441e895422c07aba9"
                        .to_string(),
                ),
                decimal_shift: 0,
                relayer_addresses: vec![],
            },
        ];
        // The built-in table is known-good; a parse failure here is a bug.
        Self::from_configs(configs).unwrap()
    }
}
