// Copyright (c) Portal Bridge, Inc.
// SPDX-License-Identifier: Apache-2.0

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    // Requested chain name is not in the registry
    UnknownChain(String),
    // Malformed block/checkpoint range (from_block must be < to_block)
    InvalidRange { from_block: u64, to_block: u64 },
    // A log with a recognized bridge signature had an unexpected argument shape
    Decode(String),
    // More than one primary operation event in a single transaction
    AmbiguousTransaction { tx: String, primary_events: usize },
    // Chain configuration could not be parsed into a descriptor
    InvalidChainConfig(String),
    // A chain is registered but has no log source attached
    NoLogSource(String),
    // Provider/transport error from the log source
    ProviderError(String),
    // Transient provider error, safe to retry at the call site
    TransientProviderError(String),
    // Uncategorized error
    Generic(String),
}

pub type BridgeResult<T> = Result<T, BridgeError>;

impl BridgeError {
    /// Returns a short string identifying the error type for metrics labels
    pub fn error_type(&self) -> &'static str {
        match self {
            BridgeError::UnknownChain(_) => "unknown_chain",
            BridgeError::InvalidRange { .. } => "invalid_range",
            BridgeError::Decode(_) => "decode_error",
            BridgeError::AmbiguousTransaction { .. } => "ambiguous_transaction",
            BridgeError::InvalidChainConfig(_) => "invalid_chain_config",
            BridgeError::NoLogSource(_) => "no_log_source",
            BridgeError::ProviderError(_) => "provider_error",
            BridgeError::TransientProviderError(_) => "transient_provider_error",
            BridgeError::Generic(_) => "generic",
        }
    }
}

impl std::fmt::Display for BridgeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BridgeError::UnknownChain(name) => write!(f, "unknown chain: {name}"),
            BridgeError::InvalidRange {
                from_block,
                to_block,
            } => write!(
                f,
                "invalid range: from_block {from_block} must be less than to_block {to_block}"
            ),
            BridgeError::Decode(msg) => write!(f, "decode error: {msg}"),
            BridgeError::AmbiguousTransaction { tx, primary_events } => write!(
                f,
                "ambiguous transaction {tx}: found {primary_events} primary operation events, expected exactly one"
            ),
            BridgeError::InvalidChainConfig(msg) => write!(f, "invalid chain config: {msg}"),
            BridgeError::NoLogSource(name) => {
                write!(f, "no log source registered for chain: {name}")
            }
            BridgeError::ProviderError(msg) => write!(f, "provider error: {msg}"),
            BridgeError::TransientProviderError(msg) => {
                write!(f, "transient provider error: {msg}")
            }
            BridgeError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for BridgeError {}

impl From<ethers::providers::ProviderError> for BridgeError {
    fn from(e: ethers::providers::ProviderError) -> Self {
        BridgeError::ProviderError(e.to_string())
    }
}
