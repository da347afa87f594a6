// Copyright (c) Portal Bridge, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Classification and normalization. One transaction resolves to at most one
//! canonical transfer: a single primary operation event decides direction and
//! counterparties; a wrapped-token mint is the fallback when no primary event
//! is present; conflicting primaries are surfaced, never guessed away.

use crate::config::ChainDescriptor;
use crate::decode::TxEvents;
use crate::error::{BridgeError, BridgeResult};
use crate::events::BridgeOperation;
use crate::types::BridgeTransfer;
use ethers::types::U256;

/// Classify one transaction's events into zero or one canonical transfer.
///
/// Priority is fixed and independent of event order within the transaction:
/// deposits (`WrapAndTransfer`, `TransferTokens`) and withdrawals
/// (`CompleteTransfer`, `CompleteTransferAndUnwrap`) are primary; `Mint` is
/// only consulted when no primary event exists. More than one primary event
/// in the same transaction is a protocol invariant violation.
pub fn classify(
    chain: &ChainDescriptor,
    tx: &TxEvents,
) -> BridgeResult<Option<BridgeTransfer>> {
    let primaries: Vec<_> = tx
        .events
        .iter()
        .filter(|e| e.operation.is_primary())
        .collect();

    if primaries.len() > 1 {
        return Err(BridgeError::AmbiguousTransaction {
            tx: tx.tx_id.clone(),
            primary_events: primaries.len(),
        });
    }

    let event = match primaries.first() {
        Some(event) => *event,
        None => {
            // Fallback: wrapped-asset completion expressed as a mint.
            match tx
                .events
                .iter()
                .find(|e| matches!(e.operation, BridgeOperation::Mint { .. }))
            {
                Some(event) => event,
                None => return Ok(None),
            }
        }
    };

    let (from, to, token, amount, is_deposit) = match &event.operation {
        BridgeOperation::WrapAndTransfer { sender, amount, .. } => (
            sender.clone(),
            chain.bridge_display(),
            chain.native_token_display(),
            *amount,
            true,
        ),
        BridgeOperation::TransferTokens {
            sender,
            token,
            amount,
            to_origin_chain,
        } => {
            // A wrapped token heading back to its origin chain is burned, so
            // the counterparty is the zero sentinel, not the bridge.
            let to = if *to_origin_chain {
                chain.zero_display()
            } else {
                chain.bridge_display()
            };
            (sender.clone(), to, token.clone(), *amount, true)
        }
        BridgeOperation::CompleteTransfer {
            recipient,
            token,
            amount,
        } => (
            chain.bridge_display(),
            recipient.clone(),
            token.clone(),
            *amount,
            false,
        ),
        BridgeOperation::CompleteTransferAndUnwrap { recipient, amount } => (
            chain.bridge_display(),
            recipient.clone(),
            chain.native_token_display(),
            *amount,
            false,
        ),
        BridgeOperation::Mint {
            recipient,
            token,
            amount,
        } => (
            chain.zero_display(),
            recipient.clone(),
            token.clone(),
            *amount,
            false,
        ),
    };

    let amount = normalize_amount(chain, amount)?;
    let via_relayer = is_deposit && chain.is_relayer(&from);

    Ok(Some(BridgeTransfer {
        block_number: tx.block_number,
        tx_hash: tx.tx_id.clone(),
        from,
        to,
        token,
        amount,
        is_deposit,
        via_relayer,
    }))
}

// Applied exactly once per transfer, and only here. Integer arithmetic
// throughout; amounts never pass through floating point.
fn normalize_amount(chain: &ChainDescriptor, amount: U256) -> BridgeResult<U256> {
    if chain.decimal_shift == 0 {
        return Ok(amount);
    }
    amount
        .checked_mul(U256::exp10(chain.decimal_shift as usize))
        .ok_or_else(|| {
            BridgeError::Generic(format!(
                "amount {amount} overflows with decimal shift {} on chain {}",
                chain.decimal_shift, chain.name
            ))
        })
}
