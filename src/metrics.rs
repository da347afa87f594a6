// Copyright (c) Portal Bridge, Inc.
// SPDX-License-Identifier: Apache-2.0

use prometheus::{
    register_int_counter_vec_with_registry, register_int_gauge_vec_with_registry, IntCounterVec,
    IntGaugeVec, Registry,
};

#[derive(Clone, Debug)]
pub struct BridgeMetrics {
    pub(crate) raw_entries_fetched: IntCounterVec,
    pub(crate) transfers_classified: IntCounterVec,
    pub(crate) decode_faults: IntCounterVec,
    pub(crate) ambiguous_transactions: IntCounterVec,
    pub(crate) last_queried_block: IntGaugeVec,
}

impl BridgeMetrics {
    pub fn new(registry: &Registry) -> Self {
        Self {
            raw_entries_fetched: register_int_counter_vec_with_registry!(
                "bridge_monitor_raw_entries_fetched",
                "Raw log entries fetched from the chain log source",
                &["chain"],
                registry,
            )
            .unwrap(),
            transfers_classified: register_int_counter_vec_with_registry!(
                "bridge_monitor_transfers_classified",
                "Canonical bridge transfers produced, by direction",
                &["chain", "direction"],
                registry,
            )
            .unwrap(),
            decode_faults: register_int_counter_vec_with_registry!(
                "bridge_monitor_decode_faults",
                "Log entries with a recognized signature but unexpected shape",
                &["chain"],
                registry,
            )
            .unwrap(),
            ambiguous_transactions: register_int_counter_vec_with_registry!(
                "bridge_monitor_ambiguous_transactions",
                "Transactions with more than one primary operation event",
                &["chain"],
                registry,
            )
            .unwrap(),
            last_queried_block: register_int_gauge_vec_with_registry!(
                "bridge_monitor_last_queried_block",
                "Upper bound (exclusive) of the most recent range query",
                &["chain"],
                registry,
            )
            .unwrap(),
        }
    }

    pub fn new_for_testing() -> Self {
        Self::new(&Registry::new())
    }
}
