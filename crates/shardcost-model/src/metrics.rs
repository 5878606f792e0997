//! Tracing hooks for operator costing.
//!
//! This module purposefully avoids pulling a subscriber; the binary layer
//! decides where events go.

use crate::cost::CostOutput;

#[cfg(feature = "tracing")]
pub fn emit_cost(op: &'static str, phase: &'static str, shards: u64, cost: &CostOutput) {
    tracing::debug!(
        op,
        phase,
        shards,
        result_docs = cost.result_docs,
        vol_network = cost.vol_network,
        ram_volume_total = cost.ram_volume_total,
        time_total = cost.time_total,
        "phase costed"
    );
}

#[cfg(not(feature = "tracing"))]
pub fn emit_cost(_op: &'static str, _phase: &'static str, _shards: u64, _cost: &CostOutput) {
    /* no-op */
}

#[cfg(feature = "tracing")]
pub fn emit_routing(op: &'static str, routed: bool, shards: u64, servers: u64) {
    tracing::debug!(op, routed, shards, servers, "shard routing");
}

#[cfg(not(feature = "tracing"))]
pub fn emit_routing(_op: &'static str, _routed: bool, _shards: u64, _servers: u64) {
    /* no-op */
}
