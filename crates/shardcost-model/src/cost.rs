//! The analytical cost formula.
//!
//! One query message goes to each contacted shard and one result message per
//! matching document comes back. The local working set of a shard is its
//! resident index plus the data scanned to evaluate the predicate. Idle shards
//! keep their index resident unless the query was routed to a single shard.

use serde::{Deserialize, Serialize};
use shardcost_core::config::CostConfig;
use shardcost_core::schema::PrimitiveType;
use shardcost_core::size::bytes_to_gb;

/// Full input set of one cost computation.
#[derive(Debug, Clone, Copy)]
pub struct CostInputs<'a> {
    /// Shards the query message is sent to.
    pub shards_contacted: u64,
    pub result_docs: f64,
    pub filter_types: &'a [PrimitiveType],
    pub projection_types: &'a [PrimitiveType],
    pub local_docs_per_shard: f64,
    pub selectivity: f64,
    pub doc_size: f64,
    pub servers_working: u64,
    pub servers_total: u64,
    pub indexes_per_shard: u64,
}

/// Result of one cost computation. All volumes in bytes, times in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostOutput {
    pub result_docs: f64,
    /// `result_docs * size_msg`.
    pub result_size_bytes: f64,

    pub size_query: f64,
    pub size_msg: f64,
    pub vol_network: f64,

    /// Working set of one active shard.
    pub ram_volume: f64,
    /// Active plus idle shards.
    pub ram_volume_total: f64,

    pub time_network: f64,
    pub time_ram: f64,
    pub time_total: f64,

    pub co2: f64,
    pub price: f64,
}

/// `Σ (overhead + size(t))` over `types`.
pub fn size_of_fields(types: &[PrimitiveType], cfg: &CostConfig) -> f64 {
    types.iter().map(|t| cfg.attribute_size(*t) as f64).sum()
}

/// Query message: filter fields followed by projected fields, no dedup.
pub fn query_size(filter: &[PrimitiveType], projection: &[PrimitiveType], cfg: &CostConfig) -> f64 {
    size_of_fields(filter, cfg) + size_of_fields(projection, cfg)
}

pub fn operator_cost(inputs: &CostInputs<'_>, cfg: &CostConfig) -> CostOutput {
    // Counts are widened before multiplying; products of u64 inputs can overflow.
    let index_bytes = inputs.indexes_per_shard as f64 * cfg.index_size_bytes as f64;

    let size_query = query_size(inputs.filter_types, inputs.projection_types, cfg);
    let size_msg = size_of_fields(inputs.projection_types, cfg);

    let vol_network = inputs.shards_contacted as f64 * size_query + inputs.result_docs * size_msg;

    let ram_scanned = inputs.local_docs_per_shard * inputs.selectivity * inputs.doc_size;
    let ram_local = index_bytes + ram_scanned;

    let active_ram_cost = inputs.servers_working as f64 * ram_local;
    let inactive_count = inputs.servers_total.saturating_sub(inputs.servers_working);
    let inactive_ram_cost = if inputs.shards_contacted == 1 && inputs.servers_total > 1 {
        // point lookup: idle shards are never touched
        0.0
    } else {
        inactive_count as f64 * index_bytes
    };
    let ram_volume_total = active_ram_cost + inactive_ram_cost;

    let time_network = vol_network / cfg.bandwidth_bps as f64;
    // Result emission streams straight to the network and is not charged again.
    let time_ram = ram_local / cfg.ram_bps as f64;
    let time_total = time_network + time_ram;

    let ram_gb = bytes_to_gb(ram_volume_total);
    let net_gb = bytes_to_gb(vol_network);
    let co2 = net_gb * cfg.co2_network_rate + ram_gb * cfg.co2_ram_rate;
    let price = net_gb * cfg.price_rate;

    CostOutput {
        result_docs: inputs.result_docs,
        result_size_bytes: inputs.result_docs * size_msg,
        size_query,
        size_msg,
        vol_network,
        ram_volume: ram_local,
        ram_volume_total,
        time_network,
        time_ram,
        time_total,
        co2,
        price,
    }
}
