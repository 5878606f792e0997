//! Map-reduce aggregation on a sharded collection.
//!
//! MATCH scans locally, SHUFFLE moves matched records to the shard owning
//! their group (free when grouping on the sharding key), REDUCE emits the
//! groups from a single coordinator.

use serde::{Deserialize, Serialize};
use shardcost_core::config::CostConfig;
use shardcost_core::error::Result;
use shardcost_core::resolve::resolve_field_types;
use shardcost_core::schema::Collection;
use shardcost_core::size::bytes_to_gb;
use shardcost_core::stats::Statistics;

use super::{key_in, routed_shards};
use crate::cardinality::{known_distinct, scan_selectivity, DEFAULT_GROUP_COUNT};
use crate::cost::{operator_cost, CostInputs, CostOutput};
use crate::metrics;
use crate::query::AggregateQuery;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateCost {
    /// Groups emitted by the reducer.
    pub result_docs: f64,
    /// Documents entering the pipeline after MATCH.
    pub docs_matched: f64,
    /// Aggregation runs where the data lives; no shuffle.
    pub co_located: bool,

    pub match_phase: CostOutput,
    pub vol_shuffle: f64,
    pub time_shuffle: f64,
    pub reduce_phase: CostOutput,

    pub vol_network: f64,
    pub ram_volume: f64,
    pub time_total: f64,
    pub co2: f64,
    pub price: f64,
}

/// Shuffle traffic for `docs` records of `msg_size` bytes each.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Shuffle {
    volume: f64,
    time: f64,
    co2: f64,
    price: f64,
}

impl Shuffle {
    fn network(docs: f64, msg_size: f64, cfg: &CostConfig) -> Self {
        let volume = docs * msg_size;
        let gb = bytes_to_gb(volume);
        Self {
            volume,
            time: volume / cfg.bandwidth_bps as f64,
            co2: gb * cfg.co2_network_rate,
            price: gb * cfg.price_rate,
        }
    }
}

/// Projected fields plus the group key, each named once.
fn shuffle_fields(query: &AggregateQuery) -> Vec<&str> {
    let mut fields: Vec<&str> = Vec::with_capacity(query.project_fields.len() + 1);
    for name in query
        .project_fields
        .iter()
        .chain(std::iter::once(&query.group_by_key))
    {
        if !fields.contains(&name.as_str()) {
            fields.push(name.as_str());
        }
    }
    fields
}

pub fn aggregate_with_sharding(
    coll: &Collection,
    query: &AggregateQuery,
    stats: &Statistics,
    cfg: &CostConfig,
) -> Result<AggregateCost> {
    let servers = stats.require_servers()?;

    // MATCH
    let sel = scan_selectivity(&query.match_filter_keys, query.selectivity, stats);
    let docs_matched = coll.doc_count() as f64 * sel;
    let routed = key_in(query.sharding_key.as_deref(), &query.match_filter_keys);
    let match_shards = routed_shards(routed, servers);
    metrics::emit_routing("aggregate.match", routed, match_shards, servers);

    let match_filter = resolve_field_types(coll, &query.match_filter_keys)?;
    let match_phase = operator_cost(
        &CostInputs {
            shards_contacted: match_shards,
            // feeds the shuffle, not the client
            result_docs: docs_matched,
            filter_types: &match_filter,
            projection_types: &[],
            local_docs_per_shard: coll.doc_count() as f64 / servers as f64,
            selectivity: sel,
            doc_size: coll.doc_size(),
            servers_working: match_shards,
            servers_total: servers,
            indexes_per_shard: 1,
        },
        cfg,
    );
    metrics::emit_cost("aggregate", "match", match_shards, &match_phase);

    // SHUFFLE
    let co_located = query.sharding_key.as_deref() == Some(query.group_by_key.as_str());
    let shuffle = if co_located {
        Shuffle::default()
    } else {
        let types = resolve_field_types(coll, &shuffle_fields(query))?;
        let msg_size = cfg.key_overhead_bytes as f64
            + types
                .iter()
                .map(|t| cfg.type_sizes.size_of(*t) as f64)
                .sum::<f64>();
        Shuffle::network(docs_matched, msg_size, cfg)
    };

    // REDUCE
    let groups = known_distinct(&query.group_by_key, stats).unwrap_or(DEFAULT_GROUP_COUNT);
    let result_docs = docs_matched.min(groups as f64);
    let projection = resolve_field_types(coll, &query.project_fields)?;
    let reduce_phase = operator_cost(
        &CostInputs {
            shards_contacted: 1,
            result_docs,
            filter_types: &[],
            projection_types: &projection,
            local_docs_per_shard: 0.0,
            selectivity: 0.0,
            doc_size: 0.0,
            servers_working: 1,
            servers_total: servers,
            indexes_per_shard: 1,
        },
        cfg,
    );
    metrics::emit_cost("aggregate", "reduce", 1, &reduce_phase);

    Ok(AggregateCost {
        result_docs,
        docs_matched,
        co_located,
        vol_network: match_phase.vol_network + shuffle.volume + reduce_phase.vol_network,
        // reducer accumulators are small next to the scan
        ram_volume: match_phase.ram_volume_total,
        time_total: match_phase.time_total + shuffle.time + reduce_phase.time_total,
        co2: match_phase.co2 + shuffle.co2 + reduce_phase.co2,
        price: match_phase.price + shuffle.price + reduce_phase.price,
        match_phase,
        vol_shuffle: shuffle.volume,
        time_shuffle: shuffle.time,
        reduce_phase,
    })
}
