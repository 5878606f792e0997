//! Nested-loop join, costed as one outer selection plus a representative
//! inner lookup multiplied by an iteration count.
//!
//! The unsharded variant charges the lookup once per *join output* document;
//! the sharded variant charges it once per *outer* document. Both are kept.

use serde::{Deserialize, Serialize};
use shardcost_core::config::CostConfig;
use shardcost_core::error::Result;
use shardcost_core::resolve::resolve_field_types;
use shardcost_core::schema::Collection;
use shardcost_core::stats::Statistics;

use super::{key_in, routed_shards};
use crate::cardinality::{known_distinct, scan_selectivity, FALLBACK_SELECTIVITY};
use crate::cost::{operator_cost, CostInputs, CostOutput};
use crate::metrics;
use crate::query::JoinQuery;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JoinCost {
    /// Join output cardinality.
    pub result_docs: f64,
    /// How many times the inner lookup is charged.
    pub iterations: f64,
    pub outer: CostOutput,
    pub inner_per_iteration: CostOutput,

    pub vol_network: f64,
    pub ram_volume: f64,
    pub time_total: f64,
    pub co2: f64,
    pub price: f64,
}

impl JoinCost {
    fn fold(result_docs: f64, iterations: f64, outer: CostOutput, inner: CostOutput) -> Self {
        Self {
            result_docs,
            iterations,
            vol_network: outer.vol_network + inner.vol_network * iterations,
            ram_volume: outer.ram_volume_total + inner.ram_volume_total * iterations,
            time_total: outer.time_total + inner.time_total * iterations,
            co2: outer.co2 + inner.co2 * iterations,
            price: outer.price + inner.price * iterations,
            outer,
            inner_per_iteration: inner,
        }
    }
}

pub fn nested_loop_without_sharding(
    left: &Collection,
    right: &Collection,
    query: &JoinQuery,
    stats: &Statistics,
    cfg: &CostConfig,
) -> Result<JoinCost> {
    let servers = stats.require_servers()?;

    let outer_sel = scan_selectivity(&query.outer_filter_keys, query.outer_selectivity, stats);
    let ndist = known_distinct(&query.join_key, stats);
    let inner_sel = ndist.map_or(FALLBACK_SELECTIVITY, |n| 1.0 / n as f64);

    let outer_result_docs = left.doc_count() as f64 * outer_sel;
    let right_docs = right.doc_count() as f64;
    let join_result_docs = match ndist {
        Some(n) => outer_result_docs * (right_docs / n as f64),
        None => FALLBACK_SELECTIVITY * outer_result_docs * right_docs,
    };

    let outer_filter = resolve_field_types(left, &query.outer_filter_keys)?;
    let outer_projection = resolve_field_types(left, &query.outer_select_fields)?;
    let outer = operator_cost(
        &CostInputs {
            shards_contacted: servers,
            result_docs: outer_result_docs,
            filter_types: &outer_filter,
            projection_types: &outer_projection,
            local_docs_per_shard: left.doc_count() as f64 / servers as f64,
            selectivity: outer_sel,
            doc_size: left.doc_size(),
            servers_working: servers,
            servers_total: servers,
            indexes_per_shard: 1,
        },
        cfg,
    );
    metrics::emit_cost("nested_loop", "outer", servers, &outer);

    let inner_filter = resolve_field_types(right, std::slice::from_ref(&query.join_key))?;
    let inner_projection = resolve_field_types(right, &query.inner_select_fields)?;
    let inner = operator_cost(
        &CostInputs {
            shards_contacted: servers,
            // one match per lookup
            result_docs: 1.0,
            filter_types: &inner_filter,
            projection_types: &inner_projection,
            local_docs_per_shard: right_docs / servers as f64,
            selectivity: inner_sel,
            doc_size: right.doc_size(),
            servers_working: servers,
            servers_total: servers,
            indexes_per_shard: 1,
        },
        cfg,
    );
    metrics::emit_cost("nested_loop", "inner", servers, &inner);

    Ok(JoinCost::fold(join_result_docs, join_result_docs, outer, inner))
}

pub fn nested_loop_with_sharding(
    left: &Collection,
    right: &Collection,
    query: &JoinQuery,
    stats: &Statistics,
    cfg: &CostConfig,
) -> Result<JoinCost> {
    let servers = stats.require_servers()?;

    let outer_sel = scan_selectivity(&query.outer_filter_keys, query.outer_selectivity, stats);
    let inner_sel = known_distinct(&query.join_key, stats)
        .map_or(FALLBACK_SELECTIVITY, |n| 1.0 / n as f64);

    let outer_result_docs = left.doc_count() as f64 * outer_sel;
    let right_docs = right.doc_count() as f64;
    let join_result_docs = outer_result_docs * (right_docs * inner_sel);

    let outer_routed = key_in(query.outer_sharding_key.as_deref(), &query.outer_filter_keys);
    let inner_routed = query.inner_sharding_key.as_deref() == Some(query.join_key.as_str());
    let outer_shards = routed_shards(outer_routed, servers);
    let inner_shards = routed_shards(inner_routed, servers);
    metrics::emit_routing("nested_loop_sharded.outer", outer_routed, outer_shards, servers);
    metrics::emit_routing("nested_loop_sharded.inner", inner_routed, inner_shards, servers);

    let outer_filter = resolve_field_types(left, &query.outer_filter_keys)?;
    let outer_projection = resolve_field_types(left, &query.outer_select_fields)?;
    let outer = operator_cost(
        &CostInputs {
            shards_contacted: outer_shards,
            result_docs: outer_result_docs,
            filter_types: &outer_filter,
            projection_types: &outer_projection,
            local_docs_per_shard: left.doc_count() as f64 / servers as f64,
            selectivity: outer_sel,
            doc_size: left.doc_size(),
            servers_working: outer_shards,
            servers_total: servers,
            indexes_per_shard: 1,
        },
        cfg,
    );
    metrics::emit_cost("nested_loop_sharded", "outer", outer_shards, &outer);

    let matches_per_lookup = if outer_result_docs > 0.0 {
        join_result_docs / outer_result_docs
    } else {
        0.0
    };

    let inner_filter = resolve_field_types(right, std::slice::from_ref(&query.join_key))?;
    let inner_projection = resolve_field_types(right, &query.inner_select_fields)?;
    let inner = operator_cost(
        &CostInputs {
            shards_contacted: inner_shards,
            result_docs: matches_per_lookup,
            filter_types: &inner_filter,
            projection_types: &inner_projection,
            local_docs_per_shard: right_docs / servers as f64,
            selectivity: inner_sel,
            doc_size: right.doc_size(),
            servers_working: inner_shards,
            servers_total: servers,
            indexes_per_shard: 1,
        },
        cfg,
    );
    metrics::emit_cost("nested_loop_sharded", "inner", inner_shards, &inner);

    Ok(JoinCost::fold(join_result_docs, outer_result_docs, outer, inner))
}
