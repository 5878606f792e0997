//! Filter operator, with and without shard routing.

use shardcost_core::config::CostConfig;
use shardcost_core::error::Result;
use shardcost_core::resolve::resolve_field_types;
use shardcost_core::schema::Collection;
use shardcost_core::stats::Statistics;

use super::{key_in, routed_shards};
use crate::cardinality::filter_cardinality;
use crate::cost::{operator_cost, CostInputs, CostOutput};
use crate::metrics;
use crate::query::FilterQuery;

/// Scatter-gather filter: the query goes to every server.
pub fn filter_without_sharding(
    coll: &Collection,
    query: &FilterQuery,
    stats: &Statistics,
    cfg: &CostConfig,
) -> Result<CostOutput> {
    let servers = stats.require_servers()?;
    let card = filter_cardinality(
        coll.doc_count(),
        &query.filter_keys,
        &query.primary_key,
        query.selectivity,
        stats,
    );
    let filter_types = resolve_field_types(coll, &query.filter_keys)?;
    let projection_types = resolve_field_types(coll, &query.select_fields)?;

    let cost = operator_cost(
        &CostInputs {
            shards_contacted: servers,
            result_docs: card.result_docs,
            filter_types: &filter_types,
            projection_types: &projection_types,
            local_docs_per_shard: coll.doc_count() as f64 / servers as f64,
            selectivity: card.selectivity,
            doc_size: coll.doc_size(),
            servers_working: query.servers_working.unwrap_or(1),
            servers_total: servers,
            indexes_per_shard: query.indexes_per_shard,
        },
        cfg,
    );
    metrics::emit_cost("filter", "scan", servers, &cost);
    Ok(cost)
}

/// Filter on a sharded collection: a point lookup when the sharding key is
/// among the filter keys, a broadcast otherwise.
pub fn filter_with_sharding(
    coll: &Collection,
    query: &FilterQuery,
    stats: &Statistics,
    cfg: &CostConfig,
) -> Result<CostOutput> {
    let servers = stats.require_servers()?;
    let routed = key_in(query.sharding_key.as_deref(), &query.filter_keys);
    let shards = routed_shards(routed, servers);
    metrics::emit_routing("filter", routed, shards, servers);

    let card = filter_cardinality(
        coll.doc_count(),
        &query.filter_keys,
        &query.primary_key,
        query.selectivity,
        stats,
    );
    let filter_types = resolve_field_types(coll, &query.filter_keys)?;
    let projection_types = resolve_field_types(coll, &query.select_fields)?;

    let cost = operator_cost(
        &CostInputs {
            shards_contacted: shards,
            result_docs: card.result_docs,
            filter_types: &filter_types,
            projection_types: &projection_types,
            local_docs_per_shard: coll.doc_count() as f64 / servers as f64,
            selectivity: card.selectivity,
            doc_size: coll.doc_size(),
            servers_working: shards,
            servers_total: servers,
            indexes_per_shard: query.indexes_per_shard,
        },
        cfg,
    );
    metrics::emit_cost("filter_sharded", "scan", shards, &cost);
    Ok(cost)
}
