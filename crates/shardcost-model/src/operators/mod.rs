//! Operator costing: cardinality estimation plus shard routing, composed from
//! one or more `operator_cost` invocations.

pub mod aggregate;
pub mod filter;
pub mod join;

/// Shards contacted: one when the routing key pins the query, else all.
pub(crate) fn routed_shards(routed: bool, servers: u64) -> u64 {
    if routed {
        1
    } else {
        servers
    }
}

/// `key` is declared and present in `keys`.
pub(crate) fn key_in(key: Option<&str>, keys: &[String]) -> bool {
    key.map_or(false, |k| keys.iter().any(|f| f == k))
}
