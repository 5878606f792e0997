//! Database-wide size and sharding summaries.

use serde::{Deserialize, Serialize};
use shardcost_core::error::Result;
use shardcost_core::schema::Database;
use shardcost_core::size::{bytes_to_gb, collection_size};
use shardcost_core::stats::{sharding_stats, ShardingStats, Statistics};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSize {
    pub name: String,
    pub doc_size: f64,
    pub doc_count: u64,
    pub bytes: f64,
    pub gb: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeReport {
    pub database: String,
    pub collections: Vec<CollectionSize>,
    pub total_bytes: f64,
    pub total_gb: f64,
}

pub fn size_report(db: &Database) -> SizeReport {
    let collections: Vec<CollectionSize> = db
        .collections()
        .map(|c| {
            let bytes = collection_size(c);
            CollectionSize {
                name: c.name().to_string(),
                doc_size: c.doc_size(),
                doc_count: c.doc_count(),
                bytes,
                gb: bytes_to_gb(bytes),
            }
        })
        .collect();
    let total_bytes = collections.iter().map(|c| c.bytes).sum();
    SizeReport {
        database: db.name.clone(),
        collections,
        total_bytes,
        total_gb: bytes_to_gb(total_bytes),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionShards {
    pub name: String,
    /// Declared sharding key, if any.
    pub key: Option<String>,
    #[serde(flatten)]
    pub spread: ShardingStats,
}

/// Per-collection spread over `stats.servers` shards.
///
/// The distinct key count is the declared sharding cardinality, else the
/// key's distinct-value statistic, else 0.
pub fn shard_report(db: &Database, stats: &Statistics) -> Result<Vec<CollectionShards>> {
    db.collections()
        .map(|c| -> Result<CollectionShards> {
            let sharding = c.sharding().or_else(|| stats.sharding_for(c.name()));
            let key = sharding.map(|s| s.key.clone());
            let distinct = match sharding {
                Some(s) if s.cardinality > 0 => s.cardinality,
                Some(s) => stats.distinct(&s.key).unwrap_or(0),
                None => 0,
            };
            Ok(CollectionShards {
                name: c.name().to_string(),
                key,
                spread: sharding_stats(c.doc_count(), distinct, stats.servers)?,
            })
        })
        .collect()
}
