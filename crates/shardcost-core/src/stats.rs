//! Cardinality statistics supplied from outside the model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::ShardingInfo;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Documents per collection.
    #[serde(default)]
    pub doc_counts: BTreeMap<String, u64>,

    /// Distinct values per field name (shared across collections).
    #[serde(default)]
    pub distinct_values: BTreeMap<String, u64>,

    /// Shards in the cluster.
    pub servers: u64,

    /// Expected array arity keyed by dotted path (`Collection.field`).
    #[serde(default)]
    pub array_hints: BTreeMap<String, f64>,

    /// Declared sharding per collection.
    #[serde(default)]
    pub sharding: BTreeMap<String, ShardingInfo>,
}

impl Statistics {
    pub fn new(servers: u64) -> Self {
        Self {
            servers,
            ..Default::default()
        }
    }

    pub fn with_doc_count(mut self, collection: impl Into<String>, count: u64) -> Self {
        self.doc_counts.insert(collection.into(), count);
        self
    }

    pub fn with_distinct(mut self, field: impl Into<String>, count: u64) -> Self {
        self.distinct_values.insert(field.into(), count);
        self
    }

    /// Missing collections count as empty.
    pub fn doc_count(&self, collection: &str) -> u64 {
        self.doc_counts.get(collection).copied().unwrap_or(0)
    }

    pub fn distinct(&self, field: &str) -> Option<u64> {
        self.distinct_values.get(field).copied()
    }

    pub fn sharding_for(&self, collection: &str) -> Option<&ShardingInfo> {
        self.sharding.get(collection)
    }

    pub fn array_hint(&self, path: &str) -> Option<f64> {
        self.array_hints.get(path).copied()
    }

    /// The server count every operator divides by.
    pub fn require_servers(&self) -> Result<u64> {
        if self.servers == 0 {
            return Err(Error::Config("server count must be positive".into()));
        }
        Ok(self.servers)
    }
}

/// Average spread of one collection over the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShardingStats {
    pub docs_per_server: f64,
    pub distinct_keys_per_server: f64,
}

pub fn sharding_stats(total_docs: u64, distinct_keys: u64, servers: u64) -> Result<ShardingStats> {
    if servers == 0 {
        return Err(Error::Config("server count must be positive".into()));
    }
    Ok(ShardingStats {
        docs_per_server: total_docs as f64 / servers as f64,
        distinct_keys_per_server: distinct_keys as f64 / servers as f64,
    })
}
