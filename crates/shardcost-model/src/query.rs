//! Query-shape descriptors: the full, explicit input set of each operator.

use serde::{Deserialize, Serialize};

fn one() -> u64 {
    1
}

/// A selection on one collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterQuery {
    #[serde(default)]
    pub filter_keys: Vec<String>,
    #[serde(default)]
    pub select_fields: Vec<String>,
    /// Overrides the statistics-derived selectivity when positive.
    #[serde(default)]
    pub selectivity: Option<f64>,
    /// Declared primary key; a filter covering it returns one document.
    #[serde(default)]
    pub primary_key: Vec<String>,
    /// Sharding key of the collection, for the sharded variant.
    #[serde(default)]
    pub sharding_key: Option<String>,
    /// Active shards for the unsharded variant (default 1).
    #[serde(default)]
    pub servers_working: Option<u64>,
    #[serde(default = "one")]
    pub indexes_per_shard: u64,
}

impl FilterQuery {
    pub fn new<S: Into<String>>(
        filter_keys: impl IntoIterator<Item = S>,
        select_fields: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            filter_keys: filter_keys.into_iter().map(Into::into).collect(),
            select_fields: select_fields.into_iter().map(Into::into).collect(),
            selectivity: None,
            primary_key: Vec::new(),
            sharding_key: None,
            servers_working: None,
            indexes_per_shard: 1,
        }
    }

    pub fn with_selectivity(mut self, selectivity: f64) -> Self {
        self.selectivity = Some(selectivity);
        self
    }

    pub fn with_primary_key<S: Into<String>>(mut self, pk: impl IntoIterator<Item = S>) -> Self {
        self.primary_key = pk.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_sharding_key(mut self, key: impl Into<String>) -> Self {
        self.sharding_key = Some(key.into());
        self
    }

    pub fn with_servers_working(mut self, servers: u64) -> Self {
        self.servers_working = Some(servers);
        self
    }
}

/// Nested-loop join: outer selection on the left, one lookup on the right per
/// outer document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinQuery {
    pub join_key: String,
    #[serde(default)]
    pub outer_filter_keys: Vec<String>,
    #[serde(default)]
    pub outer_select_fields: Vec<String>,
    #[serde(default)]
    pub inner_select_fields: Vec<String>,
    #[serde(default)]
    pub outer_selectivity: Option<f64>,
    #[serde(default)]
    pub outer_sharding_key: Option<String>,
    #[serde(default)]
    pub inner_sharding_key: Option<String>,
}

impl JoinQuery {
    pub fn new(join_key: impl Into<String>) -> Self {
        Self {
            join_key: join_key.into(),
            outer_filter_keys: Vec::new(),
            outer_select_fields: Vec::new(),
            inner_select_fields: Vec::new(),
            outer_selectivity: None,
            outer_sharding_key: None,
            inner_sharding_key: None,
        }
    }

    pub fn outer<S: Into<String>>(
        mut self,
        filter_keys: impl IntoIterator<Item = S>,
        select_fields: impl IntoIterator<Item = S>,
    ) -> Self {
        self.outer_filter_keys = filter_keys.into_iter().map(Into::into).collect();
        self.outer_select_fields = select_fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn inner<S: Into<String>>(mut self, select_fields: impl IntoIterator<Item = S>) -> Self {
        self.inner_select_fields = select_fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_outer_selectivity(mut self, selectivity: f64) -> Self {
        self.outer_selectivity = Some(selectivity);
        self
    }

    pub fn with_outer_sharding_key(mut self, key: impl Into<String>) -> Self {
        self.outer_sharding_key = Some(key.into());
        self
    }

    pub fn with_inner_sharding_key(mut self, key: impl Into<String>) -> Self {
        self.inner_sharding_key = Some(key.into());
        self
    }
}

/// Match → group → project pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateQuery {
    #[serde(default)]
    pub match_filter_keys: Vec<String>,
    pub group_by_key: String,
    #[serde(default)]
    pub project_fields: Vec<String>,
    #[serde(default)]
    pub selectivity: Option<f64>,
    #[serde(default)]
    pub sharding_key: Option<String>,
}

impl AggregateQuery {
    pub fn new<S: Into<String>>(
        match_filter_keys: impl IntoIterator<Item = S>,
        group_by_key: impl Into<String>,
        project_fields: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            match_filter_keys: match_filter_keys.into_iter().map(Into::into).collect(),
            group_by_key: group_by_key.into(),
            project_fields: project_fields.into_iter().map(Into::into).collect(),
            selectivity: None,
            sharding_key: None,
        }
    }

    pub fn with_selectivity(mut self, selectivity: f64) -> Self {
        self.selectivity = Some(selectivity);
        self
    }

    pub fn with_sharding_key(mut self, key: impl Into<String>) -> Self {
        self.sharding_key = Some(key.into());
        self
    }
}
