//! YAML/JSON → `QueryPlan`, and plan dispatch to the operator functions.
//!
//! Example:
//! ```yaml
//! op: filter_sharded
//! collection: Stock
//! filter_keys: [IDP, IDW]
//! select_fields: [quantity, location]
//! primary_key: [IDP, IDW]
//! ```
//!
//! Sharded variants take their routing key from the plan when given, else from
//! the collection's declared sharding.

use serde::{Deserialize, Serialize};
use shardcost_core::config::CostConfig;
use shardcost_core::error::{Error, Result};
use shardcost_core::schema::{Collection, Database};
use shardcost_core::stats::Statistics;

use crate::cost::CostOutput;
use crate::operators::aggregate::{aggregate_with_sharding, AggregateCost};
use crate::operators::filter::{filter_with_sharding, filter_without_sharding};
use crate::operators::join::{nested_loop_with_sharding, nested_loop_without_sharding, JoinCost};
use crate::query::{AggregateQuery, FilterQuery, JoinQuery};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum QueryPlan {
    Filter {
        collection: String,
        #[serde(flatten)]
        query: FilterQuery,
    },
    FilterSharded {
        collection: String,
        #[serde(flatten)]
        query: FilterQuery,
    },
    Join {
        left: String,
        right: String,
        #[serde(flatten)]
        query: JoinQuery,
    },
    JoinSharded {
        left: String,
        right: String,
        #[serde(flatten)]
        query: JoinQuery,
    },
    Aggregate {
        collection: String,
        #[serde(flatten)]
        query: AggregateQuery,
    },
}

impl QueryPlan {
    pub fn op_name(&self) -> &'static str {
        match self {
            QueryPlan::Filter { .. } => "filter",
            QueryPlan::FilterSharded { .. } => "filter_sharded",
            QueryPlan::Join { .. } => "join",
            QueryPlan::JoinSharded { .. } => "join_sharded",
            QueryPlan::Aggregate { .. } => "aggregate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimate {
    Filter(CostOutput),
    Join(JoinCost),
    Aggregate(AggregateCost),
}

impl Estimate {
    pub fn result_docs(&self) -> f64 {
        match self {
            Estimate::Filter(c) => c.result_docs,
            Estimate::Join(c) => c.result_docs,
            Estimate::Aggregate(c) => c.result_docs,
        }
    }

    pub fn vol_network(&self) -> f64 {
        match self {
            Estimate::Filter(c) => c.vol_network,
            Estimate::Join(c) => c.vol_network,
            Estimate::Aggregate(c) => c.vol_network,
        }
    }

    pub fn time_total(&self) -> f64 {
        match self {
            Estimate::Filter(c) => c.time_total,
            Estimate::Join(c) => c.time_total,
            Estimate::Aggregate(c) => c.time_total,
        }
    }

    pub fn co2(&self) -> f64 {
        match self {
            Estimate::Filter(c) => c.co2,
            Estimate::Join(c) => c.co2,
            Estimate::Aggregate(c) => c.co2,
        }
    }

    pub fn price(&self) -> f64 {
        match self {
            Estimate::Filter(c) => c.price,
            Estimate::Join(c) => c.price,
            Estimate::Aggregate(c) => c.price,
        }
    }
}

/// Parse a single plan. YAML is a superset of JSON, so both are accepted.
pub fn parse_query_plan(src: &str) -> Result<QueryPlan> {
    serde_yaml::from_str(src).map_err(|e| Error::Query(e.to_string()))
}

/// Parse a list of candidate plans.
pub fn parse_query_plans(src: &str) -> Result<Vec<QueryPlan>> {
    serde_yaml::from_str(src).map_err(|e| Error::Query(e.to_string()))
}

fn declared_key(key: &Option<String>, coll: &Collection) -> Option<String> {
    key.clone()
        .or_else(|| coll.sharding().map(|s| s.key.clone()))
}

pub fn estimate(
    plan: &QueryPlan,
    db: &Database,
    stats: &Statistics,
    cfg: &CostConfig,
) -> Result<Estimate> {
    match plan {
        QueryPlan::Filter { collection, query } => {
            let coll = db.collection(collection)?;
            filter_without_sharding(coll, query, stats, cfg).map(Estimate::Filter)
        }
        QueryPlan::FilterSharded { collection, query } => {
            let coll = db.collection(collection)?;
            let mut query = query.clone();
            query.sharding_key = declared_key(&query.sharding_key, coll);
            filter_with_sharding(coll, &query, stats, cfg).map(Estimate::Filter)
        }
        QueryPlan::Join { left, right, query } => {
            let (l, r) = (db.collection(left)?, db.collection(right)?);
            nested_loop_without_sharding(l, r, query, stats, cfg).map(Estimate::Join)
        }
        QueryPlan::JoinSharded { left, right, query } => {
            let (l, r) = (db.collection(left)?, db.collection(right)?);
            let mut query = query.clone();
            query.outer_sharding_key = declared_key(&query.outer_sharding_key, l);
            query.inner_sharding_key = declared_key(&query.inner_sharding_key, r);
            nested_loop_with_sharding(l, r, &query, stats, cfg).map(Estimate::Join)
        }
        QueryPlan::Aggregate { collection, query } => {
            let coll = db.collection(collection)?;
            let mut query = query.clone();
            query.sharding_key = declared_key(&query.sharding_key, coll);
            aggregate_with_sharding(coll, &query, stats, cfg).map(Estimate::Aggregate)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shardcost_core::schema::{Field, PrimitiveType, ShardingInfo};

    fn db() -> Database {
        let cfg = CostConfig::default();
        let mut db = Database::new("shop");
        db.insert(
            Collection::new(
                "Stock",
                vec![
                    Field::primitive("IDP", PrimitiveType::Integer),
                    Field::primitive("IDW", PrimitiveType::Integer),
                    Field::primitive("quantity", PrimitiveType::Integer),
                ],
                20_000_000,
                &cfg,
            )
            .with_sharding(ShardingInfo::new("IDP", 100_000)),
        )
        .unwrap();
        db.insert(Collection::new(
            "Product",
            vec![
                Field::primitive("IDP", PrimitiveType::Integer),
                Field::primitive("brand", PrimitiveType::String),
            ],
            100_000,
            &cfg,
        ))
        .unwrap();
        db
    }

    #[test]
    fn parses_tagged_plan() {
        let plan = parse_query_plan(
            r#"
op: filter_sharded
collection: Stock
filter_keys: [IDP, IDW]
select_fields: [quantity]
primary_key: [IDP, IDW]
"#,
        )
        .unwrap();
        match &plan {
            QueryPlan::FilterSharded { collection, query } => {
                assert_eq!(collection, "Stock");
                assert_eq!(query.primary_key, ["IDP", "IDW"]);
                assert_eq!(query.indexes_per_shard, 1);
                assert_eq!(query.sharding_key, None);
            }
            other => panic!("unexpected plan {other:?}"),
        }
        assert_eq!(plan.op_name(), "filter_sharded");
    }

    #[test]
    fn sharded_filter_inherits_declared_key() {
        let plan = parse_query_plan(
            r#"{"op": "filter_sharded", "collection": "Stock",
                "filter_keys": ["IDP"], "select_fields": ["quantity"]}"#,
        )
        .unwrap();
        let stats = Statistics::new(1000).with_distinct("IDP", 100_000);
        let est = estimate(&plan, &db(), &stats, &CostConfig::default()).unwrap();
        match est {
            // routed: a single query message
            Estimate::Filter(c) => assert_eq!(c.size_query, 20.0 + 20.0),
            other => panic!("unexpected estimate {other:?}"),
        }
    }

    #[test]
    fn join_plan_dispatches_to_nested_loop() {
        let plan = parse_query_plan(
            r#"
op: join
left: Product
right: Stock
join_key: IDP
outer_filter_keys: [brand]
outer_select_fields: [IDP]
inner_select_fields: [quantity]
"#,
        )
        .unwrap();
        let stats = Statistics::new(10)
            .with_distinct("IDP", 100_000)
            .with_distinct("brand", 5_000);
        let est = estimate(&plan, &db(), &stats, &CostConfig::default()).unwrap();
        let outer_docs = 100_000.0 * (1.0 / 5_000.0);
        assert_eq!(est.result_docs(), outer_docs * (20_000_000.0 / 100_000.0));
        assert!(matches!(est, Estimate::Join(_)));
    }

    #[test]
    fn unknown_collection_is_reported() {
        let plan = QueryPlan::Aggregate {
            collection: "Warehouse".into(),
            query: AggregateQuery::new(Vec::<String>::new(), "IDW", vec!["IDW".to_string()]),
        };
        let err = estimate(&plan, &db(), &Statistics::new(1), &CostConfig::default()).unwrap_err();
        assert!(matches!(err, Error::UnknownCollection(_)));
    }

    #[test]
    fn unknown_op_is_a_query_error() {
        let err = parse_query_plan("op: merge_join\ncollection: Stock\n").unwrap_err();
        assert!(matches!(err, Error::Query(_)));
    }

    #[test]
    fn estimate_serializes_with_kind_tag() {
        let plan = QueryPlan::Filter {
            collection: "Product".into(),
            query: FilterQuery::new(["brand"], ["IDP"]),
        };
        let est = estimate(&plan, &db(), &Statistics::new(10), &CostConfig::default()).unwrap();
        let json = serde_json::to_value(&est).unwrap();
        assert_eq!(json["kind"], "filter");
        assert_eq!(json["result_docs"], 10_000.0);
    }
}
