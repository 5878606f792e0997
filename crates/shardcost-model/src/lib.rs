#![forbid(unsafe_code)]
//! shardcost-model: schema/statistics → per-operator cost estimates.
//!
//! Design:
//! - `cost::operator_cost` is the single analytical formula; every operator is
//!   one or more invocations of it, folded into a result.
//! - `cardinality` holds the selectivity/primary-key policy shared by all
//!   operators.
//! - `operators` encodes shard routing: point lookup vs. scatter-gather,
//!   co-located vs. shuffled aggregation.
//! - `dsl` decodes schema descriptions and query plans (JSON or YAML).
//!
//! Everything is a pure function of its explicit inputs; identical inputs give
//! bit-identical outputs.

pub mod cardinality;
pub mod cost;
pub mod dsl;
pub mod metrics;
pub mod operators;
pub mod query;
pub mod report;

pub use cost::{operator_cost, CostInputs, CostOutput};
pub use dsl::plan::{estimate, parse_query_plan, parse_query_plans, Estimate, QueryPlan};
pub use dsl::schema::{parse_schema_json, parse_schema_yaml, schema_from_value};
pub use operators::aggregate::{aggregate_with_sharding, AggregateCost};
pub use operators::filter::{filter_with_sharding, filter_without_sharding};
pub use operators::join::{nested_loop_with_sharding, nested_loop_without_sharding, JoinCost};
pub use query::{AggregateQuery, FilterQuery, JoinQuery};
pub use report::{shard_report, size_report, CollectionShards, CollectionSize, SizeReport};
