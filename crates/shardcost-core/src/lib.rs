#![forbid(unsafe_code)]
//! shardcost-core: the data side of the cost model.
//!
//! - `schema`: the immutable field tree of each collection.
//! - `size`: recursive byte-size accounting (document, collection, database).
//! - `resolve`: query field name → primitive types.
//! - `config`: rate tables and constants threaded through every formula.
//! - `stats`: externally supplied cardinality statistics.
//!
//! No I/O lives here. Decoding schema files is the job of `shardcost-model::dsl`.

pub mod config;
pub mod error;
pub mod prelude;
pub mod resolve;
pub mod schema;
pub mod size;
pub mod stats;

pub use config::{CostConfig, TypeSizes};
pub use error::{Error, Result};
pub use schema::{Collection, Database, Field, FieldKind, PrimitiveType, ShardingInfo};
pub use stats::{ShardingStats, Statistics};
