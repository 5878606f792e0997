//! Convenient re-exports for downstream crates.

pub use crate::config::{CostConfig, TypeSizes};
pub use crate::error::{Error, Result};
pub use crate::resolve::{field_type, resolve_field_types};
pub use crate::schema::{Collection, Database, Field, FieldKind, PrimitiveType, ShardingInfo};
pub use crate::size::{bytes_to_gb, collection_size, db_size, doc_size, key_count, value_size};
pub use crate::stats::{sharding_stats, ShardingStats, Statistics};
