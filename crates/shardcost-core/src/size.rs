//! Serialized byte footprint of fields, documents, collections and databases.
//!
//! Every attribute is stored as a key plus a value. Values are sized from the
//! primitive table and arrays scale by their expected arity; keys are charged
//! a fixed overhead once per slot, and array item keys are *not* scaled by
//! arity.

use crate::config::CostConfig;
use crate::schema::{Collection, Database, Field, FieldKind};

const BYTES_PER_GB: f64 = 1_000_000_000.0;

/// Value bytes only (no key overhead).
pub fn value_size(field: &Field, cfg: &CostConfig) -> f64 {
    match &field.kind {
        FieldKind::Primitive(ty) => cfg.type_sizes.size_of(*ty) as f64,
        FieldKind::Object { children } => children.iter().map(|c| value_size(c, cfg)).sum(),
        FieldKind::Array { item, avg_items } => match item {
            Some(item) => avg_items * value_size(item, cfg),
            None => 0.0,
        },
    }
}

/// Number of key slots the field contributes to one document.
pub fn key_count(field: &Field) -> u64 {
    match &field.kind {
        FieldKind::Primitive(_) => 1,
        FieldKind::Object { children } => 1 + children.iter().map(key_count).sum::<u64>(),
        FieldKind::Array { item, .. } => 1 + item.as_deref().map(key_count).unwrap_or(0),
    }
}

/// `Σ value_size + overhead * Σ key_count` over the root fields.
pub fn doc_size(fields: &[Field], cfg: &CostConfig) -> f64 {
    let total_value: f64 = fields.iter().map(|f| value_size(f, cfg)).sum();
    let total_keys: u64 = fields.iter().map(key_count).sum();
    total_value + total_keys as f64 * cfg.key_overhead_bytes as f64
}

pub fn collection_size(collection: &Collection) -> f64 {
    collection.doc_size() * collection.doc_count() as f64
}

pub fn db_size(database: &Database) -> f64 {
    database.collections().map(collection_size).sum()
}

/// Decimal gigabytes.
pub fn bytes_to_gb(bytes: f64) -> f64 {
    bytes / BYTES_PER_GB
}
