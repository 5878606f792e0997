//! Schema tree of a document collection. Pure data; built once, never mutated.
//!
//! A field is either a primitive, an object with ordered children, or an array
//! with a single item definition and an expected element count.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::CostConfig;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    Integer,
    Number,
    String,
    LongString,
    Date,
}

impl PrimitiveType {
    /// Parse a schema type tag. Object/array tags are not primitives.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "integer" => Some(PrimitiveType::Integer),
            "number" => Some(PrimitiveType::Number),
            "string" => Some(PrimitiveType::String),
            "longstring" => Some(PrimitiveType::LongString),
            "date" => Some(PrimitiveType::Date),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveType::Integer => "integer",
            PrimitiveType::Number => "number",
            PrimitiveType::String => "string",
            PrimitiveType::LongString => "longstring",
            PrimitiveType::Date => "date",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldKind {
    Primitive(PrimitiveType),
    Object {
        children: Vec<Field>,
    },
    Array {
        /// Item definition; `None` only for malformed input.
        item: Option<Box<Field>>,
        /// Expected elements per document (a linear multiplier, not a bound).
        avg_items: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
}

impl Field {
    pub fn primitive(name: impl Into<String>, ty: PrimitiveType) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Primitive(ty),
        }
    }

    pub fn object(name: impl Into<String>, children: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Object { children },
        }
    }

    pub fn array(name: impl Into<String>, item: Field, avg_items: f64) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Array {
                item: Some(Box::new(item)),
                avg_items,
            },
        }
    }

    /// Nested fields in search order: object children, or the array item.
    pub fn children(&self) -> &[Field] {
        match &self.kind {
            FieldKind::Primitive(_) => &[],
            FieldKind::Object { children } => children,
            FieldKind::Array { item: Some(item), .. } => std::slice::from_ref(item.as_ref()),
            FieldKind::Array { item: None, .. } => &[],
        }
    }

    pub fn primitive_type(&self) -> Option<PrimitiveType> {
        match self.kind {
            FieldKind::Primitive(ty) => Some(ty),
            _ => None,
        }
    }
}

/// Optional sharding description of one collection.
///
/// Only `cardinality` feeds the current formulas; `distribution` is carried
/// for skew-aware models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShardingInfo {
    pub key: String,
    pub cardinality: u64,
    #[serde(default)]
    pub distribution: BTreeMap<String, u64>,
}

impl ShardingInfo {
    pub fn new(key: impl Into<String>, cardinality: u64) -> Self {
        Self {
            key: key.into(),
            cardinality,
            distribution: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collection {
    name: String,
    fields: Vec<Field>,
    doc_count: u64,
    doc_size: f64,
    sharding: Option<ShardingInfo>,
}

impl Collection {
    /// Build a collection and memoize its document size under `cfg`.
    pub fn new(
        name: impl Into<String>,
        fields: Vec<Field>,
        doc_count: u64,
        cfg: &CostConfig,
    ) -> Self {
        let doc_size = crate::size::doc_size(&fields, cfg);
        Self {
            name: name.into(),
            fields,
            doc_count,
            doc_size,
            sharding: None,
        }
    }

    pub fn with_sharding(mut self, sharding: ShardingInfo) -> Self {
        self.sharding = Some(sharding);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn doc_count(&self) -> u64 {
        self.doc_count
    }

    /// Expected bytes per document.
    pub fn doc_size(&self) -> f64 {
        self.doc_size
    }

    pub fn sharding(&self) -> Option<&ShardingInfo> {
        self.sharding.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Database {
    pub name: String,
    collections: BTreeMap<String, Collection>,
}

impl Database {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collections: BTreeMap::new(),
        }
    }

    /// Add a collection; names must be unique.
    pub fn insert(&mut self, collection: Collection) -> Result<()> {
        if self.collections.contains_key(collection.name()) {
            return Err(Error::Schema(format!(
                "duplicate collection '{}'",
                collection.name()
            )));
        }
        self.collections
            .insert(collection.name().to_string(), collection);
        Ok(())
    }

    pub fn collection(&self, name: &str) -> Result<&Collection> {
        self.collections
            .get(name)
            .ok_or_else(|| Error::UnknownCollection(name.to_string()))
    }

    pub fn collections(&self) -> impl Iterator<Item = &Collection> {
        self.collections.values()
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}
