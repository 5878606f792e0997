//! Schema description (JSON or YAML) → `Database`.
//!
//! Example:
//! ```yaml
//! title: shop
//! properties:
//!   Product:
//!     properties:
//!       IDP: { type: integer }
//!       description: { type: string, format: longstring }
//!       categories:
//!         type: array
//!         avg_items: 2
//!         items: { type: string }
//!   Stock:
//!     properties:
//!       IDP: { type: integer }
//!       IDW: { type: integer }
//! ```
//!
//! Array items are named `<field>_item`. Arity comes from `avg_items`, else
//! from `array_hints` keyed by dotted path (`Product.categories`, with `[]`
//! marking descent into an array item), else 1.

use serde_json::{Map, Value};
use shardcost_core::config::CostConfig;
use shardcost_core::error::{Error, Result};
use shardcost_core::schema::{Collection, Database, Field, FieldKind, PrimitiveType};
use shardcost_core::stats::Statistics;

const DEFAULT_DB_NAME: &str = "Database";

struct Ctx<'a> {
    collection: &'a str,
    stats: &'a Statistics,
}

fn type_tag(def: &Value, name: &str) -> Result<String> {
    let tag = match def.get("type") {
        None => "string".to_string(),
        Some(Value::String(s)) => s.to_lowercase(),
        Some(other) => {
            return Err(Error::Schema(format!(
                "field '{}' has non-string type {}",
                name, other
            )))
        }
    };
    Ok(match def.get("format").and_then(Value::as_str) {
        Some("date") => "date".to_string(),
        Some("longstring") => "longstring".to_string(),
        _ => tag,
    })
}

fn properties<'v>(def: &'v Value, name: &str) -> Result<Option<&'v Map<String, Value>>> {
    match def.get("properties") {
        None => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(Error::Schema(format!(
            "'properties' of '{}' must be an object",
            name
        ))),
    }
}

fn parse_properties(props: &Map<String, Value>, path: &str, ctx: &Ctx<'_>) -> Result<Vec<Field>> {
    props
        .iter()
        .map(|(name, def)| {
            let full_path = if path.is_empty() {
                name.clone()
            } else {
                format!("{}.{}", path, name)
            };
            parse_field(name, def, &full_path, ctx)
        })
        .collect()
}

fn parse_field(name: &str, def: &Value, path: &str, ctx: &Ctx<'_>) -> Result<Field> {
    let tag = type_tag(def, name)?;
    let kind = match tag.as_str() {
        "object" => {
            let children = match properties(def, name)? {
                Some(props) => parse_properties(props, path, ctx)?,
                None => Vec::new(),
            };
            FieldKind::Object { children }
        }
        "array" => {
            let avg_items = def
                .get("avg_items")
                .and_then(Value::as_f64)
                .filter(|n| *n != 0.0)
                .or_else(|| ctx.stats.array_hint(path).filter(|n| *n != 0.0))
                .unwrap_or(1.0);
            if avg_items < 0.0 || !avg_items.is_finite() {
                return Err(Error::Schema(format!(
                    "array '{}' has invalid avg_items {}",
                    path, avg_items
                )));
            }
            let empty = Value::Object(Map::new());
            let items = def.get("items").unwrap_or(&empty);
            let item_name = format!("{}_item", name);
            let item = parse_field(&item_name, items, &format!("{}[]", path), ctx)?;
            FieldKind::Array {
                item: Some(Box::new(item)),
                avg_items,
            }
        }
        other => match PrimitiveType::from_tag(other) {
            Some(ty) => FieldKind::Primitive(ty),
            None => {
                return Err(Error::UnsupportedField {
                    field: name.to_string(),
                    collection: ctx.collection.to_string(),
                })
            }
        },
    };
    Ok(Field {
        name: name.to_string(),
        kind,
    })
}

/// Build a database from a decoded schema document.
///
/// Document counts, array hints and sharding declarations come from `stats`;
/// each collection's document size is computed under `cfg`.
pub fn schema_from_value(doc: &Value, stats: &Statistics, cfg: &CostConfig) -> Result<Database> {
    let collections = match doc.get("properties") {
        Some(Value::Object(map)) => map,
        Some(_) => return Err(Error::Schema("'properties' must be an object".into())),
        None => return Err(Error::Schema("schema has no 'properties'".into())),
    };
    let title = doc
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_DB_NAME);

    let mut db = Database::new(title);
    for (coll_name, coll_def) in collections {
        let ctx = Ctx {
            collection: coll_name,
            stats,
        };
        let fields = match properties(coll_def, coll_name)? {
            Some(props) => parse_properties(props, coll_name, &ctx)?,
            None => Vec::new(),
        };
        let mut collection = Collection::new(
            coll_name.as_str(),
            fields,
            stats.doc_count(coll_name),
            cfg,
        );
        if let Some(sharding) = stats.sharding_for(coll_name) {
            collection = collection.with_sharding(sharding.clone());
        }
        db.insert(collection)?;
    }
    Ok(db)
}

pub fn parse_schema_json(src: &str, stats: &Statistics, cfg: &CostConfig) -> Result<Database> {
    let doc: Value = serde_json::from_str(src)?;
    schema_from_value(&doc, stats, cfg)
}

pub fn parse_schema_yaml(src: &str, stats: &Statistics, cfg: &CostConfig) -> Result<Database> {
    let doc: Value = serde_yaml::from_str(src).map_err(|e| Error::Parse(e.to_string()))?;
    schema_from_value(&doc, stats, cfg)
}
