//! Shared fixtures: a five-collection retail database on 1000 shards.
#![allow(dead_code)]

use shardcost_core::config::CostConfig;
use shardcost_core::schema::Database;
use shardcost_core::stats::Statistics;
use shardcost_model::parse_schema_yaml;

pub const SHOP_SCHEMA: &str = r#"
title: shop
properties:
  Product:
    properties:
      IDP: { type: integer }
      name: { type: string }
      price: { type: number }
      brand: { type: string }
      description: { type: string, format: longstring }
      image_url: { type: string }
      categories:
        type: array
        items: { type: string }
      supplier:
        type: object
        properties:
          IDS: { type: integer }
          name: { type: string }
          SIRET: { type: integer }
          headOffice: { type: string }
          revenue: { type: number }
  Stock:
    properties:
      IDP: { type: integer }
      IDW: { type: integer }
      quantity: { type: integer }
      location: { type: string }
  Warehouse:
    properties:
      IDW: { type: integer }
      location: { type: string }
      capacity: { type: integer }
  OrderLine:
    properties:
      IDC: { type: integer }
      IDP: { type: integer }
      date: { type: date }
      deliveryDate: { type: string, format: date }
      comment: { type: longstring }
      grade: { type: integer }
      price: { type: number }
  Client:
    properties:
      IDC: { type: integer }
      name: { type: string }
      email: { type: string }
      address:
        type: object
        properties:
          street: { type: string }
          city: { type: string }
          zip: { type: string }
      birthDate: { type: date }
"#;

pub const SHOP_STATS: &str = r#"{
    "doc_counts": {
        "Product": 100000,
        "Stock": 20000000,
        "Warehouse": 200,
        "OrderLine": 4000000000,
        "Client": 10000000
    },
    "distinct_values": {
        "IDP": 100000,
        "IDW": 200,
        "IDC": 10000000,
        "brand": 5000,
        "date": 365
    },
    "servers": 1000,
    "array_hints": { "Product.categories": 2 },
    "sharding": {
        "Stock": { "key": "IDP", "cardinality": 100000 },
        "OrderLine": { "key": "IDC", "cardinality": 10000000 }
    }
}"#;

pub fn shop_stats() -> Statistics {
    serde_json::from_str(SHOP_STATS).expect("fixture statistics decode")
}

pub fn shop_db(stats: &Statistics, cfg: &CostConfig) -> Database {
    parse_schema_yaml(SHOP_SCHEMA, stats, cfg).expect("fixture schema decodes")
}

pub fn shop() -> (Database, Statistics, CostConfig) {
    let cfg = CostConfig::default();
    let stats = shop_stats();
    let db = shop_db(&stats, &cfg);
    (db, stats, cfg)
}

pub fn assert_close(actual: f64, expected: f64) {
    let tol = 1e-9 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected}, got {actual}"
    );
}
