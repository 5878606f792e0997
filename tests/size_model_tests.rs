//! Size model over the retail fixture database.

mod common;

use common::{shop, shop_stats};
use shardcost_core::config::{CostConfig, TypeSizes};
use shardcost_core::error::Error;
use shardcost_core::prelude::*;
use shardcost_model::{parse_schema_yaml, size_report};

#[test]
fn test_document_sizes() {
    let (db, _, _) = shop();
    let expected = [
        ("Product", 968.0),
        ("Stock", 152.0),
        ("Warehouse", 132.0),
        ("OrderLine", 356.0),
        ("Client", 524.0),
    ];
    for (name, size) in expected {
        assert_eq!(db.collection(name).unwrap().doc_size(), size, "{name}");
    }
}

#[test]
fn test_nested_object_and_array_accounting() {
    let (db, _, cfg) = shop();
    let product = db.collection("Product").unwrap();
    let supplier = product
        .fields()
        .iter()
        .find(|f| f.name == "supplier")
        .unwrap();
    assert_eq!(value_size(supplier, &cfg), 184.0);
    assert_eq!(key_count(supplier), 6);

    // hinted arity 2, key counted once per slot
    let categories = product
        .fields()
        .iter()
        .find(|f| f.name == "categories")
        .unwrap();
    assert_eq!(value_size(categories, &cfg), 160.0);
    assert_eq!(key_count(categories), 2);
}

#[test]
fn test_database_size_is_sum_of_collections() {
    let (db, _, _) = shop();
    let sum: f64 = db.collections().map(collection_size).sum();
    assert_eq!(db_size(&db), sum);
    assert_eq!(db_size(&db), 1_432_376_826_400.0);

    let report = size_report(&db);
    assert_eq!(report.total_bytes, db_size(&db));
    assert_eq!(report.total_gb, bytes_to_gb(db_size(&db)));
}

#[test]
fn test_custom_type_sizes_propagate() {
    let cfg = CostConfig {
        key_overhead_bytes: 0,
        type_sizes: TypeSizes {
            string: 10,
            ..Default::default()
        },
        ..Default::default()
    };
    let stats = shop_stats();
    let db = parse_schema_yaml(common::SHOP_SCHEMA, &stats, &cfg).unwrap();
    // IDP 8 + IDW 8 + quantity 8 + location 10
    assert_eq!(db.collection("Stock").unwrap().doc_size(), 34.0);
}

#[test]
fn test_field_resolution_on_fixture() {
    let (db, _, _) = shop();
    let product = db.collection("Product").unwrap();
    assert_eq!(field_type(product, "IDP").unwrap(), PrimitiveType::Integer);
    assert_eq!(
        field_type(product, "description").unwrap(),
        PrimitiveType::LongString
    );
    // root `name` shadows `supplier.name`
    assert_eq!(field_type(product, "name").unwrap(), PrimitiveType::String);
    assert_eq!(
        resolve_field_types(product, &["supplier"]).unwrap(),
        vec![
            PrimitiveType::Integer,
            PrimitiveType::String,
            PrimitiveType::Integer,
            PrimitiveType::String,
            PrimitiveType::Number,
        ]
    );
    assert!(matches!(
        resolve_field_types(product, &["colour"]),
        Err(Error::FieldNotFound { .. })
    ));
}

#[test]
fn test_sharding_spread() {
    let stats = shop_stats();
    let st = sharding_stats(stats.doc_count("Stock"), stats.distinct("IDW").unwrap(), stats.servers)
        .unwrap();
    assert_eq!(st.docs_per_server, 20_000.0);
    assert_eq!(st.distinct_keys_per_server, 0.2);
}
