//! End-to-end: text inputs → database → reports and plan comparison.

mod common;

use common::{assert_close, shop, SHOP_SCHEMA};
use shardcost_core::config::CostConfig;
use shardcost_core::schema::ShardingInfo;
use shardcost_core::stats::Statistics;
use shardcost_model::{
    estimate, parse_query_plan, parse_schema_yaml, shard_report, size_report, Estimate,
};

#[test]
fn test_size_report_lists_every_collection() {
    let (db, _, _) = shop();
    let report = size_report(&db);
    assert_eq!(report.database, "shop");
    let names: Vec<&str> = report.collections.iter().map(|c| c.name.as_str()).collect();
    for expected in ["Client", "OrderLine", "Product", "Stock", "Warehouse"] {
        assert!(names.contains(&expected), "missing {expected}");
    }
    let order_lines = report
        .collections
        .iter()
        .find(|c| c.name == "OrderLine")
        .unwrap();
    assert_eq!(order_lines.bytes, 356.0 * 4_000_000_000.0);
    assert_close(order_lines.gb, 1424.0);
}

#[test]
fn test_shard_report_per_collection() {
    let (db, stats, _) = shop();
    let rows = shard_report(&db, &stats).unwrap();
    let stock = rows.iter().find(|r| r.name == "Stock").unwrap();
    assert_eq!(stock.key.as_deref(), Some("IDP"));
    assert_eq!(stock.spread.docs_per_server, 20_000.0);
    assert_eq!(stock.spread.distinct_keys_per_server, 100.0);

    let lines = rows.iter().find(|r| r.name == "OrderLine").unwrap();
    assert_eq!(lines.spread.docs_per_server, 4_000_000.0);
    assert_eq!(lines.spread.distinct_keys_per_server, 10_000.0);
}

/// The same point query under each candidate sharding key of Stock.
#[test]
fn test_choosing_a_sharding_key() {
    let cfg = CostConfig::default();
    let query = r#"
op: filter_sharded
collection: Stock
filter_keys: [IDW]
select_fields: [IDP, quantity]
"#;
    let plan = parse_query_plan(query).unwrap();

    let mut costs = Vec::new();
    for key in ["IDP", "IDW"] {
        let mut stats: Statistics = common::shop_stats();
        let cardinality = stats.distinct(key).unwrap();
        stats
            .sharding
            .insert("Stock".into(), ShardingInfo::new(key, cardinality));
        let db = parse_schema_yaml(SHOP_SCHEMA, &stats, &cfg).unwrap();
        let est = estimate(&plan, &db, &stats, &cfg).unwrap();
        costs.push((key, est));
    }

    let (best, _) = costs
        .iter()
        .min_by(|a, b| a.1.time_total().total_cmp(&b.1.time_total()))
        .unwrap();
    assert_eq!(*best, "IDW");

    match &costs[1].1 {
        Estimate::Filter(c) => {
            assert_eq!(c.result_docs, 20_000_000.0 * (1.0 / 200.0));
            assert_eq!(c.ram_volume_total, c.ram_volume);
        }
        other => panic!("unexpected estimate {other:?}"),
    }
}

#[test]
fn test_config_changes_flow_through_estimates() {
    let (db, stats, cfg) = shop();
    let plan = parse_query_plan(
        "op: filter\ncollection: Product\nfilter_keys: [brand]\nselect_fields: [IDP]\n",
    )
    .unwrap();
    let base = estimate(&plan, &db, &stats, &cfg).unwrap();

    let fast = CostConfig {
        bandwidth_bps: cfg.bandwidth_bps * 10,
        ..cfg.clone()
    };
    let quick = estimate(&plan, &db, &stats, &fast).unwrap();
    assert!(quick.time_total() < base.time_total());
    assert_eq!(quick.vol_network(), base.vol_network());
    assert_eq!(quick.price(), base.price());
}

#[test]
fn test_estimate_json_shape() {
    let (db, stats, cfg) = shop();
    let plan = parse_query_plan(
        "op: join\nleft: Stock\nright: Warehouse\njoin_key: IDW\ninner_select_fields: [location]\n",
    )
    .unwrap();
    let est = estimate(&plan, &db, &stats, &cfg).unwrap();
    let json = serde_json::to_value(&est).unwrap();
    assert_eq!(json["kind"], "join");
    assert!(json["outer"]["vol_network"].is_number());
    assert!(json["inner_per_iteration"]["co2"].is_number());
    assert_eq!(json["iterations"], json["result_docs"]);
}
