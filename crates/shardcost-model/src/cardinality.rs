//! Selectivity and cardinality policy shared by every operator.
//!
//! Missing statistics are not an error: they fall back to fixed constants.
//! Zero counts never reach a division.

use shardcost_core::stats::Statistics;

/// Selectivity assumed when a filter key has no usable distinct count.
pub const FALLBACK_SELECTIVITY: f64 = 0.1;

/// Group count assumed when the group-by key has no distinct count.
pub const DEFAULT_GROUP_COUNT: u64 = 100;

/// Expected result size of a selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cardinality {
    pub result_docs: f64,
    pub selectivity: f64,
}

/// Positive distinct count of `field`, if any.
pub fn known_distinct(field: &str, stats: &Statistics) -> Option<u64> {
    stats.distinct(field).filter(|n| *n > 0)
}

/// `1 / distinct(filter_key)`, or the fallback constant.
pub fn default_selectivity(filter_key: &str, stats: &Statistics) -> f64 {
    match known_distinct(filter_key, stats) {
        Some(n) => 1.0 / n as f64,
        None => FALLBACK_SELECTIVITY,
    }
}

/// True iff a non-empty primary key is fully covered by the filter keys.
pub fn detect_primary_key_result<S: AsRef<str>, P: AsRef<str>>(
    filter_keys: &[S],
    pk_fields: &[P],
) -> bool {
    if pk_fields.is_empty() {
        return false;
    }
    pk_fields
        .iter()
        .all(|pk| filter_keys.iter().any(|k| k.as_ref() == pk.as_ref()))
}

fn explicit(selectivity: Option<f64>) -> Option<f64> {
    selectivity.filter(|s| s.is_finite() && *s > 0.0)
}

/// Selectivity of a scan: the override, else the first filter key's
/// statistics, else a full scan when there is no filter at all.
pub fn scan_selectivity<S: AsRef<str>>(
    filter_keys: &[S],
    selectivity: Option<f64>,
    stats: &Statistics,
) -> f64 {
    if let Some(s) = explicit(selectivity) {
        return s;
    }
    match filter_keys.first() {
        Some(key) => default_selectivity(key.as_ref(), stats),
        None => 1.0,
    }
}

/// Result cardinality of a filter on a collection of `doc_count` documents.
pub fn filter_cardinality<S: AsRef<str>, P: AsRef<str>>(
    doc_count: u64,
    filter_keys: &[S],
    pk_fields: &[P],
    selectivity: Option<f64>,
    stats: &Statistics,
) -> Cardinality {
    // An empty collection cannot take the exact-match shortcut.
    if doc_count > 0 && detect_primary_key_result(filter_keys, pk_fields) {
        return Cardinality {
            result_docs: 1.0,
            selectivity: 1.0 / doc_count as f64,
        };
    }
    let selectivity = scan_selectivity(filter_keys, selectivity, stats);
    Cardinality {
        result_docs: doc_count as f64 * selectivity,
        selectivity,
    }
}
