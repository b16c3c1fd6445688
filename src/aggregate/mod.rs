//! Grouped-sum aggregation of raw records.
//!
//! This module turns row-level WHO records into one row per
//! (grouping level, year) with summed counts and a derived rate.

use std::collections::HashMap;

use crate::models::{AggregatedRow, GroupKey, Record, RATE_SCALE};

/// Suicides per 10,000 people.
///
/// Defined as 0 when the population is 0, so the result is always
/// finite regardless of input (never Inf or NaN).
pub fn rate(suicides_no: f64, population: f64) -> f64 {
    if population == 0.0 {
        0.0
    } else {
        (suicides_no / population) * RATE_SCALE
    }
}

/// Aggregate records under the given grouping key.
///
/// With `GroupKey::None`, counts and populations are summed per
/// distinct year. Otherwise they are summed per (level value, year)
/// pair. Each output row carries the derived rate.
///
/// Rows come back sorted by (key, year) for determinism, but callers
/// must not depend on any ordering beyond the key grouping itself.
pub fn aggregate(records: &[Record], key: GroupKey) -> Vec<AggregatedRow> {
    let mut sums: HashMap<(Option<String>, i32), (f64, f64)> = HashMap::new();

    for record in records {
        let group = record.level(key).map(str::to_string);
        let entry = sums.entry((group, record.year)).or_insert((0.0, 0.0));
        entry.0 += record.suicides_no;
        entry.1 += record.population;
    }

    let mut rows: Vec<AggregatedRow> = sums
        .into_iter()
        .map(|((group, year), (suicides_no, population))| AggregatedRow {
            key: group,
            year,
            suicides_no,
            population,
            rate: rate(suicides_no, population),
        })
        .collect();

    rows.sort_by(|a, b| (&a.key, a.year).cmp(&(&b.key, b.year)));
    rows
}

/// The sorted set of distinct years present in the records.
///
/// Used to populate year selectors in the UI layer.
pub fn distinct_years(records: &[Record]) -> Vec<i32> {
    let mut years: Vec<i32> = records.iter().map(|r| r.year).collect();
    years.sort_unstable();
    years.dedup();
    years
}
