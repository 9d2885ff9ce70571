//! Daily aggregation of post records.

use chrono::NaiveDate;
use postpeak_common::{DailyCount, PostRecord};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Counts posts per calendar day.
///
/// The result is sorted by date and has one entry for every day from the
/// first to the last observed day, with 0 for days without posts. Days
/// outside that span are not synthesized, so an empty input gives an empty
/// series.
#[instrument(skip_all, fields(records = records.len()))]
pub fn aggregate_daily(records: &[PostRecord]) -> Vec<DailyCount> {
    let mut per_day: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for record in records {
        *per_day.entry(record.date()).or_insert(0) += 1;
    }

    let series = densify(&per_day);
    debug!(
        "Aggregated {} records into {} days ({} with posts)",
        records.len(),
        series.len(),
        per_day.len()
    );
    series
}

/// Aggregates an existing series again, treating each entry as `count`
/// posts on its date.
///
/// Duplicate dates are summed. Applied to the output of
/// [`aggregate_daily`] this returns the same series.
pub fn reaggregate(series: &[DailyCount]) -> Vec<DailyCount> {
    let mut per_day: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for day in series.iter().filter(|d| d.count > 0) {
        *per_day.entry(day.date).or_insert(0) += day.count;
    }
    densify(&per_day)
}

fn densify(per_day: &BTreeMap<NaiveDate, u32>) -> Vec<DailyCount> {
    let (Some((&first, _)), Some((&last, _))) = (per_day.first_key_value(), per_day.last_key_value())
    else {
        return Vec::new();
    };

    first
        .iter_days()
        .take_while(|day| *day <= last)
        .map(|day| DailyCount::new(day, per_day.get(&day).copied().unwrap_or(0)))
        .collect()
}
