//! Property tests for filtering, aggregation and peak selection.

use chrono::{Days, NaiveDate, NaiveDateTime};
use postpeak_common::{DailyCount, DateRange, PostRecord};
use postpeak_graphs::{aggregate_daily, filter_by_range, reaggregate, select_peaks};
use proptest::prelude::*;

fn base() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2020, 10, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Records between late 2020 and early 2024, so they straddle both ends of
/// the reference window.
fn records_strategy() -> impl Strategy<Value = Vec<PostRecord>> {
    prop::collection::vec(0i64..1300 * 86_400, 0..200).prop_map(|offsets| {
        offsets
            .into_iter()
            .enumerate()
            .map(|(i, secs)| {
                PostRecord::new(i.to_string(), base() + chrono::Duration::seconds(secs))
            })
            .collect()
    })
}

fn series_strategy() -> impl Strategy<Value = Vec<DailyCount>> {
    prop::collection::vec(0u32..40, 0..120).prop_map(|counts| {
        let start = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| DailyCount::new(start + Days::new(i as u64), count))
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_daily_counts_sum_to_in_range_records(records in records_strategy()) {
        let range = DateRange::reference_window();
        let in_range = filter_by_range(records, &range);
        let daily = aggregate_daily(&in_range);

        let total: u64 = daily.iter().map(|d| u64::from(d.count)).sum();
        prop_assert_eq!(total, in_range.len() as u64);
        prop_assert!(daily.iter().all(|d| range.contains_date(d.date)));
    }

    #[test]
    fn prop_filter_is_idempotent(records in records_strategy()) {
        let range = DateRange::reference_window();
        let once = filter_by_range(records, &range);
        let twice = filter_by_range(once.clone(), &range);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_series_is_dense_and_chronological(records in records_strategy()) {
        let daily = aggregate_daily(&records);

        for pair in daily.windows(2) {
            prop_assert_eq!(pair[0].date.succ_opt(), Some(pair[1].date));
        }
        if let (Some(first), Some(last)) = (daily.first(), daily.last()) {
            prop_assert!(first.count > 0);
            prop_assert!(last.count > 0);
        }
    }

    #[test]
    fn prop_reaggregate_round_trips(records in records_strategy()) {
        let daily = aggregate_daily(&records);
        prop_assert_eq!(reaggregate(&daily), daily);
    }

    #[test]
    fn prop_selection_is_bounded(series in series_strategy(), k in 0usize..12) {
        let peaks = select_peaks(&series, k);
        prop_assert_eq!(peaks.len(), k.min(series.len()));
    }

    #[test]
    fn prop_selection_dominates_unselected(series in series_strategy(), k in 0usize..12) {
        let peaks = select_peaks(&series, k);
        let lowest_selected = peaks.iter().map(|p| p.count).min();

        if let Some(lowest) = lowest_selected {
            for day in &series {
                if !peaks.iter().any(|p| p.date == day.date) {
                    prop_assert!(day.count <= lowest);
                }
            }
        }
    }

    #[test]
    fn prop_labels_are_chronological(series in series_strategy(), k in 0usize..12) {
        let peaks = select_peaks(&series, k);

        for (i, peak) in peaks.iter().enumerate() {
            prop_assert_eq!(peak.label, i + 1);
        }
        for pair in peaks.windows(2) {
            prop_assert!(pair[0].date < pair[1].date);
        }

        let mut ranks: Vec<_> = peaks.iter().map(|p| p.magnitude_rank).collect();
        ranks.sort_unstable();
        prop_assert_eq!(ranks, (1..=peaks.len()).collect::<Vec<_>>());
    }
}
