//! Top-K peak selection.

use postpeak_common::{DailyCount, PeakEntry};
use tracing::debug;

/// Picks the `k` days with the highest counts.
///
/// Days with equal counts are ordered by date, so the earlier day wins a
/// tie at the cut-off. The selected days are returned in chronological
/// order with `label` 1, 2, ... assigned in that order; `magnitude_rank`
/// keeps their position by count. When the series has fewer than `k`
/// days, all of them are returned.
pub fn select_peaks(series: &[DailyCount], k: usize) -> Vec<PeakEntry> {
    let mut by_count: Vec<&DailyCount> = series.iter().collect();
    by_count.sort_by(|a, b| b.count.cmp(&a.count).then(a.date.cmp(&b.date)));

    let mut peaks: Vec<PeakEntry> = by_count
        .into_iter()
        .take(k)
        .enumerate()
        .map(|(i, day)| PeakEntry {
            date: day.date,
            count: day.count,
            label: 0,
            magnitude_rank: i + 1,
        })
        .collect();

    peaks.sort_by_key(|peak| peak.date);
    for (i, peak) in peaks.iter_mut().enumerate() {
        peak.label = i + 1;
    }

    debug!("Selected {} of {} requested peaks", peaks.len(), k);
    peaks
}
