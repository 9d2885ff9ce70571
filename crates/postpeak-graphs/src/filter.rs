//! Date-range filtering.

use postpeak_common::{DateRange, PostRecord};
use tracing::debug;

/// Keeps the records created on a day inside `range`, preserving order.
///
/// Both bounds are whole calendar days: a post at 23:59 on the end date is
/// kept.
pub fn filter_by_range(mut records: Vec<PostRecord>, range: &DateRange) -> Vec<PostRecord> {
    let before = records.len();
    records.retain(|record| range.contains(&record.created_time));
    debug!(
        "Filtered {} records to {} within {}",
        before,
        records.len(),
        range
    );
    records
}
