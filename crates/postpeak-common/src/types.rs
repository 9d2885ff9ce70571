//! Record types flowing through the report pipeline.

use crate::error::PostPeakError;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One input row: an opaque post identifier and its creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    /// Identifier as it appears in the source file.
    pub id: String,
    /// Creation time, normalized to naive UTC.
    pub created_time: NaiveDateTime,
}

impl PostRecord {
    /// Creates a record.
    pub fn new(id: impl Into<String>, created_time: NaiveDateTime) -> Self {
        Self {
            id: id.into(),
            created_time,
        }
    }

    /// Calendar day the post was created on.
    pub fn date(&self) -> NaiveDate {
        self.created_time.date()
    }
}

/// Number of posts on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DailyCount {
    /// The day.
    pub date: NaiveDate,
    /// Posts created on that day.
    pub count: u32,
}

impl DailyCount {
    /// Creates a daily count.
    pub const fn new(date: NaiveDate, count: u32) -> Self {
        Self { date, count }
    }
}

/// A selected peak day.
///
/// `label` is the number drawn on the chart: the position of this day
/// among the selected peaks once they are sorted by date. `magnitude_rank`
/// is the position in descending-count order (1 is the busiest day).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakEntry {
    /// The peak day.
    pub date: NaiveDate,
    /// Posts on that day.
    pub count: u32,
    /// Chronological label, 1-based.
    pub label: usize,
    /// Magnitude rank, 1-based.
    pub magnitude_rank: usize,
}

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = PostPeakError;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl DateRange {
    /// Creates a range, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> crate::Result<Self> {
        if start > end {
            return Err(PostPeakError::validation_field(
                format!("date range start {start} is after end {end}"),
                "date_range",
            ));
        }
        Ok(Self { start, end })
    }

    /// The 2021-01-01..=2023-12-31 analysis window.
    pub fn reference_window() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2021, 1, 1).expect("valid reference start date"),
            end: NaiveDate::from_ymd_opt(2023, 12, 31).expect("valid reference end date"),
        }
    }

    /// First day of the range.
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range.
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` lies inside the range.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Whether the calendar day of `timestamp` lies inside the range.
    pub fn contains(&self, timestamp: &NaiveDateTime) -> bool {
        self.contains_date(timestamp.date())
    }

    /// Number of days covered, both ends included.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self::reference_window()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
