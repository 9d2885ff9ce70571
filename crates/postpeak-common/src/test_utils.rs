//! Test utilities and shared fixtures for PostPeak.
//!
//! Enabled for this crate's own tests and for dependents through the
//! `testing` feature.

use crate::{DailyCount, PostRecord};
use chrono::{NaiveDate, NaiveDateTime};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Builds a date, panicking on invalid input.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// Builds a date-time, panicking on invalid input.
pub fn datetime(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> NaiveDateTime {
    date(year, month, day)
        .and_hms_opt(hour, min, sec)
        .expect("valid test time")
}

/// A record with the given id created at `created_time`.
pub fn post(id: impl Into<String>, created_time: NaiveDateTime) -> PostRecord {
    PostRecord::new(id, created_time)
}

/// Expands `(day, count)` pairs into `count` records per day, spread over the
/// day's hours.
pub fn posts_per_day(days: &[(NaiveDate, u32)]) -> Vec<PostRecord> {
    days.iter()
        .flat_map(|&(day, count)| {
            (0..count).map(move |i| {
                let time = day
                    .and_hms_opt(i % 24, (i / 24) % 60, 0)
                    .expect("valid spread time");
                PostRecord::new(format!("{day}-{i}"), time)
            })
        })
        .collect()
}

/// Builds a daily series from `(day, count)` pairs.
pub fn series(days: &[(NaiveDate, u32)]) -> Vec<DailyCount> {
    days.iter()
        .map(|&(day, count)| DailyCount::new(day, count))
        .collect()
}

/// Writes `records` as an `id,created_time` CSV file into `dir`.
pub fn write_posts_csv(dir: &Path, file_name: &str, records: &[PostRecord]) -> PathBuf {
    let rows: Vec<(String, String)> = records
        .iter()
        .map(|r| {
            (
                r.id.clone(),
                r.created_time.format("%Y-%m-%d %H:%M:%S").to_string(),
            )
        })
        .collect();
    let borrowed: Vec<(&str, &str)> = rows.iter().map(|(a, b)| (a.as_str(), b.as_str())).collect();
    write_raw_csv(dir, file_name, "id,created_time", &borrowed)
}

/// Writes a CSV with the given header and raw two-column rows into `dir`.
pub fn write_raw_csv(dir: &Path, file_name: &str, header: &str, rows: &[(&str, &str)]) -> PathBuf {
    let path = dir.join(file_name);
    let mut file = std::fs::File::create(&path).expect("create test csv");
    writeln!(file, "{header}").expect("write header");
    for (first, second) in rows {
        writeln!(file, "{first},{second}").expect("write row");
    }
    path
}

/// Records for the spike scenario: single-digit volume on 2021-06-01..05
/// except 50 posts on 2021-06-03.
pub fn spike_scenario_records() -> Vec<PostRecord> {
    posts_per_day(&[
        (date(2021, 6, 1), 3),
        (date(2021, 6, 2), 5),
        (date(2021, 6, 3), 50),
        (date(2021, 6, 4), 2),
        (date(2021, 6, 5), 4),
    ])
}
