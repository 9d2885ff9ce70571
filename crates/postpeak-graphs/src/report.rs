//! Plain-text peak table.

use postpeak_common::PeakEntry;

/// Heading printed above the peak table.
pub fn peak_table_title(top_k: usize) -> String {
    format!("Top {top_k} peak days:")
}

/// Renders `peaks` as a fixed-width table under `title`, one line per peak
/// in the order given.
pub fn format_peak_table(title: &str, peaks: &[PeakEntry]) -> String {
    let mut lines = vec![
        title.to_string(),
        row("label", "date", "count", "magnitude rank"),
    ];
    if peaks.is_empty() {
        lines.push("(no peak days)".to_string());
    }
    lines.extend(peaks.iter().map(|peak| {
        row(
            &peak.label.to_string(),
            &peak.date.format("%Y-%m-%d").to_string(),
            &peak.count.to_string(),
            &peak.magnitude_rank.to_string(),
        )
    }));
    lines.join("\n")
}

fn row(label: &str, date: &str, count: &str, rank: &str) -> String {
    format!("{label:>5}  {date:<10}  {count:>6}  {rank:>14}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peaks::select_peaks;
    use postpeak_common::test_utils::{date, series};

    #[test]
    fn test_peak_table_snapshot() {
        let daily = series(&[
            (date(2021, 6, 1), 3),
            (date(2021, 6, 2), 5),
            (date(2021, 6, 3), 50),
            (date(2021, 6, 4), 2),
            (date(2021, 6, 5), 4),
        ]);
        let peaks = select_peaks(&daily, 3);

        insta::assert_snapshot!(format_peak_table(&peak_table_title(3), &peaks), @r"
Top 3 peak days:
label  date         count  magnitude rank
    1  2021-06-02       5               2
    2  2021-06-03      50               1
    3  2021-06-05       4               3
");
    }

    #[test]
    fn test_empty_table() {
        let table = format_peak_table(&peak_table_title(7), &[]);

        assert_eq!(
            table,
            "Top 7 peak days:\nlabel  date         count  magnitude rank\n(no peak days)"
        );
    }

    #[test]
    fn test_no_trailing_whitespace() {
        let daily = series(&[(date(2022, 12, 31), 1234)]);
        let table = format_peak_table("t", &select_peaks(&daily, 1));

        assert!(table.lines().all(|line| line == line.trim_end()));
        assert!(table.ends_with("    1  2022-12-31    1234               1"));
    }

    #[test]
    fn test_one_line_per_peak() {
        let daily = series(&[
            (date(2021, 1, 4), 7),
            (date(2021, 8, 9), 11),
            (date(2023, 2, 2), 9),
        ]);
        let table = format_peak_table("t", &select_peaks(&daily, 3));

        assert_eq!(table.lines().count(), 5);
        assert!(!table.ends_with('\n'));
    }
}
