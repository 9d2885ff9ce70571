//! Timestamp parsing shared by the loader and the configuration layer.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Formats carrying an explicit UTC offset.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

/// Date-time formats without an offset, tried in order.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
];

/// Bare dates, read as midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%Y%m%d"];

/// Parses a timestamp cell.
///
/// Offset-bearing values are converted to UTC and returned without their
/// offset. A trailing `Z` or ` UTC` marks a UTC value. Bare dates map to
/// midnight and plain numbers are Unix epoch seconds. Returns `None` for
/// empty or unrecognized input.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Some(dt.naive_utc());
        }
    }

    let naive = value
        .strip_suffix(" UTC")
        .or_else(|| value.strip_suffix('Z'))
        .unwrap_or(value);

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, format) {
            return Some(dt);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(naive, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    parse_epoch_seconds(value)
}

fn parse_epoch_seconds(value: &str) -> Option<NaiveDateTime> {
    if let Ok(secs) = value.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc());
    }

    let secs = value.parse::<f64>().ok().filter(|s| s.is_finite())?;
    let whole = secs.floor();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let nanos = ((secs - whole) * 1e9).round().min(999_999_999.0) as u32;
    #[allow(clippy::cast_possible_truncation)]
    DateTime::from_timestamp(whole as i64, nanos).map(|dt| dt.naive_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_parse_naive_formats() {
        let expected = ts(2021, 6, 3, 14, 5, 9);
        assert_eq!(parse_timestamp("2021-06-03 14:05:09"), Some(expected));
        assert_eq!(parse_timestamp("2021-06-03T14:05:09"), Some(expected));
        assert_eq!(parse_timestamp("2021/06/03 14:05:09"), Some(expected));
        assert_eq!(parse_timestamp("06/03/2021 14:05:09"), Some(expected));
        assert_eq!(parse_timestamp("  2021-06-03 14:05:09  "), Some(expected));
        assert_eq!(parse_timestamp("2021-06-03 14:05"), Some(ts(2021, 6, 3, 14, 5, 0)));
    }

    #[test]
    fn test_parse_fractional_seconds() {
        let parsed = parse_timestamp("2021-06-03 14:05:09.250").unwrap();
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2021, 6, 3).unwrap());
        assert_eq!(parsed.nanosecond(), 250_000_000);
    }

    #[test]
    fn test_parse_offsets_normalize_to_utc() {
        let expected = ts(2021, 6, 3, 6, 0, 0);
        assert_eq!(parse_timestamp("2021-06-03T14:00:00+08:00"), Some(expected));
        assert_eq!(parse_timestamp("2021-06-03 14:00:00+08:00"), Some(expected));
        assert_eq!(parse_timestamp("2021-06-03 14:00:00+0800"), Some(expected));
        assert_eq!(parse_timestamp("2021-06-03T06:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2021-06-03 06:00:00 UTC"), Some(expected));
    }

    #[test]
    fn test_offset_can_move_day() {
        let parsed = parse_timestamp("2021-01-01T02:00:00+05:00").unwrap();
        assert_eq!(parsed, ts(2020, 12, 31, 21, 0, 0));
    }

    #[test]
    fn test_parse_bare_dates() {
        let midnight = ts(2021, 6, 3, 0, 0, 0);
        assert_eq!(parse_timestamp("2021-06-03"), Some(midnight));
        assert_eq!(parse_timestamp("2021/06/03"), Some(midnight));
        assert_eq!(parse_timestamp("06/03/2021"), Some(midnight));
        assert_eq!(parse_timestamp("20210603"), Some(midnight));
    }

    #[test]
    fn test_parse_epoch_seconds() {
        assert_eq!(parse_timestamp("1622678400"), Some(ts(2021, 6, 3, 0, 0, 0)));
        let fractional = parse_timestamp("1622678400.5").unwrap();
        assert_eq!(fractional.date(), ts(2021, 6, 3, 0, 0, 0).date());
        assert_eq!(fractional.nanosecond(), 500_000_000);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("   "), None);
        assert_eq!(parse_timestamp("not a date"), None);
        assert_eq!(parse_timestamp("2021-13-45 10:00:00"), None);
        assert_eq!(parse_timestamp("NaN"), None);
    }
}
