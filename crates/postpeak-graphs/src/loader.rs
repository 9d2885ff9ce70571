//! CSV loading of post records.

use postpeak_common::{parse_timestamp, PostPeakError, PostRecord, Result};
use postpeak_config::ColumnConfig;
use std::path::Path;
use tracing::{error, info, warn};

/// Reads every post from a CSV file with a header row.
///
/// The timestamp column must exist and every cell in it must parse, or the
/// whole load fails. A missing id column is tolerated: records are then
/// identified by their 1-based row number.
pub fn load_posts(path: &Path, columns: &ColumnConfig) -> Result<Vec<PostRecord>> {
    let (headers, rows) = match read_rows(path) {
        Ok(read) => read,
        Err(e) => {
            error!("Error reading file {}: {}", path.display(), e);
            return Err(e);
        }
    };
    info!("Successfully read file: {}", path.display());
    info!("Columns in file {}: {:?}", path.display(), headers);

    let records = convert_rows(path, &headers, &rows, columns).inspect_err(|e| {
        error!("Error converting '{}': {}", columns.timestamp, e);
    })?;
    info!("Converted '{}' to datetime format.", columns.timestamp);
    Ok(records)
}

fn read_rows(path: &Path) -> Result<(Vec<String>, Vec<csv::StringRecord>)> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| PostPeakError::load_with_source(path, "cannot open file", e))?;

    let headers = reader
        .headers()
        .map_err(|e| PostPeakError::load_with_source(path, "cannot read header row", e))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let rows = reader
        .records()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| PostPeakError::load_with_source(path, "malformed CSV", e))?;

    Ok((headers, rows))
}

fn convert_rows(
    path: &Path,
    headers: &[String],
    rows: &[csv::StringRecord],
    columns: &ColumnConfig,
) -> Result<Vec<PostRecord>> {
    let timestamp_idx = headers
        .iter()
        .position(|h| h == &columns.timestamp)
        .ok_or_else(|| {
            PostPeakError::load(path, format!("missing required column '{}'", columns.timestamp))
        })?;

    let id_idx = headers.iter().position(|h| h == &columns.id);
    if id_idx.is_none() {
        warn!(
            "Column '{}' not found in {}; using row numbers as identifiers",
            columns.id,
            path.display()
        );
    }

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let row_number = i + 1;
            let raw = row.get(timestamp_idx).unwrap_or_default();
            let created_time = parse_timestamp(raw)
                .ok_or_else(|| PostPeakError::parse(row_number, &columns.timestamp, raw))?;
            let id = id_idx
                .and_then(|idx| row.get(idx))
                .map_or_else(|| row_number.to_string(), str::to_string);
            Ok(PostRecord::new(id, created_time))
        })
        .collect()
}
