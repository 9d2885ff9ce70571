//! End-to-end report run: load, filter, aggregate, select, print and render.

use crate::aggregator::aggregate_daily;
use crate::filter::filter_by_range;
use crate::loader::load_posts;
use crate::peak_chart::PeakChart;
use crate::peaks::select_peaks;
use crate::renderer::ChartRenderer;
use crate::report::{format_peak_table, peak_table_title};
use postpeak_common::{PeakEntry, Result};
use postpeak_config::ReportConfig;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    /// Dataset name from the configuration.
    pub dataset: String,
    /// Records read from the source file.
    pub records_loaded: usize,
    /// Records inside the configured date range.
    pub records_in_range: usize,
    /// Days in the daily series.
    pub days: usize,
    /// Sum of the daily counts.
    pub total_posts: u64,
    /// Selected peaks in chronological order.
    pub peaks: Vec<PeakEntry>,
    /// Where the chart was written.
    pub output_path: PathBuf,
}

/// Runs one report for one configuration.
#[derive(Debug, Clone)]
pub struct ReportPipeline {
    config: ReportConfig,
}

impl ReportPipeline {
    /// Create a pipeline for a validated configuration
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Runs the report, printing the peak table to stdout.
    pub fn run(&self) -> Result<ReportSummary> {
        self.run_with_output(&mut std::io::stdout().lock())
    }

    /// Runs the report, printing the peak table to `out`.
    ///
    /// Any failure stops the run before later stages; in particular a load
    /// failure means no image is written.
    pub fn run_with_output<W: Write>(&self, out: &mut W) -> Result<ReportSummary> {
        let config = &self.config;
        info!("Starting report for dataset '{}'", config.dataset);

        let records = load_posts(&config.source_path, &config.columns)?;
        let records_loaded = records.len();

        let in_range = filter_by_range(records, &config.date_range);
        info!(
            "Kept {} of {} records within {}",
            in_range.len(),
            records_loaded,
            config.date_range
        );
        if in_range.is_empty() {
            warn!(
                "No records within {}; the chart will have no data",
                config.date_range
            );
        }

        let series = aggregate_daily(&in_range);
        let total_posts: u64 = series.iter().map(|d| u64::from(d.count)).sum();
        let peaks = select_peaks(&series, config.top_k);

        let table = format_peak_table(&peak_table_title(config.top_k), &peaks);
        info!("{}", table);
        writeln!(out, "{table}")?;

        let summary = ReportSummary {
            dataset: config.dataset.clone(),
            records_loaded,
            records_in_range: in_range.len(),
            days: series.len(),
            total_posts,
            peaks: peaks.clone(),
            output_path: config.output_path.clone(),
        };

        let chart = PeakChart::new(series, peaks, config.date_range, config.label_offsets.clone());
        if let Err(e) = chart.render_to_file(&config.chart, &config.output_path) {
            error!("Failed to save the plot as '{}': {}", config.output_path.display(), e);
            return Err(e);
        }
        info!("Saved the plot as '{}'.", config.output_path.display());

        Ok(summary)
    }
}
