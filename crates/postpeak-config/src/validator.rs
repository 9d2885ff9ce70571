//! Configuration validation.

use crate::schema::{ChartConfig, LabelOffsets, ReportConfig};
use postpeak_common::{PostPeakError, Result};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Regex pattern for validating hex color codes (e.g., #FFFFFF, #FF0000)
pub static HEX_COLOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("Invalid hex color regex pattern")
});

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a report configuration, returning the first problem found.
    pub fn validate(config: &ReportConfig) -> Result<()> {
        if config.dataset.trim().is_empty() {
            return Err(PostPeakError::validation_field("dataset name cannot be empty", "dataset"));
        }
        validate_path(&config.source_path, "source_path")?;
        validate_path(&config.output_path, "output_path")?;

        if config.columns.timestamp.trim().is_empty() {
            return Err(PostPeakError::validation_field(
                "timestamp column name cannot be empty",
                "columns.timestamp",
            ));
        }

        Self::validate_offsets(&config.label_offsets, config.top_k)?;
        Self::validate_chart(&config.chart)?;

        if let Some(log_path) = &config.logging.file_path {
            validate_path(log_path, "logging.file_path")?;
        }
        Ok(())
    }

    /// Offsets must be finite and non-negative; overrides must name a
    /// label that can exist.
    pub fn validate_offsets(offsets: &LabelOffsets, top_k: usize) -> Result<()> {
        validate_offset(offsets.default, "label_offsets.default")?;
        for o in &offsets.overrides {
            validate_offset(o.offset, "label_offsets.overrides")?;
            if o.label == 0 || o.label > top_k {
                return Err(PostPeakError::validation_field(
                    format!("override for label {} is outside 1..={top_k}", o.label),
                    "label_offsets.overrides",
                ));
            }
        }
        Ok(())
    }

    /// Sizes must be positive, colors `#RRGGBB`.
    pub fn validate_chart(chart: &ChartConfig) -> Result<()> {
        for (value, field) in [
            (chart.width_in, "chart.width_in"),
            (chart.height_in, "chart.height_in"),
            (chart.font_size_pt, "chart.font_size_pt"),
            (chart.line_width_pt, "chart.line_width_pt"),
            (chart.marker_width_pt, "chart.marker_width_pt"),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(PostPeakError::validation_field(
                    format!("{field} must be a positive number, got {value}"),
                    field,
                ));
            }
        }

        if chart.dpi == 0 {
            return Err(PostPeakError::validation_field("dpi must be positive", "chart.dpi"));
        }
        if chart.tick_interval_months == 0 {
            return Err(PostPeakError::validation_field(
                "tick interval must be at least one month",
                "chart.tick_interval_months",
            ));
        }
        if !matches!(chart.tick_label_rotation, 0 | 45) {
            return Err(PostPeakError::validation_field(
                format!("tick label rotation must be 0 or 45, got {}", chart.tick_label_rotation),
                "chart.tick_label_rotation",
            ));
        }

        for (color, field) in [
            (&chart.line_color, "chart.line_color"),
            (&chart.marker_color, "chart.marker_color"),
            (&chart.label_color, "chart.label_color"),
            (&chart.background_color, "chart.background_color"),
            (&chart.grid_color, "chart.grid_color"),
        ] {
            if !HEX_COLOR_REGEX.is_match(color) {
                return Err(PostPeakError::validation_field(
                    format!("{field} must be #RRGGBB, got '{color}'"),
                    field,
                ));
            }
        }
        Ok(())
    }
}

impl ReportConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        ConfigValidator::validate(self)
    }
}

fn validate_offset(value: f64, field: &str) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(PostPeakError::validation_field(
            format!("{field} must be a non-negative number, got {value}"),
            field,
        ))
    }
}

fn validate_path(path: &Path, field: &str) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(PostPeakError::validation_field(format!("{field} cannot be empty"), field));
    }
    Ok(())
}
