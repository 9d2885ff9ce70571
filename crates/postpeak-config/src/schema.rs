//! Configuration schema definitions using serde.

use postpeak_common::{DateRange, LoggingConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything one report run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Dataset name used in log lines and the printed table.
    pub dataset: String,
    /// CSV file to load.
    pub source_path: PathBuf,
    /// Column names in the CSV header.
    #[serde(default)]
    pub columns: ColumnConfig,
    /// Inclusive filtering window, also the chart's x domain.
    #[serde(default)]
    pub date_range: DateRange,
    /// Maximum number of peak days to mark.
    pub top_k: usize,
    /// Vertical placement of the peak labels.
    pub label_offsets: LabelOffsets,
    /// PNG destination.
    pub output_path: PathBuf,
    /// Chart appearance.
    #[serde(default)]
    pub chart: ChartConfig,
    /// Log sink for the run.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Column names in the CSV header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    /// Post identifier column. Optional in the file.
    pub id: String,
    /// Creation timestamp column. Required in the file.
    pub timestamp: String,
}

/// Per-label vertical offsets, added to the highest daily count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelOffsets {
    /// Offset used for labels without an override.
    pub default: f64,
    /// Offsets for specific labels.
    #[serde(default)]
    pub overrides: Vec<LabelOffsetOverride>,
}

/// Offset for one chronological label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelOffsetOverride {
    /// The 1-based chronological label.
    pub label: usize,
    /// Offset above the highest count.
    pub offset: f64,
}

impl LabelOffsets {
    /// The same offset for every label.
    pub const fn flat(offset: f64) -> Self {
        Self {
            default: offset,
            overrides: Vec::new(),
        }
    }

    /// Adds or replaces the override for `label`.
    #[must_use]
    pub fn with_override(mut self, label: usize, offset: f64) -> Self {
        self.overrides.retain(|o| o.label != label);
        self.overrides.push(LabelOffsetOverride { label, offset });
        self
    }

    /// Offset for `label`. The last override for a label wins.
    pub fn offset_for(&self, label: usize) -> f64 {
        self.overrides
            .iter()
            .rev()
            .find(|o| o.label == label)
            .map_or(self.default, |o| o.offset)
    }
}

/// Chart appearance. Sizes are in inches and points, converted to pixels
/// through `dpi`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Figure width in inches.
    pub width_in: f64,
    /// Figure height in inches.
    pub height_in: f64,
    /// Output resolution.
    pub dpi: u32,
    /// Months between x-axis ticks.
    pub tick_interval_months: u32,
    /// Rotation of the tick labels in degrees, 0 or 45.
    pub tick_label_rotation: u32,
    /// Daily count line color.
    pub line_color: String,
    /// Peak marker color.
    pub marker_color: String,
    /// Peak label color.
    pub label_color: String,
    /// Background color.
    pub background_color: String,
    /// Horizontal grid line color.
    pub grid_color: String,
    /// Font family for every text element.
    pub font_family: String,
    /// Base font size in points.
    pub font_size_pt: f64,
    /// Daily count line width in points.
    pub line_width_pt: f64,
    /// Peak marker width in points.
    pub marker_width_pt: f64,
    /// X axis description.
    pub x_label: String,
    /// Y axis description.
    pub y_label: String,
    /// Optional caption above the chart.
    pub title: Option<String>,
}

impl ChartConfig {
    /// Output image size in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.inches_to_px(self.width_in), self.inches_to_px(self.height_in))
    }

    /// Converts a length in points to whole pixels, at least 1.
    pub fn points_to_px(&self, points: f64) -> u32 {
        Self::clamp_px(points * f64::from(self.dpi) / 72.0)
    }

    fn inches_to_px(&self, inches: f64) -> u32 {
        Self::clamp_px(inches * f64::from(self.dpi))
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn clamp_px(value: f64) -> u32 {
        value.round().clamp(1.0, f64::from(u32::MAX)) as u32
    }
}
