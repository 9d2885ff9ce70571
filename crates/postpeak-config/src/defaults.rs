//! Default values and the two dataset presets.

use crate::schema::{ChartConfig, ColumnConfig, LabelOffsets, ReportConfig};
use postpeak_common::{DateRange, LoggingConfig, PostPeakError};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            id: "id".to_string(),
            timestamp: "created_time".to_string(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width_in: 18.0,
            height_in: 8.0,
            dpi: 300,
            tick_interval_months: 3,
            tick_label_rotation: 45,
            line_color: "#1f77b4".to_string(),
            marker_color: "#ff0000".to_string(),
            label_color: "#000000".to_string(),
            background_color: "#ffffff".to_string(),
            grid_color: "#e0e0e0".to_string(),
            font_family: "sans-serif".to_string(),
            font_size_pt: 10.0,
            line_width_pt: 1.5,
            marker_width_pt: 0.8,
            x_label: "Time".to_string(),
            y_label: "Number of Posts".to_string(),
            title: None,
        }
    }
}

/// The two datasets the report was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    /// `anti-china.csv`, seven peaks, label 4 raised to avoid overlap.
    AntiChina,
    /// `pro-china.csv`, six peaks, one flat offset.
    ProChina,
}

impl Preset {
    /// All presets, in display order.
    pub const ALL: [Self; 2] = [Self::AntiChina, Self::ProChina];

    /// Dataset name, also the stem of the default input and output files.
    pub const fn name(self) -> &'static str {
        match self {
            Self::AntiChina => "anti-china",
            Self::ProChina => "pro-china",
        }
    }

    /// Builds the preset's configuration.
    pub fn config(self) -> ReportConfig {
        match self {
            Self::AntiChina => ReportConfig::anti_china(),
            Self::ProChina => ReportConfig::pro_china(),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = PostPeakError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                PostPeakError::config(format!(
                    "unknown preset '{s}', expected one of: anti-china, pro-china"
                ))
            })
    }
}

impl ReportConfig {
    /// Seven peaks; label 4 sits at +26, every other label at +18.
    pub fn anti_china() -> Self {
        Self::for_dataset(
            Preset::AntiChina.name(),
            7,
            LabelOffsets::flat(18.0)
                .with_override(4, 26.0)
                .with_override(5, 18.0),
        )
    }

    /// Six peaks, every label at +5.
    pub fn pro_china() -> Self {
        Self::for_dataset(Preset::ProChina.name(), 6, LabelOffsets::flat(5.0))
    }

    /// A configuration reading `<dataset>.csv` and writing `<dataset>.png`.
    pub fn for_dataset(dataset: &str, top_k: usize, label_offsets: LabelOffsets) -> Self {
        Self {
            dataset: dataset.to_string(),
            source_path: PathBuf::from(format!("{dataset}.csv")),
            columns: ColumnConfig::default(),
            date_range: DateRange::reference_window(),
            top_k,
            label_offsets,
            output_path: PathBuf::from(format!("{dataset}.png")),
            chart: ChartConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
