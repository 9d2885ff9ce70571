//! Error types and utilities for PostPeak

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for PostPeak operations
pub type Result<T> = std::result::Result<T, PostPeakError>;

/// Main error type for PostPeak operations
///
/// Every variant is fatal for a report run: the pipeline stops at the stage
/// that produced it and nothing downstream is executed.
#[derive(Error, Debug)]
pub enum PostPeakError {
    /// Input file missing, unreadable or not valid CSV
    #[error("Load error for {}: {message}", path.display())]
    Load {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A timestamp cell could not be converted to a date-time
    #[error("Parse error at row {row}: cannot convert {column} value {value:?} to a date-time")]
    Parse {
        /// 1-based data row (the header is not counted)
        row: usize,
        column: String,
        value: String,
    },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors for configuration values
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Drawing, encoding or writing the chart failed
    #[error("Render error: {message}")]
    Render {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PostPeakError {
    /// Create a new load error
    pub fn load(path: impl AsRef<Path>, msg: impl Into<String>) -> Self {
        Self::Load {
            path: path.as_ref().to_path_buf(),
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new load error with source
    pub fn load_with_source(
        path: impl AsRef<Path>,
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Load {
            path: path.as_ref().to_path_buf(),
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new timestamp parse error
    pub fn parse(row: usize, column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Parse {
            row,
            column: column.into(),
            value: value.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new render error
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new render error with source
    pub fn render_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Render {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Short kind name used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Load { .. } => "LoadError",
            Self::Parse { .. } => "ParseError",
            Self::Config { .. } => "ConfigError",
            Self::Validation { .. } => "ValidationError",
            Self::Render { .. } => "RenderError",
            Self::Io(_) => "IoError",
        }
    }
}

// Error conversion implementations for external types

/// Convert from toml::de::Error to PostPeakError
impl From<toml::de::Error> for PostPeakError {
    fn from(err: toml::de::Error) -> Self {
        Self::config_with_source("TOML parsing error", err)
    }
}

/// Convert from serde_yaml::Error to PostPeakError
impl From<serde_yaml::Error> for PostPeakError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::config_with_source("YAML parsing error", err)
    }
}

/// Convert from serde_json::Error to PostPeakError
impl From<serde_json::Error> for PostPeakError {
    fn from(err: serde_json::Error) -> Self {
        Self::config_with_source("JSON parsing error", err)
    }
}

#[cfg(feature = "plotters")]
/// Convert from plotters drawing errors to PostPeakError
impl<T> From<plotters::drawing::DrawingAreaErrorKind<T>> for PostPeakError
where
    T: std::error::Error + Send + Sync + 'static,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        Self::render_with_source("Chart drawing failed", err)
    }
}
