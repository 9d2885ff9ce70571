//! Configuration loading with environment variable overrides.

use crate::schema::ReportConfig;
use postpeak_common::{PostPeakError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the input CSV.
pub const ENV_SOURCE_PATH: &str = "POSTPEAK_SOURCE_PATH";
/// Environment variable overriding the output image.
pub const ENV_OUTPUT_PATH: &str = "POSTPEAK_OUTPUT_PATH";
/// Environment variable overriding the number of peaks.
pub const ENV_TOP_K: &str = "POSTPEAK_TOP_K";
/// Environment variable overriding the log file.
pub const ENV_LOG_FILE: &str = "POSTPEAK_LOG_FILE";
/// Environment variable overriding the log level.
pub const ENV_LOG_LEVEL: &str = "POSTPEAK_LOG_LEVEL";

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.toml`
    Toml,
    /// `.yaml` / `.yml`
    Yaml,
    /// `.json`
    Json,
}

impl ConfigFormat {
    /// Picks the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("toml") => Ok(Self::Toml),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(PostPeakError::config(format!(
                "unsupported configuration file extension: {}",
                path.display()
            ))),
        }
    }
}

/// Configuration loader for report runs
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads a configuration file, applies environment overrides and validates.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<ReportConfig> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            PostPeakError::config_with_source(
                format!("failed to read configuration file {}", path.display()),
                e,
            )
        })?;

        let mut config = Self::parse_str(&content, format)?;
        Self::apply_env_overrides(&mut config)?;
        config.validate()?;

        debug!("Loaded configuration for dataset '{}' from {}", config.dataset, path.display());
        Ok(config)
    }

    /// Parses configuration text without overrides or validation.
    pub fn parse_str(content: &str, format: ConfigFormat) -> Result<ReportConfig> {
        let config = match format {
            ConfigFormat::Toml => toml::from_str(content)?,
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
        };
        Ok(config)
    }

    /// Applies `POSTPEAK_*` environment variables.
    pub fn apply_env_overrides(config: &mut ReportConfig) -> Result<()> {
        Self::apply_overrides_from(config, |var| std::env::var(var).ok())
    }

    /// Applies overrides from any variable lookup.
    pub fn apply_overrides_from<F>(config: &mut ReportConfig, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_SOURCE_PATH) {
            config.source_path = PathBuf::from(path);
        }

        if let Some(path) = lookup(ENV_OUTPUT_PATH) {
            config.output_path = PathBuf::from(path);
        }

        if let Some(top_k) = lookup(ENV_TOP_K) {
            config.top_k = top_k.trim().parse().map_err(|e| {
                PostPeakError::config_with_source(
                    format!("failed to parse environment variable '{ENV_TOP_K}'"),
                    e,
                )
            })?;
        }

        if let Some(path) = lookup(ENV_LOG_FILE) {
            config.logging.file_path = Some(PathBuf::from(path));
        }

        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            config.logging.level = level;
        }

        Ok(())
    }
}
