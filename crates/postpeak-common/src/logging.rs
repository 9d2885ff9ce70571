//! Per-run logging sinks.
//!
//! A [`LogSink`] owns its own subscriber instead of installing a global one,
//! so two report runs in the same process (or two processes pointed at
//! different log files) never share a writer. Lines look like
//! `2024-01-01 12:00:00,123 - INFO - message`.

use crate::error::{PostPeakError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{Dispatch, Event, Subscriber};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{
        format::{self, FormatEvent, FormatFields},
        FmtContext,
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    EnvFilter,
};

/// Default append-mode log file.
pub const DEFAULT_LOG_FILE: &str = "data_processing.log";

/// Configuration for a run's log sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "postpeak_graphs=trace")
    pub level: String,
    /// Append-mode log file; `None` disables file output
    pub file_path: Option<PathBuf>,
    /// Mirror log lines to stderr
    pub console: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_path: Some(PathBuf::from(DEFAULT_LOG_FILE)),
            console: false,
        }
    }
}

/// `<timestamp> - <LEVEL> - <message>` line format.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportLineFormat;

impl<S, N> FormatEvent<S, N> for ReportLineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let now = chrono::Local::now();
        write!(
            writer,
            "{} - {} - ",
            now.format("%Y-%m-%d %H:%M:%S,%3f"),
            event.metadata().level()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// A logging destination scoped to one report run.
pub struct LogSink {
    dispatch: Dispatch,
}

impl LogSink {
    /// Builds a sink from the configuration, opening the log file in append mode.
    pub fn new(config: &LoggingConfig) -> Result<Self> {
        let filter = EnvFilter::try_new(&config.level).map_err(|e| {
            PostPeakError::config_with_source(format!("invalid log level '{}'", config.level), e)
        })?;

        let file_layer = config
            .file_path
            .as_deref()
            .map(open_appender)
            .transpose()?
            .map(|appender| {
                tracing_subscriber::fmt::layer()
                    .event_format(ReportLineFormat)
                    .with_ansi(false)
                    .with_writer(appender)
            });

        let console_layer = config.console.then(|| {
            tracing_subscriber::fmt::layer()
                .event_format(ReportLineFormat)
                .with_writer(std::io::stderr)
        });

        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(console_layer);

        Ok(Self {
            dispatch: Dispatch::new(subscriber),
        })
    }

    /// Runs `f` with this sink as the thread's default subscriber.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}

impl fmt::Debug for LogSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogSink").finish_non_exhaustive()
    }
}

fn open_appender(path: &Path) -> Result<RollingFileAppender> {
    let file_name = path
        .file_name()
        .ok_or_else(|| PostPeakError::config(format!("log path {} has no file name", path.display())))?;
    let directory = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(directory)
        .map_err(|e| {
            PostPeakError::config_with_source(format!("cannot open log file {}", path.display()), e)
        })
}
