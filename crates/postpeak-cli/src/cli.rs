//! Command line arguments and configuration resolution.

use anyhow::{Context, Result};
use clap::Parser;
use postpeak_common::LogSink;
use postpeak_config::{ConfigLoader, Preset, ReportConfig};
use postpeak_graphs::{ReportPipeline, ReportSummary};
use std::path::PathBuf;
use tracing::error;

/// Command line arguments
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about = "Plot daily post volume and annotate the busiest days", long_about = None)]
pub struct Args {
    /// Configuration file path (.toml, .yaml, .yml or .json)
    #[arg(short, long, conflicts_with = "preset")]
    pub config: Option<PathBuf>,

    /// Built-in dataset preset: anti-china or pro-china
    #[arg(short, long)]
    pub preset: Option<Preset>,

    /// Input CSV file
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Output PNG file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of peak days to annotate
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Append-mode log file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log at debug level and mirror log lines to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the run summary as JSON after the peak table
    #[arg(long)]
    pub json: bool,
}

/// Builds the run configuration.
///
/// A configuration file is loaded with its environment overrides and
/// validation. Without one, the preset (anti-china unless given) is used
/// and environment overrides are applied to it. Command line flags win over
/// both, and the result is validated again.
pub fn resolve_config(args: &Args) -> Result<ReportConfig> {
    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_from_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => {
            let mut config = args.preset.unwrap_or(Preset::AntiChina).config();
            ConfigLoader::apply_env_overrides(&mut config)?;
            config
        }
    };

    apply_args(&mut config, args);
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn apply_args(config: &mut ReportConfig, args: &Args) {
    if let Some(source) = &args.source {
        config.source_path.clone_from(source);
    }
    if let Some(output) = &args.output {
        config.output_path.clone_from(output);
    }
    if let Some(top_k) = args.top_k {
        config.top_k = top_k;
    }
    if let Some(log_file) = &args.log_file {
        config.logging.file_path = Some(log_file.clone());
    }
    if args.verbose {
        config.logging.level = "debug".to_string();
        config.logging.console = true;
    }
}

/// Resolves the configuration and runs one report inside its own log sink.
pub fn run(args: &Args) -> Result<ReportSummary> {
    let config = resolve_config(args)?;
    let sink = LogSink::new(&config.logging).context("failed to set up logging")?;
    let dataset = config.dataset.clone();

    let summary = sink.in_scope(|| {
        ReportPipeline::new(config).run().inspect_err(|e| {
            error!("Report for '{}' failed ({}): {}", dataset, e.kind(), e);
        })
    });
    let summary = summary.with_context(|| format!("report for '{dataset}' failed"))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(summary)
}
