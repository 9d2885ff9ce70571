//! PostPeak - daily post-volume report with annotated peak days

use anyhow::Result;
use clap::Parser;
use postpeak_cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();
    postpeak_cli::run(&args)?;
    Ok(())
}
