//! # PostPeak Graphs
//!
//! Turns a CSV of timestamped posts into a daily post-count series, picks
//! the busiest days and renders them as an annotated line chart using
//! plotters.
//!
//! The stages run in order: [`load_posts`], [`filter_by_range`],
//! [`aggregate_daily`], [`select_peaks`], then [`PeakChart`] rendering.
//! [`ReportPipeline`] wires them together for one [`ReportConfig`].
//!
//! [`ReportConfig`]: postpeak_config::ReportConfig

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregator;
pub mod filter;
pub mod loader;
pub mod peak_chart;
pub mod peaks;
pub mod pipeline;
pub mod renderer;
pub mod report;

pub use aggregator::*;
pub use filter::*;
pub use loader::*;
pub use peak_chart::*;
pub use peaks::*;
pub use pipeline::*;
pub use renderer::*;
pub use report::*;
