//! # PostPeak CLI
//!
//! Argument parsing and the single-run entry point behind the `postpeak`
//! binary.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;

pub use cli::{resolve_config, run, Args};
