//! # PostPeak Common
//!
//! Shared types, errors, timestamp parsing and logging for PostPeak.
//!
//! Every other crate in the workspace builds on the record types and the
//! [`PostPeakError`] defined here.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::{PostPeakError, Result};
pub use logging::{LogSink, LoggingConfig, DEFAULT_LOG_FILE};
pub use types::*;
pub use utils::*;
