//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - chamber geometry and run configuration
//! - fit outputs (`FitResult`, `BootstrapIntervals`)
//! - the serializable fit-summary schema (`FitSummaryFile`)

pub mod types;

pub use types::*;
