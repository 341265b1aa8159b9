//! Input/output helpers.
//!
//! - concentration CSV ingest + validation (`ingest`)
//! - timeseries CSV and fit-summary JSON exports (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
