//! Result exports.
//!
//! - timeseries CSV (`time_s,C_ppm`), consumable by the `fit` subcommand
//!   and by spreadsheets
//! - fit-summary JSON, the portable representation of a fitted run
//!   (schema defined by `domain::FitSummaryFile`)

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::FitSummaryFile;
use crate::error::AppError;
use crate::io::ingest::{CONCENTRATION_COLUMN, TIME_COLUMN};

/// Write a concentration timeseries to CSV.
pub fn write_timeseries_csv(
    path: &Path,
    time_s: &[f64],
    concentration_ppm: &[f64],
) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create CSV '{}': {e}", path.display()))
    })?;

    writeln!(file, "{TIME_COLUMN},{CONCENTRATION_COLUMN}")
        .map_err(|e| AppError::new(2, format!("Failed to write CSV header: {e}")))?;

    for (t, c) in time_s.iter().zip(concentration_ppm.iter()) {
        writeln!(file, "{t:.6},{c:.6}")
            .map_err(|e| AppError::new(2, format!("Failed to write CSV row: {e}")))?;
    }

    Ok(())
}

/// Write a fit summary JSON file.
pub fn write_fit_summary_json(path: &Path, summary: &FitSummaryFile) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create summary JSON '{}': {e}", path.display()),
        )
    })?;

    serde_json::to_writer_pretty(file, summary)
        .map_err(|e| AppError::new(2, format!("Failed to write summary JSON: {e}")))?;

    Ok(())
}
