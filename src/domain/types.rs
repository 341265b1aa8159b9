//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV
//! - reloaded later for plotting or comparisons

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Minimal geometric description of an open-flow chamber.
///
/// Both dimensions are validated at construction; instances are immutable
/// after that, so any `ChamberGeometry` in circulation is known-good.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChamberGeometry {
    volume_m3: f64,
    area_m2: f64,
}

impl ChamberGeometry {
    /// Build a validated geometry. Both values must be strictly positive.
    pub fn new(volume_m3: f64, area_m2: f64) -> Result<Self, AppError> {
        if !(volume_m3.is_finite() && volume_m3 > 0.0) {
            return Err(AppError::new(4, "Chamber volume must be positive."));
        }
        if !(area_m2.is_finite() && area_m2 > 0.0) {
            return Err(AppError::new(4, "Chamber footprint area must be positive."));
        }
        Ok(Self { volume_m3, area_m2 })
    }

    pub fn volume_m3(&self) -> f64 {
        self.volume_m3
    }

    pub fn area_m2(&self) -> f64 {
        self.area_m2
    }
}

/// Optional trailing-window bounds applied before fitting.
///
/// `None` on both sides means the series is fitted as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowConfig {
    /// Guaranteed minimum window width (seconds) counted back from the last sample.
    pub min_window_s: Option<f64>,
    /// Cap on the window width (seconds) counted back from the last sample.
    pub max_window_s: Option<f64>,
}

impl WindowConfig {
    pub fn is_empty(&self) -> bool {
        self.min_window_s.is_none() && self.max_window_s.is_none()
    }
}

/// Bootstrap resampling settings.
#[derive(Debug, Clone, Copy)]
pub struct BootstrapConfig {
    /// Number of with-replacement refits.
    pub n_bootstrap: usize,
    /// Seed for the run-local random generator.
    pub seed: u64,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            n_bootstrap: 200,
            seed: 1234,
        }
    }
}

/// Exponential fit parameters and quality metrics for one series.
///
/// Field names are part of the export schema consumed by downstream
/// reporting tools; keep them stable.
#[derive(Debug, Clone, Serialize)]
pub struct FitResult {
    /// Initial concentration (ppm), fixed to the first observed sample.
    pub c0: f64,
    /// Fitted equilibrium concentration (ppm).
    pub cg: f64,
    /// Fitted characteristic time (seconds).
    pub theta: f64,
    /// Root-mean-square error of the fit (ppm).
    pub rmse: f64,
    /// Coefficient of determination; `1.0` for a zero-variance series.
    pub r2: f64,
    /// Signal-to-noise proxy `sample_std / rmse - 1`; infinite when `rmse == 0`.
    pub nt: f64,
    /// Per-sample residuals `predicted - observed` (ppm).
    pub residuals: Vec<f64>,
}

impl FitResult {
    /// Evaluate the fitted model at the given times.
    pub fn predict(&self, time_s: &[f64]) -> Result<Vec<f64>, AppError> {
        crate::physics::concentration_series(time_s, self.c0, self.cg, self.theta)
    }
}

/// Percentile confidence intervals from bootstrap resampling.
///
/// Each pair is `(2.5th, 97.5th)` percentile across replicate fits.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BootstrapIntervals {
    pub cg: (f64, f64),
    pub theta: (f64, f64),
    pub flux: (f64, f64),
}

/// Basic dataset statistics for reporting.
#[derive(Debug, Clone, Copy)]
pub struct SeriesStats {
    pub n_points: usize,
    pub time_min: f64,
    pub time_max: f64,
    pub c_min: f64,
    pub c_max: f64,
}

impl SeriesStats {
    pub fn from_series(time_s: &[f64], concentration_ppm: &[f64]) -> Self {
        let fold = |values: &[f64]| {
            values.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
        };
        let (time_min, time_max) = fold(time_s);
        let (c_min, c_max) = fold(concentration_ppm);
        Self {
            n_points: time_s.len(),
            time_min,
            time_max,
            c_min,
            c_max,
        }
    }
}

/// A full `ofc fit` run configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct FitRunConfig {
    pub csv_path: PathBuf,

    pub volume_m3: f64,
    pub area_m2: f64,

    /// Ambient concentration (ppm); defaults to the first observed sample.
    pub ambient_ppm: Option<f64>,

    pub window: WindowConfig,

    pub use_bootstrap: bool,
    pub bootstrap: BootstrapConfig,

    pub export_summary: Option<PathBuf>,
}

/// An `ofc simulate` run configuration.
#[derive(Debug, Clone)]
pub struct SimulateRunConfig {
    pub volume_m3: f64,
    pub area_m2: f64,

    pub ambient_ppm: f64,
    pub target_cg_ppm: f64,
    pub flow_m3_s: f64,

    pub duration_s: f64,
    pub noise_ppm_std: Option<f64>,
    pub noise_seed: u64,

    pub output_csv: Option<PathBuf>,
}

/// A saved fit summary (JSON).
///
/// The parameter/metric field names mirror `FitResult`; downstream report
/// and comparison tooling matches on them verbatim.
#[derive(Debug, Clone, Serialize)]
pub struct FitSummaryFile {
    pub tool: String,
    pub generated_on: NaiveDate,
    pub geometry: ChamberGeometry,
    pub ambient: f64,
    pub c0: f64,
    pub cg: f64,
    pub theta: f64,
    pub rmse: f64,
    pub r2: f64,
    pub nt: f64,
    pub flux: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bootstrap: Option<BootstrapIntervals>,
}
