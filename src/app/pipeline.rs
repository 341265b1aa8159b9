//! Shared fit-workflow logic used by the CLI front-end.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! window selection -> fit -> flux -> optional bootstrap
//!
//! The CLI can then focus on presentation (printing vs exports).

use chrono::Utc;

use crate::domain::{
    BootstrapIntervals, ChamberGeometry, FitResult, FitRunConfig, FitSummaryFile, SeriesStats,
};
use crate::error::AppError;
use crate::fit::{fit_exponential, resample_intervals, select_window};
use crate::physics::flux_from_fit;

/// All computed outputs of a single `ofc fit` run.
#[derive(Debug, Clone)]
pub struct FitRunOutput {
    /// The (possibly windowed) series the fit actually used.
    pub time_s: Vec<f64>,
    pub observed_ppm: Vec<f64>,
    pub stats: SeriesStats,
    pub fit: FitResult,
    pub geometry: ChamberGeometry,
    pub ambient_ppm: f64,
    pub flux: f64,
    pub bootstrap: Option<BootstrapIntervals>,
}

/// Execute the full fit workflow on an in-memory series.
pub fn run_fit_workflow(
    config: &FitRunConfig,
    time_s: &[f64],
    concentration_ppm: &[f64],
) -> Result<FitRunOutput, AppError> {
    if time_s.len() != concentration_ppm.len() {
        return Err(AppError::new(
            3,
            "Time and concentration vectors must have the same length.",
        ));
    }

    let (time, conc) = select_window(time_s, concentration_ppm, &config.window);

    let fit = fit_exponential(time, conc)?;
    let geometry = ChamberGeometry::new(config.volume_m3, config.area_m2)?;

    // Ambient defaults to the first sample of the fitted window.
    let ambient_ppm = config.ambient_ppm.unwrap_or(conc[0]);
    let flux = flux_from_fit(&geometry, fit.theta, fit.cg, ambient_ppm)?;

    let bootstrap = if config.use_bootstrap {
        Some(resample_intervals(
            time,
            conc,
            &geometry,
            ambient_ppm,
            &config.bootstrap,
        )?)
    } else {
        None
    };

    Ok(FitRunOutput {
        stats: SeriesStats::from_series(time, conc),
        time_s: time.to_vec(),
        observed_ppm: conc.to_vec(),
        fit,
        geometry,
        ambient_ppm,
        flux,
        bootstrap,
    })
}

/// Build the serializable summary for a completed run.
pub fn summarize(output: &FitRunOutput) -> FitSummaryFile {
    FitSummaryFile {
        tool: "ofc".to_string(),
        generated_on: Utc::now().date_naive(),
        geometry: output.geometry,
        ambient: output.ambient_ppm,
        c0: output.fit.c0,
        cg: output.fit.cg,
        theta: output.fit.theta,
        rmse: output.fit.rmse,
        r2: output.fit.r2,
        nt: output.fit.nt,
        flux: output.flux,
        bootstrap: output.bootstrap,
    }
}
