//! Bootstrap confidence intervals for the fitted parameters and flux.
//!
//! Each replicate resamples the observed series with replacement, refits,
//! and recomputes the derived flux. The 2.5th/97.5th percentiles across
//! replicates form the interval. One seeded generator drives the whole
//! run, and replicates execute sequentially so the intervals are a pure
//! function of `(input, seed)`.
//!
//! A replicate that fails to fit aborts the whole run: resampling a series
//! that sometimes stops looking exponential is a data problem the caller
//! should see, not something to paper over by skipping replicates.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::domain::{BootstrapConfig, BootstrapIntervals, ChamberGeometry};
use crate::error::AppError;
use crate::fit::engine::fit_exponential;
use crate::physics::flux_from_fit;

/// Resample, refit, and report percentile intervals for `cg`, `theta`,
/// and the derived flux.
pub fn resample_intervals(
    time_s: &[f64],
    concentration_ppm: &[f64],
    geometry: &ChamberGeometry,
    ambient_ppm: f64,
    config: &BootstrapConfig,
) -> Result<BootstrapIntervals, AppError> {
    let n = time_s.len();
    if n < 3 {
        return Err(AppError::new(
            3,
            "At least three observations are required to bootstrap.",
        ));
    }

    let replicates = config.n_bootstrap.max(1);
    let mut rng = StdRng::seed_from_u64(config.seed);

    let mut cg_values = Vec::with_capacity(replicates);
    let mut theta_values = Vec::with_capacity(replicates);
    let mut flux_values = Vec::with_capacity(replicates);

    let mut indices = vec![0usize; n];
    for _ in 0..replicates {
        for slot in indices.iter_mut() {
            *slot = rng.gen_range(0..n);
        }
        // Sorting the drawn indices keeps the resampled time axis
        // non-decreasing even with duplicates.
        indices.sort_unstable();

        let sample_time: Vec<f64> = indices.iter().map(|&i| time_s[i]).collect();
        let sample_conc: Vec<f64> = indices.iter().map(|&i| concentration_ppm[i]).collect();

        let fit = fit_exponential(&sample_time, &sample_conc)?;
        let flux = flux_from_fit(geometry, fit.theta, fit.cg, ambient_ppm)?;

        cg_values.push(fit.cg);
        theta_values.push(fit.theta);
        flux_values.push(flux);
    }

    Ok(BootstrapIntervals {
        cg: percentile_interval(&mut cg_values),
        theta: percentile_interval(&mut theta_values),
        flux: percentile_interval(&mut flux_values),
    })
}

fn percentile_interval(values: &mut [f64]) -> (f64, f64) {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    (
        percentile_sorted(values, 2.5),
        percentile_sorted(values, 97.5),
    )
}

/// Percentile with linear interpolation between order statistics.
fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
