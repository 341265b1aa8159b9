//! Initial `(C_G, theta)` estimation via a shrinking grid search.
//!
//! We search one dimension only: for each candidate `C_G` the matching
//! `theta` has a closed form, because `ln(C_G - C(t))` is linear in `t`
//! with slope `-1/theta`. Each round samples candidates across the current
//! bracket, keeps the lowest-error pair seen so far, and shrinks the
//! bracket around it.
//!
//! Why grid search?
//! - It avoids local minima issues common in nonlinear optimization.
//! - It is deterministic given the same inputs.
//! - With one free dimension, a modest grid is fast enough for field data.

use rayon::prelude::*;

use crate::error::AppError;
use crate::fit::CG_EPS;
use crate::physics::concentration_series;

/// Number of bracket-shrink rounds.
const GRID_ROUNDS: usize = 4;
/// Evenly spaced `C_G` candidates per round.
const GRID_CANDIDATES: usize = 120;

#[derive(Debug, Clone, Copy)]
struct Candidate {
    idx: usize,
    cg: f64,
    theta: f64,
    mse: f64,
}

/// Estimate starting values for `C_G` and `theta`.
///
/// `c0` is fixed to the first observed sample by the caller. Fails when no
/// candidate in any round is valid, i.e. the series does not look like a
/// monotone exponential approach to an asymptote.
pub fn initial_estimate(
    time_s: &[f64],
    concentration_ppm: &[f64],
    c0: f64,
) -> Result<(f64, f64), AppError> {
    let observed_max = concentration_ppm
        .iter()
        .fold(f64::NEG_INFINITY, |acc, &c| acc.max(c));
    let cg_floor = observed_max.max(c0 + CG_EPS);
    let cg_ceiling = cg_floor + 5.0_f64.max(0.2 * cg_floor.abs());

    let mut best: Option<Candidate> = None;
    let mut low = cg_floor;
    let mut high = cg_ceiling;

    for _ in 0..GRID_ROUNDS {
        // Candidates within a round are independent; evaluate them in
        // parallel and select deterministically (lowest MSE, ties broken
        // by grid index).
        let round_best = (0..GRID_CANDIDATES)
            .into_par_iter()
            .filter_map(|idx| {
                let frac = idx as f64 / (GRID_CANDIDATES as f64 - 1.0);
                let cg = low + (high - low) * frac;
                evaluate_candidate(time_s, concentration_ppm, c0, cg, idx)
            })
            .min_by(|a, b| {
                a.mse
                    .partial_cmp(&b.mse)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.idx.cmp(&b.idx))
            });

        // Keep the best pair across rounds; a later round only wins with a
        // strictly smaller error.
        if let Some(candidate) = round_best {
            match best {
                Some(current) if candidate.mse >= current.mse => {}
                _ => best = Some(candidate),
            }
        }

        let span = high - low;
        let Some(current) = best else { break };
        low = (c0 + CG_EPS).max(current.cg - span / 4.0);
        high = current.cg + span / 4.0;
    }

    best.map(|c| (c.cg, c.theta)).ok_or_else(|| {
        AppError::new(
            4,
            "Could not seed C_G; the series must approach an asymptote monotonically.",
        )
    })
}

fn evaluate_candidate(
    time_s: &[f64],
    concentration_ppm: &[f64],
    c0: f64,
    cg: f64,
    idx: usize,
) -> Option<Candidate> {
    let theta = theta_from_candidate(time_s, concentration_ppm, cg)?;
    let preds = concentration_series(time_s, c0, cg, theta).ok()?;
    let mse = preds
        .iter()
        .zip(concentration_ppm)
        .map(|(p, c)| (p - c) * (p - c))
        .sum::<f64>()
        / time_s.len() as f64;
    if !mse.is_finite() {
        return None;
    }
    Some(Candidate {
        idx,
        cg,
        theta,
        mse,
    })
}

/// Closed-form `theta` for a fixed `C_G` candidate.
///
/// Linear regression of `ln(C_G - C(t))` against `t`; the slope is
/// `-1/theta`. Rejects candidates where the log is undefined, the time
/// axis has zero variance, or the slope implies a non-decaying response.
fn theta_from_candidate(time_s: &[f64], concentration_ppm: &[f64], cg: f64) -> Option<f64> {
    let n = time_s.len() as f64;

    let mut log_diff = Vec::with_capacity(concentration_ppm.len());
    for &c in concentration_ppm {
        let diff = cg - c;
        if diff <= 0.0 {
            return None;
        }
        log_diff.push(diff.ln());
    }

    let t_mean = time_s.iter().sum::<f64>() / n;
    let y_mean = log_diff.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var = 0.0;
    for (&t, &y) in time_s.iter().zip(log_diff.iter()) {
        let dt = t - t_mean;
        cov += dt * (y - y_mean);
        var += dt * dt;
    }
    if var == 0.0 {
        return None;
    }

    let slope = cov / var;
    if slope >= 0.0 {
        return None;
    }
    Some(-1.0 / slope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::concentration_series;

    fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| start + (end - start) * i as f64 / (n as f64 - 1.0))
            .collect()
    }

    #[test]
    fn seeds_close_to_true_parameters_on_clean_data() {
        let time = linspace(0.0, 60.0, 25);
        let conc = concentration_series(&time, 420.0, 480.0, 12.0).unwrap();

        let (cg, theta) = initial_estimate(&time, &conc, 420.0).unwrap();
        assert!((cg - 480.0).abs() / 480.0 < 0.01, "cg seed {cg}");
        assert!((theta - 12.0).abs() / 12.0 < 0.05, "theta seed {theta}");
    }

    #[test]
    fn rejects_decaying_series() {
        // Concentration falling away from its starting value never admits a
        // positive theta under the rising-exponential model.
        let time = linspace(0.0, 30.0, 10);
        let conc: Vec<f64> = time.iter().map(|t| 480.0 - 2.0 * t).collect();

        let err = initial_estimate(&time, &conc, conc[0]).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn closed_form_theta_matches_generator() {
        let time = linspace(0.0, 40.0, 20);
        let conc = concentration_series(&time, 400.0, 450.0, 9.0).unwrap();

        // At the exact C_G the log-linear regression is exact.
        let theta = theta_from_candidate(&time, &conc, 450.0 + 1e-9).unwrap();
        assert!((theta - 9.0).abs() < 1e-3);
    }

    #[test]
    fn zero_time_variance_is_rejected() {
        let time = vec![5.0, 5.0, 5.0];
        let conc = vec![400.0, 401.0, 402.0];
        assert!(theta_from_candidate(&time, &conc, 450.0).is_none());
    }
}
