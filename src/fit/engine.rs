//! Fit orchestration: validation, estimation, and quality metrics.
//!
//! `fit_exponential` is the single entry point used by the pipeline and by
//! every bootstrap replicate. It is deterministic: identical input yields
//! bit-identical output.

use crate::domain::FitResult;
use crate::error::AppError;
use crate::fit::grid::initial_estimate;
use crate::fit::refine::refine_gauss_newton;
use crate::physics::concentration_series;

/// Fit `C(t) = C_G - (C_G - C_0) e^{-t/theta}` to an observed series.
///
/// `C_0` is fixed to the first observed sample; `C_G` and `theta` are free.
///
/// # Errors
/// Fails on malformed input (length mismatch, fewer than three samples,
/// decreasing time) or when the series cannot seed the grid search.
pub fn fit_exponential(time_s: &[f64], concentration_ppm: &[f64]) -> Result<FitResult, AppError> {
    if time_s.len() != concentration_ppm.len() {
        return Err(AppError::new(
            3,
            "Time and concentration vectors must have the same length.",
        ));
    }
    if time_s.len() < 3 {
        return Err(AppError::new(
            3,
            "At least three observations are required to fit.",
        ));
    }
    if time_s.windows(2).any(|pair| pair[1] < pair[0]) {
        return Err(AppError::new(3, "Time vector must be non-decreasing."));
    }

    let c0 = concentration_ppm[0];
    let (cg_seed, theta_seed) = initial_estimate(time_s, concentration_ppm, c0)?;
    let (cg, theta) = refine_gauss_newton(time_s, concentration_ppm, c0, cg_seed, theta_seed);

    let predictions = concentration_series(time_s, c0, cg, theta)?;
    let residuals: Vec<f64> = predictions
        .iter()
        .zip(concentration_ppm)
        .map(|(p, c)| p - c)
        .collect();

    let rmse = (residuals.iter().map(|r| r * r).sum::<f64>() / residuals.len() as f64).sqrt();
    let r2 = r_squared(&residuals, concentration_ppm);
    let nt = noise_ratio(concentration_ppm, rmse);

    Ok(FitResult {
        c0,
        cg,
        theta,
        rmse,
        r2,
        nt,
        residuals,
    })
}

/// `1 - SS_res / SS_tot`, with `1.0` for a zero-variance series.
fn r_squared(residuals: &[f64], observed: &[f64]) -> f64 {
    let mean = observed.iter().sum::<f64>() / observed.len() as f64;
    let ss_tot: f64 = observed.iter().map(|c| (c - mean) * (c - mean)).sum();
    if ss_tot > 0.0 {
        let ss_res: f64 = residuals.iter().map(|r| r * r).sum();
        1.0 - ss_res / ss_tot
    } else {
        1.0
    }
}

/// Signal-to-noise proxy `sample_std / rmse - 1`; infinite for a perfect fit.
fn noise_ratio(observed: &[f64], rmse: f64) -> f64 {
    let n = observed.len();
    let sample_sd = if n > 1 {
        let mean = observed.iter().sum::<f64>() / n as f64;
        let var: f64 =
            observed.iter().map(|c| (c - mean) * (c - mean)).sum::<f64>() / (n as f64 - 1.0);
        var.sqrt()
    } else {
        0.0
    };

    if rmse == 0.0 {
        f64::INFINITY
    } else {
        sample_sd / rmse - 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand_distr::{Distribution, Normal};

    fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| start + (end - start) * i as f64 / (n as f64 - 1.0))
            .collect()
    }

    #[test]
    fn recovers_clean_parameters() {
        let time = linspace(0.0, 60.0, 25);
        let conc = concentration_series(&time, 420.0, 480.0, 12.0).unwrap();

        let fit = fit_exponential(&time, &conc).unwrap();
        assert!((fit.cg - 480.0).abs() / 480.0 < 1e-3, "cg {}", fit.cg);
        assert!((fit.theta - 12.0).abs() / 12.0 < 1e-3, "theta {}", fit.theta);
        assert!(fit.rmse < 1e-6, "rmse {}", fit.rmse);
        assert!(fit.r2 >= 0.999, "r2 {}", fit.r2);
        assert_eq!(fit.residuals.len(), conc.len());
    }

    #[test]
    fn handles_noisy_data_and_predict() {
        let mut rng = StdRng::seed_from_u64(123);
        let noise = Normal::new(0.0, 0.5).unwrap();

        let time = linspace(0.0, 60.0, 25);
        let clean = concentration_series(&time, 420.0, 480.0, 12.0).unwrap();
        let noisy: Vec<f64> = clean.iter().map(|c| c + noise.sample(&mut rng)).collect();

        let fit = fit_exponential(&time, &noisy).unwrap();
        assert!(fit.rmse < 2.0, "rmse {}", fit.rmse);
        assert!(fit.r2 > 0.8, "r2 {}", fit.r2);

        let preds = fit.predict(&time).unwrap();
        assert_eq!(preds.len(), noisy.len());
    }

    #[test]
    fn rejects_invalid_inputs() {
        // Too few points.
        let err = fit_exponential(&[0.0, 1.0], &[1.0, 2.0]).unwrap_err();
        assert_eq!(err.exit_code(), 3);

        // Decreasing time.
        let err = fit_exponential(&[1.0, 0.0, 2.0], &[1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(err.exit_code(), 3);

        // Length mismatch.
        let err = fit_exponential(&[0.0, 1.0, 2.0], &[1.0, 2.0]).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn refit_is_bit_identical() {
        let time = linspace(0.0, 50.0, 20);
        let conc = concentration_series(&time, 415.0, 470.0, 8.0).unwrap();

        let a = fit_exponential(&time, &conc).unwrap();
        let b = fit_exponential(&time, &conc).unwrap();
        assert_eq!(a.cg.to_bits(), b.cg.to_bits());
        assert_eq!(a.theta.to_bits(), b.theta.to_bits());
        assert_eq!(a.rmse.to_bits(), b.rmse.to_bits());
    }

    #[test]
    fn r_squared_is_one_for_zero_variance_series() {
        let observed = [440.0, 440.0, 440.0];
        let residuals = [0.5, -0.5, 0.0];
        assert_eq!(r_squared(&residuals, &observed), 1.0);
    }

    #[test]
    fn noise_ratio_is_infinite_for_perfect_fit() {
        let observed = [440.0, 445.0, 450.0];
        assert!(noise_ratio(&observed, 0.0).is_infinite());
        assert!(noise_ratio(&observed, 1.0).is_finite());
    }
}
