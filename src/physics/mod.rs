//! Core open-flow chamber (OFC) equations.
//!
//! Two relations drive everything downstream:
//!
//! - the exponential gas response inside the chamber:
//!   `C(t) = C_G - (C_G - C_0) e^{-t/theta}`
//! - the surface flux derived from a fitted response:
//!   `F = (V_C / theta) (C_G - C_A) / A_C`
//!
//! The fitter, the simulator, and the bootstrap all consume these
//! functions; they are pure and stateless.

use crate::domain::ChamberGeometry;
use crate::error::AppError;

/// Characteristic time `theta = V_c / Q_g` (seconds).
pub fn characteristic_time(volume_m3: f64, flow_m3_s: f64) -> Result<f64, AppError> {
    if !(volume_m3.is_finite() && volume_m3 > 0.0) {
        return Err(AppError::new(4, "Chamber volume must be positive."));
    }
    if !(flow_m3_s.is_finite() && flow_m3_s > 0.0) {
        return Err(AppError::new(4, "Inflow rate must be positive."));
    }
    Ok(volume_m3 / flow_m3_s)
}

/// Evaluate the analytic response `C(t)` at a single time.
pub fn concentration_at(time_s: f64, c0: f64, cg: f64, theta_s: f64) -> Result<f64, AppError> {
    if !(theta_s.is_finite() && theta_s > 0.0) {
        return Err(AppError::new(4, "Characteristic time theta must be positive."));
    }
    Ok(cg - (cg - c0) * (-time_s / theta_s).exp())
}

/// Evaluate the analytic response element-wise over a time vector.
pub fn concentration_series(
    time_s: &[f64],
    c0: f64,
    cg: f64,
    theta_s: f64,
) -> Result<Vec<f64>, AppError> {
    if !(theta_s.is_finite() && theta_s > 0.0) {
        return Err(AppError::new(4, "Characteristic time theta must be positive."));
    }
    Ok(time_s
        .iter()
        .map(|&t| cg - (cg - c0) * (-t / theta_s).exp())
        .collect())
}

/// Surface flux `F = (V_c / theta) (C_G - C_A) / A_c` from a fitted response.
///
/// Units follow the inputs: with ppm concentrations and SI geometry this is
/// a ppm-volume flux per second per square metre; the caller converts.
pub fn flux_from_fit(
    geometry: &ChamberGeometry,
    theta_s: f64,
    cg: f64,
    ca: f64,
) -> Result<f64, AppError> {
    if !(theta_s.is_finite() && theta_s > 0.0) {
        return Err(AppError::new(4, "Characteristic time theta must be positive."));
    }
    Ok((geometry.volume_m3() / theta_s) * (cg - ca) / geometry.area_m2())
}

/// Convenience that chains `characteristic_time` and `concentration_series`.
///
/// Useful for scripts that need the full response from physical parameters:
/// volume, inflow rate, and equilibrium concentration.
pub fn simulate_chamber_response(
    time_s: &[f64],
    c0: f64,
    geometry: &ChamberGeometry,
    flow_m3_s: f64,
    equilibrium_ppm: f64,
) -> Result<Vec<f64>, AppError> {
    let theta = characteristic_time(geometry.volume_m3(), flow_m3_s)?;
    concentration_series(time_s, c0, equilibrium_ppm, theta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_rejects_non_positive_dimensions() {
        assert!(ChamberGeometry::new(0.0, 1.0).is_err());
        assert!(ChamberGeometry::new(1.0, -1.0).is_err());
        assert!(ChamberGeometry::new(0.011, 0.071).is_ok());
    }

    #[test]
    fn characteristic_time_validates_inputs() {
        let theta = characteristic_time(0.01, 0.001).unwrap();
        assert!((theta - 10.0).abs() < 1e-12);
        assert!(characteristic_time(-1.0, 1.0).is_err());
        assert!(characteristic_time(1.0, 0.0).is_err());
    }

    #[test]
    fn transient_starts_at_c0_and_approaches_cg() {
        let c = concentration_series(&[0.0, 10.0], 400.0, 460.0, 5.0).unwrap();
        assert!((c[0] - 400.0).abs() < 1e-12);
        assert!(c[1] > 450.0);
    }

    #[test]
    fn scalar_and_series_evaluations_agree() {
        let series = concentration_series(&[0.0, 3.0, 7.5], 410.0, 475.0, 9.0).unwrap();
        for (&t, &c) in [0.0, 3.0, 7.5].iter().zip(series.iter()) {
            let one = concentration_at(t, 410.0, 475.0, 9.0).unwrap();
            assert!((one - c).abs() < 1e-15);
        }
    }

    #[test]
    fn transient_rejects_non_positive_theta() {
        assert!(concentration_at(1.0, 400.0, 450.0, 0.0).is_err());
        assert!(concentration_series(&[1.0], 400.0, 450.0, -2.0).is_err());
    }

    #[test]
    fn flux_matches_manual_expression() {
        let geom = ChamberGeometry::new(0.011, 0.071).unwrap();
        let flux = flux_from_fit(&geom, 2.0, 480.0, 420.0).unwrap();
        let manual = (0.011 / 2.0) * (480.0 - 420.0) / 0.071;
        assert!((flux - manual).abs() < 1e-15);
        assert!(flux_from_fit(&geom, 0.0, 480.0, 420.0).is_err());
    }

    #[test]
    fn simulation_matches_direct_solution() {
        let geom = ChamberGeometry::new(0.011, 0.071).unwrap();
        let time = [0.0, 5.0, 10.0];
        let response = simulate_chamber_response(&time, 420.0, &geom, 0.0022, 480.0).unwrap();
        let theta = characteristic_time(0.011, 0.0022).unwrap();
        let expected = concentration_series(&time, 420.0, 480.0, theta).unwrap();
        for (a, b) in response.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }
}
