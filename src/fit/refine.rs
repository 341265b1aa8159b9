//! Two-parameter Gauss-Newton refinement.
//!
//! The grid seed lands close to the optimum; a handful of Gauss-Newton
//! steps on the full nonlinear model polishes it. With exactly two free
//! parameters the normal equations are a 2x2 system, solved directly via
//! the determinant formula.
//!
//! This pass never fails: a near-singular Jacobian or an exhausted
//! iteration budget simply returns the last stable estimate.

use nalgebra::DVector;

use crate::fit::CG_EPS;

/// Iteration budget; the seed is good enough that more rarely helps.
const MAX_ITERS: usize = 8;
/// Below this determinant magnitude the system is treated as converged.
const DET_FLOOR: f64 = 1e-12;
/// Step-size convergence threshold for both parameters.
const STEP_TOL: f64 = 1e-6;
/// Hard floor for theta; the model is undefined at zero.
const THETA_FLOOR: f64 = 1e-6;

/// Polish `(cg, theta)` against the observed series with `c0` held fixed.
pub fn refine_gauss_newton(
    time_s: &[f64],
    concentration_ppm: &[f64],
    c0: f64,
    cg_init: f64,
    theta_init: f64,
) -> (f64, f64) {
    let t = DVector::from_column_slice(time_s);
    let y = DVector::from_column_slice(concentration_ppm);

    let mut cg = cg_init;
    let mut theta = theta_init.max(THETA_FLOOR);

    for _ in 0..MAX_ITERS {
        let exp_term = t.map(|ti| (-ti / theta).exp());
        let preds = exp_term.map(|e| cg - (cg - c0) * e);
        let residual = &preds - &y;

        // Partials of C(t) = cg - (cg - c0) e^{-t/theta}.
        let df_dcg = exp_term.map(|e| 1.0 - e);
        let df_dtheta = exp_term.zip_map(&t, |e, ti| -(cg - c0) * e * ti / (theta * theta));

        let j11 = df_dcg.dot(&df_dcg);
        let j22 = df_dtheta.dot(&df_dtheta);
        let j12 = df_dcg.dot(&df_dtheta);
        let det = j11 * j22 - j12 * j12;
        if det.abs() < DET_FLOOR {
            break;
        }

        let rhs0 = -df_dcg.dot(&residual);
        let rhs1 = -df_dtheta.dot(&residual);
        let delta_cg = (rhs0 * j22 - j12 * rhs1) / det;
        let delta_theta = (j11 * rhs1 - j12 * rhs0) / det;

        cg = (c0 + CG_EPS).max(cg + delta_cg);
        theta = THETA_FLOOR.max(theta + delta_theta);
        if delta_cg.abs() < STEP_TOL && delta_theta.abs() < STEP_TOL {
            break;
        }
    }

    (cg, theta)
}
