//! Synthetic chamber-response generation.
//!
//! Produces the clean analytic response for a configured chamber and
//! inflow, optionally degraded with seeded Gaussian sensor noise. Useful
//! for exercising the fit pipeline end to end without instrument data.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::domain::{ChamberGeometry, SimulateRunConfig};
use crate::error::AppError;
use crate::physics::{characteristic_time, simulate_chamber_response};

/// A simulated series plus the parameters that produced it.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub time_s: Vec<f64>,
    pub concentration_ppm: Vec<f64>,
    pub geometry: ChamberGeometry,
    pub flow_m3_s: f64,
    pub ambient_ppm: f64,
    pub target_cg_ppm: f64,
    pub theta_s: f64,
    pub noise_ppm_std: Option<f64>,
}

/// Generate a chamber response series from a simulation config.
///
/// The chamber starts at ambient concentration and relaxes toward the
/// target equilibrium with `theta = volume / flow`. One sample per second
/// plus the endpoint, at least two samples total.
pub fn run_simulation(config: &SimulateRunConfig) -> Result<SimulationResult, AppError> {
    if !(config.duration_s.is_finite() && config.duration_s > 0.0) {
        return Err(AppError::new(2, "Simulation duration must be positive."));
    }
    if let Some(std) = config.noise_ppm_std {
        if !(std.is_finite() && std > 0.0) {
            return Err(AppError::new(2, "Noise standard deviation must be positive."));
        }
    }

    let geometry = ChamberGeometry::new(config.volume_m3, config.area_m2)?;
    let theta = characteristic_time(geometry.volume_m3(), config.flow_m3_s)?;

    let num_samples = (config.duration_s as usize + 1).max(2);
    let time_s: Vec<f64> = (0..num_samples)
        .map(|i| config.duration_s * i as f64 / (num_samples as f64 - 1.0))
        .collect();

    let mut concentration_ppm = simulate_chamber_response(
        &time_s,
        config.ambient_ppm,
        &geometry,
        config.flow_m3_s,
        config.target_cg_ppm,
    )?;

    if let Some(std) = config.noise_ppm_std {
        let mut rng = StdRng::seed_from_u64(config.noise_seed);
        let noise = Normal::new(0.0, std)
            .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;
        for c in concentration_ppm.iter_mut() {
            *c += noise.sample(&mut rng);
        }
    }

    Ok(SimulationResult {
        time_s,
        concentration_ppm,
        geometry,
        flow_m3_s: config.flow_m3_s,
        ambient_ppm: config.ambient_ppm,
        target_cg_ppm: config.target_cg_ppm,
        theta_s: theta,
        noise_ppm_std: config.noise_ppm_std,
    })
}
