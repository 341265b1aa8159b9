//! Formatted terminal output for fit and simulation runs.
//!
//! We keep formatting code in one place so:
//! - the physics/fitting code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::app::pipeline::FitRunOutput;
use crate::data::SimulationResult;

/// Format the full fit summary (dataset stats + parameters + metrics + flux).
pub fn format_fit_summary(run: &FitRunOutput) -> String {
    let mut out = String::new();

    out.push_str("=== ofc - Open-Flow Chamber Fit ===\n");
    out.push_str(&format!(
        "Chamber: V={:.4} m^3 | A={:.4} m^2\n",
        run.geometry.volume_m3(),
        run.geometry.area_m2()
    ));
    out.push_str(&format!(
        "Sample: n={} | t=[{:.1}, {:.1}]s | C=[{:.2}, {:.2}]ppm\n",
        run.stats.n_points, run.stats.time_min, run.stats.time_max, run.stats.c_min, run.stats.c_max
    ));

    out.push_str("\nFitted parameters:\n");
    out.push_str(&format!("- c0    : {:.4} ppm (fixed)\n", run.fit.c0));
    out.push_str(&format!("- cg    : {:.4} ppm\n", run.fit.cg));
    out.push_str(&format!("- theta : {:.4} s\n", run.fit.theta));

    out.push_str("\nFit quality:\n");
    out.push_str(&format!("- RMSE  : {:.4} ppm\n", run.fit.rmse));
    out.push_str(&format!("- R^2   : {:.4}\n", run.fit.r2));
    out.push_str(&format!("- NT    : {:.4}\n", run.fit.nt));

    out.push_str("\nFlux:\n");
    out.push_str(&format!("- ambient: {:.4} ppm\n", run.ambient_ppm));
    out.push_str(&format!("- F      : {:.6} ppm m/s\n", run.flux));

    if let Some(ci) = &run.bootstrap {
        out.push_str("\nBootstrap 95% CIs:\n");
        out.push_str(&format!("- cg    : [{:.4}, {:.4}] ppm\n", ci.cg.0, ci.cg.1));
        out.push_str(&format!("- theta : [{:.4}, {:.4}] s\n", ci.theta.0, ci.theta.1));
        out.push_str(&format!("- F     : [{:.6}, {:.6}] ppm m/s\n", ci.flux.0, ci.flux.1));
    }

    out
}

/// Format a simulation summary.
pub fn format_simulation_summary(result: &SimulationResult) -> String {
    let mut out = String::new();

    out.push_str("=== ofc - Simulated Chamber Response ===\n");
    out.push_str(&format!(
        "Chamber: V={:.4} m^3 | A={:.4} m^2 | Q={:.6} m^3/s\n",
        result.geometry.volume_m3(),
        result.geometry.area_m2(),
        result.flow_m3_s
    ));
    out.push_str(&format!(
        "Response: ambient={:.2} ppm -> target={:.2} ppm | theta={:.3} s\n",
        result.ambient_ppm, result.target_cg_ppm, result.theta_s
    ));
    match result.noise_ppm_std {
        Some(std) => out.push_str(&format!("Noise: sigma={std:.3} ppm\n")),
        None => out.push_str("Noise: none\n"),
    }
    out.push_str(&format!(
        "Samples: n={} | t=[{:.1}, {:.1}]s | C(end)={:.2} ppm\n",
        result.time_s.len(),
        result.time_s.first().copied().unwrap_or(0.0),
        result.time_s.last().copied().unwrap_or(0.0),
        result.concentration_ppm.last().copied().unwrap_or(f64::NAN)
    ));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FitRunConfig, WindowConfig};
    use crate::physics::concentration_series;

    fn sample_run() -> FitRunOutput {
        let time: Vec<f64> = (0..25).map(|i| i as f64 * 2.5).collect();
        let conc = concentration_series(&time, 420.0, 480.0, 12.0).unwrap();
        let config = FitRunConfig {
            csv_path: std::path::PathBuf::new(),
            volume_m3: 0.011,
            area_m2: 0.071,
            ambient_ppm: None,
            window: WindowConfig::default(),
            use_bootstrap: false,
            bootstrap: Default::default(),
            export_summary: None,
        };
        crate::app::pipeline::run_fit_workflow(&config, &time, &conc).unwrap()
    }

    #[test]
    fn fit_summary_names_the_parameters() {
        let text = format_fit_summary(&sample_run());
        assert!(text.contains("cg"));
        assert!(text.contains("theta"));
        assert!(text.contains("RMSE"));
        assert!(text.contains("Flux"));
        assert!(!text.contains("Bootstrap"));
    }

    #[test]
    fn fit_summary_includes_intervals_when_present() {
        let mut run = sample_run();
        run.bootstrap = Some(crate::domain::BootstrapIntervals {
            cg: (470.0, 490.0),
            theta: (11.0, 13.0),
            flux: (1.8, 2.2),
        });
        let text = format_fit_summary(&run);
        assert!(text.contains("Bootstrap 95% CIs"));
        assert!(text.contains("[470.0000, 490.0000]"));
    }

    #[test]
    fn simulation_summary_reports_the_derived_theta() {
        let config = crate::domain::SimulateRunConfig {
            volume_m3: 0.011,
            area_m2: 0.071,
            ambient_ppm: 420.0,
            target_cg_ppm: 480.0,
            flow_m3_s: 0.0022,
            duration_s: 60.0,
            noise_ppm_std: None,
            noise_seed: 42,
            output_csv: None,
        };
        let result = crate::data::run_simulation(&config).unwrap();
        let text = format_simulation_summary(&result);
        assert!(text.contains("theta=5.000 s"));
        assert!(text.contains("Noise: none"));
    }
}
