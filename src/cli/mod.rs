//! Command-line parsing for the open-flow chamber fitter.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the physics/fitting code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "ofc", version, about = "Open-Flow Chamber gas-exchange fitter")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit the exponential chamber model to a measured concentration CSV.
    Fit(FitArgs),
    /// Generate a synthetic chamber response series.
    Simulate(SimulateArgs),
}

/// Options for fitting a measured series.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Concentration CSV with `time_s` and `C_ppm` columns.
    pub csv: PathBuf,

    /// Chamber volume in cubic meters.
    #[arg(long, default_value_t = 0.011)]
    pub volume: f64,

    /// Chamber footprint area in square meters.
    #[arg(long, default_value_t = 0.071)]
    pub area: f64,

    /// Ambient concentration (ppm). Defaults to the first fitted sample.
    #[arg(long)]
    pub ambient: Option<f64>,

    /// Guaranteed minimum fit-window width (seconds from the last sample).
    #[arg(long = "min-window")]
    pub min_window: Option<f64>,

    /// Cap on the fit-window width (seconds from the last sample).
    #[arg(long = "max-window")]
    pub max_window: Option<f64>,

    /// Compute bootstrap confidence intervals for cg, theta, and flux.
    #[arg(long)]
    pub bootstrap: bool,

    /// Number of bootstrap replicates.
    #[arg(long = "n-bootstrap", default_value_t = 200)]
    pub n_bootstrap: usize,

    /// Seed for the bootstrap random generator.
    #[arg(long = "bootstrap-seed", default_value_t = 1234)]
    pub bootstrap_seed: u64,

    /// Export the fit summary to JSON.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Options for generating a synthetic series.
#[derive(Debug, Parser, Clone)]
pub struct SimulateArgs {
    /// Chamber volume in cubic meters.
    #[arg(long, default_value_t = 0.011)]
    pub volume: f64,

    /// Chamber footprint area in square meters.
    #[arg(long, default_value_t = 0.071)]
    pub area: f64,

    /// Ambient (initial) concentration in ppm.
    #[arg(long, default_value_t = 420.0)]
    pub ambient: f64,

    /// Equilibrium concentration the chamber relaxes toward, in ppm.
    /// Defaults to ambient + 60.
    #[arg(long = "target-cg")]
    pub target_cg: Option<f64>,

    /// Inflow rate in cubic meters per second.
    #[arg(long)]
    pub flow: Option<f64>,

    /// Measured inflow CSV with `time_s` and `flow_m3_s` columns; the
    /// mean flow is used.
    #[arg(long = "flow-csv")]
    pub flow_csv: Option<PathBuf>,

    /// Duct cross-section area (m^2) for velocity-based flow.
    #[arg(long = "duct-area")]
    pub duct_area: Option<f64>,

    /// Air velocity in the duct (m/s) for velocity-based flow.
    #[arg(long = "duct-velocity")]
    pub duct_velocity: Option<f64>,

    /// Orifice area (m^2) for pressure-drop-based flow.
    #[arg(long = "orifice-area")]
    pub orifice_area: Option<f64>,

    /// Pressure drop across the orifice (Pa).
    #[arg(long = "orifice-dp")]
    pub orifice_dp: Option<f64>,

    /// Orifice discharge coefficient.
    #[arg(long = "orifice-cd", default_value_t = 0.62)]
    pub orifice_cd: f64,

    /// Air density (kg/m^3) for the orifice equation.
    #[arg(long = "air-density", default_value_t = 1.2)]
    pub air_density: f64,

    /// Simulated duration in seconds.
    #[arg(long, default_value_t = 180.0)]
    pub duration: f64,

    /// Gaussian sensor-noise standard deviation (ppm). Omit for a clean series.
    #[arg(long = "noise-std")]
    pub noise_std: Option<f64>,

    /// Seed for the noise random generator.
    #[arg(long = "noise-seed", default_value_t = 42)]
    pub noise_seed: u64,

    /// Write the series to CSV instead of only printing a summary.
    #[arg(long)]
    pub output: Option<PathBuf>,
}
