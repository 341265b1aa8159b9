//! Inflow-rate models.
//!
//! The chamber's characteristic time is `volume / flow`; these helpers
//! turn common instrument readings into a volumetric flow: validated
//! closed forms for duct and orifice measurements, and a measured flow
//! timeseries (CSV) reduced to its mean.

use std::fs::File;
use std::path::Path;

use crate::error::AppError;

/// Required time column header in a flow CSV.
pub const FLOW_TIME_COLUMN: &str = "time_s";
/// Required flow column header in a flow CSV.
pub const FLOW_COLUMN: &str = "flow_m3_s";

/// Duct model `Q = A * v`.
pub fn flow_from_area_velocity(area_m2: f64, velocity_m_s: f64) -> Result<f64, AppError> {
    if !(area_m2.is_finite() && area_m2 > 0.0) {
        return Err(AppError::new(4, "Duct area must be positive."));
    }
    Ok(area_m2 * velocity_m_s)
}

/// Orifice model `Q = Cd * A * sqrt(2 dP / rho)`.
pub fn flow_from_orifice(
    discharge_coeff: f64,
    area_m2: f64,
    delta_p_pa: f64,
    fluid_density_kg_m3: f64,
) -> Result<f64, AppError> {
    if !(discharge_coeff > 0.0 && discharge_coeff <= 1.0) {
        return Err(AppError::new(4, "Discharge coefficient must be in (0, 1]."));
    }
    if !(area_m2.is_finite() && area_m2 > 0.0) {
        return Err(AppError::new(4, "Orifice area must be positive."));
    }
    if delta_p_pa < 0.0 || !(fluid_density_kg_m3.is_finite() && fluid_density_kg_m3 > 0.0) {
        return Err(AppError::new(
            4,
            "Pressure drop must be non-negative and density positive.",
        ));
    }
    Ok(discharge_coeff * area_m2 * (2.0 * delta_p_pa / fluid_density_kg_m3).sqrt())
}

/// A measured inflow-rate series.
#[derive(Debug, Clone)]
pub struct FlowTimeseries {
    pub time_s: Vec<f64>,
    pub flow_m3_s: Vec<f64>,
}

impl FlowTimeseries {
    /// Arithmetic mean of the measured flows.
    ///
    /// Loaded series are never empty; `load_flow_timeseries` rejects
    /// files without data rows.
    pub fn mean_flow(&self) -> f64 {
        self.flow_m3_s.iter().sum::<f64>() / self.flow_m3_s.len() as f64
    }
}

/// Load a `time_s,flow_m3_s` CSV.
///
/// Rows with a blank cell in either column are skipped; rows that are
/// present but unparsable are errors. The time axis must be
/// non-decreasing and every flow strictly positive.
pub fn load_flow_timeseries(path: &Path) -> Result<FlowTimeseries, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open flow CSV '{}': {e}", path.display()))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read flow CSV headers: {e}")))?
        .clone();

    let time_idx = flow_column_index(&headers, FLOW_TIME_COLUMN, path)?;
    let flow_idx = flow_column_index(&headers, FLOW_COLUMN, path)?;

    let mut time_s = Vec::new();
    let mut flow_m3_s = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        let record = result
            .map_err(|e| AppError::new(2, format!("Failed to read flow CSV line {line}: {e}")))?;

        let time_cell = record.get(time_idx).unwrap_or("");
        let flow_cell = record.get(flow_idx).unwrap_or("");
        if time_cell.is_empty() || flow_cell.is_empty() {
            continue;
        }

        let t: f64 = time_cell.parse().map_err(|_| {
            AppError::new(
                2,
                format!("Invalid {FLOW_TIME_COLUMN} value on line {line}: '{time_cell}'"),
            )
        })?;
        let q: f64 = flow_cell.parse().map_err(|_| {
            AppError::new(
                2,
                format!("Invalid {FLOW_COLUMN} value on line {line}: '{flow_cell}'"),
            )
        })?;
        if !(q.is_finite() && q > 0.0) {
            return Err(AppError::new(
                2,
                format!("Flow on line {line} must be positive, got {q}."),
            ));
        }

        time_s.push(t);
        flow_m3_s.push(q);
    }

    if time_s.is_empty() {
        return Err(AppError::new(
            2,
            format!("Flow CSV '{}' contains no data rows.", path.display()),
        ));
    }
    if time_s.windows(2).any(|pair| pair[1] < pair[0]) {
        return Err(AppError::new(
            2,
            format!("Flow CSV '{}' time axis must be non-decreasing.", path.display()),
        ));
    }

    Ok(FlowTimeseries { time_s, flow_m3_s })
}

/// Linearly resample a flow series onto a new time grid.
///
/// Times outside the measured range clamp to the first/last flow value.
pub fn resample_flow(series: &FlowTimeseries, time_s: &[f64]) -> Result<Vec<f64>, AppError> {
    if series.time_s.is_empty() {
        return Err(AppError::new(2, "Cannot resample an empty flow series."));
    }

    let out = time_s
        .iter()
        .map(|&t| {
            let n = series.time_s.len();
            if t <= series.time_s[0] {
                return series.flow_m3_s[0];
            }
            if t >= series.time_s[n - 1] {
                return series.flow_m3_s[n - 1];
            }
            // First index with time >= t; both neighbors exist here.
            let hi = series.time_s.partition_point(|&ts| ts < t);
            let lo = hi - 1;
            let (t0, t1) = (series.time_s[lo], series.time_s[hi]);
            let (q0, q1) = (series.flow_m3_s[lo], series.flow_m3_s[hi]);
            if t1 == t0 {
                q0
            } else {
                q0 + (q1 - q0) * (t - t0) / (t1 - t0)
            }
        })
        .collect();

    Ok(out)
}

fn flow_column_index(
    headers: &csv::StringRecord,
    name: &str,
    path: &Path,
) -> Result<usize, AppError> {
    headers.iter().position(|h| h == name).ok_or_else(|| {
        AppError::new(
            2,
            format!("Flow CSV '{}' is missing required column '{name}'.", path.display()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn write_temp_csv(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("ofc-model-flow-{name}.csv"));
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn area_velocity_flow_is_their_product() {
        let q = flow_from_area_velocity(0.01, 0.22).unwrap();
        assert!((q - 0.0022).abs() < 1e-15);
        assert!(flow_from_area_velocity(0.0, 1.0).is_err());
    }

    #[test]
    fn orifice_flow_matches_manual_expression() {
        let q = flow_from_orifice(0.62, 0.0005, 10.0, 1.2).unwrap();
        let manual = 0.62 * 0.0005 * (2.0_f64 * 10.0 / 1.2).sqrt();
        assert!((q - manual).abs() < 1e-15);
    }

    #[test]
    fn orifice_rejects_out_of_range_inputs() {
        assert!(flow_from_orifice(0.0, 0.0005, 10.0, 1.2).is_err());
        assert!(flow_from_orifice(1.5, 0.0005, 10.0, 1.2).is_err());
        assert!(flow_from_orifice(0.62, -1.0, 10.0, 1.2).is_err());
        assert!(flow_from_orifice(0.62, 0.0005, -1.0, 1.2).is_err());
        assert!(flow_from_orifice(0.62, 0.0005, 10.0, 0.0).is_err());
    }

    #[test]
    fn flow_csv_loads_and_averages() {
        let path = write_temp_csv(
            "mean",
            "time_s,flow_m3_s\n0,0.002\n10,0.003\n20,\n30,0.004\n",
        );
        let series = load_flow_timeseries(&path).unwrap();
        assert_eq!(series.time_s, vec![0.0, 10.0, 30.0]);
        assert!((series.mean_flow() - 0.003).abs() < 1e-15);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn flow_csv_rejects_bad_files() {
        let path = write_temp_csv("missing", "time_s,q\n0,0.002\n");
        assert_eq!(load_flow_timeseries(&path).unwrap_err().exit_code(), 2);
        std::fs::remove_file(path).ok();

        let path = write_temp_csv("nonpositive", "time_s,flow_m3_s\n0,0.002\n10,-0.001\n");
        assert_eq!(load_flow_timeseries(&path).unwrap_err().exit_code(), 2);
        std::fs::remove_file(path).ok();

        let path = write_temp_csv("unsorted", "time_s,flow_m3_s\n10,0.002\n0,0.003\n");
        assert_eq!(load_flow_timeseries(&path).unwrap_err().exit_code(), 2);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn resample_interpolates_and_clamps() {
        let series = FlowTimeseries {
            time_s: vec![0.0, 10.0, 20.0],
            flow_m3_s: vec![0.002, 0.004, 0.003],
        };
        let out = resample_flow(&series, &[-5.0, 0.0, 5.0, 15.0, 25.0]).unwrap();
        assert!((out[0] - 0.002).abs() < 1e-15);
        assert!((out[1] - 0.002).abs() < 1e-15);
        assert!((out[2] - 0.003).abs() < 1e-15);
        assert!((out[3] - 0.0035).abs() < 1e-15);
        assert!((out[4] - 0.003).abs() < 1e-15);
    }
}
