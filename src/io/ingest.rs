//! Concentration CSV ingest.
//!
//! Turns an instrument export into a pair of numeric vectors that are safe
//! to hand to the fit engine.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level tolerance** for blank cells (loggers pad incomplete scans)
//! - **Separation of concerns**: no fitting logic here

use std::fs::File;
use std::path::Path;

use crate::error::AppError;

/// Required time column header.
pub const TIME_COLUMN: &str = "time_s";
/// Required concentration column header.
pub const CONCENTRATION_COLUMN: &str = "C_ppm";

/// An ingested concentration series.
#[derive(Debug, Clone)]
pub struct ConcentrationSeries {
    pub time_s: Vec<f64>,
    pub concentration_ppm: Vec<f64>,
}

/// Load a `time_s,C_ppm` CSV.
///
/// Rows with a blank cell in either column are skipped; rows that are
/// present but unparsable are errors.
pub fn read_concentration_csv(path: &Path) -> Result<ConcentrationSeries, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let time_idx = column_index(&headers, TIME_COLUMN, path)?;
    let conc_idx = column_index(&headers, CONCENTRATION_COLUMN, path)?;

    let mut time_s = Vec::new();
    let mut concentration_ppm = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        // 1-based data line numbers, after the header row.
        let line = idx + 2;
        let record =
            result.map_err(|e| AppError::new(2, format!("Failed to read CSV line {line}: {e}")))?;

        let time_cell = record.get(time_idx).unwrap_or("");
        let conc_cell = record.get(conc_idx).unwrap_or("");
        if time_cell.is_empty() || conc_cell.is_empty() {
            continue;
        }

        let t: f64 = time_cell.parse().map_err(|_| {
            AppError::new(2, format!("Invalid {TIME_COLUMN} value on line {line}: '{time_cell}'"))
        })?;
        let c: f64 = conc_cell.parse().map_err(|_| {
            AppError::new(
                2,
                format!("Invalid {CONCENTRATION_COLUMN} value on line {line}: '{conc_cell}'"),
            )
        })?;

        time_s.push(t);
        concentration_ppm.push(c);
    }

    if time_s.is_empty() {
        return Err(AppError::new(
            2,
            format!("Concentration CSV '{}' contains no data rows.", path.display()),
        ));
    }

    Ok(ConcentrationSeries {
        time_s,
        concentration_ppm,
    })
}

fn column_index(
    headers: &csv::StringRecord,
    name: &str,
    path: &Path,
) -> Result<usize, AppError> {
    headers.iter().position(|h| h == name).ok_or_else(|| {
        AppError::new(
            2,
            format!("CSV '{}' is missing required column '{name}'.", path.display()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn write_temp_csv(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("ofc-model-ingest-{name}.csv"));
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn reads_a_well_formed_csv() {
        let path = write_temp_csv("ok", "time_s,C_ppm\n0,420.0\n1,421.5\n2,423.1\n");
        let series = read_concentration_csv(&path).unwrap();
        assert_eq!(series.time_s, vec![0.0, 1.0, 2.0]);
        assert_eq!(series.concentration_ppm, vec![420.0, 421.5, 423.1]);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn skips_rows_with_blank_cells() {
        let path = write_temp_csv("blanks", "time_s,C_ppm\n0,420.0\n1,\n,422.0\n3,424.0\n");
        let series = read_concentration_csv(&path).unwrap();
        assert_eq!(series.time_s, vec![0.0, 3.0]);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn missing_column_is_an_error() {
        let path = write_temp_csv("missing", "time_s,ppm\n0,420.0\n");
        let err = read_concentration_csv(&path).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn empty_file_is_an_error() {
        let path = write_temp_csv("empty", "time_s,C_ppm\n");
        let err = read_concentration_csv(&path).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        std::fs::remove_file(path).ok();
    }
}
