//! Unit conversions used in reports.
//!
//! Concentrations are carried as ppm internally; these helpers convert to
//! mass-based units via the ideal gas law when a report needs them.

use crate::error::AppError;

/// Ideal gas constant, J/(mol K).
pub const R_IDEAL_GAS: f64 = 8.314462618;

/// Standard atmospheric pressure, Pa.
pub const STANDARD_PRESSURE_PA: f64 = 101_325.0;

pub fn ppm_to_mol_fraction(ppm: f64) -> Result<f64, AppError> {
    if ppm < 0.0 {
        return Err(AppError::new(4, "ppm cannot be negative."));
    }
    Ok(ppm / 1e6)
}

pub fn mol_fraction_to_ppm(mol_fraction: f64) -> Result<f64, AppError> {
    if mol_fraction < 0.0 {
        return Err(AppError::new(4, "Mol fraction cannot be negative."));
    }
    Ok(mol_fraction * 1e6)
}

/// Mol fraction to mg/m^3 at the given molar mass (g/mol), temperature,
/// and pressure, via the ideal gas law.
pub fn mol_fraction_to_mg_m3(
    mol_fraction: f64,
    molar_mass_g_mol: f64,
    temperature_k: f64,
    pressure_pa: f64,
) -> Result<f64, AppError> {
    validate_state(molar_mass_g_mol, temperature_k, pressure_pa)?;
    if mol_fraction < 0.0 {
        return Err(AppError::new(4, "Mol fraction cannot be negative."));
    }
    let mol_concentration = mol_fraction * pressure_pa / (R_IDEAL_GAS * temperature_k);
    Ok(mol_concentration * molar_mass_g_mol * 1e3)
}

/// mg/m^3 to mol fraction at the given molar mass (g/mol), temperature,
/// and pressure.
pub fn mg_m3_to_mol_fraction(
    mg_m3: f64,
    molar_mass_g_mol: f64,
    temperature_k: f64,
    pressure_pa: f64,
) -> Result<f64, AppError> {
    validate_state(molar_mass_g_mol, temperature_k, pressure_pa)?;
    if mg_m3 < 0.0 {
        return Err(AppError::new(4, "Mass concentration cannot be negative."));
    }
    let mol_concentration = (mg_m3 / 1e3) / molar_mass_g_mol;
    Ok(mol_concentration * R_IDEAL_GAS * temperature_k / pressure_pa)
}

/// ppm to mg/m^3 at the given molar mass (g/mol), temperature, and pressure.
pub fn ppm_to_mg_m3(
    ppm: f64,
    molar_mass_g_mol: f64,
    temperature_k: f64,
    pressure_pa: f64,
) -> Result<f64, AppError> {
    mol_fraction_to_mg_m3(
        ppm_to_mol_fraction(ppm)?,
        molar_mass_g_mol,
        temperature_k,
        pressure_pa,
    )
}

/// mg/m^3 to ppm at the given molar mass (g/mol), temperature, and pressure.
pub fn mg_m3_to_ppm(
    mg_m3: f64,
    molar_mass_g_mol: f64,
    temperature_k: f64,
    pressure_pa: f64,
) -> Result<f64, AppError> {
    mol_fraction_to_ppm(mg_m3_to_mol_fraction(
        mg_m3,
        molar_mass_g_mol,
        temperature_k,
        pressure_pa,
    )?)
}

/// Flux mg/(m^2 h) to mmol/(m^2 h).
pub fn mg_m2_h_to_mmol_m2_h(value_mg_m2_h: f64, molar_mass_g_mol: f64) -> Result<f64, AppError> {
    if value_mg_m2_h < 0.0 {
        return Err(AppError::new(4, "Flux cannot be negative."));
    }
    if molar_mass_g_mol <= 0.0 {
        return Err(AppError::new(4, "Molar mass must be positive."));
    }
    let mol_per_h = (value_mg_m2_h / 1e3) / molar_mass_g_mol;
    Ok(mol_per_h * 1e3)
}

/// Flux mmol/(m^2 h) to mg/(m^2 h).
pub fn mmol_m2_h_to_mg_m2_h(value_mmol_m2_h: f64, molar_mass_g_mol: f64) -> Result<f64, AppError> {
    if value_mmol_m2_h < 0.0 {
        return Err(AppError::new(4, "Flux cannot be negative."));
    }
    if molar_mass_g_mol <= 0.0 {
        return Err(AppError::new(4, "Molar mass must be positive."));
    }
    let grams_per_h = (value_mmol_m2_h / 1e3) * molar_mass_g_mol;
    Ok(grams_per_h * 1e3)
}

fn validate_state(
    molar_mass_g_mol: f64,
    temperature_k: f64,
    pressure_pa: f64,
) -> Result<(), AppError> {
    if molar_mass_g_mol <= 0.0 {
        return Err(AppError::new(4, "Molar mass must be positive."));
    }
    if temperature_k <= 0.0 {
        return Err(AppError::new(4, "Temperature must be positive."));
    }
    if pressure_pa <= 0.0 {
        return Err(AppError::new(4, "Pressure must be positive."));
    }
    Ok(())
}
