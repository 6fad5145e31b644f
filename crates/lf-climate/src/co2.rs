//! Historical CO₂ rescaling of forcing concentrations.
//!
//! Forcing tables carry a contemporary CO₂ field (referenced to 390 µmol/mol).
//! Runs that replay earlier years scale it by a piecewise-linear reconstruction
//! of the atmospheric record.

/// Reference concentration the forcing CO₂ field is expressed against [µmol/mol].
pub const FORCING_REFERENCE_CO2: f64 = 390.0;

/// Pre-industrial concentration [µmol/mol].
pub const PRE_INDUSTRIAL_CO2: f64 = 280.0;

/// How the forcing CO₂ is adjusted before it reaches the solver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Co2Scaling {
    /// Use forcing CO₂ unchanged.
    #[default]
    Contemporary,
    /// Rescale to the simulation year's reconstructed concentration.
    Historical,
    /// Fixed pre-industrial concentration, independent of year.
    PreIndustrial,
}

impl Co2Scaling {
    /// Multiplier applied to forcing CO₂ in `year`.
    pub fn factor(self, year: i32) -> f64 {
        match self {
            Co2Scaling::Contemporary => 1.0,
            Co2Scaling::PreIndustrial => PRE_INDUSTRIAL_CO2 / FORCING_REFERENCE_CO2,
            Co2Scaling::Historical => historical_factor(year),
        }
    }

    /// Forcing CO₂ adjusted for `year`.
    pub fn apply(self, co2: f64, year: i32) -> f64 {
        match self {
            Co2Scaling::Contemporary => co2,
            _ => self.factor(year) * co2,
        }
    }
}

fn historical_factor(year: i32) -> f64 {
    let y = f64::from(year);
    if year < 1850 {
        PRE_INDUSTRIAL_CO2 / FORCING_REFERENCE_CO2
    } else if year < 1950 {
        (PRE_INDUSTRIAL_CO2 + 0.314 * (y - 1850.0)) / FORCING_REFERENCE_CO2
    } else if year < 2001 {
        (311.0 + 1.290 * (y - 1950.0)) / FORCING_REFERENCE_CO2
    } else {
        1.0
    }
}
