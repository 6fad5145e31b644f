//! Per-call meteorological input to the leaf solver.

use crate::forcing::HourlyForcing;
use lf_core::units::constants::STANDARD_PRESSURE_KPA;

/// One hour's scalar forcing as seen by a leaf at a given canopy position.
///
/// Built fresh for every solver call and never stored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeteorologicalSample {
    /// Air temperature [°C]
    pub air_temp: f64,
    /// Soil temperature [°C]
    pub soil_temp: f64,
    /// Ambient vapor pressure [mol/mol]
    pub vapor_pressure: f64,
    /// Incident shortwave radiation [W/m²]
    pub radiation: f64,
    /// Ambient CO₂ [µmol/mol], after any historical rescaling
    pub co2: f64,
    /// Wind speed [m/s]; carried, not used by the solver
    pub wind_speed: f64,
    /// Atmospheric pressure [kPa]
    pub pressure: f64,
    /// Growth temperature [°C]: the mean air temperature of the period
    pub growth_temp: f64,
    /// Fraction of above-canopy radiation reaching the leaf, 0..=1
    pub shade: f64,
}

impl MeteorologicalSample {
    /// Combine an hourly record with the leaf's light position.
    ///
    /// `co2` is passed separately because it may have been rescaled.
    pub fn from_forcing(record: &HourlyForcing, co2: f64, growth_temp: f64, shade: f64) -> Self {
        Self {
            air_temp: record.air_temp,
            soil_temp: record.soil_temp,
            vapor_pressure: record.humidity,
            radiation: record.radiation,
            co2,
            wind_speed: record.wind_speed,
            pressure: STANDARD_PRESSURE_KPA,
            growth_temp,
            shade,
        }
    }
}
