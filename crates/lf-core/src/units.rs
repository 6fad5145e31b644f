//! SI quantity aliases and the unit conventions of the flux pipeline.

use uom::si::f64::{
    Angle as UomAngle, HeatFluxDensity as UomHeatFluxDensity,
    ThermodynamicTemperature as UomThermodynamicTemperature, Velocity as UomVelocity,
};

// Public canonical unit types (SI, f64)
pub type Angle = UomAngle;
pub type Irradiance = UomHeatFluxDensity;
pub type Temperature = UomThermodynamicTemperature;
pub type Velocity = UomVelocity;

#[inline]
pub fn deg(v: f64) -> Angle {
    use uom::si::angle::degree;
    Angle::new::<degree>(v)
}

#[inline]
pub fn degc(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::degree_celsius;
    Temperature::new::<degree_celsius>(v)
}

#[inline]
pub fn mps(v: f64) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

#[inline]
pub fn w_per_m2(v: f64) -> Irradiance {
    use uom::si::heat_flux_density::watt_per_square_meter;
    Irradiance::new::<watt_per_square_meter>(v)
}

pub mod constants {
    /// Hourly sub-steps aggregated into one time period.
    pub const HOURS_PER_PERIOD: usize = 24;

    /// Time periods in a simulated year.
    pub const PERIODS_PER_YEAR: usize = 12;

    pub const SECONDS_PER_HOUR: f64 = 3600.0;

    /// Scale from summed hourly carbon rates (mol/m²/s) to the period flux unit.
    pub const CARBON_FLUX_SCALE: f64 = SECONDS_PER_HOUR * 360.0;

    /// Scale from summed hourly water rates to the period flux unit.
    pub const WATER_FLUX_SCALE: f64 = SECONDS_PER_HOUR * 540.0;

    /// Period flux to site units (kg C/m²/yr, kg H₂O/m²/yr) is
    /// `SITE_FLUX_MILLI · flux · SITE_FLUX_FACTOR`, multiplied in that order.
    pub const SITE_FLUX_MILLI: f64 = 0.001;
    pub const SITE_FLUX_FACTOR: f64 = 12.0;

    /// Atmospheric pressure used when the forcing provides none.
    pub const STANDARD_PRESSURE_KPA: f64 = 101.3;
}
