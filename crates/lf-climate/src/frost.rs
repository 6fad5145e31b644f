//! Period frost-exposure flags.
//!
//! A period is frost-exposed for a plant group when any hourly air temperature
//! in the period drops below that group's hardiness threshold.

use crate::error::ClimateResult;
use crate::forcing::{GridCell, MeteorologyProvider};
use lf_core::PeriodId;
use lf_core::units::constants::HOURS_PER_PERIOD;

/// Hardiness threshold of cold-deciduous types [°C].
pub const COLD_DECIDUOUS_THRESHOLD: f64 = -20.0;
/// Hardiness threshold of short evergreen types [°C].
pub const EVERGREEN_SHORT_THRESHOLD: f64 = -2.0;
/// Hardiness threshold shared by early, mid and late successional types [°C].
pub const SUCCESSIONAL_THRESHOLD: f64 = -25.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrostFlags {
    pub cold_deciduous: bool,
    pub evergreen_short: bool,
    pub successional: bool,
}

impl FrostFlags {
    /// Flags from a sequence of hourly air temperatures.
    pub fn from_temperatures(temps: impl IntoIterator<Item = f64>) -> Self {
        temps
            .into_iter()
            .fold(FrostFlags::default(), |flags, t| FrostFlags {
                cold_deciduous: flags.cold_deciduous || t < COLD_DECIDUOUS_THRESHOLD,
                evergreen_short: flags.evergreen_short || t < EVERGREEN_SHORT_THRESHOLD,
                successional: flags.successional || t < SUCCESSIONAL_THRESHOLD,
            })
    }

    /// Flags for one period of a site's forcing.
    pub fn for_period(
        forcing: &dyn MeteorologyProvider,
        period: PeriodId,
        cell: GridCell,
    ) -> ClimateResult<Self> {
        let temps = period
            .hours(HOURS_PER_PERIOD)
            .map(|hour| forcing.meteorology(hour, cell).map(|rec| rec.air_temp))
            .collect::<ClimateResult<Vec<_>>>()?;
        Ok(Self::from_temperatures(temps))
    }
}
