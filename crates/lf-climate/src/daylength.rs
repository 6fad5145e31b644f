//! Day length and light-limitation downregulation.
//!
//! Day length follows the hour-angle relation
//!
//! ```text
//! L = 0.133 · deg(acos(−tan(φ) · tan(δ)))
//! ```
//!
//! with the solar declination δ from a truncated Fourier fit in day of year.
//! The downregulation factor is the ratio of the realized day length to the
//! longest day the latitude sees; photosynthetic capacity is scaled by its
//! square when light regulation is enabled.

use crate::error::{ClimateError, ClimateResult};
use lf_core::PeriodId;
use lf_core::units::constants::PERIODS_PER_YEAR;
use lf_core::units::deg;
use uom::si::angle::radian;

/// Declination used for the maximum day length at a latitude [degrees].
pub const MAX_DECLINATION_DEG: f64 = 23.5;

/// Smallest downregulation factor; avoids a hard zero multiplier in polar night.
pub const MIN_DOWNREGULATION: f64 = 0.01;

const DAYS_PER_YEAR: f64 = 365.0;
const HOURS_PER_HOUR_ANGLE_DEGREE: f64 = 0.133;
const DAYS_PER_PERIOD: f64 = 30.0;
const MID_PERIOD_OFFSET: f64 = 15.0;

/// Solar declination [degrees] for a (fractional) day of year.
pub fn solar_declination(day_of_year: f64) -> f64 {
    let theta = deg(360.0 * day_of_year / DAYS_PER_YEAR).get::<radian>();
    0.39637 - 22.9133 * theta.cos() + 4.02543 * theta.sin() - 0.3872 * (2.0 * theta).cos()
        + 0.052 * (2.0 * theta).sin()
}

/// Day length [hours] at `latitude` degrees on `day_of_year`.
///
/// With `use_max_declination` the declination is replaced by the hemisphere's
/// extreme (±23.5°), giving the longest day at that latitude.
///
/// Polar day and polar night have no hour angle; they resolve to 24 and 0 hours.
pub fn day_length(latitude: f64, day_of_year: f64, use_max_declination: bool) -> f64 {
    let declination = if use_max_declination {
        if latitude > 0.0 {
            MAX_DECLINATION_DEG
        } else {
            -MAX_DECLINATION_DEG
        }
    } else {
        solar_declination(day_of_year)
    };

    let lat = deg(latitude).get::<radian>();
    let decl = deg(declination).get::<radian>();
    let x = -lat.tan() * decl.tan();

    let hour_angle = x.acos();
    if hour_angle.is_nan() {
        if x >= 0.0 { 0.0 } else { 24.0 }
    } else {
        HOURS_PER_HOUR_ANGLE_DEGREE * hour_angle.to_degrees()
    }
}

/// Day of year at the middle of a time period.
pub fn period_mid_day(period: PeriodId) -> f64 {
    f64::from(period.index()) * DAYS_PER_PERIOD + MID_PERIOD_OFFSET
}

/// Ratio of realized to maximum day length, in `[0.01, 1]`.
pub fn downregulation_factor(latitude: f64, period: PeriodId) -> f64 {
    let day = period_mid_day(period);
    let realized = day_length(latitude, day, false);
    let longest = day_length(latitude, day, true);

    if longest == 0.0 || realized == 0.0 {
        MIN_DOWNREGULATION
    } else if realized > longest {
        1.0
    } else {
        (realized / longest).max(MIN_DOWNREGULATION)
    }
}

/// Per-site downregulation factors, one per time period, fixed at site creation.
#[derive(Clone, Debug, PartialEq)]
pub struct DownregulationTable {
    factors: Vec<f64>,
}

impl DownregulationTable {
    /// Factors for every period of the year at `latitude`.
    pub fn for_latitude(latitude: f64) -> Self {
        let factors = (0..PERIODS_PER_YEAR as u32)
            .map(|p| downregulation_factor(latitude, PeriodId::from_index(p)))
            .collect();
        Self { factors }
    }

    /// A table that leaves capacity untouched.
    pub fn unity() -> Self {
        Self {
            factors: vec![1.0; PERIODS_PER_YEAR],
        }
    }

    pub fn factor(&self, period: PeriodId) -> ClimateResult<f64> {
        self.factors
            .get(period.as_usize())
            .copied()
            .ok_or(ClimateError::PeriodOutOfRange {
                period: period.as_usize(),
                len: self.factors.len(),
            })
    }

    /// Capacity multiplier: the squared factor.
    pub fn capacity_scale(&self, period: PeriodId) -> ClimateResult<f64> {
        let f = self.factor(period)?;
        Ok(f.powi(2))
    }

    pub fn factors(&self) -> &[f64] {
        &self.factors
    }
}
