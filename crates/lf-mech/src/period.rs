//! One period's hourly forcing, ready to drive the leaf solver.

use crate::cache::MechanismEntry;
use crate::config::LookupConfig;
use crate::error::MechResult;
use lf_climate::{Co2Scaling, GridCell, HourlyForcing, MeteorologicalSample, MeteorologyProvider};
use lf_core::PeriodId;
use lf_core::units::constants::{CARBON_FLUX_SCALE, HOURS_PER_PERIOD, WATER_FLUX_SCALE};
use lf_solver::{LeafSolver, Pathway};

/// The hours of one period at one cell, CO₂ already rescaled.
#[derive(Clone, Debug, PartialEq)]
pub struct PeriodForcing {
    records: Vec<HourlyForcing>,
    growth_temp: f64,
}

impl PeriodForcing {
    /// Read hours `period·24 .. period·24+24` and rescale their CO₂ for `year`.
    pub fn load(
        forcing: &dyn MeteorologyProvider,
        period: PeriodId,
        cell: GridCell,
        co2: Co2Scaling,
        year: i32,
    ) -> MechResult<Self> {
        let mut records = period
            .hours(HOURS_PER_PERIOD)
            .map(|hour| forcing.meteorology(hour, cell))
            .collect::<Result<Vec<_>, _>>()?;

        // Growth temperature is the plain mean of the period's air temperature.
        let growth_temp =
            records.iter().map(|r| r.air_temp).sum::<f64>() / HOURS_PER_PERIOD as f64;
        for r in &mut records {
            r.co2 = co2.apply(r.co2, year);
        }
        Ok(Self {
            records,
            growth_temp,
        })
    }

    pub fn records(&self) -> &[HourlyForcing] {
        &self.records
    }

    pub fn growth_temp(&self) -> f64 {
        self.growth_temp
    }

    /// Copy with air temperature, humidity and radiation moved to their bin centers.
    pub fn snapped(&self, lookup: &LookupConfig) -> Self {
        let records = self
            .records
            .iter()
            .map(|r| HourlyForcing {
                air_temp: lookup.temperature.snap(r.air_temp),
                humidity: lookup.humidity.snap(r.humidity),
                radiation: lookup.radiation.snap(r.radiation),
                ..*r
            })
            .collect();
        Self {
            records,
            growth_temp: self.growth_temp,
        }
    }

    /// Solve every hour at one transmission and aggregate to period fluxes.
    pub fn solve(
        &self,
        solver: &dyn LeafSolver,
        vmax: f64,
        pathway: Pathway,
        shade: f64,
    ) -> MechanismEntry {
        let mut sum = MechanismEntry::default();
        for r in &self.records {
            let sample = MeteorologicalSample::from_forcing(r, r.co2, self.growth_temp, shade);
            let out = solver.solve(vmax, &sample, pathway);
            sum.tf_air += out.tf;
            sum.tf_soil += out.tf_soil;
            sum.an += out.a;
            sum.e += out.e;
            sum.anb += out.ab;
            sum.eb += out.eb;
        }

        let hours = HOURS_PER_PERIOD as f64;
        MechanismEntry {
            tf_air: sum.tf_air / hours,
            tf_soil: sum.tf_soil / hours,
            an: sum.an * CARBON_FLUX_SCALE,
            e: sum.e * WATER_FLUX_SCALE,
            anb: sum.anb * CARBON_FLUX_SCALE,
            eb: sum.eb * WATER_FLUX_SCALE,
        }
    }
}
