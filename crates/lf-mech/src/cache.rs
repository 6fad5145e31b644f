//! Per-site mechanism cache.
//!
//! One slot per (species, period, light bin). A slot is filled the first time
//! it is requested, either by solving the period's 24 hours directly or from
//! the site's lookup table, and is then served without touching the solver
//! until it is explicitly invalidated.

use crate::config::{MechanismConfig, MechanismMode, SimulationClock};
use crate::error::{MechError, MechResult};
use crate::leaf::LeafFluxes;
use crate::lookup::{ClimateLookupTable, LookupKey};
use crate::period::PeriodForcing;
use crate::species::SpeciesTraits;
use lf_climate::{DownregulationTable, GridCell, MeteorologyProvider};
use lf_core::numeric::ensure_in_range;
use lf_core::units::constants::PERIODS_PER_YEAR;
use lf_core::{LightBin, PeriodId, SpeciesId};
use lf_solver::LeafSolver;
use tracing::{debug, trace};

/// Raw-array marker for a slot that has not been computed.
pub const UNCOMPUTED_SENTINEL: f64 = -9999.0;

/// Whether a raw assimilation value marks an uncomputed slot.
pub fn is_uncomputed_value(v: f64) -> bool {
    v < -1000.0
}

/// Period-aggregated fluxes of one slot.
///
/// Temperature factors are hourly means; fluxes are hourly sums scaled to
/// model units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MechanismEntry {
    pub tf_air: f64,
    pub tf_soil: f64,
    /// Net assimilation, stomata open
    pub an: f64,
    /// Transpiration, stomata open
    pub e: f64,
    /// Net assimilation, stomata shut
    pub anb: f64,
    /// Transpiration, stomata shut
    pub eb: f64,
}

impl MechanismEntry {
    /// `w·self + (1−w)·other`, field by field.
    pub(crate) fn blend(&self, other: &Self, w: f64) -> Self {
        let mix = |a: f64, b: f64| w * a + (1.0 - w) * b;
        Self {
            tf_air: mix(self.tf_air, other.tf_air),
            tf_soil: mix(self.tf_soil, other.tf_soil),
            an: mix(self.an, other.an),
            e: mix(self.e, other.e),
            anb: mix(self.anb, other.anb),
            eb: mix(self.eb, other.eb),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum CacheSlot {
    #[default]
    Uncomputed,
    Computed(MechanismEntry),
}

impl CacheSlot {
    pub fn is_computed(&self) -> bool {
        matches!(self, CacheSlot::Computed(_))
    }

    pub fn entry(&self) -> Option<&MechanismEntry> {
        match self {
            CacheSlot::Computed(e) => Some(e),
            CacheSlot::Uncomputed => None,
        }
    }

    /// Assimilation for raw-array exchange, [`UNCOMPUTED_SENTINEL`] when empty.
    pub fn an_or_sentinel(&self) -> f64 {
        self.entry().map_or(UNCOMPUTED_SENTINEL, |e| e.an)
    }
}

/// Mechanism storage owned by one site.
#[derive(Debug)]
pub struct MechanismCache {
    species: Vec<SpeciesTraits>,
    downregulation: DownregulationTable,
    cell: GridCell,
    config: MechanismConfig,
    // [species][period][light bin]
    slots: Vec<Vec<Vec<CacheSlot>>>,
    // Present only in lookup-table mode
    lookup: Option<ClimateLookupTable>,
}

impl MechanismCache {
    /// Build an empty cache for a site at `latitude` reading forcing at `cell`.
    pub fn new(
        species: Vec<SpeciesTraits>,
        latitude: f64,
        cell: GridCell,
        config: MechanismConfig,
    ) -> MechResult<Self> {
        ensure_in_range(latitude, -90.0, 90.0, "latitude")?;
        config.validate()?;
        for sp in &species {
            sp.validate()?;
            if config.mode == MechanismMode::LookupTable {
                if let Some(&bin) = config
                    .lookup
                    .light_bins
                    .iter()
                    .find(|&&b| b >= sp.light_bin_count())
                {
                    return Err(MechError::LightBinOutOfRange {
                        species: sp.name.clone(),
                        index: bin,
                        len: sp.light_bin_count(),
                    });
                }
            }
        }

        let slots = species
            .iter()
            .map(|sp| vec![vec![CacheSlot::Uncomputed; sp.light_bin_count()]; PERIODS_PER_YEAR])
            .collect();
        let lookup = match config.mode {
            MechanismMode::Direct => None,
            MechanismMode::LookupTable => Some(ClimateLookupTable::new(config.lookup.clone())?),
        };

        Ok(Self {
            species,
            downregulation: DownregulationTable::for_latitude(latitude),
            cell,
            config,
            slots,
            lookup,
        })
    }

    pub fn species(&self) -> &[SpeciesTraits] {
        &self.species
    }

    pub fn config(&self) -> &MechanismConfig {
        &self.config
    }

    pub fn downregulation(&self) -> &DownregulationTable {
        &self.downregulation
    }

    pub fn cell(&self) -> GridCell {
        self.cell
    }

    pub fn lookup(&self) -> Option<&ClimateLookupTable> {
        self.lookup.as_ref()
    }

    pub fn traits(&self, species: SpeciesId) -> MechResult<&SpeciesTraits> {
        self.species
            .get(species.as_usize())
            .ok_or(MechError::SpeciesOutOfRange {
                index: species.as_usize(),
                len: self.species.len(),
            })
    }

    pub fn slot(&self, species: SpeciesId, period: PeriodId, light: LightBin) -> MechResult<&CacheSlot> {
        self.check(species, period, light)?;
        Ok(&self.slots[species.as_usize()][period.as_usize()][light.as_usize()])
    }

    fn check(&self, species: SpeciesId, period: PeriodId, light: LightBin) -> MechResult<()> {
        let sp = self.traits(species)?;
        if period.as_usize() >= PERIODS_PER_YEAR {
            return Err(MechError::PeriodOutOfRange {
                index: period.as_usize(),
                len: PERIODS_PER_YEAR,
            });
        }
        sp.shade(light)?;
        Ok(())
    }

    /// Capacity used for `species` in `period`: Vm0, scaled by the squared
    /// downregulation factor under light regulation.
    pub fn vmax(&self, species: SpeciesId, period: PeriodId) -> MechResult<f64> {
        let vm0 = self.traits(species)?.vm0;
        if self.config.light_regulation {
            Ok(vm0 * self.downregulation.capacity_scale(period)?)
        } else {
            Ok(vm0)
        }
    }

    /// Compute one slot unconditionally and store it.
    pub fn compute_mechanism(
        &mut self,
        species: SpeciesId,
        period: PeriodId,
        light: LightBin,
        clock: SimulationClock,
        forcing: &dyn MeteorologyProvider,
        solver: &dyn LeafSolver,
    ) -> MechResult<MechanismEntry> {
        self.check(species, period, light)?;
        let vmax = self.vmax(species, period)?;
        let cell = self.cell;
        let co2 = self.config.co2;
        let load = || PeriodForcing::load(forcing, period, cell, co2, clock.year);
        let traits = &self.species[species.as_usize()];

        let entry = match self.config.mode {
            MechanismMode::Direct => {
                let shade = traits.shade(light)?;
                load()?.solve(solver, vmax, traits.pathway, shade)
            }
            MechanismMode::LookupTable => {
                let key = LookupKey {
                    snapshot: clock.forcing_snapshot,
                    species,
                    period,
                };
                self.lookup
                    .as_mut()
                    .ok_or_else(|| MechError::InvalidConfig {
                        what: "lookup-table mode without a table".to_string(),
                    })?
                    .entry(key, traits, vmax, load, solver)?
                    .interpolate(light)
            }
        };

        debug!(
            species = %traits.name,
            %period,
            %light,
            mode = ?self.config.mode,
            an = entry.an,
            "computed mechanism slot"
        );
        self.slots[species.as_usize()][period.as_usize()][light.as_usize()] =
            CacheSlot::Computed(entry);
        Ok(entry)
    }

    /// The slot's entry, computing it first if it is uncomputed.
    pub fn ensure(
        &mut self,
        species: SpeciesId,
        period: PeriodId,
        light: LightBin,
        clock: SimulationClock,
        forcing: &dyn MeteorologyProvider,
        solver: &dyn LeafSolver,
    ) -> MechResult<MechanismEntry> {
        if let CacheSlot::Computed(entry) = *self.slot(species, period, light)? {
            trace!(%species, %period, %light, "mechanism cache hit");
            return Ok(entry);
        }
        self.compute_mechanism(species, period, light, clock, forcing, solver)
    }

    /// Leaf fluxes in site units from the fully lit slot of a period.
    pub fn leaf_fluxes(
        &mut self,
        species: SpeciesId,
        period: PeriodId,
        clock: SimulationClock,
        forcing: &dyn MeteorologyProvider,
        solver: &dyn LeafSolver,
    ) -> MechResult<LeafFluxes> {
        let entry = self.ensure(species, period, LightBin::from_index(0), clock, forcing, solver)?;
        Ok(LeafFluxes::from_entry(&entry))
    }

    /// Forget every light bin of one species and period.
    pub fn invalidate(&mut self, species: SpeciesId, period: PeriodId) -> MechResult<()> {
        self.check(species, period, LightBin::from_index(0))?;
        for slot in &mut self.slots[species.as_usize()][period.as_usize()] {
            *slot = CacheSlot::Uncomputed;
        }
        debug!(%species, %period, "invalidated mechanism slots");
        Ok(())
    }

    /// Forget every slot. The lookup table is kept.
    pub fn invalidate_all(&mut self) {
        for slot in self.slots.iter_mut().flatten().flatten() {
            *slot = CacheSlot::Uncomputed;
        }
        debug!("invalidated all mechanism slots");
    }

    /// Number of computed slots.
    pub fn computed_count(&self) -> usize {
        self.slots
            .iter()
            .flatten()
            .flatten()
            .filter(|s| s.is_computed())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LookupConfig;
    use crate::lookup::BinAxis;
    use lf_climate::{HourlyForcing, InMemoryForcing, MeteorologicalSample};
    use lf_core::units::constants::{CARBON_FLUX_SCALE, WATER_FLUX_SCALE};
    use crate::leaf::to_site_units;
    use lf_core::{Tolerances, nearly_equal};
    use lf_solver::{FarquharSolver, Pathway, SolverOutputs};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fixed outputs scaled by capacity and transmission; counts calls.
    #[derive(Default)]
    struct CountingSolver {
        calls: AtomicUsize,
    }

    impl CountingSolver {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl LeafSolver for CountingSolver {
        fn solve(&self, vmax: f64, sample: &MeteorologicalSample, _: Pathway) -> SolverOutputs {
            self.calls.fetch_add(1, Ordering::SeqCst);
            SolverOutputs {
                tf: 0.5,
                a: 1e-6 * sample.shade * vmax,
                e: 2e-3,
                ab: -1e-7,
                eb: 1e-4,
                tf_soil: 0.25,
            }
        }
    }

    fn flat_forcing() -> InMemoryForcing {
        let record = HourlyForcing {
            air_temp: 20.0,
            humidity: 16.0 / 1024.0,
            radiation: 500.0,
            wind_speed: 2.0,
            soil_temp: 14.0,
            co2: 390.0,
        };
        InMemoryForcing::single_cell(vec![record; 24 * PERIODS_PER_YEAR])
    }

    fn species() -> Vec<SpeciesTraits> {
        vec![
            SpeciesTraits::new("oak", Pathway::C3, 50.0, vec![1.0, 0.8, 0.6, 0.4, 0.2]),
            SpeciesTraits::new("maize", Pathway::C4, 40.0, vec![1.0, 0.5]),
        ]
    }

    fn cache(config: MechanismConfig) -> MechanismCache {
        MechanismCache::new(species(), 45.0, GridCell::default(), config).unwrap()
    }

    fn ids(s: u32, p: u32, l: u32) -> (SpeciesId, PeriodId, LightBin) {
        (
            SpeciesId::from_index(s),
            PeriodId::from_index(p),
            LightBin::from_index(l),
        )
    }

    #[test]
    fn second_request_is_served_from_cache() {
        let mut c = cache(MechanismConfig::default());
        let forcing = flat_forcing();
        let solver = CountingSolver::default();
        let (s, p, l) = ids(0, 3, 2);
        let clock = SimulationClock::new(2000, 0);

        assert!(!c.slot(s, p, l).unwrap().is_computed());
        let first = c.ensure(s, p, l, clock, &forcing, &solver).unwrap();
        assert_eq!(solver.calls(), 24);
        let second = c.ensure(s, p, l, clock, &forcing, &solver).unwrap();
        assert_eq!(solver.calls(), 24);
        assert_eq!(first, second);
        assert_eq!(c.computed_count(), 1);
    }

    #[test]
    fn identical_hours_aggregate_to_scaled_sums() {
        let mut c = cache(MechanismConfig::default());
        let forcing = flat_forcing();
        let solver = CountingSolver::default();
        let (s, p, l) = ids(0, 0, 0);
        let e = c
            .ensure(s, p, l, SimulationClock::default(), &forcing, &solver)
            .unwrap();

        let tol = Tolerances::default();
        assert!(nearly_equal(e.tf_air, 0.5, tol));
        assert!(nearly_equal(e.tf_soil, 0.25, tol));
        assert!(nearly_equal(e.an, 24.0 * 50e-6 * CARBON_FLUX_SCALE, tol));
        assert!(nearly_equal(e.e, 24.0 * 2e-3 * WATER_FLUX_SCALE, tol));
        assert!(nearly_equal(e.anb, 24.0 * -1e-7 * CARBON_FLUX_SCALE, tol));
        assert!(nearly_equal(e.eb, 24.0 * 1e-4 * WATER_FLUX_SCALE, tol));
    }

    #[test]
    fn light_regulation_scales_capacity() {
        let config = MechanismConfig {
            light_regulation: true,
            ..MechanismConfig::default()
        };
        let c = cache(config);
        let (s, p, _) = ids(0, 11, 0);
        let factor = c.downregulation().factor(p).unwrap();
        assert!((c.vmax(s, p).unwrap() - 50.0 * factor * factor).abs() < 1e-12);

        let plain = cache(MechanismConfig::default());
        assert_eq!(plain.vmax(s, p).unwrap(), 50.0);
    }

    #[test]
    fn invalidate_forces_a_recompute() {
        let mut c = cache(MechanismConfig::default());
        let forcing = flat_forcing();
        let solver = CountingSolver::default();
        let clock = SimulationClock::default();
        let (s, p, l) = ids(1, 6, 1);

        c.ensure(s, p, l, clock, &forcing, &solver).unwrap();
        c.invalidate(s, p).unwrap();
        assert!(!c.slot(s, p, l).unwrap().is_computed());
        c.ensure(s, p, l, clock, &forcing, &solver).unwrap();
        assert_eq!(solver.calls(), 48);

        c.invalidate_all();
        assert_eq!(c.computed_count(), 0);
    }

    #[test]
    fn out_of_range_indices_are_errors() {
        let mut c = cache(MechanismConfig::default());
        let forcing = flat_forcing();
        let solver = CountingSolver::default();
        let clock = SimulationClock::default();

        let (s, p, l) = ids(2, 0, 0);
        assert!(matches!(
            c.ensure(s, p, l, clock, &forcing, &solver),
            Err(MechError::SpeciesOutOfRange { index: 2, len: 2 })
        ));
        let (s, p, l) = ids(0, 12, 0);
        assert!(matches!(
            c.ensure(s, p, l, clock, &forcing, &solver),
            Err(MechError::PeriodOutOfRange { index: 12, .. })
        ));
        let (s, p, l) = ids(1, 0, 2);
        assert!(matches!(
            c.ensure(s, p, l, clock, &forcing, &solver),
            Err(MechError::LightBinOutOfRange { index: 2, len: 2, .. })
        ));
        assert_eq!(solver.calls(), 0);
    }

    #[test]
    fn short_forcing_reports_climate_error() {
        let forcing = InMemoryForcing::single_cell(vec![HourlyForcing {
            air_temp: 10.0,
            humidity: 0.01,
            radiation: 100.0,
            wind_speed: 1.0,
            soil_temp: 8.0,
            co2: 390.0,
        }; 30]);
        let mut c = cache(MechanismConfig::default());
        let (s, p, l) = ids(0, 1, 0);
        let res = c.ensure(s, p, l, SimulationClock::default(), &forcing, &CountingSolver::default());
        assert!(matches!(res, Err(MechError::Climate(_))));
        assert!(!c.slot(s, p, l).unwrap().is_computed());
    }

    #[test]
    fn sentinel_marks_uncomputed_slots() {
        assert!(is_uncomputed_value(UNCOMPUTED_SENTINEL));
        assert!(!is_uncomputed_value(-1000.0));
        assert_eq!(CacheSlot::Uncomputed.an_or_sentinel(), UNCOMPUTED_SENTINEL);
        let slot = CacheSlot::Computed(MechanismEntry {
            an: 3.0,
            ..MechanismEntry::default()
        });
        assert_eq!(slot.an_or_sentinel(), 3.0);
    }

    #[test]
    fn leaf_fluxes_convert_light_bin_zero() {
        let mut c = cache(MechanismConfig::default());
        let forcing = flat_forcing();
        let solver = CountingSolver::default();
        let (s, p, _) = ids(0, 2, 0);
        let clock = SimulationClock::default();
        let fluxes = c.leaf_fluxes(s, p, clock, &forcing, &solver).unwrap();
        let entry = *c.slot(s, p, LightBin::from_index(0)).unwrap().entry().unwrap();
        assert_eq!(fluxes.an_pot, to_site_units(entry.an));
        assert_eq!(fluxes.e_shut, to_site_units(entry.eb));
    }

    fn lookup_cache() -> MechanismCache {
        MechanismCache::new(
            species().into_iter().take(1).collect(),
            45.0,
            GridCell::default(),
            lookup_config(),
        )
        .unwrap()
    }

    fn lookup_config() -> MechanismConfig {
        MechanismConfig {
            mode: MechanismMode::LookupTable,
            lookup: LookupConfig {
                temperature: BinAxis::new(-50.0, 0.5, 201),
                humidity: BinAxis::new(0.0, 1.0 / 1024.0, 64),
                radiation: BinAxis::new(0.0, 10.0, 121),
                light_bins: vec![0, 2, 4],
            },
            ..MechanismConfig::default()
        }
    }

    #[test]
    fn lookup_entry_is_solved_once_per_key() {
        let mut c = lookup_cache();
        let forcing = flat_forcing();
        let solver = CountingSolver::default();
        let clock = SimulationClock::new(2000, 7);

        let (s, p, l) = ids(0, 4, 1);
        c.ensure(s, p, l, clock, &forcing, &solver).unwrap();
        assert_eq!(solver.calls(), 24 * 3);
        let (s, p, l) = ids(0, 4, 3);
        c.ensure(s, p, l, clock, &forcing, &solver).unwrap();
        assert_eq!(solver.calls(), 24 * 3);
        assert_eq!(c.lookup().map(ClimateLookupTable::len), Some(1));

        // A new forcing snapshot is a new key.
        c.invalidate_all();
        c.ensure(s, p, l, SimulationClock::new(2000, 8), &forcing, &solver)
            .unwrap();
        assert_eq!(solver.calls(), 24 * 6);
        assert_eq!(c.lookup().map(ClimateLookupTable::len), Some(2));
    }

    #[test]
    fn lookup_at_table_bin_matches_direct_solve() {
        let forcing = flat_forcing();
        let solver = FarquharSolver::default();
        let clock = SimulationClock::default();
        let mut direct = cache(MechanismConfig::default());
        let mut table = lookup_cache();

        for l in [0, 2, 4] {
            let (s, p, l) = ids(0, 5, l);
            let d = direct.ensure(s, p, l, clock, &forcing, &solver).unwrap();
            let t = table.ensure(s, p, l, clock, &forcing, &solver).unwrap();
            assert_eq!(d, t, "light bin {l}");
        }
    }

    #[test]
    fn lookup_interpolates_between_table_bins() {
        let forcing = flat_forcing();
        let solver = CountingSolver::default();
        let clock = SimulationClock::default();
        let mut table = lookup_cache();

        let (s, p, _) = ids(0, 5, 0);
        let at = |c: &mut MechanismCache, l: u32| {
            c.ensure(s, p, LightBin::from_index(l), clock, &forcing, &solver)
                .unwrap()
                .an
        };
        let a2 = at(&mut table, 2);
        let a3 = at(&mut table, 3);
        let a4 = at(&mut table, 4);
        assert!((a3 - 0.5 * (a2 + a4)).abs() < 1e-9 * a2.abs());
    }

    #[test]
    fn table_exists_only_in_lookup_mode() {
        assert!(cache(MechanismConfig::default()).lookup().is_none());
        assert!(lookup_cache().lookup().is_some_and(ClimateLookupTable::is_empty));

        let mut config = lookup_config();
        config.lookup.light_bins.clear();
        let err = MechanismCache::new(species(), 45.0, GridCell::default(), config).unwrap_err();
        assert!(matches!(err, MechError::InvalidConfig { .. }));
    }

    #[test]
    fn lookup_bins_must_fit_every_species() {
        let mut config = lookup_config();
        config.lookup.light_bins = vec![0, 4];
        let err = MechanismCache::new(species(), 45.0, GridCell::default(), config).unwrap_err();
        assert!(matches!(err, MechError::LightBinOutOfRange { index: 4, len: 2, .. }));
    }
}
