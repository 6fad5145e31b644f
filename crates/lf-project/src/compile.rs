//! Turn a validated simulation file into runtime values.

use crate::ProjectResult;
use crate::schema::{
    AxisDef, Co2ScalingDef, MechanismModeDef, PathwayDef, SimulationDef,
};
use lf_climate::{Co2Scaling, GridCell, HourlyForcing, InMemoryForcing};
use lf_mech::{
    BinAxis, LookupConfig, MechanismCache, MechanismConfig, MechanismMode, SimulationClock,
    SpeciesTraits,
};
use lf_solver::{FarquharSolver, Pathway};

/// Everything needed to run one site.
#[derive(Debug, Clone)]
pub struct CompiledSimulation {
    pub name: String,
    pub latitude: f64,
    pub cell: GridCell,
    pub solver: FarquharSolver,
    pub config: MechanismConfig,
    pub clock: SimulationClock,
    pub species: Vec<SpeciesTraits>,
    pub forcing: InMemoryForcing,
}

impl CompiledSimulation {
    /// An empty mechanism cache for the site.
    pub fn build_cache(&self) -> ProjectResult<MechanismCache> {
        Ok(MechanismCache::new(
            self.species.clone(),
            self.latitude,
            self.cell,
            self.config.clone(),
        )?)
    }
}

pub fn compile_simulation(sim: &SimulationDef) -> ProjectResult<CompiledSimulation> {
    let solver = FarquharSolver::new(sim.solver.to_constants())?;

    let m = &sim.mechanism;
    let lookup = match &m.lookup {
        Some(l) => LookupConfig {
            temperature: axis(&l.temperature),
            humidity: axis(&l.humidity),
            radiation: axis(&l.radiation),
            light_bins: l.light_bins.clone(),
        },
        None => LookupConfig::default(),
    };
    let config = MechanismConfig {
        mode: match m.mode {
            MechanismModeDef::Direct => MechanismMode::Direct,
            MechanismModeDef::LookupTable => MechanismMode::LookupTable,
        },
        co2: match m.co2 {
            Co2ScalingDef::Contemporary => Co2Scaling::Contemporary,
            Co2ScalingDef::Historical => Co2Scaling::Historical,
            Co2ScalingDef::PreIndustrial => Co2Scaling::PreIndustrial,
        },
        light_regulation: m.light_regulation,
        lookup,
    };

    let species = sim
        .species
        .iter()
        .map(|sp| {
            let pathway = match sp.pathway {
                PathwayDef::C3 => Pathway::C3,
                PathwayDef::C4 => Pathway::C4,
            };
            SpeciesTraits::new(sp.name.clone(), pathway, sp.vm0, sp.light_levels.clone())
        })
        .collect();

    let records = sim
        .forcing
        .hours
        .iter()
        .map(|h| HourlyForcing {
            air_temp: h.air_temp,
            humidity: h.humidity,
            radiation: h.radiation,
            wind_speed: h.wind_speed,
            soil_temp: h.soil_temp,
            co2: h.co2,
        })
        .collect();
    let forcing = InMemoryForcing::new(sim.forcing.rows, sim.forcing.cols, records)?;

    Ok(CompiledSimulation {
        name: sim.name.clone(),
        latitude: sim.site.latitude,
        cell: GridCell::new(sim.site.grid_row, sim.site.grid_col),
        solver,
        config,
        clock: SimulationClock::new(m.year, m.forcing_snapshot),
        species,
        forcing,
    })
}

fn axis(def: &AxisDef) -> BinAxis {
    BinAxis::new(def.origin, def.width, def.count)
}
