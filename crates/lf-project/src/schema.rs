//! Simulation file schema.

use serde::{Deserialize, Serialize};

/// Current schema version written by `save_*`.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationDef {
    pub version: u32,
    pub name: String,
    pub site: SiteDef,
    #[serde(default)]
    pub solver: SolverDef,
    #[serde(default)]
    pub mechanism: MechanismDef,
    #[serde(default)]
    pub species: Vec<SpeciesDef>,
    pub forcing: ForcingDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SiteDef {
    pub name: String,
    /// Degrees north
    pub latitude: f64,
    #[serde(default)]
    pub grid_row: usize,
    #[serde(default)]
    pub grid_col: usize,
}

/// Leaf-solver constants; omitted fields take the standard values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SolverDef {
    pub boundary_conductance: f64,
    pub quantum_efficiency_c3: f64,
    pub quantum_efficiency_c4: f64,
    pub min_conductance: f64,
    pub conductance_step: f64,
    pub precision: usize,
    pub boundary_layer: bool,
}

impl SolverDef {
    /// Solver constants with the file's overrides; the rest keep their defaults.
    pub fn to_constants(&self) -> lf_solver::SolverConstants {
        lf_solver::SolverConstants {
            boundary_conductance: self.boundary_conductance,
            quantum_efficiency_c3: self.quantum_efficiency_c3,
            quantum_efficiency_c4: self.quantum_efficiency_c4,
            min_conductance: self.min_conductance,
            conductance_step: self.conductance_step,
            precision: self.precision,
            boundary_layer: self.boundary_layer,
            ..lf_solver::SolverConstants::default()
        }
    }
}

impl Default for SolverDef {
    fn default() -> Self {
        let c = lf_solver::SolverConstants::default();
        Self {
            boundary_conductance: c.boundary_conductance,
            quantum_efficiency_c3: c.quantum_efficiency_c3,
            quantum_efficiency_c4: c.quantum_efficiency_c4,
            min_conductance: c.min_conductance,
            conductance_step: c.conductance_step,
            precision: c.precision,
            boundary_layer: c.boundary_layer,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MechanismModeDef {
    #[default]
    Direct,
    LookupTable,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Co2ScalingDef {
    #[default]
    Contemporary,
    Historical,
    PreIndustrial,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MechanismDef {
    pub mode: MechanismModeDef,
    pub co2: Co2ScalingDef,
    pub light_regulation: bool,
    /// Calendar year of the run, for historical CO₂
    pub year: i32,
    pub forcing_snapshot: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup: Option<LookupDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AxisDef {
    pub origin: f64,
    pub width: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LookupDef {
    pub temperature: AxisDef,
    pub humidity: AxisDef,
    pub radiation: AxisDef,
    pub light_bins: Vec<usize>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PathwayDef {
    C3,
    C4,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpeciesDef {
    pub name: String,
    pub pathway: PathwayDef,
    /// Vm0 [µmol/m²/s]
    pub vm0: f64,
    pub light_levels: Vec<f64>,
}

/// Hour-major forcing over a `rows x cols` grid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForcingDef {
    #[serde(default = "one")]
    pub rows: usize,
    #[serde(default = "one")]
    pub cols: usize,
    pub hours: Vec<HourDef>,
}

fn one() -> usize {
    1
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HourDef {
    pub air_temp: f64,
    pub humidity: f64,
    pub radiation: f64,
    #[serde(default)]
    pub wind_speed: f64,
    pub soil_temp: f64,
    pub co2: f64,
}
