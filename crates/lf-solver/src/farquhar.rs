//! Farquhar leaf model coupled to a stomatal-conductance closure.

use crate::constants::SolverConstants;
use crate::error::SolverResult;
use crate::pathway::Pathway;
use crate::residual::LeafResidual;
use crate::scan::scan;
use crate::temperature::temperature_factor;
use lf_climate::MeteorologicalSample;
use tracing::trace;

/// Model inputs arrive in µmol; the leaf equations work in mol.
const MICRO: f64 = 1.0e6;

/// Results of one leaf solve.
///
/// Carbon in mol CO₂/m²/s, water in mol H₂O/m²/s.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SolverOutputs {
    /// Temperature factor at air temperature
    pub tf: f64,
    /// Net assimilation with open stomata
    pub a: f64,
    /// Transpiration with open stomata
    pub e: f64,
    /// Net assimilation with stomata shut (dark respiration only)
    pub ab: f64,
    /// Transpiration with stomata shut
    pub eb: f64,
    /// Temperature factor at soil temperature
    pub tf_soil: f64,
}

/// Computes leaf fluxes for one hour of forcing.
///
/// Implementations must be pure functions of their arguments.
pub trait LeafSolver: Send + Sync {
    /// `vmax` is the maximum carboxylation rate at 25 °C [µmol/m²/s].
    fn solve(&self, vmax: f64, sample: &MeteorologicalSample, pathway: Pathway) -> SolverOutputs;
}

/// Default leaf solver.
#[derive(Clone, Debug, Default)]
pub struct FarquharSolver {
    constants: SolverConstants,
}

impl FarquharSolver {
    /// Create a solver after checking its constants.
    pub fn new(constants: SolverConstants) -> SolverResult<Self> {
        constants.validate()?;
        Ok(Self { constants })
    }

    pub fn constants(&self) -> &SolverConstants {
        &self.constants
    }
}

impl LeafSolver for FarquharSolver {
    fn solve(&self, vmax: f64, sample: &MeteorologicalSample, pathway: Pathway) -> SolverOutputs {
        let absorbed = sample.radiation * sample.shade;
        let residual = LeafResidual::new(
            &self.constants,
            pathway,
            vmax / MICRO,
            sample.co2 / MICRO,
            sample.air_temp,
            sample.vapor_pressure,
            absorbed,
        );
        let out = scan(&residual);
        trace!(
            ?pathway,
            conductance = out.conductance,
            evaluations = out.evaluations,
            "stomatal conductance settled"
        );

        SolverOutputs {
            tf: temperature_factor(sample.air_temp, pathway),
            a: out.assimilation,
            e: out.transpiration,
            ab: -out.floor.respiration,
            eb: out.floor.transpiration,
            tf_soil: temperature_factor(sample.soil_temp, pathway),
        }
    }
}
