//! Biochemical pathway parameters.

use crate::constants::SolverConstants;

/// Photosynthetic pathway of a plant functional type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pathway {
    C3,
    C4,
}

impl Pathway {
    /// Quantum efficiency of the light-limited rate.
    pub fn quantum_efficiency(self, constants: &SolverConstants) -> f64 {
        match self {
            Pathway::C3 => constants.quantum_efficiency_c3,
            Pathway::C4 => constants.quantum_efficiency_c4,
        }
    }

    /// Slope of the linearized conductance / assimilation coupling.
    pub fn stomatal_slope(self) -> f64 {
        match self {
            Pathway::C3 => 8.0,
            Pathway::C4 => 4.0,
        }
    }

    /// Dark respiration as a fraction of temperature-scaled Vmax.
    pub fn respiration_fraction(self) -> f64 {
        match self {
            Pathway::C3 => 0.02,
            Pathway::C4 => 0.04,
        }
    }

    /// Cold and warm shutdown temperatures [°C].
    pub fn shutdown_range(self) -> (f64, f64) {
        match self {
            Pathway::C3 => (5.0, 45.0),
            Pathway::C4 => (10.0, 50.0),
        }
    }
}
