//! Coupled photosynthesis / stomatal-conductance solver.
//!
//! For one hour of forcing at one canopy light level, the solver finds the
//! stomatal conductance at which net assimilation balances CO₂ supply through
//! the stomata, with leaf temperature from an energy balance at every trial
//! conductance. The search is a bounded coarse-to-fine scan that keeps the
//! last sample before the residual changes sign.

pub mod constants;
pub mod error;
pub mod farquhar;
pub mod pathway;
pub mod temperature;

mod residual;
mod scan;

pub use constants::SolverConstants;
pub use error::{SolverError, SolverResult};
pub use farquhar::{FarquharSolver, LeafSolver, SolverOutputs};
pub use pathway::Pathway;
pub use temperature::{saturation_humidity, temperature_factor};
