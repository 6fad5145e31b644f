//! Error types for mechanism-cache operations.

use thiserror::Error;

/// Errors raised at the cache boundary. The leaf solver itself never fails.
#[derive(Error, Debug)]
pub enum MechError {
    #[error("Species {index} out of range ({len} species)")]
    SpeciesOutOfRange { index: usize, len: usize },

    #[error("Period {index} out of range ({len} periods)")]
    PeriodOutOfRange { index: usize, len: usize },

    #[error("Light bin {index} out of range for species '{species}' ({len} levels)")]
    LightBinOutOfRange {
        species: String,
        index: usize,
        len: usize,
    },

    #[error("Invalid configuration: {what}")]
    InvalidConfig { what: String },

    #[error("Forcing error: {0}")]
    Climate(#[from] lf_climate::ClimateError),
}

pub type MechResult<T> = Result<T, MechError>;

impl From<lf_core::LfError> for MechError {
    fn from(e: lf_core::LfError) -> Self {
        MechError::InvalidConfig {
            what: e.to_string(),
        }
    }
}
