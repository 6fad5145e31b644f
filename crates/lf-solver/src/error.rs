//! Error types for solver configuration.
//!
//! Solving itself never fails; only constants are checked, once, when a run is
//! configured.

use lf_core::error::LfError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Invalid solver constant: {what}")]
    InvalidConstant { what: String },

    #[error("Numeric error: {0}")]
    Numeric(#[from] LfError),
}

pub type SolverResult<T> = Result<T, SolverError>;
