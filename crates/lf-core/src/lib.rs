//! lf-core: stable foundation for leafflux.
//!
//! Contains:
//! - units (uom SI types, constructors and flux conversion constants)
//! - numeric (Real + tolerances + float helpers)
//! - ids (typed indices for species, time periods and light bins)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{LfError, LfResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
