//! lf-climate: meteorological forcing and calendar-driven light limits.
//!
//! Provides:
//! - Hourly forcing records and the read-only `MeteorologyProvider` seam
//! - An in-memory, grid-indexed forcing table
//! - The per-call `MeteorologicalSample` handed to the leaf solver
//! - Historical CO₂ rescaling of forcing concentrations
//! - Day length and the light-limitation downregulation table
//! - Period frost-exposure flags
//!
//! # Architecture
//!
//! Forcing is never stored in process-wide tables. A provider is built once per
//! simulation run and passed by reference to whatever needs it, so sites can be
//! processed independently without sharing mutable state.

pub mod co2;
pub mod daylength;
pub mod error;
pub mod forcing;
pub mod frost;
pub mod sample;

pub use co2::Co2Scaling;
pub use daylength::{
    DownregulationTable, MAX_DECLINATION_DEG, MIN_DOWNREGULATION, day_length,
    downregulation_factor, period_mid_day, solar_declination,
};
pub use error::{ClimateError, ClimateResult};
pub use forcing::{GridCell, HourlyForcing, InMemoryForcing, MeteorologyProvider};
pub use frost::FrostFlags;
pub use sample::MeteorologicalSample;
