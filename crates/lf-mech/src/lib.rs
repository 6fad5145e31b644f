//! lf-mech: per-site mechanism cache.
//!
//! Provides:
//! - Tagged per-(species, period, light bin) cache slots
//! - Direct 24-hour aggregation of leaf-solver outputs
//! - The binned climate lookup table with light-bin interpolation
//! - Conversion of cached fluxes to site units
//!
//! A cache is owned by exactly one site and mutated through `&mut self`.
//! Forcing and the leaf solver are borrowed read-only for each request.

pub mod cache;
pub mod config;
pub mod error;
pub mod leaf;
pub mod lookup;
pub mod period;
pub mod species;

pub use cache::{
    CacheSlot, MechanismCache, MechanismEntry, UNCOMPUTED_SENTINEL, is_uncomputed_value,
};
pub use config::{LookupConfig, MechanismConfig, MechanismMode, SimulationClock};
pub use error::{MechError, MechResult};
pub use leaf::{LeafFluxes, to_site_units};
pub use lookup::{BinAxis, ClimateLookupTable, LookupEntry, LookupKey};
pub use period::PeriodForcing;
pub use species::SpeciesTraits;
