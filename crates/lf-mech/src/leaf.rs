//! Leaf fluxes in the units the site update consumes.

use crate::cache::MechanismEntry;
use lf_core::units::constants::{SITE_FLUX_FACTOR, SITE_FLUX_MILLI};

/// Potential (open stomata) and shut-stomata fluxes of a fully lit leaf.
///
/// Assimilation in kg C/m²/yr, transpiration in kg H₂O/m²/yr.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LeafFluxes {
    pub an_pot: f64,
    pub an_shut: f64,
    pub e_pot: f64,
    pub e_shut: f64,
}

/// Period flux to site units. The factors are applied one at a time, not as
/// a folded 0.012.
pub fn to_site_units(flux: f64) -> f64 {
    SITE_FLUX_MILLI * flux * SITE_FLUX_FACTOR
}

impl LeafFluxes {
    pub fn from_entry(entry: &MechanismEntry) -> Self {
        Self {
            an_pot: to_site_units(entry.an),
            an_shut: to_site_units(entry.anb),
            e_pot: to_site_units(entry.e),
            e_shut: to_site_units(entry.eb),
        }
    }
}
