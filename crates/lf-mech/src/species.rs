//! Per-species photosynthetic traits.

use crate::error::{MechError, MechResult};
use lf_core::LightBin;
use lf_core::numeric::{ensure_in_range, ensure_positive};
use lf_solver::Pathway;

/// What the mechanism cache needs to know about a plant functional type.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeciesTraits {
    pub name: String,
    pub pathway: Pathway,
    /// Reference maximum carboxylation capacity Vm0 [µmol/m²/s]
    pub vm0: f64,
    /// Canopy light transmission per light bin, 0..=1
    pub light_levels: Vec<f64>,
}

impl SpeciesTraits {
    pub fn new(name: impl Into<String>, pathway: Pathway, vm0: f64, light_levels: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            pathway,
            vm0,
            light_levels,
        }
    }

    pub fn light_bin_count(&self) -> usize {
        self.light_levels.len()
    }

    /// Transmission at one light bin.
    pub fn shade(&self, bin: LightBin) -> MechResult<f64> {
        self.light_levels
            .get(bin.as_usize())
            .copied()
            .ok_or_else(|| MechError::LightBinOutOfRange {
                species: self.name.clone(),
                index: bin.as_usize(),
                len: self.light_levels.len(),
            })
    }

    pub fn validate(&self) -> MechResult<()> {
        ensure_positive(self.vm0, "vm0")?;
        if self.light_levels.is_empty() {
            return Err(MechError::InvalidConfig {
                what: format!("species '{}' has no light levels", self.name),
            });
        }
        for &level in &self.light_levels {
            ensure_in_range(level, 0.0, 1.0, "light level")?;
        }
        Ok(())
    }
}
