//! Binned climate lookup table.
//!
//! Forcing is snapped to bin centers on three axes (air temperature, humidity,
//! radiation) and a period's fluxes are solved once per table light bin.
//! Requests for other light bins interpolate linearly in light-bin space.
//! Entries are keyed by forcing snapshot, species and period, filled on first
//! use and kept for the rest of the run.

use crate::cache::MechanismEntry;
use crate::config::LookupConfig;
use crate::error::{MechError, MechResult};
use crate::period::PeriodForcing;
use crate::species::SpeciesTraits;
use lf_core::{LightBin, PeriodId, SpeciesId};
use lf_solver::LeafSolver;
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Uniform bins `origin + k·width`, `k` in `0..count`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BinAxis {
    pub origin: f64,
    pub width: f64,
    pub count: usize,
}

impl BinAxis {
    pub const fn new(origin: f64, width: f64, count: usize) -> Self {
        Self {
            origin,
            width,
            count,
        }
    }

    /// Nearest bin, clamped to the axis.
    pub fn index(&self, value: f64) -> usize {
        let k = ((value - self.origin) / self.width).round();
        if k.is_nan() || k <= 0.0 {
            0
        } else {
            (k as usize).min(self.count.saturating_sub(1))
        }
    }

    pub fn center(&self, index: usize) -> f64 {
        self.origin + index as f64 * self.width
    }

    /// `value` moved to the center of its bin.
    pub fn snap(&self, value: f64) -> f64 {
        self.center(self.index(value))
    }

    pub(crate) fn validate(&self, what: &str) -> MechResult<()> {
        if !(self.width.is_finite() && self.width > 0.0) || !self.origin.is_finite() {
            return Err(MechError::InvalidConfig {
                what: format!("{what} axis needs a finite origin and positive width"),
            });
        }
        if self.count == 0 {
            return Err(MechError::InvalidConfig {
                what: format!("{what} axis has no bins"),
            });
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LookupKey {
    pub snapshot: u32,
    pub species: SpeciesId,
    pub period: PeriodId,
}

/// Solved fluxes at every table light bin for one key.
#[derive(Clone, Debug, PartialEq)]
pub struct LookupEntry {
    light_bins: Vec<usize>,
    values: Vec<MechanismEntry>,
}

impl LookupEntry {
    /// Value at `light`, interpolated between the neighbouring table bins.
    pub fn interpolate(&self, light: LightBin) -> MechanismEntry {
        let l = f64::from(light.index());
        let bins = &self.light_bins;
        match bins.iter().position(|&b| b as f64 > l) {
            Some(0) => self.values[0],
            None => self.values[self.values.len() - 1],
            Some(i) => {
                let hi = bins[i] as f64;
                let lo = bins[i - 1] as f64;
                let w = (hi - l) / (hi - lo);
                self.values[i - 1].blend(&self.values[i], w)
            }
        }
    }

    pub fn values(&self) -> &[MechanismEntry] {
        &self.values
    }
}

/// Lazily filled table for one site.
#[derive(Debug, Default)]
pub struct ClimateLookupTable {
    config: LookupConfig,
    entries: HashMap<LookupKey, LookupEntry>,
}

impl ClimateLookupTable {
    /// Empty table over `config`'s axes and light bins.
    pub fn new(config: LookupConfig) -> MechResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            entries: HashMap::new(),
        })
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &LookupKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Entry for `key`, solving it from `period_forcing` if absent.
    pub fn entry(
        &mut self,
        key: LookupKey,
        species: &SpeciesTraits,
        vmax: f64,
        period_forcing: impl FnOnce() -> MechResult<PeriodForcing>,
        solver: &dyn LeafSolver,
    ) -> MechResult<&LookupEntry> {
        if self.entries.contains_key(&key) {
            trace!(?key, "lookup table hit");
        } else {
            let snapped = period_forcing()?.snapped(&self.config);
            let shades = self
                .config
                .light_bins
                .iter()
                .map(|&b| species.shade(LightBin::from_index(b as u32)))
                .collect::<MechResult<Vec<_>>>()?;

            let values = shades
                .par_iter()
                .map(|&shade| snapped.solve(solver, vmax, species.pathway, shade))
                .collect();
            debug!(
                ?key,
                species = %species.name,
                bins = self.config.light_bins.len(),
                "populated lookup table entry"
            );
            self.entries.insert(
                key,
                LookupEntry {
                    light_bins: self.config.light_bins.clone(),
                    values,
                },
            );
        }
        self.entries
            .get(&key)
            .ok_or_else(|| MechError::InvalidConfig {
                what: "lookup entry missing after population".to_string(),
            })
    }
}
