//! Run-level switches for the mechanism cache.

use crate::error::{MechError, MechResult};
use crate::lookup::BinAxis;
use lf_climate::Co2Scaling;

/// How uncomputed cache slots are filled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MechanismMode {
    /// Solve every hour of the period directly.
    #[default]
    Direct,
    /// Serve from the binned climate lookup table.
    LookupTable,
}

/// Binning of the lookup table.
#[derive(Clone, Debug, PartialEq)]
pub struct LookupConfig {
    /// Air temperature axis [°C]
    pub temperature: BinAxis,
    /// Humidity axis [mol/mol]
    pub humidity: BinAxis,
    /// Shortwave radiation axis [W/m²]
    pub radiation: BinAxis,
    /// Light bins solved into the table, strictly ascending
    pub light_bins: Vec<usize>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            temperature: BinAxis::new(-50.0, 0.5, 221),
            humidity: BinAxis::new(0.0, 1.0 / 1024.0, 65),
            radiation: BinAxis::new(0.0, 10.0, 141),
            light_bins: vec![0, 5, 10, 20],
        }
    }
}

impl LookupConfig {
    pub fn validate(&self) -> MechResult<()> {
        self.temperature.validate("temperature")?;
        self.humidity.validate("humidity")?;
        self.radiation.validate("radiation")?;
        if self.light_bins.is_empty() {
            return Err(MechError::InvalidConfig {
                what: "lookup table has no light bins".to_string(),
            });
        }
        if self.light_bins.windows(2).any(|w| w[0] >= w[1]) {
            return Err(MechError::InvalidConfig {
                what: format!(
                    "lookup light bins must be strictly ascending: {:?}",
                    self.light_bins
                ),
            });
        }
        Ok(())
    }
}

/// All mode flags of a run in one value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MechanismConfig {
    pub mode: MechanismMode,
    pub co2: Co2Scaling,
    /// Scale Vm0 by the squared day-length downregulation factor
    pub light_regulation: bool,
    pub lookup: LookupConfig,
}

impl MechanismConfig {
    pub fn validate(&self) -> MechResult<()> {
        if self.mode == MechanismMode::LookupTable {
            self.lookup.validate()?;
        }
        Ok(())
    }
}

/// Where the run is in time, as far as the cache is concerned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SimulationClock {
    /// Calendar year used for historical CO₂ rescaling
    pub year: i32,
    /// Identifier of the forcing snapshot currently loaded
    pub forcing_snapshot: u32,
}

impl SimulationClock {
    pub const fn new(year: i32, forcing_snapshot: u32) -> Self {
        Self {
            year,
            forcing_snapshot,
        }
    }
}
