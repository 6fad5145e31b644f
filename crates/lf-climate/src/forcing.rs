//! Hourly meteorological forcing and the read-only provider seam.

use crate::error::{ClimateError, ClimateResult};
use lf_core::units::{Irradiance, Temperature, Velocity};
use uom::si::{
    heat_flux_density::watt_per_square_meter, thermodynamic_temperature::degree_celsius,
    velocity::meter_per_second,
};

/// One hour of forcing at one grid cell, as delivered by the climate-data provider.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HourlyForcing {
    /// Air temperature [°C]
    pub air_temp: f64,
    /// Ambient vapor pressure as a mole fraction [mol/mol]
    pub humidity: f64,
    /// Incident shortwave radiation [W/m²]
    pub radiation: f64,
    /// Wind speed [m/s]
    pub wind_speed: f64,
    /// Soil temperature [°C]
    pub soil_temp: f64,
    /// Ambient CO₂ mixing ratio [µmol/mol]
    pub co2: f64,
}

impl HourlyForcing {
    /// Build a record from typed quantities.
    pub fn from_quantities(
        air_temp: Temperature,
        soil_temp: Temperature,
        humidity: f64,
        radiation: Irradiance,
        wind_speed: Velocity,
        co2: f64,
    ) -> Self {
        Self {
            air_temp: air_temp.get::<degree_celsius>(),
            humidity,
            radiation: radiation.get::<watt_per_square_meter>(),
            wind_speed: wind_speed.get::<meter_per_second>(),
            soil_temp: soil_temp.get::<degree_celsius>(),
            co2,
        }
    }
}

/// Grid coordinates of a site in the forcing table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
}

impl GridCell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Read-only access to time- and space-indexed forcing.
///
/// Implementations are populated outside the photosynthesis core and are never
/// mutated by it.
pub trait MeteorologyProvider: Send + Sync {
    /// Forcing for one absolute hour at one grid cell.
    fn meteorology(&self, hour: usize, cell: GridCell) -> ClimateResult<HourlyForcing>;

    /// Number of hours available.
    fn hour_count(&self) -> usize;
}

/// Dense forcing table laid out hour-major over a `rows x cols` grid.
#[derive(Clone, Debug)]
pub struct InMemoryForcing {
    rows: usize,
    cols: usize,
    records: Vec<HourlyForcing>,
}

impl InMemoryForcing {
    /// Create a table from hour-major records (`hour`, then `row`, then `col`).
    pub fn new(rows: usize, cols: usize, records: Vec<HourlyForcing>) -> ClimateResult<Self> {
        let cells = rows * cols;
        if cells == 0 {
            return Err(ClimateError::ShapeMismatch {
                what: format!("empty {rows}x{cols} grid"),
            });
        }
        if records.len() % cells != 0 {
            return Err(ClimateError::ShapeMismatch {
                what: format!("{} records for {} cells", records.len(), cells),
            });
        }
        Ok(Self {
            rows,
            cols,
            records,
        })
    }

    /// A single-cell table, the common shape for site runs.
    pub fn single_cell(records: Vec<HourlyForcing>) -> Self {
        Self {
            rows: 1,
            cols: 1,
            records,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Replace one record. Used by external feedbacks that rewrite forcing mid-run.
    pub fn set(&mut self, hour: usize, cell: GridCell, record: HourlyForcing) -> ClimateResult<()> {
        let idx = self.offset(hour, cell)?;
        self.records[idx] = record;
        Ok(())
    }

    fn offset(&self, hour: usize, cell: GridCell) -> ClimateResult<usize> {
        if cell.row >= self.rows || cell.col >= self.cols {
            return Err(ClimateError::CellOutOfRange {
                row: cell.row,
                col: cell.col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        let len = self.hour_count();
        if hour >= len {
            return Err(ClimateError::HourOutOfRange { hour, len });
        }
        Ok((hour * self.rows + cell.row) * self.cols + cell.col)
    }
}

impl MeteorologyProvider for InMemoryForcing {
    fn meteorology(&self, hour: usize, cell: GridCell) -> ClimateResult<HourlyForcing> {
        let idx = self.offset(hour, cell)?;
        Ok(self.records[idx])
    }

    fn hour_count(&self) -> usize {
        self.records.len() / (self.rows * self.cols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lf_core::units::{degc, mps, w_per_m2};

    fn record(air_temp: f64) -> HourlyForcing {
        HourlyForcing {
            air_temp,
            humidity: 0.01,
            radiation: 300.0,
            wind_speed: 2.0,
            soil_temp: air_temp - 2.0,
            co2: 390.0,
        }
    }

    #[test]
    fn grid_layout_is_hour_major() {
        // 2 hours over a 1x2 grid
        let records = vec![record(1.0), record(2.0), record(3.0), record(4.0)];
        let forcing = InMemoryForcing::new(1, 2, records).unwrap();

        assert_eq!(forcing.hour_count(), 2);
        assert_eq!(
            forcing.meteorology(0, GridCell::new(0, 1)).unwrap().air_temp,
            2.0
        );
        assert_eq!(
            forcing.meteorology(1, GridCell::new(0, 0)).unwrap().air_temp,
            3.0
        );
    }

    #[test]
    fn rejects_ragged_records() {
        let err = InMemoryForcing::new(2, 2, vec![record(0.0); 5]).unwrap_err();
        assert!(matches!(err, ClimateError::ShapeMismatch { .. }));
    }

    #[test]
    fn out_of_range_access_is_an_error() {
        let forcing = InMemoryForcing::single_cell(vec![record(0.0); 24]);
        assert_eq!(
            forcing.meteorology(24, GridCell::default()),
            Err(ClimateError::HourOutOfRange { hour: 24, len: 24 })
        );
        assert!(matches!(
            forcing.meteorology(0, GridCell::new(1, 0)),
            Err(ClimateError::CellOutOfRange { .. })
        ));
    }

    #[test]
    fn set_rewrites_one_record() {
        let mut forcing = InMemoryForcing::single_cell(vec![record(0.0); 24]);
        forcing.set(5, GridCell::default(), record(9.0)).unwrap();
        assert_eq!(
            forcing.meteorology(5, GridCell::default()).unwrap().air_temp,
            9.0
        );
        assert_eq!(
            forcing.meteorology(4, GridCell::default()).unwrap().air_temp,
            0.0
        );
    }

    #[test]
    fn from_quantities_uses_model_units() {
        let rec = HourlyForcing::from_quantities(
            degc(21.5),
            degc(18.0),
            0.012,
            w_per_m2(450.0),
            mps(3.0),
            400.0,
        );
        assert!((rec.air_temp - 21.5).abs() < 1e-9);
        assert!((rec.soil_temp - 18.0).abs() < 1e-9);
        assert!((rec.radiation - 450.0).abs() < 1e-9);
        assert!((rec.wind_speed - 3.0).abs() < 1e-12);
    }
}
