//! Simulation file validation.

use crate::schema::{AxisDef, MechanismModeDef, SCHEMA_VERSION, SimulationDef};
use lf_core::units::constants::HOURS_PER_PERIOD;
use std::collections::HashSet;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate species name: {name}")]
    DuplicateSpecies { name: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing section: {what}")]
    Missing { what: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: impl Into<String>, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn positive(field: &str, v: f64) -> Result<(), ValidationError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, v, "must be positive and finite"))
    }
}

pub fn validate_simulation(sim: &SimulationDef) -> Result<(), ValidationError> {
    if sim.version > SCHEMA_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: sim.version,
        });
    }

    let lat = sim.site.latitude;
    if !(-90.0..=90.0).contains(&lat) {
        return Err(invalid("site.latitude", lat, "must be within [-90, 90]"));
    }

    let s = &sim.solver;
    positive("solver.min_conductance", s.min_conductance)?;
    positive("solver.conductance_step", s.conductance_step)?;
    if !s.quantum_efficiency_c3.is_finite() || !s.quantum_efficiency_c4.is_finite() {
        return Err(invalid(
            "solver.quantum_efficiency",
            format!("{}/{}", s.quantum_efficiency_c3, s.quantum_efficiency_c4),
            "must be finite",
        ));
    }
    if s.boundary_layer {
        positive("solver.boundary_conductance", s.boundary_conductance)?;
    }
    if s.precision == 0 {
        return Err(invalid("solver.precision", 0, "must be at least 1"));
    }
    if !s.to_constants().resolves_finest_step() {
        return Err(invalid(
            "solver.precision",
            s.precision,
            "finest conductance step is below floating-point resolution",
        ));
    }

    validate_species(sim)?;
    validate_mechanism(sim)?;
    validate_forcing(sim)
}

fn validate_species(sim: &SimulationDef) -> Result<(), ValidationError> {
    if sim.species.is_empty() {
        return Err(ValidationError::Missing {
            what: "species".to_string(),
        });
    }
    let mut names = HashSet::new();
    for sp in &sim.species {
        if !names.insert(&sp.name) {
            return Err(ValidationError::DuplicateSpecies {
                name: sp.name.clone(),
            });
        }
        positive(&format!("species.{}.vm0", sp.name), sp.vm0)?;
        if sp.light_levels.is_empty() {
            return Err(ValidationError::Missing {
                what: format!("species.{}.light_levels", sp.name),
            });
        }
        if let Some(bad) = sp.light_levels.iter().find(|l| !(0.0..=1.0).contains(*l)) {
            return Err(invalid(
                format!("species.{}.light_levels", sp.name),
                bad,
                "must be within [0, 1]",
            ));
        }
    }
    Ok(())
}

fn validate_axis(field: &str, axis: &AxisDef) -> Result<(), ValidationError> {
    positive(&format!("{field}.width"), axis.width)?;
    if !axis.origin.is_finite() {
        return Err(invalid(format!("{field}.origin"), axis.origin, "must be finite"));
    }
    if axis.count == 0 {
        return Err(invalid(format!("{field}.count"), 0, "must be at least 1"));
    }
    Ok(())
}

fn validate_mechanism(sim: &SimulationDef) -> Result<(), ValidationError> {
    let Some(lookup) = &sim.mechanism.lookup else {
        if sim.mechanism.mode == MechanismModeDef::LookupTable {
            return Err(ValidationError::Missing {
                what: "mechanism.lookup".to_string(),
            });
        }
        return Ok(());
    };

    validate_axis("mechanism.lookup.temperature", &lookup.temperature)?;
    validate_axis("mechanism.lookup.humidity", &lookup.humidity)?;
    validate_axis("mechanism.lookup.radiation", &lookup.radiation)?;
    if lookup.light_bins.is_empty() || lookup.light_bins.windows(2).any(|w| w[0] >= w[1]) {
        return Err(invalid(
            "mechanism.lookup.light_bins",
            format!("{:?}", lookup.light_bins),
            "must be non-empty and strictly ascending",
        ));
    }
    if let Some(&last) = lookup.light_bins.last() {
        for sp in &sim.species {
            if last >= sp.light_levels.len() {
                return Err(invalid(
                    "mechanism.lookup.light_bins",
                    last,
                    &format!("beyond the light levels of species {}", sp.name),
                ));
            }
        }
    }
    Ok(())
}

fn validate_forcing(sim: &SimulationDef) -> Result<(), ValidationError> {
    let f = &sim.forcing;
    let cells = f.rows * f.cols;
    if cells == 0 {
        return Err(invalid("forcing.rows x cols", format!("{}x{}", f.rows, f.cols), "empty grid"));
    }
    if f.hours.len() % cells != 0 {
        return Err(invalid(
            "forcing.hours",
            f.hours.len(),
            &format!("not a multiple of the {cells} grid cells"),
        ));
    }
    let hours = f.hours.len() / cells;
    if hours == 0 || hours % HOURS_PER_PERIOD != 0 {
        return Err(invalid(
            "forcing.hours",
            hours,
            "hours per cell must be a positive multiple of 24",
        ));
    }
    if sim.site.grid_row >= f.rows || sim.site.grid_col >= f.cols {
        return Err(invalid(
            "site.grid",
            format!("({}, {})", sim.site.grid_row, sim.site.grid_col),
            "outside the forcing grid",
        ));
    }
    for (i, h) in f.hours.iter().enumerate() {
        let values = [h.air_temp, h.humidity, h.radiation, h.wind_speed, h.soil_temp, h.co2];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(invalid(format!("forcing.hours[{i}]"), "non-finite", "must be finite"));
        }
        if h.radiation < 0.0 || h.humidity < 0.0 || h.co2 < 0.0 {
            return Err(invalid(
                format!("forcing.hours[{i}]"),
                format!("radiation {} humidity {} co2 {}", h.radiation, h.humidity, h.co2),
                "must be non-negative",
            ));
        }
    }
    Ok(())
}
