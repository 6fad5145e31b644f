//! lf-project: simulation file format, validation and compilation.
//!
//! Files are YAML or JSON; the format follows the extension. Every load and
//! save runs [`validate_simulation`].

pub mod compile;
pub mod schema;
pub mod validate;

use std::path::Path;

pub use compile::{CompiledSimulation, compile_simulation};
pub use schema::*;
pub use validate::{ValidationError, validate_simulation};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("invalid simulation: {0}")]
    Validation(#[from] ValidationError),

    #[error("solver setup failed: {0}")]
    Solver(#[from] lf_solver::SolverError),

    #[error("mechanism cache failed: {0}")]
    Mechanism(#[from] lf_mech::MechError),

    #[error("forcing unavailable: {0}")]
    Climate(#[from] lf_climate::ClimateError),

    #[error("cannot access simulation file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk encoding of a simulation file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Json,
}

impl FileFormat {
    /// `.json` is JSON; anything else is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }

    pub fn parse(self, text: &str) -> ProjectResult<SimulationDef> {
        let sim = match self {
            Self::Yaml => serde_yaml::from_str(text)?,
            Self::Json => serde_json::from_str(text)?,
        };
        validate_simulation(&sim)?;
        Ok(sim)
    }

    pub fn render(self, sim: &SimulationDef) -> ProjectResult<String> {
        validate_simulation(sim)?;
        Ok(match self {
            Self::Yaml => serde_yaml::to_string(sim)?,
            Self::Json => serde_json::to_string_pretty(sim)?,
        })
    }
}

/// Read and validate a simulation file, choosing the format by extension.
pub fn load(path: &Path) -> ProjectResult<SimulationDef> {
    FileFormat::from_path(path).parse(&std::fs::read_to_string(path)?)
}

/// Validate and write a simulation file, choosing the format by extension.
pub fn save(path: &Path, sim: &SimulationDef) -> ProjectResult<()> {
    let text = FileFormat::from_path(path).render(sim)?;
    std::fs::write(path, text)?;
    Ok(())
}

pub fn load_yaml(path: &Path) -> ProjectResult<SimulationDef> {
    FileFormat::Yaml.parse(&std::fs::read_to_string(path)?)
}

pub fn save_yaml(path: &Path, sim: &SimulationDef) -> ProjectResult<()> {
    std::fs::write(path, FileFormat::Yaml.render(sim)?)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<SimulationDef> {
    FileFormat::Json.parse(&std::fs::read_to_string(path)?)
}

pub fn save_json(path: &Path, sim: &SimulationDef) -> ProjectResult<()> {
    std::fs::write(path, FileFormat::Json.render(sim)?)?;
    Ok(())
}
