use clap::{Parser, Subcommand, ValueEnum};
use lf_climate::{DownregulationTable, FrostFlags, MeteorologicalSample, MeteorologyProvider, day_length};
use lf_core::units::constants::{HOURS_PER_PERIOD, PERIODS_PER_YEAR, STANDARD_PRESSURE_KPA};
use lf_core::{PeriodId, SpeciesId};
use lf_project::{CompiledSimulation, ProjectResult, compile_simulation};
use lf_solver::{FarquharSolver, LeafSolver, Pathway, SolverConstants};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "lf-cli")]
#[command(about = "LeafFlux CLI - leaf photosynthesis and mechanism cache tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a simulation file
    Validate {
        /// Path to the simulation YAML or JSON file
        path: PathBuf,
    },
    /// Print day length and downregulation factors for a latitude
    DayLength {
        /// Latitude in degrees north
        #[arg(long, allow_hyphen_values = true)]
        latitude: f64,
        /// Single day of year instead of the period table
        #[arg(long)]
        day: Option<f64>,
    },
    /// Solve one leaf for one hour of forcing
    Solve {
        /// Vm0 [µmol/m²/s]
        #[arg(long, default_value_t = 50.0)]
        vmax: f64,
        /// Air temperature [°C]
        #[arg(long, default_value_t = 25.0, allow_hyphen_values = true)]
        air_temp: f64,
        /// Soil temperature [°C], defaults to air temperature
        #[arg(long, allow_hyphen_values = true)]
        soil_temp: Option<f64>,
        /// Humidity [mol/mol]
        #[arg(long, default_value_t = 0.015)]
        humidity: f64,
        /// Shortwave radiation [W/m²]
        #[arg(long, default_value_t = 500.0)]
        radiation: f64,
        /// CO₂ [µmol/mol]
        #[arg(long, default_value_t = 390.0)]
        co2: f64,
        /// Canopy transmission, 0..=1
        #[arg(long, default_value_t = 1.0)]
        shade: f64,
        #[arg(long, value_enum, default_value_t = PathwayArg::C3)]
        pathway: PathwayArg,
        /// Route CO₂ and heat through the boundary layer
        #[arg(long)]
        boundary_layer: bool,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Fill the mechanism cache for a site and print leaf fluxes
    Run {
        /// Path to the simulation YAML or JSON file
        path: PathBuf,
        /// Only this period (0-based)
        #[arg(long)]
        period: Option<u32>,
        /// Override the simulation year
        #[arg(long)]
        year: Option<i32>,
        /// Override the forcing snapshot id
        #[arg(long)]
        snapshot: Option<u32>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PathwayArg {
    C3,
    C4,
}

impl From<PathwayArg> for Pathway {
    fn from(p: PathwayArg) -> Self {
        match p {
            PathwayArg::C3 => Pathway::C3,
            PathwayArg::C4 => Pathway::C4,
        }
    }
}

#[derive(Serialize)]
struct SolveReport {
    tf: f64,
    a: f64,
    e: f64,
    ab: f64,
    eb: f64,
    tf_soil: f64,
}

#[derive(Serialize)]
struct FluxRow {
    species: String,
    period: u32,
    an_pot: f64,
    an_shut: f64,
    e_pot: f64,
    e_shut: f64,
    frost_cold_deciduous: bool,
    frost_evergreen_short: bool,
    frost_successional: bool,
}

fn main() -> ProjectResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { path } => cmd_validate(&path),
        Commands::DayLength { latitude, day } => {
            cmd_day_length(latitude, day);
            Ok(())
        }
        Commands::Solve {
            vmax,
            air_temp,
            soil_temp,
            humidity,
            radiation,
            co2,
            shade,
            pathway,
            boundary_layer,
            json,
        } => {
            let sample = MeteorologicalSample {
                air_temp,
                soil_temp: soil_temp.unwrap_or(air_temp),
                vapor_pressure: humidity,
                radiation,
                co2,
                wind_speed: 0.0,
                pressure: STANDARD_PRESSURE_KPA,
                growth_temp: air_temp,
                shade,
            };
            cmd_solve(vmax, &sample, pathway.into(), boundary_layer, json)
        }
        Commands::Run {
            path,
            period,
            year,
            snapshot,
            json,
        } => cmd_run(&path, period, year, snapshot, json),
    }
}

fn cmd_validate(path: &Path) -> ProjectResult<()> {
    println!("Validating simulation: {}", path.display());
    let sim = lf_project::load(path)?;
    compile_simulation(&sim)?;
    println!("✓ Simulation is valid");
    Ok(())
}

fn cmd_day_length(latitude: f64, day: Option<f64>) {
    if let Some(day) = day {
        println!(
            "Day {day}: {:.2} h (longest {:.2} h)",
            day_length(latitude, day, false),
            day_length(latitude, day, true)
        );
        return;
    }

    let table = DownregulationTable::for_latitude(latitude);
    println!("Latitude {latitude}:");
    for (p, factor) in table.factors().iter().enumerate() {
        let mid = lf_climate::period_mid_day(PeriodId::from_index(p as u32));
        println!(
            "  period {:>2}  day {:>3}  {:>5.2} h  factor {:.3}",
            p,
            mid,
            day_length(latitude, mid, false),
            factor
        );
    }
}

fn cmd_solve(
    vmax: f64,
    sample: &MeteorologicalSample,
    pathway: Pathway,
    boundary_layer: bool,
    json: bool,
) -> ProjectResult<()> {
    let solver = FarquharSolver::new(SolverConstants {
        boundary_layer,
        ..SolverConstants::default()
    })?;
    let out = solver.solve(vmax, sample, pathway);
    let report = SolveReport {
        tf: out.tf,
        a: out.a,
        e: out.e,
        ab: out.ab,
        eb: out.eb,
        tf_soil: out.tf_soil,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Temperature factor (air/soil): {:.4} / {:.4}", report.tf, report.tf_soil);
        println!("Net assimilation (open/shut):  {:.4e} / {:.4e} mol/m²/s", report.a, report.ab);
        println!("Transpiration (open/shut):     {:.4e} / {:.4e} mol/m²/s", report.e, report.eb);
    }
    Ok(())
}

fn cmd_run(
    path: &Path,
    period: Option<u32>,
    year: Option<i32>,
    snapshot: Option<u32>,
    json: bool,
) -> ProjectResult<()> {
    let sim = lf_project::load(path)?;
    let mut compiled = compile_simulation(&sim)?;
    if let Some(year) = year {
        compiled.clock.year = year;
    }
    if let Some(snapshot) = snapshot {
        compiled.clock.forcing_snapshot = snapshot;
    }

    let periods: Vec<u32> = match period {
        Some(p) => vec![p],
        None => {
            let available = (compiled.forcing.hour_count() / HOURS_PER_PERIOD).min(PERIODS_PER_YEAR);
            (0..available as u32).collect()
        }
    };
    info!(
        simulation = %compiled.name,
        periods = periods.len(),
        species = compiled.species.len(),
        "running mechanism cache"
    );

    let rows = run_rows(&compiled, &periods)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!("{} (year {})", compiled.name, compiled.clock.year);
        println!(
            "  {:<24} {:>6} {:>12} {:>12} {:>12} {:>12}  frost",
            "species", "period", "An pot", "An shut", "E pot", "E shut"
        );
        for r in &rows {
            let frost: String = [
                (r.frost_cold_deciduous, 'D'),
                (r.frost_evergreen_short, 'E'),
                (r.frost_successional, 'S'),
            ]
            .iter()
            .map(|&(on, c)| if on { c } else { '-' })
            .collect();
            println!(
                "  {:<24} {:>6} {:>12.4} {:>12.4} {:>12.4} {:>12.4}  {}",
                r.species, r.period, r.an_pot, r.an_shut, r.e_pot, r.e_shut, frost
            );
        }
    }
    Ok(())
}

fn run_rows(compiled: &CompiledSimulation, periods: &[u32]) -> ProjectResult<Vec<FluxRow>> {
    let mut cache = compiled.build_cache()?;
    let mut rows = Vec::new();
    for &p in periods {
        let period = PeriodId::from_index(p);
        let frost = FrostFlags::for_period(&compiled.forcing, period, compiled.cell)?;
        for (s, traits) in compiled.species.iter().enumerate() {
            let fluxes = cache.leaf_fluxes(
                SpeciesId::from_index(s as u32),
                period,
                compiled.clock,
                &compiled.forcing,
                &compiled.solver,
            )?;
            rows.push(FluxRow {
                species: traits.name.clone(),
                period: p,
                an_pot: fluxes.an_pot,
                an_shut: fluxes.an_shut,
                e_pot: fluxes.e_pot,
                e_shut: fluxes.e_shut,
                frost_cold_deciduous: frost.cold_deciduous,
                frost_evergreen_short: frost.evergreen_short,
                frost_successional: frost.successional,
            });
        }
    }
    Ok(rows)
}
