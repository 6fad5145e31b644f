use lf_project::schema::*;
use lf_project::{ProjectError, ValidationError, compile_simulation, validate_simulation};
use lf_core::{PeriodId, SpeciesId};
use std::path::Path;

fn demo() -> SimulationDef {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/temperate_site.yaml");
    lf_project::load_yaml(&path).unwrap_or_else(|e| panic!("failed to load demo: {e}"))
}

#[test]
fn demo_loads_and_compiles() {
    let sim = demo();
    assert_eq!(sim.forcing.hours.len(), 24 * 12);
    let compiled = compile_simulation(&sim).unwrap();
    assert_eq!(compiled.species.len(), 3);
    assert_eq!(compiled.clock.year, 1990);

    let mut cache = compiled.build_cache().unwrap();
    let fluxes = cache
        .leaf_fluxes(
            SpeciesId::from_index(0),
            PeriodId::from_index(6),
            compiled.clock,
            &compiled.forcing,
            &compiled.solver,
        )
        .unwrap();
    assert!(fluxes.an_pot > 0.0, "{fluxes:?}");
}

#[test]
fn duplicate_species_rejected() {
    let mut sim = demo();
    let copy = sim.species[0].clone();
    sim.species.push(copy);
    assert!(matches!(
        validate_simulation(&sim),
        Err(ValidationError::DuplicateSpecies { .. })
    ));
}

#[test]
fn bad_values_rejected() {
    let mut sim = demo();
    sim.site.latitude = 91.0;
    assert!(validate_simulation(&sim).is_err());

    let mut sim = demo();
    sim.species[1].light_levels.push(1.2);
    assert!(validate_simulation(&sim).is_err());

    let mut sim = demo();
    sim.solver.precision = 0;
    assert!(validate_simulation(&sim).is_err());

    let mut sim = demo();
    sim.solver.precision = 20;
    assert!(matches!(
        validate_simulation(&sim),
        Err(ValidationError::InvalidValue { field, .. }) if field == "solver.precision"
    ));

    let mut sim = demo();
    sim.forcing.hours.pop();
    assert!(validate_simulation(&sim).is_err());

    let mut sim = demo();
    sim.site.grid_col = 1;
    assert!(validate_simulation(&sim).is_err());

    let mut sim = demo();
    sim.version = SCHEMA_VERSION + 1;
    assert!(matches!(
        validate_simulation(&sim),
        Err(ValidationError::UnsupportedVersion { .. })
    ));
}

#[test]
fn lookup_mode_needs_a_valid_table() {
    let mut sim = demo();
    sim.mechanism.mode = MechanismModeDef::LookupTable;
    assert!(matches!(
        validate_simulation(&sim),
        Err(ValidationError::Missing { .. })
    ));

    let axis = |width: f64, count: usize| AxisDef {
        origin: 0.0,
        width,
        count,
    };
    sim.mechanism.lookup = Some(LookupDef {
        temperature: axis(0.5, 200),
        humidity: axis(0.001, 40),
        radiation: axis(10.0, 120),
        light_bins: vec![0, 2, 2],
    });
    assert!(validate_simulation(&sim).is_err());

    // The C4 grass only has three light levels.
    if let Some(lookup) = sim.mechanism.lookup.as_mut() {
        lookup.light_bins = vec![0, 3];
    }
    assert!(validate_simulation(&sim).is_err());

    if let Some(lookup) = sim.mechanism.lookup.as_mut() {
        lookup.light_bins = vec![0, 2];
    }
    validate_simulation(&sim).unwrap();
}

#[test]
fn compile_rejects_invalid_solver_constants() {
    let mut sim = demo();
    // 0.01 + 10 * 0.05 truncates to a zero ceiling
    sim.solver.conductance_step = 0.05;
    assert!(matches!(
        compile_simulation(&sim),
        Err(ProjectError::Solver(_))
    ));
}
