//! Physiological constants of the leaf solver.

use crate::error::{SolverError, SolverResult};
use lf_core::numeric::{ensure_finite, ensure_positive};

/// Pathway-independent constants, fixed for a simulation run.
#[derive(Clone, Debug, PartialEq)]
pub struct SolverConstants {
    /// Boundary-layer conductance (GB), used only when `boundary_layer` is set
    pub boundary_conductance: f64,
    /// Canopy light-absorption coefficient (KAPPA)
    pub absorption: f64,
    /// Latent heat of vaporization per mole (LAM)
    pub latent_heat: f64,
    /// Heat capacity of air per mole (CP)
    pub heat_capacity: f64,
    /// Conductance for sensible heat (GH)
    pub heat_conductance: f64,
    /// Humidity-deficit sensitivity of the stomatal model (D0)
    pub deficit_sensitivity: f64,
    /// Light-response coefficient φ₃ of C3 plants
    pub quantum_efficiency_c3: f64,
    /// Light-response coefficient φ₄ of C4 plants
    pub quantum_efficiency_c4: f64,
    /// Minimum (shut) stomatal conductance, the scan floor (B)
    pub min_conductance: f64,
    /// Conductance step of the first scan pass
    pub conductance_step: f64,
    /// Number of refinement passes; each shrinks the step tenfold
    pub precision: usize,
    /// Route CO₂ and heat through an explicit boundary layer
    pub boundary_layer: bool,
    /// Shortwave W/m² to mol quanta/m²/s PAR
    pub par_per_watt: f64,
}

impl Default for SolverConstants {
    fn default() -> Self {
        Self {
            boundary_conductance: 3.0,
            absorption: 0.5,
            latent_heat: 45000.0,
            heat_capacity: 1280.1,
            heat_conductance: 0.03,
            deficit_sensitivity: 0.01,
            quantum_efficiency_c3: 0.08,
            quantum_efficiency_c4: 0.06,
            min_conductance: 0.01,
            conductance_step: 1.0,
            precision: 10,
            boundary_layer: false,
            par_per_watt: 0.0000023,
        }
    }
}

impl SolverConstants {
    /// Upper bound of the conductance scan.
    ///
    /// Truncated to a whole number, so the default floor and step give 10.
    pub fn conductance_ceiling(&self) -> f64 {
        (self.min_conductance + 10.0 * self.conductance_step).trunc()
    }

    /// Conductance step of refinement pass `pass` (0-based).
    pub fn pass_step(&self, pass: usize) -> f64 {
        self.conductance_step / (pass as f64 * std::f64::consts::LN_10).exp()
    }

    /// Step of the last refinement pass.
    pub fn finest_step(&self) -> f64 {
        self.pass_step(self.precision.saturating_sub(1))
    }

    /// Whether the finest step still moves a conductance at the ceiling.
    pub fn resolves_finest_step(&self) -> bool {
        let ceiling = self.conductance_ceiling();
        ceiling + self.finest_step() != ceiling
    }

    /// Rejects constants that would make the solver divide by zero or never scan.
    pub fn validate(&self) -> SolverResult<()> {
        ensure_positive(self.absorption, "absorption")?;
        ensure_positive(self.latent_heat, "latent_heat")?;
        ensure_positive(self.heat_capacity, "heat_capacity")?;
        ensure_positive(self.heat_conductance, "heat_conductance")?;
        ensure_positive(self.deficit_sensitivity, "deficit_sensitivity")?;
        ensure_positive(self.min_conductance, "min_conductance")?;
        ensure_positive(self.conductance_step, "conductance_step")?;
        ensure_positive(self.par_per_watt, "par_per_watt")?;
        ensure_finite(self.quantum_efficiency_c3, "quantum_efficiency_c3")?;
        ensure_finite(self.quantum_efficiency_c4, "quantum_efficiency_c4")?;
        if self.boundary_layer {
            ensure_positive(self.boundary_conductance, "boundary_conductance")?;
        }
        if self.precision == 0 {
            return Err(SolverError::InvalidConstant {
                what: "precision must be at least 1".to_string(),
            });
        }
        if !self.resolves_finest_step() {
            return Err(SolverError::InvalidConstant {
                what: format!(
                    "precision {} gives a finest step {:e} below the resolution of conductance {}",
                    self.precision,
                    self.finest_step(),
                    self.conductance_ceiling()
                ),
            });
        }
        if self.conductance_ceiling() <= self.min_conductance {
            return Err(SolverError::InvalidConstant {
                what: format!(
                    "conductance ceiling {} does not exceed floor {}",
                    self.conductance_ceiling(),
                    self.min_conductance
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let c = SolverConstants::default();
        c.validate().unwrap();
        assert_eq!(c.conductance_ceiling(), 10.0);
    }

    #[test]
    fn zero_heat_conductance_rejected() {
        let c = SolverConstants {
            heat_conductance: 0.0,
            ..SolverConstants::default()
        };
        assert!(matches!(c.validate(), Err(SolverError::Numeric(_))));
    }

    #[test]
    fn boundary_conductance_checked_only_when_enabled() {
        let mut c = SolverConstants {
            boundary_conductance: 0.0,
            ..SolverConstants::default()
        };
        c.validate().unwrap();
        c.boundary_layer = true;
        assert!(c.validate().is_err());
    }

    #[test]
    fn ceiling_must_exceed_floor() {
        let c = SolverConstants {
            conductance_step: 0.05,
            ..SolverConstants::default()
        };
        // 0.01 + 0.5 truncates to 0
        assert!(matches!(
            c.validate(),
            Err(SolverError::InvalidConstant { .. })
        ));
    }

    #[test]
    fn precision_limited_by_float_resolution() {
        for precision in [1, 10, 12] {
            let c = SolverConstants {
                precision,
                ..SolverConstants::default()
            };
            c.validate().unwrap();
        }
        for precision in [17, 20, 40] {
            let c = SolverConstants {
                precision,
                ..SolverConstants::default()
            };
            assert!(!c.resolves_finest_step());
            assert!(matches!(
                c.validate(),
                Err(SolverError::InvalidConstant { .. })
            ));
        }
    }

    #[test]
    fn pass_steps_shrink_tenfold() {
        let c = SolverConstants::default();
        assert_eq!(c.pass_step(0), 1.0);
        assert!((c.pass_step(2) - 0.01).abs() < 1e-15);
        assert_eq!(c.finest_step(), c.pass_step(9));
    }

    #[test]
    fn zero_precision_rejected() {
        let c = SolverConstants {
            precision: 0,
            ..SolverConstants::default()
        };
        assert!(c.validate().is_err());
    }
}
