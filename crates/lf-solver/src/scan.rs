//! Bounded coarse-to-fine conductance scan.
//!
//! Pass `j` walks upward from the current start in steps of `step / 10^j`
//! until the residual changes sign, then keeps the sample just before the
//! change and restarts the next pass one finer step above it. The scan never
//! leaves `[floor, ceiling)`.

use crate::residual::{LeafResidual, Sample};

/// What the scan settles on.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ScanOutcome {
    /// Sample at the minimum conductance
    pub floor: Sample,
    /// Retained conductance
    pub conductance: f64,
    /// Net assimilation at the retained conductance (dark respiration at the floor)
    pub assimilation: f64,
    /// Transpiration at the retained conductance
    pub transpiration: f64,
    /// Residual evaluations, floor included
    pub evaluations: usize,
}

/// Sign change between consecutive residuals. A zero counts against the
/// opposite sign on either side.
#[inline]
fn sign_changed(current: f64, previous: f64) -> bool {
    (current < 0.0 && previous >= 0.0) || (current > 0.0 && previous <= 0.0)
}

/// Moves `g` one step up. A step below the resolution of `g` ends the pass.
#[inline]
fn advance(g: &mut f64, step: f64) -> bool {
    let next = *g + step;
    let moved = next != *g;
    *g = next;
    moved
}

pub(crate) fn scan(residual: &LeafResidual<'_>) -> ScanOutcome {
    let c = residual.constants;
    let floor_g = c.min_conductance;
    let ceiling = c.conductance_ceiling();
    let dark = residual.is_dark();

    let floor = residual.evaluate(floor_g);
    let mut evaluations = 1;

    let mut retained_g = floor_g;
    let mut assimilation = -floor.respiration;
    let mut transpiration = floor.transpiration;
    let mut last = floor;
    // Set once the floor has been visited; cleared by a sign change. While
    // set, the remaining passes have nothing to refine.
    let mut settled = false;

    let mut g = floor_g;
    for pass in 0..c.precision {
        let step = c.pass_step(pass);
        let mut stop = settled;
        while !stop && g < ceiling {
            if g == floor_g {
                retained_g = floor_g;
                assimilation = -floor.respiration;
                transpiration = floor.transpiration;
                last = floor;
                settled = true;
                if dark {
                    stop = true;
                }
                stop |= !advance(&mut g, step);
                continue;
            }

            let s = residual.evaluate(g);
            evaluations += 1;
            if sign_changed(s.residual, last.residual) {
                retained_g = last.g;
                assimilation = last.net_assimilation;
                transpiration = last.transpiration;
                settled = false;
                stop = true;
            } else {
                last = s;
                stop = !advance(&mut g, step);
            }
        }
        g = retained_g + c.pass_step(pass + 1);
    }

    ScanOutcome {
        floor,
        conductance: retained_g,
        assimilation,
        transpiration,
        evaluations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SolverConstants;
    use crate::pathway::Pathway;

    fn leaf(constants: &SolverConstants, absorbed: f64) -> LeafResidual<'_> {
        LeafResidual::new(constants, Pathway::C3, 50e-6, 400e-6, 25.0, 0.015, absorbed)
    }

    #[test]
    fn zero_counts_as_a_sign_change() {
        assert!(sign_changed(-1.0, 0.0));
        assert!(sign_changed(1.0, 0.0));
        assert!(sign_changed(0.0, -1.0));
        assert!(!sign_changed(0.0, 0.0));
        assert!(!sign_changed(2.0, 1.0));
        assert!(!sign_changed(f64::NAN, 1.0));
    }

    #[test]
    fn dark_leaf_stops_at_the_floor() {
        let c = SolverConstants::default();
        let out = scan(&leaf(&c, 0.0));
        assert_eq!(out.conductance, c.min_conductance);
        assert_eq!(out.assimilation, -out.floor.respiration);
        assert_eq!(out.transpiration, out.floor.transpiration);
        assert_eq!(out.evaluations, 1);
    }

    #[test]
    fn lit_leaf_brackets_the_sign_change() {
        let c = SolverConstants::default();
        let r = leaf(&c, 400.0);
        let out = scan(&r);
        assert!(out.conductance > c.min_conductance);
        assert!(out.conductance < c.conductance_ceiling());

        // Retained sample is on the positive side; one finest step above is not.
        let finest = c.finest_step();
        assert!(r.evaluate(out.conductance).residual >= 0.0);
        assert!(r.evaluate(out.conductance + finest).residual <= 0.0);
        assert!(out.assimilation > 0.0);
    }

    #[test]
    fn unresolvable_steps_end_the_scan() {
        // Unvalidated constants: late passes step by less than an ulp of g.
        let c = SolverConstants {
            precision: 40,
            ..SolverConstants::default()
        };
        let reference = scan(&leaf(&SolverConstants::default(), 500.0));
        let out = scan(&leaf(&c, 500.0));
        assert!(out.conductance >= reference.conductance);
        assert!(out.conductance < reference.conductance + 1e-8);
        assert!(out.evaluations < 10_000, "{}", out.evaluations);
    }

    #[test]
    fn stalled_step_reports_no_progress() {
        let mut g = 1.0;
        assert!(advance(&mut g, 0.5));
        assert_eq!(g, 1.5);
        assert!(!advance(&mut g, 1e-20));
        assert_eq!(g, 1.5);
    }

    #[test]
    fn coarser_scan_retains_a_lower_or_equal_conductance() {
        let fine = SolverConstants::default();
        let coarse = SolverConstants {
            precision: 1,
            ..SolverConstants::default()
        };
        let g_fine = scan(&leaf(&fine, 400.0)).conductance;
        let g_coarse = scan(&leaf(&coarse, 400.0)).conductance;
        assert!(g_coarse <= g_fine);
        assert!(g_fine - g_coarse < coarse.conductance_step + 1e-9);
    }
}
