//! Float comparison and argument checks for configuration boundaries.

use crate::LfError;

/// Scalar type of every model quantity.
pub type Real = f64;

/// Absolute and relative comparison tolerance.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

/// `a` and `b` agree within the absolute or the relative tolerance.
pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    diff <= tol.abs || diff <= tol.rel * a.abs().max(b.abs())
}

/// Rejects NaN and infinities.
pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, LfError> {
    v.is_finite()
        .then_some(v)
        .ok_or(LfError::NonFinite { what, value: v })
}

/// Checks that a finite value lies in the closed interval `[min, max]`.
pub fn ensure_in_range(v: Real, min: Real, max: Real, what: &'static str) -> Result<Real, LfError> {
    let v = ensure_finite(v, what)?;
    if (min..=max).contains(&v) {
        Ok(v)
    } else {
        Err(LfError::OutOfRange {
            what,
            value: v,
            min,
            max,
        })
    }
}

/// Checks that a finite value is strictly positive.
pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, LfError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(LfError::NotPositive { what, value: v })
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn nearly_equal_is_symmetric(a in -1e6_f64..1e6, b in -1e6_f64..1e6) {
            let tol = Tolerances::default();
            prop_assert_eq!(nearly_equal(a, b, tol), nearly_equal(b, a, tol));
        }

        #[test]
        fn in_range_values_pass_through(v in 0.0_f64..=1.0) {
            prop_assert_eq!(ensure_in_range(v, 0.0, 1.0, "v").unwrap(), v);
        }
    }
}
