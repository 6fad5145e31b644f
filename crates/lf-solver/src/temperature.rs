//! Temperature responses shared by the leaf and soil calculations.

use crate::pathway::Pathway;

/// Offset from °C to the kelvin scale used by the empirical fits.
const KELVIN_OFFSET: f64 = 273.2;
/// Reference temperature of the Arrhenius terms [K].
const REFERENCE_K: f64 = 288.2;
/// Activation term of the Vmax response.
const VMAX_ACTIVATION: f64 = 3000.0;
/// Steepness of the logistic shutdown [1/°C].
const SHUTDOWN_STEEPNESS: f64 = 0.4;

/// `exp(activation · (1/288.2 − 1/T))` with `t` in °C.
#[inline]
pub(crate) fn arrhenius(t: f64, activation: f64) -> f64 {
    (activation * (1.0 / REFERENCE_K - 1.0 / (t + KELVIN_OFFSET))).exp()
}

/// Logistic cold/warm shutdown divisor for `t` in °C.
#[inline]
pub(crate) fn shutdown(t: f64, pathway: Pathway) -> f64 {
    let (cold, warm) = pathway.shutdown_range();
    (1.0 + (SHUTDOWN_STEEPNESS * (cold - t)).exp()) * (1.0 + (SHUTDOWN_STEEPNESS * (t - warm)).exp())
}

/// Temperature response factor of Vmax-scaled processes at `t` °C.
pub fn temperature_factor(t: f64, pathway: Pathway) -> f64 {
    arrhenius(t, VMAX_ACTIVATION) / shutdown(t, pathway)
}

/// Vmax scaled by leaf temperature, with shutdown driven by air temperature.
#[inline]
pub(crate) fn scaled_vmax(vmax: f64, leaf_temp: f64, air_temp: f64, pathway: Pathway) -> f64 {
    vmax * arrhenius(leaf_temp, VMAX_ACTIVATION) / shutdown(air_temp, pathway)
}

/// Saturation humidity [mol/mol] at `t` °C.
pub fn saturation_humidity(t: f64) -> f64 {
    2541400.0 * (-5415.0 / (t + KELVIN_OFFSET)).exp()
}

/// Derivative of [`saturation_humidity`] with respect to temperature.
pub(crate) fn saturation_slope(t: f64, saturation: f64) -> f64 {
    5415.0 * saturation / ((t + KELVIN_OFFSET) * (t + KELVIN_OFFSET))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrhenius_is_one_at_reference() {
        assert!((arrhenius(15.0, VMAX_ACTIVATION) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn factor_collapses_outside_the_active_range() {
        let mid = temperature_factor(25.0, Pathway::C3);
        assert!(temperature_factor(-10.0, Pathway::C3) < 0.01 * mid);
        assert!(temperature_factor(60.0, Pathway::C3) < 0.01 * mid);
    }

    #[test]
    fn c4_tolerates_more_heat() {
        assert!(temperature_factor(47.0, Pathway::C4) > temperature_factor(47.0, Pathway::C3));
        assert!(temperature_factor(6.0, Pathway::C3) > temperature_factor(6.0, Pathway::C4));
    }

    #[test]
    fn saturation_humidity_near_known_value() {
        // About 3.3% by mole at 25 °C.
        let hs = saturation_humidity(25.0);
        assert!((hs - 0.0331).abs() < 5e-4, "{hs}");
        let slope = saturation_slope(25.0, hs);
        let numeric = (saturation_humidity(25.001) - saturation_humidity(24.999)) / 0.002;
        assert!((slope - numeric).abs() / numeric < 1e-3);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn factor_is_bounded(t in -50.0_f64..60.0, c4 in any::<bool>()) {
            let pathway = if c4 { Pathway::C4 } else { Pathway::C3 };
            let tf = temperature_factor(t, pathway);
            prop_assert!(tf >= 0.0 && tf < 2.5, "t {t}: {tf}");
        }
    }
}
