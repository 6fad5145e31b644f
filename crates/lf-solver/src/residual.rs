//! Assimilation / conductance coupling residual.
//!
//! For a trial stomatal conductance `g` the leaf temperature, internal CO₂ and
//! gross assimilation follow in closed form. The residual is net assimilation
//! minus the CO₂ the stomata can supply at that conductance; the solver looks
//! for its sign change.

use crate::constants::SolverConstants;
use crate::pathway::Pathway;
use crate::temperature::{arrhenius, saturation_humidity, saturation_slope, scaled_vmax};

/// Ratio of the diffusivities of water vapor and CO₂.
const DIFFUSIVITY_RATIO: f64 = 1.6;
/// O₂ mole fraction.
const OXYGEN: f64 = 0.209;
/// Initial slope of the C4 CO₂-supply limit.
const C4_CO2_SLOPE: f64 = 18000.0;
/// Boundary-layer conductance conversion for heat.
const BOUNDARY_HEAT_DIVISOR: f64 = 1.275;
const BOUNDARY_HEAT_FACTOR: f64 = 0.029;

/// Everything about one leaf and hour that does not depend on `g`.
pub(crate) struct LeafResidual<'a> {
    pub constants: &'a SolverConstants,
    pub pathway: Pathway,
    /// Vmax [mol/m²/s]
    pub vmax: f64,
    /// Ambient CO₂ [mol/mol]
    pub ca: f64,
    /// Air temperature [°C]
    pub air_temp: f64,
    /// Ambient humidity [mol/mol]
    pub vapor_pressure: f64,
    /// Absorbed shortwave [W/m²]
    pub absorbed: f64,
    /// Photon flux [mol/m²/s]
    pub lite: f64,
    /// Saturation humidity of air
    pub air_saturation: f64,
    /// Its temperature derivative
    pub air_saturation_slope: f64,
}

/// State of the coupled system at one trial conductance.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Sample {
    pub g: f64,
    pub residual: f64,
    pub net_assimilation: f64,
    pub transpiration: f64,
    /// Dark respiration `gg2 · vm`
    pub respiration: f64,
}

impl<'a> LeafResidual<'a> {
    pub fn new(
        constants: &'a SolverConstants,
        pathway: Pathway,
        vmax: f64,
        ca: f64,
        air_temp: f64,
        vapor_pressure: f64,
        absorbed: f64,
    ) -> Self {
        let air_saturation = saturation_humidity(air_temp);
        Self {
            constants,
            pathway,
            vmax,
            ca,
            air_temp,
            vapor_pressure,
            absorbed,
            lite: absorbed * constants.par_per_watt,
            air_saturation,
            air_saturation_slope: saturation_slope(air_temp, air_saturation),
        }
    }

    /// Whether there is too little light for any assimilation.
    pub fn is_dark(&self) -> bool {
        self.lite < 0.00000001
    }

    pub fn evaluate(&self, g: f64) -> Sample {
        let c = self.constants;
        let ta = self.air_temp;
        let ea = self.vapor_pressure;
        let ca = self.ca;
        let floor = c.min_conductance;
        let gb = c.boundary_conductance;

        let (g_adj, gh_adj) = if c.boundary_layer {
            (
                gb / (g + gb),
                gb / BOUNDARY_HEAT_DIVISOR * BOUNDARY_HEAT_FACTOR / c.heat_conductance,
            )
        } else {
            (1.0, 1.0)
        };

        // Leaf energy balance; transpiration never cools the leaf below air.
        let mut tl = ta
            + (self.absorbed * c.absorption
                - c.latent_heat * g * g_adj * (self.air_saturation - ea))
                / (c.heat_capacity * c.heat_conductance * gh_adj
                    + c.latent_heat * g * g_adj * self.air_saturation_slope);
        if tl < ta {
            tl = ta;
        }

        let ds = saturation_humidity(tl) - ea;
        let capgam = OXYGEN / (9000.0 * arrhenius(tl, -5000.0));
        let ko = 0.25 * arrhenius(tl, 1400.0);
        let kc = 0.00015 * arrhenius(tl, 6000.0);
        let vm = scaled_vmax(self.vmax, tl, ta, self.pathway);
        let m = self.pathway.stomatal_slope();
        let deficit = 1.0 + ds / c.deficit_sensitivity;

        let ci = if c.boundary_layer {
            let num = (g - floor) * deficit * (capgam * (g + gb) - ca * gb)
                + m * ca * gb * g / DIFFUSIVITY_RATIO;
            num / ((g - floor) * deficit * g + m * gb * g / DIFFUSIVITY_RATIO)
        } else {
            let drawdown = (g - floor) * (ca - capgam) * deficit / m;
            ca - DIFFUSIVITY_RATIO * drawdown / g
        };

        let gross = match self.pathway {
            Pathway::C4 => {
                let light = self.pathway.quantum_efficiency(c) * self.lite * c.absorption;
                let supply = C4_CO2_SLOPE * vm * ci;
                let an = if light < vm { light } else { vm };
                if supply < an { supply } else { an }
            }
            Pathway::C3 => {
                let light = self.pathway.quantum_efficiency(c) * self.lite * c.absorption
                    * (ci - capgam)
                    / (ci + capgam);
                let enzyme = vm * (ci - capgam) / (ci + kc * (1.0 + OXYGEN / ko));
                if light < enzyme { light } else { enzyme }
            }
        };

        let respiration = self.pathway.respiration_fraction() * vm;
        let net_assimilation = gross - respiration;

        let supplied = if c.boundary_layer {
            g * g_adj * (ca - ci)
        } else {
            g * g_adj * (ca - ci) / DIFFUSIVITY_RATIO
        };

        Sample {
            g,
            residual: net_assimilation - supplied,
            net_assimilation,
            transpiration: g * g_adj * ds,
            respiration,
        }
    }
}
