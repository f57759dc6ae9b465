//! Empirical end-pressure surfaces for wells, perforations and generic
//! analogue elements.
//!
//! A surface maps `(x, y)` to an end pressure in bara, where `x` is the mass
//! flowrate divided by the surface's split and `y` is the inbound pressure in
//! bara:
//!
//! ```text
//! end = intercept + Σ cᵢ · x^pxᵢ · y^pyᵢ
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::{PressureLimits, check_finite};
use crate::error::{ComponentError, ComponentResult};
use bf_core::units::{MassRate, Pressure, bara, pa, to_bara};

/// Polynomial surface in flowrate and inbound pressure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFunction {
    /// Number of parallel wells the flow is shared across.
    pub split: f64,
    pub intercept: f64,
    pub powers: Vec<[i32; 2]>,
    pub coefficients: Vec<f64>,
}

/// Quadratic terms shared by all built-in surfaces: x, y, x², xy, y².
const QUADRATIC: [[i32; 2]; 5] = [[1, 0], [0, 1], [2, 0], [1, 1], [0, 2]];

impl ModelFunction {
    pub fn new(
        split: f64,
        intercept: f64,
        powers: Vec<[i32; 2]>,
        coefficients: Vec<f64>,
    ) -> ComponentResult<Self> {
        let f = Self {
            split,
            intercept,
            powers,
            coefficients,
        };
        f.validate()?;
        Ok(f)
    }

    pub fn validate(&self) -> ComponentResult<()> {
        check_finite(self.split, "analogue split")?;
        check_finite(self.intercept, "analogue intercept")?;
        if self.split <= 0.0 {
            return Err(ComponentError::InvalidArg {
                what: format!("analogue split must be positive, got {}", self.split),
            });
        }
        if self.powers.len() != self.coefficients.len() {
            return Err(ComponentError::InvalidArg {
                what: format!(
                    "analogue has {} power pairs but {} coefficients",
                    self.powers.len(),
                    self.coefficients.len()
                ),
            });
        }
        for c in &self.coefficients {
            check_finite(*c, "analogue coefficient")?;
        }
        Ok(())
    }

    /// Well surface of a modelled reservoir.
    pub fn well(reservoir: RealReservoir) -> Self {
        let (split, intercept, coefficients) = match reservoir {
            RealReservoir::Hamilton => (
                4.0,
                -20.315_160_159_993_59,
                [-0.37894667, 1.72349699, 0.01190302, -0.00793804, 0.00318551],
            ),
            RealReservoir::HamiltonNorth => (
                2.0,
                11.329_198_679_852_88,
                [-1.13430676, 0.80762331, 0.02455265, -0.0025288, 0.01129731],
            ),
            RealReservoir::Lennox => (
                2.0,
                37.421_449_302_634_83,
                [-0.6367235, -0.55748098, 0.00104096, 0.0142587, 0.01755446],
            ),
        };
        Self::quadratic(split, intercept, coefficients)
    }

    /// Perforation surface of a modelled reservoir.
    pub fn perforation(reservoir: RealReservoir) -> Self {
        let (split, intercept, coefficients) = match reservoir {
            RealReservoir::Hamilton => (
                4.0,
                -1.613_758_330_668_247_3,
                [-5.31124455e-2, 1.00818995, 1.48023509e-4, 4.18609179e-4, 3.00308213e-6],
            ),
            RealReservoir::HamiltonNorth => (
                2.0,
                -1.959_751_072_890_014_7,
                [-1.4969207e-1, 1.06629533, -2.80472165e-5, 1.40749378e-3, -5.39246727e-4],
            ),
            RealReservoir::Lennox => (
                2.0,
                -0.562_085_151_869_581_5,
                [-6.23044797e-3, 1.00131251, -2.09522684e-5, 7.52686842e-5, 1.19926497e-5],
            ),
        };
        Self::quadratic(split, intercept, coefficients)
    }

    fn quadratic(split: f64, intercept: f64, coefficients: [f64; 5]) -> Self {
        Self {
            split,
            intercept,
            powers: QUADRATIC.to_vec(),
            coefficients: coefficients.to_vec(),
        }
    }

    /// Raw surface value in bara.
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        self.intercept
            + self
                .powers
                .iter()
                .zip(&self.coefficients)
                .map(|([px, py], c)| c * x.powi(*px) * y.powi(*py))
                .sum::<f64>()
    }

    /// End pressure for the given flowrate and inbound pressure, clamped to
    /// `[0, limits.ceiling]`.
    pub fn end_pressure(
        &self,
        flowrate: MassRate,
        inbound: Pressure,
        limits: &PressureLimits,
    ) -> Pressure {
        let x = flowrate.value / self.split;
        let y = to_bara(inbound);
        let end = bara(self.evaluate(x, y));
        pa(limits.clamp(end.value))
    }
}

/// Reservoirs with built-in well and perforation surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RealReservoir {
    Hamilton,
    HamiltonNorth,
    Lennox,
}

impl RealReservoir {
    pub const ALL: [RealReservoir; 3] = [Self::Hamilton, Self::HamiltonNorth, Self::Lennox];
}

impl fmt::Display for RealReservoir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hamilton => write!(f, "Hamilton"),
            Self::HamiltonNorth => write!(f, "HamiltonNorth"),
            Self::Lennox => write!(f, "Lennox"),
        }
    }
}

impl FromStr for RealReservoir {
    type Err = ComponentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| ComponentError::InvalidArg {
                what: format!("unknown reservoir '{s}'"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bf_core::units::kgps;

    #[test]
    fn hamilton_well_reference_point() {
        let f = ModelFunction::well(RealReservoir::Hamilton);
        let end = f.end_pressure(kgps(120.0), bara(60.0), &PressureLimits::default());
        assert!((end.value - 7_961_834.114).abs() < 1e-2);
    }

    #[test]
    fn hamilton_perforation_reference_point() {
        let f = ModelFunction::perforation(RealReservoir::Hamilton);
        let end = f.end_pressure(kgps(120.0), bara(60.0), &PressureLimits::default());
        assert!((end.value - 5_818_179.408).abs() < 1e-2);
    }

    #[test]
    fn surfaces_are_valid() {
        for r in RealReservoir::ALL {
            ModelFunction::well(r).validate().unwrap();
            ModelFunction::perforation(r).validate().unwrap();
        }
    }

    #[test]
    fn result_is_clamped() {
        let f = ModelFunction::new(1.0, -500.0, vec![], vec![]).unwrap();
        let end = f.end_pressure(kgps(1.0), bara(10.0), &PressureLimits::default());
        assert_eq!(end.value, 0.0);

        let f = ModelFunction::new(1.0, 0.0, vec![[0, 1]], vec![10.0]).unwrap();
        let end = f.end_pressure(kgps(1.0), bara(100.0), &PressureLimits::default());
        assert_eq!(end.value, 13.5e6);
    }

    #[test]
    fn mismatched_terms_are_rejected() {
        assert!(ModelFunction::new(1.0, 0.0, vec![[1, 0]], vec![]).is_err());
        assert!(ModelFunction::new(0.0, 0.0, vec![], vec![]).is_err());
    }

    #[test]
    fn reservoir_names_parse_case_insensitively() {
        assert_eq!("hamiltonnorth".parse::<RealReservoir>().unwrap(), RealReservoir::HamiltonNorth);
        assert_eq!("LENNOX".parse::<RealReservoir>().unwrap(), RealReservoir::Lennox);
        assert!("Morecambe".parse::<RealReservoir>().is_err());
    }
}
