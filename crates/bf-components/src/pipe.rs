//! Pipe segment with friction and elevation losses.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::common::{PressureLimits, check_finite};
use crate::error::{ComponentError, ComponentResult};
use bf_core::units::constants::{G_MPS2, PIPE_ROUGHNESS_M};
use bf_core::units::{Area, Length, Pressure, m, m2, pa};
use bf_fluids::FluidState;

/// Friction correlation used by [`PipeSeg::end_pressure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipeModel {
    /// Laminar 64/Re below Re 2000, Swamee–Jain above, with the elevation term.
    #[default]
    Complete,
    /// Laminar 64/Re below Re 2000, `0.094 / (1000·D)^(1/3)` above, no elevation term.
    Legacy,
}

impl std::str::FromStr for PipeModel {
    type Err = ComponentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "complete" => Ok(Self::Complete),
            "legacy" => Ok(Self::Legacy),
            other => Err(ComponentError::InvalidArg {
                what: format!("unknown pipe model '{other}'"),
            }),
        }
    }
}

/// Pipe segment made of one or more parallel lines of equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct PipeSeg {
    pub length: Length,
    diameters: Vec<Length>,
}

impl PipeSeg {
    pub fn new(length: Length, diameters: Vec<Length>) -> ComponentResult<Self> {
        check_finite(length.value, "pipe length")?;
        if length.value <= 0.0 {
            return Err(ComponentError::InvalidArg {
                what: format!("pipe length must be positive, got {} m", length.value),
            });
        }
        if diameters.is_empty() {
            return Err(ComponentError::InvalidArg {
                what: "pipe needs at least one line".into(),
            });
        }
        for d in &diameters {
            Self::check_diameter(*d)?;
        }
        Ok(Self { length, diameters })
    }

    fn check_diameter(d: Length) -> ComponentResult<()> {
        check_finite(d.value, "line diameter")?;
        if d.value <= 0.0 {
            return Err(ComponentError::InvalidArg {
                what: format!("line diameter must be positive, got {} m", d.value),
            });
        }
        Ok(())
    }

    pub fn diameters(&self) -> &[Length] {
        &self.diameters
    }

    /// Total flow area of the parallel lines, Σ π/4·d².
    pub fn effective_area(&self) -> Area {
        m2(self.diameters.iter().map(|d| PI / 4.0 * d.value.powi(2)).sum())
    }

    /// Diameter of the single line with the same total area.
    pub fn equivalent_diameter(&self) -> Length {
        m(2.0 * (self.effective_area().value / PI).sqrt())
    }

    pub fn add_line(&mut self, diameter: Length) -> ComponentResult<()> {
        Self::check_diameter(diameter)?;
        self.diameters.push(diameter);
        Ok(())
    }

    /// Remove one line of exactly `diameter`.
    pub fn remove_line(&mut self, diameter: Length) -> ComponentResult<()> {
        let idx = self
            .diameters
            .iter()
            .position(|d| *d == diameter)
            .ok_or(ComponentError::UnknownLine {
                diameter_m: diameter.value,
            })?;
        if self.diameters.len() == 1 {
            return Err(ComponentError::LastLine);
        }
        self.diameters.remove(idx);
        Ok(())
    }

    fn friction_factor(&self, reynolds: f64, diameter: f64, model: PipeModel) -> f64 {
        if reynolds < 2000.0 {
            return 64.0 / reynolds;
        }
        match model {
            PipeModel::Complete => {
                let a = PIPE_ROUGHNESS_M / (3.7 * diameter);
                let b = 5.74 / reynolds.powf(0.9);
                0.25 / (a + b).log10().powi(2)
            }
            PipeModel::Legacy => 0.094 / (1000.0 * diameter).cbrt(),
        }
    }

    /// Pressure at the downstream end for the given inbound fluid.
    ///
    /// `height` is the destination elevation minus this segment's elevation;
    /// the legacy model ignores it. A non-physical result (NaN) becomes 0 and
    /// the value is clamped to `[0, limits.ceiling]`.
    pub fn end_pressure(
        &self,
        fluid: &FluidState,
        height: Length,
        model: PipeModel,
        limits: &PressureLimits,
    ) -> Pressure {
        use uom::si::{
            area::square_meter, dynamic_viscosity::pascal_second, length::meter,
            mass_density::kilogram_per_cubic_meter, mass_rate::kilogram_per_second,
            pressure::pascal,
        };

        let area = self.effective_area().get::<square_meter>();
        let d = self.equivalent_diameter().get::<meter>();
        let rho = fluid.density().get::<kilogram_per_cubic_meter>();
        let v = 1.0 / rho;
        let w = fluid.flowrate().get::<kilogram_per_second>();
        let p1 = fluid.pressure().get::<pascal>();
        let length = self.length.get::<meter>();

        let u = w / (area * rho);
        let reynolds = rho * u * d / fluid.viscosity().get::<pascal_second>();
        let f = self.friction_factor(reynolds, d, model);

        let mut end = (area * d.sqrt()).recip()
            * p1.sqrt()
            * (area.powi(2) * d * p1 - f * length * v * w.powi(2)).sqrt();

        if model == PipeModel::Complete {
            end -= G_MPS2 * height.get::<meter>() * rho;
        }

        pa(limits.clamp(end))
    }
}
