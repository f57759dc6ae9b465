//! Fluid state carried between network elements.

use crate::error::{FluidError, FluidResult};
use crate::model::{PropertyModel, SpecEnthalpy, SpecEntropy};
use bf_core::numeric::ensure_finite;
use bf_core::units::{Density, DynVisc, MassRate, Pressure, Temperature};

/// Immutable snapshot of the flowing fluid.
///
/// Pressure, temperature and mass flowrate are the independent inputs; the
/// remaining properties are evaluated once from the property model. A new
/// state is built whenever an input changes.
#[derive(Debug, Clone, PartialEq)]
pub struct FluidState {
    pressure: Pressure,
    temperature: Temperature,
    flowrate: MassRate,
    density: Density,
    viscosity: DynVisc,
    enthalpy: SpecEnthalpy,
    entropy: Option<SpecEntropy>,
}

impl FluidState {
    /// Evaluate all derived properties at `(p, t)`.
    ///
    /// Entropy is only evaluated when the model provides it.
    pub fn from_model(
        model: &dyn PropertyModel,
        p: Pressure,
        t: Temperature,
        w: MassRate,
    ) -> FluidResult<Self> {
        ensure_finite(w.value, "mass flowrate")?;
        if w.value < 0.0 {
            return Err(FluidError::NonPhysical {
                what: "mass flowrate must not be negative",
            });
        }

        let density = model.density(p, t)?;
        let viscosity = model.viscosity(p, t)?;
        let enthalpy = model.enthalpy(p, t)?;
        let entropy = if model.has_entropy() {
            Some(model.entropy(p, t)?)
        } else {
            None
        };

        Ok(Self {
            pressure: p,
            temperature: t,
            flowrate: w,
            density,
            viscosity,
            enthalpy,
            entropy,
        })
    }

    pub fn pressure(&self) -> Pressure {
        self.pressure
    }

    pub fn temperature(&self) -> Temperature {
        self.temperature
    }

    pub fn flowrate(&self) -> MassRate {
        self.flowrate
    }

    pub fn density(&self) -> Density {
        self.density
    }

    pub fn viscosity(&self) -> DynVisc {
        self.viscosity
    }

    pub fn enthalpy(&self) -> SpecEnthalpy {
        self.enthalpy
    }

    pub fn entropy(&self) -> Option<SpecEntropy> {
        self.entropy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ideal_gas::IdealGasCo2;
    use bf_core::units::{k, kgps, pa};

    #[test]
    fn state_carries_model_properties() {
        let model = IdealGasCo2::new();
        let state = FluidState::from_model(&model, pa(3.0e6), k(300.0), kgps(150.0)).unwrap();

        assert_eq!(state.pressure().value, 3.0e6);
        assert_eq!(state.flowrate().value, 150.0);
        assert_eq!(
            state.density(),
            model.density(pa(3.0e6), k(300.0)).unwrap()
        );
        assert!(state.entropy().is_some());
    }

    #[test]
    fn reject_negative_flowrate() {
        let model = IdealGasCo2::new();
        assert!(FluidState::from_model(&model, pa(3.0e6), k(300.0), kgps(-1.0)).is_err());
        assert!(FluidState::from_model(&model, pa(3.0e6), k(300.0), kgps(f64::NAN)).is_err());
    }

    #[test]
    fn zero_flowrate_is_allowed() {
        let model = IdealGasCo2::new();
        assert!(FluidState::from_model(&model, pa(3.0e6), k(300.0), kgps(0.0)).is_ok());
    }
}
