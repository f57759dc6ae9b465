//! Temperature inversion at a fixed pressure.

use serde::{Deserialize, Serialize};

use crate::error::{ComponentError, ComponentResult};
use bf_core::search::binary_target_search;
use bf_core::units::{MassRate, Pressure, celsius};
use bf_fluids::{FluidState, PropertyModel};

/// Property held constant while the temperature is searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conserved {
    Enthalpy,
    Entropy,
}

/// Search domain [°C] and rounding precision of temperature inversions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperatureInversion {
    pub min_c: f64,
    pub max_c: f64,
    pub precision: u32,
}

impl Default for TemperatureInversion {
    fn default() -> Self {
        Self {
            min_c: -50.0,
            max_c: 200.0,
            precision: 2,
        }
    }
}

impl TemperatureInversion {
    /// Temperature [°C] at `pressure` where `property` equals `target`.
    pub fn temperature_c(
        &self,
        model: &dyn PropertyModel,
        pressure: Pressure,
        property: Conserved,
        target: f64,
    ) -> ComponentResult<f64> {
        if property == Conserved::Entropy && !model.has_entropy() {
            return Err(ComponentError::InvalidArg {
                what: format!("model '{}' does not provide entropy", model.name()),
            });
        }
        binary_target_search::<ComponentError, _>(
            self.min_c..=self.max_c,
            target,
            self.precision,
            |t_c| {
                let t = celsius(t_c);
                Ok(match property {
                    Conserved::Enthalpy => model.enthalpy(pressure, t)?,
                    Conserved::Entropy => model.entropy(pressure, t)?,
                })
            },
        )
    }

    /// Fluid state at `pressure` conserving `property` of `inbound`.
    pub fn invert(
        &self,
        model: &dyn PropertyModel,
        pressure: Pressure,
        flowrate: MassRate,
        property: Conserved,
        target: f64,
    ) -> ComponentResult<FluidState> {
        let t_c = self.temperature_c(model, pressure, property, target)?;
        Ok(FluidState::from_model(model, pressure, celsius(t_c), flowrate)?)
    }

    /// Enthalpy-preserving state change to `pressure`.
    pub fn isenthalpic(
        &self,
        model: &dyn PropertyModel,
        inbound: &FluidState,
        pressure: Pressure,
    ) -> ComponentResult<FluidState> {
        self.invert(
            model,
            pressure,
            inbound.flowrate(),
            Conserved::Enthalpy,
            inbound.enthalpy(),
        )
    }
}
