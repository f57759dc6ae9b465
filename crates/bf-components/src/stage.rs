//! Explicit-output pressure stages: pressure changers and compressors.

use crate::error::{ComponentError, ComponentResult};
use crate::inversion::{Conserved, TemperatureInversion};
use bf_core::units::{Pressure, to_celsius};
use bf_fluids::{FluidState, PropertyModel, SpecEnthalpy};

/// Default isentropic efficiency of a compressor stage.
pub const DEFAULT_ISENTROPIC_EFFICIENCY: f64 = 0.7;

/// Highest outlet temperature an isentropic stage may deliver [°C].
pub const OUTLET_TEMPERATURE_LIMIT_C: f64 = 120.0;

/// Thermodynamic path of a stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StageModel {
    /// Compression with the given isentropic efficiency.
    Isentropic { efficiency: f64 },
    /// Throttling at constant enthalpy.
    Isenthalpic,
}

/// Stage that sets its outlet pressure explicitly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureStage {
    pub output_pressure: Pressure,
    pub model: StageModel,
}

/// Outlet state and specific work of one pass through a stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StageOutcome {
    pub outlet: FluidState,
    /// `h_s - h_in` [J/kg]; zero for isenthalpic stages.
    pub ideal_work: SpecEnthalpy,
    /// `ideal_work / efficiency` [J/kg].
    pub actual_work: SpecEnthalpy,
}

impl PressureStage {
    pub fn compressor(output_pressure: Pressure) -> Self {
        Self {
            output_pressure,
            model: StageModel::Isentropic {
                efficiency: DEFAULT_ISENTROPIC_EFFICIENCY,
            },
        }
    }

    pub fn changer(output_pressure: Pressure) -> Self {
        Self {
            output_pressure,
            model: StageModel::Isenthalpic,
        }
    }

    pub fn validate(&self) -> ComponentResult<()> {
        let p = self.output_pressure.get::<uom::si::pressure::pascal>();
        if !p.is_finite() || p <= 0.0 {
            return Err(ComponentError::InvalidArg {
                what: format!("stage output pressure must be positive, got {p} Pa"),
            });
        }
        if let StageModel::Isentropic { efficiency } = self.model {
            if !(efficiency > 0.0 && efficiency <= 1.0) {
                return Err(ComponentError::InvalidArg {
                    what: format!("isentropic efficiency must be in (0, 1], got {efficiency}"),
                });
            }
        }
        Ok(())
    }

    /// Take `inbound` to the output pressure.
    pub fn outlet(
        &self,
        model: &dyn PropertyModel,
        inbound: &FluidState,
        inversion: &TemperatureInversion,
    ) -> ComponentResult<StageOutcome> {
        match self.model {
            StageModel::Isenthalpic => Ok(StageOutcome {
                outlet: inversion.isenthalpic(model, inbound, self.output_pressure)?,
                ideal_work: 0.0,
                actual_work: 0.0,
            }),
            StageModel::Isentropic { efficiency } => {
                self.isentropic(model, inbound, inversion, efficiency)
            }
        }
    }

    fn isentropic(
        &self,
        model: &dyn PropertyModel,
        inbound: &FluidState,
        inversion: &TemperatureInversion,
        efficiency: f64,
    ) -> ComponentResult<StageOutcome> {
        let s_in = inbound.entropy().ok_or_else(|| ComponentError::InvalidArg {
            what: format!("model '{}' does not provide entropy", model.name()),
        })?;
        let h_in = inbound.enthalpy();

        let ideal = inversion.invert(
            model,
            self.output_pressure,
            inbound.flowrate(),
            Conserved::Entropy,
            s_in,
        )?;
        let ideal_work = ideal.enthalpy() - h_in;
        let actual_work = ideal_work / efficiency;

        let outlet = inversion.invert(
            model,
            self.output_pressure,
            inbound.flowrate(),
            Conserved::Enthalpy,
            h_in + actual_work,
        )?;

        let temperature_c = to_celsius(outlet.temperature());
        if temperature_c > OUTLET_TEMPERATURE_LIMIT_C {
            return Err(ComponentError::TemperatureCeiling {
                temperature_c,
                limit_c: OUTLET_TEMPERATURE_LIMIT_C,
            });
        }

        Ok(StageOutcome {
            outlet,
            ideal_work,
            actual_work,
        })
    }
}
