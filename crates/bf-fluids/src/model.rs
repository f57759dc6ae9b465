//! Fluid property model trait.

use std::fmt;

use crate::error::FluidResult;
use bf_core::units::{Density, DynVisc, Pressure, Temperature};

/// Specific enthalpy [J/kg].
///
/// Not part of uom's standard set, so we use f64 with clear documentation.
pub type SpecEnthalpy = f64;

/// Specific entropy [J/(kg·K)].
pub type SpecEntropy = f64;

/// Phase of the fluid at a pressure/temperature point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Gas,
    Liquid,
    TwoPhase,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Gas => write!(f, "gas"),
            Phase::Liquid => write!(f, "liquid"),
            Phase::TwoPhase => write!(f, "two-phase"),
        }
    }
}

/// Source of thermophysical properties for the network simulation.
///
/// Implementations must be thread-safe (Send + Sync) so a loaded model can be
/// shared for the lifetime of the process.
pub trait PropertyModel: Send + Sync {
    /// Model name (for logging).
    fn name(&self) -> &str;

    fn phase(&self, p: Pressure, t: Temperature) -> FluidResult<Phase>;

    fn density(&self, p: Pressure, t: Temperature) -> FluidResult<Density>;

    fn viscosity(&self, p: Pressure, t: Temperature) -> FluidResult<DynVisc>;

    fn enthalpy(&self, p: Pressure, t: Temperature) -> FluidResult<SpecEnthalpy>;

    /// Fails with `NotSupported` when [`PropertyModel::has_entropy`] is false.
    fn entropy(&self, p: Pressure, t: Temperature) -> FluidResult<SpecEntropy>;

    fn has_entropy(&self) -> bool {
        true
    }
}
