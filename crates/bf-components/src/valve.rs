//! Threshold elements: valves and pressure gates.

use crate::common::check_finite;
use crate::error::ComponentResult;
use bf_core::units::Pressure;

/// Fraction of the set input pressure below which flow is refused.
pub const ADMIT_FRACTION: f64 = 0.99;

/// Element that only passes flow arriving at or above its input pressure.
///
/// Admitted flow is throttled: the solver searches the downstream pressure
/// that satisfies the rest of the branch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdValve {
    pub input_pressure: Pressure,
}

impl ThresholdValve {
    pub fn new(input_pressure: Pressure) -> ComponentResult<Self> {
        check_finite(input_pressure.value, "valve input pressure")?;
        Ok(Self { input_pressure })
    }

    pub fn admits(&self, inbound: Pressure) -> bool {
        inbound.value >= self.input_pressure.value * ADMIT_FRACTION
    }
}
