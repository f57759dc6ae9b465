//! Terminal reservoir classification.

use std::fmt;

use serde::{Deserialize, Serialize};

use bf_core::units::Pressure;

/// Relative half-width of the window around a reservoir target.
pub const RESERVOIR_WINDOW: f64 = 0.01;

/// Arriving pressure compared against a target window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PressureSolution {
    Low,
    Ok,
    High,
}

impl PressureSolution {
    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }
}

impl fmt::Display for PressureSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Ok => write!(f, "Ok"),
            Self::High => write!(f, "High"),
        }
    }
}

/// Classify `arriving` against `target·(1 ± 0.01)`. Both bounds are inclusive.
pub fn classify(arriving: Pressure, target: Pressure) -> PressureSolution {
    let lower = target.value * (1.0 - RESERVOIR_WINDOW);
    let upper = target.value * (1.0 + RESERVOIR_WINDOW);
    if arriving.value < lower {
        PressureSolution::Low
    } else if arriving.value > upper {
        PressureSolution::High
    } else {
        PressureSolution::Ok
    }
}
