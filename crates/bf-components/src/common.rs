//! Shared pressure limits and numeric helpers.

use serde::{Deserialize, Serialize};

use crate::error::{ComponentError, ComponentResult};
use bf_core::numeric::ensure_finite;

/// Arrival pressures below this are treated as a failed (Low) transfer [Pa].
pub const LOW_PRESSURE_LIMIT_PA: f64 = 1000.0;

/// Upper cap applied to computed end pressures [Pa].
pub const PRESSURE_CEILING_PA: f64 = 13.5e6;

/// Pressure bounds applied by transport elements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PressureLimits {
    pub low_pa: f64,
    pub ceiling_pa: f64,
}

impl Default for PressureLimits {
    fn default() -> Self {
        Self {
            low_pa: LOW_PRESSURE_LIMIT_PA,
            ceiling_pa: PRESSURE_CEILING_PA,
        }
    }
}

impl PressureLimits {
    /// NaN becomes 0, then the value is clamped to `[0, ceiling]`.
    pub fn clamp(&self, p_pa: f64) -> f64 {
        let p = if p_pa.is_nan() { 0.0 } else { p_pa };
        p.min(self.ceiling_pa).max(0.0)
    }

    pub fn is_low(&self, p_pa: f64) -> bool {
        p_pa < self.low_pa
    }
}

/// Ensure a value is finite, returning ComponentError if not.
pub fn check_finite(value: f64, what: &'static str) -> ComponentResult<()> {
    ensure_finite(value, what).map_err(|_| ComponentError::NonPhysical { what })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_maps_nan_and_caps() {
        let limits = PressureLimits::default();
        assert_eq!(limits.clamp(f64::NAN), 0.0);
        assert_eq!(limits.clamp(-5.0), 0.0);
        assert_eq!(limits.clamp(2.0e7), 13.5e6);
        assert_eq!(limits.clamp(3.0e6), 3.0e6);
    }

    #[test]
    fn low_limit_is_strict() {
        let limits = PressureLimits::default();
        assert!(limits.is_low(999.9));
        assert!(!limits.is_low(1000.0));
    }

    #[test]
    fn test_check_finite() {
        assert!(check_finite(1.0, "test").is_ok());
        assert!(check_finite(f64::INFINITY, "test").is_err());
        assert!(check_finite(f64::NAN, "test").is_err());
    }
}
