//! Error types for element physics.

use bf_core::SearchError;
use bf_fluids::FluidError;
use thiserror::Error;

/// Errors that can occur while evaluating an element.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Pipe does not have a line of size {diameter_m} m")]
    UnknownLine { diameter_m: f64 },

    #[error("Pipe only has one line")]
    LastLine,

    #[error("Outlet temperature {temperature_c:.2} °C exceeds the {limit_c} °C limit")]
    TemperatureCeiling { temperature_c: f64, limit_c: f64 },

    #[error("Fluid model error: {0}")]
    Fluid(#[from] FluidError),

    #[error("Search error: {0}")]
    Search(#[from] SearchError),
}

pub type ComponentResult<T> = Result<T, ComponentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ComponentError::UnknownLine { diameter_m: 0.3 };
        assert!(err.to_string().contains("0.3"));

        let err = ComponentError::TemperatureCeiling {
            temperature_c: 182.414,
            limit_c: 120.0,
        };
        assert!(err.to_string().contains("182.41"));
    }

    #[test]
    fn fluid_errors_convert() {
        let err: ComponentError = FluidError::NotSupported { what: "entropy" }.into();
        assert!(matches!(err, ComponentError::Fluid(_)));
    }
}
