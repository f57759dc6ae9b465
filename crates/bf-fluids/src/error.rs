//! Fluid property errors.

use bf_core::{CoreError, SearchError};
use thiserror::Error;

/// Result type for fluid operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors that can occur while loading tables or evaluating properties.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// Query outside the tabulated region or the phase envelope.
    #[error("Value out of range for {what}: {value}")]
    OutOfRange { what: &'static str, value: f64 },

    /// Non-physical values (negative density, pressure, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Property the model cannot provide (e.g. entropy from a 7-column table).
    #[error("Not supported: {what}")]
    NotSupported { what: &'static str },

    /// Table content violates the axis rules (ordering, duplicates, shape).
    #[error("Invalid table: {what}")]
    InvalidTable { what: String },

    /// Unparseable row in a table source.
    #[error("Parse error in {source_name} line {line}: {message}")]
    Parse {
        source_name: String,
        line: usize,
        message: String,
    },

    #[error("I/O error reading {path}: {message}")]
    Io { path: String, message: String },

    #[error("Table search failed: {0}")]
    Search(#[from] SearchError),
}

impl From<CoreError> for FluidError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NonFinite { what, .. } => FluidError::NonPhysical { what },
            CoreError::Search(e) => FluidError::Search(e),
        }
    }
}
