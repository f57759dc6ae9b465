//! bf-fluids: fluid property engine for branchflow.
//!
//! Provides:
//! - Lookup tables (pressure-grouped property rows, phase envelope)
//! - Table sources (CSV files, in-memory rows)
//! - `TabulatedProperties`: phase classification + bilinear interpolation
//! - `IdealGasCo2`: closed-form reference model
//! - `FluidState`: the snapshot passed between network elements
//!
//! # Example
//!
//! ```no_run
//! use bf_fluids::{CsvFluidTable, CsvPhaseEnvelope, FluidState, TabulatedProperties};
//! use bf_core::units::{celsius, kgps, pa};
//!
//! let model = TabulatedProperties::load(
//!     &CsvPhaseEnvelope::new("phase_envelope.csv"),
//!     &CsvFluidTable::new("co2_table.csv"),
//! )
//! .unwrap();
//! let state = FluidState::from_model(&model, pa(3.0e6), celsius(20.0), kgps(100.0)).unwrap();
//! println!("Density: {} kg/m³", state.density().value);
//! ```

pub mod error;
pub mod ideal_gas;
pub mod loader;
pub mod model;
pub mod properties;
pub mod state;
pub mod tables;

pub use error::{FluidError, FluidResult};
pub use ideal_gas::IdealGasCo2;
pub use loader::{
    CsvFluidTable, CsvPhaseEnvelope, FluidTableSource, InMemoryFluidTable,
    InMemoryPhaseEnvelope, PhaseEnvelopeSource,
};
pub use model::{Phase, PropertyModel, SpecEnthalpy, SpecEntropy};
pub use properties::{NearbyPoints, PtWeights, TabulatedProperties};
pub use state::FluidState;
pub use tables::{Column, FluidPropertyTable, FluidRow, PhaseEnvelopeTable, PhasePoint};
