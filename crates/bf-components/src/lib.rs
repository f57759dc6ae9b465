//! bf-components: element physics for branchflow networks.
//!
//! Provides the per-element transformations the solver chains together:
//! - Pipe segments with Swamee–Jain or legacy friction and an elevation term
//! - Empirical well, perforation and analogue surfaces
//! - Reservoir target-window classification
//! - Threshold valves and pressure gates
//! - Pressure changers and compressors (isenthalpic/isentropic stages)
//!
//! Components are pure functions of their parameters and an inbound
//! [`bf_fluids::FluidState`]; graph wiring and searches live in `bf-graph`
//! and `bf-solver`.
//!
//! # Example
//!
//! ```no_run
//! use bf_components::{PipeModel, PipeSeg, PressureLimits};
//! use bf_core::units::{k, kgps, m, pa};
//! use bf_fluids::{FluidState, IdealGasCo2};
//!
//! let pipe = PipeSeg::new(m(200.0), vec![m(0.9144)]).unwrap();
//! let inbound =
//!     FluidState::from_model(&IdealGasCo2::new(), pa(3.0e6), k(300.0), kgps(150.0)).unwrap();
//!
//! let end = pipe.end_pressure(&inbound, m(0.0), PipeModel::Complete, &PressureLimits::default());
//! println!("End pressure: {} Pa", end.value);
//! ```

pub mod analogue;
pub mod common;
pub mod error;
pub mod inversion;
pub mod pipe;
pub mod reservoir;
pub mod stage;
pub mod valve;

// Re-exports
pub use analogue::{ModelFunction, RealReservoir};
pub use common::{LOW_PRESSURE_LIMIT_PA, PRESSURE_CEILING_PA, PressureLimits};
pub use error::{ComponentError, ComponentResult};
pub use inversion::{Conserved, TemperatureInversion};
pub use pipe::{PipeModel, PipeSeg};
pub use reservoir::{PressureSolution, RESERVOIR_WINDOW, classify};
pub use stage::{
    DEFAULT_ISENTROPIC_EFFICIENCY, OUTLET_TEMPERATURE_LIMIT_C, PressureStage, StageModel,
    StageOutcome,
};
pub use valve::ThresholdValve;
