//! Steady-state boundary solver for branched CO2 injection networks.
//!
//! The network is solved by propagation rather than by assembling a system
//! of equations: a fluid handed to the inlet travels element by element to
//! the reservoirs, each reservoir classifies the pressure it receives as
//! Low, Ok or High, and that classification drives nested bisections:
//!
//! - the inlet pressure (outermost),
//! - the downstream pressure of every valve and pressure gate,
//! - the flowrate taken by every splitter branch but the last.
//!
//! # Example
//!
//! ```
//! use bf_core::units::{bara, k, kgps, m};
//! use bf_fluids::IdealGasCo2;
//! use bf_graph::{NetworkBuilder, PipeDef};
//! use bf_solver::{PressureSolution, Simulator, SolverConfig};
//!
//! let mut builder = NetworkBuilder::new();
//! builder
//!     .add_inlet("Inlet", m(0.0))?
//!     .chain_add_pipe_seg(&PipeDef::new("Pipe", m(200.0), vec![m(0.9144)], m(0.0)))?
//!     .add_reservoir("Reservoir", m(0.0), bara(30.0))?;
//! let mut network = builder.build()?;
//!
//! let model = IdealGasCo2::new();
//! let sim = Simulator::new(&model, SolverConfig::default())?;
//! let inlet = network.root()?;
//! sim.apply_inlet_properties(&mut network, inlet, bara(40.0), k(300.0), kgps(150.0), true)?;
//!
//! let search = sim.search_inlet_pressure(&mut network)?;
//! assert_eq!(search.pressure_solution, PressureSolution::Ok);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod boundary;
pub mod config;
pub mod error;
pub mod process;
mod splitter;

pub use bf_components::PressureSolution;
pub use config::{
    InletSearchConfig, SolverConfig, SplitStrategy, SplitterConfig, ValveSearchConfig,
};
pub use error::{SolverError, SolverResult};
pub use process::{InletSearch, ProcessResult, Simulator};
