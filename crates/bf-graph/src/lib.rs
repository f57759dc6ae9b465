//! bf-graph: network layer for branchflow.
//!
//! Provides:
//! - The element arena (`Network`, `Element`, `ElementKind`) with forward
//!   edges, source back-references and last-fluid slots
//! - A sequential builder that enforces element ordering rules
//! - Structural validation run by `NetworkBuilder::build`
//!
//! # Example
//!
//! ```
//! use bf_components::RealReservoir;
//! use bf_core::units::{bara, m};
//! use bf_graph::{NetworkBuilder, PipeDef};
//!
//! let mut builder = NetworkBuilder::new();
//! builder
//!     .add_inlet("Inlet", m(0.0))?
//!     .chain_add_pipe_seg(&PipeDef::new("Trunk", m(5000.0), vec![m(0.6)], m(0.0)))?
//!     .add_well("Well", m(0.0), RealReservoir::Hamilton)?
//!     .add_reservoir("Hamilton", m(0.0), bara(30.0))?;
//! let network = builder.build()?;
//!
//! assert_eq!(network.len(), 5);
//! assert_eq!(network.key_points().len(), 4);
//! # Ok::<(), bf_graph::GraphError>(())
//! ```

pub mod builder;
pub mod error;
pub mod graph;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use builder::{NetworkBuilder, PipeDef, SplitterRef};
pub use error::{GraphError, GraphResult};
pub use graph::{Element, ElementKind, Network};
