//! Error types for network processing.

use bf_components::ComponentError;
use bf_core::SearchError;
use bf_fluids::FluidError;
use bf_graph::GraphError;
use thiserror::Error;

/// Errors that can occur while processing a network.
///
/// A search that runs out of iterations is not an error: it returns its best
/// estimate with a non-Ok classification.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Invalid solver configuration: {what}")]
    Config { what: String },

    #[error("Component error: {0}")]
    Component(#[from] ComponentError),

    #[error("Fluid error: {0}")]
    Fluid(#[from] FluidError),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Search error: {0}")]
    Search(#[from] SearchError),
}

pub type SolverResult<T> = Result<T, SolverError>;
