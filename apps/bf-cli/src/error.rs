use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Project error: {0}")]
    Project(#[from] bf_project::ProjectError),

    #[error("Fluid error: {0}")]
    Fluid(#[from] bf_fluids::FluidError),

    #[error("Solver error: {0}")]
    Solver(#[from] bf_solver::SolverError),

    #[error("Network error: {0}")]
    Graph(#[from] bf_graph::GraphError),

    #[error("{what}")]
    Usage { what: String },
}

pub type CliResult<T> = Result<T, CliError>;
