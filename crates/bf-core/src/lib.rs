//! bf-core: shared foundation for branchflow.
//!
//! Contains:
//! - units (uom SI types + constructors, bara/celsius helpers)
//! - numeric (Real + tolerances + rounding helpers)
//! - ids (compact element identifiers for the network arena)
//! - search (bisection primitives used by table lookups and boundary solvers)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod search;
pub mod units;

pub use error::{CoreError, CoreResult, SearchError, SearchResult};
pub use ids::*;
pub use numeric::*;
pub use search::{Boundary, binary_search, binary_target_search, boundary_search};
pub use units::*;
