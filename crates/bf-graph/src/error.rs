//! Graph-specific error types.

use bf_components::ComponentError;
use bf_core::ElementId;

pub type GraphResult<T> = Result<T, GraphError>;

/// Network construction, validation and diagnostic errors.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphError {
    /// An id does not refer to an element of this network.
    UnknownElement { id: ElementId },

    /// A non-terminal element has nowhere to send its fluid.
    MissingDestination { name: String },

    /// A splitter branch sits at a different elevation than the splitter.
    ElevationMismatch {
        splitter: String,
        destination: String,
    },

    /// The connection would break the tree shape of the network.
    IllegalConnection {
        from: String,
        to: String,
        reason: &'static str,
    },

    /// The element is not of the kind the operation needs.
    WrongKind {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A diagnostic getter was called before the element processed any fluid.
    NoFluid { name: String },

    /// A builder step was called after an element it cannot follow.
    IllegalOrder { what: String },

    /// A splitter has fewer than two branches.
    TooFewBranches { name: String, count: usize },

    /// `select_splitter` did not match any splitter.
    UnknownSplitter { what: String },

    /// The network has no elements, or does not start with an inlet.
    EmptyNetwork,

    /// Element physics rejected a parameter.
    Component(ComponentError),
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::UnknownElement { id } => {
                write!(f, "Element {} does not exist", id)
            }
            GraphError::MissingDestination { name } => {
                write!(f, "Element '{}' has no destination", name)
            }
            GraphError::ElevationMismatch {
                splitter,
                destination,
            } => {
                write!(
                    f,
                    "Destination '{}' elevation does not match splitter '{}' elevation",
                    destination, splitter
                )
            }
            GraphError::IllegalConnection { from, to, reason } => {
                write!(f, "Cannot connect '{}' to '{}': {}", from, to, reason)
            }
            GraphError::WrongKind {
                name,
                expected,
                found,
            } => {
                write!(f, "Element '{}' is a {} (expected {})", name, found, expected)
            }
            GraphError::NoFluid { name } => {
                write!(f, "Element '{}' has no fluid", name)
            }
            GraphError::IllegalOrder { what } => write!(f, "{}", what),
            GraphError::TooFewBranches { name, count } => {
                write!(
                    f,
                    "Splitter '{}' has {} branch(es) (expected at least 2)",
                    name, count
                )
            }
            GraphError::UnknownSplitter { what } => {
                write!(f, "No splitter matches {}", what)
            }
            GraphError::EmptyNetwork => write!(f, "First element must be an inlet"),
            GraphError::Component(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for GraphError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GraphError::Component(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ComponentError> for GraphError {
    fn from(err: ComponentError) -> Self {
        GraphError::Component(err)
    }
}
