//! Structural validation of a wired network.

use crate::error::{GraphError, GraphResult};
use crate::graph::{ElementKind, Network};

/// Check the network can be simulated.
///
/// - the first element is an inlet and no other element is
/// - every non-terminal element has a destination
/// - every splitter has at least two branches
/// - every element except the inlet has a source
/// - element parameters are physically valid
pub(crate) fn validate_network(net: &Network) -> GraphResult<()> {
    let root = net.root()?;

    for e in net.elements() {
        if e.id != root && matches!(e.kind, ElementKind::Inlet) {
            return Err(GraphError::IllegalOrder {
                what: format!("Network has more than one inlet ('{}')", e.name),
            });
        }

        match &e.kind {
            ElementKind::Reservoir { .. } => {}
            ElementKind::Splitter if e.destinations.len() < 2 => {
                return Err(GraphError::TooFewBranches {
                    name: e.name.clone(),
                    count: e.destinations.len(),
                });
            }
            _ if e.destinations.is_empty() => {
                return Err(GraphError::MissingDestination {
                    name: e.name.clone(),
                });
            }
            _ => {}
        }

        if e.id != root && e.source.is_none() {
            return Err(GraphError::IllegalOrder {
                what: format!("Element '{}' is not connected to the network", e.name),
            });
        }

        match &e.kind {
            ElementKind::Well(f) | ElementKind::Perforation(f) | ElementKind::Analogue(f) => {
                f.validate()?
            }
            ElementKind::PressureChanger(stage) | ElementKind::Compressor(stage) => {
                stage.validate()?
            }
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bf_components::PipeSeg;
    use bf_core::units::{bara, m};

    fn pipe() -> ElementKind {
        ElementKind::PipeSeg(PipeSeg::new(m(100.0), vec![m(0.5)]).unwrap())
    }

    #[test]
    fn empty_network_is_rejected() {
        assert_eq!(validate_network(&Network::new()), Err(GraphError::EmptyNetwork));
    }

    #[test]
    fn dangling_pipe_is_missing_destination() {
        let mut net = Network::new();
        let inlet = net.add("inlet", m(0.0), ElementKind::Inlet);
        let p = net.add("p", m(0.0), pipe());
        net.connect(inlet, p).unwrap();
        assert!(matches!(
            validate_network(&net),
            Err(GraphError::MissingDestination { name }) if name == "p"
        ));
    }

    #[test]
    fn single_branch_splitter_is_rejected() {
        let mut net = Network::new();
        let inlet = net.add("inlet", m(0.0), ElementKind::Inlet);
        let p = net.add("p", m(0.0), pipe());
        let s = net.add("s", m(0.0), ElementKind::Splitter);
        let b = net.add("b", m(0.0), pipe());
        let r = net.add("r", m(0.0), ElementKind::Reservoir { target: bara(30.0) });
        net.connect(inlet, p).unwrap();
        net.connect(p, s).unwrap();
        net.connect(s, b).unwrap();
        net.connect(b, r).unwrap();
        assert!(matches!(
            validate_network(&net),
            Err(GraphError::TooFewBranches { count: 1, .. })
        ));
    }

    #[test]
    fn orphan_element_is_rejected() {
        let mut net = Network::new();
        let inlet = net.add("inlet", m(0.0), ElementKind::Inlet);
        let r = net.add("r", m(0.0), ElementKind::Reservoir { target: bara(30.0) });
        net.add("orphan", m(0.0), ElementKind::Reservoir { target: bara(30.0) });
        net.connect(inlet, r).unwrap();
        assert!(matches!(validate_network(&net), Err(GraphError::IllegalOrder { .. })));
    }
}
