//! Element arena and forward/back edges.

use bf_components::{
    ModelFunction, PipeModel, PipeSeg, PressureLimits, PressureStage, ThresholdValve,
};
use bf_core::ElementId;
use bf_core::units::{Area, Length, MassRate, Pressure, m, pa};
use bf_fluids::FluidState;

use crate::error::{GraphError, GraphResult};

/// Element variant and its physical parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// Root of the network; receives the boundary fluid.
    Inlet,
    PipeSeg(PipeSeg),
    /// Distributes the inbound flow over two or more branches.
    Splitter,
    Well(ModelFunction),
    Perforation(ModelFunction),
    Analogue(ModelFunction),
    /// Terminal element with a target pressure.
    Reservoir { target: Pressure },
    Valve(ThresholdValve),
    PressureGate(ThresholdValve),
    PressureChanger(PressureStage),
    Compressor(PressureStage),
}

impl ElementKind {
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Inlet => "Inlet",
            ElementKind::PipeSeg(_) => "PipeSeg",
            ElementKind::Splitter => "Splitter",
            ElementKind::Well(_) => "Well",
            ElementKind::Perforation(_) => "Perforation",
            ElementKind::Analogue(_) => "Analogue",
            ElementKind::Reservoir { .. } => "Reservoir",
            ElementKind::Valve(_) => "Valve",
            ElementKind::PressureGate(_) => "PressureGate",
            ElementKind::PressureChanger(_) => "PressureChanger",
            ElementKind::Compressor(_) => "Compressor",
        }
    }

    /// Maximum number of forward edges; `None` for unbounded.
    pub fn max_destinations(&self) -> Option<usize> {
        match self {
            ElementKind::Reservoir { .. } => Some(0),
            ElementKind::Splitter => None,
            _ => Some(1),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ElementKind::Reservoir { .. })
    }
}

/// One node of the network.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: ElementId,
    pub name: String,
    pub elevation: Length,
    pub kind: ElementKind,
    pub(crate) source: Option<ElementId>,
    pub(crate) destinations: Vec<ElementId>,
    pub(crate) last_fluid: Option<FluidState>,
    pub(crate) allocation: Vec<MassRate>,
}

impl Element {
    pub fn source(&self) -> Option<ElementId> {
        self.source
    }

    pub fn destinations(&self) -> &[ElementId] {
        &self.destinations
    }

    /// Fluid seen by the most recent `process` call, if any.
    pub fn last_fluid(&self) -> Option<&FluidState> {
        self.last_fluid.as_ref()
    }

    /// Per-branch flowrates resolved by the last splitter pass.
    pub fn allocation(&self) -> &[MassRate] {
        &self.allocation
    }
}

/// Arena of elements forming a tree rooted at the first (inlet) element.
///
/// Topology is fixed once built; the only state that changes during a
/// simulation is the last-fluid slot and splitter allocations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Network {
    pub(crate) elements: Vec<Element>,
    pub(crate) key_points: Vec<ElementId>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an unconnected element and return its id.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        elevation: Length,
        kind: ElementKind,
    ) -> ElementId {
        let id = ElementId::from_index(self.elements.len() as u32);
        self.elements.push(Element {
            id,
            name: name.into(),
            elevation,
            kind,
            source: None,
            destinations: Vec::new(),
            last_fluid: None,
            allocation: Vec::new(),
        });
        id
    }

    /// Add a forward edge `from -> to` and set the back-reference.
    pub fn connect(&mut self, from: ElementId, to: ElementId) -> GraphResult<()> {
        let src = self.element(from)?;
        let dst = self.element(to)?;
        let illegal = |reason| GraphError::IllegalConnection {
            from: src.name.clone(),
            to: dst.name.clone(),
            reason,
        };

        if from == to {
            return Err(illegal("an element cannot feed itself"));
        }
        if matches!(dst.kind, ElementKind::Inlet) {
            return Err(illegal("an inlet cannot have a source"));
        }
        if dst.source.is_some() {
            return Err(illegal("destination already has a source"));
        }
        if let Some(max) = src.kind.max_destinations() {
            if src.destinations.len() >= max {
                return Err(illegal("source cannot take another destination"));
            }
        }
        if matches!(src.kind, ElementKind::Splitter) && src.elevation != dst.elevation {
            return Err(GraphError::ElevationMismatch {
                splitter: src.name.clone(),
                destination: dst.name.clone(),
            });
        }

        self.elements[from.slot()].destinations.push(to);
        self.elements[to.slot()].source = Some(from);
        Ok(())
    }

    pub fn element(&self, id: ElementId) -> GraphResult<&Element> {
        self.elements
            .get(id.slot())
            .ok_or(GraphError::UnknownElement { id })
    }

    fn element_mut(&mut self, id: ElementId) -> GraphResult<&mut Element> {
        self.elements
            .get_mut(id.slot())
            .ok_or(GraphError::UnknownElement { id })
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The inlet every simulation starts from.
    pub fn root(&self) -> GraphResult<ElementId> {
        match self.elements.first() {
            Some(e) if matches!(e.kind, ElementKind::Inlet) => Ok(e.id),
            _ => Err(GraphError::EmptyNetwork),
        }
    }

    /// Single forward edge of a linear element.
    pub fn destination(&self, id: ElementId) -> GraphResult<ElementId> {
        let e = self.element(id)?;
        e.destinations
            .first()
            .copied()
            .ok_or_else(|| GraphError::MissingDestination {
                name: e.name.clone(),
            })
    }

    /// Element by case-insensitive name; the first match wins.
    pub fn find(&self, name: &str) -> Option<ElementId> {
        self.elements
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
            .map(|e| e.id)
    }

    /// Elements flagged for reporting (inlet, splitters, wells, reservoirs).
    pub fn key_points(&self) -> &[ElementId] {
        &self.key_points
    }

    pub fn mark_key_point(&mut self, id: ElementId) -> GraphResult<()> {
        self.element(id)?;
        if !self.key_points.contains(&id) {
            self.key_points.push(id);
        }
        Ok(())
    }

    pub fn record_fluid(&mut self, id: ElementId, fluid: FluidState) -> GraphResult<()> {
        self.element_mut(id)?.last_fluid = Some(fluid);
        Ok(())
    }

    pub fn last_fluid(&self, id: ElementId) -> GraphResult<&FluidState> {
        let e = self.element(id)?;
        e.last_fluid.as_ref().ok_or_else(|| GraphError::NoFluid {
            name: e.name.clone(),
        })
    }

    /// Forget every recorded fluid and allocation.
    pub fn clear_fluids(&mut self) {
        for e in &mut self.elements {
            e.last_fluid = None;
            e.allocation.clear();
        }
    }

    pub fn record_allocation(&mut self, id: ElementId, flows: Vec<MassRate>) -> GraphResult<()> {
        self.splitter(id)?;
        self.element_mut(id)?.allocation = flows;
        Ok(())
    }

    pub fn allocation(&self, id: ElementId) -> GraphResult<&[MassRate]> {
        self.splitter(id)?;
        Ok(&self.element(id)?.allocation)
    }

    fn splitter(&self, id: ElementId) -> GraphResult<&Element> {
        let e = self.element(id)?;
        match e.kind {
            ElementKind::Splitter => Ok(e),
            _ => Err(wrong_kind(e, "Splitter")),
        }
    }

    pub fn pipe(&self, id: ElementId) -> GraphResult<&PipeSeg> {
        let e = self.element(id)?;
        match &e.kind {
            ElementKind::PipeSeg(pipe) => Ok(pipe),
            _ => Err(wrong_kind(e, "PipeSeg")),
        }
    }

    fn pipe_mut(&mut self, id: ElementId) -> GraphResult<&mut PipeSeg> {
        let e = self.element_mut(id)?;
        let (name, found) = (e.name.clone(), e.kind.name());
        match &mut e.kind {
            ElementKind::PipeSeg(pipe) => Ok(pipe),
            _ => Err(GraphError::WrongKind {
                name,
                expected: "PipeSeg",
                found,
            }),
        }
    }

    /// Destination elevation minus own elevation.
    pub fn height(&self, id: ElementId) -> GraphResult<Length> {
        let own = self.element(id)?.elevation;
        let dest = self.element(self.destination(id)?)?.elevation;
        Ok(m(dest.value - own.value))
    }

    pub fn effective_area(&self, id: ElementId) -> GraphResult<Area> {
        Ok(self.pipe(id)?.effective_area())
    }

    /// End pressure of a pipe for the fluid it last processed.
    pub fn end_pressure(
        &self,
        id: ElementId,
        model: PipeModel,
        limits: &PressureLimits,
    ) -> GraphResult<Pressure> {
        let pipe = self.pipe(id)?;
        let fluid = self.last_fluid(id)?;
        let height = match model {
            PipeModel::Complete => self.height(id)?,
            PipeModel::Legacy => m(0.0),
        };
        Ok(pipe.end_pressure(fluid, height, model, limits))
    }

    /// Inbound minus end pressure of a pipe for its last fluid.
    pub fn pressure_drop(
        &self,
        id: ElementId,
        model: PipeModel,
        limits: &PressureLimits,
    ) -> GraphResult<Pressure> {
        let inbound = self.last_fluid(id)?.pressure();
        let end = self.end_pressure(id, model, limits)?;
        Ok(pa(inbound.value - end.value))
    }

    pub fn add_line(&mut self, id: ElementId, diameter: Length) -> GraphResult<()> {
        Ok(self.pipe_mut(id)?.add_line(diameter)?)
    }

    pub fn remove_line(&mut self, id: ElementId, diameter: Length) -> GraphResult<()> {
        Ok(self.pipe_mut(id)?.remove_line(diameter)?)
    }
}

fn wrong_kind(e: &Element, expected: &'static str) -> GraphError {
    GraphError::WrongKind {
        name: e.name.clone(),
        expected,
        found: e.kind.name(),
    }
}
