//! Sequential network builder.
//!
//! Elements are appended in flow order: each `add_*` call connects the new
//! element to the previously added one. Splitters are remembered so that
//! later `branch` calls can hang further pipes off them.

use bf_components::{ModelFunction, PipeSeg, PressureStage, RealReservoir, ThresholdValve};
use bf_core::ElementId;
use bf_core::units::{Length, Pressure};

use crate::error::{GraphError, GraphResult};
use crate::graph::{ElementKind, Network};
use crate::validate;

/// Geometry of a pipe segment to add.
#[derive(Debug, Clone, PartialEq)]
pub struct PipeDef {
    pub name: String,
    pub length: Length,
    pub diameters: Vec<Length>,
    pub elevation: Length,
}

impl PipeDef {
    pub fn new(
        name: impl Into<String>,
        length: Length,
        diameters: Vec<Length>,
        elevation: Length,
    ) -> Self {
        Self {
            name: name.into(),
            length,
            diameters,
            elevation,
        }
    }
}

/// Splitter selector: position in creation order, or name (case-insensitive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitterRef {
    Index(usize),
    Name(String),
}

/// Builder for a [`Network`].
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    network: Network,
    splitters: Vec<ElementId>,
    selected_splitter: Option<ElementId>,
    previous: Option<ElementId>,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element, enforcing that the network starts with an inlet.
    fn push(
        &mut self,
        name: impl Into<String>,
        elevation: Length,
        kind: ElementKind,
        is_key: bool,
    ) -> GraphResult<ElementId> {
        if self.network.is_empty() && !matches!(kind, ElementKind::Inlet) {
            return Err(GraphError::EmptyNetwork);
        }
        let is_splitter = matches!(kind, ElementKind::Splitter);
        let id = self.network.add(name, elevation, kind);
        if is_splitter {
            self.splitters.push(id);
            self.selected_splitter = Some(id);
        }
        if is_key {
            self.network.mark_key_point(id)?;
        }
        self.previous = Some(id);
        Ok(id)
    }

    fn previous_kind(&self) -> Option<&ElementKind> {
        self.previous
            .and_then(|id| self.network.element(id).ok())
            .map(|e| &e.kind)
    }

    /// The previous element, provided `allowed` accepts its kind.
    fn previous_if(
        &self,
        allowed: impl Fn(&ElementKind) -> bool,
        what: &str,
    ) -> GraphResult<ElementId> {
        match (self.previous, self.previous_kind()) {
            (Some(id), Some(kind)) if allowed(kind) => Ok(id),
            _ => Err(GraphError::IllegalOrder {
                what: what.to_string(),
            }),
        }
    }

    pub fn add_inlet(&mut self, name: impl Into<String>, elevation: Length) -> GraphResult<&mut Self> {
        if !self.network.is_empty() {
            return Err(GraphError::IllegalOrder {
                what: "Inlet must be the first element".into(),
            });
        }
        self.push(name, elevation, ElementKind::Inlet, true)?;
        Ok(self)
    }

    /// Add a pipe fed by `source`, or unconnected when `source` is `None`.
    pub fn add_pipe_seg(&mut self, def: &PipeDef, source: Option<ElementId>) -> GraphResult<&mut Self> {
        let pipe = PipeSeg::new(def.length, def.diameters.clone())?;
        let id = self.push(def.name.clone(), def.elevation, ElementKind::PipeSeg(pipe), false)?;
        if let Some(source) = source {
            self.network.connect(source, id)?;
        }
        Ok(self)
    }

    /// Add a pipe fed by the previous element.
    pub fn chain_add_pipe_seg(&mut self, def: &PipeDef) -> GraphResult<&mut Self> {
        let source = self.previous_if(
            |k| !k.is_terminal(),
            "Pipe segment must follow an element that can have a destination",
        )?;
        self.add_pipe_seg(def, Some(source))
    }

    /// Chain `n` copies of `def`, cycling through `elevations` and `lengths`
    /// when they are non-empty.
    pub fn add_pipe_series(
        &mut self,
        n: usize,
        def: &PipeDef,
        elevations: &[Length],
        lengths: &[Length],
    ) -> GraphResult<&mut Self> {
        let mut def = def.clone();
        for i in 0..n {
            if !elevations.is_empty() {
                def.elevation = elevations[i % elevations.len()];
            }
            if !lengths.is_empty() {
                def.length = lengths[i % lengths.len()];
            }
            self.chain_add_pipe_seg(&def)?;
        }
        Ok(self)
    }

    pub fn add_splitter(&mut self, name: impl Into<String>, elevation: Length) -> GraphResult<&mut Self> {
        let source = self.previous_if(
            |k| matches!(k, ElementKind::PipeSeg(_)),
            "Splitter creation must come after a pipe segment",
        )?;
        let id = self.push(name, elevation, ElementKind::Splitter, true)?;
        self.network.connect(source, id)?;
        Ok(self)
    }

    /// Add a well and its perforation for one of the modelled reservoirs.
    pub fn add_well(
        &mut self,
        name: impl Into<String>,
        elevation: Length,
        reservoir: RealReservoir,
    ) -> GraphResult<&mut Self> {
        let source = self.previous_if(
            |k| matches!(k, ElementKind::PipeSeg(_) | ElementKind::Valve(_)),
            "Well creation must come after a pipe segment or valve",
        )?;
        let name = name.into();
        let well = self.push(
            name.clone(),
            elevation,
            ElementKind::Well(ModelFunction::well(reservoir)),
            true,
        )?;
        self.network.connect(source, well)?;

        let perforation = self.push(
            format!("{name} perforation"),
            elevation,
            ElementKind::Perforation(ModelFunction::perforation(reservoir)),
            true,
        )?;
        self.network.connect(well, perforation)?;
        Ok(self)
    }

    /// Add a generic analogue element with its own surface.
    pub fn add_analogue(
        &mut self,
        name: impl Into<String>,
        elevation: Length,
        function: ModelFunction,
    ) -> GraphResult<&mut Self> {
        function.validate()?;
        self.after_pipe(name, elevation, ElementKind::Analogue(function), "Analogue")
    }

    pub fn add_valve(
        &mut self,
        name: impl Into<String>,
        elevation: Length,
        input_pressure: Pressure,
    ) -> GraphResult<&mut Self> {
        let valve = ThresholdValve::new(input_pressure)?;
        self.after_pipe(name, elevation, ElementKind::Valve(valve), "Valve")
    }

    pub fn add_pressure_gate(
        &mut self,
        name: impl Into<String>,
        elevation: Length,
        input_pressure: Pressure,
    ) -> GraphResult<&mut Self> {
        let gate = ThresholdValve::new(input_pressure)?;
        self.after_pipe(name, elevation, ElementKind::PressureGate(gate), "PressureGate")
    }

    pub fn add_pressure_changer(
        &mut self,
        name: impl Into<String>,
        elevation: Length,
        stage: PressureStage,
    ) -> GraphResult<&mut Self> {
        stage.validate()?;
        self.after_pipe(name, elevation, ElementKind::PressureChanger(stage), "PressureChanger")
    }

    pub fn add_compressor(
        &mut self,
        name: impl Into<String>,
        elevation: Length,
        output_pressure: Pressure,
    ) -> GraphResult<&mut Self> {
        self.add_compressor_stage(name, elevation, PressureStage::compressor(output_pressure))
    }

    /// Compressor with an explicit stage, e.g. a non-default efficiency.
    pub fn add_compressor_stage(
        &mut self,
        name: impl Into<String>,
        elevation: Length,
        stage: PressureStage,
    ) -> GraphResult<&mut Self> {
        stage.validate()?;
        self.after_pipe(name, elevation, ElementKind::Compressor(stage), "Compressor")
    }

    fn after_pipe(
        &mut self,
        name: impl Into<String>,
        elevation: Length,
        kind: ElementKind,
        what: &str,
    ) -> GraphResult<&mut Self> {
        let source = self.previous_if(
            |k| matches!(k, ElementKind::PipeSeg(_)),
            &format!("{what} creation must come after a pipe segment"),
        )?;
        let id = self.push(name, elevation, kind, false)?;
        self.network.connect(source, id)?;
        Ok(self)
    }

    /// Terminal reservoir fed by the previous perforation, analogue or pipe.
    pub fn add_reservoir(
        &mut self,
        name: impl Into<String>,
        elevation: Length,
        target: Pressure,
    ) -> GraphResult<&mut Self> {
        let source = self.previous_if(
            |k| {
                matches!(
                    k,
                    ElementKind::Perforation(_) | ElementKind::Analogue(_) | ElementKind::PipeSeg(_)
                )
            },
            "Reservoir creation must come after a well (perforation) or pipe segment",
        )?;
        if !target.value.is_finite() || target.value <= 0.0 {
            return Err(GraphError::IllegalOrder {
                what: format!("Reservoir target must be positive, got {} Pa", target.value),
            });
        }
        let id = self.push(name, elevation, ElementKind::Reservoir { target }, true)?;
        self.network.connect(source, id)?;
        Ok(self)
    }

    pub fn select_splitter(&mut self, which: SplitterRef) -> GraphResult<&mut Self> {
        let found = match &which {
            SplitterRef::Index(i) => self.splitters.get(*i).copied().ok_or_else(|| {
                GraphError::UnknownSplitter {
                    what: format!(
                        "index {i} (splitters exist at positions 0-{})",
                        self.splitters.len().saturating_sub(1)
                    ),
                }
            })?,
            SplitterRef::Name(name) => self
                .splitters
                .iter()
                .copied()
                .find(|id| {
                    self.network
                        .element(*id)
                        .is_ok_and(|e| e.name.eq_ignore_ascii_case(name))
                })
                .ok_or_else(|| GraphError::UnknownSplitter {
                    what: format!("name '{name}'"),
                })?,
        };
        self.selected_splitter = Some(found);
        Ok(self)
    }

    /// Add a pipe as a new branch of the selected splitter.
    pub fn branch(&mut self, def: &PipeDef) -> GraphResult<&mut Self> {
        let splitter = self.selected_splitter.ok_or_else(|| GraphError::IllegalOrder {
            what: "No splitter selected to branch from".into(),
        })?;
        self.previous = Some(splitter);
        self.add_pipe_seg(def, Some(splitter))
    }

    /// Elements marked for reporting so far.
    pub fn key_points(&self) -> &[ElementId] {
        self.network.key_points()
    }

    /// The network as built so far, without validation.
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Validate and return the finished network.
    pub fn build(self) -> GraphResult<Network> {
        validate::validate_network(&self.network)?;
        Ok(self.network)
    }
}
