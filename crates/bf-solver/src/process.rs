//! The element processing protocol.
//!
//! `Simulator::process` hands a fluid to an element, which records it,
//! transforms it and forwards the result to its destination(s). Terminal
//! reservoirs classify the arriving pressure and the classification travels
//! back up the call chain.

use tracing::debug;

use crate::boundary;
use crate::config::SolverConfig;
use crate::error::SolverResult;
use crate::splitter;
use bf_components::{PressureSolution, classify};
use bf_core::ElementId;
use bf_core::units::{MassRate, Pressure, Temperature};
use bf_fluids::{FluidState, PropertyModel};
use bf_graph::{ElementKind, Network};

/// Outcome of processing a fluid through an element and everything downstream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessResult {
    pub pressure_solution: PressureSolution,
    /// Pressure at the point the classification was made.
    pub pressure: Pressure,
    /// Target of the reservoir that produced the classification, if one was reached.
    pub target: Option<Pressure>,
}

impl ProcessResult {
    pub fn low(pressure: Pressure) -> Self {
        Self {
            pressure_solution: PressureSolution::Low,
            pressure,
            target: None,
        }
    }
}

/// Drives fluids through a [`Network`] with one property model and one
/// set of solver settings.
pub struct Simulator<'m> {
    model: &'m dyn PropertyModel,
    config: SolverConfig,
}

impl<'m> Simulator<'m> {
    pub fn new(model: &'m dyn PropertyModel, config: SolverConfig) -> SolverResult<Self> {
        config.validate()?;
        Ok(Self { model, config })
    }

    pub fn model(&self) -> &'m dyn PropertyModel {
        self.model
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Evaluate a fluid state with this simulator's property model.
    pub fn fluid(&self, p: Pressure, t: Temperature, w: MassRate) -> SolverResult<FluidState> {
        Ok(FluidState::from_model(self.model, p, t, w)?)
    }

    /// Process `fluid` through element `id` and everything downstream of it.
    pub fn process(
        &self,
        net: &mut Network,
        id: ElementId,
        fluid: FluidState,
    ) -> SolverResult<ProcessResult> {
        net.record_fluid(id, fluid.clone())?;
        let kind = net.element(id)?.kind.clone();
        let limits = &self.config.limits;

        match kind {
            ElementKind::Inlet => {
                let dest = net.destination(id)?;
                self.process(net, dest, fluid)
            }
            ElementKind::PipeSeg(_) => {
                let end = net.end_pressure(id, self.config.pipe_model, limits)?;
                self.forward(net, id, &fluid, end)
            }
            ElementKind::Well(f) | ElementKind::Perforation(f) | ElementKind::Analogue(f) => {
                let end = f.end_pressure(fluid.flowrate(), fluid.pressure(), limits);
                self.forward(net, id, &fluid, end)
            }
            ElementKind::Splitter => {
                if limits.is_low(fluid.pressure().value) {
                    return Ok(ProcessResult::low(fluid.pressure()));
                }
                splitter::balance(self, net, id, &fluid)
            }
            ElementKind::Reservoir { target } => Ok(ProcessResult {
                pressure_solution: classify(fluid.pressure(), target),
                pressure: fluid.pressure(),
                target: Some(target),
            }),
            ElementKind::Valve(valve) => {
                if !valve.admits(fluid.pressure()) {
                    return Ok(ProcessResult::low(fluid.pressure()));
                }
                let dest = net.destination(id)?;
                let found = boundary::search_downstream_pressure(self, net, dest, &fluid)?;
                let throttled = self.config.inversion.isenthalpic(self.model, &fluid, found)?;
                self.process(net, dest, throttled)
            }
            ElementKind::PressureGate(gate) => {
                if !gate.admits(fluid.pressure()) {
                    return Ok(ProcessResult::low(fluid.pressure()));
                }
                let dest = net.destination(id)?;
                let found = boundary::search_downstream_pressure(self, net, dest, &fluid)?;
                let throttled = self.config.inversion.isenthalpic(self.model, &fluid, found)?;
                let downstream = self.process(net, dest, throttled)?;
                Ok(ProcessResult {
                    pressure_solution: downstream.pressure_solution,
                    pressure: fluid.pressure(),
                    target: None,
                })
            }
            ElementKind::PressureChanger(stage) | ElementKind::Compressor(stage) => {
                let dest = net.destination(id)?;
                let outcome = stage.outlet(self.model, &fluid, &self.config.inversion)?;
                debug!(
                    element = %net.element(id)?.name,
                    outlet_pa = outcome.outlet.pressure().value,
                    outlet_k = outcome.outlet.temperature().value,
                    actual_work = outcome.actual_work,
                    "pressure stage"
                );
                self.process(net, dest, outcome.outlet)
            }
        }
    }

    /// Send the fluid on at `end` pressure, or report Low when it cannot arrive.
    fn forward(
        &self,
        net: &mut Network,
        id: ElementId,
        fluid: &FluidState,
        end: Pressure,
    ) -> SolverResult<ProcessResult> {
        if self.config.limits.is_low(end.value) {
            return Ok(ProcessResult::low(end));
        }
        let dest = net.destination(id)?;
        let next = self.fluid(end, fluid.temperature(), fluid.flowrate())?;
        self.process(net, dest, next)
    }

    /// Set the boundary fluid on the inlet and, unless `skip_process`, run it
    /// through the network.
    pub fn apply_inlet_properties(
        &self,
        net: &mut Network,
        inlet: ElementId,
        p: Pressure,
        t: Temperature,
        w: MassRate,
        skip_process: bool,
    ) -> SolverResult<Option<ProcessResult>> {
        let fluid = self.fluid(p, t, w)?;
        if skip_process {
            net.record_fluid(inlet, fluid)?;
            return Ok(None);
        }
        self.process(net, inlet, fluid).map(Some)
    }

    /// Bisect the inlet pressure until every reservoir is satisfied.
    ///
    /// Temperature and flowrate come from the fluid last applied to the
    /// inlet.
    pub fn search_inlet_pressure(&self, net: &mut Network) -> SolverResult<InletSearch> {
        boundary::search_inlet_pressure(self, net)
    }
}

/// Result of [`Simulator::search_inlet_pressure`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InletSearch {
    /// Last pressure tried.
    pub pressure: Pressure,
    pub pressure_solution: PressureSolution,
    pub iterations: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bf_components::{ModelFunction, PipeSeg, RealReservoir};
    use bf_core::units::{bara, k, kgps, m};
    use bf_fluids::IdealGasCo2;
    use bf_graph::{GraphError, NetworkBuilder, PipeDef};

    fn single_pipe(target_bara: f64) -> Network {
        let mut b = NetworkBuilder::new();
        b.add_inlet("inlet", m(0.0))
            .unwrap()
            .chain_add_pipe_seg(&PipeDef::new("p", m(200.0), vec![m(0.9144)], m(0.0)))
            .unwrap()
            .add_reservoir("r", m(0.0), bara(target_bara))
            .unwrap();
        b.build().unwrap()
    }

    #[test]
    fn reservoir_reports_target() {
        let model = IdealGasCo2::new();
        let sim = Simulator::new(&model, SolverConfig::default()).unwrap();
        let mut net = single_pipe(30.0);
        let r = net.find("r").unwrap();

        let fluid = sim.fluid(bara(30.1), k(300.0), kgps(10.0)).unwrap();
        let result = sim.process(&mut net, r, fluid).unwrap();
        assert_eq!(result.pressure_solution, PressureSolution::Ok);
        assert_eq!(result.target, Some(bara(30.0)));
        assert!(net.last_fluid(r).is_ok());
    }

    #[test]
    fn low_pipe_end_does_not_forward() {
        let model = IdealGasCo2::new();
        let sim = Simulator::new(&model, SolverConfig::default()).unwrap();
        let mut net = single_pipe(30.0);
        let inlet = net.root().unwrap();

        // Stagnant flow yields a NaN end pressure, which maps to 0.
        let result = sim
            .apply_inlet_properties(&mut net, inlet, bara(30.0), k(300.0), kgps(0.0), false)
            .unwrap()
            .unwrap();
        assert_eq!(result.pressure_solution, PressureSolution::Low);
        assert_eq!(result.pressure.value, 0.0);
        assert!(matches!(
            net.last_fluid(net.find("r").unwrap()),
            Err(GraphError::NoFluid { .. })
        ));
    }

    #[test]
    fn skip_process_only_records() {
        let model = IdealGasCo2::new();
        let sim = Simulator::new(&model, SolverConfig::default()).unwrap();
        let mut net = single_pipe(30.0);
        let inlet = net.root().unwrap();

        let result = sim
            .apply_inlet_properties(&mut net, inlet, bara(30.0), k(300.0), kgps(100.0), true)
            .unwrap();
        assert!(result.is_none());
        assert_eq!(net.last_fluid(inlet).unwrap().pressure(), bara(30.0));
        assert!(net.last_fluid(net.find("p").unwrap()).is_err());
    }

    #[test]
    fn missing_destination_is_an_error_after_recording() {
        let model = IdealGasCo2::new();
        let sim = Simulator::new(&model, SolverConfig::default()).unwrap();
        let mut net = Network::new();
        let p = net.add(
            "p",
            m(0.0),
            ElementKind::PipeSeg(PipeSeg::new(m(100.0), vec![m(0.5)]).unwrap()),
        );

        let fluid = sim.fluid(bara(30.0), k(300.0), kgps(10.0)).unwrap();
        let err = sim.process(&mut net, p, fluid).unwrap_err();
        assert!(matches!(
            err,
            crate::SolverError::Graph(GraphError::MissingDestination { .. })
        ));
        assert!(net.last_fluid(p).is_ok());
    }

    #[test]
    fn well_surfaces_feed_the_reservoir() {
        let model = IdealGasCo2::new();
        let sim = Simulator::new(&model, SolverConfig::default()).unwrap();
        let mut b = NetworkBuilder::new();
        b.add_inlet("inlet", m(0.0))
            .unwrap()
            .chain_add_pipe_seg(&PipeDef::new("p", m(10.0), vec![m(1.0)], m(0.0)))
            .unwrap()
            .add_well("w", m(0.0), RealReservoir::Hamilton)
            .unwrap()
            .add_reservoir("r", m(0.0), bara(30.0))
            .unwrap();
        let mut net = b.build().unwrap();
        let inlet = net.root().unwrap();

        sim.apply_inlet_properties(&mut net, inlet, bara(60.0), k(300.0), kgps(120.0), false)
            .unwrap();
        let well = net.find("w").unwrap();
        let perforation = net.find("w perforation").unwrap();
        let at_well = net.last_fluid(well).unwrap().pressure();
        let at_perforation = net.last_fluid(perforation).unwrap().pressure();

        let expected = ModelFunction::well(RealReservoir::Hamilton).end_pressure(
            kgps(120.0),
            at_well,
            &SolverConfig::default().limits,
        );
        assert!((at_perforation.value - expected.value).abs() < 1e-6);
        assert!(at_perforation > at_well);
    }
}
