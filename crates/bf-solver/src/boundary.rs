//! Boundary-seeking bisections: inlet pressure and valve/gate downstream
//! pressure.
//!
//! Both searches move the pressure they inject according to the
//! classification that comes back: Low raises it, High lowers it.

use tracing::{debug, info, warn};
use uom::si::pressure::pascal;

use crate::error::SolverResult;
use crate::process::{InletSearch, ProcessResult, Simulator};
use bf_components::PressureSolution;
use bf_core::ElementId;
use bf_core::units::{Pressure, pa};
use bf_fluids::FluidState;
use bf_graph::Network;

/// Bisect the pressure fed to `dest` over `[floor, inbound]` using isothermal
/// candidates of `inbound`. Returns the last pressure tried.
pub(crate) fn search_downstream_pressure(
    sim: &Simulator<'_>,
    net: &mut Network,
    dest: ElementId,
    inbound: &FluidState,
) -> SolverResult<Pressure> {
    let cfg = &sim.config().valve;
    let mut low = cfg.floor_pa;
    let mut high = inbound.pressure().get::<pascal>();
    let mut mid = low;
    let mut result = ProcessResult::low(inbound.pressure());

    for iteration in 1..=cfg.max_iterations {
        mid = (low + high) / 2.0;
        let candidate = sim.fluid(pa(mid), inbound.temperature(), inbound.flowrate())?;
        result = sim.process(net, dest, candidate)?;
        debug!(iteration, pressure_pa = mid, solution = %result.pressure_solution, "valve guess");

        match result.pressure_solution {
            PressureSolution::Low => low = mid,
            PressureSolution::High => high = mid,
            PressureSolution::Ok => break,
        }
    }

    if !result.pressure_solution.is_ok() {
        warn!(
            max_iterations = cfg.max_iterations,
            pressure_pa = mid,
            solution = %result.pressure_solution,
            "valve search reached its iteration cap"
        );
    }

    Ok(pa(mid))
}

pub(crate) fn search_inlet_pressure(
    sim: &Simulator<'_>,
    net: &mut Network,
) -> SolverResult<InletSearch> {
    let inlet = net.root()?;
    let seed = net.last_fluid(inlet)?;
    let (t, w) = (seed.temperature(), seed.flowrate());

    let cfg = &sim.config().inlet;
    let mut low = cfg.low_pa;
    let mut high = cfg.high_pa;
    let mut mid = low;
    let mut solution = PressureSolution::Low;
    let mut iterations = 0;

    while !solution.is_ok() {
        if iterations >= cfg.max_iterations {
            warn!(
                max_iterations = cfg.max_iterations,
                pressure_pa = mid,
                %solution,
                "inlet search reached its iteration cap"
            );
            break;
        }
        iterations += 1;
        mid = (low + high) / 2.0;

        solution = match sim.apply_inlet_properties(net, inlet, pa(mid), t, w, false)? {
            Some(result) => result.pressure_solution,
            None => PressureSolution::Low,
        };
        debug!(iteration = iterations, pressure_pa = mid, %solution, "inlet guess");

        match solution {
            PressureSolution::Low => low = mid,
            PressureSolution::High => high = mid,
            PressureSolution::Ok => {}
        }
    }

    if solution.is_ok() {
        info!(iterations, pressure_pa = mid, "inlet search converged");
    }

    Ok(InletSearch {
        pressure: pa(mid),
        pressure_solution: solution,
        iterations,
    })
}
