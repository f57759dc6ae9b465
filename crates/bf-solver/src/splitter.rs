//! Splitter flow-balancing.
//!
//! Branches `0..n-1` each get a flowrate searched until the branch
//! classifies Ok; the flow is then taken out of the pool. The last branch
//! receives whatever remains. A branch that cannot be satisfied aborts the
//! splitter with its classification.

use tracing::{debug, warn};
use uom::si::{mass_rate::kilogram_per_second, pressure::pascal};

use crate::config::SplitStrategy;
use crate::error::SolverResult;
use crate::process::{ProcessResult, Simulator};
use bf_components::PressureSolution;
use bf_core::ElementId;
use bf_core::numeric::{Tolerances, nearly_equal};
use bf_core::units::kgps;
use bf_fluids::FluidState;
use bf_graph::Network;

/// Flowrate chosen for one branch and the classification it produced.
#[derive(Debug, Clone, Copy, PartialEq)]
struct BranchFlow {
    flow: f64,
    result: ProcessResult,
}

pub(crate) fn balance(
    sim: &Simulator<'_>,
    net: &mut Network,
    id: ElementId,
    inbound: &FluidState,
) -> SolverResult<ProcessResult> {
    let branches = net.element(id)?.destinations().to_vec();
    let Some((&last, searched)) = branches.split_last() else {
        return Err(bf_graph::GraphError::MissingDestination {
            name: net.element(id)?.name.clone(),
        }
        .into());
    };

    let mut pool = inbound.flowrate().get::<kilogram_per_second>();
    let mut flows = Vec::with_capacity(branches.len());

    for (index, &branch) in searched.iter().enumerate() {
        let found = match sim.config().splitter.strategy {
            SplitStrategy::Bisection => bisect_branch(sim, net, branch, inbound, pool)?,
            SplitStrategy::Accelerated => accelerated_branch(sim, net, branch, inbound, pool)?,
        };
        debug!(
            branch = index,
            flow_kgps = found.flow,
            solution = %found.result.pressure_solution,
            "branch resolved"
        );

        if !found.result.pressure_solution.is_ok() {
            net.record_allocation(id, flows)?;
            return Ok(found.result);
        }
        flows.push(kgps(found.flow));
        pool -= found.flow;
    }

    flows.push(kgps(pool));
    net.record_allocation(id, flows)?;
    apply_flow(sim, net, last, inbound, pool)
}

/// Send `flow` down `branch` at the splitter's inbound pressure and temperature.
fn apply_flow(
    sim: &Simulator<'_>,
    net: &mut Network,
    branch: ElementId,
    inbound: &FluidState,
    flow: f64,
) -> SolverResult<ProcessResult> {
    let fluid = sim.fluid(inbound.pressure(), inbound.temperature(), kgps(flow))?;
    sim.process(net, branch, fluid)
}

/// Classification-directed bisection over `[0, pool]`.
///
/// A guess at or above the pool fraction returns the current classification
/// without evaluating it; a guess at or below the minimum flow is a starved
/// branch and reports Low.
fn bisect_branch(
    sim: &Simulator<'_>,
    net: &mut Network,
    branch: ElementId,
    inbound: &FluidState,
    pool: f64,
) -> SolverResult<BranchFlow> {
    let cfg = &sim.config().splitter;
    let (mut low, mut high) = (0.0, pool);
    let mut mid = 0.0;
    let mut result = ProcessResult::low(inbound.pressure());

    for _ in 0..cfg.max_iterations {
        mid = (low + high) / 2.0;

        if mid >= pool * cfg.pool_fraction {
            return Ok(BranchFlow { flow: mid, result });
        }
        if mid <= cfg.min_flow_kgps {
            result.pressure_solution = PressureSolution::Low;
            return Ok(BranchFlow { flow: mid, result });
        }

        result = apply_flow(sim, net, branch, inbound, mid)?;
        match result.pressure_solution {
            PressureSolution::Low => high = mid,
            PressureSolution::High => low = mid,
            PressureSolution::Ok => return Ok(BranchFlow { flow: mid, result }),
        }
    }

    warn!(
        max_iterations = cfg.max_iterations,
        flow_kgps = mid,
        "splitter branch search reached its iteration cap"
    );
    Ok(BranchFlow { flow: mid, result })
}

/// Probe the bracket ends, predict the flow that hits the branch target
/// linearly, then bisect inside the narrowed bracket.
fn accelerated_branch(
    sim: &Simulator<'_>,
    net: &mut Network,
    branch: ElementId,
    inbound: &FluidState,
    pool: f64,
) -> SolverResult<BranchFlow> {
    let cfg = &sim.config().splitter;
    let min_flow = cfg.min_flow_kgps.min(pool);

    let at_min = apply_flow(sim, net, branch, inbound, min_flow)?;
    if at_min.pressure_solution != PressureSolution::High {
        return Ok(BranchFlow {
            flow: min_flow,
            result: at_min,
        });
    }
    let at_pool = apply_flow(sim, net, branch, inbound, pool)?;
    if at_pool.pressure_solution != PressureSolution::Low {
        return Ok(BranchFlow {
            flow: pool,
            result: at_pool,
        });
    }

    let (mut low, mut high) = (min_flow, pool);
    let mut evaluations = 2;
    let mut mid = low;
    let mut result = at_pool;

    let (p_min, p_pool) = (at_min.pressure.get::<pascal>(), at_pool.pressure.get::<pascal>());
    let spread = p_pool - p_min;
    let distinct = !nearly_equal(p_min, p_pool, Tolerances::default());
    if let Some(target) = at_min.target.filter(|_| distinct) {
        let predicted = min_flow + (target.get::<pascal>() - p_min) * (pool - min_flow) / spread;
        mid = predicted.clamp(min_flow, pool);
        result = apply_flow(sim, net, branch, inbound, mid)?;
        evaluations += 1;
        debug!(flow_kgps = mid, solution = %result.pressure_solution, "predicted branch flow");

        match result.pressure_solution {
            PressureSolution::Ok => return Ok(BranchFlow { flow: mid, result }),
            PressureSolution::Low => high = mid,
            PressureSolution::High => low = mid,
        }
    }

    for _ in evaluations..cfg.max_iterations {
        mid = (low + high) / 2.0;
        result = apply_flow(sim, net, branch, inbound, mid)?;
        match result.pressure_solution {
            PressureSolution::Ok => return Ok(BranchFlow { flow: mid, result }),
            PressureSolution::Low => high = mid,
            PressureSolution::High => low = mid,
        }
    }

    warn!(
        max_iterations = cfg.max_iterations,
        flow_kgps = mid,
        "accelerated branch search reached its iteration cap"
    );
    Ok(BranchFlow { flow: mid, result })
}

#[cfg(test)]
mod tests {
    use crate::config::{SolverConfig, SplitStrategy};
    use crate::process::Simulator;
    use bf_components::PressureSolution;
    use bf_core::units::{bara, k, kgps, m};
    use bf_fluids::IdealGasCo2;
    use bf_graph::{Network, NetworkBuilder, PipeDef};

    fn network(target_bara: f64) -> Network {
        let branch = |name: &str| PipeDef::new(name, m(5000.0), vec![m(0.3)], m(0.0));
        let mut b = NetworkBuilder::new();
        b.add_inlet("inlet", m(0.0))
            .unwrap()
            .chain_add_pipe_seg(&PipeDef::new("trunk", m(100.0), vec![m(0.6)], m(0.0)))
            .unwrap()
            .add_splitter("split", m(0.0))
            .unwrap()
            .branch(&branch("a"))
            .unwrap()
            .add_reservoir("ra", m(0.0), bara(target_bara))
            .unwrap()
            .branch(&branch("b"))
            .unwrap()
            .add_reservoir("rb", m(0.0), bara(target_bara))
            .unwrap();
        b.build().unwrap()
    }

    fn run(strategy: SplitStrategy, at_bara: f64, target_bara: f64) -> (PressureSolution, usize) {
        let model = IdealGasCo2::new();
        let mut config = SolverConfig::default();
        config.splitter.strategy = strategy;
        let sim = Simulator::new(&model, config).unwrap();
        let mut net = network(target_bara);
        let split = net.find("split").unwrap();

        let fluid = sim.fluid(bara(at_bara), k(300.0), kgps(100.0)).unwrap();
        let result = sim.process(&mut net, split, fluid).unwrap();
        (result.pressure_solution, net.allocation(split).unwrap().len())
    }

    #[test]
    fn starved_branch_aborts_low() {
        for strategy in [SplitStrategy::Bisection, SplitStrategy::Accelerated] {
            let (solution, allocated) = run(strategy, 35.0, 40.0);
            assert_eq!(solution, PressureSolution::Low);
            assert_eq!(allocated, 0);
        }
    }

    #[test]
    fn saturated_branch_aborts_high() {
        for strategy in [SplitStrategy::Bisection, SplitStrategy::Accelerated] {
            let (solution, allocated) = run(strategy, 60.0, 30.0);
            assert_eq!(solution, PressureSolution::High);
            assert_eq!(allocated, 0);
        }
    }

    #[test]
    fn splitter_below_low_limit_is_low() {
        let (solution, allocated) = run(SplitStrategy::Bisection, 0.005, 30.0);
        assert_eq!(solution, PressureSolution::Low);
        assert_eq!(allocated, 0);
    }
}
