//! Solver settings.
//!
//! Every field has a default so a partial `settings:` block in a network file
//! only overrides what it names.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SolverError, SolverResult};
use bf_components::{PipeModel, PressureLimits, TemperatureInversion};

/// How a splitter searches each branch flowrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitStrategy {
    /// Classification-directed bisection over `[0, pool]`.
    #[default]
    Bisection,
    /// Probe both ends, predict the flow linearly, then bisect the narrowed bracket.
    Accelerated,
}

impl FromStr for SplitStrategy {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bisection" => Ok(Self::Bisection),
            "accelerated" => Ok(Self::Accelerated),
            other => Err(SolverError::Config {
                what: format!("unknown split strategy '{other}'"),
            }),
        }
    }
}

/// Inlet pressure bisection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InletSearchConfig {
    pub low_pa: f64,
    pub high_pa: f64,
    pub max_iterations: usize,
}

impl Default for InletSearchConfig {
    fn default() -> Self {
        Self {
            low_pa: 1.0e5,
            high_pa: 140.0e5,
            max_iterations: 30,
        }
    }
}

/// Splitter branch search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    pub strategy: SplitStrategy,
    pub max_iterations: usize,
    /// Flowrates at or below this are treated as a starved branch [kg/s].
    pub min_flow_kgps: f64,
    /// Bisection stops once the guess reaches this share of the pool.
    pub pool_fraction: f64,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            strategy: SplitStrategy::Bisection,
            max_iterations: 25,
            min_flow_kgps: 0.001,
            pool_fraction: 0.9,
        }
    }
}

/// Valve and pressure-gate downstream pressure search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValveSearchConfig {
    pub floor_pa: f64,
    pub max_iterations: usize,
}

impl Default for ValveSearchConfig {
    fn default() -> Self {
        Self {
            floor_pa: 1.0e5,
            max_iterations: 25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub inlet: InletSearchConfig,
    pub splitter: SplitterConfig,
    pub valve: ValveSearchConfig,
    pub inversion: TemperatureInversion,
    pub limits: PressureLimits,
    pub pipe_model: PipeModel,
}

impl SolverConfig {
    pub fn validate(&self) -> SolverResult<()> {
        let bad = |what: String| Err(SolverError::Config { what });

        let inlet = &self.inlet;
        if !(inlet.low_pa.is_finite() && inlet.high_pa.is_finite()) || inlet.low_pa >= inlet.high_pa
        {
            return bad(format!(
                "inlet bracket must be finite and increasing, got {} - {} Pa",
                inlet.low_pa, inlet.high_pa
            ));
        }
        if inlet.max_iterations == 0
            || self.splitter.max_iterations == 0
            || self.valve.max_iterations == 0
        {
            return bad("iteration caps must be at least 1".into());
        }
        if !(self.splitter.min_flow_kgps >= 0.0) {
            return bad("splitter minimum flow must not be negative".into());
        }
        if !(self.splitter.pool_fraction > 0.0 && self.splitter.pool_fraction <= 1.0) {
            return bad(format!(
                "splitter pool fraction must be in (0, 1], got {}",
                self.splitter.pool_fraction
            ));
        }
        if !(self.valve.floor_pa > 0.0) {
            return bad("valve search floor must be positive".into());
        }
        let inv = &self.inversion;
        if !(inv.min_c.is_finite() && inv.max_c.is_finite()) || inv.min_c >= inv.max_c {
            return bad(format!(
                "temperature inversion domain must be increasing, got {} - {} °C",
                inv.min_c, inv.max_c
            ));
        }
        let limits = &self.limits;
        if !(limits.low_pa >= 0.0 && limits.ceiling_pa > limits.low_pa) {
            return bad(format!(
                "pressure limits must satisfy 0 <= low < ceiling, got {} / {} Pa",
                limits.low_pa, limits.ceiling_pa
            ));
        }
        Ok(())
    }
}
