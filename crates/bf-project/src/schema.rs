//! Network file schema definitions.

use serde::{Deserialize, Serialize};

use bf_components::{ModelFunction, RealReservoir};
use bf_solver::SolverConfig;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkFile {
    pub version: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<SolverConfig>,
    #[serde(default)]
    pub instructions: Vec<Instruction>,
}

/// One builder step. Instructions are applied in order, so each one is
/// attached after the element the previous one created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Instruction {
    Inlet {
        name: String,
        #[serde(default)]
        elevation_m: f64,
    },
    PipeSeg {
        name: String,
        length_m: f64,
        diameters_m: Vec<f64>,
        #[serde(default)]
        elevation_m: f64,
    },
    /// `count` chained copies of one segment, cycling through the optional
    /// per-segment elevations and lengths.
    PipeSeries {
        name: String,
        count: usize,
        length_m: f64,
        diameters_m: Vec<f64>,
        #[serde(default)]
        elevation_m: f64,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        elevations_m: Vec<f64>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        lengths_m: Vec<f64>,
    },
    Splitter {
        name: String,
        #[serde(default)]
        elevation_m: f64,
    },
    SelectSplitter {
        splitter: SplitterSelector,
    },
    /// A pipe segment leaving the selected splitter.
    Branch {
        name: String,
        length_m: f64,
        diameters_m: Vec<f64>,
        #[serde(default)]
        elevation_m: f64,
    },
    Well {
        name: String,
        #[serde(default)]
        elevation_m: f64,
        reservoir: RealReservoir,
    },
    Analogue {
        name: String,
        #[serde(default)]
        elevation_m: f64,
        function: ModelFunction,
    },
    Valve {
        name: String,
        #[serde(default)]
        elevation_m: f64,
        input_pressure_pa: f64,
    },
    PressureGate {
        name: String,
        #[serde(default)]
        elevation_m: f64,
        input_pressure_pa: f64,
    },
    /// Isenthalpic unless an efficiency is given.
    PressureChanger {
        name: String,
        #[serde(default)]
        elevation_m: f64,
        output_pressure_pa: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        isentropic_efficiency: Option<f64>,
    },
    Compressor {
        name: String,
        #[serde(default)]
        elevation_m: f64,
        output_pressure_pa: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        isentropic_efficiency: Option<f64>,
    },
    Reservoir {
        name: String,
        #[serde(default)]
        elevation_m: f64,
        target_pa: f64,
    },
    /// Boundary fluid applied to the inlet before a simulation.
    SetFluid {
        pressure_pa: f64,
        temperature_k: f64,
        flowrate_kgps: f64,
    },
}

impl Instruction {
    /// Name of the element this instruction creates, if any.
    pub fn element_name(&self) -> Option<&str> {
        match self {
            Instruction::Inlet { name, .. }
            | Instruction::PipeSeg { name, .. }
            | Instruction::PipeSeries { name, .. }
            | Instruction::Splitter { name, .. }
            | Instruction::Branch { name, .. }
            | Instruction::Well { name, .. }
            | Instruction::Analogue { name, .. }
            | Instruction::Valve { name, .. }
            | Instruction::PressureGate { name, .. }
            | Instruction::PressureChanger { name, .. }
            | Instruction::Compressor { name, .. }
            | Instruction::Reservoir { name, .. } => Some(name),
            Instruction::SelectSplitter { .. } | Instruction::SetFluid { .. } => None,
        }
    }
}

/// Splitter reference by creation index or by name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SplitterSelector {
    Index(usize),
    Name(String),
}
