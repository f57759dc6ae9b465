//! bf-project: network file format, validation and network construction.
//!
//! A network file is a named list of builder instructions with an optional
//! `settings:` block of solver overrides:
//!
//! ```yaml
//! version: 1
//! name: Single pipe
//! instructions:
//!   - type: inlet
//!     name: Inlet
//!   - type: pipeseg
//!     name: Pipe
//!     length_m: 200.0
//!     diameters_m: [0.9144]
//!   - type: reservoir
//!     name: Reservoir
//!     target_pa: 3.0e6
//! ```
//!
//! Pipeline geometry can also be imported from an OLGA `.genkey` file with
//! [`load_genkey`]; see [`genkey`].

pub mod genkey;
pub mod schema;
pub mod validate;

use bf_components::{DEFAULT_ISENTROPIC_EFFICIENCY, PressureStage, StageModel};
use bf_core::ElementId;
use bf_core::units::{MassRate, Pressure, Temperature, k, kgps, m, pa};
use bf_graph::{GraphError, Network, NetworkBuilder, PipeDef, SplitterRef};
use bf_solver::SolverConfig;

pub use genkey::{GenkeyError, MAX_SEGMENT_LENGTH_M, import_genkey};
pub use schema::*;
pub use validate::{LATEST_VERSION, ValidationError, validate_network_file};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Genkey error: {0}")]
    Genkey(#[from] GenkeyError),

    #[error("Network error: {0}")]
    Graph(#[from] GraphError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<NetworkFile> {
    let content = std::fs::read_to_string(path)?;
    let file: NetworkFile = serde_yaml::from_str(&content)?;
    validate_network_file(&file)?;
    Ok(file)
}

pub fn save_yaml(path: &std::path::Path, file: &NetworkFile) -> ProjectResult<()> {
    validate_network_file(file)?;
    let content = serde_yaml::to_string(file)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<NetworkFile> {
    let content = std::fs::read_to_string(path)?;
    let file: NetworkFile = serde_json::from_str(&content)?;
    validate_network_file(&file)?;
    Ok(file)
}

pub fn save_json(path: &std::path::Path, file: &NetworkFile) -> ProjectResult<()> {
    validate_network_file(file)?;
    let content = serde_json::to_string_pretty(file)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Import the pipeline geometry of an OLGA `.genkey` file. The network is
/// named after the file stem.
pub fn load_genkey(path: &std::path::Path) -> ProjectResult<NetworkFile> {
    let content = std::fs::read_to_string(path)?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file = import_genkey(&name, &content)?;
    validate_network_file(&file)?;
    Ok(file)
}

/// Boundary fluid from a `setfluid` instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InletFluid {
    pub pressure: Pressure,
    pub temperature: Temperature,
    pub flowrate: MassRate,
}

/// A network assembled from a [`NetworkFile`].
#[derive(Debug, Clone)]
pub struct BuiltNetwork {
    pub network: Network,
    pub key_points: Vec<ElementId>,
    pub fluid: Option<InletFluid>,
    pub settings: SolverConfig,
}

/// Replay the file's instructions through a [`NetworkBuilder`].
pub fn build_network(file: &NetworkFile) -> ProjectResult<BuiltNetwork> {
    validate_network_file(file)?;

    let mut builder = NetworkBuilder::new();
    let mut fluid = None;

    for instruction in &file.instructions {
        match instruction {
            Instruction::Inlet { name, elevation_m } => {
                builder.add_inlet(name.as_str(), m(*elevation_m))?;
            }
            Instruction::PipeSeg {
                name,
                length_m,
                diameters_m,
                elevation_m,
            } => {
                builder.chain_add_pipe_seg(&pipe_def(name, *length_m, diameters_m, *elevation_m))?;
            }
            Instruction::PipeSeries {
                name,
                count,
                length_m,
                diameters_m,
                elevation_m,
                elevations_m,
                lengths_m,
            } => {
                let def = pipe_def(name, *length_m, diameters_m, *elevation_m);
                let elevations: Vec<_> = elevations_m.iter().map(|e| m(*e)).collect();
                let lengths: Vec<_> = lengths_m.iter().map(|l| m(*l)).collect();
                builder.add_pipe_series(*count, &def, &elevations, &lengths)?;
            }
            Instruction::Splitter { name, elevation_m } => {
                builder.add_splitter(name.as_str(), m(*elevation_m))?;
            }
            Instruction::SelectSplitter { splitter } => {
                let which = match splitter {
                    SplitterSelector::Index(i) => SplitterRef::Index(*i),
                    SplitterSelector::Name(n) => SplitterRef::Name(n.clone()),
                };
                builder.select_splitter(which)?;
            }
            Instruction::Branch {
                name,
                length_m,
                diameters_m,
                elevation_m,
            } => {
                builder.branch(&pipe_def(name, *length_m, diameters_m, *elevation_m))?;
            }
            Instruction::Well {
                name,
                elevation_m,
                reservoir,
            } => {
                builder.add_well(name.as_str(), m(*elevation_m), *reservoir)?;
            }
            Instruction::Analogue {
                name,
                elevation_m,
                function,
            } => {
                builder.add_analogue(name.as_str(), m(*elevation_m), function.clone())?;
            }
            Instruction::Valve {
                name,
                elevation_m,
                input_pressure_pa,
            } => {
                builder.add_valve(name.as_str(), m(*elevation_m), pa(*input_pressure_pa))?;
            }
            Instruction::PressureGate {
                name,
                elevation_m,
                input_pressure_pa,
            } => {
                builder.add_pressure_gate(name.as_str(), m(*elevation_m), pa(*input_pressure_pa))?;
            }
            Instruction::PressureChanger {
                name,
                elevation_m,
                output_pressure_pa,
                isentropic_efficiency,
            } => {
                let mut stage = PressureStage::changer(pa(*output_pressure_pa));
                if let Some(efficiency) = isentropic_efficiency {
                    stage.model = StageModel::Isentropic {
                        efficiency: *efficiency,
                    };
                }
                builder.add_pressure_changer(name.as_str(), m(*elevation_m), stage)?;
            }
            Instruction::Compressor {
                name,
                elevation_m,
                output_pressure_pa,
                isentropic_efficiency,
            } => {
                let efficiency = isentropic_efficiency.unwrap_or(DEFAULT_ISENTROPIC_EFFICIENCY);
                let stage = PressureStage {
                    output_pressure: pa(*output_pressure_pa),
                    model: StageModel::Isentropic { efficiency },
                };
                builder.add_compressor_stage(name.as_str(), m(*elevation_m), stage)?;
            }
            Instruction::Reservoir {
                name,
                elevation_m,
                target_pa,
            } => {
                builder.add_reservoir(name.as_str(), m(*elevation_m), pa(*target_pa))?;
            }
            Instruction::SetFluid {
                pressure_pa,
                temperature_k,
                flowrate_kgps,
            } => {
                fluid = Some(InletFluid {
                    pressure: pa(*pressure_pa),
                    temperature: k(*temperature_k),
                    flowrate: kgps(*flowrate_kgps),
                });
            }
        }
    }

    let key_points = builder.key_points().to_vec();
    let network = builder.build()?;
    Ok(BuiltNetwork {
        network,
        key_points,
        fluid,
        settings: file.settings.clone().unwrap_or_default(),
    })
}

fn pipe_def(name: &str, length_m: f64, diameters_m: &[f64], elevation_m: f64) -> PipeDef {
    PipeDef::new(
        name,
        m(length_m),
        diameters_m.iter().map(|d| m(*d)).collect(),
        m(elevation_m),
    )
}
