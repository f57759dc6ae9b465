//! Network file validation.
//!
//! Checks what can be checked without building: versions, names, numeric
//! fields and splitter references. Ordering rules are left to the builder.

use std::collections::HashSet;

use crate::schema::{Instruction, NetworkFile, SplitterSelector};

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate name: {name}")]
    DuplicateName { name: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid order: {what}")]
    Order { what: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_network_file(file: &NetworkFile) -> Result<(), ValidationError> {
    if file.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: file.version,
        });
    }

    if let Some(settings) = &file.settings {
        settings
            .validate()
            .map_err(|e| ValidationError::InvalidValue {
                field: "settings".to_string(),
                value: String::new(),
                reason: e.to_string(),
            })?;
    }

    match file.instructions.first() {
        Some(Instruction::Inlet { .. }) => {}
        _ => {
            return Err(ValidationError::Order {
                what: "the first instruction must be an inlet".to_string(),
            });
        }
    }

    let mut names = HashSet::new();
    let mut splitters = Vec::new();
    let mut fluids = 0;

    for instruction in &file.instructions {
        if let Some(name) = instruction.element_name() {
            if !names.insert(name.to_lowercase()) {
                return Err(ValidationError::DuplicateName {
                    name: name.to_string(),
                });
            }
        }
        if let Instruction::Splitter { name, .. } = instruction {
            splitters.push(name.to_lowercase());
        }
        if matches!(instruction, Instruction::SetFluid { .. }) {
            fluids += 1;
            if fluids > 1 {
                return Err(ValidationError::Order {
                    what: "at most one setfluid instruction is allowed".to_string(),
                });
            }
        }
        validate_instruction(instruction, &splitters)?;
    }

    Ok(())
}

fn validate_instruction(
    instruction: &Instruction,
    splitters: &[String],
) -> Result<(), ValidationError> {
    match instruction {
        Instruction::Inlet { name, elevation_m } | Instruction::Splitter { name, elevation_m } => {
            finite(name, "elevation_m", *elevation_m)
        }
        Instruction::PipeSeg {
            name,
            length_m,
            diameters_m,
            elevation_m,
        }
        | Instruction::Branch {
            name,
            length_m,
            diameters_m,
            elevation_m,
        } => {
            finite(name, "elevation_m", *elevation_m)?;
            pipe_geometry(name, *length_m, diameters_m)
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
            if *count == 0 {
                return Err(ValidationError::InvalidValue {
                    field: format!("'{name}' count"),
                    value: count.to_string(),
                    reason: "must be at least 1".to_string(),
                });
            }
            finite(name, "elevation_m", *elevation_m)?;
            pipe_geometry(name, *length_m, diameters_m)?;
            for e in elevations_m {
                finite(name, "elevations_m", *e)?;
            }
            for l in lengths_m {
                positive(name, "lengths_m", *l)?;
            }
            Ok(())
        }
        Instruction::SelectSplitter { splitter } => match splitter {
            SplitterSelector::Index(i) if *i >= splitters.len() => {
                Err(ValidationError::MissingReference {
                    id: i.to_string(),
                    context: "selectsplitter index".to_string(),
                })
            }
            SplitterSelector::Name(n) if !splitters.contains(&n.to_lowercase()) => {
                Err(ValidationError::MissingReference {
                    id: n.clone(),
                    context: "selectsplitter name".to_string(),
                })
            }
            _ => Ok(()),
        },
        Instruction::Well {
            name, elevation_m, ..
        } => finite(name, "elevation_m", *elevation_m),
        Instruction::Analogue {
            name,
            elevation_m,
            function,
        } => {
            finite(name, "elevation_m", *elevation_m)?;
            function
                .validate()
                .map_err(|e| ValidationError::InvalidValue {
                    field: format!("'{name}' function"),
                    value: String::new(),
                    reason: e.to_string(),
                })
        }
        Instruction::Valve {
            name,
            elevation_m,
            input_pressure_pa,
        }
        | Instruction::PressureGate {
            name,
            elevation_m,
            input_pressure_pa,
        } => {
            finite(name, "elevation_m", *elevation_m)?;
            positive(name, "input_pressure_pa", *input_pressure_pa)
        }
        Instruction::PressureChanger {
            name,
            elevation_m,
            output_pressure_pa,
            isentropic_efficiency,
        }
        | Instruction::Compressor {
            name,
            elevation_m,
            output_pressure_pa,
            isentropic_efficiency,
        } => {
            finite(name, "elevation_m", *elevation_m)?;
            positive(name, "output_pressure_pa", *output_pressure_pa)?;
            if let Some(eta) = isentropic_efficiency
                && !(*eta > 0.0 && *eta <= 1.0)
            {
                return Err(ValidationError::InvalidValue {
                    field: format!("'{name}' isentropic_efficiency"),
                    value: eta.to_string(),
                    reason: "must be in (0, 1]".to_string(),
                });
            }
            Ok(())
        }
        Instruction::Reservoir {
            name,
            elevation_m,
            target_pa,
        } => {
            finite(name, "elevation_m", *elevation_m)?;
            positive(name, "target_pa", *target_pa)
        }
        Instruction::SetFluid {
            pressure_pa,
            temperature_k,
            flowrate_kgps,
        } => {
            positive("setfluid", "pressure_pa", *pressure_pa)?;
            positive("setfluid", "temperature_k", *temperature_k)?;
            if !flowrate_kgps.is_finite() || *flowrate_kgps < 0.0 {
                return Err(ValidationError::InvalidValue {
                    field: "'setfluid' flowrate_kgps".to_string(),
                    value: flowrate_kgps.to_string(),
                    reason: "must be non-negative and finite".to_string(),
                });
            }
            Ok(())
        }
    }
}

fn pipe_geometry(name: &str, length_m: f64, diameters_m: &[f64]) -> Result<(), ValidationError> {
    positive(name, "length_m", length_m)?;
    if diameters_m.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: format!("'{name}' diameters_m"),
            value: "[]".to_string(),
            reason: "a pipe needs at least one line".to_string(),
        });
    }
    for d in diameters_m {
        positive(name, "diameters_m", *d)?;
    }
    Ok(())
}

fn finite(name: &str, field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidValue {
            field: format!("'{name}' {field}"),
            value: value.to_string(),
            reason: "must be finite".to_string(),
        });
    }
    Ok(())
}

fn positive(name: &str, field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: format!("'{name}' {field}"),
            value: value.to_string(),
            reason: "must be positive and finite".to_string(),
        });
    }
    Ok(())
}
