//! Table sources.
//!
//! Property tables are read completely and validated before a
//! [`crate::TabulatedProperties`] value can exist.

use std::path::{Path, PathBuf};

use crate::error::{FluidError, FluidResult};
use crate::tables::{FluidPropertyTable, FluidRow, PhaseEnvelopeTable, PhasePoint};

/// Anything that can produce a fluid property table.
pub trait FluidTableSource {
    fn read_fluid_table(&self) -> FluidResult<FluidPropertyTable>;
}

/// Anything that can produce a phase envelope.
pub trait PhaseEnvelopeSource {
    fn read_phase_envelope(&self) -> FluidResult<PhaseEnvelopeTable>;
}

/// Fluid property table stored as CSV: one header row, then 7 or 9 numeric
/// columns per row.
#[derive(Debug, Clone)]
pub struct CsvFluidTable {
    path: PathBuf,
}

impl CsvFluidTable {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FluidTableSource for CsvFluidTable {
    fn read_fluid_table(&self) -> FluidResult<FluidPropertyTable> {
        let content = read_file(&self.path)?;
        let rows = parse_csv(&content, &self.path.display().to_string())?
            .into_iter()
            .map(|(line, values)| {
                FluidRow::from_columns(&values).map_err(|e| FluidError::Parse {
                    source_name: self.path.display().to_string(),
                    line,
                    message: e.to_string(),
                })
            })
            .collect::<FluidResult<Vec<_>>>()?;
        FluidPropertyTable::from_rows(rows)
    }
}

/// Phase envelope stored as CSV: header row, then `temperature, bubble, dew`.
#[derive(Debug, Clone)]
pub struct CsvPhaseEnvelope {
    path: PathBuf,
}

impl CsvPhaseEnvelope {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PhaseEnvelopeSource for CsvPhaseEnvelope {
    fn read_phase_envelope(&self) -> FluidResult<PhaseEnvelopeTable> {
        let content = read_file(&self.path)?;
        let name = self.path.display().to_string();
        let points = parse_csv(&content, &name)?
            .into_iter()
            .map(|(line, values)| match values.as_slice() {
                [temperature, bubble, dew] => Ok(PhasePoint {
                    temperature: *temperature,
                    bubble: *bubble,
                    dew: *dew,
                }),
                other => Err(FluidError::Parse {
                    source_name: name.clone(),
                    line,
                    message: format!("expected 3 columns, found {}", other.len()),
                }),
            })
            .collect::<FluidResult<Vec<_>>>()?;
        PhaseEnvelopeTable::from_points(points)
    }
}

/// Rows supplied directly, e.g. from a test or another loader.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFluidTable {
    pub rows: Vec<FluidRow>,
}

impl FluidTableSource for InMemoryFluidTable {
    fn read_fluid_table(&self) -> FluidResult<FluidPropertyTable> {
        FluidPropertyTable::from_rows(self.rows.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryPhaseEnvelope {
    pub points: Vec<PhasePoint>,
}

impl PhaseEnvelopeSource for InMemoryPhaseEnvelope {
    fn read_phase_envelope(&self) -> FluidResult<PhaseEnvelopeTable> {
        PhaseEnvelopeTable::from_points(self.points.clone())
    }
}

fn read_file(path: &Path) -> FluidResult<String> {
    std::fs::read_to_string(path).map_err(|e| FluidError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Numeric rows of a CSV body with their 1-based line numbers.
///
/// The first non-blank line is the header and is skipped.
fn parse_csv(content: &str, source_name: &str) -> FluidResult<Vec<(usize, Vec<f64>)>> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .skip(1)
        .map(|(line_no, line)| {
            line.split(',')
                .map(|cell| {
                    cell.trim().parse::<f64>().map_err(|e| FluidError::Parse {
                        source_name: source_name.to_string(),
                        line: line_no,
                        message: format!("'{}': {e}", cell.trim()),
                    })
                })
                .collect::<FluidResult<Vec<_>>>()
                .map(|values| (line_no, values))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_skips_header_and_blank_lines() {
        let rows = parse_csv("T,PB,PD\n\n0,1,2\n \n10,3,4\n", "env").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], (3, vec![0.0, 1.0, 2.0]));
        assert_eq!(rows[1].0, 5);
    }

    #[test]
    fn parse_reports_line_of_bad_cell() {
        let err = parse_csv("a,b\n1,2\n3,x\n", "table.csv").unwrap_err();
        match err {
            FluidError::Parse {
                source_name, line, ..
            } => {
                assert_eq!(source_name, "table.csv");
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = CsvPhaseEnvelope::new("does/not/exist.csv")
            .read_phase_envelope()
            .unwrap_err();
        assert!(matches!(err, FluidError::Io { .. }));
    }

    #[test]
    fn in_memory_sources_validate() {
        let source = InMemoryPhaseEnvelope {
            points: vec![PhasePoint {
                temperature: 0.0,
                bubble: 3.5e6,
                dew: 3.4e6,
            }],
        };
        assert_eq!(source.read_phase_envelope().unwrap().points().len(), 1);
        assert!(InMemoryFluidTable::default().read_fluid_table().is_err());
    }
}
