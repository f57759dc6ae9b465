//! In-memory property and phase-envelope tables.
//!
//! Temperatures are in °C and pressures in Pa, matching the layout of the
//! exported lookup files.

use crate::error::{FluidError, FluidResult};

/// Property column of a [`FluidRow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Enthalpy,
    GasViscosity,
    LiquidViscosity,
    GasDensity,
    LiquidDensity,
    GasEntropy,
    LiquidEntropy,
}

/// One tabulated state point.
///
/// Column order on disk: `pressure, temperature, enthalpy, gasViscosity,
/// liquidViscosity, gasDensity, liquidDensity[, gasEntropy, liquidEntropy]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluidRow {
    pub pressure: f64,
    pub temperature: f64,
    pub enthalpy: f64,
    pub gas_viscosity: f64,
    pub liquid_viscosity: f64,
    pub gas_density: f64,
    pub liquid_density: f64,
    pub gas_entropy: Option<f64>,
    pub liquid_entropy: Option<f64>,
}

impl FluidRow {
    /// Build a row from 7 or 9 numeric columns.
    pub fn from_columns(values: &[f64]) -> FluidResult<Self> {
        let (gas_entropy, liquid_entropy) = match values.len() {
            7 => (None, None),
            9 => (Some(values[7]), Some(values[8])),
            n => {
                return Err(FluidError::InvalidTable {
                    what: format!("expected 7 or 9 columns, found {n}"),
                });
            }
        };
        Ok(Self {
            pressure: values[0],
            temperature: values[1],
            enthalpy: values[2],
            gas_viscosity: values[3],
            liquid_viscosity: values[4],
            gas_density: values[5],
            liquid_density: values[6],
            gas_entropy,
            liquid_entropy,
        })
    }

    pub fn value(&self, column: Column) -> Option<f64> {
        match column {
            Column::Enthalpy => Some(self.enthalpy),
            Column::GasViscosity => Some(self.gas_viscosity),
            Column::LiquidViscosity => Some(self.liquid_viscosity),
            Column::GasDensity => Some(self.gas_density),
            Column::LiquidDensity => Some(self.liquid_density),
            Column::GasEntropy => self.gas_entropy,
            Column::LiquidEntropy => self.liquid_entropy,
        }
    }

    fn has_entropy(&self) -> bool {
        self.gas_entropy.is_some() && self.liquid_entropy.is_some()
    }

    fn is_finite(&self) -> bool {
        [
            self.pressure,
            self.temperature,
            self.enthalpy,
            self.gas_viscosity,
            self.liquid_viscosity,
            self.gas_density,
            self.liquid_density,
        ]
        .iter()
        .chain(self.gas_entropy.iter())
        .chain(self.liquid_entropy.iter())
        .all(|v| v.is_finite())
    }
}

/// Rows sharing one pressure, sorted by temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct PressureBucket {
    temperatures: Vec<f64>,
    rows: Vec<FluidRow>,
}

impl PressureBucket {
    pub fn temperatures(&self) -> &[f64] {
        &self.temperatures
    }

    pub fn rows(&self) -> &[FluidRow] {
        &self.rows
    }

    pub fn row(&self, idx: usize) -> &FluidRow {
        &self.rows[idx]
    }
}

/// Property lookup table grouped by pressure.
///
/// The pressure axis is strictly increasing and every bucket holds strictly
/// increasing temperatures. Both are enforced on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct FluidPropertyTable {
    pressures: Vec<f64>,
    buckets: Vec<PressureBucket>,
    has_entropy: bool,
}

impl FluidPropertyTable {
    /// Sort, group and validate raw rows.
    pub fn from_rows(mut rows: Vec<FluidRow>) -> FluidResult<Self> {
        if rows.is_empty() {
            return Err(FluidError::InvalidTable {
                what: "fluid table has no rows".into(),
            });
        }
        if let Some(bad) = rows.iter().find(|r| !r.is_finite()) {
            return Err(FluidError::InvalidTable {
                what: format!(
                    "non-finite value in row at {} Pa, {} °C",
                    bad.pressure, bad.temperature
                ),
            });
        }

        let has_entropy = rows[0].has_entropy();
        if rows.iter().any(|r| r.has_entropy() != has_entropy) {
            return Err(FluidError::InvalidTable {
                what: "entropy columns must be present on every row or none".into(),
            });
        }

        rows.sort_by(|a, b| {
            a.pressure
                .total_cmp(&b.pressure)
                .then(a.temperature.total_cmp(&b.temperature))
        });

        let mut pressures: Vec<f64> = Vec::new();
        let mut buckets: Vec<PressureBucket> = Vec::new();

        for row in rows {
            let same_pressure = pressures.last() == Some(&row.pressure);
            match buckets.last_mut() {
                Some(bucket) if same_pressure => {
                    if bucket.temperatures.last() == Some(&row.temperature) {
                        return Err(FluidError::InvalidTable {
                            what: format!(
                                "duplicate row at {} Pa, {} °C",
                                row.pressure, row.temperature
                            ),
                        });
                    }
                    bucket.temperatures.push(row.temperature);
                    bucket.rows.push(row);
                }
                _ => {
                    pressures.push(row.pressure);
                    buckets.push(PressureBucket {
                        temperatures: vec![row.temperature],
                        rows: vec![row],
                    });
                }
            }
        }

        Ok(Self {
            pressures,
            buckets,
            has_entropy,
        })
    }

    /// Unique pressures, strictly increasing.
    pub fn pressures(&self) -> &[f64] {
        &self.pressures
    }

    pub fn bucket(&self, idx: usize) -> &PressureBucket {
        &self.buckets[idx]
    }

    pub fn has_entropy(&self) -> bool {
        self.has_entropy
    }

    pub fn row_count(&self) -> usize {
        self.buckets.iter().map(|b| b.rows.len()).sum()
    }
}

/// Saturation pressures at one temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhasePoint {
    pub temperature: f64,
    pub bubble: f64,
    pub dew: f64,
}

/// Bubble and dew curves, sorted by temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseEnvelopeTable {
    points: Vec<PhasePoint>,
    max_dew: f64,
}

impl PhaseEnvelopeTable {
    pub fn from_points(mut points: Vec<PhasePoint>) -> FluidResult<Self> {
        if points.is_empty() {
            return Err(FluidError::InvalidTable {
                what: "phase envelope has no rows".into(),
            });
        }
        if points
            .iter()
            .any(|p| !(p.temperature.is_finite() && p.bubble.is_finite() && p.dew.is_finite()))
        {
            return Err(FluidError::InvalidTable {
                what: "non-finite value in phase envelope".into(),
            });
        }

        points.sort_by(|a, b| a.temperature.total_cmp(&b.temperature));
        if let Some(pair) = points
            .windows(2)
            .find(|w| w[0].temperature == w[1].temperature)
        {
            return Err(FluidError::InvalidTable {
                what: format!("duplicate phase envelope row at {} °C", pair[0].temperature),
            });
        }

        let max_dew = points
            .iter()
            .map(|p| p.dew)
            .fold(f64::NEG_INFINITY, f64::max);

        Ok(Self { points, max_dew })
    }

    pub fn points(&self) -> &[PhasePoint] {
        &self.points
    }

    /// Highest dew pressure on the curve.
    pub fn max_dew(&self) -> f64 {
        self.max_dew
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(p: f64, t: f64) -> FluidRow {
        FluidRow::from_columns(&[p, t, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap()
    }

    #[test]
    fn rows_are_grouped_and_sorted() {
        let table = FluidPropertyTable::from_rows(vec![
            row(2.0e6, 20.0),
            row(1.0e6, 20.0),
            row(1.0e6, 10.0),
            row(2.0e6, 10.0),
        ])
        .unwrap();

        assert_eq!(table.pressures(), &[1.0e6, 2.0e6]);
        assert_eq!(table.bucket(0).temperatures(), &[10.0, 20.0]);
        assert_eq!(table.bucket(1).temperatures(), &[10.0, 20.0]);
        assert_eq!(table.row_count(), 4);
        assert!(!table.has_entropy());
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let err = FluidPropertyTable::from_rows(vec![row(1.0e6, 10.0), row(1.0e6, 10.0)]);
        assert!(matches!(err, Err(FluidError::InvalidTable { .. })));
    }

    #[test]
    fn mixed_entropy_columns_are_rejected() {
        let with = FluidRow::from_columns(&[1.0e6, 20.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]).unwrap();
        let err = FluidPropertyTable::from_rows(vec![row(1.0e6, 10.0), with]);
        assert!(matches!(err, Err(FluidError::InvalidTable { .. })));
    }

    #[test]
    fn wrong_column_count_is_rejected() {
        assert!(FluidRow::from_columns(&[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn empty_tables_are_rejected() {
        assert!(FluidPropertyTable::from_rows(Vec::new()).is_err());
        assert!(PhaseEnvelopeTable::from_points(Vec::new()).is_err());
    }

    #[test]
    fn envelope_sorts_and_tracks_max_dew() {
        let env = PhaseEnvelopeTable::from_points(vec![
            PhasePoint {
                temperature: 10.0,
                bubble: 4.5e6,
                dew: 4.4e6,
            },
            PhasePoint {
                temperature: 0.0,
                bubble: 3.5e6,
                dew: 3.4e6,
            },
        ])
        .unwrap();
        assert_eq!(env.points()[0].temperature, 0.0);
        assert_eq!(env.max_dew(), 4.4e6);
    }

    #[test]
    fn envelope_rejects_duplicate_temperatures() {
        let p = PhasePoint {
            temperature: 0.0,
            bubble: 1.0,
            dew: 1.0,
        };
        assert!(PhaseEnvelopeTable::from_points(vec![p, p]).is_err());
    }
}
