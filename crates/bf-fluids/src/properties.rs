//! Table-driven property model: phase classification and bilinear
//! interpolation over the pressure/temperature grid.

use crate::error::{FluidError, FluidResult};
use crate::loader::{FluidTableSource, PhaseEnvelopeSource};
use crate::model::{Phase, PropertyModel, SpecEnthalpy, SpecEntropy};
use crate::tables::{Column, FluidPropertyTable, FluidRow, PhaseEnvelopeTable};
use bf_core::numeric::nan_or;
use bf_core::search::boundary_search;
use bf_core::units::{Density, DynVisc, Pressure, Temperature, kgpm3, pas, to_celsius};

/// Interpolation weights of a pressure/temperature query.
///
/// The temperature weights are local to each pressure bucket since buckets
/// need not share a temperature axis. Exact hits use 0.5/0.5, which averages
/// two copies of the same row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PtWeights {
    pub pressure_down: f64,
    pub pressure_up: f64,
    pub low_bucket_down: f64,
    pub low_bucket_up: f64,
    pub high_bucket_down: f64,
    pub high_bucket_up: f64,
}

/// The four table rows surrounding a query point.
///
/// `x` is the pressure axis and `y` the temperature axis: `x0y1` is the
/// low-pressure row at the upper temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyPoints {
    pub x0y0: FluidRow,
    pub x0y1: FluidRow,
    pub x1y0: FluidRow,
    pub x1y1: FluidRow,
    pub weights: PtWeights,
}

impl NearbyPoints {
    /// Bilinear average of one column.
    pub fn interpolate(&self, column: Column) -> FluidResult<f64> {
        let value = |row: &FluidRow| {
            row.value(column).ok_or(FluidError::NotSupported {
                what: "entropy columns missing from fluid table",
            })
        };
        let w = &self.weights;
        let low = w.low_bucket_down * value(&self.x0y0)? + w.low_bucket_up * value(&self.x0y1)?;
        let high =
            w.high_bucket_down * value(&self.x1y0)? + w.high_bucket_up * value(&self.x1y1)?;
        Ok(w.pressure_down * low + w.pressure_up * high)
    }
}

/// Properties interpolated from a loaded lookup table and phase envelope.
#[derive(Debug, Clone)]
pub struct TabulatedProperties {
    envelope: PhaseEnvelopeTable,
    table: FluidPropertyTable,
}

impl TabulatedProperties {
    pub fn new(envelope: PhaseEnvelopeTable, table: FluidPropertyTable) -> Self {
        Self { envelope, table }
    }

    /// Load both tables eagerly from their sources.
    pub fn load(
        envelope: &dyn PhaseEnvelopeSource,
        table: &dyn FluidTableSource,
    ) -> FluidResult<Self> {
        Ok(Self::new(
            envelope.read_phase_envelope()?,
            table.read_fluid_table()?,
        ))
    }

    pub fn envelope(&self) -> &PhaseEnvelopeTable {
        &self.envelope
    }

    pub fn table(&self) -> &FluidPropertyTable {
        &self.table
    }

    /// Classify a point (pressure in Pa, temperature in °C) against the envelope.
    pub fn phase_at(&self, p_pa: f64, t_c: f64) -> FluidResult<Phase> {
        let points = self.envelope.points();
        let right = points.iter().position(|pt| pt.temperature > t_c);

        let right = match right {
            Some(idx) if idx > 0 => idx,
            _ => {
                // Outside the curve's temperature span: only sub-dew gas is known.
                return if p_pa < self.envelope.max_dew() {
                    Ok(Phase::Gas)
                } else {
                    Err(FluidError::OutOfRange {
                        what: "phase envelope",
                        value: p_pa,
                    })
                };
            }
        };

        let (left, right) = (points[right - 1], points[right]);
        let fraction = (t_c - left.temperature) / (right.temperature - left.temperature);
        let bubble = left.bubble + fraction * (right.bubble - left.bubble);
        let dew = left.dew + fraction * (right.dew - left.dew);

        if p_pa > bubble {
            Ok(Phase::Liquid)
        } else if p_pa > dew {
            Ok(Phase::TwoPhase)
        } else {
            Ok(Phase::Gas)
        }
    }

    /// Locate the four grid rows around a point (pressure in Pa, temperature in °C).
    pub fn search_nearby_points(&self, p_pa: f64, t_c: f64) -> FluidResult<NearbyPoints> {
        let pressure = boundary_search(self.table.pressures(), p_pa)?;

        let low_bucket = self.table.bucket(pressure.low_idx);
        let high_bucket = self.table.bucket(pressure.high_idx);

        let low_t = boundary_search(low_bucket.temperatures(), t_c)?;
        let high_t = boundary_search(high_bucket.temperatures(), t_c)?;

        Ok(NearbyPoints {
            x0y0: *low_bucket.row(low_t.low_idx),
            x0y1: *low_bucket.row(low_t.high_idx),
            x1y0: *high_bucket.row(high_t.low_idx),
            x1y1: *high_bucket.row(high_t.high_idx),
            weights: PtWeights {
                pressure_down: nan_or(pressure.weight_low, 0.5),
                pressure_up: nan_or(pressure.weight_high, 0.5),
                low_bucket_down: nan_or(low_t.weight_low, 0.5),
                low_bucket_up: nan_or(low_t.weight_high, 0.5),
                high_bucket_down: nan_or(high_t.weight_low, 0.5),
                high_bucket_up: nan_or(high_t.weight_high, 0.5),
            },
        })
    }

    /// Two-phase points read the gas columns.
    fn phase_column(&self, p_pa: f64, t_c: f64, gas: Column, liquid: Column) -> FluidResult<Column> {
        Ok(match self.phase_at(p_pa, t_c)? {
            Phase::Liquid => liquid,
            Phase::Gas | Phase::TwoPhase => gas,
        })
    }

    fn interpolate(&self, p_pa: f64, t_c: f64, column: Column) -> FluidResult<f64> {
        self.search_nearby_points(p_pa, t_c)?.interpolate(column)
    }
}

impl PropertyModel for TabulatedProperties {
    fn name(&self) -> &str {
        "tabulated"
    }

    fn phase(&self, p: Pressure, t: Temperature) -> FluidResult<Phase> {
        self.phase_at(p.value, to_celsius(t))
    }

    fn density(&self, p: Pressure, t: Temperature) -> FluidResult<Density> {
        let (p, t) = (p.value, to_celsius(t));
        let column = self.phase_column(p, t, Column::GasDensity, Column::LiquidDensity)?;
        Ok(kgpm3(self.interpolate(p, t, column)?))
    }

    fn viscosity(&self, p: Pressure, t: Temperature) -> FluidResult<DynVisc> {
        let (p, t) = (p.value, to_celsius(t));
        let column = self.phase_column(p, t, Column::GasViscosity, Column::LiquidViscosity)?;
        Ok(pas(self.interpolate(p, t, column)?))
    }

    fn enthalpy(&self, p: Pressure, t: Temperature) -> FluidResult<SpecEnthalpy> {
        self.interpolate(p.value, to_celsius(t), Column::Enthalpy)
    }

    fn entropy(&self, p: Pressure, t: Temperature) -> FluidResult<SpecEntropy> {
        if !self.table.has_entropy() {
            return Err(FluidError::NotSupported {
                what: "entropy columns missing from fluid table",
            });
        }
        let (p, t) = (p.value, to_celsius(t));
        let column = self.phase_column(p, t, Column::GasEntropy, Column::LiquidEntropy)?;
        self.interpolate(p, t, column)
    }

    fn has_entropy(&self) -> bool {
        self.table.has_entropy()
    }
}
