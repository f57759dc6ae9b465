//! Ideal-gas CO2 property model.
//!
//! Constant cp, ideal-gas density and a Sutherland viscosity law. Used as the
//! reference model for the legacy friction correlation and wherever a
//! closed-form model is preferable to table interpolation.

use crate::error::{FluidError, FluidResult};
use crate::model::{Phase, PropertyModel, SpecEnthalpy, SpecEntropy};
use bf_core::units::{Density, DynVisc, Pressure, Temperature, kgpm3, pas};

/// Ideal-gas carbon dioxide.
#[derive(Debug, Clone)]
pub struct IdealGasCo2 {
    /// Molar mass [kg/mol]
    pub molar_mass: f64,
    /// Specific heat capacity at constant pressure [J/(kg·K)]
    pub cp: f64,
    /// Reference temperature for enthalpy and entropy [K]
    pub t_ref: f64,
    /// Reference pressure for entropy [Pa]
    pub p_ref: f64,
    /// Sutherland reference viscosity [Pa·s] at `sutherland_t0`
    pub mu0: f64,
    pub sutherland_t0: f64,
    pub sutherland_c: f64,
}

impl IdealGasCo2 {
    /// Universal gas constant [J/(mol·K)]
    const R_UNIVERSAL: f64 = 8.31462;

    pub fn new() -> Self {
        Self::default()
    }

    /// Specific gas constant [J/(kg·K)].
    pub fn r_specific(&self) -> f64 {
        Self::R_UNIVERSAL / self.molar_mass
    }

    fn check(p: Pressure, t: Temperature) -> FluidResult<(f64, f64)> {
        use uom::si::{pressure::pascal, thermodynamic_temperature::kelvin};

        let (p, t) = (p.get::<pascal>(), t.get::<kelvin>());
        if !p.is_finite() || p <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "pressure must be positive and finite",
            });
        }
        if !t.is_finite() || t <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "temperature must be positive and finite",
            });
        }
        Ok((p, t))
    }
}

impl Default for IdealGasCo2 {
    fn default() -> Self {
        Self {
            molar_mass: 0.044,
            cp: 846.0,
            t_ref: 273.15,
            p_ref: 101_325.0,
            mu0: 1.8e-5,
            sutherland_t0: 373.0,
            sutherland_c: 240.0,
        }
    }
}

impl PropertyModel for IdealGasCo2 {
    fn name(&self) -> &str {
        "ideal-gas CO2"
    }

    fn phase(&self, p: Pressure, t: Temperature) -> FluidResult<Phase> {
        Self::check(p, t)?;
        Ok(Phase::Gas)
    }

    fn density(&self, p: Pressure, t: Temperature) -> FluidResult<Density> {
        let (p, t) = Self::check(p, t)?;
        Ok(kgpm3(p / (self.r_specific() * t)))
    }

    fn viscosity(&self, p: Pressure, t: Temperature) -> FluidResult<DynVisc> {
        let (_, t) = Self::check(p, t)?;
        let (t0, c) = (self.sutherland_t0, self.sutherland_c);
        Ok(pas(self.mu0 * ((t0 + c) / (t + c)) * (t / t0).powf(1.5)))
    }

    fn enthalpy(&self, p: Pressure, t: Temperature) -> FluidResult<SpecEnthalpy> {
        let (_, t) = Self::check(p, t)?;
        Ok(self.cp * (t - self.t_ref))
    }

    fn entropy(&self, p: Pressure, t: Temperature) -> FluidResult<SpecEntropy> {
        let (p, t) = Self::check(p, t)?;
        Ok(self.cp * (t / self.t_ref).ln() - self.r_specific() * (p / self.p_ref).ln())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bf_core::units::{k, pa};

    #[test]
    fn density_follows_gas_law() {
        let model = IdealGasCo2::new();
        let rho = model.density(pa(1.0e5), k(300.0)).unwrap();
        let expected = 1.0e5 * 0.044 / (8.31462 * 300.0);
        assert!((rho.value - expected).abs() < 1e-12);
    }

    #[test]
    fn enthalpy_is_zero_at_reference() {
        let model = IdealGasCo2::new();
        assert!(model.enthalpy(pa(5.0e6), k(273.15)).unwrap().abs() < 1e-9);
        let h = model.enthalpy(pa(5.0e6), k(283.15)).unwrap();
        assert!((h - 8460.0).abs() < 1e-6);
    }

    #[test]
    fn entropy_falls_with_pressure() {
        let model = IdealGasCo2::new();
        let s_low = model.entropy(pa(1.0e6), k(300.0)).unwrap();
        let s_high = model.entropy(pa(6.0e6), k(300.0)).unwrap();
        assert!(s_high < s_low);
    }

    #[test]
    fn viscosity_matches_sutherland_reference() {
        let model = IdealGasCo2::new();
        let mu = model.viscosity(pa(1.0e5), k(373.0)).unwrap();
        assert!((mu.value - 1.8e-5).abs() < 1e-12);
    }

    #[test]
    fn rejects_non_physical_inputs() {
        let model = IdealGasCo2::new();
        assert!(model.density(pa(-1.0), k(300.0)).is_err());
        assert!(model.enthalpy(pa(1.0e5), k(0.0)).is_err());
        assert!(model.phase(pa(f64::NAN), k(300.0)).is_err());
    }
}
