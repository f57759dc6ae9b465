use crate::{CoreError, CoreResult};

/// Floating point type used throughout system
pub type Real = f64;

#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> CoreResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Round to a fixed number of decimal digits.
pub fn round_to(v: Real, precision: u32) -> Real {
    let scale = 10_f64.powi(precision as i32);
    (v * scale).round() / scale
}

/// Replace NaN with a fallback, leaving every other value untouched.
pub fn nan_or(v: Real, fallback: Real) -> Real {
    if v.is_nan() { fallback } else { v }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn round_to_decimal_digits() {
        assert_eq!(round_to(26.854_9, 2), 26.85);
        assert_eq!(round_to(-49.996, 2), -50.0);
        assert_eq!(round_to(3.2, 0), 3.0);
    }

    #[test]
    fn nan_or_only_replaces_nan() {
        assert_eq!(nan_or(Real::NAN, 0.5), 0.5);
        assert_eq!(nan_or(0.0, 0.5), 0.0);
        assert_eq!(nan_or(Real::INFINITY, 0.5), Real::INFINITY);
    }
}
