use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ToleranceErrors {
    #[error("absolute tolerance must be finite and non-negative, got {0}")]
    InvalidAbsolute(f64),
    #[error("relative tolerance must be finite and non-negative, got {0}")]
    InvalidRelative(f64),
    #[error("absolute and relative tolerance cannot both be zero")]
    BothZero,
}

/// Absolute and relative error tolerances for a single state component.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tolerances {
    abs_tol: f64,
    rel_tol: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs_tol: 1e-6,
            rel_tol: 1e-3,
        }
    }
}

impl Tolerances {
    pub fn new(rel_tol: f64, abs_tol: f64) -> Result<Self, ToleranceErrors> {
        let tol = Self { rel_tol, abs_tol };
        tol.validate()?;
        Ok(tol)
    }

    pub fn abs_tol(&self) -> f64 {
        self.abs_tol
    }

    pub fn rel_tol(&self) -> f64 {
        self.rel_tol
    }

    /// Deserialized and builder-made tolerances bypass `new`, so callers check them here.
    pub fn validate(&self) -> Result<(), ToleranceErrors> {
        if !self.abs_tol.is_finite() || self.abs_tol < 0.0 {
            return Err(ToleranceErrors::InvalidAbsolute(self.abs_tol));
        }
        if !self.rel_tol.is_finite() || self.rel_tol < 0.0 {
            return Err(ToleranceErrors::InvalidRelative(self.rel_tol));
        }
        if self.abs_tol == 0.0 && self.rel_tol == 0.0 {
            return Err(ToleranceErrors::BothZero);
        }
        Ok(())
    }

    pub fn with_abs_tol(mut self, abs_tol: f64) -> Self {
        self.abs_tol = abs_tol;
        self
    }

    pub fn with_rel_tol(mut self, rel_tol: f64) -> Self {
        self.rel_tol = rel_tol;
        self
    }
}

/// Error model for a whole state, combining per-component scaled errors into one norm.
pub trait Tolerance: Default {
    type State;
    /// Returns the normalized error of the step `x_prev -> x`, where `x_tilde` is the
    /// embedded lower order estimate. A value `<= 1.0` means the step is accepted.
    fn compute_error(
        &self,
        x: &Self::State,
        x_prev: &Self::State,
        x_tilde: &Self::State,
        rel_tol: f64,
        abs_tol: f64,
    ) -> f64;
}

/// Scaled error of one component: |x - x_tilde| / (abs_tol + rel_tol * max(|x|, |x_prev|)).
///
/// An exact estimate is zero error even when the scale is zero (pure relative tolerance on a
/// component that stays at 0).
pub fn compute_error(x: f64, x_prev: f64, x_tilde: f64, rel_tol: f64, abs_tol: f64) -> f64 {
    let difference = (x - x_tilde).abs();
    if difference == 0.0 {
        return 0.0;
    }
    let scale = abs_tol + rel_tol * x.abs().max(x_prev.abs());
    difference / scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_error_scales_with_magnitude() {
        // same absolute difference, larger magnitude -> smaller scaled error
        let small = compute_error(1.0, 1.0, 1.0 + 1e-6, 1e-6, 1e-9);
        let large = compute_error(100.0, 100.0, 100.0 + 1e-6, 1e-6, 1e-9);
        assert!(large < small);
        assert_abs_diff_eq!(small, 1e-6 / (1e-9 + 1e-6), epsilon = 1e-12);
    }

    #[test]
    fn test_error_uses_previous_magnitude() {
        let e = compute_error(0.0, 2.0, 1e-3, 1e-3, 0.0);
        assert_abs_diff_eq!(e, 0.5, epsilon = 1e-15);
    }

    #[test]
    fn test_exact_estimate_has_zero_error() {
        assert_eq!(compute_error(3.0, 2.0, 3.0, 1e-9, 1e-9), 0.0);
        // relative only, component at rest: 0 / 0 must not become NaN
        assert_eq!(compute_error(0.0, 0.0, 0.0, 1e-9, 0.0), 0.0);
        assert!(compute_error(0.0, 0.0, 1e-12, 1e-9, 0.0).is_infinite());
    }

    #[test]
    fn test_builders_skip_validation_until_checked() {
        let tol = Tolerances::default().with_abs_tol(0.0).with_rel_tol(1e-9);
        assert_eq!(tol.abs_tol(), 0.0);
        assert!(tol.validate().is_ok());
        let tol = tol.with_rel_tol(0.0);
        assert_eq!(tol.validate(), Err(ToleranceErrors::BothZero));
    }

    #[test]
    fn test_invalid_tolerances() {
        assert_eq!(
            Tolerances::new(1e-3, -1.0),
            Err(ToleranceErrors::InvalidAbsolute(-1.0))
        );
        assert!(matches!(
            Tolerances::new(f64::NAN, 1e-3),
            Err(ToleranceErrors::InvalidRelative(_))
        ));
        assert_eq!(Tolerances::new(0.0, 0.0), Err(ToleranceErrors::BothZero));
    }
}
