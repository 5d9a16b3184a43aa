use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Adaptive step size controller.
///
/// Uses an internal method (basic or PID) to adjust step size based on
/// normalized error. Provides absolute and relative tolerance configuration.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct AdaptiveStepControl {
    pub method: AdaptiveStepMethods,
    /// Relative tolerance used for error estimation.
    pub rel_tol: f64,
    /// Absolute tolerance used for error estimation.
    pub abs_tol: f64,
    /// Optional minimum allowed step size. Defaults to a few ulps of the current time.
    pub min_dt: Option<f64>,
    /// Optional maximum allowed step size.
    pub max_dt: Option<f64>,
    /// Maximum attempted steps (accepted or rejected) between two output times.
    pub max_steps: usize,
}

impl Default for AdaptiveStepControl {
    fn default() -> Self {
        Self {
            method: AdaptiveStepMethods::Basic,
            rel_tol: 1e-3,
            abs_tol: 1e-6,
            min_dt: None,
            max_dt: None,
            max_steps: 10_000,
        }
    }
}

const SAFETY: f64 = 0.9;
const MIN_GROWTH: f64 = 0.2;
const MAX_GROWTH: f64 = 5.0;

impl AdaptiveStepControl {
    /// Next step size after an accepted step.
    ///
    /// - `dt`: current step size
    /// - `error`: normalized RMS error
    /// - `order`: order of the propagated solution
    pub fn accept(&mut self, dt: f64, error: f64, order: usize) -> f64 {
        let new_dt = match &mut self.method {
            AdaptiveStepMethods::Basic => dt * basic_factor(error, order),
            AdaptiveStepMethods::PID(pid) => dt * pid.factor(error, order),
        };
        self.clamp(new_dt)
    }

    /// Next step size after a rejected step. Never grows the step.
    pub fn reject(&mut self, dt: f64, error: f64, order: usize) -> f64 {
        self.clamp(dt * basic_factor(error, order).min(1.0))
    }

    /// Smallest step the solver may take at time `t`.
    pub fn min_dt(&self, t: f64) -> f64 {
        let floor = 16.0 * f64::EPSILON * t.abs().max(1.0);
        match self.min_dt {
            Some(min_dt) => min_dt.max(floor),
            None => floor,
        }
    }

    fn clamp(&self, dt: f64) -> f64 {
        match self.max_dt {
            Some(max_dt) => dt.min(max_dt),
            None => dt,
        }
    }

    pub fn with_abs_tol(mut self, abs_tol: f64) -> Self {
        self.abs_tol = abs_tol;
        self
    }

    pub fn with_rel_tol(mut self, rel_tol: f64) -> Self {
        self.rel_tol = rel_tol;
        self
    }

    pub fn with_min_dt(mut self, min_dt: f64) -> Self {
        self.min_dt = Some(min_dt);
        self
    }

    pub fn with_max_dt(mut self, max_dt: f64) -> Self {
        self.max_dt = Some(max_dt);
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_method(mut self, method: AdaptiveStepMethods) -> Self {
        self.method = method;
        self
    }
}

/// Classic controller: 0.9 * (1 / error)^(1 / order), bounded growth.
fn basic_factor(error: f64, order: usize) -> f64 {
    if error == 0.0 {
        return MAX_GROWTH;
    }
    if !error.is_finite() {
        return MIN_GROWTH;
    }
    (SAFETY * error.powf(-1.0 / order as f64)).clamp(MIN_GROWTH, MAX_GROWTH)
}

/// Enum for selecting the adaptive step control algorithm.
///
/// - `Basic`: Simple step control using embedded error estimates.
/// - `PID`: PID-controlled step size adaptation.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub enum AdaptiveStepMethods {
    #[default]
    Basic,
    PID(StepPIDControl),
}

impl AdaptiveStepMethods {
    pub fn name(&self) -> &'static str {
        match self {
            AdaptiveStepMethods::Basic => "basic",
            AdaptiveStepMethods::PID(_) => "pid",
        }
    }
}

impl fmt::Display for AdaptiveStepMethods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AdaptiveStepMethods {
    type Err = String;

    /// `pid` selects the controller with default gains.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(AdaptiveStepMethods::Basic),
            "pid" => Ok(AdaptiveStepMethods::PID(StepPIDControl::default())),
            _ => Err(format!("unknown step control '{s}'")),
        }
    }
}

/// PID controller for adaptive step size control.
///
/// Works on the log of the error history of accepted steps. With `kd = 0` this is the
/// usual PI controller.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct StepPIDControl {
    kp: f64,
    ki: f64,
    kd: f64,
    #[serde(skip, default = "unit")]
    err_prev: f64,
    #[serde(skip, default = "unit")]
    err_prevprev: f64,
}

fn unit() -> f64 {
    1.0
}

impl Default for StepPIDControl {
    fn default() -> Self {
        Self::new(0.4, 0.3, 0.0)
    }
}

impl StepPIDControl {
    /// Creates a new PID step controller with custom gains.
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self {
            kp,
            ki,
            kd,
            err_prev: 1.0,
            err_prevprev: 1.0,
        }
    }

    /// Computes the growth factor from the current error and the accepted error history.
    pub fn factor(&mut self, err_now: f64, order: usize) -> f64 {
        if !err_now.is_finite() {
            return MIN_GROWTH;
        }

        const EPS: f64 = 1e-14;
        let e0 = err_now.max(EPS);
        let e1 = self.err_prev.max(EPS);
        let e2 = self.err_prevprev.max(EPS);
        let k = order as f64;

        let factor = SAFETY
            * e0.powf(-self.ki / k)
            * (e1 / e0).powf(self.kp / k)
            * (e1 * e1 / (e0 * e2)).powf(self.kd / k);

        self.err_prevprev = self.err_prev;
        self.err_prev = err_now;

        factor.clamp(MIN_GROWTH, MAX_GROWTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_basic_grows_on_small_error() {
        let mut control = AdaptiveStepControl::default();
        // (1 / 0.5^5)^(1/5) = 2
        let dt = control.accept(0.1, 0.03125, 5);
        assert_abs_diff_eq!(dt, 0.1 * 0.9 * 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_growth_is_bounded() {
        let mut control = AdaptiveStepControl::default();
        assert_abs_diff_eq!(control.accept(0.1, 0.0, 5), 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(control.reject(0.1, 1e12, 5), 0.02, epsilon = 1e-15);
        assert_abs_diff_eq!(control.reject(0.1, f64::NAN, 5), 0.02, epsilon = 1e-15);
    }

    #[test]
    fn test_reject_never_grows() {
        let mut control = AdaptiveStepControl::default();
        assert!(control.reject(0.1, 1.01, 5) <= 0.1);
    }

    #[test]
    fn test_max_dt_clamps() {
        let mut control = AdaptiveStepControl::default().with_max_dt(0.05);
        assert_eq!(control.accept(0.1, 1e-8, 5), 0.05);
    }

    #[test]
    fn test_min_dt_has_floor() {
        let control = AdaptiveStepControl::default();
        assert!(control.min_dt(1e6) > control.min_dt(1.0));
        let control = control.with_min_dt(1e-3);
        assert_eq!(control.min_dt(0.0), 1e-3);
    }

    #[test]
    fn test_pi_matches_basic_on_first_step() {
        // with no history (unit errors) and kp + ki = 1 the PI factor reduces to the basic one
        let mut pid = StepPIDControl::new(0.0, 1.0, 0.0);
        assert_abs_diff_eq!(pid.factor(0.03125, 5), basic_factor(0.03125, 5), epsilon = 1e-12);
    }

    #[test]
    fn test_control_names_parse() {
        assert!(matches!("basic".parse(), Ok(AdaptiveStepMethods::Basic)));
        let pid: AdaptiveStepMethods = "pid".parse().unwrap();
        assert_eq!(pid.to_string(), "pid");
        assert!("pi".parse::<AdaptiveStepMethods>().is_err());
    }

    #[test]
    fn test_pi_damps_growth_after_small_error() {
        let mut pid = StepPIDControl::default();
        let first = pid.factor(0.5, 5);
        // error rose since the previous step, so the proportional term shrinks the factor
        let second = pid.factor(0.9, 5);
        assert!(second < first);
    }
}
