use pendulum_diffeq::{
    ModelError, OdeModel, OdeProblem,
    solvers::RungeKuttaMethods,
    state::state_array::StateArray,
    stepping::{AdaptiveStepControl, AdaptiveStepMethods},
};
use serde::{Deserialize, Serialize};
use tolerance::Tolerances;
use tracing::{info, warn};

use crate::{
    derivation::EquationsOfMotion, error::IntegrationFailure, parameters::PendulumParameters,
    state::PendulumState, trajectory::Trajectory,
};

/// Largest number of grid intervals a `TimeGrid` may hold.
pub const MAX_GRID_STEPS: usize = 100_000_000;

/// Uniform output grid `t_i = i * h`, `i = 0..=round(t_final / h)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeGrid {
    pub t_final: f64,
    pub h: f64,
}

impl TimeGrid {
    pub fn new(t_final: f64, h: f64) -> Self {
        Self { t_final, h }
    }

    pub fn validate(&self) -> Result<(), IntegrationFailure> {
        let valid = self.t_final.is_finite()
            && self.t_final >= 0.0
            && self.h.is_finite()
            && self.h > 0.0
            && (self.t_final / self.h).round() <= MAX_GRID_STEPS as f64;
        if valid {
            Ok(())
        } else {
            Err(IntegrationFailure::InvalidGrid {
                t_final: self.t_final,
                h: self.h,
            })
        }
    }

    pub fn steps(&self) -> usize {
        (self.t_final / self.h).round() as usize
    }

    /// Output times, computed as `i * h` rather than accumulated.
    pub fn times(&self) -> Vec<f64> {
        (0..=self.steps()).map(|i| i as f64 * self.h).collect()
    }
}

/// Accuracy and step control settings of one integration.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegratorOptions {
    pub tolerances: Tolerances,
    pub method: RungeKuttaMethods,
    pub control: AdaptiveStepMethods,
    /// Attempted substeps allowed between two consecutive grid points.
    pub max_steps: usize,
    pub min_dt: Option<f64>,
    pub max_dt: Option<f64>,
}

impl Default for IntegratorOptions {
    fn default() -> Self {
        Self {
            tolerances: Tolerances::default().with_abs_tol(1e-9).with_rel_tol(1e-9),
            method: RungeKuttaMethods::default(),
            control: AdaptiveStepMethods::default(),
            max_steps: 10_000,
            min_dt: None,
            max_dt: None,
        }
    }
}

impl IntegratorOptions {
    pub fn step_control(&self) -> AdaptiveStepControl {
        let mut control = AdaptiveStepControl::default()
            .with_abs_tol(self.tolerances.abs_tol())
            .with_rel_tol(self.tolerances.rel_tol())
            .with_max_steps(self.max_steps)
            .with_method(self.control);
        if let Some(min_dt) = self.min_dt {
            control = control.with_min_dt(min_dt);
        }
        if let Some(max_dt) = self.max_dt {
            control = control.with_max_dt(max_dt);
        }
        control
    }
}

/// First order form of the double pendulum for the ODE solver.
#[derive(Debug)]
pub struct PendulumModel<'a> {
    equations: &'a EquationsOfMotion,
    parameters: PendulumParameters,
}

impl<'a> PendulumModel<'a> {
    pub fn new(equations: &'a EquationsOfMotion, parameters: PendulumParameters) -> Self {
        Self {
            equations,
            parameters,
        }
    }
}

impl OdeModel for PendulumModel<'_> {
    type State = StateArray<4>;

    fn f(
        &mut self,
        _t: f64,
        x: &StateArray<4>,
        dx: &mut StateArray<4>,
    ) -> Result<(), ModelError> {
        let state = PendulumState::from(x);
        *dx = StateArray::new(rhs(self.equations, &self.parameters, &state));
        Ok(())
    }
}

/// Time derivative of the state, (ω1, ω2, α1, α2).
pub fn rhs(
    equations: &EquationsOfMotion,
    parameters: &PendulumParameters,
    state: &PendulumState,
) -> [f64; 4] {
    let (alpha1, alpha2) = equations.accelerations(state, parameters);
    [state.omega1, state.omega2, alpha1, alpha2]
}

/// Integrates `initial` over `grid` and returns the state at every grid time.
///
/// Parameters, initial state and grid are validated first. On any failure no partial
/// trajectory is returned.
pub fn integrate(
    equations: &EquationsOfMotion,
    parameters: &PendulumParameters,
    initial: PendulumState,
    grid: TimeGrid,
    options: IntegratorOptions,
) -> Result<Trajectory, IntegrationFailure> {
    parameters.validate()?;
    initial.validate()?;
    grid.validate()?;
    options.tolerances.validate()?;

    info!(
        steps = grid.steps(),
        t_final = grid.t_final,
        h = grid.h,
        method = %options.method,
        atol = options.tolerances.abs_tol(),
        rtol = options.tolerances.rel_tol(),
        "integrating trajectory"
    );

    let mut problem = OdeProblem::new(PendulumModel::new(equations, *parameters));
    let result = problem
        .solve_grid(
            &StateArray::from(initial),
            &grid.times(),
            options.step_control(),
            options.method,
        )
        .inspect_err(|e| warn!(error = %e, t = ?e.time(), "integration failed"))?;

    let stats = result.stats;
    let (times, states) = result.into_parts();
    let states: Vec<PendulumState> = states.iter().map(PendulumState::from).collect();

    info!(
        samples = times.len(),
        accepted = stats.accepted,
        rejected = stats.rejected,
        evaluations = stats.evaluations,
        "trajectory integrated"
    );
    Ok(Trajectory::new(times, states, grid, stats))
}
