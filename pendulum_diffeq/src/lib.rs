use std::{error::Error, fmt::Debug};

/// Submodules for core ODE system components.
pub mod errors;
pub mod rk;
pub mod saving;
pub mod solvers;
pub mod state;
pub mod stepping;
pub mod tableau;

use crate::errors::SolverErrors;
use crate::saving::MemoryResult;
use crate::solvers::RungeKuttaMethods;
use crate::state::Integrable;
use crate::stepping::AdaptiveStepControl;

/// Error type a model may return from its right-hand side.
pub type ModelError = Box<dyn Error + Send + Sync>;

/// Trait for defining a dynamical system model that can be numerically integrated.
///
/// Types implementing this trait must define how to compute the derivative (or RHS function)
/// of the ODE at a given time and state.
pub trait OdeModel: Debug {
    type State: Integrable;
    /// Compute the derivative at time `t` and state `state`, storing the result in `derivative`.
    fn f(
        &mut self,
        t: f64,
        state: &Self::State,
        derivative: &mut Self::State,
    ) -> Result<(), ModelError>;
}

/// Container for an ODE problem: the model plus the solve entry points.
pub struct OdeProblem<Model>
where
    Model: OdeModel,
{
    model: Model,
}

impl<Model> OdeProblem<Model>
where
    Model: OdeModel,
{
    pub fn new(model: Model) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Integrates from `grid[0]` through every time in `grid`, substepping adaptively in
    /// between and recording the state exactly at each grid time.
    ///
    /// # Arguments
    ///
    /// * `x0` - State at `grid[0]`.
    /// * `grid` - Strictly increasing output times.
    /// * `step_control` - Tolerances and step size limits.
    /// * `solver` - Embedded Runge-Kutta pair to use.
    ///
    /// # Returns
    ///
    /// One recorded state per grid time, or the first failure encountered. Nothing partial
    /// is returned on failure.
    pub fn solve_grid(
        &mut self,
        x0: &Model::State,
        grid: &[f64],
        mut step_control: AdaptiveStepControl,
        solver: RungeKuttaMethods,
    ) -> Result<MemoryResult<Model::State>, SolverErrors> {
        let mut result = MemoryResult::new(grid.len());
        solver.solve_grid(&mut self.model, x0, grid, &mut step_control, &mut result)?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::state_array::StateArray;
    use approx::assert_abs_diff_eq;

    #[derive(Debug)]
    struct Oscillator {
        omega: f64,
    }

    impl OdeModel for Oscillator {
        type State = StateArray<2>;
        fn f(
            &mut self,
            _t: f64,
            x: &StateArray<2>,
            dx: &mut StateArray<2>,
        ) -> Result<(), ModelError> {
            dx[0] = x[1];
            dx[1] = -self.omega * self.omega * x[0];
            Ok(())
        }
    }

    #[test]
    fn test_problem_solves_oscillator_on_grid() {
        let mut problem = OdeProblem::new(Oscillator { omega: 2.0 });
        let grid: Vec<f64> = (0..=50).map(|i| i as f64 * 0.1).collect();
        let control = AdaptiveStepControl::default()
            .with_rel_tol(1e-10)
            .with_abs_tol(1e-10);
        let result = problem
            .solve_grid(
                &StateArray::new([1.0, 0.0]),
                &grid,
                control,
                RungeKuttaMethods::DormandPrince45,
            )
            .unwrap();

        assert_eq!(result.len(), grid.len());
        for (t, x) in result.t.iter().zip(&result.y) {
            assert_abs_diff_eq!(x[0], (2.0 * t).cos(), epsilon = 1e-7);
            assert_abs_diff_eq!(x[1], -2.0 * (2.0 * t).sin(), epsilon = 1e-7);
        }
    }
}
