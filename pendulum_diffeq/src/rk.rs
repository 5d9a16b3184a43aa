use std::array;

use tolerance::{Tolerance, Tolerances};
use tracing::debug;

use crate::{
    OdeModel,
    errors::SolverErrors,
    saving::{MemoryResult, SolveStats},
    state::Integrable,
    stepping::AdaptiveStepControl,
    tableau::ButcherTableau,
};

// preallocated buffers for intermediate calculations
struct RKBuffers<State: Integrable, const STAGES: usize> {
    stage: StageBuffer<State, STAGES>,
    state: State,
    derivative: State,
}

impl<State: Integrable, const STAGES: usize> Default for RKBuffers<State, STAGES> {
    fn default() -> Self {
        Self {
            stage: StageBuffer::default(),
            state: State::default(),
            derivative: State::default(),
        }
    }
}

/// Explicit embedded Runge-Kutta integrator for one tableau.
pub struct RungeKutta<State: Integrable, const STAGES: usize> {
    x: State,
    y: State,
    y_tilde: State,
    tableau: ButcherTableau<STAGES>,
    tolerances: State::Tolerance,
    buffers: RKBuffers<State, STAGES>,
    stats: SolveStats,
}

impl<State: Integrable, const STAGES: usize> RungeKutta<State, STAGES> {
    pub fn new(tableau: ButcherTableau<STAGES>) -> Self {
        Self {
            buffers: RKBuffers::default(),
            x: State::default(),
            y: State::default(),
            y_tilde: State::default(),
            tableau,
            tolerances: State::Tolerance::default(),
            stats: SolveStats::default(),
        }
    }

    /// Integrates through every time in `grid`, recording the state at each one.
    ///
    /// Between output times the step size is chosen by `control`. The last substep of
    /// each interval is shortened so that it lands on the output time exactly.
    pub fn solve_grid<Model: OdeModel<State = State>>(
        &mut self,
        model: &mut Model,
        x0: &State,
        grid: &[f64],
        control: &mut AdaptiveStepControl,
        result: &mut MemoryResult<State>,
    ) -> Result<(), SolverErrors> {
        Tolerances::new(control.rel_tol, control.abs_tol)?;
        check_grid(grid)?;

        self.stats = SolveStats::default();
        self.x.clone_from(x0);
        if !self.x.is_finite() {
            return Err(SolverErrors::NonFinite { t: grid[0] });
        }
        result.insert(grid[0], &self.x);

        let mut dt = match grid.get(1) {
            Some(t1) => control.accept(t1 - grid[0], 1.0, self.tableau.order),
            None => return Ok(()),
        };

        for window in grid.windows(2) {
            let (mut t, target) = (window[0], window[1]);
            let mut attempts = 0;

            while t < target {
                if attempts == control.max_steps {
                    return Err(SolverErrors::MaxStepsExceeded {
                        t,
                        target,
                        max_steps: control.max_steps,
                    });
                }
                attempts += 1;

                let remaining = target - t;
                let landing = dt >= remaining;
                let h = if landing {
                    remaining
                } else if dt > 0.5 * remaining {
                    // split what is left evenly instead of leaving a sliver for the last step
                    0.5 * remaining
                } else {
                    dt
                };

                let min_dt = control.min_dt(t);
                if h < min_dt && !landing {
                    return Err(SolverErrors::StepSizeUnderflow { t, dt: h, min_dt });
                }

                self.step(model, t, h)?;
                let error = self.error(control);

                if error <= 1.0 {
                    self.stats.accepted += 1;
                    t = if landing { target } else { t + h };
                    self.x.clone_from(&self.y);
                    let proposed = control.accept(h, error, self.tableau.order);
                    // a shortened landing step says nothing about the natural step size
                    if !(landing && h < dt) {
                        dt = proposed;
                    }
                } else {
                    self.stats.rejected += 1;
                    dt = control.reject(h, error, self.tableau.order);
                    if dt < min_dt {
                        return Err(SolverErrors::StepSizeUnderflow { t, dt, min_dt });
                    }
                }
            }

            if !self.x.is_finite() {
                return Err(SolverErrors::NonFinite { t: target });
            }
            result.insert(target, &self.x);
        }

        result.stats = self.stats;
        debug!(
            accepted = self.stats.accepted,
            rejected = self.stats.rejected,
            evaluations = self.stats.evaluations,
            "grid integration finished"
        );
        Ok(())
    }

    /// Takes one step of size `h` from `self.x` at time `t`, filling the propagated
    /// solution `y` and the embedded estimate `y_tilde`.
    pub fn step<Model: OdeModel<State = State>>(
        &mut self,
        model: &mut Model,
        t: f64,
        h: f64,
    ) -> Result<(), SolverErrors> {
        let k = &mut self.buffers.stage.k;

        // k0
        model
            .f(t, &self.x, &mut k[0])
            .map_err(|source| SolverErrors::Model { t, source })?;

        // k1 - ks
        for s in 1..STAGES {
            // in place calculation of intermediate points
            self.buffers.state *= 0.0;
            // sum previous ks with appropriate scaling from tableau
            for i in 0..s {
                if self.tableau.a[s][i] == 0.0 {
                    continue;
                }
                self.buffers.derivative.clone_from(&k[i]);
                self.buffers.derivative *= self.tableau.a[s][i];
                self.buffers.state += &self.buffers.derivative;
            }
            self.buffers.state *= h;
            self.buffers.state += &self.x;

            let ts = t + self.tableau.c[s] * h;
            model
                .f(ts, &self.buffers.state, &mut k[s])
                .map_err(|source| SolverErrors::Model { t: ts, source })?;
        }
        self.stats.evaluations += STAGES;

        self.y.clone_from(&self.x);
        self.y_tilde.clone_from(&self.x);
        for s in 0..STAGES {
            self.buffers.derivative.clone_from(&k[s]);
            self.buffers.derivative *= self.tableau.b[s] * h;
            self.y += &self.buffers.derivative;

            self.buffers.derivative.clone_from(&k[s]);
            self.buffers.derivative *= self.tableau.b_tilde[s] * h;
            self.y_tilde += &self.buffers.derivative;
        }
        Ok(())
    }

    /// Normalized error of the last step; a value `<= 1` accepts it.
    fn error(&self, control: &AdaptiveStepControl) -> f64 {
        self.tolerances.compute_error(
            &self.y,
            &self.x,
            &self.y_tilde,
            control.rel_tol,
            control.abs_tol,
        )
    }
}

fn check_grid(grid: &[f64]) -> Result<(), SolverErrors> {
    if grid.is_empty() {
        return Err(SolverErrors::EmptyGrid);
    }
    for (index, &time) in grid.iter().enumerate() {
        let increasing = index == 0 || time > grid[index - 1];
        if !time.is_finite() || !increasing {
            return Err(SolverErrors::InvalidGrid { index, time });
        }
    }
    Ok(())
}

pub struct StageBuffer<State, const STAGES: usize>
where
    State: Integrable,
{
    pub k: [State; STAGES],
}

impl<State, const STAGES: usize> Default for StageBuffer<State, STAGES>
where
    State: Integrable,
{
    fn default() -> Self {
        Self {
            k: array::from_fn(|_| State::default()),
        }
    }
}
