use pendulum_diffeq::saving::SolveStats;

use crate::{integrator::TimeGrid, state::PendulumState};

/// States of one run on its uniform time grid.
///
/// Produced only by a successful integration and never mutated afterwards. There is always
/// at least one sample, the initial state at `t = 0`.
#[derive(Clone, Debug)]
pub struct Trajectory {
    times: Vec<f64>,
    states: Vec<PendulumState>,
    grid: TimeGrid,
    stats: SolveStats,
}

impl Trajectory {
    pub(crate) fn new(
        times: Vec<f64>,
        states: Vec<PendulumState>,
        grid: TimeGrid,
        stats: SolveStats,
    ) -> Self {
        Self {
            times,
            states,
            grid,
            stats,
        }
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn states(&self) -> &[PendulumState] {
        &self.states
    }

    pub fn grid(&self) -> TimeGrid {
        self.grid
    }

    /// Substep counters of the integration that produced this trajectory.
    pub fn stats(&self) -> SolveStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn sample(&self, index: usize) -> Option<(f64, &PendulumState)> {
        Some((*self.times.get(index)?, self.states.get(index)?))
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, &PendulumState)> {
        self.times.iter().copied().zip(self.states.iter())
    }

    pub fn final_state(&self) -> Option<&PendulumState> {
        self.states.last()
    }

    /// Index of the sample a scrub position `t` refers to, rounded to the nearest grid
    /// point (ties to even) and clamped to the trajectory.
    pub fn nearest_index(&self, t: f64) -> usize {
        let last = self.len().saturating_sub(1);
        if last == 0 || self.grid.t_final <= 0.0 {
            return 0;
        }
        // saturating cast: NaN and negative scrub times map to 0
        let index = (t * last as f64 / self.grid.t_final).round_ties_even() as usize;
        index.min(last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear(t_final: f64, h: f64) -> Trajectory {
        let grid = TimeGrid::new(t_final, h);
        let times = grid.times();
        let states = times
            .iter()
            .map(|&t| PendulumState::new(t, 0.0, 0.0, 0.0))
            .collect();
        Trajectory::new(times, states, grid, SolveStats::default())
    }

    #[test]
    fn test_nearest_index_rounds_and_clamps() {
        let trajectory = linear(60.0, 0.025);
        assert_eq!(trajectory.len(), 2401);
        assert_eq!(trajectory.nearest_index(0.0), 0);
        assert_eq!(trajectory.nearest_index(0.0124), 0);
        assert_eq!(trajectory.nearest_index(0.0126), 1);
        assert_eq!(trajectory.nearest_index(30.0), 1200);
        assert_eq!(trajectory.nearest_index(60.0), 2400);
        assert_eq!(trajectory.nearest_index(75.0), 2400);
        assert_eq!(trajectory.nearest_index(-3.0), 0);
        assert_eq!(trajectory.nearest_index(f64::NAN), 0);
    }

    #[test]
    fn test_read_access() {
        let trajectory = linear(1.0, 0.25);
        assert_eq!(trajectory.sample(2).map(|(t, _)| t), Some(0.5));
        assert!(trajectory.sample(5).is_none());
        assert_eq!(trajectory.final_state().map(|s| s.theta1), Some(1.0));
        assert_eq!(trajectory.iter().count(), 5);
        assert!(trajectory.iter().all(|(t, s)| t == s.theta1));
    }

    #[test]
    fn test_trajectory_is_shareable() {
        fn shareable<T: Send + Sync>() {}
        shareable::<Trajectory>();
    }
}
