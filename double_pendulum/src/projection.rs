//! Read-only projections of a trajectory for presentation.

use crate::{
    derivation::{EquationsOfMotion, kinematics::position},
    parameters::PendulumParameters,
    state::PendulumState,
    trajectory::Trajectory,
};

/// Bob positions relative to the fixed pivot plus the energy diagnostic.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CartesianFrame {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub energy: f64,
}

pub fn project(state: &PendulumState, parameters: &PendulumParameters) -> CartesianFrame {
    let inner = position(parameters.l1, state.theta1);
    let outer = inner + position(parameters.l2, state.theta2);
    CartesianFrame {
        x1: inner.x,
        y1: inner.y,
        x2: outer.x,
        y2: outer.y,
        energy: diagnostic_energy(state, parameters),
    }
}

/// Energy diagnostic shown next to the animation:
/// `m1 g y1 + m2 g y2 + l1² ω1² + 0.5 l2² ω2² + l1 l2 ω1 ω2 cos(θ1 - θ2)`.
///
/// The kinetic part carries no mass weighting, so this is the mechanical energy only when
/// both masses are 1. See [`mechanical_energy`] for the exact value.
pub fn diagnostic_energy(state: &PendulumState, parameters: &PendulumParameters) -> f64 {
    let PendulumParameters { g, l1, l2, m1, m2, .. } = *parameters;
    let PendulumState {
        theta1,
        theta2,
        omega1,
        omega2,
    } = *state;
    let y1 = -l1 * theta1.cos();
    let y2 = y1 - l2 * theta2.cos();
    m1 * g * y1
        + m2 * g * y2
        + l1 * l1 * omega1 * omega1
        + 0.5 * l2 * l2 * omega2 * omega2
        + l1 * l2 * omega1 * omega2 * (theta1 - theta2).cos()
}

/// Kinetic plus potential energy, with the pivot height as zero potential.
pub fn mechanical_energy(state: &PendulumState, parameters: &PendulumParameters) -> f64 {
    let PendulumParameters { g, l1, l2, m1, m2, .. } = *parameters;
    let PendulumState {
        theta1,
        theta2,
        omega1,
        omega2,
    } = *state;
    let y1 = -l1 * theta1.cos();
    let y2 = y1 - l2 * theta2.cos();
    let kinetic = 0.5 * (m1 + m2) * l1 * l1 * omega1 * omega1
        + 0.5 * m2 * l2 * l2 * omega2 * omega2
        + m2 * l1 * l2 * omega1 * omega2 * (theta1 - theta2).cos();
    kinetic + m1 * g * y1 + m2 * g * y2
}

pub fn frames(trajectory: &Trajectory, parameters: &PendulumParameters) -> Vec<CartesianFrame> {
    trajectory
        .states()
        .iter()
        .map(|state| project(state, parameters))
        .collect()
}

pub fn mechanical_energies(trajectory: &Trajectory, parameters: &PendulumParameters) -> Vec<f64> {
    trajectory
        .states()
        .iter()
        .map(|state| mechanical_energy(state, parameters))
        .collect()
}

/// (α1, α2) at every sample of the trajectory.
pub fn accelerations(
    equations: &EquationsOfMotion,
    parameters: &PendulumParameters,
    trajectory: &Trajectory,
) -> Vec<(f64, f64)> {
    trajectory
        .states()
        .iter()
        .map(|state| equations.accelerations(state, parameters))
        .collect()
}
