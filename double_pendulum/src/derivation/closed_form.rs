//! The force balance with the tensions eliminated by hand.
//!
//! With `Δ = θ1 - θ2`, `s = sin Δ`, `c = cos Δ` and `μ = m2 / m1` the radial equation of the
//! outer bob gives
//!
//! ```text
//! T2 = [m2 l2 ω2² + m2 c (l1 ω1² + g cos θ1) - μ b l1 ω1 s] / (1 + μ s²)
//! T1 = m1 l1 ω1² + m1 g cos θ1 + T2 c
//! ```
//!
//! and the two tangential equations then give the accelerations directly. The denominator
//! `1 + μ s²` never vanishes for positive masses.

use super::force_balance::Reaction;

#[allow(clippy::too_many_arguments)]
pub fn reaction(
    theta1: f64,
    theta2: f64,
    omega1: f64,
    omega2: f64,
    g: f64,
    l1: f64,
    l2: f64,
    m1: f64,
    m2: f64,
    b: f64,
) -> Reaction {
    let (s, c) = (theta1 - theta2).sin_cos();
    let mu = m2 / m1;

    let tension2 = (m2 * l2 * omega2 * omega2 + m2 * c * (l1 * omega1 * omega1 + g * theta1.cos())
        - mu * b * l1 * omega1 * s)
        / (1.0 + mu * s * s);
    let tension1 = m1 * l1 * omega1 * omega1 + m1 * g * theta1.cos() + tension2 * c;

    let alpha1 = -(m1 * g * theta1.sin() + tension2 * s + b * l1 * omega1) / (m1 * l1);
    let alpha2 = (tension1 * s + b * l1 * omega1 * c) / (m1 * l2) - b * omega2 / m2;

    Reaction {
        tension1,
        tension2,
        alpha1,
        alpha2,
    }
}

#[allow(clippy::too_many_arguments)]
pub fn alpha1(
    theta1: f64,
    theta2: f64,
    omega1: f64,
    omega2: f64,
    g: f64,
    l1: f64,
    l2: f64,
    m1: f64,
    m2: f64,
    b: f64,
) -> f64 {
    reaction(theta1, theta2, omega1, omega2, g, l1, l2, m1, m2, b).alpha1
}

#[allow(clippy::too_many_arguments)]
pub fn alpha2(
    theta1: f64,
    theta2: f64,
    omega1: f64,
    omega2: f64,
    g: f64,
    l1: f64,
    l2: f64,
    m1: f64,
    m2: f64,
    b: f64,
) -> f64 {
    reaction(theta1, theta2, omega1, omega2, g, l1, l2, m1, m2, b).alpha2
}
