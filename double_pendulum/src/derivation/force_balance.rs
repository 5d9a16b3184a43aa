//! Newtonian force balance of the two bobs, solved numerically.
//!
//! The unknowns are the rod tensions and the angular accelerations, `u = (T1, T2, α1, α2)`.
//! Each bob contributes two equations, the projections of its force balance on its own
//! radial and tangential directions. The outer bob is written relative to the inner one,
//! `m2 a2 = F2 - (m2 / m1) F1`, which removes α1 from its equations. The residual of these
//! four equations is affine in `u`, so its coefficients are read off by evaluating it at
//! the origin and at the unit vectors, and the resulting 4x4 system is solved with LU.

use nalgebra::{Matrix4, Vector2, Vector4};

use super::kinematics::{acceleration, radial, tangential};
use crate::error::DerivationError;

/// Rod tensions and angular accelerations satisfying the force balance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reaction {
    pub tension1: f64,
    pub tension2: f64,
    pub alpha1: f64,
    pub alpha2: f64,
}

impl From<Vector4<f64>> for Reaction {
    fn from(u: Vector4<f64>) -> Self {
        Self {
            tension1: u[0],
            tension2: u[1],
            alpha1: u[2],
            alpha2: u[3],
        }
    }
}

/// Solves the force balance at `args = (θ1, θ2, ω1, ω2, g, l1, l2, m1, m2, b)`.
pub fn solve(args: &[f64; 10]) -> Result<Reaction, DerivationError> {
    let r0 = residual(args, &Vector4::zeros());
    let mut system = Matrix4::zeros();
    for j in 0..4 {
        let column = residual(args, &Vector4::ith(j, 1.0)) - r0;
        system.set_column(j, &column);
    }

    let u = system
        .lu()
        .solve(&(-r0))
        .ok_or(DerivationError::Singular(*args))?;

    if u.iter().all(|x| x.is_finite()) {
        Ok(Reaction::from(u))
    } else {
        Err(DerivationError::NonFinite(*args))
    }
}

/// Net force on each bob minus mass times acceleration, projected on (radial, tangential).
fn residual(args: &[f64; 10], u: &Vector4<f64>) -> Vector4<f64> {
    let [theta1, theta2, omega1, omega2, g, l1, l2, m1, m2, b] = *args;
    let (tension1, tension2, alpha1, alpha2) = (u[0], u[1], u[2], u[3]);

    let (er1, et1) = (radial(theta1), tangential(theta1));
    let (er2, et2) = (radial(theta2), tangential(theta2));

    // rods pull their bobs towards the pivot, the outer rod also pulls the inner bob outward
    let force1 = Vector2::new(0.0, -m1 * g) - tension1 * er1 + tension2 * er2
        - b * l1 * omega1 * et1;
    let force2 = Vector2::new(0.0, -m2 * g) - tension2 * er2 - b * l2 * omega2 * et2;

    let inner = force1 - m1 * acceleration(l1, theta1, omega1, alpha1);
    let outer = force2 - (m2 / m1) * force1 - m2 * acceleration(l2, theta2, omega2, alpha2);

    Vector4::new(inner.dot(&er1), inner.dot(&et1), outer.dot(&er2), outer.dot(&et2))
}

/// Angular acceleration of the inner rod from a fresh force balance solve.
///
/// Returns NaN where the balance cannot be solved so the integrator reports it.
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
    solve(&[theta1, theta2, omega1, omega2, g, l1, l2, m1, m2, b])
        .map(|reaction| reaction.alpha1)
        .unwrap_or(f64::NAN)
}

/// Angular acceleration of the outer rod from a fresh force balance solve.
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
    solve(&[theta1, theta2, omega1, omega2, g, l1, l2, m1, m2, b])
        .map(|reaction| reaction.alpha2)
        .unwrap_or(f64::NAN)
}
