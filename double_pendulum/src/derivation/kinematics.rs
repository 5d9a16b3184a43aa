//! Planar kinematics of one rod in the rotating basis of its angle.
//!
//! The angle is measured from the downward vertical, so the bob sits at `l * radial(θ)`
//! relative to its pivot.

use nalgebra::Vector2;

/// Unit vector from the pivot towards the bob, (sin θ, -cos θ).
pub fn radial(theta: f64) -> Vector2<f64> {
    Vector2::new(theta.sin(), -theta.cos())
}

/// Unit vector along increasing θ, (cos θ, sin θ).
pub fn tangential(theta: f64) -> Vector2<f64> {
    Vector2::new(theta.cos(), theta.sin())
}

pub fn position(length: f64, theta: f64) -> Vector2<f64> {
    length * radial(theta)
}

pub fn velocity(length: f64, theta: f64, omega: f64) -> Vector2<f64> {
    length * omega * tangential(theta)
}

/// Second time derivative of `position` with θ' = ω and ω' = α.
pub fn acceleration(length: f64, theta: f64, omega: f64, alpha: f64) -> Vector2<f64> {
    length * alpha * tangential(theta) - length * omega * omega * radial(theta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const TOL: f64 = 1e-6;

    #[test]
    fn test_basis_is_orthonormal() {
        for theta in [0.0, 0.3, 1.7, -2.9] {
            assert_abs_diff_eq!(radial(theta).norm(), 1.0, epsilon = 1e-15);
            assert_abs_diff_eq!(radial(theta).dot(&tangential(theta)), 0.0, epsilon = 1e-15);
        }
        assert_abs_diff_eq!(position(2.0, 0.0), Vector2::new(0.0, -2.0), epsilon = 1e-15);
    }

    #[test]
    fn test_acceleration_matches_finite_difference() {
        // θ(t) = θ0 + ω0 t + α t^2 / 2 around t = 0
        let (length, theta0, omega0, alpha) = (1.3, 0.7, -1.1, 2.4);
        let dt = 1e-4;
        let at = |t: f64| position(length, theta0 + omega0 * t + 0.5 * alpha * t * t);

        let fd_velocity = (at(dt) - at(-dt)) / (2.0 * dt);
        let fd_acceleration = (at(dt) - 2.0 * at(0.0) + at(-dt)) / (dt * dt);

        assert_abs_diff_eq!(fd_velocity, velocity(length, theta0, omega0), epsilon = TOL);
        assert_abs_diff_eq!(
            fd_acceleration,
            acceleration(length, theta0, omega0, alpha),
            epsilon = 1e-4
        );
    }
}
