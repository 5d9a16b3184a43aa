use std::ops::{AddAssign, Deref, DerefMut, MulAssign};

use tolerance::{Tolerance, compute_error};

use crate::state::Integrable;

/// A fixed-size array wrapper representing a generic state vector with `N` f64 components.
///
/// This type is commonly used as a concrete state for ODE solvers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StateArray<const N: usize>([f64; N]);

impl<const N: usize> StateArray<N> {
    /// Constructs a new `StateArray` from an array of `f64`.
    pub fn new(array: [f64; N]) -> Self {
        Self(array)
    }

    pub fn into_inner(self) -> [f64; N] {
        self.0
    }
}

impl<const N: usize> Default for StateArray<N> {
    /// Creates a `StateArray` with all elements initialized to zero.
    fn default() -> Self {
        Self([0.0; N])
    }
}

impl<const N: usize> AddAssign<&Self> for StateArray<N> {
    /// Element-wise in-place addition.
    fn add_assign(&mut self, rhs: &Self) {
        for i in 0..N {
            self.0[i] += rhs.0[i];
        }
    }
}

impl<const N: usize> MulAssign<f64> for StateArray<N> {
    /// Multiplies each element of the array in-place by the given scalar.
    fn mul_assign(&mut self, rhs: f64) {
        for i in 0..N {
            self.0[i] *= rhs;
        }
    }
}

impl<const N: usize> Integrable for StateArray<N> {
    type Tolerance = StateArrayTolerances<N>;

    fn is_finite(&self) -> bool {
        self.0.iter().all(|x| x.is_finite())
    }
}

impl<const N: usize> Deref for StateArray<N> {
    type Target = [f64; N];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<const N: usize> DerefMut for StateArray<N> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Root-mean-square error model over all components of a `StateArray`.
#[derive(Clone, Copy, Debug, Default)]
pub struct StateArrayTolerances<const N: usize>;

impl<const N: usize> Tolerance for StateArrayTolerances<N> {
    type State = StateArray<N>;

    /// Computes the root-mean-square of the per-component scaled errors.
    ///
    /// # Arguments
    ///
    /// * `x` - The candidate state.
    /// * `x_prev` - The state at the start of the step.
    /// * `x_tilde` - The embedded lower order estimate.
    /// * `rel_tol` - Relative tolerance.
    /// * `abs_tol` - Absolute tolerance.
    fn compute_error(
        &self,
        x: &StateArray<N>,
        x_prev: &StateArray<N>,
        x_tilde: &StateArray<N>,
        rel_tol: f64,
        abs_tol: f64,
    ) -> f64 {
        if N == 0 {
            return 0.0;
        }

        let mut sum_squared_errors = 0.0;
        for i in 0..N {
            let component_error = compute_error(x.0[i], x_prev.0[i], x_tilde.0[i], rel_tol, abs_tol);
            sum_squared_errors += component_error * component_error;
        }

        (sum_squared_errors / N as f64).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_arithmetic_is_elementwise() {
        let mut a = StateArray::new([1.0, -2.0, 3.0]);
        a *= 2.0;
        a += &StateArray::new([0.5, 0.5, 0.5]);
        assert_eq!(a.into_inner(), [2.5, -3.5, 6.5]);
    }

    #[test]
    fn test_rms_error() {
        let tol = StateArrayTolerances::<2>;
        let x = StateArray::new([1.0, 0.0]);
        let x_tilde = StateArray::new([1.0 + 3e-6, 4e-6]);
        // abs only: components scale to 3 and 4, rms = sqrt((9 + 16) / 2)
        let e = tol.compute_error(&x, &x, &x_tilde, 0.0, 1e-6);
        assert_abs_diff_eq!(e, (12.5f64).sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn test_finite_check() {
        assert!(StateArray::new([0.0, 1.0]).is_finite());
        assert!(!StateArray::new([0.0, f64::NAN]).is_finite());
        assert!(!StateArray::new([f64::INFINITY, 1.0]).is_finite());
    }
}
