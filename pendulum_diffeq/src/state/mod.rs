use std::{
    fmt::Debug,
    ops::{AddAssign, MulAssign},
};
use tolerance::Tolerance;

pub mod state_array;

/// Trait representing an integrable state for use in ODE solvers.
///
/// The derivative of a state is represented by the same type, so stage sums are built
/// with `*=` and `+=` on scratch copies. `Tolerance` is the error model used for
/// adaptive step control.
pub trait Integrable: Clone + Debug + Default + MulAssign<f64> + for<'a> AddAssign<&'a Self> {
    /// The tolerance model associated with the state, used for error estimation.
    type Tolerance: Tolerance<State = Self>;

    /// True when every component is finite.
    fn is_finite(&self) -> bool;
}
