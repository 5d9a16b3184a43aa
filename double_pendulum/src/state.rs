use pendulum_diffeq::state::state_array::StateArray;
use serde::{Deserialize, Serialize};

use crate::error::ParameterError;

/// Complete ODE state in the fixed order (θ1, θ2, ω1, ω2).
///
/// Angles are measured from the downward vertical, counterclockwise positive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PendulumState {
    pub theta1: f64,
    pub theta2: f64,
    pub omega1: f64,
    pub omega2: f64,
}

impl PendulumState {
    pub fn new(theta1: f64, theta2: f64, omega1: f64, omega2: f64) -> Self {
        Self {
            theta1,
            theta2,
            omega1,
            omega2,
        }
    }

    pub fn at_rest() -> Self {
        Self::default()
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.theta1, self.theta2, self.omega1, self.omega2]
    }

    pub fn is_finite(&self) -> bool {
        self.as_array().iter().all(|x| x.is_finite())
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.is_finite() {
            Ok(())
        } else {
            Err(ParameterError::NonFiniteState(self.as_array()))
        }
    }
}

impl From<[f64; 4]> for PendulumState {
    fn from(x: [f64; 4]) -> Self {
        Self::new(x[0], x[1], x[2], x[3])
    }
}

impl From<PendulumState> for StateArray<4> {
    fn from(state: PendulumState) -> Self {
        StateArray::new(state.as_array())
    }
}

impl From<&StateArray<4>> for PendulumState {
    fn from(x: &StateArray<4>) -> Self {
        Self::new(x[0], x[1], x[2], x[3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_order_is_preserved() {
        let state = PendulumState::new(0.1, 0.2, 0.3, 0.4);
        let x: StateArray<4> = state.into();
        assert_eq!(x.into_inner(), [0.1, 0.2, 0.3, 0.4]);
        assert_eq!(PendulumState::from(&x), state);
    }

    #[test]
    fn test_non_finite_state_is_rejected() {
        assert!(PendulumState::at_rest().validate().is_ok());
        assert!(PendulumState::new(0.0, f64::NAN, 0.0, 0.0).validate().is_err());
    }
}
