use serde::{Deserialize, Serialize};

use crate::error::ParameterError;

/// Physical constants of one double pendulum.
///
/// Lengths are rod lengths, masses are point masses at the rod tips and `b` is the linear
/// damping coefficient applied to the tangential velocity of each bob relative to its pivot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PendulumParameters {
    pub g: f64,
    pub l1: f64,
    pub l2: f64,
    pub m1: f64,
    pub m2: f64,
    pub b: f64,
}

impl Default for PendulumParameters {
    fn default() -> Self {
        Self {
            g: 9.81,
            l1: 1.0,
            l2: 1.0,
            m1: 1.0,
            m2: 1.0,
            b: 0.0,
        }
    }
}

impl PendulumParameters {
    pub fn new(g: f64, l1: f64, l2: f64, m1: f64, m2: f64, b: f64) -> Result<Self, ParameterError> {
        let parameters = Self {
            g,
            l1,
            l2,
            m1,
            m2,
            b,
        };
        parameters.validate()?;
        Ok(parameters)
    }

    /// Checks the values that keep the force balance non-singular.
    ///
    /// Deserialized parameters skip `new`, so callers validate again before integrating.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if !self.g.is_finite() {
            return Err(ParameterError::NonFiniteGravity(self.g));
        }
        for (name, value) in [("l1", self.l1), ("l2", self.l2)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ParameterError::NonPositiveLength { name, value });
            }
        }
        for (name, value) in [("m1", self.m1), ("m2", self.m2)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ParameterError::NonPositiveMass { name, value });
            }
        }
        if !(self.b.is_finite() && self.b >= 0.0) {
            return Err(ParameterError::NegativeDamping(self.b));
        }
        Ok(())
    }

    pub fn with_damping(mut self, b: f64) -> Self {
        self.b = b;
        self
    }

    /// Parameter tail of the acceleration argument list, (g, l1, l2, m1, m2, b).
    pub fn as_array(&self) -> [f64; 6] {
        [self.g, self.l1, self.l2, self.m1, self.m2, self.b]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(PendulumParameters::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_degenerate_values() {
        assert_eq!(
            PendulumParameters::new(9.81, 1.0, 1.0, 0.0, 1.0, 0.0),
            Err(ParameterError::NonPositiveMass {
                name: "m1",
                value: 0.0
            })
        );
        assert_eq!(
            PendulumParameters::new(9.81, 1.0, -2.0, 1.0, 1.0, 0.0),
            Err(ParameterError::NonPositiveLength {
                name: "l2",
                value: -2.0
            })
        );
        assert_eq!(
            PendulumParameters::new(9.81, 1.0, 1.0, 1.0, 1.0, -0.1),
            Err(ParameterError::NegativeDamping(-0.1))
        );
        assert!(matches!(
            PendulumParameters::new(f64::NAN, 1.0, 1.0, 1.0, 1.0, 0.0),
            Err(ParameterError::NonFiniteGravity(_))
        ));
        assert!(PendulumParameters::new(9.81, 1.0, 1.0, 1.0, f64::INFINITY, 0.0).is_err());
    }

    #[test]
    fn test_zero_gravity_and_damping_are_allowed() {
        assert!(PendulumParameters::new(0.0, 1.0, 1.0, 1.0, 1.0, 0.0).is_ok());
    }
}
