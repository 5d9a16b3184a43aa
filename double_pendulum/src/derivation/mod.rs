use std::{fmt, str::FromStr, sync::OnceLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{error::DerivationError, parameters::PendulumParameters, state::PendulumState};

pub mod closed_form;
pub mod force_balance;
pub mod kinematics;

pub use force_balance::Reaction;

/// Angular acceleration with the fixed argument order (θ1, θ2, ω1, ω2, g, l1, l2, m1, m2, b).
pub type AccelerationFn = fn(f64, f64, f64, f64, f64, f64, f64, f64, f64, f64) -> f64;

/// How the accelerations are evaluated at run time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Derivation {
    /// Tensions eliminated ahead of time, plain arithmetic per call.
    #[default]
    ClosedForm,
    /// A 4x4 force balance solved with LU on every call.
    ForceBalance,
}

impl Derivation {
    pub const ALL: [Derivation; 2] = [Derivation::ClosedForm, Derivation::ForceBalance];

    pub fn name(&self) -> &'static str {
        match self {
            Derivation::ClosedForm => "closed-form",
            Derivation::ForceBalance => "force-balance",
        }
    }
}

impl fmt::Display for Derivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Derivation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Derivation::ALL
            .into_iter()
            .find(|derivation| derivation.name() == s)
            .ok_or_else(|| format!("unknown derivation '{s}'"))
    }
}

/// The two derived angular acceleration functions.
#[derive(Clone, Copy, Debug)]
pub struct EquationsOfMotion {
    pub alpha1: AccelerationFn,
    pub alpha2: AccelerationFn,
    derivation: Derivation,
}

impl EquationsOfMotion {
    pub fn derivation(&self) -> Derivation {
        self.derivation
    }

    /// (α1, α2) at `state`.
    pub fn accelerations(
        &self,
        state: &PendulumState,
        parameters: &PendulumParameters,
    ) -> (f64, f64) {
        let args = arguments(state, parameters);
        (call(self.alpha1, &args), call(self.alpha2, &args))
    }
}

/// Rod tensions and accelerations at `state`, from the force balance.
pub fn reaction(
    state: &PendulumState,
    parameters: &PendulumParameters,
) -> Result<Reaction, DerivationError> {
    force_balance::solve(&arguments(state, parameters))
}

fn arguments(state: &PendulumState, parameters: &PendulumParameters) -> [f64; 10] {
    let [theta1, theta2, omega1, omega2] = state.as_array();
    let [g, l1, l2, m1, m2, b] = parameters.as_array();
    [theta1, theta2, omega1, omega2, g, l1, l2, m1, m2, b]
}

fn call(f: AccelerationFn, a: &[f64; 10]) -> f64 {
    f(a[0], a[1], a[2], a[3], a[4], a[5], a[6], a[7], a[8], a[9])
}

// hanging, inverted, large angles, fast spin, unequal rods and bobs, with and without damping
const PROBES: [[f64; 10]; 6] = [
    [0.0, 0.0, 0.0, 0.0, 9.81, 1.0, 1.0, 1.0, 1.0, 0.0],
    [3.0787, 3.0787, -1.0, -0.5, 9.81, 1.0, 1.0, 1.0, 1.0, 0.1],
    [1.5707963, -0.4, 2.5, -3.0, 9.81, 0.7, 1.6, 2.5, 0.3, 0.0],
    [-2.2, 2.9, -6.0, 8.0, 9.81, 1.2, 0.4, 0.5, 4.0, 0.35],
    [0.1, 0.2, 0.0, 0.0, 1.62, 2.0, 2.0, 1.0, 1.0, 1.0],
    [4.0, -7.0, 0.3, 0.1, 0.0, 1.0, 1.0, 1.0, 3.0, 0.2],
];

const PROBE_TOL: f64 = 1e-9;

/// Produces the angular acceleration functions of the damped double pendulum.
///
/// The selected functions are checked against a direct force balance solve at a fixed set
/// of probe configurations before they are handed out.
pub fn derive(derivation: Derivation) -> Result<EquationsOfMotion, DerivationError> {
    let equations = match derivation {
        Derivation::ClosedForm => EquationsOfMotion {
            alpha1: closed_form::alpha1,
            alpha2: closed_form::alpha2,
            derivation,
        },
        Derivation::ForceBalance => EquationsOfMotion {
            alpha1: force_balance::alpha1,
            alpha2: force_balance::alpha2,
            derivation,
        },
    };
    verify(&equations)?;
    info!(%derivation, probes = PROBES.len(), "equations of motion derived");
    Ok(equations)
}

fn verify(equations: &EquationsOfMotion) -> Result<(), DerivationError> {
    for args in PROBES {
        let expected = force_balance::solve(&args)?;
        let checks = [
            ("alpha1", call(equations.alpha1, &args), expected.alpha1),
            ("alpha2", call(equations.alpha2, &args), expected.alpha2),
        ];
        for (which, derived, expected) in checks {
            if !((derived - expected).abs() <= PROBE_TOL * (1.0 + expected.abs())) {
                return Err(DerivationError::Inconsistent {
                    which,
                    args,
                    derived,
                    expected,
                });
            }
        }
        debug!(?args, "probe agrees with force balance");
    }
    Ok(())
}

static DERIVED: OnceLock<Result<EquationsOfMotion, DerivationError>> = OnceLock::new();

/// Closed-form equations of motion, derived once per process.
pub fn derived() -> Result<&'static EquationsOfMotion, DerivationError> {
    DERIVED
        .get_or_init(|| derive(Derivation::ClosedForm))
        .as_ref()
        .map_err(Clone::clone)
}
