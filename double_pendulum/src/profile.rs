use std::{f64::consts::PI, fmt, str::FromStr};

use crate::{
    config::SimulationConfig,
    derivation::Derivation,
    error::ConfigError,
    integrator::{IntegratorOptions, TimeGrid},
    parameters::PendulumParameters,
    state::PendulumState,
};

/// Named, ready-to-run configurations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Profile {
    Reference,
    Undamped,
    SmallAngle,
    Rest,
    HorizontalRelease,
}

impl Profile {
    pub const ALL: [Profile; 5] = [
        Profile::Reference,
        Profile::Undamped,
        Profile::SmallAngle,
        Profile::Rest,
        Profile::HorizontalRelease,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Profile::Reference => "reference",
            Profile::Undamped => "undamped",
            Profile::SmallAngle => "small-angle",
            Profile::Rest => "rest",
            Profile::HorizontalRelease => "horizontal-release",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Profile::Reference => "both rods near inverted, lightly damped, 60 s",
            Profile::Undamped => "reference start without damping, 60 s",
            Profile::SmallAngle => "0.01 rad on both rods, normal mode regime, 20 s",
            Profile::Rest => "hanging at rest, stays at rest, 10 s",
            Profile::HorizontalRelease => "both rods released horizontally, 1 s",
        }
    }

    pub fn config(&self) -> SimulationConfig {
        let unit = PendulumParameters::default();
        let (parameters, initial_state, grid) = match self {
            Profile::Reference | Profile::Undamped => {
                let theta = 0.979999999 * PI;
                let b = if *self == Profile::Reference { 0.1 } else { 0.0 };
                (
                    unit.with_damping(b),
                    PendulumState::new(theta, theta, -1.0, -0.5),
                    TimeGrid::new(60.0, 0.025),
                )
            }
            Profile::SmallAngle => (
                unit,
                PendulumState::new(0.01, 0.01, 0.0, 0.0),
                TimeGrid::new(20.0, 0.01),
            ),
            Profile::Rest => (
                unit.with_damping(0.1),
                PendulumState::at_rest(),
                TimeGrid::new(10.0, 0.025),
            ),
            Profile::HorizontalRelease => (
                unit,
                PendulumState::new(PI / 2.0, PI / 2.0, 0.0, 0.0),
                TimeGrid::new(1.0, 0.01),
            ),
        };
        SimulationConfig {
            parameters,
            initial_state,
            grid,
            derivation: Derivation::default(),
            options: IntegratorOptions::default(),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Profile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Profile::ALL
            .into_iter()
            .find(|profile| profile.name() == s)
            .ok_or_else(|| ConfigError::UnknownProfile(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_names_round_trip() {
        for profile in Profile::ALL {
            assert_eq!(profile.name().parse::<Profile>().unwrap(), profile);
        }
        assert!(matches!(
            "triple".parse::<Profile>(),
            Err(ConfigError::UnknownProfile(_))
        ));
    }

    #[test]
    fn test_every_profile_is_valid() {
        for profile in Profile::ALL {
            let config = profile.config();
            assert!(config.parameters.validate().is_ok(), "{profile}");
            assert!(config.initial_state.validate().is_ok(), "{profile}");
            assert!(config.grid.validate().is_ok(), "{profile}");
        }
    }

    #[test]
    fn test_reference_values() {
        let config = Profile::Reference.config();
        assert_eq!(config.parameters.b, 0.1);
        assert_eq!(config.initial_state.omega1, -1.0);
        assert_eq!(config.initial_state.omega2, -0.5);
        assert_eq!(config.grid.steps(), 2400);
        assert_eq!(config.options.tolerances.abs_tol(), 1e-9);
        assert_eq!(config.options.tolerances.rel_tol(), 1e-9);
        assert_eq!(Profile::Undamped.config().parameters.b, 0.0);
    }
}
