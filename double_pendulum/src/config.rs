use std::{fs, path::Path};

use ron::ser::{PrettyConfig, to_string_pretty};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    derivation::{Derivation, derive, derived},
    error::{ConfigError, PendulumError},
    integrator::{IntegratorOptions, TimeGrid, integrate},
    parameters::PendulumParameters,
    state::PendulumState,
    trajectory::Trajectory,
};

/// Everything one run needs, as stored in a RON file.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub parameters: PendulumParameters,
    pub initial_state: PendulumState,
    pub grid: TimeGrid,
    #[serde(default)]
    pub derivation: Derivation,
    #[serde(default)]
    pub options: IntegratorOptions,
}

impl SimulationConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&contents, &path.display().to_string())
    }

    /// Parses a configuration; `origin` names the source in error messages.
    pub fn from_ron(contents: &str, origin: &str) -> Result<Self, ConfigError> {
        ron::from_str(contents).map_err(|source| ConfigError::Parse {
            origin: origin.to_string(),
            source,
        })
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(to_string_pretty(self, PrettyConfig::new())?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        fs::write(path, self.to_ron()?).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Validates, derives the equations of motion and integrates the configured run.
    pub fn simulate(&self) -> Result<Trajectory, PendulumError> {
        self.parameters.validate()?;
        self.initial_state.validate()?;

        let trajectory = match self.derivation {
            Derivation::ClosedForm => integrate(
                derived()?,
                &self.parameters,
                self.initial_state,
                self.grid,
                self.options,
            )?,
            Derivation::ForceBalance => integrate(
                &derive(Derivation::ForceBalance)?,
                &self.parameters,
                self.initial_state,
                self.grid,
                self.options,
            )?,
        };
        info!(derivation = %self.derivation, samples = trajectory.len(), "simulation complete");
        Ok(trajectory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::{IntegrationFailure, ParameterError},
        profile::Profile,
    };
    use tolerance::ToleranceErrors;

    #[test]
    fn test_reference_resource_matches_profile() {
        let config =
            SimulationConfig::from_ron(include_str!("../resources/reference.ron"), "reference.ron")
                .unwrap();
        let profile = Profile::Reference.config();
        assert_eq!(config.parameters, profile.parameters);
        assert_eq!(config.initial_state, profile.initial_state);
        assert_eq!(config.grid, profile.grid);
        assert_eq!(config.derivation, profile.derivation);
        assert_eq!(config.options.tolerances, profile.options.tolerances);
    }

    #[test]
    fn test_ron_round_trip_keeps_values() {
        let config = Profile::SmallAngle.config();
        let parsed = SimulationConfig::from_ron(&config.to_ron().unwrap(), "memory").unwrap();
        assert_eq!(parsed.parameters, config.parameters);
        assert_eq!(parsed.initial_state, config.initial_state);
        assert_eq!(parsed.grid, config.grid);
    }

    #[test]
    fn test_options_default_when_omitted() {
        let contents = r#"(
            parameters: (g: 9.81, l1: 1.0, l2: 1.0, m1: 1.0, m2: 1.0, b: 0.0),
            initial_state: (theta1: 0.1, theta2: 0.0, omega1: 0.0, omega2: 0.0),
            grid: (t_final: 1.0, h: 0.1),
        )"#;
        let config = SimulationConfig::from_ron(contents, "inline").unwrap();
        assert_eq!(config.derivation, Derivation::ClosedForm);
        assert_eq!(config.options.tolerances.abs_tol(), 1e-9);
        assert_eq!(config.options.max_steps, 10_000);
    }

    #[test]
    fn test_malformed_ron_is_a_parse_error() {
        assert!(matches!(
            SimulationConfig::from_ron("(parameters: ", "broken"),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            SimulationConfig::load(Path::new("/nonexistent/pendulum.ron")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_simulate_validates_parameters() {
        let mut config = Profile::Undamped.config();
        config.parameters.l1 = 0.0;
        assert!(matches!(
            config.simulate(),
            Err(PendulumError::Parameters(ParameterError::NonPositiveLength { .. }))
        ));
    }

    #[test]
    fn test_deserialized_tolerances_are_checked() {
        let contents = r#"(
            parameters: (g: 9.81, l1: 1.0, l2: 1.0, m1: 1.0, m2: 1.0, b: 0.0),
            initial_state: (theta1: 0.1, theta2: 0.0, omega1: 0.0, omega2: 0.0),
            grid: (t_final: 1.0, h: 0.1),
            options: (tolerances: (abs_tol: 0.0, rel_tol: 0.0)),
        )"#;
        let config = SimulationConfig::from_ron(contents, "inline").unwrap();
        assert!(matches!(
            config.simulate(),
            Err(PendulumError::Integration(IntegrationFailure::Tolerance(
                ToleranceErrors::BothZero
            )))
        ));
    }

    #[test]
    fn test_simulate_with_force_balance() {
        let mut config = Profile::HorizontalRelease.config();
        config.derivation = Derivation::ForceBalance;
        let trajectory = config.simulate().unwrap();
        assert_eq!(trajectory.len(), 101);
    }
}
