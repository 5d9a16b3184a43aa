//! Equations of motion and trajectories of a damped planar double pendulum.
//!
//! The pipeline is [`derive`] (or the cached [`derived`]) to obtain the angular
//! accelerations, [`integrate`] to produce a [`Trajectory`] on a uniform grid, and the
//! functions in [`projection`] to turn samples into positions and energies.

pub mod config;
pub mod derivation;
pub mod error;
pub mod integrator;
pub mod parameters;
pub mod profile;
pub mod projection;
pub mod state;
pub mod trajectory;

pub use config::SimulationConfig;
pub use derivation::{Derivation, EquationsOfMotion, Reaction, derive, derived};
pub use error::{ConfigError, DerivationError, IntegrationFailure, ParameterError, PendulumError};
pub use integrator::{IntegratorOptions, TimeGrid, integrate, rhs};
pub use parameters::PendulumParameters;
pub use profile::Profile;
pub use projection::{CartesianFrame, accelerations, diagnostic_energy, mechanical_energy};
pub use state::PendulumState;
pub use trajectory::Trajectory;

pub use pendulum_diffeq::{solvers::RungeKuttaMethods, stepping::AdaptiveStepMethods};
