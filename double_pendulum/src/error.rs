use std::{io, path::PathBuf};

use pendulum_diffeq::errors::SolverErrors;
use thiserror::Error;
use tolerance::ToleranceErrors;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParameterError {
    #[error("gravity must be finite, got {0}")]
    NonFiniteGravity(f64),
    #[error("damping must be finite and non-negative, got {0}")]
    NegativeDamping(f64),
    #[error("{name} must be finite and positive, got {value}")]
    NonPositiveLength { name: &'static str, value: f64 },
    #[error("{name} must be finite and positive, got {value}")]
    NonPositiveMass { name: &'static str, value: f64 },
    #[error("initial state must be finite, got {0:?}")]
    NonFiniteState([f64; 4]),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DerivationError {
    #[error("force balance is singular at {0:?}")]
    Singular([f64; 10]),
    #[error("force balance produced a non-finite solution at {0:?}")]
    NonFinite([f64; 10]),
    #[error(
        "derived {which} disagrees with the force balance at {args:?}: {derived} vs {expected}"
    )]
    Inconsistent {
        which: &'static str,
        args: [f64; 10],
        derived: f64,
        expected: f64,
    },
}

#[derive(Debug, Error)]
pub enum IntegrationFailure {
    #[error(
        "time grid needs finite t_final >= 0, h > 0 and at most 1e8 intervals, got t_final = {t_final}, h = {h}"
    )]
    InvalidGrid { t_final: f64, h: f64 },
    #[error("{0}")]
    Parameters(#[from] ParameterError),
    #[error("{0}")]
    Solver(#[from] SolverErrors),
    #[error("{0}")]
    Tolerance(#[from] ToleranceErrors),
}

impl IntegrationFailure {
    /// Simulation time of the failure, when the solver had already started.
    pub fn time(&self) -> Option<f64> {
        match self {
            IntegrationFailure::Solver(e) => e.time(),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not parse {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("{0}")]
    Serialize(#[from] ron::Error),
    #[error("unknown profile '{0}'")]
    UnknownProfile(String),
}

/// Any failure of the full derive, validate and integrate pipeline.
#[derive(Debug, Error)]
pub enum PendulumError {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Derivation(#[from] DerivationError),
    #[error("{0}")]
    Integration(#[from] IntegrationFailure),
    #[error("{0}")]
    Parameters(#[from] ParameterError),
}
