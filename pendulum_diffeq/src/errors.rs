use thiserror::Error;
use tolerance::ToleranceErrors;

use crate::ModelError;

#[derive(Debug, Error)]
pub enum SolverErrors {
    #[error("output grid is empty")]
    EmptyGrid,
    #[error("output grid must be finite and strictly increasing (index {index}: {time})")]
    InvalidGrid { index: usize, time: f64 },
    #[error("{0}")]
    InvalidTolerance(#[from] ToleranceErrors),
    #[error("step budget of {max_steps} exhausted at t = {t} before reaching t = {target}")]
    MaxStepsExceeded { t: f64, target: f64, max_steps: usize },
    #[error("model evaluation failed at t = {t}: {source}")]
    Model {
        t: f64,
        #[source]
        source: ModelError,
    },
    #[error("state became non-finite at t = {t}")]
    NonFinite { t: f64 },
    #[error("step size {dt:e} fell below the minimum {min_dt:e} at t = {t}")]
    StepSizeUnderflow { t: f64, dt: f64, min_dt: f64 },
}

impl SolverErrors {
    /// Time at which the solver gave up, if the failure happened during integration.
    pub fn time(&self) -> Option<f64> {
        match self {
            SolverErrors::MaxStepsExceeded { t, .. }
            | SolverErrors::Model { t, .. }
            | SolverErrors::NonFinite { t }
            | SolverErrors::StepSizeUnderflow { t, .. } => Some(*t),
            _ => None,
        }
    }
}
