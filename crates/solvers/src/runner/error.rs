use thiserror::Error;

use super::ConfigError;

/// Errors that prevent a run from starting.
///
/// Numerical instability during a run is not an error; it is reported
/// through [`Trajectory::failure`](super::Trajectory::failure).
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum Error {
    #[error("invalid config: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("initial state has dimension {actual}, model expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("initial state component {index} is not finite: {value}")]
    NonFiniteInitialState { index: usize, value: f64 },
}
