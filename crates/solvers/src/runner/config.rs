use thiserror::Error;

use crate::Scheme;

/// Relative tolerance used to snap `duration / dt` onto a whole step count.
const SNAP_TOLERANCE: f64 = 1e-9;

/// How far a run advances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Horizon {
    /// A fixed number of steps.
    Steps(usize),

    /// A total simulated duration, converted to a step count.
    Duration(f64),
}

/// Configuration for the simulation runner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    dt: f64,
    steps: usize,
    scheme: Scheme,
}

/// Errors that can occur when validating a runner config.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("dt must be finite and positive, got {0}")]
    TimeStep(f64),

    #[error("step count must be positive")]
    Steps,

    #[error("duration must be finite and positive, got {0}")]
    Duration(f64),

    #[error("run needs {requested} steps, more than the limit of {max}")]
    TooManySteps { requested: f64, max: usize },
}

impl Config {
    /// Largest step count a single run may request.
    ///
    /// Every step keeps a sample, so the trajectory is allocated up front
    /// with `steps + 1` entries.
    pub const MAX_STEPS: usize = 10_000_000;

    /// Creates a new config with a validated time step and horizon.
    ///
    /// A [`Horizon::Duration`] becomes `ceil(duration / dt)` steps, snapped to
    /// the nearest whole number when within a relative `1e-9` of it so that
    /// e.g. a duration of `1.0` at `dt = 0.1` gives exactly 10 steps.
    ///
    /// # Errors
    ///
    /// Returns an error if `dt` or the duration is non-positive or non-finite,
    /// or if the step count is zero or above [`Config::MAX_STEPS`].
    #[allow(clippy::cast_precision_loss)]
    pub fn new(dt: f64, horizon: Horizon, scheme: Scheme) -> Result<Self, ConfigError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(ConfigError::TimeStep(dt));
        }

        let steps = match horizon {
            Horizon::Steps(0) => return Err(ConfigError::Steps),
            Horizon::Steps(steps) if steps > Self::MAX_STEPS => {
                return Err(ConfigError::TooManySteps {
                    requested: steps as f64,
                    max: Self::MAX_STEPS,
                });
            }
            Horizon::Steps(steps) => steps,
            Horizon::Duration(duration) => steps_for_duration(duration, dt)?,
        };

        Ok(Self { dt, steps, scheme })
    }

    /// Returns the time step.
    #[must_use]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Returns the number of steps to take.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Returns the integration scheme.
    #[must_use]
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Returns the simulated time at the end of a completed run.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn end_time(&self) -> f64 {
        self.steps as f64 * self.dt
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn steps_for_duration(duration: f64, dt: f64) -> Result<usize, ConfigError> {
    if !duration.is_finite() || duration <= 0.0 {
        return Err(ConfigError::Duration(duration));
    }

    let ratio = duration / dt;
    let nearest = ratio.round();
    let steps = if (ratio - nearest).abs() <= SNAP_TOLERANCE * nearest.max(1.0) {
        nearest
    } else {
        ratio.ceil()
    };

    if !steps.is_finite() || steps > Config::MAX_STEPS as f64 {
        return Err(ConfigError::TooManySteps {
            requested: steps,
            max: Config::MAX_STEPS,
        });
    }

    // A tiny duration can still round to zero steps.
    Ok((steps as usize).max(1))
}
