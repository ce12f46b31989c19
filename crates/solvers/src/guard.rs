//! Numerical stability checking for explicit schemes.
//!
//! [`StabilityGuard`] wraps a [`Scheme`] and a [`Dynamics`] model. Every stage
//! input, every stage derivative, and the produced state are checked for
//! non-finite components. The first failure is reported as a
//! [`FailureMarker`] and trips the guard: no further dynamics evaluation
//! happens through it.

use std::fmt;

use strand_core::{Dynamics, StateVector};

use crate::scheme::{Evaluate, Scheme, Stage};

/// Where in a step a failure was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkpoint {
    /// The state handed to the step was already invalid.
    Incoming,

    /// The intermediate state a stage would be evaluated at.
    StageInput(Stage),

    /// The derivative returned by a stage.
    StageOutput(Stage),

    /// The state produced by combining the stages.
    NextState,
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Checkpoint::Incoming => f.write_str("incoming state"),
            Checkpoint::StageInput(stage) => write!(f, "stage {stage} input"),
            Checkpoint::StageOutput(stage) => write!(f, "stage {stage} derivative"),
            Checkpoint::NextState => f.write_str("next state"),
        }
    }
}

/// Why a checkpoint failed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cause {
    /// A component was `NaN` or infinite.
    NonFinite { index: usize, value: f64 },

    /// The dynamics returned a derivative of the wrong dimension.
    DimensionMismatch { expected: usize, actual: usize },
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::NonFinite { index, value } => {
                write!(f, "component {index} is {value}")
            }
            Cause::DimensionMismatch { expected, actual } => {
                write!(f, "expected dimension {expected}, got {actual}")
            }
        }
    }
}

/// Report of the first numerical failure in a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FailureMarker {
    /// Index of the first trajectory sample that could not be produced.
    pub step: usize,

    /// The scheme in use.
    pub scheme: Scheme,

    /// Where in the step the failure was detected.
    pub checkpoint: Checkpoint,

    /// What was wrong with the value.
    pub cause: Cause,
}

impl fmt::Display for FailureMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "numerical instability at step {} ({} scheme, {}): {}",
            self.step, self.scheme, self.checkpoint, self.cause
        )
    }
}

/// Wraps every stage of a scheme with finiteness checks.
#[derive(Debug)]
pub struct StabilityGuard<D> {
    dynamics: D,
    scheme: Scheme,
    failure: Option<FailureMarker>,
}

impl<D: Dynamics> StabilityGuard<D> {
    /// Creates a guard for `scheme` applied to `dynamics`.
    pub fn new(dynamics: D, scheme: Scheme) -> Self {
        Self {
            dynamics,
            scheme,
            failure: None,
        }
    }

    /// Returns the guarded scheme.
    #[must_use]
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Returns the recorded failure, if the guard has tripped.
    #[must_use]
    pub fn failure(&self) -> Option<&FailureMarker> {
        self.failure.as_ref()
    }

    /// Returns `true` once a failure has been detected.
    #[must_use]
    pub fn is_tripped(&self) -> bool {
        self.failure.is_some()
    }

    /// Advances `state` by one step of size `dt`, producing sample `step`.
    ///
    /// # Errors
    ///
    /// Returns a [`FailureMarker`] if the incoming state, any stage, or the
    /// resulting state is non-finite. Once tripped, the guard returns its
    /// original marker for every later call without evaluating the dynamics.
    pub fn step(
        &mut self,
        step: usize,
        state: &StateVector,
        dt: f64,
    ) -> Result<StateVector, FailureMarker> {
        if let Some(failure) = self.failure {
            return Err(failure);
        }

        let outcome = match state.first_non_finite() {
            Some((index, value)) => Err((Checkpoint::Incoming, Cause::NonFinite { index, value })),
            None => self.advance(state, dt),
        };

        outcome.map_err(|(checkpoint, cause)| self.trip(step, checkpoint, cause))
    }

    fn advance(&self, state: &StateVector, dt: f64) -> Result<StateVector, (Checkpoint, Cause)> {
        let mut checked = Checked {
            dynamics: &self.dynamics,
            dimension: state.dimension(),
        };
        let next = self.scheme.step_with(&mut checked, state, dt)?;

        match next.first_non_finite() {
            Some((index, value)) => Err((Checkpoint::NextState, Cause::NonFinite { index, value })),
            None => Ok(next),
        }
    }

    fn trip(&mut self, step: usize, checkpoint: Checkpoint, cause: Cause) -> FailureMarker {
        let failure = FailureMarker {
            step,
            scheme: self.scheme,
            checkpoint,
            cause,
        };
        tracing::warn!(
            step,
            scheme = %self.scheme,
            checkpoint = %checkpoint,
            cause = %cause,
            "numerical instability detected; halting run"
        );
        self.failure = Some(failure);
        failure
    }
}

/// Stage evaluator that rejects non-finite inputs and outputs.
struct Checked<'a, D> {
    dynamics: &'a D,
    dimension: usize,
}

impl<D: Dynamics> Evaluate for Checked<'_, D> {
    type Error = (Checkpoint, Cause);

    fn evaluate(&mut self, stage: Stage, state: &StateVector) -> Result<StateVector, Self::Error> {
        if let Some((index, value)) = state.first_non_finite() {
            return Err((Checkpoint::StageInput(stage), Cause::NonFinite { index, value }));
        }

        let derivative = self.dynamics.derivative(state);

        if derivative.dimension() != self.dimension {
            return Err((
                Checkpoint::StageOutput(stage),
                Cause::DimensionMismatch {
                    expected: self.dimension,
                    actual: derivative.dimension(),
                },
            ));
        }

        match derivative.first_non_finite() {
            Some((index, value)) => Err((
                Checkpoint::StageOutput(stage),
                Cause::NonFinite { index, value },
            )),
            None => Ok(derivative),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::test_utils::{Counting, Decay, FailAfter, WrongDimension};

    #[test]
    fn finite_step_matches_unchecked_step() {
        let decay = Decay { rate: 0.5 };
        let state = StateVector::from([2.0]);

        for scheme in Scheme::ALL {
            let mut guard = StabilityGuard::new(&decay, scheme);
            let guarded = guard.step(1, &state, 0.1).expect("finite step");
            let unchecked = scheme.step(&decay, &state, 0.1);

            assert!(guarded.bitwise_eq(&unchecked));
            assert!(!guard.is_tripped());
        }
    }

    #[test]
    fn rejects_non_finite_incoming_state_without_evaluating() {
        let counting = Counting::new(Decay { rate: 1.0 });
        let mut guard = StabilityGuard::new(&counting, Scheme::Rk4);

        let failure = guard
            .step(7, &StateVector::undefined(1), 0.1)
            .expect_err("undefined input must fail");

        assert_eq!(failure.step, 7);
        assert_eq!(failure.checkpoint, Checkpoint::Incoming);
        assert_eq!(counting.calls(), 0);
    }

    #[test]
    fn catches_the_first_bad_stage_and_skips_the_rest() {
        // k1 is healthy, k2 overflows: k3 and k4 must never be evaluated.
        let dynamics = FailAfter::new(1);
        let mut guard = StabilityGuard::new(&dynamics, Scheme::Rk4);

        let failure = guard
            .step(3, &StateVector::from([0.0]), 0.1)
            .expect_err("second stage overflows");

        assert_eq!(failure.scheme, Scheme::Rk4);
        assert_eq!(failure.checkpoint, Checkpoint::StageOutput(Stage::K2));
        assert!(matches!(
            failure.cause,
            Cause::NonFinite { index: 0, value } if value.is_infinite()
        ));
        assert_eq!(dynamics.calls.get(), 2);
    }

    #[test]
    fn catches_overflow_in_the_combined_state() {
        // The derivative is finite, but the step pushes the state past f64::MAX.
        let growth = Decay { rate: -1e300 };
        let mut guard = StabilityGuard::new(&growth, Scheme::Euler);

        let failure = guard
            .step(1, &StateVector::from([10.0]), 1e10)
            .expect_err("overflow");

        assert_eq!(failure.checkpoint, Checkpoint::NextState);
    }

    #[test]
    fn catches_non_finite_stage_input() {
        // k1 is finite, but the midpoint it leads to is not.
        let growth = Decay { rate: -1e290 };
        let mut guard = StabilityGuard::new(&growth, Scheme::Midpoint);

        let failure = guard
            .step(1, &StateVector::from([1e10]), 1e10)
            .expect_err("midpoint overflows");

        assert_eq!(failure.checkpoint, Checkpoint::StageInput(Stage::K2));
    }

    #[test]
    fn reports_wrong_derivative_dimension() {
        let mut guard = StabilityGuard::new(WrongDimension, Scheme::Euler);

        let failure = guard
            .step(1, &StateVector::from([1.0]), 0.1)
            .expect_err("dimension mismatch");

        assert_eq!(
            failure.cause,
            Cause::DimensionMismatch {
                expected: 1,
                actual: 2
            }
        );
    }

    #[test]
    fn tripped_guard_never_evaluates_again() {
        let dynamics = FailAfter::new(0);
        let mut guard = StabilityGuard::new(&dynamics, Scheme::Euler);

        let first = guard.step(4, &StateVector::from([0.0]), 0.1).unwrap_err();
        let second = guard.step(5, &StateVector::from([0.0]), 0.1).unwrap_err();

        assert_eq!(first, second);
        assert_eq!(second.step, 4);
        assert_eq!(dynamics.calls.get(), 1);
        assert!(guard.is_tripped());
        assert_eq!(guard.failure(), Some(&first));
    }

    #[test]
    fn failure_message_names_step_scheme_and_stage() {
        let failure = FailureMarker {
            step: 12,
            scheme: Scheme::Midpoint,
            checkpoint: Checkpoint::StageOutput(Stage::K2),
            cause: Cause::NonFinite {
                index: 1,
                value: f64::INFINITY,
            },
        };

        assert_eq!(
            failure.to_string(),
            "numerical instability at step 12 (midpoint scheme, stage k2 derivative): component 1 is inf"
        );
    }

    #[test]
    fn healthy_steps_leave_state_close_to_exact() {
        let decay = Decay { rate: 1.0 };
        let mut guard = StabilityGuard::new(&decay, Scheme::Rk4);

        let next = guard.step(1, &StateVector::from([1.0]), 0.01).unwrap();

        assert_relative_eq!(next[0], (-0.01_f64).exp(), epsilon = 1e-12);
    }
}
