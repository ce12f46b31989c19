//! Fixed-step simulation runner.
//!
//! The runner drives a [`StabilityGuard`]-wrapped [`Scheme`] through a step
//! budget and records every sample into a [`Trajectory`]:
//!
//! ```text
//! Running ──(all steps accepted)──▶ Completed
//!    │
//!    └──(guard reports a failure at step k)──▶ Failed
//! ```
//!
//! On failure, samples `k..=steps` are filled with the undefined sentinel so
//! the trajectory keeps its full length, and the dynamics are not evaluated
//! again.
//!
//! # Example
//!
//! ```ignore
//! use strand_solvers::runner::{self, Config, Horizon};
//!
//! let config = Config::new(0.01, Horizon::Steps(1000), Scheme::Rk4)?;
//! let trajectory = runner::run_unobserved(&pendulum, initial, &config)?;
//!
//! for sample in trajectory.valid_samples() {
//!     println!("t={}: {:?}", sample.time, sample.state);
//! }
//! ```

mod config;
mod error;
mod event;
mod trajectory;

pub use config::{Config, ConfigError, Horizon};
pub use error::Error;
pub use event::Event;
pub use trajectory::{Sample, Status, Trajectory};

use strand_core::{Dynamics, Observer, StateVector};

use crate::StabilityGuard;

/// Integrates `dynamics` from `initial` according to `config`.
///
/// # Algorithm
///
/// 1. Validate the initial state against the model dimension.
/// 2. Record the initial sample at `t = 0` and emit step 0.
/// 3. For each step `1..=steps`:
///    - Advance the previous state through the stability guard.
///    - On success, record the sample at `t = step * dt` and emit it.
///    - On failure, fill the remaining samples with the undefined sentinel,
///      emit [`Event::Diverged`], and stop.
///
/// # Observer
///
/// The observer sees each accepted sample and the divergence report, if
/// any. It cannot change what is computed.
///
/// # Errors
///
/// Returns an error if the initial state has the wrong dimension or a
/// non-finite component. Numerical instability during the run is not an
/// error: it yields a trajectory with [`Status::Failed`].
pub fn run<D, Obs>(
    dynamics: &D,
    initial: StateVector,
    config: &Config,
    mut observer: Obs,
) -> Result<Trajectory, Error>
where
    D: Dynamics + ?Sized,
    Obs: for<'a> Observer<Event<'a>>,
{
    let dimension = dynamics.dimension();
    if initial.dimension() != dimension {
        return Err(Error::DimensionMismatch {
            expected: dimension,
            actual: initial.dimension(),
        });
    }
    if let Some((index, value)) = initial.first_non_finite() {
        return Err(Error::NonFiniteInitialState { index, value });
    }

    let steps = config.steps();
    let dt = config.dt();
    let scheme = config.scheme();

    tracing::debug!(%scheme, dt, steps, dimension, "starting run");

    let mut samples = Vec::with_capacity(steps + 1);
    samples.push(Sample {
        time: 0.0,
        state: initial,
    });
    observer.observe(&Event::Step {
        step: 0,
        total: steps,
        time: 0.0,
        state: &samples[0].state,
    });

    let mut guard = StabilityGuard::new(dynamics, scheme);

    for step in 1..=steps {
        let outcome = guard.step(step, &samples[step - 1].state, dt);

        match outcome {
            Ok(state) => {
                let time = sample_time(step, dt);
                samples.push(Sample { time, state });
                observer.observe(&Event::Step {
                    step,
                    total: steps,
                    time,
                    state: &samples[step].state,
                });
            }
            Err(failure) => {
                samples.extend((step..=steps).map(|k| Sample {
                    time: sample_time(k, dt),
                    state: StateVector::undefined(dimension),
                }));
                observer.observe(&Event::Diverged(&failure));
                tracing::debug!(%scheme, valid = step, steps, "run failed");
                return Ok(Trajectory::failed(samples, failure));
            }
        }
    }

    tracing::debug!(%scheme, steps, "run completed");
    Ok(Trajectory::completed(samples))
}

/// Integrates `dynamics` without observation.
///
/// This is a convenience wrapper around [`run`] that discards events.
///
/// # Errors
///
/// Returns an error if the initial state has the wrong dimension or a
/// non-finite component.
pub fn run_unobserved<D>(
    dynamics: &D,
    initial: StateVector,
    config: &Config,
) -> Result<Trajectory, Error>
where
    D: Dynamics + ?Sized,
{
    run(dynamics, initial, config, ())
}

#[allow(clippy::cast_precision_loss)]
fn sample_time(step: usize, dt: f64) -> f64 {
    step as f64 * dt
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::{
        Checkpoint, Scheme, Stage,
        test_utils::{ConstantAcceleration, Counting, Decay, FailAfter},
    };

    fn config(dt: f64, steps: usize, scheme: Scheme) -> Config {
        Config::new(dt, Horizon::Steps(steps), scheme).expect("valid config")
    }

    #[test]
    fn constant_velocity_motion() {
        let model = ConstantAcceleration { acceleration: 0.0 };
        let initial = StateVector::from([0.0, 2.0]);

        let trajectory = run_unobserved(&model, initial, &config(0.1, 10, Scheme::Euler))
            .expect("should run");

        assert_eq!(trajectory.status(), Status::Completed);
        assert_eq!(trajectory.len(), 11); // initial + 10 steps
        assert!(trajectory.failure().is_none());

        let last = trajectory.last_valid().unwrap();
        assert_relative_eq!(last.state[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(last.time, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn sample_times_are_multiples_of_dt() {
        let model = Decay { rate: 1.0 };
        let trajectory =
            run_unobserved(&model, StateVector::from([1.0]), &config(0.25, 4, Scheme::Rk4))
                .unwrap();

        let times: Vec<f64> = trajectory.times().collect();
        assert_eq!(times, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn every_state_keeps_the_model_dimension() {
        let model = ConstantAcceleration { acceleration: -1.0 };

        for scheme in Scheme::ALL {
            let trajectory =
                run_unobserved(&model, StateVector::from([0.0, 1.0]), &config(0.1, 20, scheme))
                    .unwrap();

            assert_eq!(trajectory.len(), 21);
            assert!(
                trajectory
                    .samples()
                    .iter()
                    .all(|sample| sample.state.dimension() == 2)
            );
        }
    }

    #[test]
    fn rejects_wrong_initial_dimension() {
        let model = Decay { rate: 1.0 };
        let result = run_unobserved(&model, StateVector::from([1.0, 2.0]), &config(0.1, 1, Scheme::Euler));

        assert_eq!(
            result.unwrap_err(),
            Error::DimensionMismatch {
                expected: 1,
                actual: 2
            }
        );
    }

    #[test]
    fn rejects_non_finite_initial_state_before_evaluating() {
        let counting = Counting::new(Decay { rate: 1.0 });
        let result = run_unobserved(
            &counting,
            StateVector::from([f64::NAN]),
            &config(0.1, 5, Scheme::Euler),
        );

        assert!(matches!(
            result,
            Err(Error::NonFiniteInitialState { index: 0, .. })
        ));
        assert_eq!(counting.calls(), 0);
    }

    #[test]
    fn failure_fills_the_tail_with_undefined_samples() {
        // Euler makes one evaluation per step; the fourth one overflows, so
        // sample 4 is the first that cannot be produced.
        let dynamics = FailAfter::new(3);
        let trajectory = run_unobserved(
            &dynamics,
            StateVector::from([0.0]),
            &config(0.5, 10, Scheme::Euler),
        )
        .unwrap();

        assert_eq!(trajectory.status(), Status::Failed);
        assert_eq!(trajectory.len(), 11);
        assert_eq!(trajectory.valid_len(), 4);

        let failure = trajectory.failure().unwrap();
        assert_eq!(failure.step, 4);
        assert_eq!(failure.scheme, Scheme::Euler);
        assert_eq!(failure.checkpoint, Checkpoint::StageOutput(Stage::K1));

        for (step, sample) in trajectory.samples().iter().enumerate() {
            assert_relative_eq!(sample.time, step as f64 * 0.5);
            assert_eq!(sample.is_undefined(), step >= 4);
        }
        assert_relative_eq!(trajectory.last_valid().unwrap().state[0], 1.5);
    }

    #[test]
    fn no_evaluation_happens_after_failure() {
        let dynamics = FailAfter::new(5);
        let trajectory = run_unobserved(
            &dynamics,
            StateVector::from([0.0]),
            &config(0.1, 1000, Scheme::Rk4),
        )
        .unwrap();

        // Steps 1 (k1..k4) and 2 (k1) use six calls; the sixth fails.
        assert_eq!(dynamics.calls.get(), 6);
        assert_eq!(trajectory.failure().unwrap().step, 2);
        assert_eq!(
            trajectory.failure().unwrap().checkpoint,
            Checkpoint::StageOutput(Stage::K2)
        );
        assert_eq!(trajectory.valid_len(), 2);
    }

    #[test]
    fn observer_sees_steps_then_divergence() {
        let dynamics = FailAfter::new(2);
        let mut steps = Vec::new();
        let mut diverged_at = None;

        let trajectory = run(
            &dynamics,
            StateVector::from([0.0]),
            &config(0.1, 5, Scheme::Euler),
            |event: &Event<'_>| match event {
                Event::Step { step, .. } => steps.push(*step),
                Event::Diverged(failure) => diverged_at = Some(failure.step),
            },
        )
        .unwrap();

        assert_eq!(steps, vec![0, 1, 2]);
        assert_eq!(diverged_at, Some(3));
        assert_eq!(trajectory.valid_len(), 3);
    }

    #[test]
    fn observer_does_not_change_the_trajectory() {
        let model = Decay { rate: 3.0 };
        let config = config(0.01, 200, Scheme::Midpoint);

        let mut progress = Vec::new();
        let observed = run(&model, StateVector::from([1.0]), &config, |event: &Event<'_>| {
            progress.extend(event.progress());
        })
        .unwrap();
        let unobserved = run_unobserved(&model, StateVector::from([1.0]), &config).unwrap();

        assert!(observed.bitwise_eq(&unobserved));
        assert_eq!(progress.len(), 201);
        assert_relative_eq!(progress[100], 0.5);
    }

    #[test]
    fn repeated_runs_are_bitwise_identical() {
        let model = ConstantAcceleration { acceleration: -9.81 };

        for scheme in Scheme::ALL {
            let config = config(0.013, 300, scheme);
            let first = run_unobserved(&model, StateVector::from([1.0, 3.0]), &config).unwrap();
            let second = run_unobserved(&model, StateVector::from([1.0, 3.0]), &config).unwrap();

            assert!(first.bitwise_eq(&second));
        }
    }
}
